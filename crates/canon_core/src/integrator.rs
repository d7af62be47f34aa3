use crate::{
    error::IntegrationError,
    method::{IntegratorSettings, Method},
    solvers::{Euler, Midpoint, RK4},
    systems::FnSystem,
    traits::{DynamicalSystem, Scalar, Steppable},
    trajectory::{time_grid, Trajectory},
};
use nalgebra::DMatrix;

impl Method {
    fn build<T: Scalar>(self, dim: usize) -> InternalStepper<T> {
        match self {
            Method::Euler => InternalStepper::Euler(Euler::new(dim)),
            Method::Rk2 => InternalStepper::Rk2(Midpoint::new(dim)),
            Method::Rk4 => InternalStepper::Rk4(RK4::new(dim)),
        }
    }
}

enum InternalStepper<T: Scalar> {
    Euler(Euler<T>),
    Rk2(Midpoint<T>),
    Rk4(RK4<T>),
}

impl<T: Scalar> InternalStepper<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: T, state: &mut [T], dt: T) {
        match self {
            InternalStepper::Euler(s) => s.step(system, t, state, dt),
            InternalStepper::Rk2(s) => s.step(system, t, state, dt),
            InternalStepper::Rk4(s) => s.step(system, t, state, dt),
        }
    }
}

/// Fixed-step integrator for a first-order system ds/dt = f(t, s).
///
/// The method is fixed at construction; one integrator can produce any number
/// of independent trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateIntegrator {
    method: Method,
}

impl StateIntegrator {
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Integrates `steps` steps of size `h` from `(t0, s0)`.
    ///
    /// The returned trajectory holds `steps + 1` states on the grid
    /// `t0 + n*h`, starting with `s0` unchanged. Non-finite values produced by
    /// the system are carried through and reported by
    /// [`Trajectory::first_non_finite`].
    pub fn integrate<T, S>(
        &self,
        system: &S,
        t0: T,
        s0: &[T],
        h: T,
        steps: usize,
    ) -> Result<Trajectory<T>, IntegrationError>
    where
        T: Scalar,
        S: DynamicalSystem<T>,
    {
        let dim = system.dimension();
        validate_inputs(dim, t0, h)?;
        if s0.len() != dim {
            return Err(IntegrationError::DimensionMismatch {
                what: "initial state",
                expected: dim,
                actual: s0.len(),
            });
        }

        let times = time_grid(t0, h, steps);
        let mut states = DMatrix::from_element(dim, steps + 1, T::zero());
        states.column_mut(0).copy_from_slice(s0);

        let mut stepper = self.method.build(dim);
        let mut state = s0.to_vec();
        for n in 0..steps {
            stepper.step(system, times[n], &mut state, h);
            states.column_mut(n + 1).copy_from_slice(&state);
        }

        Ok(Trajectory::new(times, states))
    }

    /// Integrates one trajectory per initial state, all on the same grid.
    pub fn integrate_many<T, S>(
        &self,
        system: &S,
        t0: T,
        initial_states: &[Vec<T>],
        h: T,
        steps: usize,
    ) -> Result<Vec<Trajectory<T>>, IntegrationError>
    where
        T: Scalar,
        S: DynamicalSystem<T>,
    {
        initial_states
            .iter()
            .map(|s0| self.integrate(system, t0, s0, h, steps))
            .collect()
    }
}

impl From<Method> for StateIntegrator {
    fn from(method: Method) -> Self {
        Self::new(method)
    }
}

impl IntegratorSettings {
    /// Runs these settings against `system` from `(t0, s0)`.
    pub fn run<S>(
        &self,
        system: &S,
        t0: f64,
        s0: &[f64],
    ) -> Result<Trajectory<f64>, IntegrationError>
    where
        S: DynamicalSystem<f64>,
    {
        StateIntegrator::new(self.method).integrate(system, t0, s0, self.step_size, self.steps)
    }
}

pub(crate) fn validate_inputs<T: Scalar>(dim: usize, t0: T, h: T) -> Result<(), IntegrationError> {
    if dim == 0 {
        return Err(IntegrationError::ZeroDimension);
    }
    if !t0.is_finite() {
        return Err(IntegrationError::InvalidInitialTime);
    }
    if !h.is_finite() {
        return Err(IntegrationError::InvalidStepSize);
    }
    Ok(())
}

/// Integrates `f(t, s, out)` with the method named by `method`
/// ("Euler", "RK2" or "RK4").
///
/// `dim` is the declared state dimension; `s0` must have that length.
pub fn integrate<T, F>(
    f: F,
    dim: usize,
    t0: T,
    s0: &[T],
    h: T,
    steps: usize,
    method: &str,
) -> Result<Trajectory<T>, IntegrationError>
where
    T: Scalar,
    F: Fn(T, &[T], &mut [T]),
{
    let method: Method = method.parse()?;
    let system = FnSystem::new(dim, f);
    StateIntegrator::new(method).integrate(&system, t0, s0, h, steps)
}
