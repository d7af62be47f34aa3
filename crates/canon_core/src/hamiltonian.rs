use crate::{
    error::IntegrationError,
    hamiltonian_solvers::{PairEuler, PairMidpoint, PairRK4, StormerVerlet, SymplecticEuler},
    integrator::validate_inputs,
    method::{HamiltonianMethod, HamiltonianSettings},
    systems::FnHamiltonian,
    traits::{HamiltonianSteppable, HamiltonianSystem, Scalar},
    trajectory::{time_grid, PhaseTrajectory},
};
use nalgebra::DMatrix;

impl HamiltonianMethod {
    fn build<T: Scalar>(self, dim: usize) -> InternalStepper<T> {
        match self {
            HamiltonianMethod::Euler => InternalStepper::Euler(PairEuler::new(dim)),
            HamiltonianMethod::Rk2 => InternalStepper::Rk2(PairMidpoint::new(dim)),
            HamiltonianMethod::Rk4 => InternalStepper::Rk4(PairRK4::new(dim)),
            HamiltonianMethod::SymplecticEuler => {
                InternalStepper::SymplecticEuler(SymplecticEuler::new(dim))
            }
            HamiltonianMethod::StormerVerlet => {
                InternalStepper::StormerVerlet(StormerVerlet::new(dim))
            }
        }
    }
}

enum InternalStepper<T: Scalar> {
    Euler(PairEuler<T>),
    Rk2(PairMidpoint<T>),
    Rk4(PairRK4<T>),
    SymplecticEuler(SymplecticEuler<T>),
    StormerVerlet(StormerVerlet<T>),
}

impl<T: Scalar> InternalStepper<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        match self {
            InternalStepper::Euler(s) => s.step(system, t, q, p, dt),
            InternalStepper::Rk2(s) => s.step(system, t, q, p, dt),
            InternalStepper::Rk4(s) => s.step(system, t, q, p, dt),
            InternalStepper::SymplecticEuler(s) => s.step(system, t, q, p, dt),
            InternalStepper::StormerVerlet(s) => s.step(system, t, q, p, dt),
        }
    }
}

/// Fixed-step integrator for systems in canonical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HamiltonianIntegrator {
    method: HamiltonianMethod,
}

impl HamiltonianIntegrator {
    pub fn new(method: HamiltonianMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> HamiltonianMethod {
        self.method
    }

    /// Integrates `steps` steps of size `h` from `(t0, q0, p0)`.
    ///
    /// Positions and momenta share the grid `t0 + n*h`; index 0 holds `q0`
    /// and `p0` unchanged.
    pub fn integrate<T, S>(
        &self,
        system: &S,
        t0: T,
        q0: &[T],
        p0: &[T],
        h: T,
        steps: usize,
    ) -> Result<PhaseTrajectory<T>, IntegrationError>
    where
        T: Scalar,
        S: HamiltonianSystem<T>,
    {
        let dim = system.dimension();
        validate_inputs(dim, t0, h)?;
        for (what, initial) in [("initial position", q0), ("initial momentum", p0)] {
            if initial.len() != dim {
                return Err(IntegrationError::DimensionMismatch {
                    what,
                    expected: dim,
                    actual: initial.len(),
                });
            }
        }

        let times = time_grid(t0, h, steps);
        let mut positions = DMatrix::from_element(dim, steps + 1, T::zero());
        let mut momenta = DMatrix::from_element(dim, steps + 1, T::zero());
        positions.column_mut(0).copy_from_slice(q0);
        momenta.column_mut(0).copy_from_slice(p0);

        let mut stepper = self.method.build(dim);
        let mut q = q0.to_vec();
        let mut p = p0.to_vec();
        for n in 0..steps {
            stepper.step(system, times[n], &mut q, &mut p, h);
            positions.column_mut(n + 1).copy_from_slice(&q);
            momenta.column_mut(n + 1).copy_from_slice(&p);
        }

        Ok(PhaseTrajectory::new(times, positions, momenta))
    }
}

impl From<HamiltonianMethod> for HamiltonianIntegrator {
    fn from(method: HamiltonianMethod) -> Self {
        Self::new(method)
    }
}

impl HamiltonianSettings {
    /// Runs these settings against `system` from `(t0, q0, p0)`.
    pub fn run<S>(
        &self,
        system: &S,
        t0: f64,
        q0: &[f64],
        p0: &[f64],
    ) -> Result<PhaseTrajectory<f64>, IntegrationError>
    where
        S: HamiltonianSystem<f64>,
    {
        HamiltonianIntegrator::new(self.method).integrate(
            system,
            t0,
            q0,
            p0,
            self.step_size,
            self.steps,
        )
    }
}

/// Integrates the canonical equations given ∂H/∂q and ∂H/∂p as closures
/// `(t, q, p, out)`, with the method named by `method`
/// ("Euler", "RK2", "RK4", "SE" or "SV").
#[allow(clippy::too_many_arguments)]
pub fn integrate_hamiltonian<T, Dq, Dp>(
    dq_h: Dq,
    dp_h: Dp,
    dim: usize,
    t0: T,
    q0: &[T],
    p0: &[T],
    h: T,
    steps: usize,
    method: &str,
) -> Result<PhaseTrajectory<T>, IntegrationError>
where
    T: Scalar,
    Dq: Fn(T, &[T], &[T], &mut [T]),
    Dp: Fn(T, &[T], &[T], &mut [T]),
{
    let method: HamiltonianMethod = method.parse()?;
    let system = FnHamiltonian::new(dim, dq_h, dp_h);
    HamiltonianIntegrator::new(method).integrate(&system, t0, q0, p0, h, steps)
}

#[cfg(test)]
mod tests {
    use super::{integrate_hamiltonian, HamiltonianIntegrator};
    use crate::error::IntegrationError;
    use crate::integrator::StateIntegrator;
    use crate::method::{HamiltonianMethod, HamiltonianSettings, Method};
    use crate::systems::CanonicalFlow;
    use crate::traits::HamiltonianSystem;
    use crate::trajectory::PhaseTrajectory;

    /// H = (|q|^2 + |p|^2) / 2 in any dimension.
    struct Oscillator {
        dim: usize,
    }

    impl HamiltonianSystem<f64> for Oscillator {
        fn dimension(&self) -> usize {
            self.dim
        }

        fn dq_h(&self, _t: f64, q: &[f64], _p: &[f64], out: &mut [f64]) {
            out.copy_from_slice(q);
        }

        fn dp_h(&self, _t: f64, _q: &[f64], p: &[f64], out: &mut [f64]) {
            out.copy_from_slice(p);
        }
    }

    fn energy(_t: f64, q: &[f64], p: &[f64]) -> f64 {
        0.5 * q.iter().chain(p).map(|x| x * x).sum::<f64>()
    }

    fn oscillator_run(method: HamiltonianMethod) -> PhaseTrajectory<f64> {
        HamiltonianIntegrator::new(method)
            .integrate(&Oscillator { dim: 1 }, 0.0, &[0.0], &[1.0], 0.01, 2000)
            .expect("integration should succeed")
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T, IntegrationError>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn initial_point_and_grid_are_exact_for_every_method() {
        let system = Oscillator { dim: 3 };
        let q0 = [0.1, -0.2, 0.3];
        let p0 = [1.0, 0.5, -0.25];
        for method in HamiltonianMethod::ALL {
            let trajectory = HamiltonianIntegrator::new(method)
                .integrate(&system, -1.0, &q0, &p0, 0.02, 25)
                .expect("integration should succeed");
            assert_eq!(trajectory.len(), 26);
            assert_eq!(trajectory.position(0), &q0);
            assert_eq!(trajectory.momentum(0), &p0);
            for (n, &t) in trajectory.times().iter().enumerate() {
                assert_eq!(t, -1.0 + n as f64 * 0.02);
            }
            assert!(trajectory
                .iter()
                .all(|(_, q, p)| q.len() == 3 && p.len() == 3));
        }
    }

    #[test]
    fn one_dimensional_runs_expose_scalars() {
        let trajectory = oscillator_run(HamiltonianMethod::StormerVerlet);
        assert_eq!(trajectory.scalar(0), Some((0.0, 1.0)));
        assert!((0..trajectory.len()).all(|n| trajectory.scalar(n).is_some()));
    }

    #[test]
    fn stormer_verlet_energy_error_stays_bounded() {
        let errors = oscillator_run(HamiltonianMethod::StormerVerlet).energy_errors(energy);
        let (first_half, second_half) = errors.split_at(errors.len() / 2);
        let max = |values: &[f64]| values.iter().cloned().fold(0.0, f64::max);

        assert!(max(&errors) < 1e-4);
        // No secular growth: the late error is no worse than the early error.
        assert!(max(second_half) < 1.5 * max(first_half));
    }

    #[test]
    fn symplectic_euler_energy_error_stays_bounded() {
        let errors = oscillator_run(HamiltonianMethod::SymplecticEuler).energy_errors(energy);
        let max = errors.iter().cloned().fold(0.0, f64::max);
        assert!(max < 1e-2);
    }

    #[test]
    fn euler_energy_drifts_monotonically() {
        let errors = oscillator_run(HamiltonianMethod::Euler).energy_errors(energy);
        assert!(errors.windows(2).all(|pair| pair[1] >= pair[0]));

        let sv = oscillator_run(HamiltonianMethod::StormerVerlet).energy_errors(energy);
        let last = errors[errors.len() - 1];
        assert!(last > 0.1);
        assert!(last > 1000.0 * sv[sv.len() - 1]);
    }

    #[test]
    fn rk4_energy_error_grows_over_the_run() {
        let trajectory = oscillator_run(HamiltonianMethod::Rk4);
        let errors = trajectory.energy_errors(energy);
        let last = errors[errors.len() - 1];

        // Energy decays by a factor of about (1 - h^6/72) per step.
        assert!(last > 1e-12);
        assert!(last > 5.0 * errors[200]);
        let (q, p) = trajectory.scalar(2000).expect("one-dimensional");
        assert!(energy(0.0, &[q], &[p]) < 0.5);
    }

    #[test]
    fn zero_steps_returns_initial_point_only() {
        for method in HamiltonianMethod::ALL {
            let trajectory = HamiltonianIntegrator::new(method)
                .integrate(&Oscillator { dim: 2 }, 3.0, &[1.0, 2.0], &[-1.0, 0.5], 0.1, 0)
                .expect("integration should succeed");
            assert_eq!(trajectory.times(), &[3.0]);
            assert_eq!(trajectory.last_position(), &[1.0, 2.0]);
            assert_eq!(trajectory.last_momentum(), &[-1.0, 0.5]);
            assert_eq!(trajectory.first_non_finite(), None);
        }
    }

    #[test]
    fn non_finite_partials_propagate_and_are_flagged() {
        // ∂H/∂q blows up at t = 0.2, which is the kick of step 2.
        let trajectory = integrate_hamiltonian(
            |t: f64, _q: &[f64], _p: &[f64], out: &mut [f64]| out[0] = 1.0 / (t - 0.2),
            |_t: f64, _q: &[f64], p: &[f64], out: &mut [f64]| out[0] = p[0],
            1,
            0.0,
            &[0.0],
            &[0.0],
            0.1,
            5,
            "SE",
        )
        .expect("integration should succeed");
        assert_eq!(trajectory.first_non_finite(), Some(3));
        assert!(trajectory.momentum(3)[0].is_infinite());
        assert!(!trajectory.last_position()[0].is_finite());
    }

    #[test]
    fn runge_kutta_schemes_converge_to_exact_phase() {
        for (method, tolerance) in [
            (HamiltonianMethod::Euler, 1e-2),
            (HamiltonianMethod::Rk2, 1e-4),
            (HamiltonianMethod::Rk4, 1e-9),
        ] {
            let trajectory = HamiltonianIntegrator::new(method)
                .integrate(&Oscillator { dim: 1 }, 0.0, &[0.0], &[1.0], 0.01, 100)
                .expect("integration should succeed");
            let (q, p) = trajectory.scalar(100).expect("one-dimensional");
            assert!((q - 1.0_f64.sin()).abs() < tolerance, "{method} q error");
            assert!((p - 1.0_f64.cos()).abs() < tolerance, "{method} p error");
        }
    }

    #[test]
    fn runge_kutta_pair_matches_stacked_state_integration() {
        let system = Oscillator { dim: 2 };
        let pair = HamiltonianIntegrator::new(HamiltonianMethod::Rk4)
            .integrate(&system, 0.0, &[1.0, 0.0], &[0.0, 0.5], 0.05, 40)
            .expect("integration should succeed");
        let stacked = StateIntegrator::new(Method::Rk4)
            .integrate(&CanonicalFlow::new(&system), 0.0, &[1.0, 0.0, 0.0, 0.5], 0.05, 40)
            .expect("integration should succeed");

        for n in 0..pair.len() {
            let state = stacked.state(n);
            for i in 0..2 {
                assert!((pair.position(n)[i] - state[i]).abs() < 1e-14);
                assert!((pair.momentum(n)[i] - state[2 + i]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn closure_entry_point_passes_step_start_time_to_symplectic_schemes() {
        // ∂H/∂q = -t makes the momentum gain equal to t_n * h each step.
        let trajectory = integrate_hamiltonian(
            |t: f64, _q: &[f64], _p: &[f64], out: &mut [f64]| out[0] = -t,
            |_t: f64, _q: &[f64], _p: &[f64], out: &mut [f64]| out[0] = 0.0,
            1,
            0.0,
            &[0.0],
            &[0.0],
            0.5,
            3,
            "SE",
        )
        .expect("integration should succeed");
        let momenta: Vec<f64> = (0..4).map(|n| trajectory.momentum(n)[0]).collect();
        assert_eq!(momenta, vec![0.0, 0.0, 0.25, 0.75]);
    }

    #[test]
    fn unknown_method_name_is_rejected() {
        let result = integrate_hamiltonian(
            |_t: f64, q: &[f64], _p: &[f64], out: &mut [f64]| out[0] = q[0],
            |_t: f64, _q: &[f64], p: &[f64], out: &mut [f64]| out[0] = p[0],
            1,
            0.0,
            &[0.0],
            &[1.0],
            0.1,
            10,
            "bogus",
        );
        assert_err_contains(result, "unknown integration method");
    }

    #[test]
    fn rejects_mismatched_initial_momentum() {
        let result = HamiltonianIntegrator::new(HamiltonianMethod::StormerVerlet).integrate(
            &Oscillator { dim: 2 },
            0.0,
            &[0.0, 1.0],
            &[1.0],
            0.1,
            10,
        );
        assert_err_contains(result, "dimension mismatch: initial momentum");
    }

    #[test]
    fn settings_drive_a_run() {
        let settings = HamiltonianSettings {
            method: HamiltonianMethod::StormerVerlet,
            step_size: 0.01,
            steps: 10,
        };
        let trajectory = settings
            .run(&Oscillator { dim: 1 }, 0.0, &[0.0], &[1.0])
            .expect("run should succeed");
        assert_eq!(trajectory.steps(), 10);
        assert_eq!(HamiltonianIntegrator::from(settings.method).method(), settings.method);
    }
}
