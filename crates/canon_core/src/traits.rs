use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Converts an `f64` constant, yielding NaN if the type cannot represent it.
    fn lit(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }

    /// Converts a grid index into the scalar type.
    fn from_index(index: usize) -> Self {
        Self::from_usize(index).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Represents a first-order system ds/dt = f(t, s).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer to write dx/dt
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// Represents a system in canonical coordinates, described by the partial
/// derivatives of its Hamiltonian H(t, q, p).
///
/// Every scheme calls both partials with `(t, q, p)`; autonomous systems
/// simply ignore `t`.
pub trait HamiltonianSystem<T: Scalar> {
    /// Returns the dimension of configuration space (length of q and of p).
    fn dimension(&self) -> usize;

    /// Writes ∂H/∂q evaluated at (t, q, p) into `out`.
    fn dq_h(&self, t: T, q: &[T], p: &[T], out: &mut [T]);

    /// Writes ∂H/∂p evaluated at (t, q, p) into `out`.
    fn dp_h(&self, t: T, q: &[T], p: &[T], out: &mut [T]);
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt starting at time t.
    /// state: current state (updated in place)
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: T, state: &mut [T], dt: T);
}

/// A trait for solvers that advance a position/momentum pair.
pub trait HamiltonianSteppable<T: Scalar> {
    /// Performs one step of size dt starting at time t.
    /// q, p: current position and momentum (updated in place)
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    );
}
