//! The `canon_core` crate computes fixed-step trajectories of dynamical systems.
//! It is generic over the scalar type (`f64`, `f32`, ...) and treats scalar
//! and vector states alike: a scalar state is a state of dimension 1.
//!
//! Key components:
//! - **Traits**: `Scalar`, `DynamicalSystem` (ds/dt = f(t, s)), `HamiltonianSystem` (∂H/∂q, ∂H/∂p), `Steppable` / `HamiltonianSteppable` (one-step solvers).
//! - **Solvers**: Euler, midpoint RK2 and RK4 for generic systems; the same three on coupled (q, p) pairs plus symplectic Euler and Störmer-Verlet.
//! - **Integrators**: `StateIntegrator` and `HamiltonianIntegrator` build the time grid and fill the trajectory.
//! - **Trajectories**: `Trajectory` and `PhaseTrajectory`, backed by nalgebra matrices.

pub mod error;
pub mod hamiltonian;
pub mod hamiltonian_solvers;
pub mod integrator;
pub mod method;
pub mod solvers;
pub mod systems;
pub mod traits;
pub mod trajectory;

pub use error::IntegrationError;
pub use hamiltonian::{integrate_hamiltonian, HamiltonianIntegrator};
pub use integrator::{integrate, StateIntegrator};
pub use method::{HamiltonianMethod, HamiltonianSettings, IntegratorSettings, Method};
pub use systems::{CanonicalFlow, FnHamiltonian, FnSystem};
pub use traits::{DynamicalSystem, HamiltonianSystem, Scalar};
pub use trajectory::{time_grid, PhaseTrajectory, Trajectory};
