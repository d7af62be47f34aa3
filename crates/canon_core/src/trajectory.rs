//! Trajectory containers returned by the integrators.
//!
//! States are stored column-wise in a `dim × (steps + 1)` matrix, so the
//! state at grid index `n` is a contiguous slice.

use crate::{error::IntegrationError, traits::Scalar};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Builds the uniform grid `t0 + n*h` for `n = 0..=steps`.
///
/// Each entry is computed from its index rather than by repeated addition, so
/// `grid[n] == t0 + n*h` holds exactly.
pub fn time_grid<T: Scalar>(t0: T, h: T, steps: usize) -> Vec<T> {
    (0..=steps).map(|n| t0 + T::from_index(n) * h).collect()
}

/// Returns the index of the first column containing a NaN or infinity.
fn first_non_finite_column<T: Scalar>(matrices: &[&DMatrix<T>]) -> Option<usize> {
    let columns = matrices.first().map_or(0, |m| m.ncols());
    (0..columns).find(|&n| {
        matrices
            .iter()
            .any(|m| m.column(n).iter().any(|value| !value.is_finite()))
    })
}

fn column_slice<T: Scalar>(matrix: &DMatrix<T>, index: usize) -> &[T] {
    let dim = matrix.nrows();
    &matrix.as_slice()[index * dim..(index + 1) * dim]
}

/// Checks the shape invariants shared by both trajectory types.
fn check_grid<T: Scalar>(
    times: &[T],
    matrix: &DMatrix<T>,
    what: &str,
) -> Result<(), IntegrationError> {
    if times.is_empty() {
        return Err(IntegrationError::MalformedTrajectory(
            "time grid is empty".to_string(),
        ));
    }
    if matrix.nrows() == 0 {
        return Err(IntegrationError::MalformedTrajectory(format!(
            "{what} have zero dimension"
        )));
    }
    if matrix.ncols() != times.len() {
        return Err(IntegrationError::MalformedTrajectory(format!(
            "{} times but {} {what}",
            times.len(),
            matrix.ncols()
        )));
    }
    Ok(())
}

/// Serialized form of [`Trajectory`]. The non-finite flag is recomputed on load.
#[derive(Deserialize)]
struct RawTrajectory<T: Scalar> {
    times: Vec<T>,
    states: DMatrix<T>,
}

impl<T: Scalar> TryFrom<RawTrajectory<T>> for Trajectory<T> {
    type Error = IntegrationError;

    fn try_from(raw: RawTrajectory<T>) -> Result<Self, Self::Error> {
        check_grid(&raw.times, &raw.states, "states")?;
        Ok(Self::new(raw.times, raw.states))
    }
}

/// Time grid plus one state per grid point.
///
/// Always holds at least the initial point, with one state column per time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawTrajectory<T>",
    bound(deserialize = "T: Scalar + Deserialize<'de>")
)]
pub struct Trajectory<T: Scalar> {
    times: Vec<T>,
    states: DMatrix<T>,
    first_non_finite: Option<usize>,
}

impl<T: Scalar> Trajectory<T> {
    /// Wraps a filled grid and state matrix. `states` must have one column per time.
    pub(crate) fn new(times: Vec<T>, states: DMatrix<T>) -> Self {
        debug_assert_eq!(times.len(), states.ncols());
        let first_non_finite = first_non_finite_column(&[&states]);
        Self {
            times,
            states,
            first_non_finite,
        }
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Dimension of each state.
    pub fn dimension(&self) -> usize {
        self.states.nrows()
    }

    /// Number of grid points (steps + 1).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: a trajectory holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of integration steps taken.
    pub fn steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// State at grid index `n`.
    ///
    /// # Panics
    /// Panics if `n >= self.len()`.
    pub fn state(&self, n: usize) -> &[T] {
        column_slice(&self.states, n)
    }

    /// The state at grid index `n` as a scalar, for one-dimensional systems.
    /// Returns `None` for higher dimensions or an out-of-range index.
    pub fn scalar(&self, n: usize) -> Option<T> {
        if self.dimension() == 1 && n < self.len() {
            Some(self.states[(0, n)])
        } else {
            None
        }
    }

    pub fn last_state(&self) -> &[T] {
        self.state(self.steps())
    }

    /// Iterates over `(time, state)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[T])> + '_ {
        self.times
            .iter()
            .enumerate()
            .map(move |(n, &t)| (t, self.state(n)))
    }

    /// All states, one column per grid point.
    pub fn states(&self) -> &DMatrix<T> {
        &self.states
    }

    /// Grid index of the first state containing NaN or infinity, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.first_non_finite
    }

    pub fn into_parts(self) -> (Vec<T>, DMatrix<T>) {
        (self.times, self.states)
    }
}

/// Serialized form of [`PhaseTrajectory`].
#[derive(Deserialize)]
struct RawPhaseTrajectory<T: Scalar> {
    times: Vec<T>,
    positions: DMatrix<T>,
    momenta: DMatrix<T>,
}

impl<T: Scalar> TryFrom<RawPhaseTrajectory<T>> for PhaseTrajectory<T> {
    type Error = IntegrationError;

    fn try_from(raw: RawPhaseTrajectory<T>) -> Result<Self, Self::Error> {
        check_grid(&raw.times, &raw.positions, "positions")?;
        if raw.positions.shape() != raw.momenta.shape() {
            return Err(IntegrationError::MalformedTrajectory(format!(
                "positions are {:?} but momenta are {:?}",
                raw.positions.shape(),
                raw.momenta.shape()
            )));
        }
        Ok(Self::new(raw.times, raw.positions, raw.momenta))
    }
}

/// Time grid plus positions and momenta per grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawPhaseTrajectory<T>",
    bound(deserialize = "T: Scalar + Deserialize<'de>")
)]
pub struct PhaseTrajectory<T: Scalar> {
    times: Vec<T>,
    positions: DMatrix<T>,
    momenta: DMatrix<T>,
    first_non_finite: Option<usize>,
}

impl<T: Scalar> PhaseTrajectory<T> {
    pub(crate) fn new(times: Vec<T>, positions: DMatrix<T>, momenta: DMatrix<T>) -> Self {
        debug_assert_eq!(times.len(), positions.ncols());
        debug_assert_eq!(positions.shape(), momenta.shape());
        let first_non_finite = first_non_finite_column(&[&positions, &momenta]);
        Self {
            times,
            positions,
            momenta,
            first_non_finite,
        }
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }

    pub fn dimension(&self) -> usize {
        self.positions.nrows()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false, as for [`Trajectory::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Position at grid index `n`. Panics if out of range.
    pub fn position(&self, n: usize) -> &[T] {
        column_slice(&self.positions, n)
    }

    /// Momentum at grid index `n`. Panics if out of range.
    pub fn momentum(&self, n: usize) -> &[T] {
        column_slice(&self.momenta, n)
    }

    /// `(q, p)` at grid index `n` as scalars, for one-dimensional systems.
    pub fn scalar(&self, n: usize) -> Option<(T, T)> {
        if self.dimension() == 1 && n < self.len() {
            Some((self.positions[(0, n)], self.momenta[(0, n)]))
        } else {
            None
        }
    }

    pub fn last_position(&self) -> &[T] {
        self.position(self.steps())
    }

    pub fn last_momentum(&self) -> &[T] {
        self.momentum(self.steps())
    }

    /// Iterates over `(time, q, p)` in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[T], &[T])> + '_ {
        self.times
            .iter()
            .enumerate()
            .map(move |(n, &t)| (t, self.position(n), self.momentum(n)))
    }

    pub fn positions(&self) -> &DMatrix<T> {
        &self.positions
    }

    pub fn momenta(&self) -> &DMatrix<T> {
        &self.momenta
    }

    pub fn first_non_finite(&self) -> Option<usize> {
        self.first_non_finite
    }

    /// Evaluates `hamiltonian(t, q, p)` along the trajectory and returns
    /// `|H(n) - H(0)|` for every grid index.
    pub fn energy_errors<H>(&self, hamiltonian: H) -> Vec<T>
    where
        H: Fn(T, &[T], &[T]) -> T,
    {
        let energies: Vec<T> = self.iter().map(|(t, q, p)| hamiltonian(t, q, p)).collect();
        match energies.first() {
            Some(&initial) => energies.iter().map(|&e| (e - initial).abs()).collect(),
            None => Vec::new(),
        }
    }

    pub fn into_parts(self) -> (Vec<T>, DMatrix<T>, DMatrix<T>) {
        (self.times, self.positions, self.momenta)
    }
}
