//! Closure-backed systems, for callers that do not want to define a type.

use crate::traits::{DynamicalSystem, HamiltonianSystem, Scalar};
use std::marker::PhantomData;

/// Wraps `f(t, s, out)` as a [`DynamicalSystem`] of fixed dimension.
pub struct FnSystem<T, F> {
    dim: usize,
    f: F,
    _scalar: PhantomData<fn(T)>,
}

impl<T, F> FnSystem<T, F>
where
    T: Scalar,
    F: Fn(T, &[T], &mut [T]),
{
    pub fn new(dim: usize, f: F) -> Self {
        Self {
            dim,
            f,
            _scalar: PhantomData,
        }
    }
}

impl<T, F> DynamicalSystem<T> for FnSystem<T, F>
where
    T: Scalar,
    F: Fn(T, &[T], &mut [T]),
{
    fn dimension(&self) -> usize {
        self.dim
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        (self.f)(t, x, out)
    }
}

/// Wraps `dq_h(t, q, p, out)` and `dp_h(t, q, p, out)` as a [`HamiltonianSystem`].
pub struct FnHamiltonian<T, Dq, Dp> {
    dim: usize,
    dq_h: Dq,
    dp_h: Dp,
    _scalar: PhantomData<fn(T)>,
}

impl<T, Dq, Dp> FnHamiltonian<T, Dq, Dp>
where
    T: Scalar,
    Dq: Fn(T, &[T], &[T], &mut [T]),
    Dp: Fn(T, &[T], &[T], &mut [T]),
{
    pub fn new(dim: usize, dq_h: Dq, dp_h: Dp) -> Self {
        Self {
            dim,
            dq_h,
            dp_h,
            _scalar: PhantomData,
        }
    }
}

impl<T, Dq, Dp> HamiltonianSystem<T> for FnHamiltonian<T, Dq, Dp>
where
    T: Scalar,
    Dq: Fn(T, &[T], &[T], &mut [T]),
    Dp: Fn(T, &[T], &[T], &mut [T]),
{
    fn dimension(&self) -> usize {
        self.dim
    }

    fn dq_h(&self, t: T, q: &[T], p: &[T], out: &mut [T]) {
        (self.dq_h)(t, q, p, out)
    }

    fn dp_h(&self, t: T, q: &[T], p: &[T], out: &mut [T]) {
        (self.dp_h)(t, q, p, out)
    }
}

/// Views a Hamiltonian system as a first-order system on the stacked state `[q, p]`.
pub struct CanonicalFlow<'a, S> {
    system: &'a S,
}

impl<'a, S> CanonicalFlow<'a, S> {
    pub fn new(system: &'a S) -> Self {
        Self { system }
    }
}

impl<'a, T, S> DynamicalSystem<T> for CanonicalFlow<'a, S>
where
    T: Scalar,
    S: HamiltonianSystem<T>,
{
    fn dimension(&self) -> usize {
        2 * self.system.dimension()
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        let dim = self.system.dimension();
        let (q, p) = x.split_at(dim);
        let (dq, dp) = out.split_at_mut(dim);
        self.system.dp_h(t, q, p, dq);
        self.system.dq_h(t, q, p, dp);
        for value in dp.iter_mut() {
            *value = -*value;
        }
    }
}
