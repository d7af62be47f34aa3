//! Steppers for systems in canonical coordinates.
//!
//! The Runge-Kutta family here integrates the coupled pair
//! dq/dt = ∂H/∂p, dp/dt = -∂H/∂q, evaluating both partials at the same
//! stage point. The symplectic schemes update position first and feed the
//! new position into the momentum update.

use crate::traits::{HamiltonianSteppable, HamiltonianSystem, Scalar};

/// Velocity and force buffers for one Runge-Kutta stage.
struct Stage<T: Scalar> {
    dq: Vec<T>,
    dp: Vec<T>,
}

impl<T: Scalar> Stage<T> {
    fn new(dim: usize) -> Self {
        Self {
            dq: vec![T::zero(); dim],
            dp: vec![T::zero(); dim],
        }
    }

    /// dq = ∂H/∂p, dp = -∂H/∂q, both at (t, q, p).
    fn evaluate(&mut self, system: &impl HamiltonianSystem<T>, t: T, q: &[T], p: &[T]) {
        system.dp_h(t, q, p, &mut self.dq);
        system.dq_h(t, q, p, &mut self.dp);
        for value in &mut self.dp {
            *value = -*value;
        }
    }
}

/// Forward Euler on the coupled (q, p) pair.
pub struct PairEuler<T: Scalar> {
    k1: Stage<T>,
}

impl<T: Scalar> PairEuler<T> {
    pub fn new(dim: usize) -> Self {
        Self { k1: Stage::new(dim) }
    }
}

impl<T: Scalar> HamiltonianSteppable<T> for PairEuler<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        self.k1.evaluate(system, t, q, p);
        for i in 0..q.len() {
            q[i] = q[i] + dt * self.k1.dq[i];
            p[i] = p[i] + dt * self.k1.dp[i];
        }
    }
}

/// Explicit midpoint (2-stage Runge-Kutta) on the coupled (q, p) pair.
pub struct PairMidpoint<T: Scalar> {
    k1: Stage<T>,
    k2: Stage<T>,
    tmp_q: Vec<T>,
    tmp_p: Vec<T>,
}

impl<T: Scalar> PairMidpoint<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: Stage::new(dim),
            k2: Stage::new(dim),
            tmp_q: vec![T::zero(); dim],
            tmp_p: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> HamiltonianSteppable<T> for PairMidpoint<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        let half = T::lit(0.5);

        self.k1.evaluate(system, t, q, p);

        for i in 0..q.len() {
            self.tmp_q[i] = q[i] + dt * self.k1.dq[i] * half;
            self.tmp_p[i] = p[i] + dt * self.k1.dp[i] * half;
        }
        self.k2
            .evaluate(system, t + dt * half, &self.tmp_q, &self.tmp_p);

        for i in 0..q.len() {
            q[i] = q[i] + dt * self.k2.dq[i];
            p[i] = p[i] + dt * self.k2.dp[i];
        }
    }
}

/// Classic Runge-Kutta 4th order on the coupled (q, p) pair.
pub struct PairRK4<T: Scalar> {
    k1: Stage<T>,
    k2: Stage<T>,
    k3: Stage<T>,
    k4: Stage<T>,
    tmp_q: Vec<T>,
    tmp_p: Vec<T>,
}

impl<T: Scalar> PairRK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: Stage::new(dim),
            k2: Stage::new(dim),
            k3: Stage::new(dim),
            k4: Stage::new(dim),
            tmp_q: vec![T::zero(); dim],
            tmp_p: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> HamiltonianSteppable<T> for PairRK4<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        let half = T::lit(0.5);
        let sixth = T::lit(1.0 / 6.0);
        let two = T::lit(2.0);

        self.k1.evaluate(system, t, q, p);

        for i in 0..q.len() {
            self.tmp_q[i] = q[i] + dt * self.k1.dq[i] * half;
            self.tmp_p[i] = p[i] + dt * self.k1.dp[i] * half;
        }
        self.k2
            .evaluate(system, t + dt * half, &self.tmp_q, &self.tmp_p);

        for i in 0..q.len() {
            self.tmp_q[i] = q[i] + dt * self.k2.dq[i] * half;
            self.tmp_p[i] = p[i] + dt * self.k2.dp[i] * half;
        }
        self.k3
            .evaluate(system, t + dt * half, &self.tmp_q, &self.tmp_p);

        for i in 0..q.len() {
            self.tmp_q[i] = q[i] + dt * self.k3.dq[i];
            self.tmp_p[i] = p[i] + dt * self.k3.dp[i];
        }
        self.k4.evaluate(system, t + dt, &self.tmp_q, &self.tmp_p);

        for i in 0..q.len() {
            q[i] = q[i]
                + dt * sixth
                    * (self.k1.dq[i] + two * self.k2.dq[i] + two * self.k3.dq[i] + self.k4.dq[i]);
            p[i] = p[i]
                + dt * sixth
                    * (self.k1.dp[i] + two * self.k2.dp[i] + two * self.k3.dp[i] + self.k4.dp[i]);
        }
    }
}

/// Semi-implicit (symplectic) Euler.
///
/// ```text
/// q_next = q + dt * ∂H/∂p(t, q, p)
/// p_next = p - dt * ∂H/∂q(t, q_next, p)
/// ```
///
/// The momentum update must see the already-advanced position.
pub struct SymplecticEuler<T: Scalar> {
    velocity: Vec<T>,
    force: Vec<T>,
}

impl<T: Scalar> SymplecticEuler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            velocity: vec![T::zero(); dim],
            force: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> HamiltonianSteppable<T> for SymplecticEuler<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        system.dp_h(t, q, p, &mut self.velocity);
        for i in 0..q.len() {
            q[i] = q[i] + dt * self.velocity[i];
        }

        system.dq_h(t, q, p, &mut self.force);
        for i in 0..p.len() {
            p[i] = p[i] - dt * self.force[i];
        }
    }
}

/// Störmer-Verlet (leapfrog) in its compressed one-step form.
///
/// ```text
/// p_half = p - dt/2 * ∂H/∂q(t, q, p)
/// q_next = q + dt * ∂H/∂p(t, q, p_half)
/// p_next = p_half - dt/2 * ∂H/∂q(t, q_next, p)
/// ```
///
/// The closing half kick evaluates ∂H/∂q with the step's starting momentum,
/// not `p_half`. For separable Hamiltonians the two coincide.
pub struct StormerVerlet<T: Scalar> {
    p_half: Vec<T>,
    velocity: Vec<T>,
    force: Vec<T>,
}

impl<T: Scalar> StormerVerlet<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            p_half: vec![z; dim],
            velocity: vec![z; dim],
            force: vec![z; dim],
        }
    }
}

impl<T: Scalar> HamiltonianSteppable<T> for StormerVerlet<T> {
    fn step(
        &mut self,
        system: &impl HamiltonianSystem<T>,
        t: T,
        q: &mut [T],
        p: &mut [T],
        dt: T,
    ) {
        let half_dt = dt * T::lit(0.5);

        system.dq_h(t, q, p, &mut self.force);
        for i in 0..p.len() {
            self.p_half[i] = p[i] - half_dt * self.force[i];
        }

        system.dp_h(t, q, &self.p_half, &mut self.velocity);
        for i in 0..q.len() {
            q[i] = q[i] + dt * self.velocity[i];
        }

        // p still holds the starting momentum here.
        system.dq_h(t, q, p, &mut self.force);
        for i in 0..p.len() {
            p[i] = self.p_half[i] - half_dt * self.force[i];
        }
    }
}
