use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Forward Euler Solver
pub struct Euler<T: Scalar> {
    k1: Vec<T>,
}

impl<T: Scalar> Euler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for Euler<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: T, state: &mut [T], dt: T) {
        // y_next = y + dt*f(t, y)
        system.apply(t, state, &mut self.k1);
        for i in 0..state.len() {
            state[i] = state[i] + dt * self.k1[i];
        }
    }
}

/// Explicit midpoint (2-stage Runge-Kutta) Solver
pub struct Midpoint<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> Midpoint<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            tmp: vec![z; dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for Midpoint<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: T, state: &mut [T], dt: T) {
        let half = T::lit(0.5);

        // k1 = f(t, y)
        system.apply(t, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t + dt * half, &self.tmp, &mut self.k2);

        // y_next = y + dt*k2
        for i in 0..state.len() {
            state[i] = state[i] + dt * self.k2[i];
        }
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            tmp: vec![z; dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: T, state: &mut [T], dt: T) {
        let half = T::lit(0.5);
        let sixth = T::lit(1.0 / 6.0);
        let two = T::lit(2.0);

        // k1 = f(t, y)
        system.apply(t, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t + dt * half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        system.apply(t + dt * half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t + dt, &self.tmp, &mut self.k4);

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }
    }
}
