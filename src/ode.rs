// ---------------------------------------------------------------------------
// Abstract ODE interface + classical 4th-order Runge-Kutta stepper
// ---------------------------------------------------------------------------

/// A first-order ODE system with a fixed number of state components.
///
/// The stepper never copies state on the system's behalf: each k-stage
/// is evaluated at `q + q_scale * delta_q`, where `delta_q` is the
/// previous stage's derivative already scaled by the full step `ds`.
/// The system reconstructs the intermediate state itself, so it stays
/// free to cache whatever it likes during evaluation.
pub trait Ode<const N: usize> {
    /// Current value of the independent variable (simulation time, s).
    fn s(&self) -> f64;

    fn set_s(&mut self, s: f64);

    /// Current state vector.
    fn q(&self) -> [f64; N];

    fn set_q(&mut self, q: [f64; N]);

    /// Right-hand side evaluated at the intermediate state
    /// `q + q_scale * delta_q`. Returns the derivative of each state
    /// component with respect to `s`.
    fn right_hand_side(
        &mut self,
        s: f64,
        q: &[f64; N],
        delta_q: &[f64; N],
        ds: f64,
        q_scale: f64,
    ) -> [f64; N];
}

/// Advance an ODE system by one classical RK4 step of size `dt`.
///
/// q_next = q + (dt/6)(k1 + 2·k2 + 2·k3 + k4), s_next = s + dt.
pub fn rk4_step<const N: usize, O: Ode<N>>(ode: &mut O, dt: f64) {
    let s = ode.s();
    let q = ode.q();

    let zero = [0.0; N];
    let k1 = ode.right_hand_side(s, &q, &zero, dt, 0.0);
    let k2 = ode.right_hand_side(s + dt * 0.5, &q, &scaled(&k1, dt), dt, 0.5);
    let k3 = ode.right_hand_side(s + dt * 0.5, &q, &scaled(&k2, dt), dt, 0.5);
    let k4 = ode.right_hand_side(s + dt, &q, &scaled(&k3, dt), dt, 1.0);

    let mut next = q;
    for i in 0..N {
        next[i] += (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }

    ode.set_q(next);
    ode.set_s(s + dt);
}

fn scaled<const N: usize>(k: &[f64; N], dt: f64) -> [f64; N] {
    let mut out = *k;
    for v in &mut out {
        *v *= dt;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// x'' = a, integrated as [v, x] with constant acceleration.
    struct ConstantAccel {
        s: f64,
        q: [f64; 2],
        accel: f64,
    }

    impl Ode<2> for ConstantAccel {
        fn s(&self) -> f64 {
            self.s
        }
        fn set_s(&mut self, s: f64) {
            self.s = s;
        }
        fn q(&self) -> [f64; 2] {
            self.q
        }
        fn set_q(&mut self, q: [f64; 2]) {
            self.q = q;
        }
        fn right_hand_side(
            &mut self,
            _s: f64,
            q: &[f64; 2],
            delta_q: &[f64; 2],
            _ds: f64,
            q_scale: f64,
        ) -> [f64; 2] {
            let v = q[0] + q_scale * delta_q[0];
            [self.accel, v]
        }
    }

    /// x' = x, exact solution e^s.
    struct Exponential {
        s: f64,
        q: [f64; 1],
    }

    impl Ode<1> for Exponential {
        fn s(&self) -> f64 {
            self.s
        }
        fn set_s(&mut self, s: f64) {
            self.s = s;
        }
        fn q(&self) -> [f64; 1] {
            self.q
        }
        fn set_q(&mut self, q: [f64; 1]) {
            self.q = q;
        }
        fn right_hand_side(
            &mut self,
            _s: f64,
            q: &[f64; 1],
            delta_q: &[f64; 1],
            _ds: f64,
            q_scale: f64,
        ) -> [f64; 1] {
            [q[0] + q_scale * delta_q[0]]
        }
    }

    #[test]
    fn constant_acceleration_matches_closed_form() {
        let mut ode = ConstantAccel {
            s: 0.0,
            q: [0.0, 0.0],
            accel: 9.80665,
        };
        let dt = 0.01;
        for _ in 0..1000 {
            rk4_step(&mut ode, dt);
        }
        let t = ode.s();
        assert_relative_eq!(t, 10.0, epsilon = 1e-9);
        // v = a·t, x = a·t²/2 — RK4 is exact for polynomial RHS up to
        // rounding.
        assert_relative_eq!(ode.q()[0], 9.80665 * t, epsilon = 1e-9);
        assert_relative_eq!(ode.q()[1], 0.5 * 9.80665 * t * t, epsilon = 1e-6);
    }

    #[test]
    fn exponential_within_fourth_order_tolerance() {
        let mut ode = Exponential { s: 0.0, q: [1.0] };
        let dt = 0.05;
        for _ in 0..20 {
            rk4_step(&mut ode, dt);
        }
        assert_relative_eq!(ode.q()[0], 1.0_f64.exp(), epsilon = 1e-6);
    }

    #[test]
    fn independent_variable_advances_by_dt() {
        let mut ode = ConstantAccel {
            s: 3.0,
            q: [1.0, 2.0],
            accel: 0.0,
        };
        rk4_step(&mut ode, 0.25);
        assert_relative_eq!(ode.s(), 3.25, epsilon = 1e-12);
    }
}
