use nalgebra::{Vector2, Vector3};
use thiserror::Error;

use crate::atmosphere;
use crate::components::Component;
use crate::constants::{G0, PLANET_RADIUS, P_SEA_LEVEL};
use crate::ode::{rk4_step, Ode};

// ---------------------------------------------------------------------------
// Rocket flight dynamics (planar point mass)
// ---------------------------------------------------------------------------
//
// Frame convention: the planet center sits at the origin; a rocket on
// the pad starts at distance PLANET_RADIUS from it. Flight is confined
// to the x/y plane; the z components of position and velocity are
// carried as placeholders for a future 3-D extension and stay zero.

/// State vector layout. Indices are spelled out so a raw `q` dump can
/// be read at a glance.
pub const VEL_X: usize = 0;
pub const POS_X: usize = 1;
pub const VEL_Y: usize = 2;
pub const POS_Y: usize = 3;
pub const VEL_Z: usize = 4;
pub const POS_Z: usize = 5;
pub const FUEL_MASS: usize = 6;
pub const PITCH: usize = 7;

pub const STATE_DIM: usize = 8;

#[derive(Debug, Error)]
pub enum RocketError {
    /// Thrust and fuel-flow lookup read the final stack entry, which
    /// must be the engine.
    #[error("no engine at the end of the component stack")]
    MissingEngine,
}

/// Single-stage rocket: owns the 8-component state vector and the
/// component stack, and implements the ODE right-hand side the
/// integrator consumes.
#[derive(Debug)]
pub struct Rocket {
    s: f64,
    q: [f64; STATE_DIM],
    diameter: f64, // m
    planet_center: Vector3<f64>,
    components: Vec<Component>,
    throttle: f64,

    // Memoized sum of structural masses, invalidated when the stack
    // changes.
    total_structural_mass: f64,
    structural_mass_dirty: bool,

    // Scratch outputs of the last derivative evaluation.
    altitude: f64,
    acceleration: Vector2<f64>,
    drag: f64,
    hit_ground: bool,
}

impl Rocket {
    /// A rocket on the pad: zero velocity, zero fuel (tanks add theirs
    /// at attach time), pitched straight up.
    pub fn new(diameter: f64, start_x: f64, start_y: f64) -> Self {
        let mut q = [0.0; STATE_DIM];
        q[POS_X] = start_x;
        q[POS_Y] = start_y;
        q[PITCH] = 0.5 * std::f64::consts::PI;

        Self {
            s: 0.0,
            q,
            diameter,
            planet_center: Vector3::zeros(),
            components: Vec::new(),
            throttle: 0.0,
            total_structural_mass: 0.0,
            structural_mass_dirty: true,
            altitude: 0.0,
            acceleration: Vector2::zeros(),
            drag: 0.0,
            hit_ground: false,
        }
    }

    /// Append a component to the stack. A tank registers its fuel load
    /// here, once; the engine must be attached last.
    pub fn add_component(&mut self, component: Component) {
        self.q[FUEL_MASS] += component.fuel_mass();
        self.components.push(component);
        self.structural_mass_dirty = true;
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Set the pitch angle (radians). Returns whether the value
    /// actually changed, so callers can skip redundant visual updates.
    pub fn set_pitch_angle(&mut self, angle: f64) -> bool {
        if angle != self.q[PITCH] {
            self.q[PITCH] = angle;
            return true;
        }
        false
    }

    /// Advance the state by one RK4 step of size `dt`.
    ///
    /// A grounded rocket is terminal: advancing it is a deliberate
    /// no-op. A stack without a trailing engine is a configuration
    /// error and fails here, before the first derivative evaluation.
    pub fn advance(&mut self, dt: f64) -> Result<(), RocketError> {
        if self.hit_ground {
            return Ok(());
        }
        if self.components.last().and_then(Component::as_engine).is_none() {
            return Err(RocketError::MissingEngine);
        }
        rk4_step(self, dt);
        Ok(())
    }

    // -- Query surface ------------------------------------------------------

    pub fn time(&self) -> f64 {
        self.s
    }

    /// Altitude above the surface as of the last derivative
    /// evaluation; reads 0 once the rocket is grounded.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn hit_ground(&self) -> bool {
        self.hit_ground
    }

    /// Ground-relative speed: magnitude of the planar velocity.
    pub fn speed(&self) -> f64 {
        Vector2::new(self.q[VEL_X], self.q[VEL_Y]).norm()
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.q[VEL_X], self.q[VEL_Y], self.q[VEL_Z])
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.q[POS_X], self.q[POS_Y], self.q[POS_Z])
    }

    /// Magnitude of the net acceleration from the last derivative
    /// evaluation.
    pub fn acceleration(&self) -> f64 {
        self.acceleration.norm()
    }

    /// Remaining fuel mass. Consumption is clamped at the flow-rate
    /// level, not in the state itself, so this can transiently read
    /// slightly negative between steps.
    pub fn fuel(&self) -> f64 {
        self.q[FUEL_MASS]
    }

    /// Drag force magnitude from the last derivative evaluation, N.
    pub fn drag(&self) -> f64 {
        self.drag
    }

    pub fn pitch_angle(&self) -> f64 {
        self.q[PITCH]
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    // -- Internals ----------------------------------------------------------

    /// Mass-weighted average of component drag values. Fuel mass does
    /// not affect drag, so the weighting uses structural mass only.
    fn drag_coefficient(&self) -> f64 {
        let mut numerator = 0.0;
        let mut total = 0.0;
        for component in &self.components {
            let mass = component.structural_mass();
            numerator += mass * component.drag();
            total += mass;
        }
        if total > 0.0 {
            numerator / total
        } else {
            0.0
        }
    }

    fn total_structural_mass(&mut self) -> f64 {
        if self.structural_mass_dirty {
            self.total_structural_mass = self
                .components
                .iter()
                .map(Component::structural_mass)
                .sum();
            self.structural_mass_dirty = false;
        }
        self.total_structural_mass
    }
}

impl Ode<STATE_DIM> for Rocket {
    fn s(&self) -> f64 {
        self.s
    }

    fn set_s(&mut self, s: f64) {
        self.s = s;
    }

    fn q(&self) -> [f64; STATE_DIM] {
        self.q
    }

    fn set_q(&mut self, q: [f64; STATE_DIM]) {
        self.q = q;
    }

    fn right_hand_side(
        &mut self,
        _s: f64,
        q: &[f64; STATE_DIM],
        delta_q: &[f64; STATE_DIM],
        _ds: f64,
        q_scale: f64,
    ) -> [f64; STATE_DIM] {
        // Reconstruct the intermediate k-stage state.
        let mut qi = [0.0; STATE_DIM];
        for i in 0..STATE_DIM {
            qi[i] = q[i] + q_scale * delta_q[i];
        }

        let vx = qi[VEL_X];
        let vy = qi[VEL_Y];
        let vz = qi[VEL_Z];
        let position = Vector3::new(qi[POS_X], qi[POS_Y], qi[POS_Z]);
        let fuel_mass = qi[FUEL_MASS];
        let theta = qi[PITCH];

        let total_mass = fuel_mass.max(0.0) + self.total_structural_mass();
        let v_total = (vx * vx + vy * vy + vz * vz).sqrt();

        // Altitude is derived from the distance to the planet center.
        // Dropping below the surface latches the ground hit for good.
        let to_center = self.planet_center - position;
        let raw_altitude = to_center.norm() - PLANET_RADIUS;
        if raw_altitude < 0.0 {
            self.hit_ground = true;
        }
        self.altitude = if self.hit_ground { 0.0 } else { raw_altitude };

        let air = atmosphere::us76(self.altitude);

        // Drag from the frontal area; gravity falls off with the
        // inverse square of the distance from the surface reference.
        // Both are forced to zero at or below the surface.
        let area = 0.25 * std::f64::consts::PI * self.diameter * self.diameter;
        let drag = 0.5 * self.drag_coefficient() * air.density * v_total * v_total * area;
        let g;
        if self.altitude > 0.0 {
            self.drag = drag;
            g = G0 * PLANET_RADIUS * PLANET_RADIUS
                / ((PLANET_RADIUS + self.altitude) * (PLANET_RADIUS + self.altitude));
        } else {
            self.drag = 0.0;
            g = 0.0;
        }

        let gravity_dir = if to_center.norm() > 0.0 {
            to_center.normalize()
        } else {
            Vector3::zeros()
        };

        // Engine ratings interpolated by ambient pressure. The engine
        // is validated to exist before stepping; a missing one here
        // contributes nothing.
        let pressure_ratio = air.pressure / P_SEA_LEVEL;
        let (thrust_nominal, flow_nominal) =
            match self.components.last().and_then(Component::as_engine) {
                Some(engine) => (
                    engine.thrust(pressure_ratio),
                    engine.fuel_consumption(pressure_ratio),
                ),
                None => (0.0, 0.0),
            };

        // Throttle, then clamp flow to the fuel actually left. Thrust
        // tapers with the same ratio so running dry is continuous, not
        // a hard cutoff. Zero nominal flow means no thrust at all.
        let adjusted_flow = if self.hit_ground {
            0.0
        } else {
            self.throttle * flow_nominal.min(fuel_mass).max(0.0)
        };
        let thrust = if flow_nominal > 0.0 {
            thrust_nominal * (adjusted_flow / flow_nominal)
        } else {
            0.0
        };

        let v_planar = Vector2::new(vx, vy);
        let velocity_dir = if v_planar.norm() > 0.0 {
            v_planar.normalize()
        } else {
            Vector2::zeros()
        };

        // Resolve thrust (along pitch), drag (opposing velocity) and
        // gravity (toward the planet center) in the flight plane. Lift
        // is zero in this model.
        let fx = thrust * theta.cos() - self.drag * velocity_dir.x
            + total_mass * g * gravity_dir.x;
        let fy = thrust * theta.sin() - self.drag * velocity_dir.y
            + total_mass * g * gravity_dir.y;

        self.acceleration = if total_mass > 0.0 {
            Vector2::new(fx / total_mass, fy / total_mass)
        } else {
            Vector2::zeros()
        };

        let mut dq = [0.0; STATE_DIM];
        dq[VEL_X] = self.acceleration.x;
        dq[POS_X] = vx;
        dq[VEL_Y] = self.acceleration.y;
        dq[POS_Y] = vy;
        // z stays zero in the planar model
        dq[FUEL_MASS] = -adjusted_flow;
        dq
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Crew, Engine, FuelTank};
    use approx::assert_relative_eq;

    /// 10 t test vehicle with sea-level thrust comfortably above its
    /// weight, launched vertically from the surface.
    fn test_rocket() -> Rocket {
        let mut rocket = Rocket::new(2.0, 0.0, PLANET_RADIUS);
        rocket.add_component(Component::Crew(Crew {
            structural_mass: 600.0,
            drag: 0.2,
        }));
        rocket.add_component(Component::FuelTank(FuelTank {
            structural_mass: 1_400.0,
            drag: 0.3,
            fuel_mass: 6_000.0,
        }));
        rocket.add_component(Component::Engine(Engine::new(
            2_000.0, 0.2, 250.0, 300.0, 60.0, 55.0,
        )));
        rocket
    }

    #[test]
    fn attach_registers_fuel() {
        let rocket = test_rocket();
        assert_relative_eq!(rocket.fuel(), 6_000.0, epsilon = 1e-9);
    }

    #[test]
    fn initial_conditions() {
        let rocket = test_rocket();
        assert_eq!(rocket.speed(), 0.0);
        assert_relative_eq!(
            rocket.pitch_angle(),
            0.5 * std::f64::consts::PI,
            epsilon = 1e-12
        );
        assert!(!rocket.hit_ground());
        assert_relative_eq!(rocket.position().y, PLANET_RADIUS, epsilon = 1e-6);
    }

    #[test]
    fn drag_coefficient_weighted_by_structural_mass() {
        let rocket = test_rocket();
        let expected = (600.0 * 0.2 + 1_400.0 * 0.3 + 2_000.0 * 0.2) / 4_000.0;
        assert_relative_eq!(rocket.drag_coefficient(), expected, epsilon = 1e-12);
    }

    #[test]
    fn vertical_launch_climbs_and_burns_fuel() {
        let mut rocket = test_rocket();
        rocket.set_throttle(1.0);

        let mut last_altitude = rocket.altitude();
        let mut last_fuel = rocket.fuel();
        for step in 0..200 {
            rocket.advance(0.02).unwrap();
            assert!(
                rocket.altitude() > last_altitude || step == 0,
                "altitude must climb, step {step}"
            );
            assert!(rocket.fuel() < last_fuel, "fuel must deplete, step {step}");
            last_altitude = rocket.altitude();
            last_fuel = rocket.fuel();
        }
        assert!(!rocket.hit_ground());
    }

    #[test]
    fn zero_throttle_conserves_fuel() {
        let mut rocket = test_rocket();
        rocket.set_throttle(0.0);
        let fuel_before = rocket.fuel();
        for _ in 0..100 {
            rocket.advance(0.02).unwrap();
        }
        assert_eq!(rocket.fuel(), fuel_before);
    }

    #[test]
    fn thrust_tapers_continuously_near_empty() {
        let mut rocket = test_rocket();
        rocket.set_throttle(1.0);
        // Drain the tank down to less than one step of flow.
        rocket.q[FUEL_MASS] = 0.5;
        rocket.advance(0.02).unwrap();
        let accel_low = rocket.acceleration();

        let mut empty = test_rocket();
        empty.set_throttle(1.0);
        empty.q[FUEL_MASS] = 0.0;
        empty.advance(0.02).unwrap();
        let accel_empty = empty.acceleration();

        // With fuel for a fraction of nominal flow, thrust is that
        // fraction of nominal; with none it vanishes.
        assert!(accel_low < 20.0, "tapered accel should be small, got {accel_low}");
        assert!(accel_empty < accel_low);
    }

    #[test]
    fn ground_latch_is_one_way() {
        let mut rocket = test_rocket();
        // Start below the surface: first evaluation latches.
        rocket.q[POS_Y] = PLANET_RADIUS - 10.0;
        rocket.set_throttle(1.0);
        rocket.advance(0.02).unwrap();
        assert!(rocket.hit_ground());
        assert_eq!(rocket.altitude(), 0.0);

        // Further advances are deliberate no-ops.
        let q_before = rocket.q;
        let t_before = rocket.time();
        rocket.advance(0.02).unwrap();
        assert_eq!(rocket.q, q_before);
        assert_eq!(rocket.time(), t_before);
        assert_eq!(rocket.altitude(), 0.0);
    }

    #[test]
    fn missing_engine_fails_fast() {
        let mut rocket = Rocket::new(2.0, 0.0, PLANET_RADIUS);
        rocket.add_component(Component::Crew(Crew {
            structural_mass: 600.0,
            drag: 0.2,
        }));
        assert!(matches!(
            rocket.advance(0.02),
            Err(RocketError::MissingEngine)
        ));
    }

    #[test]
    fn zero_nominal_flow_means_zero_thrust() {
        let mut rocket = Rocket::new(2.0, 0.0, PLANET_RADIUS + 1_000.0);
        rocket.add_component(Component::Crew(Crew {
            structural_mass: 600.0,
            drag: 0.2,
        }));
        // Non-functional engine: valid configuration, no contribution.
        rocket.add_component(Component::Engine(Engine::new(
            2_000.0, 0.2, 250.0, 300.0, 0.0, 0.0,
        )));
        rocket.set_throttle(1.0);
        rocket.advance(0.02).unwrap();
        // Only gravity acts; nothing divides by the zero flow.
        assert!(rocket.acceleration().is_finite());
        assert_relative_eq!(rocket.acceleration(), G0, epsilon = 0.1);
    }

    #[test]
    fn throttle_clamps_to_unit_range() {
        let mut rocket = test_rocket();
        rocket.set_throttle(2.5);
        assert_eq!(rocket.throttle(), 1.0);
        rocket.set_throttle(-1.0);
        assert_eq!(rocket.throttle(), 0.0);
    }

    #[test]
    fn pitch_setter_reports_change() {
        let mut rocket = test_rocket();
        assert!(rocket.set_pitch_angle(1.0));
        assert!(!rocket.set_pitch_angle(1.0));
    }
}
