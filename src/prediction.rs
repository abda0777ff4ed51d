use log::debug;
use nalgebra::Vector3;

use crate::constants::{G0, PLANET_RADIUS};

// ---------------------------------------------------------------------------
// Simplified ballistic trajectory prediction
// ---------------------------------------------------------------------------
//
// Re-running the full RK4 model thousands of steps ahead every control
// tick is too expensive, and the result is only used for display and
// apogee/perigee estimation. The predictor therefore drops thrust and
// drag, keeps inverse-square gravity, and integrates forward with a
// fixed step until the path reaches the ground or the iteration
// ceiling, whichever comes first. The ceiling guarantees termination
// for orbit-like paths that never come down.

/// Fixed prediction step, s. A frame-fluctuating step would make the
/// predicted path jitter between recomputes.
pub const PREDICT_DT: f64 = 0.078_140_91;

/// Hard iteration ceiling for one prediction run.
pub const MAX_PREDICT_STEPS: usize = 100_000;

/// Lazy forward sequence of predicted positions. One sample per step;
/// ends when the path reaches the ground or the ceiling runs out.
/// Not restartable — build a new one per recompute.
pub struct BallisticPath {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    dt: f64,
    remaining: usize,
    hit_ground: bool,
}

impl BallisticPath {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, dt: f64, max_steps: usize) -> Self {
        Self {
            position,
            velocity,
            dt,
            remaining: max_steps,
            hit_ground: false,
        }
    }

    /// Whether the path reached the surface before the ceiling. Only
    /// meaningful once iteration stops.
    pub fn hit_ground(&self) -> bool {
        self.hit_ground
    }
}

impl Iterator for BallisticPath {
    type Item = Vector3<f64>;

    fn next(&mut self) -> Option<Vector3<f64>> {
        if self.hit_ground || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // The ground check runs on the state *before* the step, so the
        // final yielded sample may sit below the surface. Apogee and
        // perigee extraction clamps it away.
        let to_center = -self.position;
        let altitude = to_center.norm() - PLANET_RADIUS;
        if altitude <= 0.0 {
            self.hit_ground = true;
            return None;
        }

        let g = G0 * PLANET_RADIUS * PLANET_RADIUS
            / ((PLANET_RADIUS + altitude) * (PLANET_RADIUS + altitude));
        let gravity_dir = to_center.normalize();

        self.velocity += gravity_dir * (g * self.dt);
        self.position += self.velocity * self.dt;
        Some(self.position)
    }
}

/// A fully evaluated prediction: the sampled path plus whether it
/// reached the ground.
#[derive(Debug, Clone, Default)]
pub struct Prediction {
    pub points: Vec<Vector3<f64>>,
    pub hit_ground: bool,
}

impl Prediction {
    /// Run the simplified model forward from the given state.
    pub fn compute(position: Vector3<f64>, velocity: Vector3<f64>, dt: f64) -> Self {
        let mut path = BallisticPath::new(position, velocity, dt, MAX_PREDICT_STEPS);
        let points: Vec<_> = path.by_ref().collect();

        if path.hit_ground() {
            debug!("predicted ground contact after {} steps", points.len());
        } else {
            debug!("prediction ceiling reached without ground contact");
        }

        Self {
            points,
            hit_ground: path.hit_ground(),
        }
    }

    /// Highest predicted altitude above the surface, clamped to >= 0.
    pub fn apogee(&self) -> f64 {
        let max_radius = self
            .points
            .iter()
            .map(|p| p.norm())
            .fold(f64::NEG_INFINITY, f64::max);
        if max_radius.is_finite() {
            (max_radius - PLANET_RADIUS).max(0.0)
        } else {
            0.0
        }
    }

    /// Lowest predicted altitude above the surface; 0 when the path
    /// reaches (or dips under) the ground, or when there is no path.
    pub fn perigee(&self) -> f64 {
        let min_radius = self
            .points
            .iter()
            .map(|p| p.norm())
            .fold(f64::INFINITY, f64::min);
        if min_radius.is_finite() {
            (min_radius - PLANET_RADIUS).max(0.0)
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
