use nalgebra::Vector3;

use crate::components::{Component, Crew, Engine, FuelTank};
use crate::constants::PLANET_RADIUS;
use crate::prediction::{Prediction, PREDICT_DT};
use crate::rocket::{Rocket, RocketError};

// ---------------------------------------------------------------------------
// Simulation control loop
// ---------------------------------------------------------------------------
//
// Single-threaded and synchronous: one tick runs `time_scale` fixed
// physics steps, then recomputes the trajectory prediction, so the
// prediction always reads a fully advanced state.

/// Largest allowed time-scale multiplier (physics steps per tick).
pub const MAX_TIME_SCALE: u32 = 20_000;

/// Everything needed to build (and rebuild) a rocket: launch geometry
/// plus the three components, attached in crew / tank / engine order.
#[derive(Debug, Clone, Copy)]
pub struct LaunchConfig {
    pub diameter: f64, // m
    pub start_x: f64,
    pub start_y: f64,
    pub crew: Crew,
    pub tank: FuelTank,
    pub engine: Engine,
}

impl LaunchConfig {
    /// A launch from the surface, straight "north" of the planet
    /// center.
    pub fn surface_launch(diameter: f64, crew: Crew, tank: FuelTank, engine: Engine) -> Self {
        Self {
            diameter,
            start_x: 0.0,
            start_y: PLANET_RADIUS,
            crew,
            tank,
            engine,
        }
    }

    pub fn build(&self) -> Rocket {
        let mut rocket = Rocket::new(self.diameter, self.start_x, self.start_y);
        rocket.add_component(Component::Crew(self.crew));
        rocket.add_component(Component::FuelTank(self.tank));
        rocket.add_component(Component::Engine(self.engine));
        rocket
    }
}

/// Owns the rocket, the tick loop, and the most recent prediction.
#[derive(Debug)]
pub struct Simulation {
    config: LaunchConfig,
    rocket: Rocket,
    time_scale: u32,
    simulated_time: f64,
    prediction: Prediction,
    predict_dt: f64,
}

impl Simulation {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            rocket: config.build(),
            time_scale: 1,
            simulated_time: 0.0,
            prediction: Prediction::default(),
            predict_dt: PREDICT_DT,
        }
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// Physics steps per tick; 0 pauses the simulation.
    pub fn set_time_scale(&mut self, time_scale: u32) {
        self.time_scale = time_scale.min(MAX_TIME_SCALE);
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        self.rocket.set_throttle(throttle);
    }

    /// Returns whether the pitch actually changed (see
    /// [`Rocket::set_pitch_angle`]).
    pub fn set_pitch_angle(&mut self, angle: f64) -> bool {
        self.rocket.set_pitch_angle(angle)
    }

    /// One control tick: `time_scale` integration steps of size `dt`,
    /// then a prediction recompute if the trajectory can have changed.
    pub fn tick(&mut self, dt: f64) -> Result<(), RocketError> {
        for _ in 0..self.time_scale {
            if self.rocket.hit_ground() {
                break;
            }
            self.rocket.advance(dt)?;
            self.simulated_time += dt;
        }

        // The ballistic path only changes while forces other than
        // gravity act: thrusting with fuel left, or nonzero drag.
        // Coasting in vacuum keeps the previous prediction.
        let rocket = &self.rocket;
        if (rocket.throttle() != 0.0 && rocket.fuel() > 0.0) || rocket.drag() > 1e-4 {
            self.recompute_prediction();
        }
        Ok(())
    }

    /// Unconditionally recompute the predicted path from the current
    /// state.
    pub fn recompute_prediction(&mut self) {
        self.prediction =
            Prediction::compute(self.rocket.position(), self.rocket.velocity(), self.predict_dt);
    }

    pub fn predicted_points(&self) -> &[Vector3<f64>] {
        &self.prediction.points
    }

    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    pub fn apogee(&self) -> f64 {
        self.prediction.apogee()
    }

    pub fn perigee(&self) -> f64 {
        self.prediction.perigee()
    }

    /// Wholesale restart: a fresh rocket from the stored config. No
    /// partial state reset.
    pub fn restart(&mut self) {
        self.rocket = self.config.build();
        self.time_scale = 1;
        self.simulated_time = 0.0;
        self.prediction = Prediction::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
