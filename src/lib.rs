//! Planar single-stage rocket ascent simulation: RK4 flight dynamics
//! over a spherical planet with a 1976 U.S. Standard Atmosphere, plus
//! a cheap ballistic predictor for apogee/perigee estimation.

pub mod atmosphere;
pub mod components;
pub mod constants;
pub mod ode;
pub mod prediction;
pub mod rocket;
pub mod sim;

pub use components::{Component, Crew, Engine, FuelTank};
pub use prediction::{BallisticPath, Prediction};
pub use rocket::{Rocket, RocketError};
pub use sim::{LaunchConfig, Simulation};
