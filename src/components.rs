use crate::constants::G0;

// ---------------------------------------------------------------------------
// Rocket component stack
// ---------------------------------------------------------------------------
//
// A rocket is assembled from a small append-only stack of components.
// Every component contributes structural mass and a drag value; a fuel
// tank also contributes fuel mass, and the engine carries the
// thrust/fuel-flow model. The engine is always the last entry in the
// stack.

/// Inert crew pod: structural mass and drag only.
#[derive(Debug, Clone, Copy)]
pub struct Crew {
    pub structural_mass: f64, // kg
    pub drag: f64,
}

/// Fuel tank: hull structural mass plus the fuel it carries. The fuel
/// itself is tracked in the rocket's state vector; the tank reports its
/// initial load once, at attach time.
#[derive(Debug, Clone, Copy)]
pub struct FuelTank {
    pub structural_mass: f64, // kg
    pub drag: f64,
    pub fuel_mass: f64, // kg, initial load
}

/// Engine: sea-level and vacuum ratings for thrust and fuel flow.
///
/// Ratings are derived from specific impulse and nominal flow at each
/// reference condition: thrust = Isp · flow · g0.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    pub structural_mass: f64, // kg
    pub drag: f64,
    thrust_sea_level: f64, // N
    thrust_vacuum: f64,    // N
    flow_sea_level: f64,   // kg/s
    flow_vacuum: f64,      // kg/s
}

impl Engine {
    pub fn new(
        structural_mass: f64,
        drag: f64,
        isp_sea_level: f64,
        isp_vacuum: f64,
        flow_sea_level: f64,
        flow_vacuum: f64,
    ) -> Self {
        Self {
            structural_mass,
            drag,
            thrust_sea_level: isp_sea_level * flow_sea_level * G0,
            thrust_vacuum: isp_vacuum * flow_vacuum * G0,
            flow_sea_level,
            flow_vacuum,
        }
    }

    /// Thrust interpolated between vacuum and sea-level ratings.
    /// `pressure_ratio` is ambient pressure over one standard
    /// atmosphere: 0 yields the vacuum rating, 1 the sea-level rating.
    pub fn thrust(&self, pressure_ratio: f64) -> f64 {
        self.thrust_vacuum - (self.thrust_vacuum - self.thrust_sea_level) * pressure_ratio
    }

    /// Nominal fuel flow at the given pressure ratio, same
    /// interpolation as [`Engine::thrust`].
    pub fn fuel_consumption(&self, pressure_ratio: f64) -> f64 {
        self.flow_vacuum - (self.flow_vacuum - self.flow_sea_level) * pressure_ratio
    }
}

/// One entry of the component stack.
#[derive(Debug, Clone, Copy)]
pub enum Component {
    Crew(Crew),
    FuelTank(FuelTank),
    Engine(Engine),
}

impl Component {
    /// Total mass contribution: structural mass, plus fuel for a tank.
    pub fn mass(&self) -> f64 {
        match self {
            Component::FuelTank(t) => t.structural_mass + t.fuel_mass,
            _ => self.structural_mass(),
        }
    }

    pub fn structural_mass(&self) -> f64 {
        match self {
            Component::Crew(c) => c.structural_mass,
            Component::FuelTank(t) => t.structural_mass,
            Component::Engine(e) => e.structural_mass,
        }
    }

    pub fn drag(&self) -> f64 {
        match self {
            Component::Crew(c) => c.drag,
            Component::FuelTank(t) => t.drag,
            Component::Engine(e) => e.drag,
        }
    }

    /// Fuel this component contributes at attach time (zero unless it
    /// is a tank).
    pub fn fuel_mass(&self) -> f64 {
        match self {
            Component::FuelTank(t) => t.fuel_mass,
            _ => 0.0,
        }
    }

    pub fn as_engine(&self) -> Option<&Engine> {
        match self {
            Component::Engine(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
