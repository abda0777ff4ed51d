// ---------------------------------------------------------------------------
// Shared physical constants
// ---------------------------------------------------------------------------

/// Standard gravity at the reference surface, m/s^2.
pub const G0: f64 = 9.80665;

/// Planet radius, m (Earth polar radius — the launch site sits on top of it).
pub const PLANET_RADIUS: f64 = 6_356_766.0;

/// Reference sea-level pressure, Pa. One standard atmosphere; engine
/// performance is interpolated by `pressure / P_SEA_LEVEL`.
pub const P_SEA_LEVEL: f64 = 101_325.0;
