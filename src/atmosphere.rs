use crate::constants::{G0, P_SEA_LEVEL};

// ---------------------------------------------------------------------------
// 1976 U.S. Standard Atmosphere (sea level to 86 km)
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.052_87; // specific gas constant for dry air, J/(kg·K)

const T_SEA_LEVEL: f64 = 288.15; // K

/// Ambient conditions at a given geometric altitude.
#[derive(Debug, Clone, Copy)]
pub struct Conditions {
    pub pressure: f64,    // Pa
    pub density: f64,     // kg/m^3
    pub temperature: f64, // K
}

/// One layer of the standard-atmosphere table: base altitude, base
/// temperature, base pressure, and temperature lapse rate (K/m, zero
/// for isothermal layers).
struct Layer {
    base: f64,
    temp: f64,
    pressure: f64,
    lapse: f64,
}

const LAYERS: [Layer; 7] = [
    // Troposphere
    Layer { base: 0.0, temp: T_SEA_LEVEL, pressure: P_SEA_LEVEL, lapse: -0.0065 },
    // Tropopause (isothermal)
    Layer { base: 11_000.0, temp: 216.65, pressure: 22_632.1, lapse: 0.0 },
    // Stratosphere I
    Layer { base: 20_000.0, temp: 216.65, pressure: 5_474.89, lapse: 0.001 },
    // Stratosphere II
    Layer { base: 32_000.0, temp: 228.65, pressure: 868.019, lapse: 0.0028 },
    // Stratopause (isothermal)
    Layer { base: 47_000.0, temp: 270.65, pressure: 110.906, lapse: 0.0 },
    // Mesosphere I
    Layer { base: 51_000.0, temp: 270.65, pressure: 66.9389, lapse: -0.0028 },
    // Mesosphere II
    Layer { base: 71_000.0, temp: 214.65, pressure: 3.956_42, lapse: -0.002 },
];

const TABLE_TOP: f64 = 86_000.0;

/// Conditions at a given altitude per the 1976 U.S. Standard Atmosphere.
///
/// Altitudes below sea level clamp to sea level; above 86 km an
/// exponential tail keeps pressure and density positive and decaying
/// toward vacuum (never negative, never NaN).
pub fn us76(altitude_m: f64) -> Conditions {
    let h = altitude_m.max(0.0);

    let (temperature, pressure) = if h < TABLE_TOP {
        let layer = LAYERS
            .iter()
            .rev()
            .find(|l| h >= l.base)
            .unwrap_or(&LAYERS[0]);
        evaluate_layer(layer, h)
    } else {
        // Exponential decay above the table
        let t = 186.87;
        let p = 0.3734 * (-0.000_15 * (h - TABLE_TOP)).exp();
        (t, p)
    };

    let density = if temperature > 0.0 {
        pressure / (R_AIR * temperature)
    } else {
        0.0
    };

    Conditions {
        pressure,
        density,
        temperature,
    }
}

/// Temperature and pressure inside one table layer.
///
/// Gradient layers follow the barometric power law; isothermal layers
/// decay exponentially.
fn evaluate_layer(layer: &Layer, h: f64) -> (f64, f64) {
    let dh = h - layer.base;
    if layer.lapse == 0.0 {
        let p = layer.pressure * ((-G0 / (R_AIR * layer.temp)) * dh).exp();
        (layer.temp, p)
    } else {
        let t = layer.temp + layer.lapse * dh;
        let p = layer.pressure * (t / layer.temp).powf(-G0 / (layer.lapse * R_AIR));
        (t, p)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
