use orbital_launch::constants::G0;
use orbital_launch::{Crew, Engine, FuelTank, LaunchConfig, Simulation};

fn main() {
    // -----------------------------------------------------------------------
    // Vehicle: "Meridian-1" — 10 t single-stage, TWR ~1.5 at liftoff
    // -----------------------------------------------------------------------
    let crew = Crew {
        structural_mass: 600.0, // kg
        drag: 0.2,
    };
    let tank = FuelTank {
        structural_mass: 1_400.0, // kg, hull
        drag: 0.3,
        fuel_mass: 6_000.0, // kg
    };
    // Isp 250 s SL / 300 s vac, flow 60 kg/s SL / 55 kg/s vac
    let engine = Engine::new(2_000.0, 0.2, 250.0, 300.0, 60.0, 55.0);

    let config = LaunchConfig::surface_launch(2.0, crew, tank, engine);
    let mut sim = Simulation::new(config);

    let total_mass = crew.structural_mass + tank.structural_mass + tank.fuel_mass + 2_000.0;
    let thrust_sl = 250.0 * 60.0 * G0;

    println!();
    println!("====================================================================");
    println!("  ORBITAL LAUNCH SIMULATION — Meridian-1");
    println!("====================================================================");
    println!();
    println!("  Liftoff mass:  {:>8.0} kg    Fuel:    {:>8.0} kg", total_mass, tank.fuel_mass);
    println!(
        "  SL thrust:     {:>8.0} N     TWR:     {:>8.2}",
        thrust_sl,
        thrust_sl / (total_mass * G0)
    );
    println!();

    // -----------------------------------------------------------------------
    // Fly: full throttle, vertical, 60 physics steps per tick
    // -----------------------------------------------------------------------
    let dt = 1.0 / 60.0;
    sim.set_throttle(1.0);
    sim.set_time_scale(60);

    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>10}  {:>10}",
        "t (s)", "alt (m)", "vel (m/s)", "fuel (kg)", "apogee (m)", "perigee(m)"
    );
    println!("  {}", "─".repeat(64));

    let mut max_altitude = 0.0_f64;
    let mut max_speed = 0.0_f64;

    for tick in 0..=600 {
        if tick % 10 == 0 {
            println!(
                "  {:>7.1}  {:>9.0}  {:>9.1}  {:>9.1}  {:>10.0}  {:>10.0}",
                sim.simulated_time(),
                sim.rocket().altitude(),
                sim.rocket().speed(),
                sim.rocket().fuel().max(0.0),
                sim.apogee(),
                sim.perigee(),
            );
        }

        if let Err(err) = sim.tick(dt) {
            eprintln!("simulation failed: {err}");
            return;
        }

        max_altitude = max_altitude.max(sim.rocket().altitude());
        max_speed = max_speed.max(sim.rocket().speed());

        if sim.rocket().hit_ground() {
            break;
        }
    }

    println!();
    println!("  Flight Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max altitude:  {:>9.0} m", max_altitude);
    println!("  Max speed:     {:>9.1} m/s", max_speed);
    println!("  Fuel left:     {:>9.1} kg", sim.rocket().fuel().max(0.0));
    println!("  Sim time:      {:>9.1} s", sim.simulated_time());
    println!(
        "  Outcome:       {}",
        if sim.rocket().hit_ground() {
            "ground contact"
        } else {
            "still flying"
        }
    );
    println!("====================================================================");
    println!();
}
