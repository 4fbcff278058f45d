use std::process::ExitCode;

use log::error;

use stol_sim::io::csv;
use stol_sim::{simulate, Scenario, SimError, State};

const LOG_PATH: &str = "flight_log.csv";

fn main() -> ExitCode {
    env_logger::init();

    let scenario = Scenario::smooth_climb();
    match simulate(&scenario) {
        Ok(trajectory) => {
            report(&scenario, &trajectory);
            if let Err(e) = csv::write_log_file(LOG_PATH, &trajectory) {
                error!("could not write {LOG_PATH}: {e}");
                return ExitCode::FAILURE;
            }
            println!("\nFlight log written to {LOG_PATH}");
            ExitCode::SUCCESS
        }
        Err(SimError::Diverged { time, last, prefix }) => {
            error!("simulation diverged at t = {time:.3} s (altitude {:.1} m)", last.altitude());
            if let Err(e) = csv::write_log_file(LOG_PATH, &prefix) {
                error!("could not write partial {LOG_PATH}: {e}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn report(scenario: &Scenario, trajectory: &[State]) {
    let first = &trajectory[0];
    let last = &trajectory[trajectory.len() - 1];
    let max_alt = trajectory.iter().map(State::altitude).fold(f64::MIN, f64::max);
    let max_speed = trajectory.iter().map(State::airspeed).fold(f64::MIN, f64::max);
    let climb = (last.altitude() - first.altitude()) / (last.time - first.time);

    println!("=== STOL Climb Simulation ===");
    println!("Aircraft mass:     {:8.1} kg", scenario.aircraft.mass);
    println!("Throttle:          {:8.2}", scenario.controls.throttle);
    println!("Elevator:          {:8.3} rad", scenario.controls.elevator);
    println!("Duration:          {:8.1} s ({} samples)", scenario.t_end, trajectory.len());
    println!();
    println!("Initial altitude:  {:8.1} m", first.altitude());
    println!("Final altitude:    {:8.1} m", last.altitude());
    println!("Max altitude:      {:8.1} m", max_alt);
    println!("Mean climb rate:   {:8.2} m/s", climb);
    println!("Max airspeed:      {:8.1} m/s", max_speed);
    println!("Ground track:      {:8.1} m", last.pos.x);
    println!("Final pitch:       {:8.2} deg", last.att.y.to_degrees());
}
