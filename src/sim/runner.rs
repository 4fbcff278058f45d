use log::info;
use nalgebra::Vector3;

use crate::aircraft::AircraftConfig;
use crate::dynamics::state::{Controls, State, RHO_SL};
use crate::dynamics::sixdof;
use crate::error::SimError;
use crate::sim::dopri::{self, DopriOptions};

// ---------------------------------------------------------------------------
// Control policy
// ---------------------------------------------------------------------------

/// Supplies control inputs per derivative evaluation. The integrator may
/// call this at every internal sub-step.
pub trait ControlLaw {
    fn controls(&self, time: f64, state: &State) -> Controls;
}

/// Fixed inputs for the whole run.
pub struct ConstantControls(pub Controls);

impl ControlLaw for ConstantControls {
    fn controls(&self, _time: f64, _state: &State) -> Controls {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Scenario definition
// ---------------------------------------------------------------------------

/// One complete simulation run: aircraft, initial conditions, control
/// inputs, air density, time span, and an evenly spaced sample schedule.
/// Nothing persists between runs.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub aircraft: AircraftConfig,
    pub initial: State,
    pub controls: Controls,
    pub rho: f64,          // kg/m^3, held constant over the run
    pub t_end: f64,        // s; start time comes from `initial.time`
    pub samples: usize,    // sample count, endpoints included
    pub options: DopriOptions,
}

impl Scenario {
    /// The reference run: 1000 m altitude, 60 m/s, full throttle, nose-up
    /// elevator, 60 s horizon sampled 1200 times.
    pub fn smooth_climb() -> Scenario {
        Scenario {
            aircraft: AircraftConfig::stol(),
            initial: State {
                time: 0.0,
                pos: Vector3::new(0.0, 0.0, -1000.0),
                vel: Vector3::new(60.0, 0.0, 0.0),
                att: Vector3::zeros(),
                rates: Vector3::zeros(),
            },
            controls: Controls { throttle: 1.0, elevator: -0.15 },
            rho: RHO_SL,
            t_end: 60.0,
            samples: 1200,
            options: DopriOptions::default(),
        }
    }

    /// Evenly spaced sample times over [t0, t_end], endpoints included.
    /// Requires `samples >= 2`; `simulate_with` enforces this.
    pub fn sample_times(&self) -> Vec<f64> {
        let t0 = self.initial.time;
        let step = (self.t_end - t0) / (self.samples - 1) as f64;
        (0..self.samples).map(|i| t0 + i as f64 * step).collect()
    }

    /// Interval between consecutive samples (s). The streaming collaborator
    /// paces playback with this value.
    pub fn sample_interval(&self) -> f64 {
        (self.t_end - self.initial.time) / (self.samples - 1) as f64
    }
}

// ---------------------------------------------------------------------------
// Simulation entry points
// ---------------------------------------------------------------------------

/// Run a scenario with a custom control law.
///
/// Validates the aircraft configuration before any integration step, then
/// integrates the 6DOF equations of motion over the scenario's time span.
/// On divergence the sampled prefix and last valid state are surfaced in
/// the error; output is never silently truncated or corrupted.
pub fn simulate_with(scenario: &Scenario, law: &dyn ControlLaw) -> Result<Vec<State>, SimError> {
    scenario.aircraft.validate()?;
    if scenario.samples < 2 {
        return Err(SimError::TooFewSamples(scenario.samples));
    }

    let t0 = scenario.initial.time;
    let t_eval = scenario.sample_times();
    info!(
        "integrating {} -> {} s, {} samples, rtol {:.1e}",
        t0, scenario.t_end, scenario.samples, scenario.options.rel_tol
    );

    let config = &scenario.aircraft;
    let rho = scenario.rho;
    let f = |t: f64, y: &dopri::StateVec| {
        let state = State::from_array(t, y);
        let controls = law.controls(t, &state);
        sixdof::derivatives(&state, config, &controls, rho).to_array()
    };

    let to_states = |samples: Vec<dopri::Sample>| {
        samples
            .into_iter()
            .map(|(t, y)| State::from_array(t, &y))
            .collect::<Vec<State>>()
    };

    match dopri::integrate(
        f,
        t0,
        scenario.initial.to_array(),
        scenario.t_end,
        &t_eval,
        &scenario.options,
    ) {
        Ok(samples) => Ok(to_states(samples)),
        Err(diverged) => Err(SimError::Diverged {
            time: diverged.time,
            last: State::from_array(diverged.time, &diverged.state),
            prefix: to_states(diverged.samples),
        }),
    }
}

/// Run a scenario with its built-in constant control inputs.
pub fn simulate(scenario: &Scenario) -> Result<Vec<State>, SimError> {
    simulate_with(scenario, &ConstantControls(scenario.controls))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
