use thiserror::Error;

use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Rejected aircraft configuration. Raised at build/validate time, before
/// any integration step executes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("aircraft mass must be positive, got {0} kg")]
    NonPositiveMass(f64),

    #[error("wing area must be positive, got {0} m^2")]
    NonPositiveWingArea(f64),

    #[error("{axis} inertia must be positive, got {value} kg*m^2")]
    NonPositiveInertia { axis: &'static str, value: f64 },
}

/// Simulation-level failure.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// The sample schedule cannot span the time interval. At least two
    /// points (the endpoints) are required for a uniform grid.
    #[error("sample schedule needs at least 2 points, got {0}")]
    TooFewSamples(usize),

    /// The integrator produced non-finite derivatives or could not meet
    /// tolerance at the minimum step size. Carries the last valid state
    /// and the trajectory prefix sampled before the failure.
    #[error("integration diverged at t = {time:.4} s")]
    Diverged {
        time: f64,
        last: State,
        prefix: Vec<State>,
    },
}
