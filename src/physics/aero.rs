use nalgebra::Vector3;

use crate::aircraft::AircraftConfig;
use crate::dynamics::state::{Controls, State};

// ---------------------------------------------------------------------------
// Aerodynamic + propulsive force model
// ---------------------------------------------------------------------------

/// Airspeed floor (m/s). Keeps the angle-of-attack and dynamic-pressure
/// math finite at rest instead of failing.
pub const MIN_AIRSPEED: f64 = 0.1;

/// Fixed phase offset (rad) in the blown-lift term. Biases the propwash
/// lift augmentation to be nonzero at alpha = 0.
pub const BLOWN_LIFT_OFFSET: f64 = 0.2;

/// Body-frame forces (N) and moments (N*m) from aerodynamics and thrust.
/// Gravity is applied by the rigid-body dynamics, not here.
#[derive(Debug, Clone, Copy)]
pub struct ForcesMoments {
    pub force: Vector3<f64>,   // [Fx, Fy, Fz]
    pub moment: Vector3<f64>,  // [L roll, M pitch, N yaw]
}

/// Compute body-frame forces and moments for the current state and inputs.
///
/// Pure function, total over its floored domain: no side effects, no error
/// conditions. Side force and roll/yaw moments are identically zero in
/// this longitudinal model.
pub fn forces_and_moments(
    state: &State,
    controls: &Controls,
    config: &AircraftConfig,
    rho: f64,
) -> ForcesMoments {
    let (u, w) = (state.vel.x, state.vel.z);

    let airspeed = state.airspeed().max(MIN_AIRSPEED);
    let alpha = w.atan2(u);
    let q_bar = 0.5 * rho * airspeed * airspeed;

    // Lift: linear lift-curve plus throttle-dependent blown-wing augmentation
    let cl_basic = config.cl_alpha * alpha;
    let cl_blown =
        config.blown_lift_factor * controls.throttle * (alpha + BLOWN_LIFT_OFFSET).sin();
    let cl_total = cl_basic + cl_blown;
    let lift = q_bar * config.wing_area * cl_total;

    // Drag: parasitic plus lift-induced
    let cd_total = config.cd0 + config.induced_drag_k * cl_total * cl_total;
    let drag = q_bar * config.wing_area * cd_total;

    // Pitching moment: static longitudinal stability plus elevator authority
    let cm = config.cm_alpha * alpha + config.cm_elevator * controls.elevator;
    let pitch_moment = q_bar * config.wing_area * config.chord * cm;

    let thrust = controls.throttle * config.max_thrust;

    // Wind axes -> body axes rotation through alpha
    let fx_aero = -drag * alpha.cos() + lift * alpha.sin();
    let fz_aero = -drag * alpha.sin() - lift * alpha.cos();

    ForcesMoments {
        force: Vector3::new(fx_aero + thrust, 0.0, fz_aero),
        moment: Vector3::new(0.0, pitch_moment, 0.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::RHO_SL;
    use approx::assert_relative_eq;

    fn level_state(speed: f64) -> State {
        let mut s = State::at_rest(0.0);
        s.vel.x = speed;
        s
    }

    #[test]
    fn zero_inputs_reduce_to_parasitic_drag_only() {
        let config = AircraftConfig::stol();
        let state = level_state(50.0);
        let fm = forces_and_moments(&state, &Controls::default(), &config, RHO_SL);

        // alpha = 0, throttle = 0, elevator = 0 -> CL = 0, Cm = 0
        let q_bar = 0.5 * RHO_SL * 50.0 * 50.0;
        assert_relative_eq!(fm.force.x, -q_bar * config.wing_area * config.cd0, epsilon = 1e-9);
        assert_relative_eq!(fm.force.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fm.moment.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn symmetric_flight_has_no_lateral_outputs() {
        let config = AircraftConfig::stol();
        let mut state = level_state(60.0);
        state.vel.z = 4.0;
        let controls = Controls { throttle: 0.8, elevator: -0.1 };
        let fm = forces_and_moments(&state, &controls, &config, RHO_SL);

        assert_eq!(fm.force.y, 0.0);
        assert_eq!(fm.moment.x, 0.0);
        assert_eq!(fm.moment.z, 0.0);
    }

    #[test]
    fn forces_finite_at_rest() {
        let config = AircraftConfig::stol();
        let state = State::at_rest(0.0);
        let controls = Controls { throttle: 1.0, elevator: 0.0 };
        let fm = forces_and_moments(&state, &controls, &config, RHO_SL);

        assert!(fm.force.iter().all(|v| v.is_finite()));
        assert!(fm.moment.iter().all(|v| v.is_finite()));
        // Floored dynamic pressure is tiny; Fx is essentially pure thrust
        assert!((fm.force.x - config.max_thrust).abs() < 0.01);
    }

    #[test]
    fn blown_lift_is_nonzero_at_zero_alpha() {
        let config = AircraftConfig::stol();
        let state = level_state(60.0);
        let powered = Controls { throttle: 1.0, elevator: 0.0 };
        let fm = forces_and_moments(&state, &powered, &config, RHO_SL);

        // CL = blown_lift_factor * sin(0.2) > 0 despite alpha = 0,
        // so the wing produces upward (negative z) force.
        let q_bar = 0.5 * RHO_SL * 60.0 * 60.0;
        let expected_cl = config.blown_lift_factor * BLOWN_LIFT_OFFSET.sin();
        assert_relative_eq!(
            fm.force.z,
            -q_bar * config.wing_area * expected_cl,
            epsilon = 1e-9
        );
        assert!(fm.force.z < 0.0);
    }

    #[test]
    fn elevator_drives_pitch_moment() {
        let config = AircraftConfig::stol();
        let state = level_state(60.0);
        let controls = Controls { throttle: 0.0, elevator: -0.15 };
        let fm = forces_and_moments(&state, &controls, &config, RHO_SL);

        // cm_elevator is negative, so negative deflection pitches nose up
        let q_bar = 0.5 * RHO_SL * 60.0 * 60.0;
        let expected = q_bar * config.wing_area * config.chord * (config.cm_elevator * -0.15);
        assert_relative_eq!(fm.moment.y, expected, epsilon = 1e-9);
        assert!(fm.moment.y > 0.0);
    }

    #[test]
    fn alpha_uses_four_quadrant_arctangent() {
        let config = AircraftConfig::stol();
        // Pure downward flow: alpha = pi/2, must stay finite
        let mut state = State::at_rest(0.0);
        state.vel.z = 10.0;
        let fm = forces_and_moments(&state, &Controls::default(), &config, RHO_SL);
        assert!(fm.force.iter().all(|v| v.is_finite()));
        assert!(fm.moment.y.is_finite());
    }
}
