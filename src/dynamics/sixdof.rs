use nalgebra::Vector3;

use crate::aircraft::AircraftConfig;
use crate::dynamics::state::{Controls, Deriv, State, G};
use crate::physics::aero::{self, ForcesMoments};

// ---------------------------------------------------------------------------
// 6DOF equations of motion (body-frame, Euler-angle kinematics)
// ---------------------------------------------------------------------------

/// Full state derivative: aerodynamics + thrust composed with the
/// rigid-body equations under standard gravity.
pub fn derivatives(
    state: &State,
    config: &AircraftConfig,
    controls: &Controls,
    rho: f64,
) -> Deriv {
    let fm = aero::forces_and_moments(state, controls, config, rho);
    rigid_body(state, &fm, config, G)
}

/// Rigid-body equations of motion for given body-frame forces and moments.
///
/// Gravity magnitude is a parameter so force-free coasting can be tested
/// in isolation; `derivatives` always passes `G`.
///
/// Rotational dynamics use the decoupled-inertia approximation: the Ixz
/// cross term in the configuration is intentionally not applied. Euler
/// kinematics are singular at theta = +-90 deg and are not guarded; the
/// integrator's divergence check catches the fallout.
pub fn rigid_body(state: &State, fm: &ForcesMoments, config: &AircraftConfig, g: f64) -> Deriv {
    let (u, v, w) = (state.vel.x, state.vel.y, state.vel.z);
    let (phi, theta) = (state.att.x, state.att.y);
    let (p, q, r) = (state.rates.x, state.rates.y, state.rates.z);
    let m = config.mass;

    // Gravity resolved into body axes
    let gx = -g * theta.sin();
    let gy = g * theta.cos() * phi.sin();
    let gz = g * theta.cos() * phi.cos();

    // Translational dynamics: Newton in a rotating frame. The cross terms
    // are the Coriolis-like coupling required for turning/pitching flight.
    let du = fm.force.x / m + (v * r - w * q) + gx;
    let dv = fm.force.y / m + (w * p - u * r) + gy;
    let dw = fm.force.z / m + (u * q - v * p) + gz;

    // Rotational dynamics, diagonal inertia
    let dp = (fm.moment.x - (config.iz - config.iy) * q * r) / config.ix;
    let dq = (fm.moment.y - (config.ix - config.iz) * p * r) / config.iy;
    let dr = (fm.moment.z - (config.iy - config.ix) * p * q) / config.iz;

    // Euler-angle kinematics
    let dphi = p + (q * phi.sin() + r * phi.cos()) * theta.tan();
    let dtheta = q * phi.cos() - r * phi.sin();
    let dpsi = (q * phi.sin() + r * phi.cos()) / theta.cos();

    // Navigation: Earth-frame position rate from body velocity and pitch
    let dx = u * theta.cos() + w * theta.sin();
    let dy = v;
    let dz = -u * theta.sin() + w * theta.cos();

    Deriv {
        dpos: Vector3::new(dx, dy, dz),
        dvel: Vector3::new(du, dv, dw),
        datt: Vector3::new(dphi, dtheta, dpsi),
        drates: Vector3::new(dp, dq, dr),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn no_forces() -> ForcesMoments {
        ForcesMoments {
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }

    #[test]
    fn force_free_coasting_is_straight_line() {
        // Zero forces, moments, rates, angles, gravity: the Coriolis cross
        // terms must cancel exactly and leave constant-velocity motion.
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.vel = Vector3::new(60.0, 0.0, 0.0);

        let d = rigid_body(&state, &no_forces(), &config, 0.0);
        assert_eq!(d.dvel, Vector3::zeros());
        assert_eq!(d.drates, Vector3::zeros());
        assert_eq!(d.datt, Vector3::zeros());
        assert_eq!(d.dpos, Vector3::new(60.0, 0.0, 0.0));
    }

    #[test]
    fn gravity_resolves_along_body_axes() {
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.att = Vector3::new(0.3, 0.2, 0.0); // banked and pitched

        let d = rigid_body(&state, &no_forces(), &config, G);
        assert_relative_eq!(d.dvel.x, -G * 0.2_f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(d.dvel.y, G * 0.2_f64.cos() * 0.3_f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(d.dvel.z, G * 0.2_f64.cos() * 0.3_f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn coriolis_coupling_for_pitch_rate() {
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.vel = Vector3::new(10.0, 0.0, 0.0);
        state.rates = Vector3::new(0.0, 0.5, 0.0); // pure pitch rate

        let d = rigid_body(&state, &no_forces(), &config, 0.0);
        // u*q shows up in w_dot; nothing couples into u_dot or v_dot
        assert_relative_eq!(d.dvel.z, 10.0 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(d.dvel.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.dvel.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn pitch_moment_drives_pitch_acceleration() {
        let config = AircraftConfig::stol();
        let state = State::at_rest(0.0);
        let fm = ForcesMoments {
            force: Vector3::zeros(),
            moment: Vector3::new(0.0, 500.0, 0.0),
        };

        let d = rigid_body(&state, &fm, &config, 0.0);
        assert_relative_eq!(d.drates.y, 500.0 / config.iy, epsilon = 1e-12);
        assert_eq!(d.drates.x, 0.0);
        assert_eq!(d.drates.z, 0.0);
    }

    #[test]
    fn euler_kinematics_wings_level() {
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.att = Vector3::new(0.0, 0.4, 0.0);
        state.rates = Vector3::new(0.0, 0.1, 0.0); // wings-level pull-up

        let d = rigid_body(&state, &no_forces(), &config, 0.0);
        // With phi = 0 and r = 0, only theta integrates the pitch rate
        assert_relative_eq!(d.datt.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.datt.y, 0.1, epsilon = 1e-12);
        assert_relative_eq!(d.datt.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn navigation_projects_through_pitch() {
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.vel = Vector3::new(50.0, 2.0, 5.0);
        state.att = Vector3::new(0.0, 0.3, 0.0);

        let d = rigid_body(&state, &no_forces(), &config, 0.0);
        assert_relative_eq!(d.dpos.x, 50.0 * 0.3_f64.cos() + 5.0 * 0.3_f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(d.dpos.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(d.dpos.z, -50.0 * 0.3_f64.sin() + 5.0 * 0.3_f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn composed_derivative_includes_thrust_and_gravity() {
        let config = AircraftConfig::stol();
        let mut state = State::at_rest(0.0);
        state.vel = Vector3::new(60.0, 0.0, 0.0);
        let controls = Controls { throttle: 1.0, elevator: -0.15 };

        let d = derivatives(&state, &config, &controls, crate::dynamics::state::RHO_SL);
        assert!(d.to_array().iter().all(|v| v.is_finite()));
        // Level attitude: gravity appears fully in w_dot alongside wing lift
        assert!(d.dvel.x.is_finite());
        assert_relative_eq!(d.dpos.x, 60.0, epsilon = 1e-12);
    }
}
