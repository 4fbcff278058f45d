use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G: f64 = 9.81; // gravitational acceleration, m/s^2
pub const RHO_SL: f64 = 1.225; // sea-level air density, kg/m^3

// ---------------------------------------------------------------------------
// 12-component rigid-body state
// ---------------------------------------------------------------------------

/// Full aircraft state at a single point in time.
///
/// Position is Earth-fixed NED (North-East-Down); velocity and angular
/// rates are body-frame; attitude is Euler angles relating body to Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub time: f64,             // s
    pub pos: Vector3<f64>,     // m    [north, east, down]
    pub vel: Vector3<f64>,     // m/s  [u fwd, v right, w down], body frame
    pub att: Vector3<f64>,     // rad  [roll phi, pitch theta, yaw psi]
    pub rates: Vector3<f64>,   // rad/s [p, q, r], body frame
}

impl State {
    /// State at rest at the NED origin.
    pub fn at_rest(time: f64) -> State {
        State {
            time,
            pos: Vector3::zeros(),
            vel: Vector3::zeros(),
            att: Vector3::zeros(),
            rates: Vector3::zeros(),
        }
    }

    /// Flatten to the solver layout: [x, y, z, u, v, w, phi, theta, psi, p, q, r].
    pub fn to_array(&self) -> [f64; 12] {
        [
            self.pos.x, self.pos.y, self.pos.z,
            self.vel.x, self.vel.y, self.vel.z,
            self.att.x, self.att.y, self.att.z,
            self.rates.x, self.rates.y, self.rates.z,
        ]
    }

    /// Rebuild from the solver layout. Inverse of `to_array`.
    pub fn from_array(time: f64, y: &[f64; 12]) -> State {
        State {
            time,
            pos: Vector3::new(y[0], y[1], y[2]),
            vel: Vector3::new(y[3], y[4], y[5]),
            att: Vector3::new(y[6], y[7], y[8]),
            rates: Vector3::new(y[9], y[10], y[11]),
        }
    }

    /// Altitude above the NED origin (m). Down position is negated.
    pub fn altitude(&self) -> f64 {
        -self.pos.z
    }

    /// Total airspeed (m/s), still-air assumption.
    pub fn airspeed(&self) -> f64 {
        self.vel.norm()
    }

    /// Angle of attack (rad), four-quadrant. Well-defined even at u = 0.
    pub fn alpha(&self) -> f64 {
        self.vel.z.atan2(self.vel.x)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Deriv {
    pub dpos: Vector3<f64>,    // Earth-frame position rate
    pub dvel: Vector3<f64>,    // body-frame acceleration
    pub datt: Vector3<f64>,    // Euler angle rates
    pub drates: Vector3<f64>,  // body-frame angular acceleration
}

impl Deriv {
    /// Flatten to the solver layout, same ordering as `State::to_array`.
    pub fn to_array(&self) -> [f64; 12] {
        [
            self.dpos.x, self.dpos.y, self.dpos.z,
            self.dvel.x, self.dvel.y, self.dvel.z,
            self.datt.x, self.datt.y, self.datt.z,
            self.drates.x, self.drates.y, self.drates.z,
        ]
    }
}

// ---------------------------------------------------------------------------
// Control input
// ---------------------------------------------------------------------------

/// Pilot/autopilot inputs, applied instantaneously.
///
/// Throttle is dimensionless, conventionally [0, 1] but not clamped.
/// Elevator is in radians; negative deflection commands nose-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub throttle: f64,
    pub elevator: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn flat_array_round_trip_is_lossless() {
        let s = State {
            time: 3.5,
            pos: Vector3::new(120.0, -4.0, -1000.0),
            vel: Vector3::new(61.2, 0.3, -2.7),
            att: Vector3::new(0.01, 0.2, -0.05),
            rates: Vector3::new(0.001, 0.04, -0.002),
        };
        let back = State::from_array(s.time, &s.to_array());
        assert_eq!(s, back);
    }

    #[test]
    fn altitude_negates_down_position() {
        let mut s = State::at_rest(0.0);
        s.pos.z = -1000.0;
        assert_relative_eq!(s.altitude(), 1000.0);
    }

    #[test]
    fn alpha_matches_atan_for_forward_flight() {
        let mut s = State::at_rest(0.0);
        s.vel = Vector3::new(60.0, 0.0, 3.0);
        assert_relative_eq!(s.alpha(), (3.0_f64 / 60.0).atan(), epsilon = 1e-12);
    }

    #[test]
    fn alpha_defined_for_pure_vertical_flow() {
        let mut s = State::at_rest(0.0);
        s.vel = Vector3::new(0.0, 0.0, 5.0);
        assert!(s.alpha().is_finite());
        assert_relative_eq!(s.alpha(), FRAC_PI_2, epsilon = 1e-12);
    }
}
