use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Aircraft definition (static physical and aerodynamic parameters)
// ---------------------------------------------------------------------------

/// Immutable physical description of the simulated aircraft.
///
/// Constructed once per run and passed explicitly into every force and
/// dynamics call; nothing here is mutated during integration.
#[derive(Debug, Clone)]
pub struct AircraftConfig {
    pub mass: f64,              // kg
    pub wing_area: f64,         // m^2
    pub span: f64,              // m
    pub chord: f64,             // m

    pub ix: f64,                // roll inertia, kg*m^2
    pub iy: f64,                // pitch inertia, kg*m^2
    pub iz: f64,                // yaw inertia, kg*m^2
    pub ixz: f64,               // roll-yaw coupling, kg*m^2 (unused by the moment model)

    pub cl_alpha: f64,          // lift-curve slope, per rad
    pub cd0: f64,               // zero-lift drag coefficient
    pub induced_drag_k: f64,    // induced drag factor: CD = CD0 + k*CL^2
    pub cm_alpha: f64,          // pitching moment slope, per rad
    pub cm_elevator: f64,       // elevator pitch authority, per rad
    pub blown_lift_factor: f64, // propwash lift augmentation gain
    pub max_thrust: f64,        // N, at full throttle
}

impl AircraftConfig {
    /// The reference STOL light aircraft.
    pub fn stol() -> AircraftConfig {
        AircraftConfig {
            mass: 1200.0,
            wing_area: 15.0,
            span: 10.0,
            chord: 1.5,
            ix: 1000.0,
            iy: 2500.0,
            iz: 3000.0,
            ixz: 100.0,
            cl_alpha: 2.0 * std::f64::consts::PI, // thin-airfoil theory
            cd0: 0.05,
            induced_drag_k: 0.04,
            cm_alpha: -0.5,
            cm_elevator: -1.2,
            blown_lift_factor: 2.5,
            max_thrust: 5000.0,
        }
    }

    /// Reject physically meaningless parameters before any integration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        if self.wing_area <= 0.0 {
            return Err(ConfigError::NonPositiveWingArea(self.wing_area));
        }
        for (axis, value) in [("roll", self.ix), ("pitch", self.iy), ("yaw", self.iz)] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveInertia { axis, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Aircraft builder
// ---------------------------------------------------------------------------

/// Builder over the STOL baseline; `build()` validates.
pub struct AircraftBuilder {
    config: AircraftConfig,
}

impl AircraftBuilder {
    pub fn new() -> Self {
        Self { config: AircraftConfig::stol() }
    }

    pub fn mass(mut self, v: f64) -> Self { self.config.mass = v; self }
    pub fn wing_area(mut self, v: f64) -> Self { self.config.wing_area = v; self }
    pub fn span(mut self, v: f64) -> Self { self.config.span = v; self }
    pub fn chord(mut self, v: f64) -> Self { self.config.chord = v; self }
    pub fn inertia(mut self, ix: f64, iy: f64, iz: f64, ixz: f64) -> Self {
        self.config.ix = ix;
        self.config.iy = iy;
        self.config.iz = iz;
        self.config.ixz = ixz;
        self
    }
    pub fn cl_alpha(mut self, v: f64) -> Self { self.config.cl_alpha = v; self }
    pub fn cd0(mut self, v: f64) -> Self { self.config.cd0 = v; self }
    pub fn induced_drag_k(mut self, v: f64) -> Self { self.config.induced_drag_k = v; self }
    pub fn cm_alpha(mut self, v: f64) -> Self { self.config.cm_alpha = v; self }
    pub fn cm_elevator(mut self, v: f64) -> Self { self.config.cm_elevator = v; self }
    pub fn blown_lift_factor(mut self, v: f64) -> Self { self.config.blown_lift_factor = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.config.max_thrust = v; self }

    pub fn build(self) -> Result<AircraftConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for AircraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stol_preset_is_valid() {
        assert!(AircraftConfig::stol().validate().is_ok());
    }

    #[test]
    fn zero_mass_rejected_at_build() {
        let err = AircraftBuilder::new().mass(0.0).build().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveMass(0.0));
    }

    #[test]
    fn negative_wing_area_rejected() {
        let err = AircraftBuilder::new().wing_area(-1.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveWingArea(_)));
    }

    #[test]
    fn zero_pitch_inertia_rejected() {
        let err = AircraftBuilder::new()
            .inertia(1000.0, 0.0, 3000.0, 100.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveInertia { axis: "pitch", value: 0.0 }
        );
    }
}
