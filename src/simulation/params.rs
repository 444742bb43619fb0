//! Numerical and physical parameters for a run
//!
//! `SimulationParameters` holds the strongly typed, immutable settings:
//! - box size and target temperature,
//! - per-phase enablement, timestep and step budget,
//! - minimization convergence threshold and thermostat time constant,
//! - optional seed for initial placement / velocities
//!
//! Validation happens once, before the engine is built.

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeParams {
    pub enabled: bool,
    pub dt: f64,          // displacement per step along the unit force
    pub max_steps: usize, // step budget
    pub convergence: f64, // stop once max |F_i| falls below this
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquilibrateParams {
    pub enabled: bool,
    pub dt: f64,
    pub max_steps: usize,
    pub tau: f64, // Berendsen coupling time
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProduceParams {
    pub enabled: bool,
    pub dt: f64,
    pub max_steps: usize,
}

impl Default for MinimizeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            dt: 0.01,
            max_steps: 1000,
            convergence: 1.0,
        }
    }
}

impl Default for EquilibrateParams {
    fn default() -> Self {
        Self {
            enabled: true,
            dt: 0.001,
            max_steps: 1000,
            tau: 0.1,
        }
    }
}

impl Default for ProduceParams {
    fn default() -> Self {
        Self {
            enabled: true,
            dt: 0.001,
            max_steps: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    pub boxsize: f64,
    pub temperature: f64, // thermostat target
    pub seed: Option<u64>,
    pub minimize: MinimizeParams,
    pub equilibrate: EquilibrateParams,
    pub produce: ProduceParams,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            boxsize: 10.0,
            temperature: 1.0,
            seed: None,
            minimize: MinimizeParams::default(),
            equilibrate: EquilibrateParams::default(),
            produce: ProduceParams::default(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidConfiguration(msg.into())
}

fn check_phase(name: &str, enabled: bool, dt: f64, max_steps: usize) -> Result<()> {
    if !enabled {
        return Ok(());
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(invalid(format!("{name}: dt must be positive, got {dt}")));
    }
    if max_steps == 0 {
        return Err(invalid(format!("{name}: steps must be at least 1")));
    }
    Ok(())
}

impl SimulationParameters {
    /// Reject parameter sets the engine cannot run. `n_atoms` is the number
    /// of particles the run will start with.
    pub fn validate(&self, n_atoms: usize) -> Result<()> {
        if !(self.boxsize.is_finite() && self.boxsize > 0.0) {
            return Err(invalid(format!("boxsize must be positive, got {}", self.boxsize)));
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.0) {
            return Err(invalid(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        if n_atoms == 0 {
            return Err(invalid("at least one atom is required"));
        }

        let m = &self.minimize;
        check_phase("minimize", m.enabled, m.dt, m.max_steps)?;
        if m.enabled && !(m.convergence > 0.0) {
            return Err(invalid(format!(
                "minimize: convergence must be positive, got {}",
                m.convergence
            )));
        }

        let e = &self.equilibrate;
        check_phase("equilibrate", e.enabled, e.dt, e.max_steps)?;
        if e.enabled && !(e.tau.is_finite() && e.tau > 0.0) {
            return Err(invalid(format!("equilibrate: tau must be positive, got {}", e.tau)));
        }

        let p = &self.produce;
        check_phase("produce", p.enabled, p.dt, p.max_steps)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimulationParameters::default().validate(10), Ok(()));
    }

    #[test]
    fn rejects_bad_box() {
        for boxsize in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let p = SimulationParameters {
                boxsize,
                ..Default::default()
            };
            assert!(matches!(p.validate(1), Err(SimError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn rejects_negative_temperature_and_empty_system() {
        let p = SimulationParameters {
            temperature: -1.0,
            ..Default::default()
        };
        assert!(p.validate(1).is_err());
        assert!(SimulationParameters::default().validate(0).is_err());
    }

    #[test]
    fn disabled_phases_are_not_checked() {
        let mut p = SimulationParameters::default();
        p.equilibrate.enabled = false;
        p.equilibrate.tau = 0.0;
        p.equilibrate.max_steps = 0;
        assert_eq!(p.validate(1), Ok(()));

        p.produce.max_steps = 0;
        assert!(p.validate(1).is_err());
    }
}
