//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – box size, target temperature, seed and initial velocities
//! - [`PhasesConfig`]     – per-phase enablement, timestep, step budget and controls
//! - [`AtomGroupConfig`]  – atoms of one type, placed at random or at given positions
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! parameters:
//!   boxsize: 20.0           # periodic box edge, positions live in [0, boxsize)
//!   temperature: 0.8        # Berendsen target temperature (reduced units)
//!   seed: 42                # optional, omit for non-reproducible placement
//!   init_velocities: true   # draw initial velocities at `temperature`
//!
//! phases:
//!   minimize:
//!     enabled: true
//!     dt: 0.01              # displacement per step along the unit force
//!     steps: 500
//!     convergence: 1.0      # stop once max |F_i| is below this
//!   equilibrate:
//!     enabled: true
//!     dt: 0.001
//!     steps: 2000
//!     tau: 0.1              # thermostat coupling time
//!   produce:
//!     enabled: true
//!     dt: 0.001
//!     steps: 5000
//!
//! atoms:
//!   - symbol: O
//!     count: 30             # placed uniformly at random
//!   - symbol: H
//!     positions: [[5.0, 5.0], [6.2, 5.0]]
//! ```
//!
//! Every `phases` entry and every field inside it may be omitted and falls
//! back to the defaults of [`SimulationParameters`](crate::simulation::params::SimulationParameters).

use serde::Deserialize;

use crate::simulation::params::{EquilibrateParams, MinimizeParams, ProduceParams};

/// Global physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub boxsize: f64,     // periodic box edge length
    pub temperature: f64, // thermostat target, also used for initial velocities
    #[serde(default)]
    pub seed: Option<u64>, // fixes placement and initial velocities
    #[serde(default)]
    pub init_velocities: bool, // false - atoms start at rest
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MinimizeConfig {
    pub enabled: bool,
    pub dt: f64,
    pub steps: usize,
    pub convergence: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EquilibrateConfig {
    pub enabled: bool,
    pub dt: f64,
    pub steps: usize,
    pub tau: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProduceConfig {
    pub enabled: bool,
    pub dt: f64,
    pub steps: usize,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        let p = MinimizeParams::default();
        Self {
            enabled: p.enabled,
            dt: p.dt,
            steps: p.max_steps,
            convergence: p.convergence,
        }
    }
}

impl Default for EquilibrateConfig {
    fn default() -> Self {
        let p = EquilibrateParams::default();
        Self {
            enabled: p.enabled,
            dt: p.dt,
            steps: p.max_steps,
            tau: p.tau,
        }
    }
}

impl Default for ProduceConfig {
    fn default() -> Self {
        let p = ProduceParams::default();
        Self {
            enabled: p.enabled,
            dt: p.dt,
            steps: p.max_steps,
        }
    }
}

impl From<MinimizeConfig> for MinimizeParams {
    fn from(c: MinimizeConfig) -> Self {
        Self {
            enabled: c.enabled,
            dt: c.dt,
            max_steps: c.steps,
            convergence: c.convergence,
        }
    }
}

impl From<EquilibrateConfig> for EquilibrateParams {
    fn from(c: EquilibrateConfig) -> Self {
        Self {
            enabled: c.enabled,
            dt: c.dt,
            max_steps: c.steps,
            tau: c.tau,
        }
    }
}

impl From<ProduceConfig> for ProduceParams {
    fn from(c: ProduceConfig) -> Self {
        Self {
            enabled: c.enabled,
            dt: c.dt,
            max_steps: c.steps,
        }
    }
}

/// Phase sequence settings, always run in the order minimize, equilibrate, produce
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PhasesConfig {
    pub minimize: MinimizeConfig,
    pub equilibrate: EquilibrateConfig,
    pub produce: ProduceConfig,
}

/// Atoms of a single type
#[derive(Deserialize, Debug, Clone)]
pub struct AtomGroupConfig {
    pub symbol: String, // element symbol from the type table (H, C, O)
    #[serde(default)]
    pub count: usize, // atoms placed uniformly at random in the box
    #[serde(default)]
    pub positions: Vec<[f64; 2]>, // atoms placed at explicit positions
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // Global physical parameters
    #[serde(default)]
    pub phases: PhasesConfig, // Minimize / equilibrate / produce settings
    pub atoms: Vec<AtomGroupConfig>, // Atom groups that define the initial system
}

impl ScenarioConfig {
    /// Number of atoms the scenario will create
    pub fn n_atoms(&self) -> usize {
        self.atoms.iter().map(|g| g.count + g.positions.len()).sum()
    }
}
