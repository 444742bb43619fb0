pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::states::{ParticleSystem, NVec2};
pub use simulation::atoms::AtomKind;
pub use simulation::forces::{ForceField, LennardJones};
pub use simulation::integrator::{verlet_step, steepest_descent_step, wrap_position, wrap_positions};
pub use simulation::thermostat::Berendsen;
pub use simulation::params::{SimulationParameters, MinimizeParams, EquilibrateParams, ProduceParams};
pub use simulation::phases::{Phase, PhaseController, PhaseOutcome, PhaseState};
pub use simulation::recorder::{Recorder, Snapshot, Metric, SeriesRecorder};
pub use simulation::engine::{Engine, TickReport};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, ParametersConfig, PhasesConfig, AtomGroupConfig};

pub use benchmark::benchmark::{bench_forces, bench_verlet};
