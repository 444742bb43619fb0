pub mod atoms;
pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod thermostat;
pub mod phases;
pub mod recorder;
pub mod engine;
pub mod scenario;
