//! Error types for the simulation library.
//!
//! Only structural failures surface here. Numerical edge cases (zero temperature
//! during rescaling, zero force norm during minimization, coincident particles)
//! are handled in place by the components that meet them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown particle type `{0}` (supported: H, C, O)")]
    InvalidParticleType(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
