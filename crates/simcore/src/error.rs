//! Error types shared by the simulation crates.

use thiserror::Error;

/// Errors raised by the simulation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A physical parameter is outside its valid domain.
    #[error("invalid parameter {name} = {value}: must be {requirement}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    /// A time step is not usable for integration.
    #[error("invalid time step {value}")]
    InvalidTimestep { value: f64 },

    /// Integration produced NaN or infinity. The run cannot continue from here.
    #[error("integration produced a non-finite state at sub-step {substep}: {state:?}")]
    NonFiniteState { substep: usize, state: [f64; 4] },
}

impl SimError {
    /// True for errors caused by the numbers the host passed in rather than by the integration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidParameter { .. } | SimError::InvalidTimestep { .. }
        )
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
