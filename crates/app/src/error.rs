use simcore::SimError;
use thiserror::Error;

/// Everything that can end a headless run early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
