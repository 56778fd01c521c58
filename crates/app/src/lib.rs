//! Headless host for the double pendulum: scenario files in, JSON snapshots out.

pub mod error;
pub mod runner;
pub mod scenario;

pub use error::{AppError, AppResult};
pub use runner::{RunSummary, Runner};
pub use scenario::{Command, Event, ParameterEdit, Scenario};
