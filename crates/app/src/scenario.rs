//! Scenario files for headless runs
//!
//! A scenario is a JSON document describing the simulation to build, how long
//! to run it and which host inputs to replay at which frame. Every field is
//! optional; an empty object runs the default pendulum for ten seconds.

use log::LevelFilter;
use mechanics::{DragHandle, SimConfig};
use serde::{Deserialize, Serialize};
use simcore::Parameters;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub simulation: SimConfig,
    /// Real seconds to run for
    pub duration_s: f64,
    /// Host loop rate (Hz); every frame ticks the simulation by `1 / frame_rate`
    pub frame_rate: f64,
    /// Print a snapshot every this many frames (0 prints only the final one)
    pub report_every: usize,
    /// One of off, error, warn, info, debug, trace
    pub log_level: String,
    /// Seed for the randomize commands; entropy when absent
    pub seed: Option<u64>,
    pub events: Vec<Event>,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            simulation: SimConfig::default(),
            duration_s: 10.0,
            frame_rate: 60.0,
            report_every: 60,
            log_level: "info".to_string(),
            seed: None,
            events: vec![Event {
                frame: 0,
                command: Command::Play,
            }],
        }
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> AppResult<Self> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(AppError::InvalidScenario(format!(
                "frame_rate must be finite and > 0, got {}",
                self.frame_rate
            )));
        }
        if !(self.duration_s.is_finite() && self.duration_s >= 0.0) {
            return Err(AppError::InvalidScenario(format!(
                "duration_s must be finite and >= 0, got {}",
                self.duration_s
            )));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> AppResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| AppError::InvalidScenario(format!("unknown log level {:?}", self.log_level)))
    }

    /// Number of host frames in the run.
    pub fn frames(&self) -> usize {
        (self.duration_s * self.frame_rate).round() as usize
    }

    pub fn frame_dt(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

/// A host input replayed before the simulation ticks on `frame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub frame: usize,
    pub command: Command,
}

/// Host inputs, named after the keys and buttons of an interactive front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    TogglePause,
    Reset,
    ResetAngles { theta1: f64, theta2: f64 },
    StepForward,
    StepBack,
    Drag { handle: DragHandle, x: f64, y: f64 },
    SetParameters(ParameterEdit),
    RandomizeParameters,
    RandomizeAngles,
    NudgeGravity { delta: f64 },
    ToggleDamping,
    CycleTimeScale,
    ClearTrail,
}

/// Partial parameter update. Missing fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterEdit {
    pub m1: Option<f64>,
    pub m2: Option<f64>,
    pub l1: Option<f64>,
    pub l2: Option<f64>,
    pub g: Option<f64>,
    pub damping: Option<f64>,
}

impl ParameterEdit {
    pub fn apply_to(&self, current: &Parameters) -> Parameters {
        Parameters {
            m1: self.m1.unwrap_or(current.m1),
            m2: self.m2.unwrap_or(current.m2),
            l1: self.l1.unwrap_or(current.l1),
            l2: self.l2.unwrap_or(current.l2),
            g: self.g.unwrap_or(current.g),
            damping: self.damping.unwrap_or(current.damping),
        }
    }
}
