//! Physical parameters of the pendulum and the ranges a host may edit them in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Physical parameters of a two-link pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Mass of the first bob (kg)
    pub m1: f64,
    /// Mass of the second bob (kg)
    pub m2: f64,
    /// Length of the first link (m)
    pub l1: f64,
    /// Length of the second link (m)
    pub l2: f64,
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Viscous damping coefficient applied to each joint (1/s)
    pub damping: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            m1: 1.0,
            m2: 1.0,
            l1: 1.0,
            l2: 1.0,
            g: 9.81,
            damping: 0.0,
        }
    }
}

impl Parameters {
    /// Build and validate a parameter set.
    pub fn new(m1: f64, m2: f64, l1: f64, l2: f64, g: f64, damping: f64) -> SimResult<Self> {
        let params = Parameters { m1, m2, l1, l2, g, damping };
        params.validate()?;
        Ok(params)
    }

    pub fn with_masses(mut self, m1: f64, m2: f64) -> Self {
        self.m1 = m1;
        self.m2 = m2;
        self
    }

    pub fn with_lengths(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Reject anything the dynamics model cannot compute with.
    pub fn validate(&self) -> SimResult<()> {
        positive("m1", self.m1)?;
        positive("m2", self.m2)?;
        positive("l1", self.l1)?;
        positive("l2", self.l2)?;
        non_negative("g", self.g)?;
        non_negative("damping", self.damping)?;
        Ok(())
    }

    /// Fully stretched reach of the two links.
    pub fn max_reach(&self) -> f64 {
        self.l1 + self.l2
    }

    /// Closest the end effector can get to the pivot.
    pub fn min_reach(&self) -> f64 {
        (self.l1 - self.l2).abs()
    }
}

fn positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value, requirement: "finite and > 0" })
    }
}

fn non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value, requirement: "finite and >= 0" })
    }
}

/// Editable range of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    /// Quantization step used when a typed value is committed (0 disables snapping)
    pub step: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        ParameterRange { min, max, step }
    }

    /// NaN passes through so that validation can reject it.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        value.max(self.min).min(self.max)
    }

    /// Clamp into the range, then round onto the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    /// Uniform sample over `[min, max]`, not snapped.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ranges for every host-editable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRanges {
    pub length: ParameterRange,
    pub mass: ParameterRange,
    pub gravity: ParameterRange,
    pub damping: ParameterRange,
    pub time_scale: ParameterRange,
}

impl Default for ParameterRanges {
    fn default() -> Self {
        ParameterRanges {
            length: ParameterRange::new(0.4, 2.5, 0.01),
            mass: ParameterRange::new(0.5, 5.0, 0.05),
            gravity: ParameterRange::new(0.5, 25.0, 0.1),
            damping: ParameterRange::new(0.0, 0.05, 0.0005),
            time_scale: ParameterRange::new(0.25, 3.0, 0.05),
        }
    }
}

impl ParameterRanges {
    /// Draw a parameter set uniformly from the ranges.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Parameters {
        Parameters {
            l1: self.length.sample(rng),
            l2: self.length.sample(rng),
            m1: self.mass.sample(rng),
            m2: self.mass.sample(rng),
            g: self.gravity.sample(rng),
            damping: self.damping.sample(rng),
        }
    }

    /// Names of the fields of `params` that fall outside their range.
    pub fn out_of_range(&self, params: &Parameters) -> Vec<&'static str> {
        [
            ("m1", &self.mass, params.m1),
            ("m2", &self.mass, params.m2),
            ("l1", &self.length, params.l1),
            ("l2", &self.length, params.l2),
            ("g", &self.gravity, params.g),
            ("damping", &self.damping, params.damping),
        ]
        .into_iter()
        .filter(|(_, range, value)| !range.contains(*value))
        .map(|(name, _, _)| name)
        .collect()
    }

    /// Snap every field of `params` into its range.
    pub fn snap(&self, params: &Parameters) -> Parameters {
        Parameters {
            m1: self.mass.snap(params.m1),
            m2: self.mass.snap(params.m2),
            l1: self.length.snap(params.l1),
            l2: self.length.snap(params.l2),
            g: self.gravity.snap(params.g),
            damping: self.damping.snap(params.damping),
        }
    }
}
