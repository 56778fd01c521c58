use log::{error, trace};
use nalgebra::Vector4;

use crate::{DynamicsModel, Parameters, SimError, SimResult, SimulationState};

/// Sub-step ceiling used by the interactive simulation (s).
pub const DEFAULT_MAX_SUBSTEP: f64 = 0.002;

/// Most sub-steps a single `advance` may take. Longer intervals are rejected.
pub const MAX_SUBSTEPS: usize = 10_000_000;

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances the state by one step of `dt` seconds. `dt` may be negative.
    fn step<M: DynamicsModel + ?Sized>(
        &self,
        model: &M,
        state: &SimulationState,
        params: &Parameters,
        dt: f64,
    ) -> SimulationState;
}

/// Classic fourth-order Runge-Kutta.
/// Four model evaluations per step, combined with weights 1:2:2:1 over 6.
/// Running it with a negative `dt` integrates backward in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    fn step<M: DynamicsModel + ?Sized>(
        &self,
        model: &M,
        state: &SimulationState,
        params: &Parameters,
        dt: f64,
    ) -> SimulationState {
        let f = |x: &Vector4<f64>| {
            model
                .derivatives(&SimulationState::from_vector(x), params)
                .to_vector()
        };

        let x = state.to_vector();
        let k1 = f(&x);
        let k2 = f(&(x + k1 * (0.5 * dt)));
        let k3 = f(&(x + k2 * (0.5 * dt)));
        let k4 = f(&(x + k3 * dt));

        let next = x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
        SimulationState::from_vector(&next)
    }
}

/// Splits a requested interval into sub-steps no longer than `max_dt`.
///
/// `floor(|dt| / max_dt)` full sub-steps run first, then one shorter sub-step
/// consumes the remainder. The split depends only on `dt`, so identical inputs
/// give bit-identical results.
#[derive(Debug, Clone)]
pub struct SubstepIntegrator<I: Integrator> {
    pub integrator: I,
    pub max_dt: f64,
}

impl Default for SubstepIntegrator<RungeKutta4> {
    fn default() -> Self {
        SubstepIntegrator {
            integrator: RungeKutta4,
            max_dt: DEFAULT_MAX_SUBSTEP,
        }
    }
}

impl<I: Integrator> SubstepIntegrator<I> {
    pub fn new(integrator: I, max_dt: f64) -> SimResult<Self> {
        if !(max_dt.is_finite() && max_dt > 0.0) {
            return Err(SimError::InvalidTimestep { value: max_dt });
        }
        Ok(SubstepIntegrator { integrator, max_dt })
    }

    /// Number of sub-steps `advance` takes for an interval of `dt`.
    pub fn substep_count(&self, dt: f64) -> usize {
        let (full, remainder) = self.split(dt.abs());
        full + usize::from(remainder > 0.0)
    }

    fn split(&self, span: f64) -> (usize, f64) {
        let full = (span / self.max_dt).floor();
        let remainder = span - full * self.max_dt;
        // Leftovers at rounding-noise level are dropped rather than integrated.
        let remainder = if remainder > self.max_dt * 1e-9 { remainder } else { 0.0 };
        (full as usize, remainder)
    }

    /// Advances `state` by `dt` (negative to run backward).
    ///
    /// Fails without producing a state if any sub-step leaves the finite domain.
    pub fn advance<M: DynamicsModel + ?Sized>(
        &self,
        model: &M,
        state: &SimulationState,
        params: &Parameters,
        dt: f64,
    ) -> SimResult<SimulationState> {
        if !dt.is_finite() || dt.abs() / self.max_dt > MAX_SUBSTEPS as f64 {
            return Err(SimError::InvalidTimestep { value: dt });
        }

        let direction = dt.signum();
        let (full, remainder) = self.split(dt.abs());
        let mut current = *state;

        let sizes = std::iter::repeat(self.max_dt)
            .take(full)
            .chain((remainder > 0.0).then_some(remainder));

        for (substep, h) in sizes.enumerate() {
            current = self.integrator.step(model, &current, params, direction * h);
            if !current.is_finite() {
                error!("non-finite state after sub-step {substep} of dt = {dt}: {current:?}");
                return Err(SimError::NonFiniteState {
                    substep,
                    state: current.to_array(),
                });
            }
        }

        trace!("advanced dt = {dt} in {} sub-steps", self.substep_count(dt));
        Ok(current)
    }
}
