//! Pendulum Simulation - the context a host control loop owns
//!
//! Bundles the physical state with everything the host edits or reads between
//! frames:
//! - validated parameters and the energy baseline used for drift
//! - the rewindable end-effector trail
//! - the simulation clock, time scale and pause flag
//!
//! All operations run to completion on the caller's thread. The energy
//! baseline is refreshed by every explicit edit and never by integration.

use log::{debug, error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use simcore::{
    ParameterRanges, Parameters, Point2, RungeKutta4, SimError, SimResult, SimulationState,
    SubstepIntegrator, DEFAULT_MAX_SUBSTEP,
};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::ik::{self, DragHandle};
use crate::pendulum::{self, DoublePendulum};
use crate::trail::Trail;

/// Time scales visited by [`PendulumSim::cycle_time_scale`].
pub const TIME_SCALE_CYCLE: [f64; 5] = [0.25, 0.5, 1.0, 1.5, 2.0];

/// Gravity limits for [`PendulumSim::nudge_gravity`] (m/s²).
pub const GRAVITY_NUDGE_MIN: f64 = 0.5;
pub const GRAVITY_NUDGE_MAX: f64 = 30.0;

/// Configuration for a pendulum simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Physical parameters restored by a reset to defaults
    pub parameters: Parameters,
    /// Ranges the host may edit parameters in
    pub ranges: ParameterRanges,
    /// Simulated seconds per real second
    pub time_scale: f64,
    /// Host frame rate (Hz); one frame step covers `time_scale / frame_rate` seconds
    pub frame_rate: f64,
    /// Longest single integration sub-step (s)
    pub max_substep: f64,
    /// Starting angles (rad)
    pub theta1: f64,
    pub theta2: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            parameters: Parameters::default().with_damping(0.01),
            ranges: ParameterRanges::default(),
            time_scale: 1.0,
            frame_rate: 60.0,
            max_substep: DEFAULT_MAX_SUBSTEP,
            theta1: FRAC_PI_2,
            theta2: FRAC_PI_2,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_max_substep(mut self, max_substep: f64) -> Self {
        self.max_substep = max_substep;
        self
    }

    pub fn with_angles(mut self, theta1: f64, theta2: f64) -> Self {
        self.theta1 = theta1;
        self.theta2 = theta2;
        self
    }

    /// Duration of one host frame at the configured time scale (s).
    pub fn frame_dt(&self) -> f64 {
        self.time_scale / self.frame_rate
    }
}

/// Direction of a single-frame step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameDirection {
    Forward,
    Backward,
}

impl FrameDirection {
    fn sign(self) -> f64 {
        match self {
            FrameDirection::Forward => 1.0,
            FrameDirection::Backward => -1.0,
        }
    }
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub state: SimulationState,
    pub parameters: Parameters,
    pub time_scale: f64,
    pub joint1: [f64; 2],
    pub joint2: [f64; 2],
    pub energy: f64,
    pub energy_drift: f64,
    pub trail_index: usize,
    pub paused: bool,
}

/// The pendulum, its parameters, the drift baseline and the trail.
#[derive(Debug, Clone)]
pub struct PendulumSim {
    config: SimConfig,
    state: SimulationState,
    params: Parameters,
    energy_reference: f64,
    trail: Trail,
    integrator: SubstepIntegrator<RungeKutta4>,
    sim_time: f64,
    time_scale: f64,
    paused: bool,
    /// Restored by `toggle_damping`; tracks the last non-zero damping.
    default_damping: f64,
}

impl PendulumSim {
    /// Validate `config` and build a paused simulation at the configured angles.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.parameters.validate()?;
        if !(config.frame_rate.is_finite() && config.frame_rate > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "frame_rate",
                value: config.frame_rate,
                requirement: "finite and > 0",
            });
        }
        let integrator = SubstepIntegrator::new(RungeKutta4, config.max_substep)?;
        let state = SimulationState::at_rest(config.theta1, config.theta2);
        if !state.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "theta",
                value: if config.theta1.is_finite() { config.theta2 } else { config.theta1 },
                requirement: "finite",
            });
        }

        let params = config.parameters;
        let mut sim = PendulumSim {
            time_scale: config.ranges.time_scale.snap(config.time_scale),
            default_damping: params.damping,
            energy_reference: 0.0,
            trail: Trail::new(),
            config,
            state,
            params,
            integrator,
            sim_time: 0.0,
            paused: true,
        };
        sim.mark_edited();
        info!("pendulum simulation ready: {:?}", sim.params);
        Ok(sim)
    }

    // === Explicit edits ===

    /// Set both angles (default pi/2 each) and stop all motion.
    ///
    /// Non-finite angles are rejected and leave the simulation untouched.
    pub fn reset(&mut self, theta1: Option<f64>, theta2: Option<f64>) -> SimResult<()> {
        let theta1 = theta1.unwrap_or(FRAC_PI_2);
        let theta2 = theta2.unwrap_or(FRAC_PI_2);
        for value in [theta1, theta2] {
            if !value.is_finite() {
                return Err(SimError::InvalidParameter {
                    name: "theta",
                    value,
                    requirement: "finite",
                });
            }
        }
        self.rest_at(theta1, theta2);
        Ok(())
    }

    /// Restore configured parameters and time scale, then reset to the horizontal pose.
    pub fn reset_to_defaults(&mut self) {
        self.params = self.config.parameters;
        self.default_damping = self.params.damping;
        self.time_scale = self.config.ranges.time_scale.snap(self.config.time_scale);
        self.rest_at(FRAC_PI_2, FRAC_PI_2);
    }

    /// Drag `handle` to `target` (pivot-relative, metres). Intended for use while paused.
    pub fn apply_inverse_kinematics(&mut self, target: Point2, handle: DragHandle) {
        self.state = ik::apply(&self.state, &self.params, &target, handle);
        debug!("dragged {handle:?} to ({:.4}, {:.4})", target.x, target.y);
        self.mark_edited();
    }

    /// The handle under `point`, if any, within `radius` metres.
    pub fn pick_handle(&self, point: Point2, radius: f64) -> Option<DragHandle> {
        ik::pick_handle(&self.state, &self.params, &point, radius)
    }

    /// Commit a host-typed parameter set: every field is snapped into its
    /// configured range and step grid, then applied as by [`set_parameters`].
    ///
    /// Returns the parameters actually stored.
    ///
    /// [`set_parameters`]: PendulumSim::set_parameters
    pub fn commit_parameters(&mut self, params: Parameters) -> SimResult<Parameters> {
        let ranges = self.config.ranges;
        for name in ranges.out_of_range(&params) {
            warn!("{name} outside its editable range, clamping");
        }
        let snapped = ranges.snap(&params);
        self.set_parameters(snapped)?;
        Ok(snapped)
    }

    /// Replace the parameters. Rejected sets leave the simulation untouched.
    pub fn set_parameters(&mut self, params: Parameters) -> SimResult<()> {
        params.validate()?;
        let lengths_changed = params.l1 != self.params.l1 || params.l2 != self.params.l2;
        self.params = params;
        if params.damping > 0.0 {
            self.default_damping = params.damping;
        }
        debug!("parameters set: {params:?}");
        if lengths_changed {
            self.mark_edited();
        } else {
            self.refresh_energy_reference();
        }
        Ok(())
    }

    /// Snap `time_scale` into its range and use it from the next tick on.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale.is_finite() {
            self.time_scale = self.config.ranges.time_scale.snap(time_scale);
        }
    }

    /// Draw new parameters and time scale from their ranges. Angles are kept, motion stops.
    pub fn randomize_parameters<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let ranges = self.config.ranges;
        self.params = ranges.sample(rng);
        self.default_damping = self.params.damping;
        self.time_scale = ranges.time_scale.sample(rng);
        self.state = self.state.stopped();
        self.paused = true;
        self.sim_time = 0.0;
        debug!("randomized parameters: {:?}, time scale {:.3}", self.params, self.time_scale);
        self.mark_edited();
    }

    /// Random angles in [-pi, pi] from rest, then start running.
    pub fn randomize_angles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let theta1 = rng.gen_range(-PI..=PI);
        let theta2 = rng.gen_range(-PI..=PI);
        self.rest_at(theta1, theta2);
        self.paused = false;
    }

    /// Shift gravity by `delta`, kept within [0.5, 30] m/s².
    pub fn nudge_gravity(&mut self, delta: f64) {
        if delta.is_finite() {
            self.params.g = (self.params.g + delta).clamp(GRAVITY_NUDGE_MIN, GRAVITY_NUDGE_MAX);
            self.refresh_energy_reference();
        }
    }

    /// Switch damping off, or back on to the last non-zero value.
    pub fn toggle_damping(&mut self) {
        self.params.damping = if self.params.damping > 0.0 {
            0.0
        } else {
            self.default_damping
        };
        self.refresh_energy_reference();
    }

    /// Move to the next entry of [`TIME_SCALE_CYCLE`]. Off-cycle values continue after 1.0.
    pub fn cycle_time_scale(&mut self) {
        let idx = TIME_SCALE_CYCLE
            .iter()
            .position(|&s| s == self.time_scale)
            .unwrap_or(2);
        self.time_scale = TIME_SCALE_CYCLE[(idx + 1) % TIME_SCALE_CYCLE.len()];
    }

    /// Forget the trail and restart it at the current end-effector position.
    pub fn clear_trail(&mut self) {
        self.trail.reset_with(self.end_effector());
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    // === Time evolution ===

    /// Integrate by `dt` seconds (negative runs backward). The trail is not touched.
    ///
    /// On a non-finite result the state is kept as it was and the simulation pauses.
    pub fn step(&mut self, dt: f64) -> SimResult<()> {
        match self
            .integrator
            .advance(&DoublePendulum, &self.state, &self.params, dt)
        {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(err) => {
                if matches!(err, SimError::NonFiniteState { .. }) {
                    error!("integration failed at t = {:.4} s, pausing: {err}", self.sim_time);
                    self.paused = true;
                }
                Err(err)
            }
        }
    }

    /// One host tick of `dt_real` wall-clock seconds. Does nothing while paused.
    /// Ticks only run forward; backward motion goes through [`PendulumSim::step_frame`].
    pub fn tick(&mut self, dt_real: f64) -> SimResult<()> {
        if !(dt_real.is_finite() && dt_real >= 0.0) {
            return Err(SimError::InvalidTimestep { value: dt_real });
        }
        if self.paused || dt_real == 0.0 {
            return Ok(());
        }
        let dt = dt_real * self.time_scale;
        self.step(dt)?;
        self.sim_time += dt;
        self.trail.advance(self.end_effector());
        Ok(())
    }

    /// Pause and move exactly one frame forward or backward.
    pub fn step_frame(&mut self, direction: FrameDirection) -> SimResult<()> {
        self.paused = true;
        let dt = direction.sign() * self.time_scale / self.config.frame_rate;
        self.step(dt)?;
        self.sim_time = (self.sim_time + dt).max(0.0);
        let current = self.end_effector();
        match direction {
            FrameDirection::Forward => self.trail.advance(current),
            FrameDirection::Backward => self.trail.step_back(current),
        };
        Ok(())
    }

    // === Readouts ===

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Positions of both masses relative to the pivot (m).
    pub fn positions(&self) -> (Point2, Point2) {
        pendulum::positions(&self.state, &self.params)
    }

    pub fn end_effector(&self) -> Point2 {
        self.positions().1
    }

    /// Linear velocities of both masses (m/s).
    pub fn joint_velocities(&self) -> (Point2, Point2) {
        pendulum::joint_velocities(&self.state, &self.params)
    }

    pub fn energy(&self) -> f64 {
        pendulum::energy(&self.state, &self.params)
    }

    /// Baseline energy captured at the last explicit edit.
    pub fn energy_reference(&self) -> f64 {
        self.energy_reference
    }

    /// Current energy minus the baseline, computed fresh.
    pub fn energy_drift(&self) -> f64 {
        self.energy() - self.energy_reference
    }

    pub fn snapshot(&self) -> Snapshot {
        let (p1, p2) = self.positions();
        let energy = self.energy();
        Snapshot {
            time: self.sim_time,
            state: self.state,
            parameters: self.params,
            time_scale: self.time_scale,
            joint1: [p1.x, p1.y],
            joint2: [p2.x, p2.y],
            energy,
            energy_drift: energy - self.energy_reference,
            trail_index: self.trail.index(),
            paused: self.paused,
        }
    }

    fn rest_at(&mut self, theta1: f64, theta2: f64) {
        self.state = SimulationState::at_rest(theta1, theta2);
        self.sim_time = 0.0;
        debug!("reset to theta1 = {theta1:.4}, theta2 = {theta2:.4}");
        self.mark_edited();
    }

    fn refresh_energy_reference(&mut self) {
        self.energy_reference = self.energy();
    }

    /// Bookkeeping after a discontinuous edit: new baseline and a fresh trail.
    fn mark_edited(&mut self) {
        self.refresh_energy_reference();
        self.clear_trail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME: f64 = 1.0 / 60.0;

    fn sim() -> PendulumSim {
        PendulumSim::new(SimConfig::default()).unwrap()
    }

    #[test]
    fn test_new_starts_paused_with_single_sample() {
        let sim = sim();
        assert!(sim.is_paused());
        assert_eq!(sim.trail().index(), 1);
        assert_eq!(sim.sim_time(), 0.0);
        assert_relative_eq!(sim.energy_drift(), 0.0);
        assert_relative_eq!(sim.end_effector().x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let config = SimConfig::default().with_parameters(Parameters::default().with_masses(-1.0, 1.0));
        assert!(matches!(
            PendulumSim::new(config),
            Err(SimError::InvalidParameter { name: "m1", .. })
        ));
        assert!(PendulumSim::new(SimConfig::default().with_frame_rate(0.0)).is_err());
        assert!(PendulumSim::new(SimConfig::default().with_max_substep(-1.0)).is_err());
        assert!(PendulumSim::new(SimConfig::default().with_angles(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_tick_is_noop_while_paused() {
        let mut sim = sim();
        let before = *sim.state();
        sim.tick(FRAME).unwrap();
        assert_eq!(*sim.state(), before);
        assert_eq!(sim.trail().index(), 1);
    }

    #[test]
    fn test_tick_records_trail_and_time() {
        let mut sim = sim();
        sim.set_paused(false);
        sim.set_time_scale(2.0);
        for _ in 0..10 {
            sim.tick(FRAME).unwrap();
        }
        assert_eq!(sim.trail().index(), 11);
        assert_relative_eq!(sim.sim_time(), 20.0 * FRAME, epsilon = 1e-12);
        assert_eq!(sim.trail().visible().last(), Some(&sim.end_effector()));
    }

    #[test]
    fn test_reset_zeroes_velocity_and_rebases_energy() {
        let mut sim = sim();
        sim.set_paused(false);
        for _ in 0..30 {
            sim.tick(FRAME).unwrap();
        }
        sim.reset(Some(0.3), None).unwrap();
        assert_eq!(*sim.state(), SimulationState::at_rest(0.3, FRAC_PI_2));
        assert_eq!(sim.sim_time(), 0.0);
        assert_eq!(sim.trail().index(), 1);
        assert_relative_eq!(sim.energy_reference(), sim.energy());
    }

    #[test]
    fn test_reset_rejects_non_finite_angles() {
        let mut sim = sim();
        sim.reset(Some(0.3), Some(0.1)).unwrap();
        let before = sim.snapshot();

        for (t1, t2) in [(Some(f64::NAN), None), (None, Some(f64::INFINITY))] {
            let err = sim.reset(t1, t2).unwrap_err();
            assert!(matches!(err, SimError::InvalidParameter { name: "theta", .. }));
        }

        assert!(sim.state().is_finite());
        assert_eq!(sim.snapshot(), before);
        assert!(sim.energy_reference().is_finite());
        assert!(sim.trail().visible().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_tick_rejects_backward_time() {
        let mut sim = sim();
        sim.set_paused(false);
        sim.tick(FRAME).unwrap();
        let before = sim.snapshot();

        assert!(matches!(sim.tick(-FRAME), Err(SimError::InvalidTimestep { .. })));
        assert!(matches!(sim.tick(f64::NAN), Err(SimError::InvalidTimestep { .. })));
        sim.tick(0.0).unwrap();

        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.trail().index(), 2);
    }

    #[test]
    fn test_step_frame_forward_then_back() {
        let mut sim = sim();
        sim.set_paused(false);
        sim.step_frame(FrameDirection::Forward).unwrap();
        assert!(sim.is_paused());
        sim.step_frame(FrameDirection::Forward).unwrap();
        assert_eq!(sim.trail().index(), 3);

        sim.step_frame(FrameDirection::Backward).unwrap();
        assert_eq!(sim.trail().index(), 2);
        assert_eq!(sim.trail().visible().last(), Some(&sim.end_effector()));
        assert_relative_eq!(sim.sim_time(), FRAME, epsilon = 1e-12);
    }

    #[test]
    fn test_step_frame_back_clamps_time_at_zero() {
        let mut sim = sim();
        sim.step_frame(FrameDirection::Backward).unwrap();
        assert_eq!(sim.sim_time(), 0.0);
        assert_eq!(sim.trail().index(), 1);
    }

    #[test]
    fn test_drag_end_effector() {
        let mut sim = sim();
        let target = Point2::new(0.6, 1.2);
        sim.apply_inverse_kinematics(target, DragHandle::EndEffector);
        assert_relative_eq!(sim.end_effector(), target, epsilon = 1e-9);
        assert_eq!(sim.trail().visible(), &[sim.end_effector()]);
        assert_relative_eq!(sim.energy_drift(), 0.0);
    }

    #[test]
    fn test_drag_mid_joint_keeps_offset() {
        let mut sim = sim();
        sim.reset(Some(0.2), Some(0.5)).unwrap();
        sim.apply_inverse_kinematics(Point2::new(-1.0, 0.0), DragHandle::MidJoint);
        let state = sim.state();
        assert_relative_eq!(state.theta1, -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(state.theta2 - state.theta1, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_set_parameters() {
        let mut sim = sim();
        sim.set_paused(false);
        for _ in 0..5 {
            sim.tick(FRAME).unwrap();
        }

        // same lengths: trail kept, baseline refreshed
        let heavier = sim.parameters().with_masses(2.0, 1.0);
        sim.set_parameters(heavier).unwrap();
        assert_eq!(sim.trail().index(), 6);
        assert_relative_eq!(sim.energy_drift(), 0.0);

        // new lengths: trail restarts
        sim.set_parameters(heavier.with_lengths(1.5, 1.0)).unwrap();
        assert_eq!(sim.trail().index(), 1);

        // invalid: rejected and nothing changes
        let err = sim.set_parameters(heavier.with_lengths(0.0, 1.0)).unwrap_err();
        assert!(err.is_configuration());
        assert_relative_eq!(sim.parameters().l1, 1.5);
    }

    #[test]
    fn test_commit_parameters_snaps_into_ranges() {
        let mut sim = sim();
        let typed = Parameters::default()
            .with_masses(100.0, 1.234)
            .with_gravity(500.0)
            .with_lengths(0.01, 1.0);

        let stored = sim.commit_parameters(typed).unwrap();

        assert_eq!(*sim.parameters(), stored);
        assert_relative_eq!(stored.m1, 5.0, epsilon = 1e-12);
        assert_relative_eq!(stored.m2, 1.25, epsilon = 1e-12);
        assert_relative_eq!(stored.g, 25.0, epsilon = 1e-12);
        assert_relative_eq!(stored.l1, 0.4, epsilon = 1e-12);
        assert_relative_eq!(stored.l2, 1.0, epsilon = 1e-12);
        assert!(sim.config().ranges.out_of_range(&stored).is_empty());
        assert_eq!(sim.trail().index(), 1);
        assert_relative_eq!(sim.energy_drift(), 0.0);
    }

    #[test]
    fn test_commit_parameters_rejects_non_finite() {
        let mut sim = sim();
        let before = *sim.parameters();
        let typed = before.with_gravity(f64::NAN);
        assert!(sim.commit_parameters(typed).unwrap_err().is_configuration());
        assert_eq!(*sim.parameters(), before);
    }

    #[test]
    fn test_randomize_parameters_keeps_angles() {
        let mut sim = sim();
        sim.reset(Some(0.4), Some(-0.7)).unwrap();
        sim.set_paused(false);
        let mut rng = StdRng::seed_from_u64(1);
        sim.randomize_parameters(&mut rng);

        assert!(sim.is_paused());
        assert_eq!(*sim.state(), SimulationState::at_rest(0.4, -0.7));
        let ranges = sim.config().ranges;
        assert!(ranges.length.contains(sim.parameters().l1));
        assert!(ranges.time_scale.contains(sim.time_scale()));
        assert!(sim.parameters().validate().is_ok());
        assert_relative_eq!(sim.energy_drift(), 0.0);
    }

    #[test]
    fn test_randomize_angles_starts_running() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(9);
        sim.randomize_angles(&mut rng);
        assert!(!sim.is_paused());
        let s = sim.state();
        assert!(s.theta1.abs() <= PI && s.theta2.abs() <= PI);
        assert_eq!((s.omega1, s.omega2), (0.0, 0.0));
    }

    #[test]
    fn test_gravity_nudge_is_clamped() {
        let mut sim = sim();
        for _ in 0..100 {
            sim.nudge_gravity(0.5);
        }
        assert_relative_eq!(sim.parameters().g, GRAVITY_NUDGE_MAX);
        for _ in 0..100 {
            sim.nudge_gravity(-0.5);
        }
        assert_relative_eq!(sim.parameters().g, GRAVITY_NUDGE_MIN);
    }

    #[test]
    fn test_toggle_damping_restores_previous_value() {
        let mut sim = sim();
        assert_relative_eq!(sim.parameters().damping, 0.01);
        sim.toggle_damping();
        assert_eq!(sim.parameters().damping, 0.0);
        sim.toggle_damping();
        assert_relative_eq!(sim.parameters().damping, 0.01);
    }

    #[test]
    fn test_cycle_time_scale() {
        let mut sim = sim();
        let mut seen = Vec::new();
        for _ in 0..5 {
            sim.cycle_time_scale();
            seen.push(sim.time_scale());
        }
        assert_eq!(seen, vec![1.5, 2.0, 0.25, 0.5, 1.0]);

        sim.set_time_scale(2.7);
        sim.cycle_time_scale();
        assert_eq!(sim.time_scale(), 1.5);
    }

    #[test]
    fn test_pause_resume_does_not_shrink_trail() {
        let mut sim = sim();
        sim.set_paused(false);
        for _ in 0..20 {
            sim.tick(FRAME).unwrap();
        }
        let recorded = sim.trail().index();
        sim.toggle_pause();
        for _ in 0..20 {
            sim.tick(FRAME).unwrap();
        }
        assert_eq!(sim.trail().index(), recorded);
        sim.toggle_pause();
        sim.tick(FRAME).unwrap();
        assert_eq!(sim.trail().index(), recorded + 1);
    }

    #[test]
    fn test_snapshot_matches_readouts() {
        let sim = sim();
        let snap = sim.snapshot();
        let (p1, p2) = sim.positions();
        assert_eq!(snap.joint1, [p1.x, p1.y]);
        assert_eq!(snap.joint2, [p2.x, p2.y]);
        assert_abs_diff_eq!(snap.energy, 0.0, epsilon = 1e-12);
        assert_eq!(snap.trail_index, 1);
        assert!(snap.paused);
    }
}
