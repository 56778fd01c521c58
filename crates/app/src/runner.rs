//! Fixed-rate headless host loop

use log::{debug, info, warn};
use mechanics::{FrameDirection, PendulumSim};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simcore::{Point2, SimResult};
use std::io::Write;

use crate::error::AppResult;
use crate::scenario::{Command, Event, Scenario};

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub reports: usize,
    pub sim_time: f64,
    pub energy_drift: f64,
}

pub struct Runner {
    sim: PendulumSim,
    rng: StdRng,
    events: Vec<Event>,
    frames: usize,
    frame_dt: f64,
    report_every: usize,
}

impl Runner {
    pub fn new(scenario: &Scenario) -> AppResult<Self> {
        scenario.validate()?;
        let sim = PendulumSim::new(scenario.simulation.clone())?;
        let rng = match scenario.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut events = scenario.events.clone();
        events.sort_by_key(|e| e.frame);
        let frames = scenario.frames();
        let late = events.iter().filter(|e| e.frame >= frames).count();
        if late > 0 {
            warn!("{late} event(s) scheduled after the last frame will not run");
        }

        Ok(Runner {
            sim,
            rng,
            events,
            frames,
            frame_dt: scenario.frame_dt(),
            report_every: scenario.report_every,
        })
    }

    pub fn sim(&self) -> &PendulumSim {
        &self.sim
    }

    /// Run every frame, writing one JSON snapshot per line to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> AppResult<RunSummary> {
        info!(
            "running {} frames at {:.4} s per frame",
            self.frames, self.frame_dt
        );

        let mut next_event = 0;
        let mut reports = 0;
        let mut last_reported = None;

        for frame in 0..self.frames {
            while let Some(event) = self.events.get(next_event) {
                if event.frame > frame {
                    break;
                }
                let command = event.command.clone();
                self.apply(&command)?;
                next_event += 1;
            }

            self.sim.tick(self.frame_dt)?;

            if self.report_every > 0 && (frame + 1) % self.report_every == 0 {
                self.report(out)?;
                reports += 1;
                last_reported = Some(frame);
            }
        }

        if self.frames == 0 || last_reported != Some(self.frames - 1) {
            self.report(out)?;
            reports += 1;
        }
        out.flush()?;

        let summary = RunSummary {
            frames: self.frames,
            reports,
            sim_time: self.sim.sim_time(),
            energy_drift: self.sim.energy_drift(),
        };
        info!(
            "finished {} frames ({} snapshots) at t = {:.3} s, energy drift {:.3e} J",
            summary.frames, summary.reports, summary.sim_time, summary.energy_drift
        );
        Ok(summary)
    }

    /// Apply one host input. Rejected edits are logged and skipped.
    pub fn apply(&mut self, command: &Command) -> AppResult<()> {
        debug!("applying {command:?}");
        let result: SimResult<()> = match *command {
            Command::Play => {
                self.sim.set_paused(false);
                Ok(())
            }
            Command::Pause => {
                self.sim.set_paused(true);
                Ok(())
            }
            Command::TogglePause => {
                self.sim.toggle_pause();
                Ok(())
            }
            Command::Reset => {
                self.sim.reset_to_defaults();
                Ok(())
            }
            Command::ResetAngles { theta1, theta2 } => self.sim.reset(Some(theta1), Some(theta2)),
            Command::StepForward => self.sim.step_frame(FrameDirection::Forward),
            Command::StepBack => self.sim.step_frame(FrameDirection::Backward),
            Command::Drag { handle, x, y } => {
                self.sim.apply_inverse_kinematics(Point2::new(x, y), handle);
                Ok(())
            }
            Command::SetParameters(edit) => {
                let typed = edit.apply_to(self.sim.parameters());
                self.sim.commit_parameters(typed).map(|_| ())
            }
            Command::RandomizeParameters => {
                self.sim.randomize_parameters(&mut self.rng);
                Ok(())
            }
            Command::RandomizeAngles => {
                self.sim.randomize_angles(&mut self.rng);
                Ok(())
            }
            Command::NudgeGravity { delta } => {
                self.sim.nudge_gravity(delta);
                Ok(())
            }
            Command::ToggleDamping => {
                self.sim.toggle_damping();
                Ok(())
            }
            Command::CycleTimeScale => {
                self.sim.cycle_time_scale();
                Ok(())
            }
            Command::ClearTrail => {
                self.sim.clear_trail();
                Ok(())
            }
        };

        match result {
            Err(err) if err.is_configuration() => {
                warn!("ignoring {command:?}: {err}");
                Ok(())
            }
            other => Ok(other?),
        }
    }

    fn report<W: Write>(&self, out: &mut W) -> AppResult<()> {
        serde_json::to_writer(&mut *out, &self.sim.snapshot())?;
        writeln!(out)?;
        Ok(())
    }
}
