//! Inverse kinematics for dragging the pendulum into a pose.
//!
//! Two handles can be dragged:
//! - the end effector (second mass), solved with the closed-form two-link IK
//! - the mid joint (first mass), which swings the first link and carries the
//!   second link along rigidly
//!
//! Targets are never rejected. Out-of-reach targets are clamped onto the
//! reachable annulus and the nearest pose is returned.

use serde::{Deserialize, Serialize};
use simcore::{Parameters, Point2, SimulationState};

use crate::pendulum::positions;

/// Keeps clamped targets strictly inside the reachable annulus (m).
pub const REACH_MARGIN: f64 = 1e-4;

/// Which mass the host is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragHandle {
    /// First mass, at the end of link 1
    MidJoint,
    /// Second mass, at the end of link 2
    EndEffector,
}

/// Joint angles placing the second mass at `target`.
///
/// Always returns the same one of the two mirror solutions (the elbow angle
/// from `acos` is taken as non-negative); there is no branch selection.
pub fn solve_end_effector(target: &Point2, params: &Parameters) -> (f64, f64) {
    let (l1, l2) = (params.l1, params.l2);

    let lo = params.min_reach() + REACH_MARGIN;
    let hi = (params.max_reach() - REACH_MARGIN).max(lo);
    let r = target.norm().clamp(lo, hi);

    let cos_elbow = ((r * r - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
    let elbow = cos_elbow.acos();

    // Solved against the +x axis, then converted to angles from the downward vertical.
    let phi = target.y.atan2(target.x);
    let theta1_x = phi - (l2 * elbow.sin()).atan2(l1 + l2 * elbow.cos());
    let theta2_x = theta1_x + elbow;

    (
        std::f64::consts::FRAC_PI_2 - theta1_x,
        std::f64::consts::FRAC_PI_2 - theta2_x,
    )
}

/// Joint angles pointing link 1 at `target` while keeping `theta2 - theta1` fixed.
pub fn solve_mid_joint(target: &Point2, current: &SimulationState) -> (f64, f64) {
    let offset = current.theta2 - current.theta1;
    let theta1 = target.x.atan2(target.y);
    (theta1, theta1 + offset)
}

/// Solve for `handle` and return the resulting pose with both velocities zeroed.
///
/// A non-finite target leaves the angles where they are.
pub fn apply(
    current: &SimulationState,
    params: &Parameters,
    target: &Point2,
    handle: DragHandle,
) -> SimulationState {
    if !(target.x.is_finite() && target.y.is_finite()) {
        return current.stopped();
    }
    let (theta1, theta2) = match handle {
        DragHandle::EndEffector => solve_end_effector(target, params),
        DragHandle::MidJoint => solve_mid_joint(target, current),
    };
    SimulationState::at_rest(theta1, theta2)
}

/// The handle within `radius` of `point`, if any. The end effector wins ties.
pub fn pick_handle(
    state: &SimulationState,
    params: &Parameters,
    point: &Point2,
    radius: f64,
) -> Option<DragHandle> {
    let (p1, p2) = positions(state, params);
    if (p2 - point).norm() < radius {
        Some(DragHandle::EndEffector)
    } else if (p1 - point).norm() < radius {
        Some(DragHandle::MidJoint)
    } else {
        None
    }
}
