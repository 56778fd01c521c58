//! Double Pendulum - equations of motion, kinematics and energy
//!
//! Angles are measured from the downward vertical. Positions use the pivot as
//! origin with x to the right and y pointing down, so `y = L·cos(theta)`.

use simcore::{DynamicsModel, Parameters, Point2, SimulationState, StateDerivative};

/// The two-link pendulum under gravity with viscous joint damping.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoublePendulum;

impl DynamicsModel for DoublePendulum {
    fn derivatives(&self, state: &SimulationState, params: &Parameters) -> StateDerivative {
        derivatives(state, params)
    }

    fn energy(&self, state: &SimulationState, params: &Parameters) -> f64 {
        energy(state, params)
    }
}

/// Angular velocities and accelerations of both joints.
///
/// The shared denominator `(m1 + m2)·L1 - m2·L1·cos²(delta)` never drops below
/// `m1·L1`, so the aligned configuration `theta1 == theta2` needs no guard.
pub fn derivatives(state: &SimulationState, params: &Parameters) -> StateDerivative {
    let Parameters { m1, m2, l1, l2, g, damping } = *params;
    let SimulationState { theta1, theta2, omega1, omega2 } = *state;

    let delta = theta2 - theta1;
    let (sin_d, cos_d) = delta.sin_cos();
    let sin1 = theta1.sin();
    let sin2 = theta2.sin();

    let den1 = (m1 + m2) * l1 - m2 * l1 * cos_d * cos_d;
    let den2 = (l2 / l1) * den1;

    let domega1 = (m2 * l1 * omega1 * omega1 * sin_d * cos_d
        + m2 * g * sin2 * cos_d
        + m2 * l2 * omega2 * omega2 * sin_d
        - (m1 + m2) * g * sin1)
        / den1;

    let domega2 = (-m2 * l2 * omega2 * omega2 * sin_d * cos_d
        + (m1 + m2) * (g * sin1 * cos_d - l1 * omega1 * omega1 * sin_d - g * sin2))
        / den2;

    StateDerivative {
        dtheta1: omega1,
        dtheta2: omega2,
        domega1: domega1 - damping * omega1,
        domega2: domega2 - damping * omega2,
    }
}

/// Forward kinematics: positions of the first and second mass.
pub fn positions(state: &SimulationState, params: &Parameters) -> (Point2, Point2) {
    let p1 = Point2::new(params.l1 * state.theta1.sin(), params.l1 * state.theta1.cos());
    let p2 = p1 + Point2::new(params.l2 * state.theta2.sin(), params.l2 * state.theta2.cos());
    (p1, p2)
}

/// Linear velocity of each mass (m/s), in the same frame as [`positions`].
pub fn joint_velocities(state: &SimulationState, params: &Parameters) -> (Point2, Point2) {
    let v1 = Point2::new(state.theta1.cos(), -state.theta1.sin()) * (params.l1 * state.omega1);
    let v2 = v1 + Point2::new(state.theta2.cos(), -state.theta2.sin()) * (params.l2 * state.omega2);
    (v1, v2)
}

/// Kinetic energy of both masses, including the coupling term.
pub fn kinetic_energy(state: &SimulationState, params: &Parameters) -> f64 {
    let Parameters { m1, m2, l1, l2, .. } = *params;
    let v1_sq = (l1 * state.omega1).powi(2);
    let v2_sq = v1_sq
        + (l2 * state.omega2).powi(2)
        + 2.0 * l1 * l2 * state.omega1 * state.omega2 * (state.theta1 - state.theta2).cos();
    0.5 * m1 * v1_sq + 0.5 * m2 * v2_sq
}

/// Gravitational potential energy, `-g·(m1·y1 + m2·y2)` with y measured downward.
pub fn potential_energy(state: &SimulationState, params: &Parameters) -> f64 {
    let (p1, p2) = positions(state, params);
    -params.g * (params.m1 * p1.y + params.m2 * p2.y)
}

/// Total mechanical energy (J).
pub fn energy(state: &SimulationState, params: &Parameters) -> f64 {
    kinetic_energy(state, params) + potential_energy(state, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn standard() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn test_positions_horizontal() {
        let state = SimulationState::at_rest(FRAC_PI_2, FRAC_PI_2);
        let (p1, p2) = positions(&state, &standard());
        assert_abs_diff_eq!(p1.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p1.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p2.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p2.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_horizontal_is_zero_potential() {
        // Both links horizontal: y = 0 for both masses and nothing moves.
        let state = SimulationState::at_rest(FRAC_PI_2, FRAC_PI_2);
        assert_abs_diff_eq!(energy(&state, &standard()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_hanging_down_is_minimum() {
        // -g·(m1·L1 + m2·(L1 + L2)) = -9.81 · 3
        let rest = SimulationState::at_rest(0.0, 0.0);
        assert_abs_diff_eq!(energy(&rest, &standard()), -29.43, epsilon = 1e-2);

        let displaced = SimulationState::at_rest(0.3, -0.2);
        assert!(energy(&displaced, &standard()) > energy(&rest, &standard()));
    }

    #[test]
    fn test_kinetic_energy_rigid_rotation() {
        // Aligned links spinning together: a rigid rod with point masses at L1 and L1 + L2.
        let state = SimulationState::new(0.4, 0.4, 2.0, 2.0);
        let p = standard();
        let expected = 0.5 * (p.m1 * 1.0 + p.m2 * 4.0) * 4.0;
        assert_relative_eq!(kinetic_energy(&state, &p), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_equilibria_have_zero_acceleration() {
        for (t1, t2) in [(0.0, 0.0), (PI, PI), (0.0, PI)] {
            let d = derivatives(&SimulationState::at_rest(t1, t2), &standard());
            assert_abs_diff_eq!(d.domega1, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(d.domega2, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_aligned_links_at_denominator_bound() {
        // theta1 == theta2 puts the denominator at its lower bound m1·L1.
        // At rest the first joint then falls like a simple pendulum and the second feels nothing.
        let p = Parameters::default().with_masses(0.5, 3.0).with_lengths(1.3, 0.7);
        for theta in [0.1, 0.9, FRAC_PI_2, 2.5, -1.2] {
            let d = derivatives(&SimulationState::at_rest(theta, theta), &p);
            assert!(d.domega1.is_finite() && d.domega2.is_finite());
            assert_relative_eq!(d.domega1, -p.g * theta.sin() / p.l1, epsilon = 1e-12);
            assert_abs_diff_eq!(d.domega2, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_heavy_tip_near_alignment_stays_finite() {
        let p = Parameters::default().with_masses(0.5, 5.0);
        let state = SimulationState::new(1.0, 1.0 + 1e-9, 10.0, -10.0);
        let d = derivatives(&state, &p);
        assert!(d.domega1.is_finite() && d.domega2.is_finite());
    }

    #[test]
    fn test_damping_subtracts_per_joint() {
        let state = SimulationState::new(0.3, -0.4, 1.5, -2.0);
        let undamped = derivatives(&state, &standard());
        let damped = derivatives(&state, &standard().with_damping(0.2));
        assert_relative_eq!(damped.domega1, undamped.domega1 - 0.2 * 1.5, epsilon = 1e-12);
        assert_relative_eq!(damped.domega2, undamped.domega2 + 0.2 * 2.0, epsilon = 1e-12);
        assert_eq!(damped.dtheta1, 1.5);
        assert_eq!(damped.dtheta2, -2.0);
    }

    #[test]
    fn test_joint_velocities_match_kinetic_energy() {
        let p = Parameters::default().with_masses(1.2, 0.8).with_lengths(0.9, 1.4);
        let state = SimulationState::new(0.7, -1.1, 1.3, -0.6);
        let (v1, v2) = joint_velocities(&state, &p);
        let from_velocities = 0.5 * p.m1 * v1.norm_squared() + 0.5 * p.m2 * v2.norm_squared();
        assert_relative_eq!(from_velocities, kinetic_energy(&state, &p), epsilon = 1e-12);
    }

    #[test]
    fn test_joint_velocities_are_derivative_of_positions() {
        let p = standard();
        let state = SimulationState::new(0.5, 1.0, 0.8, -1.7);
        let h = 1e-6;
        let ahead = SimulationState::new(
            state.theta1 + h * state.omega1,
            state.theta2 + h * state.omega2,
            state.omega1,
            state.omega2,
        );
        let (p1, p2) = positions(&state, &p);
        let (q1, q2) = positions(&ahead, &p);
        let (v1, v2) = joint_velocities(&state, &p);
        assert_relative_eq!((q1 - p1) / h, v1, epsilon = 1e-5);
        assert_relative_eq!((q2 - p2) / h, v2, epsilon = 1e-5);
    }
}
