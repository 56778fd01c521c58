use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

use crate::params::Parameters;

/// A point in the pendulum's local frame: pivot at the origin, x to the right, y downward.
pub type Point2 = Vector2<f64>;

// Mechanical State
/// Authoritative physical state of a two-link pendulum.
///
/// Angles are measured from the downward vertical and are not wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::at_rest(std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2)
    }
}

impl SimulationState {
    pub fn new(theta1: f64, theta2: f64, omega1: f64, omega2: f64) -> Self {
        SimulationState { theta1, theta2, omega1, omega2 }
    }

    /// State with the given angles and zero angular velocity.
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        SimulationState::new(theta1, theta2, 0.0, 0.0)
    }

    /// Same angles, velocities zeroed.
    pub fn stopped(self) -> Self {
        SimulationState::at_rest(self.theta1, self.theta2)
    }

    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.theta2.is_finite()
            && self.omega1.is_finite()
            && self.omega2.is_finite()
    }

    /// Packs the state as `[theta1, theta2, omega1, omega2]`.
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.theta1, self.theta2, self.omega1, self.omega2)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        SimulationState::new(v[0], v[1], v[2], v[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.theta1, self.theta2, self.omega1, self.omega2]
    }
}

/// Time derivative of a [`SimulationState`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateDerivative {
    pub dtheta1: f64,
    pub dtheta2: f64,
    pub domega1: f64,
    pub domega2: f64,
}

impl StateDerivative {
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.dtheta1, self.dtheta2, self.domega1, self.domega2)
    }
}

// Model Traits
/// Equations of motion for a system described by a [`SimulationState`].
///
/// Implementations must be pure: the same state and parameters always give the same result.
pub trait DynamicsModel {
    fn derivatives(&self, state: &SimulationState, params: &Parameters) -> StateDerivative;

    /// Total mechanical energy, used only for drift diagnostics.
    fn energy(&self, state: &SimulationState, params: &Parameters) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_packing_order() {
        let state = SimulationState::new(0.1, 0.2, 0.3, 0.4);
        let v = state.to_vector();
        assert_eq!(v[0], 0.1);
        assert_eq!(v[3], 0.4);
        assert_eq!(SimulationState::from_vector(&v), state);
    }

    #[test]
    fn test_finiteness() {
        assert!(SimulationState::default().is_finite());
        assert!(!SimulationState::new(0.0, f64::INFINITY, 0.0, 0.0).is_finite());
        assert!(!SimulationState::new(0.0, 0.0, f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_stopped_keeps_angles() {
        let state = SimulationState::new(1.0, -2.0, 3.0, 4.0).stopped();
        assert_eq!(state, SimulationState::at_rest(1.0, -2.0));
    }
}
