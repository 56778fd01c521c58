//! Shared building blocks for the pendulum simulation: state types, parameters,
//! the dynamics-model seam and the time integrators.

pub mod error;
pub mod integrators;
pub mod params;
pub mod traits;

pub use error::{SimError, SimResult};
pub use integrators::{DEFAULT_MAX_SUBSTEP, Integrator, MAX_SUBSTEPS, RungeKutta4, SubstepIntegrator};
pub use params::{ParameterRange, ParameterRanges, Parameters};
pub use traits::{DynamicsModel, Point2, SimulationState, StateDerivative};
