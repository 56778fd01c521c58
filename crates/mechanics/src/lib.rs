pub mod ik;
pub mod pendulum;
pub mod simulation;
pub mod trail;

pub use ik::{DragHandle, REACH_MARGIN};
pub use pendulum::DoublePendulum;
pub use simulation::{FrameDirection, PendulumSim, SimConfig, Snapshot};
pub use trail::Trail;
