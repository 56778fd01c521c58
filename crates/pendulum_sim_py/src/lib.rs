//! Double Pendulum Simulation Python Bindings
//!
//! Batched runs keep the integration loop in Rust and hand whole trajectories
//! back as numpy arrays; single-step methods are there for interactive use.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use simcore::SimError;

mod simulator;

pub use simulator::*;

/// Configuration errors become `ValueError`, integration failures `RuntimeError`.
pub(crate) fn to_py_err(err: SimError) -> PyErr {
    if err.is_configuration() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

#[pymodule]
fn pendulum_sim_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<simulator::PendulumSimulator>()?;
    Ok(())
}
