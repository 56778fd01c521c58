//! Python-facing wrapper around `PendulumSim`

use numpy::ToPyArray;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use mechanics::{DragHandle, FrameDirection, PendulumSim, SimConfig};
use simcore::{Parameters, Point2};

use crate::to_py_err;

fn parse_handle(handle: &str) -> PyResult<DragHandle> {
    match handle {
        "end_effector" | "end" | "tip" => Ok(DragHandle::EndEffector),
        "mid_joint" | "mid" | "elbow" => Ok(DragHandle::MidJoint),
        other => Err(PyValueError::new_err(format!(
            "unknown handle {other:?}, expected \"end_effector\" or \"mid_joint\""
        ))),
    }
}

/// Double pendulum simulator
///
/// Starts paused at the horizontal pose. `tick` advances only while running;
/// `run` starts it and records every tick.
#[pyclass]
pub struct PendulumSimulator {
    inner: PendulumSim,
}

#[pymethods]
impl PendulumSimulator {
    /// Create a simulator
    ///
    /// Args:
    ///     m1, m2: Masses (kg)
    ///     l1, l2: Link lengths (m)
    ///     g: Gravity (m/s^2)
    ///     damping: Viscous joint damping (1/s)
    ///     time_scale: Simulated seconds per real second
    ///     frame_rate: Host frame rate used by step_frame (Hz)
    #[new]
    #[pyo3(signature = (m1=1.0, m2=1.0, l1=1.0, l2=1.0, g=9.81, damping=0.01, time_scale=1.0, frame_rate=60.0))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        m1: f64,
        m2: f64,
        l1: f64,
        l2: f64,
        g: f64,
        damping: f64,
        time_scale: f64,
        frame_rate: f64,
    ) -> PyResult<Self> {
        let parameters = Parameters::new(m1, m2, l1, l2, g, damping).map_err(to_py_err)?;
        let config = SimConfig::default()
            .with_parameters(parameters)
            .with_time_scale(time_scale)
            .with_frame_rate(frame_rate);
        let inner = PendulumSim::new(config).map_err(to_py_err)?;
        Ok(PendulumSimulator { inner })
    }

    /// Set both angles (default pi/2) with zero velocity. Non-finite angles raise ValueError.
    #[pyo3(signature = (theta1=None, theta2=None))]
    fn reset(&mut self, theta1: Option<f64>, theta2: Option<f64>) -> PyResult<()> {
        self.inner.reset(theta1, theta2).map_err(to_py_err)
    }

    /// Restore constructor parameters and the horizontal pose
    fn reset_to_defaults(&mut self) {
        self.inner.reset_to_defaults();
    }

    /// Integrate by dt seconds (negative runs backward) without touching the trail
    fn step(&mut self, dt: f64) -> PyResult<()> {
        self.inner.step(dt).map_err(to_py_err)
    }

    /// One host tick of dt_real wall-clock seconds
    fn tick(&mut self, dt_real: f64) -> PyResult<()> {
        self.inner.tick(dt_real).map_err(to_py_err)
    }

    /// Pause and move one frame forward or backward
    #[pyo3(signature = (forward=true))]
    fn step_frame(&mut self, forward: bool) -> PyResult<()> {
        let direction = if forward {
            FrameDirection::Forward
        } else {
            FrameDirection::Backward
        };
        self.inner.step_frame(direction).map_err(to_py_err)
    }

    fn play(&mut self) {
        self.inner.set_paused(false);
    }

    fn pause(&mut self) {
        self.inner.set_paused(true);
    }

    #[getter]
    fn paused(&self) -> bool {
        self.inner.is_paused()
    }

    #[getter]
    fn time(&self) -> f64 {
        self.inner.sim_time()
    }

    #[getter]
    fn time_scale(&self) -> f64 {
        self.inner.time_scale()
    }

    #[setter]
    fn set_time_scale(&mut self, time_scale: f64) {
        self.inner.set_time_scale(time_scale);
    }

    /// (theta1, theta2, omega1, omega2)
    fn state(&self) -> (f64, f64, f64, f64) {
        let s = self.inner.state();
        (s.theta1, s.theta2, s.omega1, s.omega2)
    }

    /// ((x1, y1), (x2, y2)) relative to the pivot, y pointing down
    fn positions(&self) -> ((f64, f64), (f64, f64)) {
        let (p1, p2) = self.inner.positions();
        ((p1.x, p1.y), (p2.x, p2.y))
    }

    fn energy(&self) -> f64 {
        self.inner.energy()
    }

    fn energy_drift(&self) -> f64 {
        self.inner.energy_drift()
    }

    /// Drag a mass to (x, y); handle is "end_effector" or "mid_joint"
    #[pyo3(signature = (x, y, handle="end_effector"))]
    fn drag(&mut self, x: f64, y: f64, handle: &str) -> PyResult<()> {
        let handle = parse_handle(handle)?;
        self.inner.apply_inverse_kinematics(Point2::new(x, y), handle);
        Ok(())
    }

    /// Change any subset of the parameters
    ///
    /// Values are clamped and snapped to the editable ranges. Non-finite values
    /// raise ValueError and change nothing.
    #[pyo3(signature = (m1=None, m2=None, l1=None, l2=None, g=None, damping=None))]
    fn set_parameters(
        &mut self,
        m1: Option<f64>,
        m2: Option<f64>,
        l1: Option<f64>,
        l2: Option<f64>,
        g: Option<f64>,
        damping: Option<f64>,
    ) -> PyResult<()> {
        let current = *self.inner.parameters();
        let typed = Parameters {
            m1: m1.unwrap_or(current.m1),
            m2: m2.unwrap_or(current.m2),
            l1: l1.unwrap_or(current.l1),
            l2: l2.unwrap_or(current.l2),
            g: g.unwrap_or(current.g),
            damping: damping.unwrap_or(current.damping),
        };
        self.inner.commit_parameters(typed).map(|_| ()).map_err(to_py_err)
    }

    /// Current parameters as a dict
    fn parameters<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let p = self.inner.parameters();
        let dict = PyDict::new_bound(py);
        dict.set_item("m1", p.m1)?;
        dict.set_item("m2", p.m2)?;
        dict.set_item("l1", p.l1)?;
        dict.set_item("l2", p.l2)?;
        dict.set_item("g", p.g)?;
        dict.set_item("damping", p.damping)?;
        Ok(dict)
    }

    fn clear_trail(&mut self) {
        self.inner.clear_trail();
    }

    /// Visible trail as a dict of numpy arrays "x" and "y"
    fn trail<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let visible = self.inner.trail().visible();
        let xs: Vec<f64> = visible.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = visible.iter().map(|p| p.y).collect();
        let dict = PyDict::new_bound(py);
        dict.set_item("x", xs.to_pyarray_bound(py))?;
        dict.set_item("y", ys.to_pyarray_bound(py))?;
        Ok(dict)
    }

    /// Run for duration_s real seconds in ticks of dt
    ///
    /// Unpauses the simulator and records the state after every tick.
    ///
    /// Returns:
    ///     dict of numpy arrays: times, theta1, theta2, energy, x2, y2
    #[pyo3(signature = (duration_s, dt=0.016666666666666666))]
    fn run<'py>(&mut self, py: Python<'py>, duration_s: f64, dt: f64) -> PyResult<Bound<'py, PyDict>> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PyValueError::new_err(format!("dt must be finite and > 0, got {dt}")));
        }
        if !(duration_s.is_finite() && duration_s >= 0.0) {
            return Err(PyValueError::new_err(format!(
                "duration_s must be finite and >= 0, got {duration_s}"
            )));
        }

        let n_steps = (duration_s / dt).round() as usize;
        let mut times = Vec::with_capacity(n_steps);
        let mut theta1 = Vec::with_capacity(n_steps);
        let mut theta2 = Vec::with_capacity(n_steps);
        let mut energy = Vec::with_capacity(n_steps);
        let mut x2 = Vec::with_capacity(n_steps);
        let mut y2 = Vec::with_capacity(n_steps);

        self.inner.set_paused(false);
        for _ in 0..n_steps {
            self.inner.tick(dt).map_err(to_py_err)?;

            let state = self.inner.state();
            let tip = self.inner.end_effector();
            times.push(self.inner.sim_time());
            theta1.push(state.theta1);
            theta2.push(state.theta2);
            energy.push(self.inner.energy());
            x2.push(tip.x);
            y2.push(tip.y);
        }

        let dict = PyDict::new_bound(py);
        dict.set_item("times", times.to_pyarray_bound(py))?;
        dict.set_item("theta1", theta1.to_pyarray_bound(py))?;
        dict.set_item("theta2", theta2.to_pyarray_bound(py))?;
        dict.set_item("energy", energy.to_pyarray_bound(py))?;
        dict.set_item("x2", x2.to_pyarray_bound(py))?;
        dict.set_item("y2", y2.to_pyarray_bound(py))?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        let p = self.inner.parameters();
        let s = self.inner.state();
        format!(
            "PendulumSimulator(m1={:.2}, m2={:.2}, l1={:.2}, l2={:.2}, g={:.2}, damping={:.4}, theta1={:.3}, theta2={:.3}, t={:.3}, paused={})",
            p.m1, p.m2, p.l1, p.l2, p.g, p.damping, s.theta1, s.theta2,
            self.inner.sim_time(), self.inner.is_paused()
        )
    }
}
