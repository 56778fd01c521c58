use mechanics::{PendulumSim, SimConfig};
use plotters::prelude::*;
use simcore::Parameters;

const FRAME: f64 = 1.0 / 60.0;
const DURATION: f64 = 20.0;

fn drift_series(damping: f64) -> Result<(Vec<f64>, Vec<f64>), Box<dyn std::error::Error>> {
    let config = SimConfig::default().with_parameters(Parameters::default().with_damping(damping));
    let mut sim = PendulumSim::new(config)?;
    sim.set_paused(false);

    let frames = (DURATION / FRAME).round() as usize;
    let mut t = Vec::with_capacity(frames);
    let mut drift = Vec::with_capacity(frames);
    for _ in 0..frames {
        sim.tick(FRAME)?;
        t.push(sim.sim_time());
        drift.push(sim.energy_drift());
    }
    Ok((t, drift))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dampings = [0.0, 0.01, 0.05, 0.2];
    let colors = [BLUE, GREEN, MAGENTA, RED];

    let mut series = Vec::new();
    for &damping in &dampings {
        series.push((damping, drift_series(damping)?));
    }

    let y_min = series
        .iter()
        .flat_map(|(_, (_, d))| d.iter().cloned())
        .fold(f64::INFINITY, |a, b| a.min(b));
    let y_max = series
        .iter()
        .flat_map(|(_, (_, d))| d.iter().cloned())
        .fold(f64::NEG_INFINITY, |a, b| a.max(b))
        .max(1e-3);

    let filename = "energy_drift.png";
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy drift from the horizontal start", ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..DURATION, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Simulated time [s]")
        .y_desc("E - E_ref [J]")
        .draw()?;

    for ((damping, (t, drift)), color) in series.iter().zip(colors.iter()) {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                t.iter().cloned().zip(drift.iter().cloned()),
                &color,
            ))?
            .label(format!("damping = {damping}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    println!("Wrote plot: {filename}");
    Ok(())
}
