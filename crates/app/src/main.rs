//! Headless pendulum host
//!
//! Usage: `pendulum-app [scenario.json]`
//!
//! Snapshots go to stdout as JSON lines, logs go to stderr.

use log::error;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, BufWriter};
use std::process::ExitCode;

use pendulum_app::{AppResult, Runner, Scenario};

fn run() -> AppResult<()> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    TermLogger::init(
        scenario.level_filter()?,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    Runner::new(&scenario)?.run(&mut out)?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The logger may not be installed yet when the scenario fails to load.
            if log::log_enabled!(log::Level::Error) {
                error!("{err}");
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}
