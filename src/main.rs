//! Claw Machine entry point
//!
//! Runs the cabinet headless: settings and tuning come from optional JSON
//! files, input from the autopilot, frames go to a counting sink.
//!
//! Usage: `claw-machine [settings.json] [tuning.json]`

use std::path::Path;
use std::process::ExitCode;

use claw_machine::autopilot::Autopilot;
use claw_machine::renderer::HeadlessSink;
use claw_machine::runner::{self, NoInput};
use claw_machine::sim::Simulation;
use claw_machine::{Settings, Tuning};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Claw Machine (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Rejected tuning {}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => {
                log::error!("Cannot read tuning {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut sim = match Simulation::with_tuning(tuning, settings.seed) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid machine configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sink = HeadlessSink::default();
    let stats = if settings.autopilot {
        runner::run(&mut sim, &mut Autopilot::new(), &mut sink, &settings)
    } else {
        runner::run(&mut sim, &mut NoInput, &mut sink, &settings)
    };

    log::info!(
        "Done: {} frames, {} games, {} prizes, final state {}",
        stats.frames,
        stats.games_started,
        stats.prizes_collected,
        sim.state
    );
    ExitCode::SUCCESS
}
