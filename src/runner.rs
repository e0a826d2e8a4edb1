//! Outer frame loop
//!
//! One iteration: measure dt, sample input, tick, render, optionally sleep.
//! The simulation itself never looks at the wall clock.

use std::time::{Duration, Instant};

use crate::renderer::{RenderSink, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, Simulation, TickInput, tick};

/// Everything sampled from the outside world for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub tick: TickInput,
    /// Leave the loop (not part of the game's state machine)
    pub exit_requested: bool,
}

/// Producer of per-frame input (device polling, autopilot, replay...)
pub trait InputSource {
    fn poll(&mut self, sim: &Simulation, dt: f32) -> FrameInput;
}

/// Input source that never touches the controls
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _sim: &Simulation, _dt: f32) -> FrameInput {
        FrameInput::default()
    }
}

/// Wall-clock delta source with a dt clamp and an optional rate cap
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
    budget: Option<Duration>,
}

impl FrameClock {
    pub fn new(settings: &Settings) -> Self {
        Self {
            last: Instant::now(),
            max_dt: settings.max_frame_dt,
            budget: settings.frame_budget(),
        }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`
    pub fn next_dt(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(self.max_dt).max(0.0)
    }

    /// Sleep off whatever is left of this iteration's budget
    pub fn throttle(&self, frame_start: Instant) {
        if let Some(budget) = self.budget {
            let spent = frame_start.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub games_started: u32,
    pub prizes_collected: u32,
}

impl RunStats {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::GameStarted => self.games_started += 1,
                GameEvent::PrizeCollected { .. } => self.prizes_collected += 1,
                _ => {}
            }
        }
    }
}

/// Run one frame with an explicit `dt`. Returns false when input asks to exit.
pub fn step_frame(
    sim: &mut Simulation,
    source: &mut impl InputSource,
    sink: &mut impl RenderSink,
    dt: f32,
    log_events: bool,
    stats: &mut RunStats,
) -> bool {
    let input = source.poll(sim, dt);
    if input.exit_requested {
        log::info!("Exit requested");
        return false;
    }

    tick(sim, &input.tick, dt);

    let events = sim.take_events();
    if log_events {
        for event in &events {
            log::info!("{}", event);
        }
    }
    stats.record(&events);
    stats.frames += 1;

    sink.submit(&build_frame(sim));
    true
}

/// Drive the simulation until exit is requested or `run_seconds` elapses
pub fn run(
    sim: &mut Simulation,
    source: &mut impl InputSource,
    sink: &mut impl RenderSink,
    settings: &Settings,
) -> RunStats {
    let mut clock = FrameClock::new(settings);
    let mut stats = RunStats::default();
    let started = Instant::now();
    let limit = settings.run_seconds.map(Duration::from_secs_f32);

    loop {
        let frame_start = Instant::now();
        let dt = clock.next_dt();

        if !step_frame(sim, source, sink, dt, settings.log_events, &mut stats) {
            break;
        }
        if limit.is_some_and(|limit| started.elapsed() >= limit) {
            log::info!("Run time limit reached");
            break;
        }
        clock.throttle(frame_start);
    }

    stats
}
