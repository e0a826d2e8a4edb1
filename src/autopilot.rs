//! Attract-mode player
//!
//! Plays the machine the way a patient customer would: insert a token, line
//! up over the nearest toy, lower, carry it over the hole, drop, collect.

use crate::runner::{FrameInput, InputSource};
use crate::sim::{GameState, PointerClick, Simulation, TickInput};

/// Scripted player driving the cabinet through full play cycles
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Lower key level sent last frame (presses must be edges)
    lower_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose this frame's input
    pub fn next_input(&mut self, sim: &Simulation, dt: f32) -> TickInput {
        let mut input = TickInput::default();

        match sim.state {
            GameState::Idle => {
                input.clicks.push(PointerClick::primary(sim.token_slot.pos));
            }
            GameState::ActiveNoToy if sim.claw.is_idle() => {
                if let Some(target_x) = nearest_toy_x(sim) {
                    self.line_up_and_press(sim, target_x, dt, &mut input);
                }
            }
            GameState::ActiveCarrying if sim.claw.is_idle() => {
                self.line_up_and_press(sim, sim.hole.center.x, dt, &mut input);
            }
            GameState::PrizeWaiting => {
                input.clicks.push(PointerClick::primary(sim.prize.pos));
            }
            GameState::ActiveNoToy | GameState::ActiveCarrying | GameState::ToyFalling => {}
        }

        self.lower_held = input.lower;
        input.pointer = input.clicks.last().map(|c| c.pos);
        input
    }

    /// Steer toward `target_x` (clamped to the rail) and press lower once there
    fn line_up_and_press(&self, sim: &Simulation, target_x: f32, dt: f32, input: &mut TickInput) {
        let (min_x, max_x) = sim.tuning.rail_range();
        let target_x = target_x.clamp(min_x, max_x);
        let dx = target_x - sim.claw.anchor.x;
        let tolerance = (sim.claw.move_speed * dt).max(0.005);

        if dx.abs() > tolerance {
            input.left = dx < 0.0;
            input.right = dx > 0.0;
        } else if !self.lower_held {
            input.lower = true;
        }
    }
}

/// X of the grabbable toy closest to the claw (lowest index wins ties)
fn nearest_toy_x(sim: &Simulation) -> Option<f32> {
    let claw_x = sim.claw.anchor.x;
    sim.toys
        .iter()
        .filter(|t| t.is_grabbable())
        .map(|t| t.pos.x)
        .min_by(|a, b| {
            (a - claw_x)
                .abs()
                .partial_cmp(&(b - claw_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

impl InputSource for Autopilot {
    fn poll(&mut self, sim: &Simulation, dt: f32) -> FrameInput {
        FrameInput {
            tick: self.next_input(sim, dt),
            exit_requested: false,
        }
    }
}
