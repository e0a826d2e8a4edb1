//! Cabinet lamp
//!
//! Mode follows the game state; in `Blink` a timer flips a toggle the
//! renderer uses to alternate colors.

use serde::{Deserialize, Serialize};

use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LampMode {
    #[default]
    Off,
    Blue,
    Blink,
}

impl LampMode {
    pub fn for_state(state: GameState) -> Self {
        match state {
            GameState::Idle => LampMode::Off,
            GameState::ActiveNoToy | GameState::ActiveCarrying | GameState::ToyFalling => {
                LampMode::Blue
            }
            GameState::PrizeWaiting => LampMode::Blink,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lamp {
    pub mode: LampMode,
    /// Seconds since the last toggle
    pub timer: f32,
    pub blink_on: bool,
    /// Seconds between toggles
    pub interval: f32,
}

impl Lamp {
    pub fn new(interval: f32) -> Self {
        Self {
            mode: LampMode::Off,
            timer: 0.0,
            blink_on: false,
            interval,
        }
    }

    pub fn reset(&mut self) {
        self.mode = LampMode::Off;
        self.timer = 0.0;
        self.blink_on = false;
    }

    /// Switch mode; blink phase restarts whenever the mode changes
    pub fn set_mode(&mut self, mode: LampMode) {
        if self.mode != mode {
            self.mode = mode;
            self.timer = 0.0;
            self.blink_on = false;
        }
    }

    pub fn update(&mut self, state: GameState, dt: f32) {
        self.set_mode(LampMode::for_state(state));
        if self.mode == LampMode::Blink {
            self.timer += dt;
            if self.timer >= self.interval {
                self.timer = 0.0;
                self.blink_on = !self.blink_on;
            }
        }
    }
}
