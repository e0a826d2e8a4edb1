//! Claw Machine - an arcade claw-machine gameplay engine
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (claw, toys, lamp, state machine)
//! - `renderer`: Draw-request generation for an external render sink
//! - `tuning`: Data-driven machine geometry and rates
//! - `settings`: Runtime loop preferences
//! - `autopilot`: Attract-mode player
//! - `runner`: Outer frame loop

pub mod autopilot;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Cabinet layout constants (normalized device coordinates, [-1, 1])
pub mod consts {
    use glam::Vec2;

    /// Glass box the claw and toys live in
    pub const BOX_CENTER: Vec2 = Vec2::new(0.0, 0.12);
    pub const BOX_SIZE: Vec2 = Vec2::new(1.26, 1.06);

    pub const BOX_LEFT: f32 = BOX_CENTER.x - BOX_SIZE.x * 0.5;
    pub const BOX_RIGHT: f32 = BOX_CENTER.x + BOX_SIZE.x * 0.5;
    pub const BOX_TOP: f32 = BOX_CENTER.y + BOX_SIZE.y * 0.5;
    pub const BOX_BOTTOM: f32 = BOX_CENTER.y - BOX_SIZE.y * 0.5;

    /// Floor plane toys rest on
    pub const FLOOR_Y: f32 = BOX_BOTTOM + 0.035;
    /// Rail height the rope hangs from (just above the glass)
    pub const ANCHOR_Y: f32 = BOX_TOP + 0.08;

    /// Claw defaults
    pub const CLAW_MIN_LENGTH: f32 = 0.16;
    pub const CLAW_MAX_LENGTH: f32 = 1.18;
    pub const CLAW_MOVE_SPEED: f32 = 0.65;
    pub const CLAW_LOWER_SPEED: f32 = 0.80;
    pub const CLAW_RAISE_SPEED: f32 = 1.00;
    pub const CLAW_SIZE: Vec2 = Vec2::new(0.12, 0.10);

    /// Toy defaults
    pub const TOY_COUNT: usize = 4;
    pub const TOY_SIZE: Vec2 = Vec2::new(0.11, 0.11);
    pub const SPAWN_X: [f32; 6] = [-0.58, -0.32, -0.06, 0.16, 0.36, 0.56];

    /// Downward acceleration of a released toy (units/s²)
    pub const GRAVITY: f32 = -2.6;

    pub const HOLE_RADIUS: f32 = 0.085;
    /// Fraction of the hole radius a toy center must fall within
    pub const HOLE_CAPTURE_RATIO: f32 = 0.75;
    /// Vertical slack above the hole plane that still counts as "in"
    pub const HOLE_EPSILON: f32 = 0.02;

    /// Toy hit box shrink for grabbing (precise grabs only)
    pub const GRAB_SHRINK: f32 = 0.35;
    /// Held toy hangs this fraction of the claw height below its center
    pub const GRAB_POINT_RATIO: f32 = 0.35;

    pub const PRIZE_SIZE: Vec2 = Vec2::new(0.32, 0.16);
    /// Clickable prize area is larger than its visual size
    pub const PRIZE_CLICK_SCALE: f32 = 1.4;
    pub const TOKEN_SLOT_SIZE: Vec2 = Vec2::new(0.22, 0.08);

    /// Lamp blink half-period (seconds)
    pub const BLINK_INTERVAL: f32 = 0.5;
}

/// Half-extent rectangle containment (edges inclusive)
#[inline]
pub fn point_in_rect(p: Vec2, center: Vec2, size: Vec2) -> bool {
    let d = (p - center).abs();
    d.x <= size.x * 0.5 && d.y <= size.y * 0.5
}

/// Strict circle containment
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance(center) < radius
}
