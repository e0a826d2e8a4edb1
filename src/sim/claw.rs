//! Claw controller
//!
//! The claw hangs from an anchor on the overhead rail. The anchor slides
//! horizontally and the rope length is the only vertical degree of freedom.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::ClawTuning;

/// Automatic rope phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RopeMotion {
    /// No automatic motion; manual control may apply
    #[default]
    Hold,
    /// Paying out rope toward the floor
    Lowering,
    /// Reeling in toward `min_length`
    Raising,
}

/// What the automatic rope phase did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopeEvent {
    None,
    /// Lowering claw touched the floor (or ran out of rope)
    Bottomed,
    /// Raising claw is fully retracted
    Retracted,
}

/// The gripper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claw {
    /// Rope attachment point on the rail
    pub anchor: Vec2,
    /// Anchor position the claw returns to on reset
    pub home: Vec2,
    pub rope_length: f32,
    pub min_length: f32,
    pub max_length: f32,
    pub move_speed: f32,
    pub lower_speed: f32,
    pub raise_speed: f32,
    pub size: Vec2,
    pub grab_point_ratio: f32,
    pub open: bool,
    pub motion: RopeMotion,
}

impl Claw {
    pub fn from_tuning(tuning: &ClawTuning) -> Self {
        let home = Vec2::new(tuning.home_x, tuning.anchor_y);
        Self {
            anchor: home,
            home,
            rope_length: tuning.min_length,
            min_length: tuning.min_length,
            max_length: tuning.max_length,
            move_speed: tuning.move_speed,
            lower_speed: tuning.lower_speed,
            raise_speed: tuning.raise_speed,
            size: tuning.size,
            grab_point_ratio: tuning.grab_point_ratio,
            open: false,
            motion: RopeMotion::Hold,
        }
    }

    /// Retract to home, closed and still
    pub fn reset(&mut self) {
        self.anchor = self.home;
        self.rope_length = self.min_length;
        self.open = false;
        self.motion = RopeMotion::Hold;
    }

    /// Geometric center of the claw body
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.anchor.x, self.anchor.y - self.rope_length)
    }

    /// Where a held toy hangs
    #[inline]
    pub fn grab_point(&self) -> Vec2 {
        self.position() - Vec2::new(0.0, self.size.y * self.grab_point_ratio)
    }

    /// Lowest edge of the claw body
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position().y - self.size.y * 0.5
    }

    #[inline]
    pub fn is_moving_down(&self) -> bool {
        self.motion == RopeMotion::Lowering
    }

    #[inline]
    pub fn is_moving_up(&self) -> bool {
        self.motion == RopeMotion::Raising
    }

    /// Neither automatic phase is running
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.motion == RopeMotion::Hold
    }

    pub fn begin_lowering(&mut self) {
        self.motion = RopeMotion::Lowering;
    }

    pub fn begin_raising(&mut self) {
        self.motion = RopeMotion::Raising;
    }

    /// Slide the anchor along the rail. `dir` is -1, 0 or +1.
    pub fn steer(&mut self, dir: f32, dt: f32, (min_x, max_x): (f32, f32)) {
        self.anchor.x = (self.anchor.x + dir * self.move_speed * dt).clamp(min_x, max_x);
    }

    /// Advance the automatic rope phase. Lowering stops only when the
    /// caller reacts to [`RopeEvent::Bottomed`].
    pub fn advance_rope(&mut self, dt: f32, floor_y: f32) -> RopeEvent {
        match self.motion {
            RopeMotion::Hold => RopeEvent::None,
            RopeMotion::Lowering => {
                self.rope_length = (self.rope_length + self.lower_speed * dt).min(self.max_length);
                if self.bottom() <= floor_y || self.rope_length >= self.max_length {
                    RopeEvent::Bottomed
                } else {
                    RopeEvent::None
                }
            }
            RopeMotion::Raising => {
                self.rope_length -= self.raise_speed * dt;
                if self.rope_length <= self.min_length {
                    self.rope_length = self.min_length;
                    self.motion = RopeMotion::Hold;
                    RopeEvent::Retracted
                } else {
                    RopeEvent::None
                }
            }
        }
    }

    /// Direct rope control from held keys. Only meaningful while idle.
    pub fn manual_rope(&mut self, lower: bool, raise: bool, dt: f32) {
        if !self.is_idle() {
            return;
        }
        if lower {
            self.rope_length = (self.rope_length + self.lower_speed * dt).min(self.max_length);
        }
        if raise {
            self.rope_length = (self.rope_length - self.raise_speed * dt).max(self.min_length);
        }
    }
}
