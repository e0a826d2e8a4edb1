//! Data-driven machine tuning
//!
//! Geometry and rates for one cabinet. Defaults describe the standard
//! machine; a JSON document may override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected machine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rope range is empty: min_length {min} > max_length {max}")]
    InvalidRopeRange { min: f32, max: f32 },
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("claw width {claw} does not fit inside box width {width}")]
    ClawWiderThanBox { claw: f32, width: f32 },
    #[error("claw home x {home_x} is off the rail [{min}, {max}]")]
    HomeOffRail { home_x: f32, min: f32, max: f32 },
    #[error("machine needs at least one toy")]
    NoToys,
    #[error("{toys} toys need at least as many spawn slots, got {slots}")]
    NotEnoughSpawnSlots { toys: usize, slots: usize },
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Claw geometry and rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawTuning {
    /// Home position on the rail
    pub home_x: f32,
    /// Rail height
    pub anchor_y: f32,
    pub min_length: f32,
    pub max_length: f32,
    pub move_speed: f32,
    pub lower_speed: f32,
    pub raise_speed: f32,
    pub size: Vec2,
    /// Held toy offset below the claw center, as a fraction of claw height
    pub grab_point_ratio: f32,
}

impl Default for ClawTuning {
    fn default() -> Self {
        Self {
            home_x: 0.0,
            anchor_y: ANCHOR_Y,
            min_length: CLAW_MIN_LENGTH,
            max_length: CLAW_MAX_LENGTH,
            move_speed: CLAW_MOVE_SPEED,
            lower_speed: CLAW_LOWER_SPEED,
            raise_speed: CLAW_RAISE_SPEED,
            size: CLAW_SIZE,
            grab_point_ratio: GRAB_POINT_RATIO,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub box_center: Vec2,
    pub box_size: Vec2,
    /// Floor height above the box bottom
    pub floor_offset: f32,
    pub claw: ClawTuning,

    pub toy_count: usize,
    pub toy_size: Vec2,
    /// Spawn ring x positions; toys rest on the floor
    pub spawn_x: Vec<f32>,
    pub gravity: f32,
    /// Toy hit box scale used for grabbing
    pub grab_shrink: f32,

    pub hole_center: Vec2,
    pub hole_radius: f32,
    pub hole_capture_ratio: f32,
    pub hole_epsilon: f32,

    pub prize_pos: Vec2,
    pub prize_size: Vec2,
    pub prize_click_scale: f32,

    pub token_slot_pos: Vec2,
    pub token_slot_size: Vec2,

    pub blink_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            box_center: BOX_CENTER,
            box_size: BOX_SIZE,
            floor_offset: FLOOR_Y - BOX_BOTTOM,
            claw: ClawTuning::default(),

            toy_count: TOY_COUNT,
            toy_size: TOY_SIZE,
            spawn_x: SPAWN_X.to_vec(),
            gravity: GRAVITY,
            grab_shrink: GRAB_SHRINK,

            hole_center: Vec2::new(BOX_RIGHT - 0.20, FLOOR_Y + 0.11),
            hole_radius: HOLE_RADIUS,
            hole_capture_ratio: HOLE_CAPTURE_RATIO,
            hole_epsilon: HOLE_EPSILON,

            prize_pos: Vec2::new(BOX_RIGHT - 0.10, BOX_BOTTOM - 0.16),
            prize_size: PRIZE_SIZE,
            prize_click_scale: PRIZE_CLICK_SCALE,

            token_slot_pos: Vec2::new(BOX_LEFT + 0.30, BOX_BOTTOM - 0.14),
            token_slot_size: TOKEN_SLOT_SIZE,

            blink_interval: BLINK_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let claw = &self.claw;
        if claw.min_length > claw.max_length {
            return Err(ConfigError::InvalidRopeRange {
                min: claw.min_length,
                max: claw.max_length,
            });
        }

        let positive = [
            ("box_size.x", self.box_size.x),
            ("box_size.y", self.box_size.y),
            ("claw.size.x", claw.size.x),
            ("claw.size.y", claw.size.y),
            ("claw.move_speed", claw.move_speed),
            ("claw.lower_speed", claw.lower_speed),
            ("claw.raise_speed", claw.raise_speed),
            ("toy_size.x", self.toy_size.x),
            ("toy_size.y", self.toy_size.y),
            ("hole_radius", self.hole_radius),
            ("prize_size.x", self.prize_size.x),
            ("prize_size.y", self.prize_size.y),
            ("token_slot_size.x", self.token_slot_size.x),
            ("token_slot_size.y", self.token_slot_size.y),
            ("blink_interval", self.blink_interval),
        ];
        // NaN fails this check too
        if let Some((field, _)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::NonPositive { field: *field });
        }

        let (min_x, max_x) = self.rail_range();
        if min_x > max_x {
            return Err(ConfigError::ClawWiderThanBox {
                claw: claw.size.x,
                width: self.box_size.x,
            });
        }
        if !(claw.home_x >= min_x && claw.home_x <= max_x) {
            return Err(ConfigError::HomeOffRail {
                home_x: claw.home_x,
                min: min_x,
                max: max_x,
            });
        }

        if self.toy_count == 0 {
            return Err(ConfigError::NoToys);
        }
        if self.spawn_x.len() < self.toy_count {
            return Err(ConfigError::NotEnoughSpawnSlots {
                toys: self.toy_count,
                slots: self.spawn_x.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn box_left(&self) -> f32 {
        self.box_center.x - self.box_size.x * 0.5
    }

    #[inline]
    pub fn box_right(&self) -> f32 {
        self.box_center.x + self.box_size.x * 0.5
    }

    #[inline]
    pub fn box_top(&self) -> f32 {
        self.box_center.y + self.box_size.y * 0.5
    }

    #[inline]
    pub fn box_bottom(&self) -> f32 {
        self.box_center.y - self.box_size.y * 0.5
    }

    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.box_bottom() + self.floor_offset
    }

    /// Horizontal range the claw anchor may occupy
    pub fn rail_range(&self) -> (f32, f32) {
        let margin = self.claw.size.x * 0.5;
        (self.box_left() + margin, self.box_right() - margin)
    }

    /// Resting center height of a toy on the floor
    #[inline]
    pub fn toy_rest_y(&self) -> f32 {
        self.floor_y() + self.toy_size.y * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_rope_range() {
        let mut tuning = Tuning::default();
        tuning.claw.min_length = 2.0;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidRopeRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_and_nan() {
        let mut tuning = Tuning::default();
        tuning.claw.lower_speed = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositive { field: "claw.lower_speed" })
        ));

        let mut tuning = Tuning::default();
        tuning.hole_radius = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositive { field: "hole_radius" })
        ));
    }

    #[test]
    fn test_rejects_spawn_shortage() {
        let mut tuning = Tuning::default();
        tuning.toy_count = 7;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NotEnoughSpawnSlots { toys: 7, slots: 6 })
        ));

        tuning.toy_count = 0;
        assert!(matches!(tuning.validate(), Err(ConfigError::NoToys)));
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "toy_count": 2, "claw": { "move_speed": 1.5 } }"#)
            .unwrap();
        assert_eq!(tuning.toy_count, 2);
        assert_eq!(tuning.claw.move_speed, 1.5);
        assert_eq!(tuning.claw.lower_speed, CLAW_LOWER_SPEED);
        assert_eq!(tuning.spawn_x.len(), 6);
    }

    #[test]
    fn test_json_errors_surface() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "claw": { "min_length": 5.0 } }"#),
            Err(ConfigError::InvalidRopeRange { .. })
        ));
    }

    #[test]
    fn test_rejects_claw_wider_than_box() {
        let result = Tuning::from_json(r#"{ "claw": { "size": [2.0, 0.1] } }"#);
        assert!(matches!(result, Err(ConfigError::ClawWiderThanBox { .. })));

        // Exactly as wide as the box leaves a single rail position
        let mut tuning = Tuning::default();
        tuning.claw.size.x = tuning.box_size.x;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_home_off_rail() {
        let result = Tuning::from_json(r#"{ "claw": { "home_x": 5.0 } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::HomeOffRail { home_x, .. }) if home_x == 5.0
        ));

        let mut tuning = Tuning::default();
        tuning.claw.home_x = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::HomeOffRail { .. })
        ));

        tuning.claw.home_x = tuning.rail_range().1;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rail_range_uses_half_claw_width() {
        let tuning = Tuning::default();
        let (lo, hi) = tuning.rail_range();
        assert!((lo - (BOX_LEFT + 0.06)).abs() < 1e-6);
        assert!((hi - (BOX_RIGHT - 0.06)).abs() < 1e-6);
    }
}
