//! Collision and containment tests
//!
//! Everything is axis-aligned; nothing in the cabinet rotates. Tolerances are
//! tuned for play feel: grabs need a precise hit, prize clicks are forgiving.

use glam::Vec2;

use super::claw::Claw;
use super::state::{Hole, PrizeCompartment, TokenSlot, Toy};
use crate::point_in_rect;

/// Does the claw body overlap the toy's shrunken hit box
pub fn claw_overlaps_toy(claw_pos: Vec2, claw_size: Vec2, toy: &Toy, shrink: f32) -> bool {
    let d = (claw_pos - toy.pos).abs();
    let reach = claw_size * 0.5 + toy.size * shrink;
    d.x <= reach.x && d.y <= reach.y
}

/// First grabbable toy under the claw, scanning in index order
pub fn find_grab_target(claw: &Claw, toys: &[Toy], shrink: f32) -> Option<usize> {
    let claw_pos = claw.position();
    toys.iter()
        .position(|t| t.is_grabbable() && claw_overlaps_toy(claw_pos, claw.size, t, shrink))
}

/// Has a falling toy dropped into the hole: radially inside the capture
/// ring and down at the hole's plane
pub fn toy_in_hole(toy_pos: Vec2, hole: &Hole) -> bool {
    toy_pos.distance(hole.center) < hole.radius * hole.capture_ratio
        && toy_pos.y <= hole.center.y + hole.epsilon
}

/// Click test against the enlarged prize area
pub fn prize_area_contains(prize: &PrizeCompartment, p: Vec2) -> bool {
    point_in_rect(p, prize.pos, prize.size * prize.click_scale)
}

pub fn token_slot_contains(slot: &TokenSlot, p: Vec2) -> bool {
    point_in_rect(p, slot.pos, slot.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{TextureHandle, ToyState};
    use crate::tuning::ClawTuning;

    fn toy_at(x: f32, y: f32) -> Toy {
        Toy::new(Vec2::new(x, y), Vec2::splat(0.11), TextureHandle(0))
    }

    #[test]
    fn test_overlap_uses_shrunken_toy_box() {
        let claw_pos = Vec2::ZERO;
        let claw_size = Vec2::new(0.12, 0.10);
        // Reach in x: 0.06 + 0.11 * 0.35 = 0.0985
        assert!(claw_overlaps_toy(claw_pos, claw_size, &toy_at(0.098, 0.0), 0.35));
        assert!(!claw_overlaps_toy(claw_pos, claw_size, &toy_at(0.099, 0.0), 0.35));
        // Visually touching but outside the precise box
        assert!(!claw_overlaps_toy(claw_pos, claw_size, &toy_at(0.11, 0.0), 0.35));
    }

    #[test]
    fn test_grab_target_first_in_order() {
        let mut claw = Claw::from_tuning(&ClawTuning::default());
        claw.rope_length = 1.0;
        let p = claw.position();
        let toys = vec![
            toy_at(p.x + 0.5, p.y),
            toy_at(p.x + 0.02, p.y),
            toy_at(p.x - 0.02, p.y),
        ];
        assert_eq!(find_grab_target(&claw, &toys, 0.35), Some(1));
    }

    #[test]
    fn test_grab_target_skips_ineligible() {
        let mut claw = Claw::from_tuning(&ClawTuning::default());
        claw.rope_length = 1.0;
        let p = claw.position();
        let mut falling = toy_at(p.x, p.y);
        falling.state = ToyState::Falling;
        let mut won = toy_at(p.x, p.y);
        won.state = ToyState::InPrize;
        let mut inactive = toy_at(p.x, p.y);
        inactive.active = false;
        let toys = vec![falling, won, inactive];
        assert_eq!(find_grab_target(&claw, &toys, 0.35), None);
    }

    #[test]
    fn test_hole_requires_radial_and_vertical() {
        let hole = Hole {
            center: Vec2::new(0.43, -0.265),
            radius: 0.085,
            capture_ratio: 0.75,
            epsilon: 0.02,
        };
        // Aligned but still above the plane
        assert!(!toy_in_hole(Vec2::new(0.43, 0.0), &hole));
        // At the plane within epsilon
        assert!(toy_in_hole(Vec2::new(0.43, -0.25), &hole));
        // At the plane but outside the capture ring (0.06375)
        assert!(!toy_in_hole(Vec2::new(0.43 + 0.064, -0.265), &hole));
    }

    #[test]
    fn test_prize_area_is_enlarged() {
        let prize = PrizeCompartment {
            pos: Vec2::ZERO,
            size: Vec2::new(0.32, 0.16),
            click_scale: 1.4,
            toy: None,
            pulse_time: 0.0,
        };
        // Outside the visual box, inside the clickable one
        assert!(prize_area_contains(&prize, Vec2::new(0.2, 0.1)));
        assert!(!prize_area_contains(&prize, Vec2::new(0.23, 0.0)));
    }

    #[test]
    fn test_token_slot_exact_box() {
        let slot = TokenSlot {
            pos: Vec2::new(-0.33, -0.55),
            size: Vec2::new(0.22, 0.08),
        };
        assert!(token_slot_contains(&slot, slot.pos));
        assert!(!token_slot_contains(&slot, slot.pos + Vec2::new(0.12, 0.0)));
    }
}
