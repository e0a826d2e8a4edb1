//! Falling toy integration

use super::collision::toy_in_hole;
use super::state::{Hole, Toy, ToyState};

/// Result of advancing a falling toy by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallOutcome {
    /// Still in the air
    Falling,
    /// Dropped into the hole; the caller moves it to the prize compartment
    EnteredHole,
    /// Came to rest on the floor
    Landed,
}

/// Integrate gravity for one frame and resolve hole/floor contact.
///
/// Horizontal position is frozen at the release point. The hole is checked
/// before the floor.
pub fn step_falling(toy: &mut Toy, hole: &Hole, floor_y: f32, gravity: f32, dt: f32) -> FallOutcome {
    toy.vel.y += gravity * dt;
    toy.pos.y += toy.vel.y * dt;

    if toy_in_hole(toy.pos, hole) {
        return FallOutcome::EnteredHole;
    }

    let rest_y = floor_y + toy.size.y * 0.5;
    if toy.pos.y <= rest_y {
        toy.pos.y = rest_y;
        toy.vel = glam::Vec2::ZERO;
        toy.state = ToyState::Resting;
        return FallOutcome::Landed;
    }

    FallOutcome::Falling
}
