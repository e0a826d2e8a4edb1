//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only through each tick's `dt`
//! - Seeded RNG only (spawn layout)
//! - Stable iteration order (by toy index)
//! - No rendering or platform dependencies

pub mod claw;
pub mod collision;
pub mod lamp;
pub mod physics;
pub mod state;
pub mod tick;

pub use claw::{Claw, RopeEvent, RopeMotion};
pub use collision::{
    claw_overlaps_toy, find_grab_target, prize_area_contains, token_slot_contains, toy_in_hole,
};
pub use lamp::{Lamp, LampMode};
pub use physics::{FallOutcome, step_falling};
pub use state::{
    GameEvent, GameState, Hole, PrizeCompartment, Simulation, SpawnRing, TextureHandle, TokenSlot,
    Toy, ToyState,
};
pub use tick::{PointerClick, TickInput, Trigger, tick};
