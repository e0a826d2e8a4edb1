//! Per-frame simulation tick
//!
//! Order within a frame: clicks, lamp, claw (may grab), lower/drop key,
//! manual rope, held toy snap, falling toy (may win or land), deferred prize
//! click. All state transitions go through [`Simulation::apply`].

use glam::Vec2;

use super::claw::RopeEvent;
use super::collision::{find_grab_target, prize_area_contains, token_slot_contains};
use super::lamp::LampMode;
use super::physics::{FallOutcome, step_falling};
use super::state::{GameEvent, GameState, Simulation, ToyState};

/// A pointer button press in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerClick {
    pub primary: bool,
    pub pos: Vec2,
}

impl PointerClick {
    pub fn primary(pos: Vec2) -> Self {
        Self { primary: true, pos }
    }
}

/// Input sampled once at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: slide claw left
    pub left: bool,
    /// Held: slide claw right
    pub right: bool,
    /// Held: reel rope in (manual)
    pub raise: bool,
    /// Held: lower/drop on press, pay out rope (manual) while held
    pub lower: bool,
    /// Clicks since the previous frame, oldest first
    pub clicks: Vec<PointerClick>,
    /// Current pointer position, if known
    pub pointer: Option<Vec2>,
}

/// Something that may move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Click landed on the token slot
    InsertToken,
    /// Lower key pressed with an empty claw
    Lower,
    /// Lower key pressed while carrying
    Drop,
    /// Lowering claw overlaps this toy
    Grab(usize),
    /// Lowering claw reached the floor empty-handed
    Bottomed,
    /// Falling toy dropped into the hole
    HoleEntered(usize),
    /// Falling toy came to rest on the floor
    Landed(usize),
    /// Click landed on the prize compartment
    CollectPrize,
}

impl Simulation {
    /// Single state transition function. Returns false (and changes nothing)
    /// when the trigger does not apply in the current state.
    pub fn apply(&mut self, trigger: Trigger) -> bool {
        use GameState::*;

        match (self.state, trigger) {
            (Idle, Trigger::InsertToken) => {
                self.lamp.set_mode(LampMode::Blue);
                self.claw.open = true;
                self.state = ActiveNoToy;
                self.events.push(GameEvent::GameStarted);
                log::info!("Token accepted, claw live");
                true
            }

            (ActiveNoToy, Trigger::Lower) if self.claw.is_idle() => {
                self.claw.begin_lowering();
                self.events.push(GameEvent::LoweringStarted);
                true
            }

            (ActiveNoToy, Trigger::Grab(idx))
                if self.claw.is_moving_down()
                    && self.toys.get(idx).is_some_and(|t| t.is_grabbable()) =>
            {
                let toy = &mut self.toys[idx];
                toy.state = ToyState::Grabbed;
                toy.vel = Vec2::ZERO;
                self.grabbed_toy = Some(idx);
                self.claw.open = false;
                self.claw.begin_raising();
                self.state = ActiveCarrying;
                self.events.push(GameEvent::Grabbed { toy: idx });
                log::info!("Grabbed toy {}", idx);
                true
            }

            (ActiveNoToy, Trigger::Bottomed) if self.claw.is_moving_down() => {
                self.claw.begin_raising();
                self.events.push(GameEvent::EmptyRetract);
                true
            }

            (ActiveCarrying, Trigger::Drop) if self.claw.is_idle() => {
                let Some(idx) = self.grabbed_toy.filter(|&i| i < self.toys.len()) else {
                    return false;
                };
                let release_at = self.claw.grab_point();
                let toy = &mut self.toys[idx];
                toy.state = ToyState::Falling;
                toy.vel = Vec2::ZERO;
                toy.pos = release_at;
                self.falling_toy = Some(idx);
                self.grabbed_toy = None;
                self.claw.open = true;
                self.state = ToyFalling;
                self.events.push(GameEvent::Dropped { toy: idx });
                log::info!("Dropped toy {} at x={:.3}", idx, release_at.x);
                true
            }

            (ToyFalling, Trigger::HoleEntered(idx)) if idx < self.toys.len() => {
                let toy = &mut self.toys[idx];
                toy.state = ToyState::InPrize;
                toy.vel = Vec2::ZERO;
                toy.pos = self.prize.pos;
                self.prize.toy = Some(idx);
                self.falling_toy = None;
                self.lamp.set_mode(LampMode::Blink);
                self.claw.open = false;
                self.claw.begin_raising();
                self.state = PrizeWaiting;
                self.events.push(GameEvent::PrizeWon { toy: idx });
                log::info!("Toy {} entered the hole", idx);
                true
            }

            (ToyFalling, Trigger::Landed(idx)) => {
                self.falling_toy = None;
                // An early prize click only counts for this drop
                self.pending_prize_click = false;
                self.state = ActiveNoToy;
                self.events.push(GameEvent::ToyLanded { toy: idx });
                log::debug!("Toy {} landed on the floor", idx);
                true
            }

            // A prize on display is collectable in any state
            (_, Trigger::CollectPrize) => self.collect_prize(),

            (Idle | ActiveNoToy | ActiveCarrying | ToyFalling | PrizeWaiting, _) => false,
        }
    }

    /// Take the prize out, respawn the toy and reset the machine
    fn collect_prize(&mut self) -> bool {
        let Some(idx) = self.prize.toy.filter(|&i| i < self.toys.len()) else {
            return false;
        };
        let Some(respawn) = self.spawn.take() else {
            log::warn!("No spawn slot for toy {}, leaving prize in place", idx);
            return false;
        };

        let toy = &mut self.toys[idx];
        toy.state = ToyState::Resting;
        toy.active = true;
        toy.vel = Vec2::ZERO;
        toy.pos = respawn;

        self.reset_machine();
        self.events.push(GameEvent::PrizeCollected { toy: idx, respawn });
        log::info!("Prize collected, toy {} back on the floor", idx);
        true
    }

    pub fn start_game(&mut self) -> bool {
        self.apply(Trigger::InsertToken)
    }

    pub fn start_lowering(&mut self) -> bool {
        self.apply(Trigger::Lower)
    }

    pub fn release_toy(&mut self) -> bool {
        self.apply(Trigger::Drop)
    }

    pub fn try_collect_prize(&mut self) -> bool {
        self.apply(Trigger::CollectPrize)
    }

    /// Resolve one pointer click.
    ///
    /// Every primary click updates `pointer` and queues a [`GameEvent::Click`],
    /// even when it changes nothing else. Those two are diagnostics and sit
    /// outside the machine state a no-op click must leave untouched.
    pub fn click(&mut self, click: PointerClick) {
        if !click.primary {
            return;
        }
        self.pointer = click.pos;
        self.events.push(GameEvent::Click {
            pos: click.pos,
            state: self.state,
            prize_waiting: self.prize.has_toy(),
        });
        log::debug!(
            "Click at ({:.3}, {:.3}) state={} prize={}",
            click.pos.x,
            click.pos.y,
            self.state,
            self.prize.has_toy()
        );

        if prize_area_contains(&self.prize, click.pos) {
            if self.prize.has_toy() {
                self.apply(Trigger::CollectPrize);
                return;
            }
            // Clicked while the toy is still on its way down
            if self.state == GameState::ToyFalling {
                self.pending_prize_click = true;
                self.events.push(GameEvent::PrizeClickDeferred);
                return;
            }
        }

        if token_slot_contains(&self.token_slot, click.pos) {
            self.apply(Trigger::InsertToken);
        }
    }
}

/// Advance the simulation by one frame of `dt` seconds
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32) {
    sim.frame += 1;
    if let Some(pointer) = input.pointer {
        sim.pointer = pointer;
    }
    for &click in &input.clicks {
        sim.click(click);
    }

    sim.lamp.update(sim.state, dt);

    update_claw(sim, input, dt);

    let lower_pressed = input.lower && !sim.lower_was_down;
    if lower_pressed {
        match sim.state {
            GameState::ActiveNoToy => {
                sim.apply(Trigger::Lower);
            }
            GameState::ActiveCarrying => {
                sim.apply(Trigger::Drop);
            }
            _ => {}
        }
    }

    if sim.state.allows_manual_rope() {
        sim.claw.manual_rope(input.lower, input.raise, dt);
    }
    sim.lower_was_down = input.lower;

    if let Some(idx) = sim.grabbed_toy {
        let grab_point = sim.claw.grab_point();
        match sim.toys.get_mut(idx) {
            Some(toy) => toy.pos = grab_point,
            None => {
                log::warn!("Grabbed toy index {} out of range", idx);
                sim.grabbed_toy = None;
            }
        }
    }

    update_falling_toy(sim, dt);

    if sim.pending_prize_click && sim.prize.has_toy() && sim.state == GameState::PrizeWaiting {
        sim.pending_prize_click = false;
        sim.apply(Trigger::CollectPrize);
    }

    if sim.prize.has_toy() {
        sim.prize.pulse_time += dt;
    } else {
        sim.prize.pulse_time = 0.0;
    }
}

fn update_claw(sim: &mut Simulation, input: &TickInput, dt: f32) {
    if sim.state.allows_steering() {
        let dir = input.right as i8 as f32 - input.left as i8 as f32;
        let rail = sim.tuning.rail_range();
        sim.claw.steer(dir, dt, rail);
    }

    let lowering = sim.claw.is_moving_down();
    let rope_event = sim.claw.advance_rope(dt, sim.tuning.floor_y());

    // Grab check runs on every lowering frame, including the one that bottoms out
    if lowering {
        if let Some(idx) = find_grab_target(&sim.claw, &sim.toys, sim.tuning.grab_shrink) {
            sim.apply(Trigger::Grab(idx));
        }
    }
    if rope_event == RopeEvent::Bottomed {
        sim.apply(Trigger::Bottomed);
    }
}

fn update_falling_toy(sim: &mut Simulation, dt: f32) {
    let Some(idx) = sim.falling_toy else {
        return;
    };
    let floor_y = sim.tuning.floor_y();
    let gravity = sim.tuning.gravity;
    let Some(toy) = sim.toys.get_mut(idx).filter(|t| t.is_falling()) else {
        sim.falling_toy = None;
        sim.pending_prize_click = false;
        return;
    };

    match step_falling(toy, &sim.hole, floor_y, gravity, dt) {
        FallOutcome::Falling => {}
        FallOutcome::EnteredHole => {
            sim.apply(Trigger::HoleEntered(idx));
        }
        FallOutcome::Landed => {
            sim.apply(Trigger::Landed(idx));
            // A toy can only land while falling; never leave a stale tracker
            sim.falling_toy = None;
            sim.pending_prize_click = false;
        }
    }
}
