//! Game state and core simulation types
//!
//! Everything one cabinet needs from frame to frame lives in [`Simulation`].

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::claw::Claw;
use super::lamp::Lamp;
use crate::tuning::{ConfigError, Tuning};

/// Current phase of a play cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for a token
    #[default]
    Idle,
    /// Claw is live and empty
    ActiveNoToy,
    /// Claw holds a toy
    ActiveCarrying,
    /// A released toy is in the air
    ToyFalling,
    /// A won toy sits in the prize compartment
    PrizeWaiting,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Idle => "Idle",
            GameState::ActiveNoToy => "ActiveNoToy",
            GameState::ActiveCarrying => "ActiveCarrying",
            GameState::ToyFalling => "ToyFalling",
            GameState::PrizeWaiting => "PrizeWaiting",
        }
    }

    /// States in which the claw can travel along the rail
    pub fn allows_steering(&self) -> bool {
        matches!(
            self,
            GameState::ActiveNoToy | GameState::ActiveCarrying | GameState::ToyFalling
        )
    }

    /// States in which raise/lower keys drive the rope directly
    pub fn allows_manual_rope(&self) -> bool {
        matches!(self, GameState::ActiveNoToy | GameState::ActiveCarrying)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque texture reference resolved by the render sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Number of distinct toy skins handed out round-robin
    pub const TOY_SKINS: u32 = 3;

    pub fn toy(index: usize) -> Self {
        Self(index as u32 % Self::TOY_SKINS)
    }
}

/// Where a toy is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToyState {
    /// On the floor (or wherever it last stopped)
    #[default]
    Resting,
    /// Held by the claw
    Grabbed,
    /// Released and under gravity
    Falling,
    /// Won and shown in the prize compartment
    InPrize,
}

/// A toy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub texture: TextureHandle,
    pub active: bool,
    pub state: ToyState,
}

impl Toy {
    pub fn new(pos: Vec2, size: Vec2, texture: TextureHandle) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            texture,
            active: true,
            state: ToyState::Resting,
        }
    }

    #[inline]
    pub fn is_grabbed(&self) -> bool {
        self.state == ToyState::Grabbed
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == ToyState::Falling
    }

    #[inline]
    pub fn in_prize(&self) -> bool {
        self.state == ToyState::InPrize
    }

    /// Can the claw pick this toy up
    pub fn is_grabbable(&self) -> bool {
        self.active && self.state == ToyState::Resting
    }
}

/// Capture region a falling toy must pass through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec2,
    pub radius: f32,
    /// Fraction of `radius` the toy center must be within
    pub capture_ratio: f32,
    /// Vertical slack above `center.y`
    pub epsilon: f32,
}

/// Display slot for a won toy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeCompartment {
    pub pos: Vec2,
    pub size: Vec2,
    /// Scale of the clickable area relative to `size`
    pub click_scale: f32,
    /// Index of the toy on display
    pub toy: Option<usize>,
    /// Seconds the current prize has been waiting (drives the glow pulse)
    pub pulse_time: f32,
}

impl PrizeCompartment {
    #[inline]
    pub fn has_toy(&self) -> bool {
        self.toy.is_some()
    }
}

/// Coin slot that starts a play cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSlot {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Circular allocator over the floor spawn positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRing {
    pub positions: Vec<Vec2>,
    /// Next slot to hand out
    pub next: usize,
}

impl SpawnRing {
    pub fn new(positions: Vec<Vec2>, start: usize) -> Self {
        let next = if positions.is_empty() {
            0
        } else {
            start % positions.len()
        };
        Self { positions, next }
    }

    /// Return the current slot position and advance the ring
    pub fn take(&mut self) -> Option<Vec2> {
        let pos = *self.positions.get(self.next)?;
        self.next = (self.next + 1) % self.positions.len();
        Some(pos)
    }
}

/// Notable things that happened during a tick (diagnostics only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Click { pos: Vec2, state: GameState, prize_waiting: bool },
    GameStarted,
    LoweringStarted,
    Grabbed { toy: usize },
    EmptyRetract,
    Dropped { toy: usize },
    PrizeWon { toy: usize },
    ToyLanded { toy: usize },
    PrizeClickDeferred,
    PrizeCollected { toy: usize, respawn: Vec2 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Click {
                pos,
                state,
                prize_waiting,
            } => write!(
                f,
                "[CLICK] ({:.3}, {:.3}) state={} prize={}",
                pos.x, pos.y, state, prize_waiting
            ),
            GameEvent::GameStarted => write!(f, "[START] token accepted"),
            GameEvent::LoweringStarted => write!(f, "[CLAW] lowering"),
            GameEvent::Grabbed { toy } => write!(f, "[GRAB] toy {}", toy),
            GameEvent::EmptyRetract => write!(f, "[CLAW] floor reached empty, retracting"),
            GameEvent::Dropped { toy } => write!(f, "[DROP] toy {}", toy),
            GameEvent::PrizeWon { toy } => write!(f, "[HOLE] toy {} entered hole", toy),
            GameEvent::ToyLanded { toy } => write!(f, "[FLOOR] toy {} landed", toy),
            GameEvent::PrizeClickDeferred => write!(f, "[COLLECT] click remembered"),
            GameEvent::PrizeCollected { toy, respawn } => write!(
                f,
                "[COLLECT] toy {} respawned at ({:.2}, {:.2})",
                toy, respawn.x, respawn.y
            ),
        }
    }
}

/// One cabinet's complete, deterministic simulation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub tuning: Tuning,
    /// Seed the spawn layout was drawn from
    pub seed: u64,
    pub state: GameState,
    pub lamp: Lamp,
    pub claw: Claw,
    pub toys: Vec<Toy>,
    pub hole: Hole,
    pub prize: PrizeCompartment,
    pub token_slot: TokenSlot,
    pub spawn: SpawnRing,
    pub grabbed_toy: Option<usize>,
    pub falling_toy: Option<usize>,
    /// Prize click that arrived before the prize did
    pub pending_prize_click: bool,
    /// Lower key level from the previous tick (edge detection)
    pub lower_was_down: bool,
    /// Last known pointer position
    pub pointer: Vec2,
    /// Simulation tick counter
    pub frame: u64,
    /// Events raised since the last `take_events`
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Simulation {
    /// Create a machine with the reference tuning
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), seed)
    }

    /// Create a machine from custom tuning, rejecting unusable geometry
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning, seed))
    }

    fn build(tuning: Tuning, seed: u64) -> Self {
        let rest_y = tuning.toy_rest_y();
        let positions: Vec<Vec2> = tuning.spawn_x.iter().map(|&x| Vec2::new(x, rest_y)).collect();

        let mut rng = Pcg32::seed_from_u64(seed);
        let start = if positions.is_empty() {
            0
        } else {
            rng.random_range(0..positions.len())
        };
        let mut spawn = SpawnRing::new(positions, start);

        let toys = (0..tuning.toy_count)
            .filter_map(|i| {
                let pos = spawn.take()?;
                Some(Toy::new(pos, tuning.toy_size, TextureHandle::toy(i)))
            })
            .collect();

        let mut sim = Self {
            seed,
            state: GameState::Idle,
            lamp: Lamp::new(tuning.blink_interval),
            claw: Claw::from_tuning(&tuning.claw),
            toys,
            hole: Hole {
                center: tuning.hole_center,
                radius: tuning.hole_radius,
                capture_ratio: tuning.hole_capture_ratio,
                epsilon: tuning.hole_epsilon,
            },
            prize: PrizeCompartment {
                pos: tuning.prize_pos,
                size: tuning.prize_size,
                click_scale: tuning.prize_click_scale,
                toy: None,
                pulse_time: 0.0,
            },
            token_slot: TokenSlot {
                pos: tuning.token_slot_pos,
                size: tuning.token_slot_size,
            },
            spawn,
            grabbed_toy: None,
            falling_toy: None,
            pending_prize_click: false,
            lower_was_down: false,
            pointer: Vec2::ZERO,
            frame: 0,
            events: Vec::new(),
            tuning,
        };
        sim.reset_machine();
        log::info!(
            "Machine ready: {} toys, seed {}, next spawn slot {}",
            sim.toys.len(),
            seed,
            sim.spawn.next
        );
        sim
    }

    /// Return claw, lamp, prize and state to the start of a play cycle.
    /// Toys keep their positions.
    pub fn reset_machine(&mut self) {
        self.state = GameState::Idle;
        self.lamp.reset();
        self.claw.reset();
        self.prize.toy = None;
        self.prize.pulse_time = 0.0;
        self.grabbed_toy = None;
        self.falling_toy = None;
        self.pending_prize_click = false;
        self.lower_was_down = false;
    }

    /// Drain the events raised so far
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Toy currently shown in the prize compartment, if any
    pub fn prize_toy(&self) -> Option<&Toy> {
        self.prize.toy.and_then(|i| self.toys.get(i))
    }
}
