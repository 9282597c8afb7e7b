//! Game state and core simulation types
//!
//! `GameState` is the HUD-facing record; entities live in the world's arenas
//! and are addressed by `EntityId`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_START, ENEMY_OVERLAP, STARTING_LIVES, WARNING_OVERLAP};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first tap
    Start,
    /// Soft pause teaching the first jump
    Tutorial,
    /// Active gameplay
    Playing,
    /// Out of lives, badge showing
    Fail,
    /// Call-to-action with countdown
    Cta,
    /// Finish line reached
    Success,
    /// Install panel shadowing another phase (UI-driven)
    CtaPanel,
}

impl Phase {
    /// Transitions the state machine allows
    pub fn can_enter(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Start, Playing)
                | (Playing, Tutorial)
                | (Tutorial, Playing)
                | (Playing, Fail)
                | (Fail, Cta)
                | (Playing, Success)
                | (Cta, Start)
                | (Success, Start)
        )
    }

    /// Phases where the countdown ticks
    pub fn counts_down(self) -> bool {
        matches!(self, Phase::Cta | Phase::Success)
    }

    /// Phases that accept lane changes
    pub fn steerable(self) -> bool {
        matches!(self, Phase::Playing | Phase::Tutorial)
    }
}

/// Read-only snapshot for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub lives: u8,
    pub money: u32,
    pub pay_amount: u32,
    pub toast_text: String,
    pub toast_timer: f32,
    pub damage_timer: f32,
    pub fail_badge_timer: f32,
    pub countdown: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: Phase::Start,
            lives: STARTING_LIVES,
            money: 0,
            pay_amount: 0,
            toast_text: String::new(),
            toast_timer: 0.0,
            damage_timer: 0.0,
            fail_badge_timer: 0.0,
            countdown: COUNTDOWN_START,
        }
    }
}

/// Stable handle for an obstacle, pickup or finish line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id allocator for the entity arenas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Animated runner coming the other way
    Enemy,
    /// Static road hazard
    Warning,
}

impl ObstacleKind {
    /// Shrink factor for the overlap test
    pub fn overlap(self) -> f32 {
        match self {
            ObstacleKind::Enemy => ENEMY_OVERLAP,
            ObstacleKind::Warning => WARNING_OVERLAP,
        }
    }
}

/// Where an entity's position sits on its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    BottomCenter,
    Center,
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub lane: usize,
    pub x: f32,
    /// Leftward speed (px/s)
    pub speed: f32,
    /// Already resolved, still sliding off-screen
    pub hit: bool,
    pub animated: bool,
    /// Vertical offset from the lane line in units (warnings sit a bit low)
    pub drop: f32,
    /// Animation clock for animated obstacles
    pub anim_time: f32,
}

/// Coin texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinVariant {
    Common,
    Rare,
}

/// A money pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub lane: usize,
    pub x: f32,
    /// Height above the lane line in units
    pub lift: f32,
    /// Accumulated cosmetic bob in units
    pub bob: f32,
    pub speed: f32,
    pub value: u32,
    /// Bob phase offset (radians)
    pub phase: f32,
    pub variant: CoinVariant,
    pub anchor: Anchor,
}

/// The finish line, at most one per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishLine {
    pub id: EntityId,
    pub x: f32,
}

/// Gameplay events for audio, analytics and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Jumped,
    Landed,
    LaneChanged { lane: usize },
    ObstacleHit { id: EntityId, kind: ObstacleKind, lives: u8 },
    MoneyCollected { value: u32, total: u32 },
    WarningDodged,
    EnemyUnlocked,
    TutorialEntered { obstacle: EntityId },
    TutorialExited,
    FinishLineSpawned,
    RunFailed { payout: u32 },
    RunSucceeded { payout: u32 },
    CtaShown,
    Reset,
    PanelOpened,
    PanelClosed,
}

/// Axis-aligned box used for all overlap tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` placed at `pos` according to `anchor`
    pub fn anchored(pos: Vec2, size: Vec2, anchor: Anchor) -> Self {
        let min = match anchor {
            Anchor::BottomCenter => Vec2::new(pos.x - size.x * 0.5, pos.y - size.y),
            Anchor::Center => pos - size * 0.5,
        };
        Self::new(min, min + size)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
