//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected random source only
//! - Stable iteration order (spawn order, by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod parallax;
pub mod phase;
pub mod player;
pub mod progression;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{rects_overlap, shrink};
pub use parallax::{Parallax, ParallaxKind, ParallaxStrip};
pub use phase::PhaseMachine;
pub use player::{JumpPhase, MotionParams, Player, PlayerAnim};
pub use progression::IntroGate;
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use spawn::{SpawnContext, SpawnScheduler};
pub use state::{
    Anchor, CoinVariant, EntityId, EntityIds, FinishLine, GameEvent, GameState, Obstacle,
    ObstacleKind, Phase, Pickup, Rect,
};
pub use tick::{TickInput, autopilot_wants_jump, tick};
pub use world::{LaneChange, World};
