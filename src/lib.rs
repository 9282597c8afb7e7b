//! Dash Runner - an endless-runner playable ad
//!
//! Core modules:
//! - `sim`: Headless runner simulation (phases, motion, spawning, collisions)
//! - `layout`: Viewport to design-space scaling
//! - `scene`: Presentation adapter that owns renderable handles
//! - `tuning`: Data-driven game balance
//! - `error`: Construction-time errors

pub mod error;
pub mod layout;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use error::{SceneError, TuningError};
pub use layout::Layout;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed host step used by the headless runner (60 Hz, one frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Design height every `unit` is measured against
    pub const DESIGN_REFERENCE_HEIGHT: f32 = 1280.0;
    /// Fallback layout used before the host reports a viewport
    pub const DEFAULT_VIEW_WIDTH: f32 = 720.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 1280.0;

    /// Lives at the start of every run
    pub const STARTING_LIVES: u8 = 3;
    /// Call-to-action countdown start value
    pub const COUNTDOWN_START: u32 = 60;

    /// Enemies approach slightly faster than the road scrolls
    pub const ENEMY_SPEED_FACTOR: f32 = 1.05;
    /// Warnings and pickups ride the road
    pub const ROAD_SPEED_FACTOR: f32 = 1.0;

    /// Per-kind shrink factors for forgiving overlap tests
    pub const ENEMY_OVERLAP: f32 = 0.72;
    pub const WARNING_OVERLAP: f32 = 0.62;
    pub const PICKUP_OVERLAP: f32 = 0.6;
}

/// Clamp a value into `[0, 1]`
#[inline]
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
