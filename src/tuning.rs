//! Data-driven game balance
//!
//! Every numeric policy the runner uses. Distances, speeds and sizes are in
//! design pixels at `unit == 1` and get multiplied by the layout unit.
//! Loaded from JSON; missing fields fall back to the shipped values.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Randomized re-arm interval for one spawn cadence
///
/// Both ends shrink linearly as speed approaches max speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceRange {
    pub min: f32,
    pub max: f32,
    /// How much `min` shrinks at full speed
    pub min_tighten: f32,
    /// How much `max` shrinks at full speed
    pub max_tighten: f32,
}

impl CadenceRange {
    pub const fn new(min: f32, max: f32, min_tighten: f32, max_tighten: f32) -> Self {
        Self {
            min,
            max,
            min_tighten,
            max_tighten,
        }
    }

    /// Interval bounds at the given speed fraction (clamped to [0, 1])
    pub fn bounds(&self, speed_factor: f32) -> (f32, f32) {
        let f = crate::saturate(speed_factor);
        (self.min - f * self.min_tighten, self.max - f * self.max_tighten)
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run pacing ===
    /// Scroll speed at run start (px/s)
    pub base_speed: f32,
    /// Scroll speed cap (px/s)
    pub max_speed: f32,
    /// Linear speed ramp (px/s²)
    pub accel: f32,
    /// Distance after which the finish line appears
    pub finish_distance: f32,

    // === Player ===
    /// Player x as a fraction of design width
    pub player_x_ratio: f32,
    /// Upward launch speed (px/s)
    pub jump_velocity: f32,
    /// Downward acceleration while airborne (px/s²)
    pub gravity: f32,
    /// Grounded easing rate toward the lane baseline (1/s)
    pub ground_ease_rate: f32,
    /// Jump take-off pose duration (s)
    pub jump_start_duration: f32,
    /// Landing pose duration (s)
    pub jump_land_duration: f32,

    // === Lanes ===
    pub lane_count: usize,
    /// Vertical gap between stacked lanes
    pub lane_spacing: f32,

    // === Timers (seconds) ===
    pub landing_safety: f32,
    pub tutorial_landing_safety: f32,
    /// Extra distance a warning keeps from a fresh landing
    pub landing_safety_distance: f32,
    pub damage_flash: f32,
    pub fail_badge_delay: f32,
    pub toast_duration: f32,
    pub toast_text: String,

    // === Tutorial ===
    pub tutorial_min_distance: f32,
    pub tutorial_max_distance: f32,

    // === Intro gate ===
    pub warning_goal_min: u32,
    pub warning_goal_max: u32,
    pub money_goal_min: u32,
    pub money_goal_max: u32,

    // === Payouts: base + [0, spread) ===
    pub fail_pay_base: u32,
    pub fail_pay_spread: u32,
    pub success_pay_base: u32,
    pub success_pay_spread: u32,

    // === Cadences ===
    pub enemy_cadence: CadenceRange,
    pub enemy_jitter: f32,
    pub warning_cadence: CadenceRange,
    pub warning_hurry_chance: f32,
    pub warning_hurry_factor: f32,
    pub money_cadence: CadenceRange,
    pub money_hurry_chance: f32,
    pub money_hurry_factor: f32,
    pub money_group_chance: f32,
    pub money_group_delay: f32,
    pub rare_coin_chance: f32,

    // === Footprints (width, height) ===
    pub player_size: Vec2,
    pub enemy_size: Vec2,
    pub warning_size: Vec2,
    pub coin_size: Vec2,
    pub finish_size: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 500.0,
            max_speed: 660.0,
            accel: 18.0,
            finish_distance: 16000.0,

            player_x_ratio: 0.2,
            jump_velocity: 920.0,
            gravity: 2400.0,
            ground_ease_rate: 20.0,
            jump_start_duration: 0.08,
            jump_land_duration: 0.12,

            lane_count: 1,
            lane_spacing: 120.0,

            landing_safety: 0.85,
            tutorial_landing_safety: 1.0,
            landing_safety_distance: 140.0,
            damage_flash: 0.4,
            fail_badge_delay: 0.9,
            toast_duration: 0.5,
            toast_text: "Fantastic!".to_string(),

            tutorial_min_distance: 60.0,
            tutorial_max_distance: 220.0,

            warning_goal_min: 1,
            warning_goal_max: 2,
            money_goal_min: 10,
            money_goal_max: 20,

            fail_pay_base: 200,
            fail_pay_spread: 120,
            success_pay_base: 500,
            success_pay_spread: 200,

            enemy_cadence: CadenceRange::new(2.8, 4.4, 0.4, 0.6),
            enemy_jitter: 0.4,
            warning_cadence: CadenceRange::new(1.6, 2.9, 0.25, 0.45),
            warning_hurry_chance: 0.2,
            warning_hurry_factor: 0.8,
            money_cadence: CadenceRange::new(2.0, 3.4, 0.25, 0.5),
            money_hurry_chance: 0.15,
            money_hurry_factor: 0.85,
            money_group_chance: 0.2,
            money_group_delay: 0.8,
            rare_coin_chance: 0.14,

            player_size: Vec2::new(150.0, 230.0),
            enemy_size: Vec2::new(150.0, 180.0),
            warning_size: Vec2::new(110.0, 90.0),
            coin_size: Vec2::new(70.0, 70.0),
            finish_size: Vec2::new(220.0, 80.0),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the shipped defaults)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.lane_count == 0 {
            return Err(invalid("lane_count", "at least one lane is required"));
        }
        if self.base_speed <= 0.0 {
            return Err(invalid("base_speed", "must be positive"));
        }
        if self.max_speed < self.base_speed {
            return Err(invalid("max_speed", "must not be below base_speed"));
        }
        if self.jump_velocity <= 0.0 || self.gravity <= 0.0 {
            return Err(invalid("jump_velocity", "jump and gravity must be positive"));
        }
        if self.tutorial_min_distance >= self.tutorial_max_distance {
            return Err(invalid("tutorial_min_distance", "window is empty"));
        }
        if self.warning_goal_min > self.warning_goal_max {
            return Err(invalid("warning_goal_min", "exceeds warning_goal_max"));
        }
        if self.money_goal_min > self.money_goal_max {
            return Err(invalid("money_goal_min", "exceeds money_goal_max"));
        }
        for (field, cadence) in [
            ("enemy_cadence", &self.enemy_cadence),
            ("warning_cadence", &self.warning_cadence),
            ("money_cadence", &self.money_cadence),
        ] {
            let (min, max) = cadence.bounds(1.0);
            if min <= 0.0 || min > max {
                return Err(invalid(field, format!("bounds at full speed are {min}..{max}")));
            }
        }
        for (field, size) in [
            ("player_size", self.player_size),
            ("enemy_size", self.enemy_size),
            ("warning_size", self.warning_size),
            ("coin_size", self.coin_size),
            ("finish_size", self.finish_size),
        ] {
            if size.x <= 0.0 || size.y <= 0.0 {
                return Err(invalid(field, "footprint must be positive"));
            }
        }
        Ok(())
    }
}
