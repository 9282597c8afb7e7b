//! Player motion and derived animation state
//!
//! The player only moves vertically: a gravity jump arc, plus a damped ease
//! back to the lane baseline while grounded. Animation is derived from the
//! motion and never feeds back into it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Anchor, Rect};

/// Pose the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Run,
    /// Fixed jump frame: 0 take-off, 1 air, 2 landing
    Jump { frame: u8 },
    Damage,
}

/// Timed sub-phases of a jump (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    None,
    Start,
    Air,
    Land,
}

/// Jump and ease parameters, already scaled by the layout unit
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// Upward launch speed (positive, px/s)
    pub launch_speed: f32,
    pub gravity: f32,
    pub ease_rate: f32,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub airborne: bool,
    /// Lane line the player rests on
    pub baseline: f32,
    jump_phase: JumpPhase,
    jump_phase_timer: f32,
    anim: PlayerAnim,
    /// Seconds spent in the current pose (drives looping frames)
    anim_time: f32,
}

impl Player {
    pub fn new(x: f32, baseline: f32) -> Self {
        Self {
            x,
            y: baseline,
            vy: 0.0,
            airborne: false,
            baseline,
            jump_phase: JumpPhase::None,
            jump_phase_timer: 0.0,
            anim: PlayerAnim::Idle,
            anim_time: 0.0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn anim(&self) -> PlayerAnim {
        self.anim
    }

    pub fn anim_time(&self) -> f32 {
        self.anim_time
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump_phase
    }

    /// Collision box (feet anchored)
    pub fn bounds(&self, size: Vec2) -> Rect {
        Rect::anchored(self.pos(), size, Anchor::BottomCenter)
    }

    /// Start a jump. Returns `false` while already airborne.
    pub fn jump(&mut self, launch_speed: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.airborne = true;
        self.vy = -launch_speed;
        self.jump_phase = JumpPhase::Start;
        self.jump_phase_timer = 0.0;
        true
    }

    /// Integrate one step. Returns `true` on the tick the player lands.
    pub fn integrate(&mut self, dt: f32, params: &MotionParams) -> bool {
        if self.airborne {
            self.vy += params.gravity * dt;
            self.y += 2.0 * self.vy * dt;
            if self.y >= self.baseline {
                self.y = self.baseline;
                self.vy = 0.0;
                self.airborne = false;
                return true;
            }
            return false;
        }
        let diff = self.baseline - self.y;
        self.y += diff * (dt * params.ease_rate).min(1.0);
        false
    }

    /// Point at a new lane line; an airborne jump lands on it
    pub fn retarget(&mut self, baseline: f32) {
        self.baseline = baseline;
    }

    /// Put the player back on its baseline, standing still
    pub fn reset(&mut self) {
        self.y = self.baseline;
        self.vy = 0.0;
        self.airborne = false;
        self.jump_phase = JumpPhase::None;
        self.jump_phase_timer = 0.0;
    }

    /// Reset pose to idle (full restart)
    pub fn idle(&mut self) {
        self.set_anim(PlayerAnim::Idle);
    }

    /// Follow a layout change, keeping height above the lane proportional
    pub fn rescale(&mut self, x: f32, baseline: f32, ratio: f32) {
        let height = self.baseline - self.y;
        self.x = x;
        self.baseline = baseline;
        self.y = baseline - height * ratio;
        self.vy *= ratio;
    }

    /// Derive the pose for this tick
    pub fn animate(
        &mut self,
        dt: f32,
        damaged: bool,
        running: bool,
        landed: bool,
        start_duration: f32,
        land_duration: f32,
    ) {
        self.anim_time += dt;

        if damaged {
            self.set_anim(PlayerAnim::Damage);
            return;
        }

        if landed {
            self.jump_phase = JumpPhase::Land;
            self.jump_phase_timer = 0.0;
        }

        if self.airborne {
            self.jump_phase_timer += dt;
            if matches!(self.jump_phase, JumpPhase::None | JumpPhase::Land) {
                self.jump_phase = JumpPhase::Start;
                self.jump_phase_timer = 0.0;
            }
            if self.jump_phase == JumpPhase::Start {
                self.set_anim(PlayerAnim::Jump { frame: 0 });
                if self.jump_phase_timer >= start_duration {
                    self.jump_phase = JumpPhase::Air;
                    self.jump_phase_timer = 0.0;
                }
            } else {
                self.set_anim(PlayerAnim::Jump { frame: 1 });
            }
            return;
        }

        if self.jump_phase == JumpPhase::Land {
            self.jump_phase_timer += dt;
            self.set_anim(PlayerAnim::Jump { frame: 2 });
            if self.jump_phase_timer >= land_duration {
                self.jump_phase = JumpPhase::None;
                self.jump_phase_timer = 0.0;
            }
            return;
        }

        if matches!(self.jump_phase, JumpPhase::Start | JumpPhase::Air) {
            self.jump_phase = JumpPhase::None;
            self.jump_phase_timer = 0.0;
        }

        self.set_anim(if running { PlayerAnim::Run } else { PlayerAnim::Idle });
    }

    fn set_anim(&mut self, anim: PlayerAnim) {
        if self.anim != anim {
            self.anim = anim;
            self.anim_time = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn params() -> MotionParams {
        MotionParams {
            launch_speed: 920.0,
            gravity: 2400.0,
            ease_rate: 20.0,
        }
    }

    #[test]
    fn test_jump_returns_exactly_to_baseline() {
        let mut p = Player::new(144.0, 934.0);
        assert!(p.jump(920.0));

        let mut peak = p.y;
        let mut landed = false;
        for _ in 0..600 {
            if p.integrate(DT, &params()) {
                landed = true;
                break;
            }
            peak = peak.min(p.y);
        }
        assert!(landed);
        assert_eq!(p.y, 934.0);
        assert_eq!(p.vy, 0.0);
        assert!(!p.airborne);
        // Roughly 2 * 920² / (2 * 2400) above the lane
        assert!(934.0 - peak > 300.0);
    }

    #[test]
    fn test_no_double_jump() {
        let mut p = Player::new(0.0, 100.0);
        assert!(p.jump(920.0));
        p.integrate(DT, &params());
        let vy = p.vy;
        assert!(!p.jump(920.0));
        assert_eq!(p.vy, vy);
    }

    #[test]
    fn test_grounded_eases_toward_new_baseline() {
        let mut p = Player::new(0.0, 100.0);
        p.retarget(200.0);
        p.integrate(DT, &params());
        // One step covers a third of the gap at 20/s
        assert!((p.y - (100.0 + 100.0 / 3.0)).abs() < 1e-3);
        // Large steps snap
        p.integrate(1.0, &params());
        assert!((p.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_lane_change_mid_jump_lands_on_new_lane() {
        let mut p = Player::new(0.0, 500.0);
        p.jump(920.0);
        p.integrate(DT, &params());
        p.retarget(400.0);
        assert!(p.airborne);
        while !p.integrate(DT, &params()) {}
        assert_eq!(p.y, 400.0);
    }

    #[test]
    fn test_jump_pose_sequence() {
        let mut p = Player::new(0.0, 500.0);
        p.animate(DT, false, true, false, 0.08, 0.12);
        assert_eq!(p.anim(), PlayerAnim::Run);

        p.jump(920.0);
        p.integrate(DT, &params());
        p.animate(DT, false, true, false, 0.08, 0.12);
        assert_eq!(p.anim(), PlayerAnim::Jump { frame: 0 });

        for _ in 0..6 {
            p.integrate(DT, &params());
            p.animate(DT, false, true, false, 0.08, 0.12);
        }
        assert_eq!(p.jump_phase(), JumpPhase::Air);
        assert_eq!(p.anim(), PlayerAnim::Jump { frame: 1 });

        let mut landed = false;
        while !landed {
            landed = p.integrate(DT, &params());
            p.animate(DT, false, true, landed, 0.08, 0.12);
        }
        assert_eq!(p.anim(), PlayerAnim::Jump { frame: 2 });

        for _ in 0..10 {
            p.integrate(DT, &params());
            p.animate(DT, false, true, false, 0.08, 0.12);
        }
        assert_eq!(p.anim(), PlayerAnim::Run);
    }

    #[test]
    fn test_damage_overrides_pose() {
        let mut p = Player::new(0.0, 500.0);
        p.jump(920.0);
        p.animate(DT, true, true, false, 0.08, 0.12);
        assert_eq!(p.anim(), PlayerAnim::Damage);
    }

    #[test]
    fn test_rescale_keeps_relative_height() {
        let mut p = Player::new(100.0, 1000.0);
        p.y = 800.0;
        p.vy = -100.0;
        p.rescale(50.0, 500.0, 0.5);
        assert_eq!(p.y, 400.0);
        assert_eq!(p.vy, -50.0);
        assert_eq!(p.x, 50.0);
    }
}
