//! Fixed timestep simulation tick
//!
//! Applies one frame of host input to the world, then advances it.

use super::rng::RandomSource;
use super::state::Phase;
use super::world::{LaneChange, World};

/// Seconds of lead the autopilot gives itself before an obstacle arrives
const AUTOPILOT_LEAD: f32 = 0.1;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap / space
    pub jump: bool,
    /// Swipe or arrow key
    pub lane_change: Option<LaneChange>,
    /// UI opened the install panel
    pub open_panel: bool,
    /// UI closed the install panel
    pub close_panel: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Apply `input` and advance the world by `dt`
pub fn tick<R: RandomSource>(world: &mut World<R>, input: &TickInput, dt: f32) {
    if input.open_panel {
        world.open_cta_panel();
    }
    if input.close_panel {
        world.close_cta_panel();
    }

    let mut input = input.clone();
    if input.idle_mode && autopilot_wants_jump(world) {
        input.jump = true;
    }

    if let Some(direction) = input.lane_change {
        world.on_lane_change_intent(direction);
    }
    if input.jump {
        world.on_jump_intent();
    }

    world.advance(dt);
}

/// Demo AI: start runs, clear the tutorial and hop over whatever is about to hit
pub fn autopilot_wants_jump<R: RandomSource>(world: &World<R>) -> bool {
    match world.phase() {
        Phase::Start | Phase::Tutorial => true,
        Phase::Playing => {
            let player = world.player();
            if player.airborne {
                return false;
            }
            let player_half = world.player_rect().size().x * 0.5;
            world
                .obstacles()
                .iter()
                .filter(|o| !o.hit && o.lane == world.lane_index())
                .any(|o| {
                    let rect = world.obstacle_rect(o);
                    let reach = (player_half + rect.size().x * 0.5) * o.kind.overlap()
                        + o.speed * AUTOPILOT_LEAD;
                    let ahead = o.x - player.x;
                    ahead > 0.0 && ahead < reach
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_tick_start_to_playing() {
        let mut world = World::new(12345);
        assert_eq!(world.phase(), Phase::Start);

        // Tick without input - should stay in Start
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.phase(), Phase::Start);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        assert_eq!(world.phase(), Phase::Playing);
        assert!(world.distance() > 0.0);
    }

    #[test]
    fn test_tick_panel() {
        let mut world = World::new(12345);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &jump, SIM_DT);

        let open = TickInput {
            open_panel: true,
            ..Default::default()
        };
        tick(&mut world, &open, SIM_DT);
        assert_eq!(world.phase(), Phase::CtaPanel);

        // Jumps do nothing under the panel
        let distance = world.distance();
        tick(&mut world, &jump, SIM_DT);
        assert_eq!(world.distance(), distance);
        assert!(!world.player().airborne);

        let close = TickInput {
            close_panel: true,
            ..Default::default()
        };
        tick(&mut world, &close, SIM_DT);
        assert_eq!(world.phase(), Phase::Playing);
        assert!(world.distance() > distance);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with same seed should produce identical results
        let mut world1 = World::new(99999);
        let mut world2 = World::new(99999);

        let inputs = [
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut world1, input, SIM_DT);
                tick(&mut world2, input, SIM_DT);
            }
        }

        assert_eq!(world1.state(), world2.state());
        assert_eq!(world1.distance(), world2.distance());
        assert_eq!(world1.obstacles().len(), world2.obstacles().len());
        assert_eq!(world1.player().y, world2.player().y);
    }

    #[test]
    fn test_idle_mode_plays_a_full_run() {
        let mut world = World::new(7);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..(120.0 / SIM_DT) as usize {
            tick(&mut world, &input, SIM_DT);
            let state = world.state();
            if state.lives == 0 {
                assert!(matches!(state.phase, Phase::Fail | Phase::Cta));
            }
            assert!(world.speed() <= world.max_speed());
        }

        assert!(matches!(world.phase(), Phase::Success | Phase::Cta));
    }

    #[test]
    fn test_autopilot_waits_outside_gameplay() {
        let mut world = World::new(3);
        assert!(autopilot_wants_jump(&world));
        world.on_jump_intent();
        assert!(!autopilot_wants_jump(&world));
    }
}
