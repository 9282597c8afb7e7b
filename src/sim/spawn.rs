//! Spawn scheduler
//!
//! Three independent cadences (enemy, warning, money). Each fires when its
//! countdown runs out and re-arms with a random interval that tightens as
//! the road speeds up. Entities appear just past the right edge.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::{Anchor, CoinVariant, EntityIds, Obstacle, ObstacleKind, Pickup};
use crate::consts::{ENEMY_SPEED_FACTOR, ROAD_SPEED_FACTOR};
use crate::tuning::Tuning;

/// Five-coin arch, in units relative to the arc base (x, y; negative y is up)
const COIN_ARC: [(f32, f32); 5] = [
    (0.0, -200.0),
    (-160.0, -100.0),
    (160.0, -100.0),
    (-320.0, 0.0),
    (320.0, 0.0),
];

/// What the scheduler needs to know about the world this tick
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub tuning: &'a Tuning,
    pub unit: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub design_width: f32,
    pub lane_count: usize,
}

impl SpawnContext<'_> {
    /// How far toward max speed the road is, in [0, 1]
    pub fn speed_factor(&self) -> f32 {
        if self.max_speed <= 0.0 {
            return 0.0;
        }
        crate::saturate(self.speed / self.max_speed)
    }
}

/// Pick a lane, never repeating `previous` when there is a choice
pub fn pick_lane(rng: &mut impl RandomSource, lane_count: usize, previous: usize) -> usize {
    if lane_count <= 1 {
        return 0;
    }
    let mut lane = rng.index(lane_count);
    if lane == previous {
        lane = (lane + 1 + rng.index(lane_count - 1)) % lane_count;
    }
    lane
}

/// Countdown timers and per-kind lane memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub enemy_timer: f32,
    pub warning_timer: f32,
    pub money_timer: f32,
    last_enemy_lane: usize,
    last_warning_lane: usize,
    last_money_lane: usize,
}

impl SpawnScheduler {
    /// Zero every timer and forget lanes (full restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Arm cadences for a fresh run; enemies wait for the intro gate
    pub fn arm_for_run(&mut self, rng: &mut impl RandomSource, ctx: &SpawnContext) {
        self.warning_timer = rng.range(0.4, 0.9);
        self.schedule_money(rng, ctx, 0.0);
        self.enemy_timer = 0.0;
    }

    /// First enemy right after the intro gate opens
    pub fn arm_first_enemy(&mut self, rng: &mut impl RandomSource) {
        self.enemy_timer = rng.range(0.6, 1.2);
    }

    /// Generous gaps after the tutorial pause
    pub fn rearm_after_tutorial(&mut self, rng: &mut impl RandomSource, ctx: &SpawnContext) {
        self.enemy_timer = rng.range(1.0, 5.0);
        self.warning_timer = rng.range(1.0, 3.0);
        self.schedule_money(rng, ctx, 0.0);
    }

    pub fn schedule_enemy(&mut self, rng: &mut impl RandomSource, ctx: &SpawnContext) {
        let (min, max) = ctx.tuning.enemy_cadence.bounds(ctx.speed_factor());
        self.enemy_timer = rng.range(min, max) + rng.next() * ctx.tuning.enemy_jitter;
    }

    pub fn schedule_warning(&mut self, rng: &mut impl RandomSource, ctx: &SpawnContext) {
        let (min, max) = ctx.tuning.warning_cadence.bounds(ctx.speed_factor());
        // Never closer than the distance a fresh landing needs
        let gap = if ctx.speed > 0.0 {
            (ctx.tuning.landing_safety_distance + 60.0) * ctx.unit / ctx.speed
        } else {
            min
        };
        self.warning_timer = rng.range(min, max).max(gap);
        if rng.chance(ctx.tuning.warning_hurry_chance) {
            self.warning_timer *= ctx.tuning.warning_hurry_factor;
        }
    }

    pub fn schedule_money(&mut self, rng: &mut impl RandomSource, ctx: &SpawnContext, extra: f32) {
        let (min, max) = ctx.tuning.money_cadence.bounds(ctx.speed_factor());
        self.money_timer = rng.range(min, max) + extra;
        if rng.chance(ctx.tuning.money_hurry_chance) {
            self.money_timer *= ctx.tuning.money_hurry_factor;
        }
    }

    /// Push the warning cadence past a landing window
    pub fn defer_warning(&mut self, until: f32) {
        self.warning_timer = self.warning_timer.max(until);
    }

    pub fn spawn_enemy(
        &mut self,
        rng: &mut impl RandomSource,
        ctx: &SpawnContext,
        ids: &mut EntityIds,
    ) -> Obstacle {
        let lane = pick_lane(rng, ctx.lane_count, self.last_enemy_lane);
        self.last_enemy_lane = lane;
        Obstacle {
            id: ids.next_id(),
            kind: ObstacleKind::Enemy,
            lane,
            x: ctx.design_width + 160.0 * ctx.unit,
            speed: ctx.speed * ENEMY_SPEED_FACTOR,
            hit: false,
            animated: true,
            drop: 0.0,
            anim_time: 0.0,
        }
    }

    pub fn spawn_warning(
        &mut self,
        rng: &mut impl RandomSource,
        ctx: &SpawnContext,
        ids: &mut EntityIds,
    ) -> Obstacle {
        let lane = pick_lane(rng, ctx.lane_count, self.last_warning_lane);
        self.last_warning_lane = lane;
        Obstacle {
            id: ids.next_id(),
            kind: ObstacleKind::Warning,
            lane,
            x: ctx.design_width + rng.range(120.0, 240.0) * ctx.unit,
            speed: ctx.speed * ROAD_SPEED_FACTOR,
            hit: false,
            animated: false,
            drop: 6.0,
            anim_time: 0.0,
        }
    }

    /// Fire the money cadence: a single coin or a five-coin arc, then re-arm
    pub fn spawn_money(
        &mut self,
        rng: &mut impl RandomSource,
        ctx: &SpawnContext,
        ids: &mut EntityIds,
    ) -> Vec<Pickup> {
        if rng.chance(ctx.tuning.money_group_chance) {
            let coins = self.money_arc(rng, ctx, ids);
            self.schedule_money(rng, ctx, ctx.tuning.money_group_delay);
            coins
        } else {
            let coin = self.money_single(rng, ctx, ids);
            self.schedule_money(rng, ctx, 0.0);
            vec![coin]
        }
    }

    fn money_single(
        &mut self,
        rng: &mut impl RandomSource,
        ctx: &SpawnContext,
        ids: &mut EntityIds,
    ) -> Pickup {
        let variant = if rng.chance(ctx.tuning.rare_coin_chance) {
            CoinVariant::Rare
        } else {
            CoinVariant::Common
        };
        let lane = pick_lane(rng, ctx.lane_count, self.last_money_lane);
        self.last_money_lane = lane;
        let x = ctx.design_width + rng.range(140.0, 220.0) * ctx.unit;
        let lift = rng.range(64.0, 108.0);
        Pickup {
            id: ids.next_id(),
            lane,
            x,
            lift,
            bob: 0.0,
            speed: ctx.speed * ROAD_SPEED_FACTOR,
            value: coin_value(rng),
            phase: rng.next() * TAU,
            variant,
            anchor: Anchor::BottomCenter,
        }
    }

    fn money_arc(
        &mut self,
        rng: &mut impl RandomSource,
        ctx: &SpawnContext,
        ids: &mut EntityIds,
    ) -> Vec<Pickup> {
        let lane = pick_lane(rng, ctx.lane_count, self.last_money_lane);
        self.last_money_lane = lane;
        let base_x = ctx.design_width + rng.range(160.0, 220.0) * ctx.unit;
        let base_lift = rng.range(110.0, 160.0);

        // One or two members use the rare texture
        let rare_count = 1 + rng.index(2);
        let mut pool: Vec<usize> = (0..COIN_ARC.len()).collect();
        let mut rare_slots = Vec::with_capacity(rare_count);
        for _ in 0..rare_count {
            rare_slots.push(pool.remove(rng.index(pool.len())));
        }

        COIN_ARC
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| Pickup {
                id: ids.next_id(),
                lane,
                x: base_x + dx * ctx.unit,
                lift: base_lift - dy,
                bob: 0.0,
                speed: ctx.speed * ROAD_SPEED_FACTOR,
                value: coin_value(rng),
                phase: rng.next() * TAU,
                variant: if rare_slots.contains(&i) {
                    CoinVariant::Rare
                } else {
                    CoinVariant::Common
                },
                anchor: Anchor::Center,
            })
            .collect()
    }
}

/// Coin reward in 5..=9
fn coin_value(rng: &mut impl RandomSource) -> u32 {
    5 + rng.index(5) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{PcgSource, ScriptedSource};
    use proptest::prelude::*;

    fn ctx(tuning: &Tuning, speed: f32, lane_count: usize) -> SpawnContext<'_> {
        SpawnContext {
            tuning,
            unit: 1.0,
            speed,
            max_speed: 660.0,
            design_width: 720.0,
            lane_count,
        }
    }

    #[test]
    fn test_lane_never_repeats_over_many_picks() {
        let mut rng = PcgSource::new(2024);
        for lanes in 2..6 {
            let mut previous = 0;
            for _ in 0..10_000 {
                let lane = pick_lane(&mut rng, lanes, previous);
                assert_ne!(lane, previous);
                assert!(lane < lanes);
                previous = lane;
            }
        }
    }

    #[test]
    fn test_single_lane_always_zero() {
        let mut rng = PcgSource::new(1);
        for _ in 0..100 {
            assert_eq!(pick_lane(&mut rng, 1, 0), 0);
        }
    }

    proptest! {
        #[test]
        fn prop_lane_pick_avoids_previous(
            seed in any::<u64>(),
            lanes in 2usize..8,
            previous in 0usize..8,
        ) {
            let previous = previous % lanes;
            let mut rng = PcgSource::new(seed);
            let lane = pick_lane(&mut rng, lanes, previous);
            prop_assert!(lane < lanes);
            prop_assert_ne!(lane, previous);
        }
    }

    #[test]
    fn test_enemy_interval_tightens_with_speed() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();

        // Lowest rolls give min bound, no jitter
        let mut rng = ScriptedSource::constant(0.0);
        scheduler.schedule_enemy(&mut rng, &ctx(&tuning, 0.0, 1));
        assert!((scheduler.enemy_timer - 2.8).abs() < 1e-5);
        scheduler.schedule_enemy(&mut rng, &ctx(&tuning, 660.0, 1));
        assert!((scheduler.enemy_timer - 2.4).abs() < 1e-5);

        let mut rng = PcgSource::new(9);
        for _ in 0..1000 {
            scheduler.schedule_enemy(&mut rng, &ctx(&tuning, 500.0, 1));
            assert!(scheduler.enemy_timer >= 2.4 && scheduler.enemy_timer < 4.4 + 0.4);
        }
    }

    #[test]
    fn test_warning_interval_respects_landing_gap() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();
        // Very slow road: the landing gap dominates the random interval
        let mut rng = ScriptedSource::constant(0.5);
        scheduler.schedule_warning(&mut rng, &ctx(&tuning, 50.0, 1));
        assert!((scheduler.warning_timer - 200.0 / 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_warning_hurry_applies_after_floor() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();
        // range roll 0 -> 1.6 (speed 0 disables the gap); hurry roll 0 < 0.2 -> x0.8
        let mut rng = ScriptedSource::constant(0.0);
        scheduler.schedule_warning(&mut rng, &ctx(&tuning, 0.0, 1));
        assert!((scheduler.warning_timer - 1.6 * 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_money_arc_layout() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();
        let mut ids = EntityIds::default();
        // First roll below 0.2 picks the arc
        let mut rng = ScriptedSource::new(vec![0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let coins = scheduler.spawn_money(&mut rng, &ctx(&tuning, 500.0, 1), &mut ids);
        assert_eq!(coins.len(), 5);

        let apex = &coins[0];
        assert_eq!(apex.anchor, Anchor::Center);
        assert!((apex.x - (720.0 + 160.0)).abs() < 1e-3);
        assert!((apex.lift - 310.0).abs() < 1e-3);
        assert!((coins[3].x - (720.0 + 160.0 - 320.0)).abs() < 1e-3);
        assert!((coins[4].lift - 110.0).abs() < 1e-3);

        let rare = coins.iter().filter(|c| c.variant == CoinVariant::Rare).count();
        assert!((1..=2).contains(&rare));
        assert!(coins.iter().all(|c| (5..=9).contains(&c.value)));
        // Group spawns add the extra delay
        assert!(scheduler.money_timer >= 0.8);
    }

    #[test]
    fn test_single_coin() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();
        let mut ids = EntityIds::default();
        let mut rng = ScriptedSource::constant(0.5);
        let coins = scheduler.spawn_money(&mut rng, &ctx(&tuning, 500.0, 1), &mut ids);
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].variant, CoinVariant::Common);
        assert_eq!(coins[0].anchor, Anchor::BottomCenter);
        assert_eq!(coins[0].value, 7);
        assert!(coins[0].speed == 500.0);
    }

    #[test]
    fn test_enemy_outpaces_road() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::default();
        let mut ids = EntityIds::default();
        let mut rng = PcgSource::new(5);
        let enemy = scheduler.spawn_enemy(&mut rng, &ctx(&tuning, 500.0, 1), &mut ids);
        assert_eq!(enemy.kind, ObstacleKind::Enemy);
        assert!((enemy.speed - 525.0).abs() < 1e-3);
        assert!(enemy.x > 720.0);

        let warning = scheduler.spawn_warning(&mut rng, &ctx(&tuning, 500.0, 1), &mut ids);
        assert_eq!(warning.speed, 500.0);
        assert_ne!(enemy.id, warning.id);
    }
}
