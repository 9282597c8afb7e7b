//! The runner world
//!
//! Owns the phase machine, the player, the entity arenas and every timer.
//! One `advance` call is one frame; intents arrive between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::rects_overlap;
use super::parallax::Parallax;
use super::phase::PhaseMachine;
use super::player::{MotionParams, Player};
use super::progression::IntroGate;
use super::rng::{PcgSource, RandomSource};
use super::spawn::{SpawnContext, SpawnScheduler};
use super::state::{
    Anchor, EntityId, EntityIds, FinishLine, GameEvent, GameState, Obstacle, ObstacleKind, Phase,
    Pickup, Rect,
};
use crate::consts::{COUNTDOWN_START, PICKUP_OVERLAP};
use crate::error::TuningError;
use crate::layout::Layout;
use crate::tuning::Tuning;

/// Entities further left than this (in units) are gone
const CULL_X: f32 = -200.0;
/// Finish line counts as reached this far (units) in front of the player
const FINISH_REACH: f32 = 40.0;
/// Where the tutorial obstacle is parked behind the player (units)
const TUTORIAL_PARK: f32 = 200.0;
/// Extra warning delay past the landing window on every jump (seconds)
const JUMP_WARNING_MARGIN: f32 = 0.3;

/// Lane change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneChange {
    /// Toward lane 0 (the ground lane)
    Down,
    /// Away from the ground lane
    Up,
}

impl LaneChange {
    fn delta(self) -> isize {
        match self {
            LaneChange::Down => -1,
            LaneChange::Up => 1,
        }
    }
}

fn spawn_ctx<'a>(
    tuning: &'a Tuning,
    layout: &Layout,
    speed: f32,
    max_speed: f32,
    lane_count: usize,
) -> SpawnContext<'a> {
    SpawnContext {
        tuning,
        unit: layout.unit,
        speed,
        max_speed,
        design_width: layout.design_width,
        lane_count,
    }
}

fn lane_y(lane_ys: &[f32], lane: usize) -> f32 {
    lane_ys
        .get(lane)
        .or(lane_ys.last())
        .copied()
        .unwrap_or_default()
}

fn obstacle_rect(o: &Obstacle, lane_ys: &[f32], tuning: &Tuning, unit: f32) -> Rect {
    let size = match o.kind {
        ObstacleKind::Enemy => tuning.enemy_size,
        ObstacleKind::Warning => tuning.warning_size,
    };
    let pos = Vec2::new(o.x, lane_y(lane_ys, o.lane) + o.drop * unit);
    Rect::anchored(pos, size * unit, Anchor::BottomCenter)
}

fn pickup_pos(p: &Pickup, lane_ys: &[f32], unit: f32) -> Vec2 {
    Vec2::new(p.x, lane_y(lane_ys, p.lane) + (p.bob - p.lift) * unit)
}

fn pickup_rect(p: &Pickup, lane_ys: &[f32], tuning: &Tuning, unit: f32) -> Rect {
    Rect::anchored(pickup_pos(p, lane_ys, unit), tuning.coin_size * unit, p.anchor)
}

/// The runner simulation
#[derive(Debug, Clone)]
pub struct World<R: RandomSource = PcgSource> {
    state: GameState,
    machine: PhaseMachine,
    tuning: Tuning,
    layout: Layout,
    rng: R,

    player: Player,
    lane_ys: Vec<f32>,
    lane_index: usize,

    obstacles: Vec<Obstacle>,
    pickups: Vec<Pickup>,
    finish_line: Option<FinishLine>,
    ids: EntityIds,

    spawner: SpawnScheduler,
    gate: IntroGate,
    tutorial_shown: bool,
    tutorial_obstacle: Option<EntityId>,
    parallax: Parallax,

    speed: f32,
    base_speed: f32,
    max_speed: f32,
    accel: f32,
    distance: f32,
    finish_distance: f32,
    landing_safety_timer: f32,
    countdown_timer: f32,
    /// Seconds of unshadowed simulation (drives cosmetic bob)
    clock: f32,

    events: Vec<GameEvent>,
}

impl World<PcgSource> {
    /// World with shipped tuning and a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), PcgSource::new(seed))
    }

    /// World with custom tuning and a seeded RNG
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::with_rng(tuning, PcgSource::new(seed))
    }
}

impl<R: RandomSource> World<R> {
    /// World with custom tuning and an injected random source
    pub fn with_rng(tuning: Tuning, rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, rng))
    }

    fn build(tuning: Tuning, mut rng: R) -> Self {
        let layout = Layout::default();
        let mut gate = IntroGate::default();
        gate.reroll(&mut rng, &tuning);

        let mut world = Self {
            state: GameState::default(),
            machine: PhaseMachine::new(),
            tuning,
            layout,
            rng,
            player: Player::new(0.0, 0.0),
            lane_ys: Vec::new(),
            lane_index: 0,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            finish_line: None,
            ids: EntityIds::default(),
            spawner: SpawnScheduler::default(),
            gate,
            tutorial_shown: false,
            tutorial_obstacle: None,
            parallax: Parallax::default(),
            speed: 0.0,
            base_speed: 0.0,
            max_speed: 0.0,
            accel: 0.0,
            distance: 0.0,
            finish_distance: 0.0,
            landing_safety_timer: 0.0,
            countdown_timer: 0.0,
            clock: 0.0,
            events: Vec::new(),
        };
        world.apply_layout();
        world.player = Player::new(world.player_x(), world.lane_ys[world.lane_index]);
        world.speed = world.base_speed;
        world
    }

    // === Host-facing operations ===

    /// Advance the simulation by one frame
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.machine.is_shadowed() {
            return;
        }
        self.clock += dt;

        self.update_timers(dt);
        if self.phase() == Phase::Tutorial {
            return;
        }

        self.update_parallax(dt);
        let landed = self.player.integrate(dt, &self.motion_params());
        if landed {
            self.events.push(GameEvent::Landed);
        }
        self.player.animate(
            dt,
            self.state.damage_timer > 0.0,
            self.phase() == Phase::Playing,
            landed,
            self.tuning.jump_start_duration,
            self.tuning.jump_land_duration,
        );

        if self.phase() != Phase::Playing {
            return;
        }

        self.distance += self.speed * dt;
        self.speed = (self.speed + self.accel * dt).min(self.max_speed);

        if self.finish_line.is_none() && self.distance > self.finish_distance {
            self.spawn_finish_line();
        }

        if self.finish_line.is_none() {
            self.run_cadences(dt);
        }

        self.update_obstacles(dt);
        if self.phase() != Phase::Playing {
            return;
        }
        self.update_pickups(dt);
        self.update_finish_line(dt);

        let reach = self.player.x + FINISH_REACH * self.layout.unit;
        if self.finish_line.as_ref().is_some_and(|f| f.x < reach) {
            self.trigger_success();
        }
    }

    /// Tap / space: restart, leave the tutorial, or jump depending on phase
    pub fn on_jump_intent(&mut self) {
        match self.phase() {
            Phase::Start => self.start_run(),
            Phase::Tutorial => {
                self.exit_tutorial();
                self.jump();
            }
            Phase::Playing => self.jump(),
            Phase::Cta | Phase::Success => self.reset(),
            Phase::Fail | Phase::CtaPanel => {
                log::debug!("Jump ignored in {:?}", self.phase());
            }
        }
    }

    /// Move one lane up or down (playing / tutorial only)
    pub fn on_lane_change_intent(&mut self, direction: LaneChange) {
        if !self.phase().steerable() || self.lane_ys.len() <= 1 {
            return;
        }
        let last = self.lane_ys.len() as isize - 1;
        let next = (self.lane_index as isize + direction.delta()).clamp(0, last) as usize;
        if next != self.lane_index {
            self.lane_index = next;
            self.player.retarget(self.lane_ys[next]);
            self.events.push(GameEvent::LaneChanged { lane: next });
        }
    }

    /// Recompute layout-derived values after a viewport change
    pub fn resize(&mut self, view_width: f32, view_height: f32) {
        let old = self.layout;
        self.layout = Layout::compute(view_width, view_height);
        let ratio = self.layout.unit / old.unit;
        let x_ratio = self.layout.design_width / old.design_width;

        self.apply_layout();
        let baseline = self.lane_ys[self.lane_index];
        self.player.rescale(self.player_x(), baseline, ratio);

        self.speed = (self.speed * ratio).min(self.max_speed);
        self.distance *= ratio;
        for o in &mut self.obstacles {
            o.x *= x_ratio;
            o.speed *= ratio;
        }
        for p in &mut self.pickups {
            p.x *= x_ratio;
            p.speed *= ratio;
        }
        if let Some(f) = &mut self.finish_line {
            f.x *= x_ratio;
        }
        log::debug!(
            "Resized to {}x{} (unit {:.3})",
            self.layout.design_width,
            self.layout.design_height,
            self.layout.unit
        );
    }

    /// UI opened the install panel: freeze everything underneath
    pub fn open_cta_panel(&mut self) {
        if self.machine.open_panel() {
            self.clear_entities();
            self.sync_phase();
            self.events.push(GameEvent::PanelOpened);
        }
    }

    /// UI closed the install panel: resume the shadowed phase
    pub fn close_cta_panel(&mut self) {
        if self.machine.close_panel() {
            self.sync_phase();
            self.events.push(GameEvent::PanelClosed);
        }
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read-only views ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.machine.current()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn finish_line(&self) -> Option<&FinishLine> {
        self.finish_line.as_ref()
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn intro_gate(&self) -> &IntroGate {
        &self.gate
    }

    pub fn lane_ys(&self) -> &[f32] {
        &self.lane_ys
    }

    pub fn lane_index(&self) -> usize {
        self.lane_index
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn finish_distance(&self) -> f32 {
        self.finish_distance
    }

    /// Run progress toward the finish threshold in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.finish_distance <= 0.0 {
            return 0.0;
        }
        crate::saturate(self.distance / self.finish_distance)
    }

    pub fn landing_safety_timer(&self) -> f32 {
        self.landing_safety_timer
    }

    pub fn tutorial_shown(&self) -> bool {
        self.tutorial_shown
    }

    pub fn player_rect(&self) -> Rect {
        self.player.bounds(self.tuning.player_size * self.layout.unit)
    }

    pub fn obstacle_rect(&self, o: &Obstacle) -> Rect {
        obstacle_rect(o, &self.lane_ys, &self.tuning, self.layout.unit)
    }

    pub fn pickup_rect(&self, p: &Pickup) -> Rect {
        pickup_rect(p, &self.lane_ys, &self.tuning, self.layout.unit)
    }

    /// Foot position of an obstacle
    pub fn obstacle_pos(&self, o: &Obstacle) -> Vec2 {
        Vec2::new(o.x, lane_y(&self.lane_ys, o.lane) + o.drop * self.layout.unit)
    }

    /// Anchor position of a coin including its bob
    pub fn pickup_pos(&self, p: &Pickup) -> Vec2 {
        pickup_pos(p, &self.lane_ys, self.layout.unit)
    }

    /// Finish line foot position (on the player's lane line)
    pub fn finish_pos(&self) -> Option<Vec2> {
        self.finish_line
            .as_ref()
            .map(|f| Vec2::new(f.x, self.player.baseline))
    }

    // === Phase changes ===

    fn enter(&mut self, next: Phase) -> bool {
        let moved = self.machine.transition(next);
        self.sync_phase();
        moved
    }

    fn sync_phase(&mut self) {
        self.state.phase = self.machine.current();
    }

    fn start_run(&mut self) {
        if !self.enter(Phase::Playing) {
            return;
        }
        self.speed = self.base_speed;
        self.distance = 0.0;
        self.clear_entities();
        self.finish_line = None;
        self.gate.reroll(&mut self.rng, &self.tuning);
        self.tutorial_shown = false;
        self.tutorial_obstacle = None;
        let ctx = spawn_ctx(
            &self.tuning,
            &self.layout,
            self.speed,
            self.max_speed,
            self.lane_ys.len(),
        );
        self.spawner.arm_for_run(&mut self.rng, &ctx);
        self.landing_safety_timer = 0.0;
        self.player.reset();
        log::info!("Run started at speed {:.1}", self.speed);
        self.events.push(GameEvent::RunStarted);
    }

    fn enter_tutorial(&mut self, obstacle: EntityId) {
        if !self.enter(Phase::Tutorial) {
            return;
        }
        self.tutorial_shown = true;
        self.tutorial_obstacle = Some(obstacle);
        self.events.push(GameEvent::TutorialEntered { obstacle });
    }

    fn exit_tutorial(&mut self) {
        if !self.enter(Phase::Playing) {
            return;
        }
        if let Some(id) = self.tutorial_obstacle.take() {
            let park_x = self.player.x - TUTORIAL_PARK * self.layout.unit;
            if let Some(o) = self.obstacles.iter_mut().find(|o| o.id == id) {
                o.hit = true;
                o.x = park_x;
            }
        }
        let ctx = spawn_ctx(
            &self.tuning,
            &self.layout,
            self.speed,
            self.max_speed,
            self.lane_ys.len(),
        );
        self.spawner.rearm_after_tutorial(&mut self.rng, &ctx);
        self.landing_safety_timer = self.tuning.tutorial_landing_safety;
        self.events.push(GameEvent::TutorialExited);
    }

    fn trigger_fail(&mut self) {
        if !self.enter(Phase::Fail) {
            return;
        }
        self.state.fail_badge_timer = self.tuning.fail_badge_delay;
        self.state.pay_amount =
            self.roll_pay(self.tuning.fail_pay_base, self.tuning.fail_pay_spread);
        self.clear_entities();
        self.finish_line = None;
        log::info!(
            "Run failed at {:.0} distance, payout {}",
            self.distance,
            self.state.pay_amount
        );
        self.events.push(GameEvent::RunFailed {
            payout: self.state.pay_amount,
        });
    }

    fn trigger_success(&mut self) {
        if !self.enter(Phase::Success) {
            return;
        }
        self.state.pay_amount =
            self.roll_pay(self.tuning.success_pay_base, self.tuning.success_pay_spread);
        self.start_countdown();
        self.clear_entities();
        self.finish_line = None;
        log::info!(
            "Run finished with {} money, payout {}",
            self.state.money,
            self.state.pay_amount
        );
        self.events.push(GameEvent::RunSucceeded {
            payout: self.state.pay_amount,
        });
    }

    fn reset(&mut self) {
        if !self.enter(Phase::Start) {
            return;
        }
        self.state = GameState::default();
        self.sync_phase();
        self.speed = 0.0;
        self.distance = 0.0;
        self.spawner.clear();
        self.gate.reroll(&mut self.rng, &self.tuning);
        self.tutorial_shown = false;
        self.tutorial_obstacle = None;
        self.clear_entities();
        self.finish_line = None;
        self.player.reset();
        self.player.idle();
        self.landing_safety_timer = 0.0;
        self.countdown_timer = 0.0;
        self.events.push(GameEvent::Reset);
    }

    fn start_countdown(&mut self) {
        self.state.countdown = COUNTDOWN_START;
        self.countdown_timer = 1.0;
    }

    fn roll_pay(&mut self, base: u32, spread: u32) -> u32 {
        base + self.rng.index(spread as usize) as u32
    }

    // === Per-frame steps ===

    fn update_timers(&mut self, dt: f32) {
        self.state.toast_timer = (self.state.toast_timer - dt).max(0.0);
        self.state.damage_timer = (self.state.damage_timer - dt).max(0.0);

        let mut entered_cta = false;
        if self.state.fail_badge_timer > 0.0 {
            self.state.fail_badge_timer = (self.state.fail_badge_timer - dt).max(0.0);
            if self.state.fail_badge_timer == 0.0
                && self.phase() == Phase::Fail
                && self.enter(Phase::Cta)
            {
                self.start_countdown();
                self.events.push(GameEvent::CtaShown);
                entered_cta = true;
            }
        }

        // The countdown starts on the frame after the call-to-action shows
        if !entered_cta && self.phase().counts_down() {
            self.countdown_timer -= dt;
            if self.countdown_timer <= 0.0 {
                self.state.countdown = self.state.countdown.saturating_sub(1);
                self.countdown_timer = 1.0;
            }
        }

        self.landing_safety_timer = (self.landing_safety_timer - dt).max(0.0);
    }

    fn update_parallax(&mut self, dt: f32) {
        if self.phase() == Phase::Playing {
            self.parallax.scroll(self.speed * dt);
        }
    }

    fn run_cadences(&mut self, dt: f32) {
        let ctx = spawn_ctx(
            &self.tuning,
            &self.layout,
            self.speed,
            self.max_speed,
            self.lane_ys.len(),
        );

        if self.gate.unlocked() {
            self.spawner.enemy_timer -= dt;
            if self.spawner.enemy_timer <= 0.0 {
                let enemy = self.spawner.spawn_enemy(&mut self.rng, &ctx, &mut self.ids);
                log::debug!("Enemy {:?} in lane {}", enemy.id, enemy.lane);
                self.obstacles.push(enemy);
                self.spawner.schedule_enemy(&mut self.rng, &ctx);
            }
        }

        self.spawner.warning_timer -= dt;
        if self.spawner.warning_timer <= 0.0 {
            if self.landing_safety_timer <= 0.0 && !self.player.airborne {
                let warning = self.spawner.spawn_warning(&mut self.rng, &ctx, &mut self.ids);
                log::debug!("Warning {:?} in lane {}", warning.id, warning.lane);
                self.obstacles.push(warning);
                self.spawner.schedule_warning(&mut self.rng, &ctx);
            } else {
                self.spawner.warning_timer = self.landing_safety_timer + self.rng.range(0.2, 0.4);
            }
        }

        self.spawner.money_timer -= dt;
        if self.spawner.money_timer <= 0.0 {
            let coins = self.spawner.spawn_money(&mut self.rng, &ctx, &mut self.ids);
            log::debug!("{} coin(s) spawned", coins.len());
            self.pickups.extend(coins);
        }
    }

    fn update_obstacles(&mut self, dt: f32) {
        let unit = self.layout.unit;
        let player_box = self.player_rect();

        let mut i = 0;
        while i < self.obstacles.len() {
            if let Some(id) = self.tutorial_candidate(&self.obstacles[i]) {
                self.enter_tutorial(id);
                return;
            }

            let o = &mut self.obstacles[i];
            if o.animated {
                o.anim_time += dt;
            }
            o.x -= o.speed * dt;

            let o = &self.obstacles[i];
            if !o.hit
                && self.phase() == Phase::Playing
                && rects_overlap(
                    player_box,
                    obstacle_rect(o, &self.lane_ys, &self.tuning, unit),
                    o.kind.overlap(),
                )
                && self.handle_hit(i)
            {
                return;
            }
            i += 1;
        }

        let cull_x = CULL_X * unit;
        let mut dodged = 0;
        self.obstacles.retain(|o| {
            if o.x < cull_x {
                if o.kind == ObstacleKind::Warning && !o.hit {
                    dodged += 1;
                }
                return false;
            }
            true
        });
        for _ in 0..dodged {
            self.events.push(GameEvent::WarningDodged);
            if self.gate.note_warning_dodged() {
                self.on_enemy_unlocked();
            }
        }
    }

    fn tutorial_candidate(&self, o: &Obstacle) -> Option<EntityId> {
        if self.tutorial_shown || self.phase() != Phase::Playing || o.kind != ObstacleKind::Enemy {
            return None;
        }
        let ahead = o.x - self.player.x;
        let min = self.tuning.tutorial_min_distance * self.layout.unit;
        let max = self.tuning.tutorial_max_distance * self.layout.unit;
        (ahead > min && ahead < max).then_some(o.id)
    }

    /// Resolve a hit on obstacle `index`. Returns `true` if the run ended.
    fn handle_hit(&mut self, index: usize) -> bool {
        let o = &mut self.obstacles[index];
        o.hit = true;
        let (id, kind) = (o.id, o.kind);

        self.state.damage_timer = self.tuning.damage_flash;
        self.state.lives = self.state.lives.saturating_sub(1);
        log::debug!("Hit by {:?}, {} lives left", kind, self.state.lives);
        self.events.push(GameEvent::ObstacleHit {
            id,
            kind,
            lives: self.state.lives,
        });

        if self.state.lives == 0 {
            self.trigger_fail();
            return true;
        }
        false
    }

    fn update_pickups(&mut self, dt: f32) {
        let unit = self.layout.unit;
        let player_box = self.player_rect();
        let cull_x = CULL_X * unit;
        let time = self.clock;
        let lane_ys = &self.lane_ys;
        let tuning = &self.tuning;

        let mut collected = Vec::new();
        self.pickups.retain_mut(|p| {
            p.x -= p.speed * dt;
            p.bob += (time * 3.0 + p.phase).sin() * 21.0 * dt;
            if rects_overlap(player_box, pickup_rect(p, lane_ys, tuning, unit), PICKUP_OVERLAP) {
                collected.push(p.value);
                return false;
            }
            p.x >= cull_x
        });

        for value in collected {
            self.collect_money(value);
        }
    }

    fn collect_money(&mut self, value: u32) {
        self.state.money += value;
        self.events.push(GameEvent::MoneyCollected {
            value,
            total: self.state.money,
        });
        if self.gate.note_money(value) {
            self.on_enemy_unlocked();
        }
        self.state.toast_text.clone_from(&self.tuning.toast_text);
        self.state.toast_timer = self.tuning.toast_duration;
    }

    fn on_enemy_unlocked(&mut self) {
        self.spawner.arm_first_enemy(&mut self.rng);
        self.events.push(GameEvent::EnemyUnlocked);
    }

    fn update_finish_line(&mut self, dt: f32) {
        if let Some(f) = &mut self.finish_line {
            f.x -= self.speed * dt;
        }
    }

    fn spawn_finish_line(&mut self) {
        let x = self.layout.design_width + 200.0 * self.layout.unit;
        self.finish_line = Some(FinishLine {
            id: self.ids.next_id(),
            x,
        });
        log::info!("Finish line spawned at distance {:.0}", self.distance);
        self.events.push(GameEvent::FinishLineSpawned);
    }

    fn jump(&mut self) {
        let launch_speed = self.motion_params().launch_speed;
        if !self.player.jump(launch_speed) {
            return;
        }
        self.landing_safety_timer = self.landing_safety_timer.max(self.tuning.landing_safety);
        self.spawner
            .defer_warning(self.landing_safety_timer + JUMP_WARNING_MARGIN);
        self.events.push(GameEvent::Jumped);
    }

    fn clear_entities(&mut self) {
        self.obstacles.clear();
        self.pickups.clear();
        self.tutorial_obstacle = None;
    }

    // === Layout ===

    fn player_x(&self) -> f32 {
        self.layout.design_width * self.tuning.player_x_ratio
    }

    fn motion_params(&self) -> MotionParams {
        let unit = self.layout.unit;
        MotionParams {
            launch_speed: self.tuning.jump_velocity * unit,
            gravity: self.tuning.gravity * unit,
            ease_rate: self.tuning.ground_ease_rate,
        }
    }

    /// Re-derive lanes, pacing and decorations from the current layout
    fn apply_layout(&mut self) {
        let unit = self.layout.unit;
        let ground = self.layout.ground_y();
        self.lane_ys = (0..self.tuning.lane_count)
            .map(|i| ground - i as f32 * self.tuning.lane_spacing * unit)
            .collect();
        self.lane_index = self.lane_index.min(self.lane_ys.len() - 1);

        self.base_speed = self.tuning.base_speed * unit;
        self.max_speed = self.tuning.max_speed * unit;
        self.accel = self.tuning.accel * unit;
        self.finish_distance = self.tuning.finish_distance * unit;

        self.parallax = Parallax::build(
            self.layout.design_width,
            self.layout.design_height,
            unit,
        );
    }
}
