//! Presentation adapter
//!
//! Owns every renderable handle and keeps them in step with the world. The
//! simulation never sees a handle; `Scene::sync` reads the world's public
//! accessors, creates handles for new entity ids, destroys handles for ids
//! that are gone and places the rest.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::error::SceneError;
use crate::sim::{
    Anchor, CoinVariant, EntityId, ObstacleKind, ParallaxKind, PlayerAnim, RandomSource, World,
};

/// Peak alpha of the red damage flash
const DAMAGE_ALPHA_MAX: f32 = 0.85;
/// Damage flash alpha per second of damage timer left
const DAMAGE_ALPHA_RATE: f32 = 2.4;

/// Every texture the runner draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKey {
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerDamage,
    DamageOverlay,
    Enemy,
    Warning,
    Money1,
    Money2,
    FinishLine,
    Trees1,
    Trees2,
    Streetlight,
}

impl TextureKey {
    pub const ALL: [TextureKey; 13] = [
        TextureKey::PlayerIdle,
        TextureKey::PlayerRun,
        TextureKey::PlayerJump,
        TextureKey::PlayerDamage,
        TextureKey::DamageOverlay,
        TextureKey::Enemy,
        TextureKey::Warning,
        TextureKey::Money1,
        TextureKey::Money2,
        TextureKey::FinishLine,
        TextureKey::Trees1,
        TextureKey::Trees2,
        TextureKey::Streetlight,
    ];

    /// Frames in the sheet
    pub fn frame_count(self) -> u32 {
        match self {
            TextureKey::PlayerIdle => 2,
            TextureKey::PlayerRun => 6,
            TextureKey::PlayerJump => 3,
            TextureKey::Enemy => 10,
            _ => 1,
        }
    }

    /// Playback rate for looping sheets (frames per second)
    fn fps(self) -> f32 {
        match self {
            TextureKey::PlayerIdle => 4.8,
            TextureKey::PlayerRun => 9.0,
            TextureKey::Enemy => 7.2,
            _ => 0.0,
        }
    }

    /// Looping frame for an animation clock
    pub fn looped_frame(self, time: f32) -> u32 {
        (time.max(0.0) * self.fps()) as u32 % self.frame_count()
    }
}

/// Where and how to draw one handle this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// Footprint in design pixels
    pub size: Vec2,
    /// Texture scale relative to its native size
    pub scale: f32,
    pub anchor: Anchor,
    pub frame: u32,
    pub alpha: f32,
    pub visible: bool,
}

impl Placement {
    fn at(pos: Vec2, size: Vec2, scale: f32, anchor: Anchor) -> Self {
        Self {
            pos,
            size,
            scale,
            anchor,
            frame: 0,
            alpha: 1.0,
            visible: true,
        }
    }

    fn hidden() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            scale: 1.0,
            anchor: Anchor::BottomCenter,
            frame: 0,
            alpha: 0.0,
            visible: false,
        }
    }
}

/// The host renderer, seen through opaque handles
pub trait SpriteFactory {
    type Handle;

    fn has_texture(&self, key: TextureKey) -> bool;
    fn create(&mut self, key: TextureKey) -> Result<Self::Handle, SceneError>;
    fn place(&mut self, handle: &mut Self::Handle, placement: &Placement);
    fn destroy(&mut self, handle: Self::Handle);
}

/// Player sheets, one handle each; only the active pose is visible
const PLAYER_SHEETS: [TextureKey; 4] = [
    TextureKey::PlayerIdle,
    TextureKey::PlayerRun,
    TextureKey::PlayerJump,
    TextureKey::PlayerDamage,
];

/// Handle owner for one world
pub struct Scene<F: SpriteFactory> {
    factory: F,
    player: Vec<(TextureKey, F::Handle)>,
    damage_overlay: F::Handle,
    parallax: Vec<F::Handle>,
    /// Strip lengths the parallax handles were built for
    parallax_shape: Vec<usize>,
    entities: BTreeMap<EntityId, F::Handle>,
}

impl<F: SpriteFactory> Scene<F> {
    /// Verify every texture and create the fixed handles
    pub fn new<R: RandomSource>(mut factory: F, world: &World<R>) -> Result<Self, SceneError> {
        if let Some(key) = TextureKey::ALL
            .into_iter()
            .find(|key| !factory.has_texture(*key))
        {
            return Err(SceneError::MissingTexture(key));
        }

        let mut player = Vec::with_capacity(PLAYER_SHEETS.len());
        for key in PLAYER_SHEETS {
            player.push((key, factory.create(key)?));
        }
        let damage_overlay = factory.create(TextureKey::DamageOverlay)?;

        let mut scene = Self {
            factory,
            player,
            damage_overlay,
            parallax: Vec::new(),
            parallax_shape: Vec::new(),
            entities: BTreeMap::new(),
        };
        scene.rebuild_parallax(world)?;
        log::debug!("Scene ready with {} fixed handles", scene.fixed_handle_count());
        Ok(scene)
    }

    /// Bring every handle in line with the world
    pub fn sync<R: RandomSource>(&mut self, world: &World<R>) -> Result<(), SceneError> {
        let shape: Vec<usize> = world.parallax().strips.iter().map(|s| s.xs.len()).collect();
        if shape != self.parallax_shape {
            self.rebuild_parallax(world)?;
        }

        let live = collect_entities(world);

        let gone: Vec<EntityId> = self
            .entities
            .keys()
            .filter(|id| !live.contains_key(*id))
            .copied()
            .collect();
        for id in gone {
            if let Some(handle) = self.entities.remove(&id) {
                self.factory.destroy(handle);
            }
        }

        for (id, (key, placement)) in &live {
            if !self.entities.contains_key(id) {
                let handle = self.factory.create(*key)?;
                self.entities.insert(*id, handle);
            }
            if let Some(handle) = self.entities.get_mut(id) {
                self.factory.place(handle, placement);
            }
        }

        self.place_player(world);
        self.place_parallax(world);
        Ok(())
    }

    /// Handles for live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Player sheets, damage overlay and parallax items
    pub fn fixed_handle_count(&self) -> usize {
        self.player.len() + 1 + self.parallax.len()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Destroy every handle and give the factory back
    pub fn into_factory(mut self) -> F {
        for (_, handle) in std::mem::take(&mut self.entities) {
            self.factory.destroy(handle);
        }
        for handle in std::mem::take(&mut self.parallax) {
            self.factory.destroy(handle);
        }
        for (_, handle) in std::mem::take(&mut self.player) {
            self.factory.destroy(handle);
        }
        self.factory.destroy(self.damage_overlay);
        self.factory
    }

    fn rebuild_parallax<R: RandomSource>(&mut self, world: &World<R>) -> Result<(), SceneError> {
        for handle in self.parallax.drain(..) {
            self.factory.destroy(handle);
        }
        self.parallax_shape.clear();
        for strip in &world.parallax().strips {
            for i in 0..strip.xs.len() {
                let key = match strip.kind {
                    ParallaxKind::Trees if i % 2 == 0 => TextureKey::Trees1,
                    ParallaxKind::Trees => TextureKey::Trees2,
                    ParallaxKind::Lamps => TextureKey::Streetlight,
                };
                self.parallax.push(self.factory.create(key)?);
            }
            self.parallax_shape.push(strip.xs.len());
        }
        Ok(())
    }

    fn place_player<R: RandomSource>(&mut self, world: &World<R>) {
        let player = world.player();
        let unit = world.layout().unit;
        let size = world.tuning().player_size * unit;

        let (active, frame) = match player.anim() {
            PlayerAnim::Idle => (
                TextureKey::PlayerIdle,
                TextureKey::PlayerIdle.looped_frame(player.anim_time()),
            ),
            PlayerAnim::Run => (
                TextureKey::PlayerRun,
                TextureKey::PlayerRun.looped_frame(player.anim_time()),
            ),
            PlayerAnim::Jump { frame } => (TextureKey::PlayerJump, u32::from(frame)),
            PlayerAnim::Damage => (TextureKey::PlayerDamage, 0),
        };

        for (key, handle) in &mut self.player {
            let placement = if *key == active {
                Placement {
                    frame,
                    ..Placement::at(player.pos(), size, unit, Anchor::BottomCenter)
                }
            } else {
                Placement::hidden()
            };
            self.factory.place(handle, &placement);
        }

        let damage = world.state().damage_timer;
        let overlay = if damage > 0.0 {
            Placement {
                alpha: (damage * DAMAGE_ALPHA_RATE).min(DAMAGE_ALPHA_MAX),
                ..Placement::at(player.pos(), size, unit, Anchor::BottomCenter)
            }
        } else {
            Placement::hidden()
        };
        self.factory.place(&mut self.damage_overlay, &overlay);
    }

    fn place_parallax<R: RandomSource>(&mut self, world: &World<R>) {
        let items = world
            .parallax()
            .strips
            .iter()
            .flat_map(|strip| strip.xs.iter().map(move |x| (strip, *x)));
        for (handle, (strip, x)) in self.parallax.iter_mut().zip(items) {
            let placement = Placement::at(
                Vec2::new(x, strip.y),
                Vec2::splat(strip.item_width),
                strip.scale,
                Anchor::BottomCenter,
            );
            self.factory.place(handle, &placement);
        }
    }
}

/// Texture and placement for every live entity, in id order
fn collect_entities<R: RandomSource>(
    world: &World<R>,
) -> BTreeMap<EntityId, (TextureKey, Placement)> {
    let unit = world.layout().unit;
    let tuning = world.tuning();
    let mut live = BTreeMap::new();

    for o in world.obstacles() {
        let (key, frame) = match o.kind {
            ObstacleKind::Enemy => (TextureKey::Enemy, TextureKey::Enemy.looped_frame(o.anim_time)),
            ObstacleKind::Warning => (TextureKey::Warning, 0),
        };
        let size = world.obstacle_rect(o).size();
        let placement = Placement {
            frame,
            ..Placement::at(world.obstacle_pos(o), size, unit, Anchor::BottomCenter)
        };
        live.insert(o.id, (key, placement));
    }

    for p in world.pickups() {
        let key = match p.variant {
            CoinVariant::Common => TextureKey::Money1,
            CoinVariant::Rare => TextureKey::Money2,
        };
        let placement = Placement::at(world.pickup_pos(p), tuning.coin_size * unit, unit, p.anchor);
        live.insert(p.id, (key, placement));
    }

    if let (Some(finish), Some(pos)) = (world.finish_line(), world.finish_pos()) {
        let placement = Placement::at(pos, tuning.finish_size * unit, unit, Anchor::BottomCenter);
        live.insert(finish.id, (TextureKey::FinishLine, placement));
    }

    live
}
