//! The shared scene context.
//!
//! One `Scene` value is threaded through every director step, event handler,
//! and scene object. It owns the player state, the catalogs, the event bus
//! handle, the scene rng, and the engine ports.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use scene_events::{EventBus, ListenerHandle, SubscriptionId};

use crate::catalog::{Catalog, CatalogKind, SceneError};
use crate::config::SceneConfig;
use crate::math::Vec2;
use crate::player::Player;
use crate::ports::{AudioHandle, EffectPlayer, NarrationPlayer, ObjectId, Spawner, TemplateHandle};

pub struct Scene {
    pub player: Player,
    pub bus: EventBus<Scene>,
    pub rng: SmallRng,
    narrations: Catalog<AudioHandle>,
    spawnables: Catalog<TemplateHandle>,
    narration: Box<dyn NarrationPlayer>,
    effects: Box<dyn EffectPlayer>,
    spawner: Box<dyn Spawner>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("player", &self.player)
            .field("narrations", &self.narrations)
            .field("spawnables", &self.spawnables)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Builds the scene from configuration and engine ports.
    ///
    /// Fails with [`SceneError::DuplicateKey`] if two narration or spawnable
    /// entries share a name; this is a content error and aborts startup.
    pub fn from_config(
        config: &SceneConfig,
        narration: impl NarrationPlayer + 'static,
        effects: impl EffectPlayer + 'static,
        spawner: impl Spawner + 'static,
    ) -> Result<Self, SceneError> {
        let narrations = Catalog::build(
            CatalogKind::Narration,
            config
                .narration_entries
                .iter()
                .map(|entry| (entry.name.clone(), entry.clip.clone())),
        )?;
        let spawnables = Catalog::build(
            CatalogKind::Spawnable,
            config
                .spawnable_entries
                .iter()
                .map(|entry| (entry.name.clone(), entry.template.clone())),
        )?;

        let rng = match config.tuning.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(Self {
            player: Player::default(),
            bus: EventBus::new(),
            rng,
            narrations,
            spawnables,
            narration: Box::new(narration),
            effects: Box::new(effects),
            spawner: Box::new(spawner),
        })
    }

    /// Starts the named narration cue, overlaying anything already playing.
    pub fn play_narration(&mut self, name: &str) -> Result<(), SceneError> {
        let clip = self.narrations.get(name)?.clone();
        tracing::debug!("playing narration '{}' ({})", name, clip.0);
        self.narration.play(&clip);
        Ok(())
    }

    /// True iff no narration audio is currently playing.
    pub fn narration_finished(&self) -> bool {
        !self.narration.is_playing()
    }

    /// Plays a fire-and-forget effect clip.
    pub fn play_effect(&mut self, clip: &AudioHandle) {
        self.effects.play(clip);
    }

    /// Looks up a spawn template by name.
    pub fn spawn_template(&self, name: &str) -> Result<&TemplateHandle, SceneError> {
        self.spawnables.get(name)
    }

    /// Instantiates the named template at a position.
    pub fn spawn(&mut self, name: &str, position: Vec2, rotation: f32) -> Result<ObjectId, SceneError> {
        let template = self.spawnables.get(name)?.clone();
        let id = self.spawner.instantiate(&template, position, rotation);
        tracing::debug!(
            "spawned '{}' as object {} at ({:.2}, {:.2})",
            name,
            id.0,
            position.x,
            position.y
        );
        Ok(id)
    }

    /// Removes a spawned object. No-op if it is already gone.
    pub fn despawn(&mut self, id: ObjectId) {
        tracing::debug!("despawning object {}", id.0);
        self.spawner.destroy(id);
    }

    /// Emits an event to every current bus listener, handing each handler
    /// mutable access to this scene.
    pub fn emit(&mut self, name: &str) {
        tracing::debug!("emitting event '{}'", name);
        let bus = self.bus.clone();
        bus.emit(name, self);
    }

    /// Registers a listener on the scene bus.
    pub fn subscribe(&self, listener: ListenerHandle<Scene>) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    /// Removes a bus subscription. No-op if not present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NarrationEntry, SceneConfig};
    use crate::stub::{StubEffects, StubNarration, StubSpawner};
    use scene_events::EventLatch;

    fn test_scene() -> Scene {
        Scene::from_config(
            &SceneConfig::default(),
            StubNarration::new(1.0),
            StubEffects::default(),
            StubSpawner::default(),
        )
        .unwrap()
    }

    #[test]
    fn duplicate_narration_name_fails_construction() {
        let mut config = SceneConfig::default();
        config.narration_entries.push(NarrationEntry {
            name: "entry".to_string(),
            clip: AudioHandle("again.ogg".to_string()),
        });

        let result = Scene::from_config(
            &config,
            StubNarration::new(1.0),
            StubEffects::default(),
            StubSpawner::default(),
        );

        assert!(matches!(
            result.unwrap_err(),
            SceneError::DuplicateKey {
                kind: CatalogKind::Narration,
                ..
            }
        ));
    }

    #[test]
    fn unknown_narration_name_is_fatal() {
        let mut scene = test_scene();
        let err = scene.play_narration("never_recorded").unwrap_err();
        assert!(matches!(err, SceneError::UnknownKey { .. }));
    }

    #[test]
    fn narration_playback_toggles_finished() {
        let narration = StubNarration::shared(1.0);
        let mut scene = Scene::from_config(
            &SceneConfig::default(),
            narration.clone(),
            StubEffects::default(),
            StubSpawner::default(),
        )
        .unwrap();

        assert!(scene.narration_finished());
        scene.play_narration("entry").unwrap();
        assert!(!scene.narration_finished());

        narration.borrow_mut().advance(1.0);
        assert!(scene.narration_finished());
    }

    #[test]
    fn spawn_and_despawn_round_trip() {
        let spawner = StubSpawner::shared();
        let mut scene = Scene::from_config(
            &SceneConfig::default(),
            StubNarration::new(1.0),
            StubEffects::default(),
            spawner.clone(),
        )
        .unwrap();

        let id = scene.spawn("void", Vec2::new(3.0, 0.0), 0.0).unwrap();
        assert!(spawner.borrow().is_alive(id));

        scene.despawn(id);
        assert!(!spawner.borrow().is_alive(id));

        assert!(scene.spawn("missing", Vec2::ZERO, 0.0).is_err());
    }

    #[test]
    fn emit_reaches_subscribed_latch() {
        let mut scene = test_scene();
        let latch = EventLatch::shared();
        scene.subscribe(latch.clone());

        scene.emit("bell");

        assert_eq!(latch.borrow_mut().pop().as_deref(), Some("bell"));
    }

    #[test]
    fn seeded_scenes_draw_identical_randomness() {
        use rand::Rng;

        let mut config = SceneConfig::default();
        config.tuning.seed = Some(99);

        let draw = |config: &SceneConfig| -> Vec<f32> {
            let mut scene = Scene::from_config(
                config,
                StubNarration::new(1.0),
                StubEffects::default(),
                StubSpawner::default(),
            )
            .unwrap();
            (0..4).map(|_| scene.rng.gen_range(0.0..1.0)).collect()
        };

        assert_eq!(draw(&config), draw(&config));
    }
}
