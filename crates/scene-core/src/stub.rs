//! Stub ports for tests and headless runs.
//!
//! These keep enough history to assert against: the narration stub records
//! every clip it was asked to play, and the spawner keeps both the alive set
//! and the full spawn log.

use std::cell::RefCell;
use std::rc::Rc;

use crate::math::Vec2;
use crate::ports::{AudioHandle, EffectPlayer, NarrationPlayer, ObjectId, Spawner, TemplateHandle};

/// Narration player that "plays" every clip for a fixed number of seconds.
///
/// Time does not pass on its own; the driver calls [`StubNarration::advance`]
/// once per tick, mirroring how the engine-side audio source would progress.
#[derive(Debug)]
pub struct StubNarration {
    clip_seconds: f32,
    remaining: f32,
    played: Vec<AudioHandle>,
}

impl StubNarration {
    pub fn new(clip_seconds: f32) -> Self {
        Self {
            clip_seconds,
            remaining: 0.0,
            played: Vec::new(),
        }
    }

    /// Creates a stub wrapped for shared use with a [`crate::Scene`].
    pub fn shared(clip_seconds: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(clip_seconds)))
    }

    /// Advances playback by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Every clip played so far, oldest first.
    pub fn played(&self) -> &[AudioHandle] {
        &self.played
    }

    pub fn play_count(&self) -> usize {
        self.played.len()
    }
}

impl NarrationPlayer for StubNarration {
    fn play(&mut self, clip: &AudioHandle) {
        self.played.push(clip.clone());
        // One-shot overlay: a new clip extends playback, it never cuts the
        // previous clip short.
        self.remaining = self.remaining.max(self.clip_seconds);
    }

    fn is_playing(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Effect player that only records what it was asked to play.
#[derive(Debug, Default)]
pub struct StubEffects {
    played: Vec<AudioHandle>,
}

impl StubEffects {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn played(&self) -> &[AudioHandle] {
        &self.played
    }
}

impl EffectPlayer for StubEffects {
    fn play(&mut self, clip: &AudioHandle) {
        self.played.push(clip.clone());
    }
}

/// A record of one instantiation.
#[derive(Debug, Clone)]
pub struct SpawnedObject {
    pub id: ObjectId,
    pub template: TemplateHandle,
    pub position: Vec2,
    pub rotation: f32,
}

/// Spawner that tracks live objects and the full spawn history.
#[derive(Debug, Default)]
pub struct StubSpawner {
    next_id: u64,
    alive: Vec<SpawnedObject>,
    history: Vec<SpawnedObject>,
}

impl StubSpawner {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.alive.iter().any(|object| object.id == id)
    }

    /// Objects not yet destroyed, in spawn order.
    pub fn alive(&self) -> &[SpawnedObject] {
        &self.alive
    }

    /// Everything ever spawned, including destroyed objects.
    pub fn history(&self) -> &[SpawnedObject] {
        &self.history
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }
}

impl Spawner for StubSpawner {
    fn instantiate(
        &mut self,
        template: &TemplateHandle,
        position: Vec2,
        rotation: f32,
    ) -> ObjectId {
        self.next_id += 1;
        let object = SpawnedObject {
            id: ObjectId(self.next_id),
            template: template.clone(),
            position,
            rotation,
        };
        self.alive.push(object.clone());
        self.history.push(object);
        ObjectId(self.next_id)
    }

    fn destroy(&mut self, id: ObjectId) {
        self.alive.retain(|object| object.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_counts_down_and_overlays() {
        let mut narration = StubNarration::new(2.0);
        assert!(!narration.is_playing());

        narration.play(&AudioHandle("a.ogg".to_string()));
        assert!(narration.is_playing());

        narration.advance(1.5);
        // Overlaying a second clip resets the countdown without losing the log.
        narration.play(&AudioHandle("b.ogg".to_string()));
        narration.advance(1.5);
        assert!(narration.is_playing());

        narration.advance(1.0);
        assert!(!narration.is_playing());
        assert_eq!(narration.play_count(), 2);
    }

    #[test]
    fn spawner_tracks_alive_and_history() {
        let mut spawner = StubSpawner::default();
        let template = TemplateHandle("prefabs/void".to_string());

        let first = spawner.instantiate(&template, Vec2::ZERO, 0.0);
        let second = spawner.instantiate(&template, Vec2::new(1.0, 0.0), 0.0);
        assert_eq!(spawner.alive_count(), 2);

        spawner.destroy(first);
        assert!(!spawner.is_alive(first));
        assert!(spawner.is_alive(second));
        assert_eq!(spawner.history().len(), 2);

        // Destroying again is a no-op.
        spawner.destroy(first);
        assert_eq!(spawner.alive_count(), 1);
    }
}
