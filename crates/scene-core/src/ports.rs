//! Collaborator interfaces consumed by the scene.
//!
//! The engine side (audio playback, object instantiation) lives behind these
//! traits. The blanket `Rc<RefCell<T>>` impls let a caller install a port and
//! keep a handle to it, which is how the stubs are driven in tests and in the
//! walkthrough binary.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Opaque handle to an audio clip asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioHandle(pub String);

/// Opaque handle to a spawn template asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateHandle(pub String);

/// Identifier of a live scene object, issued by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Plays narration cues. One-shot semantics: a new `play` overlays any clip
/// already playing rather than stopping it, and `is_playing` reports whether
/// any narration audio is still audible.
pub trait NarrationPlayer {
    fn play(&mut self, clip: &AudioHandle);
    fn is_playing(&self) -> bool;
}

/// Plays fire-and-forget sound effects (vaultable greetings and the like).
pub trait EffectPlayer {
    fn play(&mut self, clip: &AudioHandle);
}

/// Instantiates and destroys scene objects from templates.
pub trait Spawner {
    fn instantiate(&mut self, template: &TemplateHandle, position: Vec2, rotation: f32)
        -> ObjectId;

    /// Removes a live object. No-op if the id is already gone.
    fn destroy(&mut self, id: ObjectId);
}

impl<T: NarrationPlayer> NarrationPlayer for Rc<RefCell<T>> {
    fn play(&mut self, clip: &AudioHandle) {
        self.borrow_mut().play(clip);
    }

    fn is_playing(&self) -> bool {
        self.borrow().is_playing()
    }
}

impl<T: EffectPlayer> EffectPlayer for Rc<RefCell<T>> {
    fn play(&mut self, clip: &AudioHandle) {
        self.borrow_mut().play(clip);
    }
}

impl<T: Spawner> Spawner for Rc<RefCell<T>> {
    fn instantiate(
        &mut self,
        template: &TemplateHandle,
        position: Vec2,
        rotation: f32,
    ) -> ObjectId {
        self.borrow_mut().instantiate(template, position, rotation)
    }

    fn destroy(&mut self, id: ObjectId) {
        self.borrow_mut().destroy(id);
    }
}
