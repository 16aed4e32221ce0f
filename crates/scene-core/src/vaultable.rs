//! Vaultable obstacle behavior.
//!
//! Each vaultable is an independent little state machine: idle until the
//! player makes contact, then a grace window runs; if contact persists past
//! the window the obstacle revokes rightward movement until the player vaults.
//! It talks to the rest of the scene only through the event bus and the
//! capability gate, never through the director.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use scene_events::{EventListener, SubscriptionId, EVENT_VAULT, EVENT_VAULT_SUCCESS};

use crate::ports::{AudioHandle, ObjectId};
use crate::scene::Scene;

#[derive(Debug)]
pub struct Vaultable {
    object_id: ObjectId,
    grace_window: f32,
    grace_remaining: f32,
    in_contact: bool,
    blocking: bool,
    done: bool,
    subscription: Option<SubscriptionId>,
}

impl Vaultable {
    /// Attaches vaulting behavior to a spawned object.
    ///
    /// Plays a randomly chosen greeting clip and subscribes the behavior to
    /// the scene bus. The returned handle stays valid until the obstacle is
    /// vaulted, at which point it unsubscribes and despawns itself.
    pub fn activate(
        scene: &mut Scene,
        object_id: ObjectId,
        grace_window: f32,
        clips: &[AudioHandle],
    ) -> Rc<RefCell<Vaultable>> {
        if !clips.is_empty() {
            let clip = clips[scene.rng.gen_range(0..clips.len())].clone();
            scene.play_effect(&clip);
        }

        let vaultable = Rc::new(RefCell::new(Vaultable {
            object_id,
            grace_window,
            grace_remaining: 0.0,
            in_contact: false,
            blocking: false,
            done: false,
            subscription: None,
        }));
        let subscription = scene.subscribe(vaultable.clone());
        vaultable.borrow_mut().subscription = Some(subscription);
        vaultable
    }

    /// Called by the collision layer when the player enters the trigger.
    pub fn contact_enter(&mut self) {
        self.in_contact = true;
        if !self.done && !self.blocking {
            self.grace_remaining = self.grace_window;
        }
    }

    /// Called by the collision layer when the player leaves the trigger.
    ///
    /// Leaving before the grace window elapses cancels the pending revoke.
    pub fn contact_exit(&mut self) {
        self.in_contact = false;
        if !self.blocking {
            self.grace_remaining = 0.0;
        }
    }

    /// Per-tick update: runs the grace window while contact persists.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        if self.done || self.grace_remaining <= 0.0 {
            return;
        }

        self.grace_remaining -= dt;
        if self.grace_remaining <= 0.0 && self.in_contact {
            self.blocking = true;
            scene.player.gate.allow_right = false;
            tracing::debug!("object {} now blocks rightward movement", self.object_id.0);
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn in_contact(&self) -> bool {
        self.in_contact
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// True once the obstacle has been vaulted and removed itself.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl EventListener<Scene> for Vaultable {
    fn on_event(&mut self, name: &str, scene: &mut Scene) {
        if self.done || name != EVENT_VAULT || !self.in_contact {
            return;
        }

        scene.player.gate.allow_right = true;
        // Drop our own subscription before re-emitting so the success event
        // does not come back to a listener cell that is currently borrowed.
        if let Some(subscription) = self.subscription.take() {
            scene.unsubscribe(subscription);
        }
        scene.emit(EVENT_VAULT_SUCCESS);
        scene.despawn(self.object_id);
        self.blocking = false;
        self.done = true;
        tracing::debug!("object {} vaulted", self.object_id.0);
    }
}
