//! Shared event channel for the narrated scene.
//!
//! This crate contains the publish/subscribe primitive used for decoupled
//! signaling between the director, its steps, and scene objects. It has no
//! knowledge of the scene itself; the context type handed to listeners is
//! generic.

pub mod bus;
pub mod latch;

// Re-export bus types
pub use bus::{EventBus, EventListener, ListenerHandle, SubscriptionId};

// Re-export latch types
pub use latch::EventLatch;

/// Event emitted by a player action to clear a blocking obstacle.
pub const EVENT_VAULT: &str = "vault";

/// Event emitted by an obstacle once it has been cleared.
pub const EVENT_VAULT_SUCCESS: &str = "vault_success";
