//! Scene state and collaborator contracts for the narrated walkthrough.
//!
//! This crate holds everything the director orchestrates but does not own
//! itself: the player's capability gate, the narration and spawn catalogs,
//! the scene configuration, the ports to the engine (audio, spawning), and
//! the vaultable obstacle behavior.

pub mod catalog;
pub mod config;
pub mod math;
pub mod player;
pub mod ports;
pub mod scene;
pub mod stub;
pub mod vaultable;

// Re-export catalog types
pub use catalog::{Catalog, CatalogKind, SceneError};

// Re-export config types
pub use config::{
    default_scene_toml, ConfigError, NarrationEntry, SceneConfig, SpawnableEntry, Tuning,
    VaultableConfig,
};

// Re-export math types
pub use math::Vec2;

// Re-export player types
pub use player::{CapabilityGate, Player};

// Re-export port types
pub use ports::{AudioHandle, EffectPlayer, NarrationPlayer, ObjectId, Spawner, TemplateHandle};

// Re-export scene types
pub use scene::Scene;

// Re-export stub implementations
pub use stub::{SpawnedObject, StubEffects, StubNarration, StubSpawner};

// Re-export vaultable behavior
pub use vaultable::Vaultable;
