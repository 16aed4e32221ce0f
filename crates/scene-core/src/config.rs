//! Scene configuration loading.
//!
//! The whole scene (narration cues, spawn templates, step tuning) is
//! described by a TOML file. Missing sections fall back to the built-in
//! scene so a bare `[tuning]` override is enough to experiment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use thiserror::Error;

use crate::math::Vec2;
use crate::ports::{AudioHandle, TemplateHandle};

/// One narration cue: a unique name and the clip it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationEntry {
    pub name: String,
    pub clip: AudioHandle,
}

/// One spawnable object: a unique name and its template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnableEntry {
    pub name: String,
    pub template: TemplateHandle,
}

/// Complete scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Narration cues, keyed by unique name
    #[serde(default = "default_narration_entries", rename = "narration")]
    pub narration_entries: Vec<NarrationEntry>,
    /// Spawnable objects, keyed by unique name
    #[serde(default = "default_spawnable_entries", rename = "spawnable")]
    pub spawnable_entries: Vec<SpawnableEntry>,
    /// Step tuning values
    #[serde(default)]
    pub tuning: Tuning,
    /// Vaultable obstacle settings
    #[serde(default)]
    pub vaultable: VaultableConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            narration_entries: default_narration_entries(),
            spawnable_entries: default_spawnable_entries(),
            tuning: Tuning::default(),
            vaultable: VaultableConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Step tuning values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Intro trigger threshold. Compared as-is against the squared distance
    /// from the player's start position, so the value is in squared units.
    pub intro_trigger_distance: f32,
    /// Ceiling in seconds before the bells step advances on its own
    pub bells_timeout: f32,
    /// Where the void object appears, relative to the player
    pub bells_void_offset: Vec2,
    /// Minimum per-axis offset magnitude for the violin spawn
    pub violin_offset_min: f32,
    /// Maximum per-axis offset magnitude for the violin spawn
    pub violin_offset_max: f32,
    /// How many vaultables the run step lines up
    pub run_vaultable_count: usize,
    /// Spacing between consecutive vaultables
    pub run_vaultable_spacing: f32,
    /// Distance from the player to the first vaultable
    pub run_first_vaultable_offset: f32,
    /// Seed for scene randomness; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            intro_trigger_distance: 64.0,
            bells_timeout: 25.0,
            bells_void_offset: Vec2::new(12.0, 0.0),
            violin_offset_min: 2.0,
            violin_offset_max: 5.0,
            run_vaultable_count: 16,
            run_vaultable_spacing: 8.0,
            run_first_vaultable_offset: 12.0,
            seed: None,
        }
    }
}

/// Vaultable obstacle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultableConfig {
    /// Seconds of continued contact tolerated before rightward movement is
    /// revoked
    pub grace_window: f32,
    /// Greeting clips; each obstacle picks one at random when it appears
    pub clips: Vec<AudioHandle>,
}

impl Default for VaultableConfig {
    fn default() -> Self {
        Self {
            grace_window: 2.0,
            clips: vec![
                AudioHandle("audio/fx/vault_hum_1.ogg".to_string()),
                AudioHandle("audio/fx/vault_hum_2.ogg".to_string()),
                AudioHandle("audio/fx/vault_hum_3.ogg".to_string()),
            ],
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn default_narration_entries() -> Vec<NarrationEntry> {
    [
        ("entry", "audio/narration/entry.ogg"),
        ("intro", "audio/narration/intro.ogg"),
        ("okay_stop", "audio/narration/okay_stop.ogg"),
        ("choose_sound", "audio/narration/choose_sound.ogg"),
        ("bell", "audio/narration/bell.ogg"),
        ("hum", "audio/narration/hum.ogg"),
        ("post_choice", "audio/narration/post_choice.ogg"),
        ("run_go_now", "audio/narration/run_go_now.ogg"),
        ("violin", "audio/narration/violin.ogg"),
        ("outro", "audio/narration/outro.ogg"),
    ]
    .into_iter()
    .map(|(name, clip)| NarrationEntry {
        name: name.to_string(),
        clip: AudioHandle(clip.to_string()),
    })
    .collect()
}

fn default_spawnable_entries() -> Vec<SpawnableEntry> {
    [
        ("sound_choice", "prefabs/sound_choice"),
        ("void", "prefabs/void"),
        ("violin", "prefabs/violin"),
        ("vaultable", "prefabs/vaultable"),
    ]
    .into_iter()
    .map(|(name, template)| SpawnableEntry {
        name: name.to_string(),
        template: TemplateHandle(template.to_string()),
    })
    .collect()
}

/// Generates the built-in scene as a TOML string.
pub fn default_scene_toml() -> String {
    r#"# Narrated scene configuration

[[narration]]
name = "entry"
clip = "audio/narration/entry.ogg"

[[narration]]
name = "intro"
clip = "audio/narration/intro.ogg"

[[narration]]
name = "okay_stop"
clip = "audio/narration/okay_stop.ogg"

[[narration]]
name = "choose_sound"
clip = "audio/narration/choose_sound.ogg"

[[narration]]
name = "bell"
clip = "audio/narration/bell.ogg"

[[narration]]
name = "hum"
clip = "audio/narration/hum.ogg"

[[narration]]
name = "post_choice"
clip = "audio/narration/post_choice.ogg"

[[narration]]
name = "run_go_now"
clip = "audio/narration/run_go_now.ogg"

[[narration]]
name = "violin"
clip = "audio/narration/violin.ogg"

[[narration]]
name = "outro"
clip = "audio/narration/outro.ogg"

[[spawnable]]
name = "sound_choice"
template = "prefabs/sound_choice"

[[spawnable]]
name = "void"
template = "prefabs/void"

[[spawnable]]
name = "violin"
template = "prefabs/violin"

[[spawnable]]
name = "vaultable"
template = "prefabs/vaultable"

[tuning]
# Compared as-is against squared distance; the value is in squared units.
intro_trigger_distance = 64.0
bells_timeout = 25.0
bells_void_offset = { x = 12.0, y = 0.0 }
violin_offset_min = 2.0
violin_offset_max = 5.0
run_vaultable_count = 16
run_vaultable_spacing = 8.0
run_first_vaultable_offset = 12.0

[vaultable]
grace_window = 2.0
clips = [
    "audio/fx/vault_hum_1.ogg",
    "audio/fx/vault_hum_2.ogg",
    "audio/fx/vault_hum_3.ogg",
]
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_full_cast() {
        let config = SceneConfig::default();

        assert_eq!(config.narration_entries.len(), 10);
        assert_eq!(config.spawnable_entries.len(), 4);
        assert_eq!(config.tuning.intro_trigger_distance, 64.0);
        assert_eq!(config.tuning.bells_timeout, 25.0);
        assert_eq!(config.vaultable.grace_window, 2.0);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml = r#"
            [tuning]
            bells_timeout = 10.0
        "#;

        let config = SceneConfig::from_str(toml).unwrap();

        // Specified value
        assert_eq!(config.tuning.bells_timeout, 10.0);
        // Default values
        assert_eq!(config.tuning.run_vaultable_count, 16);
        assert_eq!(config.narration_entries.len(), 10);
    }

    #[test]
    fn parse_custom_entries() {
        let toml = r#"
            [[narration]]
            name = "entry"
            clip = "custom/entry.ogg"

            [[spawnable]]
            name = "crate"
            template = "prefabs/crate"
        "#;

        let config = SceneConfig::from_str(toml).unwrap();

        assert_eq!(config.narration_entries.len(), 1);
        assert_eq!(config.narration_entries[0].clip.0, "custom/entry.ogg");
        assert_eq!(config.spawnable_entries[0].name, "crate");
    }

    #[test]
    fn default_scene_toml_parses_to_defaults() {
        let config = SceneConfig::from_str(&default_scene_toml()).unwrap();
        let defaults = SceneConfig::default();

        assert_eq!(config.narration_entries, defaults.narration_entries);
        assert_eq!(config.spawnable_entries, defaults.spawnable_entries);
        assert_eq!(
            config.tuning.bells_void_offset,
            defaults.tuning.bells_void_offset
        );
        assert_eq!(config.vaultable.clips, defaults.vaultable.clips);
    }

    #[test]
    fn seed_defaults_to_entropy() {
        let config = SceneConfig::default();
        assert!(config.tuning.seed.is_none());

        let toml = r#"
            [tuning]
            seed = 7
        "#;
        let config = SceneConfig::from_str(toml).unwrap();
        assert_eq!(config.tuning.seed, Some(7));
    }
}
