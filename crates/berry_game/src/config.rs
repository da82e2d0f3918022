use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::actor::ActorConfig;

/// Top-level game settings. Every field has a default so a partial (or
/// missing) config file still yields a runnable game.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Host directory that `rom:/` asset paths are mapped onto.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "default_animation_library")]
    pub animation_library: PathBuf,
    #[serde(default = "default_replay")]
    pub replay: PathBuf,
    #[serde(default = "default_intro_seconds")]
    pub intro_seconds: f32,
    #[serde(default)]
    pub actor: ActorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            animation_library: default_animation_library(),
            replay: default_replay(),
            intro_seconds: default_intro_seconds(),
            actor: ActorConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path`, falling back to defaults when the file does not exist.
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config file '{}' not found, using defaults.",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config(path)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if !config.intro_seconds.is_finite() || config.intro_seconds < 0.0 {
        return Err("Config validation failed: intro_seconds must be >= 0".to_string());
    }
    let actor = &config.actor;
    if !(actor.max_speed > 0.0) {
        return Err("Config validation failed: actor.max_speed must be > 0".to_string());
    }
    if !(actor.gravity < 0.0) {
        return Err("Config validation failed: actor.gravity must be < 0".to_string());
    }
    if !(0.0..1.0).contains(&actor.stick_deadzone) {
        return Err("Config validation failed: actor.stick_deadzone must be in [0, 1)".to_string());
    }
    Ok(())
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_animation_library() -> PathBuf {
    PathBuf::from(crate::ANIMATION_LIBRARY_PATH)
}

fn default_replay() -> PathBuf {
    PathBuf::from(crate::REPLAY_PATH)
}

const fn default_intro_seconds() -> f32 {
    2.0
}
