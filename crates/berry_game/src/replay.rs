//! Scripted pad input for headless runs.
//!
//! A replay is a list of pad frames, each held for `repeat` frames. The main
//! loop feeds the expanded snapshots through the same pause and actor update
//! path that live input would take.

use berry_core::input::{PadButton, PadSnapshot};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    #[serde(default)]
    pub camera_yaw: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub stick_x: f32,
    #[serde(default)]
    pub stick_y: f32,
    #[serde(default)]
    pub buttons: Vec<PadButton>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<PadSnapshot> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let snapshot = PadSnapshot::with_buttons(
                &frame.buttons,
                (
                    frame.stick_x.clamp(-1.0, 1.0),
                    frame.stick_y.clamp(-1.0, 1.0),
                ),
            );
            for _ in 0..frame.repeat.max(1) {
                out.push(snapshot.clone());
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be finite and > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
