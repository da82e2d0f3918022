//! Keyframe animation clips and the JSON animation library format.
//!
//! A library groups the named clips of one rigged model. Each clip holds one
//! keyframe track per animated joint; key times are in seconds. The clip's
//! duration is the latest key time across all its tracks.
//!
//! Joint transforms in the JSON are optional per key and default to identity,
//! so a track animating only rotation stays short.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::skeleton::{ClipPlayback, JointPose, Pose, PoseBuffer};

#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    pub time: f32,
    pub pose: JointPose,
}

#[derive(Debug, Clone)]
pub struct JointTrack {
    pub joint: usize,
    pub keys: Vec<Keyframe>,
}

impl JointTrack {
    fn sample(&self, time: f32) -> JointPose {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return JointPose::IDENTITY,
        };
        if !time.is_finite() || time <= first.time {
            return first.pose;
        }
        if time >= last.time {
            return last.pose;
        }
        // Keys are sorted by validation; find the segment containing `time`.
        let next = self.keys.partition_point(|k| k.time <= time);
        let a = &self.keys[next - 1];
        let b = &self.keys[next];
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        a.pose.lerp(&b.pose, t)
    }
}

#[derive(Debug, Clone)]
pub struct KeyframeClip {
    pub name: String,
    pub duration: f32,
    pub looping: bool,
    pub tracks: Vec<JointTrack>,
}

impl KeyframeClip {
    /// Write the pose at `time` into every joint this clip animates.
    pub fn sample_into(&self, time: f32, pose: &mut Pose) {
        for track in &self.tracks {
            if let Some(joint) = pose.joints.get_mut(track.joint) {
                *joint = track.sample(time);
            }
        }
    }
}

/// All clips for one rig, keyed by clip name.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    pub library_id: String,
    pub joint_count: usize,
    pub clips: HashMap<String, Arc<KeyframeClip>>,
}

impl AnimationLibrary {
    pub fn clip(&self, name: &str) -> Option<&Arc<KeyframeClip>> {
        self.clips.get(name)
    }
}

/// Runtime playback state for one clip handle.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    pub clip: Arc<KeyframeClip>,
    pub time: f32,
    pub speed: f32,
    pub target: Option<PoseBuffer>,
}

impl ClipPlayer {
    pub fn new(clip: Arc<KeyframeClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            speed: 1.0,
            target: None,
        }
    }

    /// Advance playback time by `dt * speed`. Looping clips wrap, others hold
    /// at either end.
    pub fn advance(&mut self, dt: f32) {
        let duration = self.clip.duration;
        self.time += dt * self.speed;
        if !self.time.is_finite() || duration <= 0.0 {
            self.time = 0.0;
        } else if self.clip.looping {
            self.time = self.time.rem_euclid(duration);
        } else {
            self.time = self.time.clamp(0.0, duration);
        }
    }
}

impl ClipPlayback for ClipPlayer {
    fn time(&self) -> f32 {
        self.time
    }

    fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct AnimationLibraryJson {
    version: String,
    library_id: String,
    joint_count: usize,
    clips: HashMap<String, KeyframeClipJson>,
}

#[derive(Debug, Deserialize)]
struct KeyframeClipJson {
    #[serde(default = "default_looping")]
    looping: bool,
    tracks: Vec<JointTrackJson>,
}

#[derive(Debug, Deserialize)]
struct JointTrackJson {
    joint: usize,
    keys: Vec<KeyframeJson>,
}

#[derive(Debug, Deserialize)]
struct KeyframeJson {
    time: f32,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

impl KeyframeJson {
    fn to_keyframe(&self) -> Keyframe {
        Keyframe {
            time: self.time,
            pose: JointPose {
                translation: self.translation.map_or(Vec3::ZERO, Vec3::from_array),
                rotation: self
                    .rotation
                    .map_or(Quat::IDENTITY, |q| Quat::from_array(q).normalize()),
                scale: self.scale.map_or(Vec3::ONE, Vec3::from_array),
            },
        }
    }
}

/// Load an animation library from disk.
pub fn load_animation_library(path: &Path) -> Result<AnimationLibrary, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animation library {}: {e}", path.display()))?;
    parse_animation_library(&raw)
        .map_err(|e| format!("Animation library {}: {e}", path.display()))
}

/// Parse an animation library from a JSON string.
pub fn parse_animation_library(raw: &str) -> Result<AnimationLibrary, String> {
    let json: AnimationLibraryJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse JSON: {e}"))?;
    validate_library_json(&json)?;

    let mut clips = HashMap::new();
    for (name, clip_json) in json.clips {
        let tracks: Vec<JointTrack> = clip_json
            .tracks
            .iter()
            .map(|t| JointTrack {
                joint: t.joint,
                keys: t.keys.iter().map(KeyframeJson::to_keyframe).collect(),
            })
            .collect();
        let duration = tracks
            .iter()
            .filter_map(|t| t.keys.last())
            .map(|k| k.time)
            .fold(0.0_f32, f32::max);
        clips.insert(
            name.clone(),
            Arc::new(KeyframeClip {
                name,
                duration,
                looping: clip_json.looping,
                tracks,
            }),
        );
    }

    Ok(AnimationLibrary {
        library_id: json.library_id,
        joint_count: json.joint_count,
        clips,
    })
}

fn validate_library_json(json: &AnimationLibraryJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Animation validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.library_id.is_empty() {
        return Err("Animation validation failed: library_id is empty".to_string());
    }
    if json.joint_count == 0 {
        return Err("Animation validation failed: joint_count must be > 0".to_string());
    }
    for (name, clip) in &json.clips {
        if clip.tracks.is_empty() {
            return Err(format!(
                "Animation validation failed: clip '{}' has no tracks",
                name
            ));
        }
        for track in &clip.tracks {
            if track.joint >= json.joint_count {
                return Err(format!(
                    "Animation validation failed: clip '{}' animates joint {} but the rig has {} joints",
                    name, track.joint, json.joint_count
                ));
            }
            if track.keys.is_empty() {
                return Err(format!(
                    "Animation validation failed: clip '{}' joint {} has no keys",
                    name, track.joint
                ));
            }
            let mut last_time = f32::NEG_INFINITY;
            for key in &track.keys {
                if !key.time.is_finite() || key.time < 0.0 {
                    return Err(format!(
                        "Animation validation failed: clip '{}' joint {} has invalid key time {}",
                        name, track.joint, key.time
                    ));
                }
                if key.time <= last_time {
                    return Err(format!(
                        "Animation validation failed: clip '{}' joint {} keys are not strictly increasing",
                        name, track.joint
                    ));
                }
                last_time = key.time;
            }
        }
    }
    Ok(())
}

const fn default_looping() -> bool {
    true
}
