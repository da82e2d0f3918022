//! Skeletal pose types and the armature capability the animation controller
//! drives.
//!
//! An armature owns two pose buffers: `main`, which is what gets committed for
//! skinning, and `blend`, a scratch pose that a second clip writes into so it
//! can be mixed back into `main`. Clips are opaque handles created by the
//! armature and attached to one of the two buffers.

use glam::{Mat4, Quat, Vec3};

/// Local transform of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl JointPose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Interpolate toward `other`; `t = 0` keeps `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &JointPose, t: f32) -> JointPose {
        JointPose {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t).normalize(),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for JointPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub joints: Vec<JointPose>,
}

impl Pose {
    pub fn new(joint_count: usize) -> Self {
        Self {
            joints: vec![JointPose::IDENTITY; joint_count],
        }
    }

    /// Mix `other` into `self` by `ratio`. Joints missing on either side are
    /// left untouched.
    pub fn blend_from(&mut self, other: &Pose, ratio: f32) {
        for (joint, target) in self.joints.iter_mut().zip(&other.joints) {
            *joint = joint.lerp(target, ratio);
        }
    }
}

/// Which of the armature's two pose buffers a clip writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseBuffer {
    Main,
    Blend,
}

/// Playback controls on a clip handle.
pub trait ClipPlayback {
    fn time(&self) -> f32;
    fn set_time(&mut self, time: f32);
    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
}

/// Skeleton with main/blend pose buffers plus the clip sampling and blending
/// operations over them.
pub trait Armature {
    type Clip: ClipPlayback;

    /// Create a clip handle for the named animation.
    fn create_clip(&self, name: &str) -> Result<Self::Clip, String>;

    /// Bind `clip` so that advancing it writes into `buffer`.
    fn attach(&mut self, clip: &mut Self::Clip, buffer: PoseBuffer);

    /// Advance `clip` by `dt` seconds (scaled by its speed) and sample it into
    /// its attached buffer. Unattached clips only advance their time.
    fn advance(&mut self, clip: &mut Self::Clip, dt: f32);

    /// `main = blend(main, blend, ratio)`.
    fn blend_main(&mut self, ratio: f32);

    /// Publish the main buffer for skinning.
    fn commit(&mut self);
}
