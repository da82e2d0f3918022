//! CPU implementation of [`Armature`] over an [`AnimationLibrary`].
//!
//! Clips sample straight into the pose buffer they are attached to. `commit`
//! converts the main buffer to joint matrices, which is what a skinning pass
//! would read.

use std::sync::Arc;

use glam::Mat4;

use crate::clip::{AnimationLibrary, ClipPlayer};
use crate::skeleton::{Armature, Pose, PoseBuffer};

pub struct SkinnedArmature {
    library: Arc<AnimationLibrary>,
    pub main: Pose,
    pub blend: Pose,
    joint_matrices: Vec<Mat4>,
    commit_count: u64,
}

impl SkinnedArmature {
    pub fn new(library: Arc<AnimationLibrary>) -> Self {
        let joint_count = library.joint_count;
        log::debug!(
            "Armature bound to library '{}' ({} joints, {} clips)",
            library.library_id,
            joint_count,
            library.clips.len()
        );
        Self {
            library,
            main: Pose::new(joint_count),
            blend: Pose::new(joint_count),
            joint_matrices: vec![Mat4::IDENTITY; joint_count],
            commit_count: 0,
        }
    }

    /// Joint matrices from the most recent commit.
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    fn buffer_mut(&mut self, buffer: PoseBuffer) -> &mut Pose {
        match buffer {
            PoseBuffer::Main => &mut self.main,
            PoseBuffer::Blend => &mut self.blend,
        }
    }
}

impl Armature for SkinnedArmature {
    type Clip = ClipPlayer;

    fn create_clip(&self, name: &str) -> Result<ClipPlayer, String> {
        self.library
            .clip(name)
            .map(|clip| ClipPlayer::new(Arc::clone(clip)))
            .ok_or_else(|| {
                format!(
                    "Animation library '{}' has no clip named '{}'",
                    self.library.library_id, name
                )
            })
    }

    fn attach(&mut self, clip: &mut ClipPlayer, buffer: PoseBuffer) {
        clip.target = Some(buffer);
    }

    fn advance(&mut self, clip: &mut ClipPlayer, dt: f32) {
        clip.advance(dt);
        if let Some(buffer) = clip.target {
            let time = clip.time;
            clip.clip.sample_into(time, self.buffer_mut(buffer));
        }
    }

    fn blend_main(&mut self, ratio: f32) {
        let Self { main, blend, .. } = self;
        main.blend_from(blend, ratio);
    }

    fn commit(&mut self) {
        self.joint_matrices.clear();
        self.joint_matrices
            .extend(self.main.joints.iter().map(|joint| joint.to_matrix()));
        self.commit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::parse_animation_library;
    use crate::skeleton::ClipPlayback;
    use glam::Vec3;

    fn library() -> Arc<AnimationLibrary> {
        let json = r#"
        {
          "version": "0.1",
          "library_id": "hero",
          "joint_count": 1,
          "clips": {
            "idle": { "tracks": [ { "joint": 0, "keys": [
              { "time": 0.0, "translation": [0.0, 0.0, 0.0] },
              { "time": 1.0, "translation": [0.0, 0.0, 0.0] } ] } ] },
            "run": { "tracks": [ { "joint": 0, "keys": [
              { "time": 0.0, "translation": [8.0, 0.0, 0.0] },
              { "time": 1.0, "translation": [8.0, 0.0, 0.0] } ] } ] }
          }
        }
        "#;
        Arc::new(parse_animation_library(json).expect("library should parse"))
    }

    #[test]
    fn create_clip_reports_missing_names() {
        let armature = SkinnedArmature::new(library());
        assert!(armature.create_clip("idle").is_ok());
        let err = armature
            .create_clip("moonwalk")
            .expect_err("unknown clip should fail");
        assert!(err.contains("no clip named 'moonwalk'"));
    }

    #[test]
    fn unattached_clip_only_advances_time() {
        let mut armature = SkinnedArmature::new(library());
        let mut run = armature.create_clip("run").expect("run clip");
        armature.advance(&mut run, 0.25);
        assert!((run.time() - 0.25).abs() < 1e-6);
        assert_eq!(armature.main, Pose::new(1));
    }

    #[test]
    fn attached_clips_write_their_buffer_and_blend() {
        let mut armature = SkinnedArmature::new(library());
        let mut idle = armature.create_clip("idle").expect("idle clip");
        let mut run = armature.create_clip("run").expect("run clip");
        armature.attach(&mut idle, PoseBuffer::Main);
        armature.attach(&mut run, PoseBuffer::Blend);

        armature.advance(&mut idle, 0.1);
        armature.advance(&mut run, 0.1);
        assert!((armature.blend.joints[0].translation.x - 8.0).abs() < 1e-5);

        armature.blend_main(0.25);
        assert!((armature.main.joints[0].translation.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn commit_publishes_main_as_matrices() {
        let mut armature = SkinnedArmature::new(library());
        armature.main.joints[0].translation = Vec3::new(1.0, 2.0, 3.0);
        armature.commit();
        assert_eq!(armature.commit_count(), 1);
        let translation = armature.joint_matrices()[0].w_axis.truncate();
        assert!(translation.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }
}
