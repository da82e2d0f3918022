//! Locomotion-driven animation blending for an actor.
//!
//! Two track sets are created per actor. The main set drives the main pose
//! buffer directly; the blend set only contributes its running clip, sampled
//! into the blend buffer and mixed back into main when the actor is crossing
//! the idle/running boundary. The blend weight follows horizontal speed
//! rather than elapsed transition time: `ratio = clamp(speed / 320, 0, 1)`.
//!
//! `previous`/`current` remember the last two ground states seen. Airborne
//! states (jump, falling) play the falling clip and leave both tags alone, so
//! landing resumes whichever ground blend was in progress.

use berry_core::skeleton::{Armature, ClipPlayback, PoseBuffer};
use berry_core::sync::SyncPoint;

use crate::actor::LocomotionState;

/// Horizontal speed at which the running pose is fully blended in.
pub const BLEND_FULL_SPEED: f32 = 320.0;

pub const CLIP_BREATHING_IDLE: &str = "breathing-idle";
pub const CLIP_RUNNING: &str = "running-left";
pub const CLIP_JUMP: &str = "jump-left";
pub const CLIP_FALLING: &str = "falling-idle-left";
pub const CLIP_LAND: &str = "land-left";

/// Speed-derived blend weight, always in [0, 1]. Non-finite speeds map to 0.
pub fn blending_ratio(horizontal_speed: f32) -> f32 {
    // f32::max/min discard NaN, f32::clamp would propagate it.
    (horizontal_speed / BLEND_FULL_SPEED).max(0.0).min(1.0)
}

/// One clip handle per locomotion animation.
pub struct AnimationSet<C> {
    pub breathing_idle: C,
    pub running: C,
    // Jump plays the falling clip; take-off and landing are loaded but unplayed.
    #[allow(dead_code)]
    pub jump: C,
    pub falling: C,
    #[allow(dead_code)]
    pub land: C,
}

impl<C: ClipPlayback> AnimationSet<C> {
    pub fn create<A: Armature<Clip = C>>(armature: &A) -> Result<Self, String> {
        Ok(Self {
            breathing_idle: armature.create_clip(CLIP_BREATHING_IDLE)?,
            running: armature.create_clip(CLIP_RUNNING)?,
            jump: armature.create_clip(CLIP_JUMP)?,
            falling: armature.create_clip(CLIP_FALLING)?,
            land: armature.create_clip(CLIP_LAND)?,
        })
    }
}

pub struct ActorAnimation<C> {
    pub previous: LocomotionState,
    pub current: LocomotionState,
    pub blending_ratio: f32,
    pub main: AnimationSet<C>,
    pub blend: AnimationSet<C>,
}

impl<C: ClipPlayback> ActorAnimation<C> {
    /// Create both track sets and bind them to the armature's pose buffers.
    pub fn new<A: Armature<Clip = C>>(armature: &mut A) -> Result<Self, String> {
        let mut main = AnimationSet::create(armature)?;
        let mut blend = AnimationSet::create(armature)?;

        armature.attach(&mut main.breathing_idle, PoseBuffer::Main);
        armature.attach(&mut main.running, PoseBuffer::Main);
        armature.attach(&mut main.falling, PoseBuffer::Main);

        armature.attach(&mut blend.running, PoseBuffer::Blend);

        Ok(Self {
            previous: LocomotionState::StandIdle,
            current: LocomotionState::StandIdle,
            blending_ratio: 0.0,
            main,
            blend,
        })
    }

    fn touches(&self, state: LocomotionState) -> bool {
        self.previous == state || self.current == state
    }

    fn set_stand_idle<A: Armature<Clip = C>>(
        &mut self,
        armature: &mut A,
        horizontal_speed: f32,
        frame_time: f32,
    ) {
        if self.touches(LocomotionState::Running) {
            self.blending_ratio = blending_ratio(horizontal_speed);

            armature.advance(&mut self.main.breathing_idle, frame_time);
            armature.advance(&mut self.blend.running, frame_time);
            armature.blend_main(self.blending_ratio);
        } else {
            self.blending_ratio = 0.0;
            armature.advance(&mut self.main.breathing_idle, frame_time);
        }
    }

    fn set_running<A: Armature<Clip = C>>(
        &mut self,
        armature: &mut A,
        horizontal_speed: f32,
        frame_time: f32,
    ) {
        if self.touches(LocomotionState::StandIdle) {
            self.blending_ratio = blending_ratio(horizontal_speed);
            // Start the run cycle from its first frame on the frame running begins.
            if self.current == LocomotionState::StandIdle {
                self.blend.running.set_time(0.0);
            }

            armature.advance(&mut self.main.breathing_idle, frame_time);

            self.blend.running.set_speed(self.blending_ratio);
            armature.advance(&mut self.blend.running, frame_time);

            armature.blend_main(self.blending_ratio);
        } else {
            // Pure running reports a full blend rather than keeping the last ratio.
            self.blending_ratio = 1.0;
            armature.advance(&mut self.main.running, frame_time);
        }
    }

    fn set_jump<A: Armature<Clip = C>>(&mut self, armature: &mut A, frame_time: f32) {
        armature.advance(&mut self.main.falling, frame_time);
    }

    fn shift_to(&mut self, state: LocomotionState) {
        if self.current != state {
            log::debug!("Animation tags {:?} -> {:?}", self.current, state);
            self.previous = self.current;
            self.current = state;
        }
    }

    /// Advance and blend the tracks for this frame's locomotion state, then
    /// commit the main pose (after waiting on `sync` when given).
    pub fn update<A: Armature<Clip = C>>(
        &mut self,
        state: LocomotionState,
        horizontal_speed: f32,
        armature: &mut A,
        frame_time: f32,
        sync: Option<&dyn SyncPoint>,
    ) {
        match state {
            LocomotionState::StandIdle => {
                self.set_stand_idle(armature, horizontal_speed, frame_time);
                self.shift_to(LocomotionState::StandIdle);
            }
            LocomotionState::Running => {
                self.set_running(armature, horizontal_speed, frame_time);
                self.shift_to(LocomotionState::Running);
            }
            LocomotionState::Jump | LocomotionState::Falling => {
                self.set_jump(armature, frame_time);
            }
        }

        if let Some(sync) = sync {
            sync.wait();
        }
        armature.commit();
    }
}
