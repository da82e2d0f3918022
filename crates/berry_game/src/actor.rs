use glam::{Vec2, Vec3};
use serde::Deserialize;

use berry_core::input::{PadButton, PadState};
use berry_core::skeleton::Armature;
use berry_core::sync::SyncPoint;

use crate::actor_animation::ActorAnimation;

/// Discrete locomotion state, recomputed from motion every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    #[default]
    StandIdle,
    Running,
    Jump,
    Falling,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActorInput {
    /// Stick deflection, each axis in [-1, 1]. +y pushes away from the camera.
    pub stick: Vec2,
    pub jump_pressed: bool,
}

impl ActorInput {
    pub fn from_pad(pad: &PadState) -> Self {
        Self {
            stick: Vec2::new(pad.stick.0, pad.stick.1),
            jump_pressed: pad.is_just_pressed(PadButton::A),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub max_speed: f32,
    pub accel_ground: f32,
    pub accel_air: f32,
    pub friction_ground: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
    pub stick_deadzone: f32,
    pub idle_speed_threshold: f32,
    pub floor_height: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            max_speed: 420.0,
            accel_ground: 1400.0,
            accel_air: 700.0,
            friction_ground: 1800.0,
            gravity: -2400.0,
            max_fall_speed: -1200.0,
            jump_speed: 760.0,
            stick_deadzone: 0.12,
            idle_speed_threshold: 1.0,
            floor_height: 0.0,
        }
    }
}

pub struct Actor<A: Armature> {
    pub state: LocomotionState,
    pub position: Vec3,
    /// Facing angle around +Y, radians.
    pub yaw: f32,
    pub horizontal_speed: f32,
    pub vertical_speed: f32,
    pub grounded: bool,
    pub config: ActorConfig,
    pub armature: A,
    pub animation: ActorAnimation<A::Clip>,
}

impl<A: Armature> Actor<A> {
    pub fn new(mut armature: A, config: ActorConfig) -> Result<Self, String> {
        let animation = ActorAnimation::new(&mut armature)?;
        Ok(Self {
            state: LocomotionState::StandIdle,
            position: Vec3::new(0.0, config.floor_height, 0.0),
            yaw: 0.0,
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            // Spawned standing on the floor; no landing contact is generated
            // for the first frame.
            grounded: true,
            config,
            armature,
            animation,
        })
    }

    /// Turn stick input into facing and a target horizontal speed relative to
    /// the camera, and start a jump when A is pressed on the ground.
    pub fn set_control_data(&mut self, input: &ActorInput, frame_time: f32, camera_yaw: f32) {
        let magnitude = input.stick.length().min(1.0);
        let accel = if self.grounded {
            self.config.accel_ground
        } else {
            self.config.accel_air
        };

        if magnitude > self.config.stick_deadzone {
            let direction = Vec2::from_angle(camera_yaw).rotate(input.stick);
            self.yaw = direction.x.atan2(direction.y);
            let target = magnitude * self.config.max_speed;
            self.horizontal_speed = move_towards(self.horizontal_speed, target, accel * frame_time);
        } else if self.grounded {
            self.horizontal_speed = move_towards(
                self.horizontal_speed,
                0.0,
                self.config.friction_ground * frame_time,
            );
        }

        if input.jump_pressed && self.grounded {
            self.vertical_speed = self.config.jump_speed;
            self.grounded = false;
        }
    }

    pub fn set_state(&mut self) {
        let next = if !self.grounded {
            if self.vertical_speed > 0.0 {
                LocomotionState::Jump
            } else {
                LocomotionState::Falling
            }
        } else if self.horizontal_speed > self.config.idle_speed_threshold {
            LocomotionState::Running
        } else {
            LocomotionState::StandIdle
        };
        if next != self.state {
            log::debug!("Actor state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    pub fn set_animation(&mut self, frame_time: f32, sync: Option<&dyn SyncPoint>) {
        let Self {
            state,
            horizontal_speed,
            armature,
            animation,
            ..
        } = self;
        animation.update(*state, *horizontal_speed, armature, frame_time, sync);
    }

    pub fn set_motion(&mut self, frame_time: f32) {
        if !self.grounded {
            self.vertical_speed = (self.vertical_speed + self.config.gravity * frame_time)
                .max(self.config.max_fall_speed);
        }

        let forward = Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        self.position += forward * self.horizontal_speed * frame_time;
        self.position.y += self.vertical_speed * frame_time;

        if self.position.y <= self.config.floor_height && self.vertical_speed <= 0.0 {
            self.position.y = self.config.floor_height;
            self.vertical_speed = 0.0;
            self.grounded = true;
        }
    }

    /// One frame: input -> discrete state -> animation -> motion.
    pub fn update(
        &mut self,
        input: &ActorInput,
        frame_time: f32,
        camera_yaw: f32,
        sync: Option<&dyn SyncPoint>,
    ) {
        self.set_control_data(input, frame_time, camera_yaw);
        self.set_state();
        self.set_animation(frame_time, sync);
        self.set_motion(frame_time);
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}
