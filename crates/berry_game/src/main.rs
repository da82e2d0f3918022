//! Strawberry hero demo -- headless frame loop.
//!
//! Each frame follows the same order the console build uses:
//!
//!   1. Read the pad (here: the next replay snapshot)
//!   2. Pause handling, then the intro timer
//!   3. Actor update while in gameplay: control data, state, animation, motion
//!   4. Record the frame's overlay draw commands and "submit" them
//!
//! The pose commit waits on a fence that is signaled once the previous
//! frame's draw list has been submitted, so the skinning matrices are never
//! rewritten while a frame that reads them is still in flight.

mod actor;
mod actor_animation;
mod config;
mod control;
mod replay;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use berry_core::armature::SkinnedArmature;
use berry_core::clip::load_animation_library;
use berry_core::input::PadState;
use berry_core::sync::Fence;
use berry_render::{CommandList, DirSpriteLoader};

use actor::{Actor, ActorInput};
use config::load_or_default;
use control::{Game, GameState};
use replay::load_replay_from_path;
use ui::file::UiAssetPaths;
use ui::pause::{draw_intro, draw_pause_menu};
use ui::sprite::UiSprites;

const CONFIG_PATH: &str = "assets/config/game.json";
pub(crate) const REPLAY_PATH: &str = "assets/replays/demo.json";
pub(crate) const ANIMATION_LIBRARY_PATH: &str = "assets/animations/hero.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Strawberry hero starting");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_PATH));
    let config = load_or_default(&config_path).unwrap_or_else(|err| {
        panic!(
            "Failed to load config '{}': {}",
            config_path.display(),
            err
        )
    });

    let library = load_animation_library(&config.animation_library).unwrap_or_else(|err| {
        panic!(
            "Failed to load animation library '{}': {}",
            config.animation_library.display(),
            err
        )
    });
    log::info!(
        "Animation library '{}' loaded: {} clips, {} joints",
        library.library_id,
        library.clips.len(),
        library.joint_count
    );
    let armature = SkinnedArmature::new(Arc::new(library));
    let mut actor = Actor::new(armature, config.actor)
        .unwrap_or_else(|err| panic!("Failed to set up actor animation: {}", err));

    let replay = load_replay_from_path(&config.replay).unwrap_or_else(|err| {
        panic!(
            "Failed to load replay '{}': {}",
            config.replay.display(),
            err
        )
    });

    let mut loader = DirSpriteLoader::new(config.asset_root.clone());
    let sprites = match UiAssetPaths::resolve_all().and_then(|paths| {
        log::debug!("UI fonts: {}", paths.fonts.join(", "));
        UiSprites::load(&paths, &mut loader)
    }) {
        Ok(sprites) => Some(sprites),
        Err(err) => {
            log::warn!("UI sprites unavailable, overlays disabled: {}", err);
            None
        }
    };

    let mut game = Game::new(config.intro_seconds);
    let mut pad = PadState::new();
    let mut commands = CommandList::new();
    let fence = Fence::signaled();

    let inputs = replay.expanded_inputs();
    let mut frames_by_state = [0usize; 3];
    let mut overflow_frames = 0usize;

    for snapshot in &inputs {
        pad.apply_snapshot(snapshot);
        game.set_control_data(&pad);
        game.tick(replay.fixed_dt);

        commands.clear();
        match game.state {
            GameState::Intro => {
                frames_by_state[0] += 1;
                if let Some(sprites) = &sprites {
                    draw_intro(&mut commands, sprites);
                }
            }
            GameState::Gameplay => {
                frames_by_state[1] += 1;
                actor.update(
                    &ActorInput::from_pad(&pad),
                    replay.fixed_dt,
                    replay.camera_yaw,
                    Some(&fence),
                );
                fence.reset();
            }
            GameState::Pause => {
                frames_by_state[2] += 1;
                if let Some(sprites) = &sprites {
                    draw_pause_menu(&mut commands, sprites);
                }
            }
        }

        if commands.tmem_overflows() > 0 {
            overflow_frames += 1;
        }
        log::debug!(
            "Frame submitted: {} commands, {} rectangles",
            commands.len(),
            commands.rectangle_count()
        );
        fence.signal();
    }

    log::info!(
        "Replay finished: {} frames (intro {}, gameplay {}, paused {})",
        inputs.len(),
        frames_by_state[0],
        frames_by_state[1],
        frames_by_state[2]
    );
    log::info!(
        "Actor at ({:.1}, {:.1}, {:.1}) state {:?}, {} pose commits",
        actor.position.x,
        actor.position.y,
        actor.position.z,
        actor.state,
        actor.armature.commit_count()
    );
    if game.is_paused() {
        log::info!("Replay ended while paused");
    }
    if overflow_frames > 0 {
        log::warn!("{} frames exceeded texture memory", overflow_frames);
    }

    if let Some(sprites) = sprites {
        sprites.release(&mut loader);
    }
    log::info!("Released UI sprites ({} still live)", loader.live_count());
}
