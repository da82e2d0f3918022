pub mod armature;
pub mod clip;
pub mod input;
pub mod skeleton;
pub mod sync;
