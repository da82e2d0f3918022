pub mod color;
pub mod file;
pub mod pause;
pub mod sprite;
