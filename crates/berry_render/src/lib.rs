pub mod color;
pub mod draw;
pub mod sprite;

pub use color::Color;
pub use draw::{Blender, CommandList, Combiner, DrawCommand, DrawTarget, Rect, Tile};
pub use sprite::{DirSpriteLoader, Sprite, SpriteLoader, Surface, TexFormat};
