//! Display-list style draw layer.
//!
//! `DrawTarget` mirrors the command surface of the console's rasterizer:
//! pipeline syncs, render mode state, texture uploads into texture memory
//! (TMEM) tiles, and textured rectangles. `CommandList` is the in-process
//! target that records everything it is asked to do; a hardware backend would
//! encode the same calls into its command buffer.

use crate::color::Color;
use crate::sprite::{Surface, TexFormat};

/// Size of texture memory. An upload larger than this cannot be sampled.
pub const TMEM_BYTES: usize = 4096;

/// One of the eight TMEM tile descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub u8);

impl Tile {
    pub const TILE0: Tile = Tile(0);
    pub const TILE1: Tile = Tile(1);
}

/// Integer rectangle, used for both screen and texel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn from_origin_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    /// Texture multiplied by the primitive color.
    TexFlat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blender {
    /// Framebuffer multiplied by source.
    Multiply,
}

pub trait DrawTarget {
    fn sync_pipe(&mut self);
    fn sync_tile(&mut self);
    fn set_mode_standard(&mut self);
    fn mode_combiner(&mut self, combiner: Combiner);
    fn mode_blender(&mut self, blender: Blender);
    fn set_prim_color(&mut self, color: Color);
    /// Upload a whole surface into `tile`.
    fn tex_upload(&mut self, tile: Tile, surface: &Surface<'_>);
    /// Upload the `src` sub-rectangle of a surface into `tile`.
    fn tex_upload_sub(&mut self, tile: Tile, surface: &Surface<'_>, src: Rect);
    /// Draw `dst` with texels starting at `(s, t)`, 1:1 scale.
    fn texture_rectangle(&mut self, tile: Tile, dst: Rect, s: i32, t: i32);
    /// Draw `dst` stretching the `src` texel rectangle across it.
    fn texture_rectangle_scaled(&mut self, tile: Tile, dst: Rect, src: Rect);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadInfo {
    pub width: u32,
    pub height: u32,
    pub format: TexFormat,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    SyncPipe,
    SyncTile,
    SetModeStandard,
    ModeCombiner(Combiner),
    ModeBlender(Blender),
    SetPrimColor(Color),
    TexUpload {
        tile: Tile,
        source: UploadInfo,
    },
    TexUploadSub {
        tile: Tile,
        source: UploadInfo,
        src: Rect,
    },
    TextureRectangle {
        tile: Tile,
        dst: Rect,
        s: i32,
        t: i32,
    },
    TextureRectangleScaled {
        tile: Tile,
        dst: Rect,
        src: Rect,
    },
}

/// Recording draw target.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    tmem_overflows: usize,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Uploads so far that exceeded texture memory.
    pub fn tmem_overflows(&self) -> usize {
        self.tmem_overflows
    }

    /// Rectangles drawn so far, both plain and scaled.
    pub fn rectangle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::TextureRectangle { .. } | DrawCommand::TextureRectangleScaled { .. }
                )
            })
            .count()
    }

    /// Drop all recorded commands, as at the start of a new frame.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.tmem_overflows = 0;
    }

    fn check_tmem(&mut self, bytes: usize) {
        if bytes > TMEM_BYTES {
            log::warn!(
                "Texture upload of {} bytes exceeds TMEM ({} bytes)",
                bytes,
                TMEM_BYTES
            );
            self.tmem_overflows += 1;
        }
    }
}

impl DrawTarget for CommandList {
    fn sync_pipe(&mut self) {
        self.commands.push(DrawCommand::SyncPipe);
    }

    fn sync_tile(&mut self) {
        self.commands.push(DrawCommand::SyncTile);
    }

    fn set_mode_standard(&mut self) {
        self.commands.push(DrawCommand::SetModeStandard);
    }

    fn mode_combiner(&mut self, combiner: Combiner) {
        self.commands.push(DrawCommand::ModeCombiner(combiner));
    }

    fn mode_blender(&mut self, blender: Blender) {
        self.commands.push(DrawCommand::ModeBlender(blender));
    }

    fn set_prim_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetPrimColor(color));
    }

    fn tex_upload(&mut self, tile: Tile, surface: &Surface<'_>) {
        let source = UploadInfo {
            width: surface.width,
            height: surface.height,
            format: surface.format,
            bytes: surface.byte_len(),
        };
        self.check_tmem(source.bytes);
        self.commands.push(DrawCommand::TexUpload { tile, source });
    }

    fn tex_upload_sub(&mut self, tile: Tile, surface: &Surface<'_>, src: Rect) {
        let bytes = surface
            .format
            .bytes_for(src.width().max(0) as u32, src.height().max(0) as u32);
        let source = UploadInfo {
            width: surface.width,
            height: surface.height,
            format: surface.format,
            bytes,
        };
        self.check_tmem(bytes);
        self.commands
            .push(DrawCommand::TexUploadSub { tile, source, src });
    }

    fn texture_rectangle(&mut self, tile: Tile, dst: Rect, s: i32, t: i32) {
        self.commands
            .push(DrawCommand::TextureRectangle { tile, dst, s, t });
    }

    fn texture_rectangle_scaled(&mut self, tile: Tile, dst: Rect, src: Rect) {
        self.commands
            .push(DrawCommand::TextureRectangleScaled { tile, dst, src });
    }
}
