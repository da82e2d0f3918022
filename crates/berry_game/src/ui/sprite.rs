//! UI sprite handles and draw helpers.
//!
//! Button sheets are grid atlases of 16x16 icons, four per row. Panels are
//! stretched across arbitrary screen rectangles and tinted with a flat
//! primitive color multiplied over the texture.

use berry_render::{
    Blender, Color, Combiner, DrawTarget, Rect, Sprite, SpriteLoader, Tile,
};

use crate::ui::color::UiColor;
use crate::ui::file::{UiAssetPaths, NUM_BUTTONS, NUM_LOGOS, NUM_PANELS};

pub const SPRITE_WIDTH: i32 = 16;
pub const SPRITE_HEIGHT: i32 = 16;
/// Icons per row in a button atlas.
pub const ATLAS_COLUMNS: usize = 4;
pub const SPRITE_COUNT: usize = NUM_BUTTONS + NUM_PANELS + NUM_LOGOS;

/// Every loaded UI sprite. Owned by the UI subsystem for the whole run and
/// released exactly once through [`UiSprites::release`].
#[derive(Debug)]
pub struct UiSprites {
    pub control_stick: Sprite,
    pub d_pad_triggers: Sprite,
    pub c_buttons0: Sprite,
    pub c_buttons1: Sprite,
    pub face_buttons0: Sprite,
    pub face_buttons1: Sprite,

    pub gloss: Sprite,
    pub tessalate: Sprite,

    pub strawberry0: Sprite,
    pub strawberry1: Sprite,
    pub strawberry_top: Sprite,
    pub t3d: Sprite,
    pub libdragon: Sprite,
    pub mixamo: Sprite,
}

impl UiSprites {
    /// Load every button, panel and logo sprite. If any load fails, the
    /// sprites loaded so far are handed back to the loader before returning.
    pub fn load<L: SpriteLoader>(paths: &UiAssetPaths, loader: &mut L) -> Result<Self, String> {
        let mut loaded = Vec::new();
        for path in paths.sprite_paths() {
            match loader.load(path) {
                Ok(sprite) => loaded.push(sprite),
                Err(err) => {
                    for sprite in loaded {
                        loader.free(sprite);
                    }
                    return Err(err);
                }
            }
        }

        // Order follows `sprite_paths`: buttons, panels, logos.
        let mut it = loaded.into_iter();
        let mut next = || {
            it.next()
                .ok_or_else(|| "UI sprite table is shorter than expected".to_string())
        };
        let sprites = Self {
            control_stick: next()?,
            d_pad_triggers: next()?,
            c_buttons0: next()?,
            c_buttons1: next()?,
            face_buttons0: next()?,
            face_buttons1: next()?,
            gloss: next()?,
            tessalate: next()?,
            strawberry0: next()?,
            strawberry1: next()?,
            strawberry_top: next()?,
            t3d: next()?,
            libdragon: next()?,
            mixamo: next()?,
        };
        log::info!("Loaded {} UI sprites", sprites.count());
        Ok(sprites)
    }

    fn into_vec(self) -> Vec<Sprite> {
        vec![
            self.control_stick,
            self.d_pad_triggers,
            self.c_buttons0,
            self.c_buttons1,
            self.face_buttons0,
            self.face_buttons1,
            self.gloss,
            self.tessalate,
            self.strawberry0,
            self.strawberry1,
            self.strawberry_top,
            self.t3d,
            self.libdragon,
            self.mixamo,
        ]
    }

    pub fn count(&self) -> usize {
        SPRITE_COUNT
    }

    /// Hand every sprite back to the loader.
    pub fn release<L: SpriteLoader>(self, loader: &mut L) {
        for sprite in self.into_vec() {
            loader.free(sprite);
        }
    }
}

/// Set up the pipeline for tinted sprite drawing: texture times primitive
/// color, multiplied over the framebuffer.
pub fn sync_sprite<D: DrawTarget>(target: &mut D, color: Color) {
    target.sync_pipe();
    target.set_mode_standard();
    target.mode_combiner(Combiner::TexFlat);
    target.mode_blender(Blender::Multiply);
    target.set_prim_color(color);
    target.sync_tile();
}

/// Texel origin of icon `idx` in a grid atlas.
pub fn icon_origin(idx: usize) -> (i32, i32) {
    // Wraps every four cells; the console build only wrapped after index 4.
    let column = (idx % ATLAS_COLUMNS) as i32;
    let row = (idx / ATLAS_COLUMNS) as i32;
    (column * SPRITE_WIDTH, row * SPRITE_HEIGHT)
}

/// Draw the 16x16 icon `idx` of `sprite` with its top-left corner at `(x, y)`.
pub fn draw_icon<D: DrawTarget>(
    target: &mut D,
    tile: Tile,
    sprite: &Sprite,
    idx: usize,
    x: i32,
    y: i32,
) {
    let (s, t) = icon_origin(idx);

    sync_sprite(target, UiColor::White.color());

    let surface = sprite.pixels();
    target.tex_upload_sub(
        tile,
        &surface,
        Rect::from_origin_size(s, t, SPRITE_WIDTH, SPRITE_HEIGHT),
    );
    target.texture_rectangle(
        tile,
        Rect::from_origin_size(x, y, SPRITE_WIDTH, SPRITE_HEIGHT),
        s,
        t,
    );
}

/// Stretch the `src` texels of `sprite` across `dst`, tinted by a palette color.
pub fn draw_panel<D: DrawTarget>(
    target: &mut D,
    tile: Tile,
    sprite: &Sprite,
    color: UiColor,
    dst: Rect,
    src: Rect,
) {
    draw_dynamic(target, tile, sprite, color.color(), dst, src);
}

/// Stretch the `src` texels of `sprite` across `dst`, tinted by any color.
pub fn draw_dynamic<D: DrawTarget>(
    target: &mut D,
    tile: Tile,
    sprite: &Sprite,
    color: Color,
    dst: Rect,
    src: Rect,
) {
    sync_sprite(target, color);

    let surface = sprite.pixels();
    target.tex_upload(tile, &surface);
    target.texture_rectangle_scaled(tile, dst, src);
}

#[cfg(test)]
mod tests {
    use super::*;
    use berry_render::draw::UploadInfo;
    use berry_render::{CommandList, DrawCommand, TexFormat};
    use std::collections::HashMap;

    /// Loader that fabricates blank sprites and counts frees per path.
    #[derive(Default)]
    struct FakeLoader {
        fail_on: Option<String>,
        loads: usize,
        frees: HashMap<String, usize>,
    }

    impl SpriteLoader for FakeLoader {
        fn load(&mut self, path: &str) -> Result<Sprite, String> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(format!("Failed to read sprite {path}: not found"));
            }
            self.loads += 1;
            let format = TexFormat::from_asset_name(path).unwrap_or(TexFormat::Rgba32);
            Ok(Sprite::blank(path, 64, 32, format))
        }

        fn free(&mut self, sprite: Sprite) {
            *self.frees.entry(sprite.path).or_default() += 1;
        }
    }

    fn paths() -> UiAssetPaths {
        UiAssetPaths::resolve_all().expect("static tables resolve")
    }

    fn setup_commands(color: Color) -> Vec<DrawCommand> {
        vec![
            DrawCommand::SyncPipe,
            DrawCommand::SetModeStandard,
            DrawCommand::ModeCombiner(Combiner::TexFlat),
            DrawCommand::ModeBlender(Blender::Multiply),
            DrawCommand::SetPrimColor(color),
            DrawCommand::SyncTile,
        ]
    }

    #[test]
    fn load_binds_sprites_to_named_slots() {
        let mut loader = FakeLoader::default();
        let sprites = UiSprites::load(&paths(), &mut loader).expect("should load");
        assert_eq!(loader.loads, sprites.count());
        assert_eq!(sprites.control_stick.path, "rom:/sb_hhh/ui/buttons/control_stick.ia8.sprite");
        assert_eq!(sprites.tessalate.path, "rom:/sb_hhh/ui/panels/pattern_tessalate.ia4.sprite");
        assert_eq!(sprites.strawberry_top.path, "rom:/sb_hhh/ui/logos/sb_top.rgba32.sprite");
        assert_eq!(sprites.mixamo.format, TexFormat::Ia4);
    }

    #[test]
    fn release_frees_every_sprite_exactly_once() {
        let mut loader = FakeLoader::default();
        let paths = paths();
        let sprites = UiSprites::load(&paths, &mut loader).expect("should load");
        sprites.release(&mut loader);

        assert_eq!(loader.frees.len(), SPRITE_COUNT);
        for path in paths.sprite_paths() {
            assert_eq!(loader.frees.get(path), Some(&1), "{path}");
        }
    }

    #[test]
    fn failed_load_frees_what_was_loaded() {
        let paths = paths();
        let mut loader = FakeLoader {
            fail_on: Some(paths.panels[0].clone()),
            ..FakeLoader::default()
        };
        let err = UiSprites::load(&paths, &mut loader).expect_err("should fail");
        assert!(err.contains("gloss"));
        // The six buttons were loaded before the failing panel.
        assert_eq!(loader.loads, 6);
        assert_eq!(loader.frees.values().sum::<usize>(), 6);
    }

    #[test]
    fn icon_origin_wraps_every_four_columns() {
        assert_eq!(icon_origin(0), (0, 0));
        assert_eq!(icon_origin(3), (48, 0));
        assert_eq!(icon_origin(4), (0, 16));
        assert_eq!(icon_origin(5), (16, 16));
        assert_eq!(icon_origin(11), (48, 32));
    }

    #[test]
    fn draw_icon_uploads_one_cell_and_draws_it() {
        let sprite = Sprite::blank("c_buttons0.rgba32.sprite", 64, 32, TexFormat::Rgba32);
        let mut list = CommandList::new();
        draw_icon(&mut list, Tile::TILE0, &sprite, 6, 100, 40);

        let mut expected = setup_commands(Color::WHITE);
        expected.push(DrawCommand::TexUploadSub {
            tile: Tile::TILE0,
            source: UploadInfo {
                width: 64,
                height: 32,
                format: TexFormat::Rgba32,
                bytes: 1024,
            },
            src: Rect::new(32, 16, 48, 32),
        });
        expected.push(DrawCommand::TextureRectangle {
            tile: Tile::TILE0,
            dst: Rect::new(100, 40, 116, 56),
            s: 32,
            t: 16,
        });
        assert_eq!(list.commands(), expected.as_slice());
        assert_eq!(list.tmem_overflows(), 0);
    }

    #[test]
    fn draw_panel_tints_with_palette_color() {
        let sprite = Sprite::blank("gloss.ia4.sprite", 32, 32, TexFormat::Ia4);
        let mut list = CommandList::new();
        let dst = Rect::new(10, 10, 210, 90);
        let src = Rect::new(0, 0, 32, 32);
        draw_panel(&mut list, Tile::TILE1, &sprite, UiColor::Blue, dst, src);

        let commands = list.commands();
        assert_eq!(&commands[..6], setup_commands(UiColor::Blue.color()).as_slice());
        assert!(matches!(
            commands[6],
            DrawCommand::TexUpload { tile: Tile::TILE1, source } if source.bytes == 512
        ));
        assert_eq!(
            commands[7],
            DrawCommand::TextureRectangleScaled {
                tile: Tile::TILE1,
                dst,
                src
            }
        );
    }

    #[test]
    fn draw_dynamic_uses_explicit_color() {
        let sprite = Sprite::blank("gloss.ia4.sprite", 32, 32, TexFormat::Ia4);
        let mut list = CommandList::new();
        let tint = Color::rgba(1, 2, 3, 4);
        draw_dynamic(
            &mut list,
            Tile::TILE0,
            &sprite,
            tint,
            Rect::new(0, 0, 8, 8),
            Rect::new(0, 0, 32, 32),
        );
        assert!(list.commands().contains(&DrawCommand::SetPrimColor(tint)));
        assert_eq!(list.rectangle_count(), 1);
    }
}
