//! Menu overlays built from the UI sprites.

use berry_render::{DrawTarget, Rect, Tile};

use crate::ui::color::UiColor;
use crate::ui::sprite::{draw_dynamic, draw_icon, draw_panel, UiSprites};

pub const SCREEN_WIDTH: i32 = 320;
pub const SCREEN_HEIGHT: i32 = 240;

/// Face-button atlas cell holding the START icon.
const START_ICON: usize = 3;
/// Face-button atlas cell holding the A icon.
const A_ICON: usize = 0;

/// Full-texture source rectangle of a sprite.
fn full(width: u32, height: u32) -> Rect {
    Rect::new(0, 0, width as i32, height as i32)
}

/// Pause menu: shaded backdrop, glossy centered panel, and prompts for
/// resuming (START) and confirming (A).
pub fn draw_pause_menu<D: DrawTarget>(target: &mut D, sprites: &UiSprites) {
    let pattern = &sprites.tessalate;
    draw_panel(
        target,
        Tile::TILE0,
        pattern,
        UiColor::Shade,
        Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT),
        full(pattern.width, pattern.height),
    );

    let gloss = &sprites.gloss;
    let panel = Rect::new(80, 60, SCREEN_WIDTH - 80, SCREEN_HEIGHT - 60);
    draw_panel(
        target,
        Tile::TILE0,
        gloss,
        UiColor::DarkGrey,
        panel,
        full(gloss.width, gloss.height),
    );

    draw_icon(
        target,
        Tile::TILE1,
        &sprites.face_buttons0,
        START_ICON,
        panel.x0 + 16,
        panel.y1 - 32,
    );
    draw_icon(
        target,
        Tile::TILE1,
        &sprites.face_buttons0,
        A_ICON,
        panel.x1 - 32,
        panel.y1 - 32,
    );
}

/// Boot screen: the game logo stacked from its three layers, then the
/// credit logos along the bottom edge.
pub fn draw_intro<D: DrawTarget>(target: &mut D, sprites: &UiSprites) {
    let center_x = SCREEN_WIDTH / 2;
    for (layer, tint) in [
        (&sprites.strawberry0, UiColor::Red.color()),
        (&sprites.strawberry1, UiColor::Red.color()),
        (&sprites.strawberry_top, UiColor::Green.color()),
    ] {
        let w = layer.width as i32;
        let h = layer.height as i32;
        draw_dynamic(
            target,
            Tile::TILE0,
            layer,
            tint,
            Rect::from_origin_size(center_x - w, 40, w * 2, h * 2),
            full(layer.width, layer.height),
        );
    }

    let credits = [&sprites.libdragon, &sprites.t3d, &sprites.mixamo];
    let slot = SCREEN_WIDTH / credits.len() as i32;
    for (i, logo) in credits.into_iter().enumerate() {
        let w = logo.width as i32;
        let h = logo.height as i32;
        let x = slot * i as i32 + (slot - w) / 2;
        draw_panel(
            target,
            Tile::TILE0,
            logo,
            UiColor::White,
            Rect::from_origin_size(x, SCREEN_HEIGHT - h - 16, w, h),
            full(logo.width, logo.height),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berry_render::{CommandList, DrawCommand, Sprite, TexFormat};

    fn sprite(name: &str, w: u32, h: u32, format: TexFormat) -> Sprite {
        Sprite::blank(name, w, h, format)
    }

    fn sprites() -> UiSprites {
        UiSprites {
            control_stick: sprite("control_stick", 64, 32, TexFormat::Ia8),
            d_pad_triggers: sprite("d_pad_triggers", 64, 32, TexFormat::Ia8),
            c_buttons0: sprite("c_buttons0", 64, 16, TexFormat::Rgba32),
            c_buttons1: sprite("c_buttons1", 64, 16, TexFormat::Rgba32),
            face_buttons0: sprite("face_buttons0", 64, 16, TexFormat::Rgba32),
            face_buttons1: sprite("face_buttons1", 64, 16, TexFormat::Rgba32),
            gloss: sprite("gloss", 32, 32, TexFormat::Ia4),
            tessalate: sprite("tessalate", 32, 32, TexFormat::Ia4),
            strawberry0: sprite("sb_b0", 32, 32, TexFormat::Rgba32),
            strawberry1: sprite("sb_b1", 32, 32, TexFormat::Rgba32),
            strawberry_top: sprite("sb_top", 32, 32, TexFormat::Rgba32),
            t3d: sprite("t3d", 32, 32, TexFormat::Ia8),
            libdragon: sprite("libdragon", 64, 32, TexFormat::Ia4),
            mixamo: sprite("mixamo", 64, 32, TexFormat::Ia4),
        }
    }

    #[test]
    fn pause_menu_draws_backdrop_panel_and_two_icons() {
        let mut list = CommandList::new();
        draw_pause_menu(&mut list, &sprites());
        assert_eq!(list.rectangle_count(), 4);
        assert_eq!(list.tmem_overflows(), 0);
        assert!(list
            .commands()
            .contains(&DrawCommand::SetPrimColor(UiColor::Shade.color())));
    }

    #[test]
    fn intro_draws_logo_layers_and_credits_on_screen() {
        let mut list = CommandList::new();
        draw_intro(&mut list, &sprites());
        assert_eq!(list.rectangle_count(), 6);
        for command in list.commands() {
            if let DrawCommand::TextureRectangleScaled { dst, .. } = command {
                assert!(dst.x0 >= 0 && dst.x1 <= SCREEN_WIDTH, "{dst:?}");
                assert!(dst.y0 >= 0 && dst.y1 <= SCREEN_HEIGHT, "{dst:?}");
            }
        }
    }
}
