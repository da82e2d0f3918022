use berry_render::Color;

/// Fixed UI palette. Panels are tinted by palette entry rather than by an
/// arbitrary color so menus stay visually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiColor {
    Black,
    White,
    LightGrey,
    Grey,
    DarkGrey,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    /// Translucent black used behind menus.
    Shade,
}

impl UiColor {
    pub fn color(self) -> Color {
        match self {
            Self::Black => Color::BLACK,
            Self::White => Color::WHITE,
            Self::LightGrey => Color::rgba(200, 200, 200, 255),
            Self::Grey => Color::rgba(128, 128, 128, 255),
            Self::DarkGrey => Color::rgba(50, 50, 50, 255),
            Self::Red => Color::rgba(200, 40, 40, 255),
            Self::Green => Color::rgba(40, 180, 80, 255),
            Self::Blue => Color::rgba(40, 80, 200, 255),
            Self::Yellow => Color::rgba(250, 210, 40, 255),
            Self::Orange => Color::rgba(240, 130, 30, 255),
            Self::Purple => Color::rgba(130, 60, 180, 255),
            Self::Shade => Color::rgba(0, 0, 0, 160),
        }
    }
}
