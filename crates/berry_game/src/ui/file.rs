//! UI asset path tables.
//!
//! Every UI asset lives under one base directory on the cartridge filesystem.
//! The relative names are fixed at compile time; `UiAssetPaths` resolves them
//! once and is then handed by reference to whatever loads fonts and sprites.

/// Base directory for UI assets.
pub const BASE_PATH: &str = "rom:/sb_hhh/ui/";

/// Longest resolved path accepted, matching the fixed path buffer of the
/// target's filesystem API (256 bytes including the terminator).
pub const MAX_PATH_LEN: usize = 255;

pub const NUM_FONTS: usize = 2;
pub const NUM_BUTTONS: usize = 6;
pub const NUM_PANELS: usize = 2;
pub const NUM_LOGOS: usize = 6;

pub const FONT_PATHS: [&str; NUM_FONTS] = [
    "fonts/TitanOne-Regular.font64",
    "fonts/OilOnTheWater-ee5O.font64",
];

pub const BUTTON_PATHS: [&str; NUM_BUTTONS] = [
    "buttons/control_stick.ia8.sprite",
    "buttons/d_pad_triggers.ia8.sprite",
    "buttons/c_buttons0.rgba32.sprite",
    "buttons/c_buttons1.rgba32.sprite",
    "buttons/face_buttons0.rgba32.sprite",
    "buttons/face_buttons1.rgba32.sprite",
];

pub const PANEL_PATHS: [&str; NUM_PANELS] = [
    "panels/gloss.ia4.sprite",
    "panels/pattern_tessalate.ia4.sprite",
];

pub const LOGO_PATHS: [&str; NUM_LOGOS] = [
    "logos/sb_b0.rgba32.sprite",
    "logos/sb_b1.rgba32.sprite",
    "logos/sb_top.rgba32.sprite",
    "logos/t3d.ia8.sprite",
    "logos/libdragon.ia4.sprite",
    "logos/mixamo.ia4.sprite",
];

/// Join `name` onto [`BASE_PATH`].
pub fn resolve(name: &str) -> Result<String, String> {
    resolve_with_base(BASE_PATH, name)
}

pub fn resolve_with_base(base: &str, name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("UI path resolution failed: asset name is empty".to_string());
    }
    if name.starts_with('/') || name.contains(":/") {
        return Err(format!(
            "UI path resolution failed: '{}' must be relative to '{}'",
            name, base
        ));
    }
    if name.split('/').any(|part| part == "..") {
        return Err(format!(
            "UI path resolution failed: '{}' escapes the UI directory",
            name
        ));
    }

    let full = format!("{base}{name}");
    if full.len() > MAX_PATH_LEN {
        return Err(format!(
            "UI path resolution failed: '{}' is {} bytes, limit is {}",
            name,
            full.len(),
            MAX_PATH_LEN
        ));
    }
    Ok(full)
}

fn resolve_table<const N: usize>(names: &[&str; N]) -> Result<[String; N], String> {
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, name) in out.iter_mut().zip(names) {
        *slot = resolve(name)?;
    }
    Ok(out)
}

/// Full paths for every UI asset, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiAssetPaths {
    pub fonts: [String; NUM_FONTS],
    pub buttons: [String; NUM_BUTTONS],
    pub panels: [String; NUM_PANELS],
    pub logos: [String; NUM_LOGOS],
}

impl UiAssetPaths {
    pub fn resolve_all() -> Result<Self, String> {
        Ok(Self {
            fonts: resolve_table(&FONT_PATHS)?,
            buttons: resolve_table(&BUTTON_PATHS)?,
            panels: resolve_table(&PANEL_PATHS)?,
            logos: resolve_table(&LOGO_PATHS)?,
        })
    }

    /// Every sprite path (buttons, panels, logos); fonts are not sprites.
    pub fn sprite_paths(&self) -> impl Iterator<Item = &str> {
        self.buttons
            .iter()
            .chain(&self.panels)
            .chain(&self.logos)
            .map(String::as_str)
    }
}
