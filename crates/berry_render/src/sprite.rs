//! Sprite images and the on-disk sprite format.
//!
//! A sprite file is an 8-byte big-endian header followed by raw texels:
//!
//! ```text
//! u16 width | u16 height | u8 bitdepth | u8 flags | u8 hslices | u8 vslices | texels...
//! ```
//!
//! The low five bits of `flags` carry the texture format code. Asset names
//! also encode the format (`control_stick.ia8.sprite`), which the loader
//! cross-checks against the header.

use std::fs;
use std::path::PathBuf;

pub const SPRITE_HEADER_BYTES: usize = 8;
const FORMAT_MASK: u8 = 0x1F;

/// Texel formats understood by the texture unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexFormat {
    Rgba16,
    Rgba32,
    Ci4,
    Ci8,
    Ia4,
    Ia8,
    Ia16,
    I4,
    I8,
}

impl TexFormat {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Rgba16),
            3 => Some(Self::Rgba32),
            8 => Some(Self::Ci4),
            9 => Some(Self::Ci8),
            12 => Some(Self::Ia4),
            13 => Some(Self::Ia8),
            14 => Some(Self::Ia16),
            16 => Some(Self::I4),
            17 => Some(Self::I8),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Rgba16 => 2,
            Self::Rgba32 => 3,
            Self::Ci4 => 8,
            Self::Ci8 => 9,
            Self::Ia4 => 12,
            Self::Ia8 => 13,
            Self::Ia16 => 14,
            Self::I4 => 16,
            Self::I8 => 17,
        }
    }

    pub fn bits_per_texel(self) -> usize {
        match self {
            Self::Ci4 | Self::Ia4 | Self::I4 => 4,
            Self::Ci8 | Self::Ia8 | Self::I8 => 8,
            Self::Rgba16 | Self::Ia16 => 16,
            Self::Rgba32 => 32,
        }
    }

    /// Byte size of a `width x height` block, rounded up to whole bytes.
    pub fn bytes_for(self, width: u32, height: u32) -> usize {
        (width as usize * height as usize * self.bits_per_texel()).div_ceil(8)
    }

    /// Format named by the second-to-last extension of an asset name, e.g.
    /// `gloss.ia4.sprite`.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".sprite")?;
        let (_, ext) = stem.rsplit_once('.')?;
        match ext {
            "rgba16" => Some(Self::Rgba16),
            "rgba32" => Some(Self::Rgba32),
            "ci4" => Some(Self::Ci4),
            "ci8" => Some(Self::Ci8),
            "ia4" => Some(Self::Ia4),
            "ia8" => Some(Self::Ia8),
            "ia16" => Some(Self::Ia16),
            "i4" => Some(Self::I4),
            "i8" => Some(Self::I8),
            _ => None,
        }
    }
}

/// Borrowed view of a sprite's texels, the unit the texture upload commands take.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    pub width: u32,
    pub height: u32,
    pub format: TexFormat,
    pub data: &'a [u8],
}

impl Surface<'_> {
    pub fn byte_len(&self) -> usize {
        self.format.bytes_for(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Path the sprite was loaded from; used to label draw commands.
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub format: TexFormat,
    pub hslices: u8,
    pub vslices: u8,
    pub texels: Vec<u8>,
}

impl Sprite {
    /// Blank sprite of the given size, used for tests and placeholders.
    pub fn blank(path: &str, width: u32, height: u32, format: TexFormat) -> Self {
        Self {
            path: path.to_string(),
            width,
            height,
            format,
            hslices: 1,
            vslices: 1,
            texels: vec![0; format.bytes_for(width, height)],
        }
    }

    pub fn pixels(&self) -> Surface<'_> {
        Surface {
            width: self.width,
            height: self.height,
            format: self.format,
            data: &self.texels,
        }
    }
}

/// Parse a sprite from its file bytes.
pub fn parse_sprite(path: &str, bytes: &[u8]) -> Result<Sprite, String> {
    if bytes.len() < SPRITE_HEADER_BYTES {
        return Err(format!(
            "Sprite validation failed: '{}' is {} bytes, shorter than the header",
            path,
            bytes.len()
        ));
    }
    let width = u16::from_be_bytes([bytes[0], bytes[1]]) as u32;
    let height = u16::from_be_bytes([bytes[2], bytes[3]]) as u32;
    let flags = bytes[5];
    let hslices = bytes[6];
    let vslices = bytes[7];

    if width == 0 || height == 0 {
        return Err(format!(
            "Sprite validation failed: '{}' has zero-sized image {}x{}",
            path, width, height
        ));
    }
    let format = TexFormat::from_code(flags & FORMAT_MASK).ok_or_else(|| {
        format!(
            "Sprite validation failed: '{}' has unknown texture format code {}",
            path,
            flags & FORMAT_MASK
        )
    })?;
    if let Some(named) = TexFormat::from_asset_name(path) {
        if named != format {
            return Err(format!(
                "Sprite validation failed: '{}' is named {:?} but its header says {:?}",
                path, named, format
            ));
        }
    }

    let expected = format.bytes_for(width, height);
    let texels = &bytes[SPRITE_HEADER_BYTES..];
    if texels.len() < expected {
        return Err(format!(
            "Sprite validation failed: '{}' needs {} texel bytes but has {}",
            path,
            expected,
            texels.len()
        ));
    }

    Ok(Sprite {
        path: path.to_string(),
        width,
        height,
        format,
        hslices: hslices.max(1),
        vslices: vslices.max(1),
        texels: texels[..expected].to_vec(),
    })
}

/// Encode a sprite back into file bytes.
pub fn encode_sprite(sprite: &Sprite) -> Vec<u8> {
    let mut out = Vec::with_capacity(SPRITE_HEADER_BYTES + sprite.texels.len());
    out.extend_from_slice(&(sprite.width as u16).to_be_bytes());
    out.extend_from_slice(&(sprite.height as u16).to_be_bytes());
    out.push(sprite.format.bits_per_texel() as u8);
    out.push(sprite.format.code());
    out.push(sprite.hslices);
    out.push(sprite.vslices);
    out.extend_from_slice(&sprite.texels);
    out
}

/// Capability to turn an asset path into a sprite and to release it again.
pub trait SpriteLoader {
    fn load(&mut self, path: &str) -> Result<Sprite, String>;

    /// Release a sprite. Taking it by value means it cannot be freed twice.
    fn free(&mut self, sprite: Sprite);
}

/// Loads sprites from a directory standing in for the cartridge filesystem:
/// `rom:/sb_hhh/ui/x.sprite` maps to `<root>/sb_hhh/ui/x.sprite`.
pub struct DirSpriteLoader {
    root: PathBuf,
    live: usize,
}

pub const ROM_PREFIX: &str = "rom:/";

impl DirSpriteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            live: 0,
        }
    }

    /// Number of sprites loaded and not yet freed.
    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn host_path(&self, path: &str) -> PathBuf {
        self.root.join(path.strip_prefix(ROM_PREFIX).unwrap_or(path))
    }
}

impl SpriteLoader for DirSpriteLoader {
    fn load(&mut self, path: &str) -> Result<Sprite, String> {
        let host = self.host_path(path);
        let bytes =
            fs::read(&host).map_err(|e| format!("Failed to read sprite {}: {e}", host.display()))?;
        let sprite = parse_sprite(path, &bytes)?;
        log::debug!(
            "Loaded sprite {} ({}x{} {:?})",
            path,
            sprite.width,
            sprite.height,
            sprite.format
        );
        self.live += 1;
        Ok(sprite)
    }

    fn free(&mut self, sprite: Sprite) {
        log::debug!("Freed sprite {}", sprite.path);
        self.live = self.live.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "berry_sprite_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn format_from_asset_name() {
        assert_eq!(
            TexFormat::from_asset_name("buttons/c_buttons0.rgba32.sprite"),
            Some(TexFormat::Rgba32)
        );
        assert_eq!(
            TexFormat::from_asset_name("panels/gloss.ia4.sprite"),
            Some(TexFormat::Ia4)
        );
        assert_eq!(TexFormat::from_asset_name("fonts/a.font64"), None);
    }

    #[test]
    fn byte_sizes_round_up() {
        assert_eq!(TexFormat::Ia4.bytes_for(3, 1), 2);
        assert_eq!(TexFormat::Rgba32.bytes_for(16, 16), 1024);
    }

    #[test]
    fn parse_encoded_sprite() {
        let mut original = Sprite::blank("logos/t3d.ia8.sprite", 4, 2, TexFormat::Ia8);
        original.texels = (0..8).collect();
        let parsed =
            parse_sprite("logos/t3d.ia8.sprite", &encode_sprite(&original)).expect("should parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn parse_rejects_truncated_texels() {
        let sprite = Sprite::blank("a.rgba32.sprite", 4, 4, TexFormat::Rgba32);
        let mut bytes = encode_sprite(&sprite);
        bytes.truncate(bytes.len() - 1);
        let err = parse_sprite("a.rgba32.sprite", &bytes).expect_err("truncated should fail");
        assert!(err.contains("texel bytes"));
    }

    #[test]
    fn parse_rejects_name_header_mismatch() {
        let sprite = Sprite::blank("a.ia4.sprite", 2, 2, TexFormat::Ia4);
        let bytes = encode_sprite(&sprite);
        let err = parse_sprite("a.rgba32.sprite", &bytes).expect_err("mismatch should fail");
        assert!(err.contains("header says"));
    }

    #[test]
    fn dir_loader_maps_rom_prefix_and_tracks_live_handles() {
        let root = temp_dir("loader");
        let asset_dir = root.join("sb_hhh/ui/panels");
        fs::create_dir_all(&asset_dir).expect("create asset dir");
        let sprite = Sprite::blank("gloss.ia4.sprite", 8, 8, TexFormat::Ia4);
        fs::write(asset_dir.join("gloss.ia4.sprite"), encode_sprite(&sprite))
            .expect("write sprite");

        let mut loader = DirSpriteLoader::new(&root);
        let loaded = loader
            .load("rom:/sb_hhh/ui/panels/gloss.ia4.sprite")
            .expect("should load");
        assert_eq!((loaded.width, loaded.height), (8, 8));
        assert_eq!(loader.live_count(), 1);

        loader.free(loaded);
        assert_eq!(loader.live_count(), 0);

        let err = loader
            .load("rom:/sb_hhh/ui/panels/missing.ia4.sprite")
            .expect_err("missing sprite should fail");
        assert!(err.contains("Failed to read sprite"));

        let _ = fs::remove_dir_all(root);
    }
}
