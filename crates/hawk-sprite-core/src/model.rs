use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (atlas pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// True if both rectangles share at least one pixel. Empty rects never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w == 0 || self.h == 0 || other.w == 0 || other.h == 0 {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Where a source texture comes from; decides the canonical name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Block,
    Item,
    Entity,
    Gui,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Item => "item",
            Self::Entity => "entity",
            Self::Gui => "gui",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Pixel rendition of a sprite, told apart by the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Normal,
    Large,
    Small,
}

impl Tier {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Large => "-large",
            Self::Small => "-small",
        }
    }

    /// Splits a sprite name into its base name and tier.
    ///
    /// ```
    /// use hawk_sprite_core::Tier;
    /// assert_eq!(Tier::split("block-fire-large"), ("block-fire", Tier::Large));
    /// assert_eq!(Tier::split("block-fire"), ("block-fire", Tier::Normal));
    /// ```
    pub fn split(name: &str) -> (&str, Tier) {
        if let Some(base) = name.strip_suffix(Self::Small.suffix()) {
            (base, Self::Small)
        } else if let Some(base) = name.strip_suffix(Self::Large.suffix()) {
            (base, Self::Large)
        } else {
            (name, Self::Normal)
        }
    }

    pub fn apply(self, name: &str) -> String {
        format!("{}{}", name, self.suffix())
    }
}

impl std::str::FromStr for Tier {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "" => Ok(Self::Normal),
            "large" => Ok(Self::Large),
            "small" => Ok(Self::Small),
            _ => Err(()),
        }
    }
}

/// Image candidate found in the resources pack or the loose images folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTexture {
    /// Path inside the archive, or on disk for loose images.
    pub origin: PathBuf,
    pub namespace: Namespace,
    pub filename: String,
}

/// One logical icon in the working directory, before scaling.
#[derive(Debug, Clone)]
pub struct CanonicalSprite {
    /// Namespace-prefixed, hyphenated name (no extension).
    pub name: String,
    pub namespace: Namespace,
    /// Working copy, mutated in place by the transform stage.
    pub path: PathBuf,
    /// Source it was taken from (for collision reports).
    pub origin: PathBuf,
    pub trim: bool,
    pub colorize: Option<ColorRamp>,
    pub tiers: BTreeSet<Tier>,
}

impl CanonicalSprite {
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// Two-point color ramp used to tint grayscale masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub shadow: [u8; 3],
    pub highlight: [u8; 3],
}

/// One packed image as reported by the packer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFrame {
    pub filename: String,
    pub frame: Rect,
}

/// Geometry manifest of a packed atlas, in packer order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub frames: Vec<ManifestFrame>,
}

impl AtlasManifest {
    pub fn get(&self, filename: &str) -> Option<&Rect> {
        self.frames
            .iter()
            .find(|f| f.filename == filename)
            .map(|f| &f.frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the first pair of overlapping frames, if any.
    pub fn find_overlap(&self) -> Option<(&ManifestFrame, &ManifestFrame)> {
        for (i, a) in self.frames.iter().enumerate() {
            for b in &self.frames[i + 1..] {
                if a.frame.overlaps(&b.frame) {
                    return Some((a, b));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0, 0, 32, 32);
        assert!(!a.overlaps(&Rect::new(32, 0, 32, 32)));
        assert!(!a.overlaps(&Rect::new(0, 32, 16, 16)));
        assert!(a.overlaps(&Rect::new(31, 31, 2, 2)));
    }

    #[test]
    fn tier_split_only_strips_known_suffixes() {
        assert_eq!(Tier::split("gui-small"), ("gui", Tier::Small));
        assert_eq!(Tier::split("item-smaller"), ("item-smaller", Tier::Normal));
        assert_eq!(Tier::Large.apply("entity-zombie"), "entity-zombie-large");
    }
}
