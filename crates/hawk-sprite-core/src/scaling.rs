//! Tier renditions. Pixel art is only ever resampled nearest-neighbor; GUI
//! icons are copied byte for byte.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{GenericImageView, ImageBuffer, RgbaImage};
use tracing::{debug, instrument};

use crate::config::SpriteConfig;
use crate::error::{Result, SpriteError};
use crate::intake::WorkingSet;
use crate::model::{CanonicalSprite, Namespace, Tier};

/// Integer upscale: every source pixel becomes a `factor`×`factor` block.
pub fn upscale(img: &RgbaImage, factor: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    ImageBuffer::from_fn(w * factor, h * factor, |x, y| {
        *img.get_pixel(x / factor, y / factor)
    })
}

/// Nearest-neighbor downscale by `ratio`, rounding the target size (minimum 1px).
pub fn downscale(img: &RgbaImage, ratio: f32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let tw = ((w as f32 * ratio).round() as u32).max(1);
    let th = ((h as f32 * ratio).round() as u32).max(1);
    imageops::resize(img, tw, th, FilterType::Nearest)
}

/// Writes every tier of every sprite into `final_dir` and returns the file
/// names produced, sorted.
#[instrument(skip_all)]
pub fn scale(set: &WorkingSet, final_dir: &Path, cfg: &SpriteConfig) -> Result<Vec<String>> {
    let mut produced = BTreeSet::new();
    for sprite in set.iter() {
        if sprite.namespace == Namespace::Gui {
            let path = claim(sprite, Tier::Normal, final_dir, &mut produced)?;
            fs::copy(&sprite.path, path)?;
            continue;
        }
        let native = image::open(&sprite.path)?.to_rgba8();
        let normal = upscale(&native, cfg.normal_scale);
        for tier in &sprite.tiers {
            let img = match tier {
                Tier::Normal => None,
                Tier::Large => Some(upscale(&normal, cfg.large_scale)),
                Tier::Small => Some(downscale(&normal, cfg.small_ratio)),
            };
            let path = claim(sprite, *tier, final_dir, &mut produced)?;
            img.as_ref().unwrap_or(&normal).save(path)?;
        }
    }
    debug!(files = produced.len(), "tiers written");
    Ok(produced.into_iter().collect())
}

/// Reserves the tier file name of `sprite` and returns where to write it.
fn claim(
    sprite: &CanonicalSprite,
    tier: Tier,
    final_dir: &Path,
    produced: &mut BTreeSet<String>,
) -> Result<PathBuf> {
    let file = format!("{}.png", tier.apply(&sprite.name));
    let path = final_dir.join(&file);
    // A native `x-small` sprite would clash with the small tier of `x`.
    if !produced.insert(file) {
        return Err(SpriteError::NameCollision {
            name: tier.apply(&sprite.name),
            first: path,
            second: sprite.origin.clone(),
        });
    }
    Ok(path)
}

/// Dimensions of a tier image on disk.
pub fn tier_dimensions(final_dir: &Path, name: &str) -> Result<(u32, u32)> {
    Ok(image::open(final_dir.join(format!("{name}.png")))?.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn upscale_duplicates_pixels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
        let out = upscale(&img, 2);
        assert_eq!(out.dimensions(), (4, 2));
        for y in 0..2 {
            assert_eq!(out.get_pixel(0, y), &Rgba([255, 0, 0, 255]));
            assert_eq!(out.get_pixel(1, y), &Rgba([255, 0, 0, 255]));
            assert_eq!(out.get_pixel(2, y), &Rgba([0, 0, 255, 128]));
            assert_eq!(out.get_pixel(3, y), &Rgba([0, 0, 255, 128]));
        }
    }

    #[test]
    fn downscale_rounds_target_size() {
        let img = RgbaImage::new(32, 32);
        assert_eq!(downscale(&img, 0.62).dimensions(), (20, 20));
        assert_eq!(downscale(&RgbaImage::new(1, 1), 0.1).dimensions(), (1, 1));
    }
}
