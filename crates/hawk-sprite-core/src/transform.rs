//! Per-sprite transforms applied in native pixel space, before any scaling.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use tracing::{debug, instrument, warn};

use crate::config::{MissingTargetPolicy, SpriteConfig};
use crate::error::{Result, SpriteError};
use crate::intake::WorkingSet;
use crate::model::ColorRamp;

/// Keeps the top-left `size`×`size` square, dropping stacked animation frames.
pub fn trim_animation(img: &DynamicImage, size: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    img.crop_imm(0, 0, size.min(w), size.min(h))
}

/// Luma of an sRGB pixel (ITU-R 601-2 weights, as most image tools use for grayscale).
pub fn luminance(px: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    let l = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000;
    l.min(255) as u8
}

/// Maps the grayscale signal of `img` onto `ramp`, keeping alpha untouched.
pub fn colorize(img: &RgbaImage, ramp: &ColorRamp) -> RgbaImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let l = luminance(px) as u32;
        let alpha = px.0[3];
        let mut rgb = [0u8; 3];
        for (c, slot) in rgb.iter_mut().enumerate() {
            let lo = ramp.shadow[c] as i32;
            let hi = ramp.highlight[c] as i32;
            // rounded lo + (hi - lo) * l / 255
            let v = lo * 255 + (hi - lo) * l as i32;
            *slot = ((v + 127) / 255).clamp(0, 255) as u8;
        }
        *px = Rgba([rgb[0], rgb[1], rgb[2], alpha]);
    }
    out
}

/// Applies trims then colorization to the working copies, in place.
#[instrument(skip_all)]
pub fn transform(set: &WorkingSet, cfg: &SpriteConfig) -> Result<()> {
    check_targets(set, "trim", &cfg.trim_animations, cfg.missing_targets)?;
    let colorize_targets: Vec<String> = cfg.colorize.iter().map(|r| r.sprite.clone()).collect();
    check_targets(set, "colorize", &colorize_targets, cfg.missing_targets)?;

    let mut trimmed = 0usize;
    let mut colorized = 0usize;
    for sprite in set.iter().filter(|s| s.trim || s.colorize.is_some()) {
        let mut img = image::open(&sprite.path)?;
        if sprite.trim {
            img = trim_animation(&img, cfg.native_size);
            trimmed += 1;
        }
        if let Some(ramp) = &sprite.colorize {
            img = DynamicImage::ImageRgba8(colorize(&img.to_rgba8(), ramp));
            colorized += 1;
        }
        img.save(&sprite.path)?;
    }
    debug!(trimmed, colorized, "transforms applied");
    Ok(())
}

fn check_targets(
    set: &WorkingSet,
    kind: &'static str,
    names: &[String],
    policy: MissingTargetPolicy,
) -> Result<()> {
    for name in names.iter().filter(|n| !set.contains(n)) {
        match policy {
            MissingTargetPolicy::Fail => {
                return Err(SpriteError::MissingTarget {
                    kind,
                    name: name.clone(),
                });
            }
            MissingTargetPolicy::Skip => warn!(%name, "{kind} target not found, skipped"),
        }
    }
    Ok(())
}
