use std::fs;
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use super::{AtlasPacker, PackedAtlas, output_path};
use crate::compositing::blit_rgba;
use crate::error::{Result, SpriteError};
use crate::intake::list_pngs;
use crate::model::{AtlasManifest, ManifestFrame, Rect};

/// In-process shelf packer: images are placed left to right in filename order,
/// opening a new row when the current one is full. Output follows the same
/// `<dir>.png` / `<dir>.json` layout as the external packer.
#[derive(Debug, Clone, Default)]
pub struct ShelfPacker {
    /// Pixels between frames.
    pub padding: u32,
}

impl ShelfPacker {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    /// Places `sizes` and returns the frames and the page size.
    pub fn layout(&self, sizes: &[(String, u32, u32)]) -> (Vec<ManifestFrame>, u32, u32) {
        let pad = self.padding;
        let area: u64 = sizes
            .iter()
            .map(|(_, w, h)| (*w + pad) as u64 * (*h + pad) as u64)
            .sum();
        let widest = sizes.iter().map(|(_, w, _)| *w).max().unwrap_or(0);
        let row_width = ((area as f64).sqrt().ceil() as u32).max(widest);

        let mut frames = Vec::with_capacity(sizes.len());
        let (mut x, mut y, mut shelf_h) = (0u32, 0u32, 0u32);
        let (mut page_w, mut page_h) = (0u32, 0u32);
        for (key, w, h) in sizes {
            if x > 0 && x + w > row_width {
                x = 0;
                y += shelf_h + pad;
                shelf_h = 0;
            }
            frames.push(ManifestFrame {
                filename: key.clone(),
                frame: Rect::new(x, y, *w, *h),
            });
            page_w = page_w.max(x + w);
            page_h = page_h.max(y + h);
            shelf_h = shelf_h.max(*h);
            x += w + pad;
        }
        (frames, page_w, page_h)
    }
}

impl AtlasPacker for ShelfPacker {
    fn name(&self) -> &str {
        "shelf"
    }

    fn pack(&self, images_dir: &Path, out_dir: &Path) -> Result<PackedAtlas> {
        let mut images: Vec<(String, RgbaImage)> = Vec::new();
        for path in list_pngs(images_dir)? {
            let key = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            images.push((key, image::open(&path)?.to_rgba8()));
        }
        if images.is_empty() {
            return Err(SpriteError::InvalidInput(format!(
                "nothing to pack in {}",
                images_dir.display()
            )));
        }

        let sizes: Vec<(String, u32, u32)> = images
            .iter()
            .map(|(k, img)| (k.clone(), img.width(), img.height()))
            .collect();
        let (frames, page_w, page_h) = self.layout(&sizes);

        let mut canvas = RgbaImage::new(page_w, page_h);
        for ((_, img), f) in images.iter().zip(&frames) {
            blit_rgba(img, &mut canvas, f.frame.x, f.frame.y);
        }
        debug!(frames = frames.len(), page_w, page_h, "shelf layout");

        fs::create_dir_all(out_dir)?;
        let image = output_path(images_dir, out_dir, "png");
        canvas.save(&image)?;
        let manifest = AtlasManifest { frames };
        let manifest_path = output_path(images_dir, out_dir, "json");
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
        Ok(PackedAtlas {
            image,
            manifest_path,
            manifest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_disjoint_and_in_input_order() {
        let sizes: Vec<(String, u32, u32)> = (0..7)
            .map(|i| (format!("s{i}.png"), 32 - i * 2, 16 + i * 3))
            .collect();
        let (frames, w, h) = ShelfPacker::new(1).layout(&sizes);
        let manifest = AtlasManifest { frames };
        assert!(manifest.find_overlap().is_none());
        for (f, (k, fw, fh)) in manifest.frames.iter().zip(&sizes) {
            assert_eq!(&f.filename, k);
            assert_eq!((f.frame.w, f.frame.h), (*fw, *fh));
            assert!(f.frame.x + f.frame.w <= w && f.frame.y + f.frame.h <= h);
        }
    }
}
