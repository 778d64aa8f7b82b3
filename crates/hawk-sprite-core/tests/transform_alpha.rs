use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use hawk_sprite_core::intake::intake;
use hawk_sprite_core::transform::transform;
use hawk_sprite_core::{ColorRamp, MissingTargetPolicy, SpriteConfig, SpriteError};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn encode(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// `frames` stacked 16×16 frames, each filled with a different gray.
fn animation(frames: u32) -> RgbaImage {
    RgbaImage::from_fn(16, 16 * frames, |_, y| {
        let v = (y / 16 * 40) as u8;
        Rgba([v, v, v, 255])
    })
}

fn translucent_mask() -> RgbaImage {
    RgbaImage::from_fn(16, 16, |x, _| {
        if x < 8 {
            Rgba([0, 0, 0, 100])
        } else {
            Rgba([255, 255, 255, 0])
        }
    })
}

fn setup(entries: Vec<(&str, RgbaImage)>) -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let archive = tmp.path().join("resources.zip");
    let images = tmp.path().join("images");
    let work = tmp.path().join("work");
    fs::create_dir_all(&images).expect("mkdir");
    fs::create_dir_all(&work).expect("mkdir");
    let mut zip = zip::ZipWriter::new(fs::File::create(&archive).expect("create zip"));
    for (name, img) in entries {
        zip.start_file(
            format!("assets/minecraft/textures/block/{name}"),
            SimpleFileOptions::default(),
        )
        .expect("start entry");
        zip.write_all(&encode(img)).expect("write entry");
    }
    zip.finish().expect("finish zip");
    (tmp, archive, images, work)
}

fn dims(path: &Path) -> (u32, u32) {
    image::open(path).expect("open").dimensions()
}

const RAMP: ColorRamp = ColorRamp {
    shadow: [0x12, 0x2a, 0x6a],
    highlight: [0x3f, 0x76, 0xe4],
};

#[test]
fn trim_keeps_first_frame_and_colorize_keeps_alpha() {
    let (_tmp, archive, images, work) = setup(vec![
        ("lava_still.png", animation(4)),
        ("water_still.png", translucent_mask()),
        ("stone.png", animation(1)),
    ]);
    let cfg = SpriteConfig::builder()
        .trim_animations(["block-lava"])
        .no_colorize()
        .colorize("block-water", RAMP)
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    transform(&set, &cfg).expect("transform");

    let lava = set.get("block-lava").expect("lava");
    assert_eq!(dims(&lava.path), (16, 16));
    let first = image::open(&lava.path).expect("open").to_rgba8();
    assert!(first.pixels().all(|p| p.0 == [0, 0, 0, 255]));

    let water = image::open(&set.get("block-water").expect("water").path)
        .expect("open")
        .to_rgba8();
    assert_eq!(water.get_pixel(0, 0), &Rgba([0x12, 0x2a, 0x6a, 100]));
    assert_eq!(water.get_pixel(15, 0).0[3], 0);

    // Untargeted sprites are left alone.
    assert_eq!(dims(&set.get("block-stone").expect("stone").path), (16, 16));
}

#[test]
fn missing_trim_target_fails_by_default() {
    let (_tmp, archive, images, work) = setup(vec![("stone.png", animation(1))]);
    let cfg = SpriteConfig::builder()
        .trim_animations(["block-kelp"])
        .no_colorize()
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    match transform(&set, &cfg).expect_err("missing target") {
        SpriteError::MissingTarget { kind, name } => {
            assert_eq!(kind, "trim");
            assert_eq!(name, "block-kelp");
        }
        other => panic!("expected MissingTarget, got {other:?}"),
    }
}

#[test]
fn missing_targets_can_be_skipped() {
    let (_tmp, archive, images, work) = setup(vec![("stone.png", animation(2))]);
    let cfg = SpriteConfig::builder()
        .trim_animations(["block-kelp", "block-stone"])
        .no_colorize()
        .colorize("block-water", RAMP)
        .missing_targets(MissingTargetPolicy::Skip)
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    transform(&set, &cfg).expect("skip policy");
    assert_eq!(dims(&set.get("block-stone").expect("stone").path), (16, 16));
}

#[test]
fn colorize_keeps_alpha_of_every_pixel() {
    // Every alpha value from 0 to 255 appears once, over a gray gradient.
    let mask = RgbaImage::from_fn(16, 16, |x, y| {
        let v = ((x + y) * 8) as u8;
        Rgba([v, v, v, (x * 16 + y) as u8])
    });
    let (_tmp, archive, images, work) = setup(vec![("water_still.png", mask.clone())]);
    let cfg = SpriteConfig::builder()
        .trim_animations(Vec::<String>::new())
        .no_colorize()
        .colorize("block-water", RAMP)
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    transform(&set, &cfg).expect("transform");

    let water = image::open(&set.get("block-water").expect("water").path)
        .expect("open")
        .to_rgba8();
    assert_eq!(water.dimensions(), mask.dimensions());
    for (x, y, px) in water.enumerate_pixels() {
        assert_eq!(px.0[3], mask.get_pixel(x, y).0[3], "alpha at ({x}, {y})");
        for c in 0..3 {
            let (lo, hi) = (RAMP.shadow[c], RAMP.highlight[c]);
            assert!(
                (lo.min(hi)..=lo.max(hi)).contains(&px.0[c]),
                "channel {c} at ({x}, {y}) left the ramp"
            );
        }
    }
}
