use std::fs;
use std::path::{Path, PathBuf};

use hawk_sprite_core::intake::intake;
use hawk_sprite_core::scaling::{scale, tier_dimensions};
use hawk_sprite_core::{SpriteConfig, SpriteError};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// Builds an empty resources pack and a loose images folder.
fn setup(loose: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf, PathBuf, PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let archive = tmp.path().join("resources.zip");
    let mut zip = zip::ZipWriter::new(fs::File::create(&archive).expect("create zip"));
    zip.add_directory("assets/minecraft/textures/block/", zip::write::SimpleFileOptions::default())
        .expect("dir entry");
    zip.finish().expect("finish zip");

    let images = tmp.path().join("images");
    for (sub, name) in loose {
        let dir = images.join(sub);
        fs::create_dir_all(&dir).expect("mkdir");
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        img.save(dir.join(name)).expect("save png");
    }
    let work = tmp.path().join("work");
    let final_dir = tmp.path().join("final");
    fs::create_dir_all(&work).expect("mkdir");
    fs::create_dir_all(&final_dir).expect("mkdir");
    (tmp, archive, images, work, final_dir)
}

fn on_disk(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn each_namespace_gets_its_tiers() {
    let (_tmp, archive, images, work, final_dir) =
        setup(&[("entities", "zombie.png"), ("gui", "heart_full.png")]);
    let cfg = SpriteConfig::builder()
        .trim_animations(Vec::<String>::new())
        .no_colorize()
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    let produced = scale(&set, &final_dir, &cfg).expect("scale");

    assert_eq!(
        produced,
        vec![
            "entity-zombie-large.png",
            "entity-zombie-small.png",
            "entity-zombie.png",
            "gui-heart-full.png",
        ]
    );
    assert_eq!(produced, on_disk(&final_dir));

    assert_eq!(tier_dimensions(&final_dir, "entity-zombie").expect("normal"), (32, 32));
    assert_eq!(tier_dimensions(&final_dir, "entity-zombie-large").expect("large"), (64, 64));
    assert_eq!(tier_dimensions(&final_dir, "entity-zombie-small").expect("small"), (20, 20));
    assert_eq!(tier_dimensions(&final_dir, "gui-heart-full").expect("gui"), (16, 16));
}

#[test]
fn upscaled_tiers_stay_pixel_exact() {
    let (_tmp, archive, images, work, final_dir) = setup(&[("entities", "zombie.png")]);
    let cfg = SpriteConfig::builder()
        .trim_animations(Vec::<String>::new())
        .no_colorize()
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    scale(&set, &final_dir, &cfg).expect("scale");

    let large = image::open(final_dir.join("entity-zombie-large.png"))
        .expect("open")
        .to_rgba8();
    // Native pixel (0,0) is opaque, (1,0) transparent: 4x4 blocks in the large tier.
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(large.get_pixel(x, y), &Rgba([200, 30, 30, 255]));
            assert_eq!(large.get_pixel(x + 4, y).0[3], 0);
        }
    }
}

#[test]
fn native_small_suffix_clashes_with_small_tier() {
    let (_tmp, archive, images, work, final_dir) =
        setup(&[("entities", "zombie.png"), ("entities", "zombie_small.png")]);
    let cfg = SpriteConfig::builder()
        .trim_animations(Vec::<String>::new())
        .no_colorize()
        .build();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    match scale(&set, &final_dir, &cfg).expect_err("clash") {
        SpriteError::NameCollision { name, .. } => assert_eq!(name, "entity-zombie-small"),
        other => panic!("expected NameCollision, got {other:?}"),
    }
}

#[test]
fn gui_icons_are_copied_byte_for_byte() {
    let (_tmp, archive, images, work, final_dir) = setup(&[]);
    let gui = images.join("gui");
    fs::create_dir_all(&gui).expect("mkdir");
    // 16-bit channels would be narrowed by a decode and re-encode.
    let deep: image::ImageBuffer<Rgba<u16>, Vec<u16>> =
        image::ImageBuffer::from_fn(9, 9, |x, y| Rgba([x as u16 * 7001, y as u16 * 513, 65535, 40000]));
    deep.save(gui.join("heart_half.png")).expect("save 16-bit png");

    let cfg = SpriteConfig::default();
    let set = intake(&archive, &images, &work, &cfg).expect("intake");
    let produced = scale(&set, &final_dir, &cfg).expect("scale");
    assert_eq!(produced, vec!["gui-heart-half.png"]);
    assert_eq!(
        fs::read(final_dir.join("gui-heart-half.png")).expect("scaled"),
        fs::read(gui.join("heart_half.png")).expect("source")
    );
}
