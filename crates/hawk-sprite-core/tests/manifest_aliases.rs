use hawk_sprite_core::manifest::emit;
use hawk_sprite_core::{AtlasManifest, IconIndex, ManifestFrame, Rect, SpriteConfig};

fn manifest(frames: &[(&str, Rect)]) -> AtlasManifest {
    AtlasManifest {
        frames: frames
            .iter()
            .map(|(f, r)| ManifestFrame {
                filename: f.to_string(),
                frame: *r,
            })
            .collect(),
    }
}

fn sample() -> AtlasManifest {
    manifest(&[
        ("block-stone.png", Rect::new(0, 0, 32, 32)),
        ("item-enchanted-book.png", Rect::new(32, 0, 32, 32)),
        ("item-enchanted-book-small.png", Rect::new(64, 0, 20, 20)),
        ("entity-zombie-large.png", Rect::new(0, 32, 64, 64)),
    ])
}

#[test]
fn aliases_copy_geometry_per_tier() {
    let out = emit(&sample(), &SpriteConfig::default());
    assert_eq!(out.icons, 4);
    assert_eq!(out.aliases, 2);
    assert_eq!(out.total(), 6);

    let rect_of = |name: &str| {
        out.rules
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.rect)
            .expect(name)
    };
    assert_eq!(rect_of("item-book-enchanted"), rect_of("item-enchanted-book"));
    assert_eq!(
        rect_of("item-book-enchanted-small"),
        rect_of("item-enchanted-book-small")
    );

    let alias = out
        .rules
        .iter()
        .find(|r| r.name == "item-book-enchanted-small")
        .expect("alias rule");
    assert_eq!(alias.alias_of.as_deref(), Some("item-enchanted-book-small"));
}

#[test]
fn alias_follows_its_canonical_rule() {
    let out = emit(&sample(), &SpriteConfig::default());
    let names: Vec<&str> = out.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "block-stone",
            "item-enchanted-book",
            "item-book-enchanted",
            "item-enchanted-book-small",
            "item-book-enchanted-small",
            "entity-zombie-large",
        ]
    );
}

#[test]
fn scss_and_index_list_the_same_names() {
    let out = emit(&sample(), &SpriteConfig::default());
    let scss = out.to_scss("hawk_sprite");
    assert!(scss.starts_with("// File automatically generated"));
    assert!(scss.contains("$hawk_sprite: (\n"));
    assert!(scss.trim_end().ends_with(");"));

    let scss_names: Vec<&str> = scss
        .lines()
        .filter_map(|l| l.trim_start().strip_prefix('"'))
        .filter_map(|l| l.split('"').next())
        .collect();
    let index = out.index();
    assert_eq!(scss_names, index.iter().collect::<Vec<_>>());
    assert!(index.contains("item-book-enchanted-small"));
}

#[test]
fn scss_lines_use_bare_zero_and_alias_comments() {
    let out = emit(&sample(), &SpriteConfig::default());
    let scss = out.to_scss("hawk_sprite");
    assert!(scss.contains(
        r#""block-stone": ("position": 0 0, "width": 32px, "height": 32px),"#
    ));
    assert!(scss.contains(
        r#""entity-zombie-large": ("position": 0 32px, "width": 64px, "height": 64px),"#
    ));
    assert!(scss.contains(
        r#""item-book-enchanted": ("position": 32px 0, "width": 32px, "height": 32px),  // Alias of item-enchanted-book"#
    ));
}

#[test]
fn index_file_is_read_back_by_the_runtime() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let path = tmp.path().join("icons.json");
    let index = emit(&sample(), &SpriteConfig::default()).index();
    index.save(&path).expect("save");
    let raw = std::fs::read_to_string(&path).expect("read");
    assert!(raw.starts_with(r#"{"icons":["#));
    assert_eq!(IconIndex::load(&path).expect("load"), index);

    let missing = IconIndex::load_or_empty(&tmp.path().join("nope.json")).expect("missing");
    assert!(missing.is_empty());
}
