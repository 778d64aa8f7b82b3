//! Texture intake: enumerates the resources pack and the loose images folder,
//! applies exclusion and replacement rules, and copies survivors into the
//! working directory under their canonical name.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::config::{ReplacementRule, RuleOutcome, SpriteConfig};
use crate::error::{Result, SpriteError};
use crate::model::{CanonicalSprite, Namespace, SourceTexture, Tier};

/// Texture directories inside a resources pack, with the namespace they feed.
pub const PACK_TEXTURE_DIRS: [(&str, Namespace); 2] = [
    ("assets/minecraft/textures/block/", Namespace::Block),
    ("assets/minecraft/textures/item/", Namespace::Item),
];

/// Loose-folder subdirectories, with the namespace they feed.
pub const LOOSE_DIRS: [(&str, Namespace); 2] =
    [("entities", Namespace::Entity), ("gui", Namespace::Gui)];

/// Flat set of canonical sprites, keyed (and iterated) by name.
#[derive(Debug, Default)]
pub struct WorkingSet {
    sprites: BTreeMap<String, CanonicalSprite>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sprite; a second sprite under the same name is a data defect.
    pub fn insert(&mut self, sprite: CanonicalSprite) -> Result<()> {
        self.ensure_vacant(&sprite)?;
        self.sprites.insert(sprite.name.clone(), sprite);
        Ok(())
    }

    /// Fails if a sprite with the same name is already in the set.
    pub fn ensure_vacant(&self, sprite: &CanonicalSprite) -> Result<()> {
        match self.sprites.get(&sprite.name) {
            Some(existing) => Err(SpriteError::NameCollision {
                name: sprite.name.clone(),
                first: existing.origin.clone(),
                second: sprite.origin.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalSprite> {
        self.sprites.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalSprite> {
        self.sprites.values()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// True if `origin` ends with one of the configured exclusion suffixes.
pub fn is_excluded(origin: &str, exclusions: &[String]) -> bool {
    exclusions.iter().any(|suffix| origin.ends_with(suffix.as_str()))
}

/// Sprite filename for a raw pack filename, or `None` when a replacement rule discards it.
///
/// Only the first rule whose prefix matches is considered. Renamed files keep the
/// rule's name verbatim; others get underscores replaced with hyphens.
pub fn sprite_file_name(filename: &str, rules: &[ReplacementRule]) -> Option<String> {
    match rules.iter().find_map(|rule| rule.apply(filename)) {
        Some(RuleOutcome::Rename(name)) => Some(name),
        Some(RuleOutcome::Discard) => None,
        None => Some(filename.replace('_', "-")),
    }
}

/// `<namespace>-<stem>` for a sprite filename.
pub fn canonical_name(namespace: Namespace, sprite_file: &str) -> String {
    let stem = Path::new(sprite_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(sprite_file);
    format!("{}-{}", namespace.prefix(), stem)
}

/// Runs the whole intake stage into `work_dir`.
#[instrument(skip_all)]
pub fn intake(
    archive: &Path,
    images: &Path,
    work_dir: &Path,
    cfg: &SpriteConfig,
) -> Result<WorkingSet> {
    let mut set = WorkingSet::new();
    intake_pack(archive, work_dir, cfg, &mut set)?;
    for (sub, namespace) in LOOSE_DIRS {
        intake_loose(&images.join(sub), namespace, work_dir, cfg, &mut set)?;
    }
    info!(sprites = set.len(), "intake done");
    Ok(set)
}

/// Copies block and item textures out of the resources pack.
pub fn intake_pack(
    archive: &Path,
    work_dir: &Path,
    cfg: &SpriteConfig,
    set: &mut WorkingSet,
) -> Result<()> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;

    // Archive order is whatever the pack author's tool produced; sort for stable output.
    let mut entries: Vec<String> = zip.file_names().map(str::to_owned).collect();
    entries.sort();

    let mut excluded = 0usize;
    let mut discarded = 0usize;
    for entry in entries {
        let Some(source) = pack_source(&entry) else {
            continue;
        };
        if is_excluded(&entry, &cfg.exclusions) {
            debug!(%entry, "excluded");
            excluded += 1;
            continue;
        }
        let Some(sprite_file) = sprite_file_name(&source.filename, &cfg.replacements) else {
            discarded += 1;
            continue;
        };
        let name = canonical_name(source.namespace, &sprite_file);
        let path = work_dir.join(format!("{name}.png"));
        let sprite = new_sprite(name, &source, path, cfg);
        // Checked before writing so the first working copy is never overwritten.
        set.ensure_vacant(&sprite)?;
        let mut reader = zip.by_name(&entry)?;
        let mut out = fs::File::create(&sprite.path)?;
        std::io::copy(&mut reader, &mut out)?;
        set.insert(sprite)?;
    }
    debug!(excluded, discarded, "resources pack filtered");
    Ok(())
}

/// Copies the PNGs of one loose-folder subdirectory. Loose images never go
/// through replacement rules.
pub fn intake_loose(
    dir: &Path,
    namespace: Namespace,
    work_dir: &Path,
    cfg: &SpriteConfig,
    set: &mut WorkingSet,
) -> Result<()> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "no {namespace} icons folder");
        return Ok(());
    }
    for origin in list_pngs(dir)? {
        let filename = origin
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let source = SourceTexture {
            origin: origin.clone(),
            namespace,
            filename: filename.clone(),
        };
        let name = canonical_name(namespace, &filename.replace('_', "-"));
        let path = work_dir.join(format!("{name}.png"));
        let sprite = new_sprite(name, &source, path, cfg);
        set.ensure_vacant(&sprite)?;
        fs::copy(&origin, &sprite.path)?;
        set.insert(sprite)?;
    }
    Ok(())
}

/// PNG files directly inside `dir`, sorted by name.
pub fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut list = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_png(entry.path()) {
            list.push(entry.into_path());
        }
    }
    Ok(list)
}

fn is_png(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn pack_source(entry: &str) -> Option<SourceTexture> {
    PACK_TEXTURE_DIRS.iter().find_map(|(dir, namespace)| {
        let filename = entry.strip_prefix(dir)?;
        if filename.is_empty() || filename.contains('/') || !filename.ends_with(".png") {
            return None;
        }
        Some(SourceTexture {
            origin: PathBuf::from(entry),
            namespace: *namespace,
            filename: filename.to_string(),
        })
    })
}

fn new_sprite(
    name: String,
    source: &SourceTexture,
    path: PathBuf,
    cfg: &SpriteConfig,
) -> CanonicalSprite {
    let mut tiers = BTreeSet::from([Tier::Normal]);
    if source.namespace != Namespace::Gui {
        tiers.insert(Tier::Small);
        if source.namespace == Namespace::Entity || cfg.large_icons.contains(&name) {
            tiers.insert(Tier::Large);
        }
    }
    CanonicalSprite {
        trim: cfg.trim_animations.contains(&name),
        colorize: cfg.ramp_for(&name),
        name,
        namespace: source.namespace,
        path,
        origin: source.origin.clone(),
        tiers,
    }
}
