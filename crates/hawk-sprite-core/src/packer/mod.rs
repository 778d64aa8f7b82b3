use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use crate::error::{Result, SpriteError};
use crate::model::AtlasManifest;

pub mod glue;
pub mod optimize;
pub mod shelf;

pub use glue::GluePacker;
pub use optimize::{ImageOptimizer, OptiPng};
pub use shelf::ShelfPacker;

/// Atlas image plus the geometry of every file packed into it.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    pub image: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: AtlasManifest,
}

/// Packs a directory of uniquely named images into one atlas.
///
/// Implementations write their outputs under `out_dir` and must report every
/// input file under its exact filename; filenames are the join key with the
/// emitter.
pub trait AtlasPacker {
    fn name(&self) -> &str;
    fn pack(&self, images_dir: &Path, out_dir: &Path) -> Result<PackedAtlas>;
}

/// Runs `packer` and checks its manifest against the submitted files.
#[instrument(skip_all, fields(packer = packer.name()))]
pub fn pack_verified(
    packer: &dyn AtlasPacker,
    images_dir: &Path,
    out_dir: &Path,
    submitted: &[String],
) -> Result<PackedAtlas> {
    let packed = packer.pack(images_dir, out_dir)?;
    verify_manifest(&packed.manifest, submitted)?;
    debug!(frames = packed.manifest.len(), "manifest verified");
    Ok(packed)
}

/// One entry per submitted file, nothing else, and no overlapping rectangles.
pub fn verify_manifest(manifest: &AtlasManifest, submitted: &[String]) -> Result<()> {
    let expected: HashSet<&str> = submitted.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(manifest.len());
    for frame in &manifest.frames {
        let name = frame.filename.as_str();
        if !expected.contains(name) {
            return Err(SpriteError::ManifestMismatch(format!(
                "`{name}` was not submitted"
            )));
        }
        if !seen.insert(name) {
            return Err(SpriteError::ManifestMismatch(format!(
                "`{name}` is listed twice"
            )));
        }
    }
    if let Some(missing) = submitted.iter().find(|f| !seen.contains(f.as_str())) {
        return Err(SpriteError::ManifestMismatch(format!(
            "`{missing}` is missing from the manifest"
        )));
    }
    if let Some((a, b)) = manifest.find_overlap() {
        return Err(SpriteError::ManifestMismatch(format!(
            "`{}` overlaps `{}`",
            a.filename, b.filename
        )));
    }
    Ok(())
}

/// Reads a `{frames: [{filename, frame: {x, y, w, h}}]}` manifest.
pub fn read_manifest(path: &Path) -> Result<AtlasManifest> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Runs an external tool to completion; a spawn failure or non-zero exit is
/// reported with the tool's stderr.
pub(crate) fn run_tool(tool: &str, command: &mut Command) -> Result<()> {
    debug!(?command, "running {tool}");
    let output = command.output().map_err(|e| SpriteError::Tool {
        tool: tool.into(),
        status: "not started".into(),
        detail: e.to_string(),
    })?;
    if output.status.success() {
        return Ok(());
    }
    Err(SpriteError::Tool {
        tool: tool.into(),
        status: output.status.to_string(),
        detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// `<dir name>.<ext>` inside `out_dir`, the naming convention of the external packer.
pub(crate) fn output_path(images_dir: &Path, out_dir: &Path, ext: &str) -> PathBuf {
    let stem = images_dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("sprite");
    out_dir.join(format!("{stem}.{ext}"))
}
