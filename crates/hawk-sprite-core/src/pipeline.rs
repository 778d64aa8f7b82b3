use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, instrument};

use crate::config::SpriteConfig;
use crate::error::{Result, SpriteError};
use crate::intake::intake;
use crate::manifest::emit;
use crate::packer::{AtlasPacker, ImageOptimizer, pack_verified};
use crate::scaling::scale;
use crate::transform::transform;

/// Inputs and outputs of one sprite build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Minecraft resources pack (ZIP).
    pub resources_pack: PathBuf,
    /// Loose images folder with `entities/` and `gui/` subfolders.
    pub images: PathBuf,
    pub output_sprite: PathBuf,
    pub output_scss: PathBuf,
    pub output_index: PathBuf,
    /// Skip lossless optimization of the atlas.
    pub fast: bool,
    /// Write the packer outputs and a preview map here instead of the
    /// production files.
    pub inspect_dir: Option<PathBuf>,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Intake,
    Transform,
    Scale,
    Pack,
    Optimize,
    Emit,
}

impl BuildStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Intake => "Processing icons from resources pack and images folder",
            Self::Transform => "Trimming animations and colorizing",
            Self::Scale => "Scaling icons",
            Self::Pack => "Building sprite",
            Self::Optimize => "Optimizing generated sprite (this can take a long time)",
            Self::Emit => "Generating SCSS and icon index",
        }
    }
}

/// Summary of a production build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub icons: usize,
    pub aliases: usize,
    pub sprite_bytes: u64,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.icons + self.aliases
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Written(BuildReport),
    /// Debug run: only the inspection directory was written.
    Inspected { dir: PathBuf },
}

/// External capabilities the pipeline drives.
pub struct Tools<'a> {
    pub packer: &'a dyn AtlasPacker,
    pub optimizer: &'a dyn ImageOptimizer,
}

/// Checks the input paths before any work is done.
pub fn validate_request(req: &BuildRequest) -> Result<()> {
    if !req.resources_pack.is_file() {
        return Err(SpriteError::InvalidInput(format!(
            "the resources pack {} doesn't exist or is not a file",
            req.resources_pack.display()
        )));
    }
    if !req.images.is_dir() {
        return Err(SpriteError::InvalidInput(format!(
            "the images directory {} doesn't exist or is not a directory",
            req.images.display()
        )));
    }
    Ok(())
}

/// Runs intake → transform → scale → pack → emit inside a temporary working
/// directory, then writes the three outputs.
///
/// Notes:
/// - Stages run strictly in sequence; each needs the complete file set of the previous one.
/// - Nothing outside the working directory is written until every stage succeeded;
///   the three outputs are staged next to their targets and renamed in at the end.
/// - The working directory is removed on every exit path.
#[instrument(skip_all)]
pub fn build(
    req: &BuildRequest,
    cfg: &SpriteConfig,
    tools: Tools<'_>,
    mut on_stage: impl FnMut(BuildStage),
) -> Result<BuildOutcome> {
    cfg.validate()?;
    validate_request(req)?;

    let work = tempfile::Builder::new().prefix("hawk-sprite-").tempdir()?;
    let images_dir = work.path().join("images");
    let final_dir = work.path().join("final");
    let packed_dir = work.path().join("packed");
    for dir in [&images_dir, &final_dir, &packed_dir] {
        fs::create_dir_all(dir)?;
    }

    on_stage(BuildStage::Intake);
    let set = intake(&req.resources_pack, &req.images, &images_dir, cfg)?;

    on_stage(BuildStage::Transform);
    transform(&set, cfg)?;

    on_stage(BuildStage::Scale);
    let files = scale(&set, &final_dir, cfg)?;

    on_stage(BuildStage::Pack);
    let packed = pack_verified(tools.packer, &final_dir, &packed_dir, &files)?;

    on_stage(BuildStage::Emit);
    let emitted = emit(&packed.manifest, cfg);
    let scss = emitted.to_scss(&cfg.map_name);

    if let Some(dir) = &req.inspect_dir {
        fs::create_dir_all(dir)?;
        copy_into(&packed.image, dir)?;
        copy_into(&packed.manifest_path, dir)?;
        fs::write(dir.join("icons_map.scss"), &scss)?;
        info!(dir = %dir.display(), "debug run: inspection files written, outputs untouched");
        return Ok(BuildOutcome::Inspected { dir: dir.clone() });
    }

    if !req.fast {
        on_stage(BuildStage::Optimize);
        tools.optimizer.optimize(&packed.image)?;
    }

    let sprite = fs::read(&packed.image)?;
    let sprite_bytes = sprite.len() as u64;
    let staged = vec![
        (stage(&req.output_sprite, &sprite)?, req.output_sprite.as_path()),
        (stage(&req.output_scss, scss.as_bytes())?, req.output_scss.as_path()),
        (
            stage(&req.output_index, emitted.index().to_json()?.as_bytes())?,
            req.output_index.as_path(),
        ),
    ];
    commit(staged)?;

    let report = BuildReport {
        icons: emitted.icons,
        aliases: emitted.aliases,
        sprite_bytes,
    };
    info!(
        icons = report.icons,
        aliases = report.aliases,
        total = report.total(),
        sprite_kib = report.sprite_bytes / 1024,
        "sprite generated"
    );
    Ok(BuildOutcome::Written(report))
}

/// Writes `contents` to a temporary file next to `target`.
fn stage(target: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;
    let mut file = tempfile::Builder::new()
        .prefix(".hawk-sprite-")
        .tempfile_in(parent)?;
    file.write_all(contents)?;
    Ok(file)
}

/// Moves every staged file onto its target. Targets are checked first so a
/// bad destination leaves all three outputs untouched.
fn commit(staged: Vec<(NamedTempFile, &Path)>) -> Result<()> {
    if let Some((_, target)) = staged.iter().find(|(_, target)| target.is_dir()) {
        return Err(SpriteError::InvalidInput(format!(
            "output {} is a directory",
            target.display()
        )));
    }
    for (file, target) in staged {
        file.persist(target).map_err(|e| e.error)?;
    }
    Ok(())
}

fn copy_into(file: &Path, dir: &Path) -> Result<()> {
    if let Some(name) = file.file_name() {
        fs::copy(file, dir.join(name))?;
    }
    Ok(())
}
