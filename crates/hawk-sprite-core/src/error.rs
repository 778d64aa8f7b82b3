use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("The resources pack is not a valid ZIP file: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Sprite name collision on `{name}`: {} and {}", .first.display(), .second.display())]
    NameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("{kind} target `{name}` is not in the working set")]
    MissingTarget { kind: &'static str, name: String },
    #[error("`{tool}` failed ({status}): {detail}")]
    Tool {
        tool: String,
        status: String,
        detail: String,
    },
    #[error("Packer manifest mismatch: {0}")]
    ManifestMismatch(String),
}

pub type Result<T> = std::result::Result<T, SpriteError>;
