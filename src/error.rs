use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

/// Everything the editor core can reject.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("layer index {index} out of range (have {len} layers)")]
    InvalidIndex { index: usize, len: usize },

    #[error("cannot delete the last remaining layer")]
    InvalidLastLayer,

    /// Seed point outside the layer. Callers recover from this locally.
    #[error("flood fill cannot start at ({x}, {y})")]
    FillFailure { x: i32, y: i32 },

    #[error("failed to export {path:?}: {reason}")]
    ExportFailure { path: PathBuf, reason: String },

    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
