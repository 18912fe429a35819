use tidescape_scene::SceneError;

use crate::AssetId;

/// Reasons an OBJ document cannot be read. Line numbers start at 1.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjError {
    #[error("line {line}: malformed number {token:?}")]
    Number { line: usize, token: String },
    #[error("line {line}: {kind} index {index} out of range ({available} available)")]
    Index {
        line: usize,
        kind: &'static str,
        index: i64,
        available: usize,
    },
    #[error("line {line}: face needs at least three vertices, got {found}")]
    ShortFace { line: usize, found: usize },
    #[error("line {line}: face vertex {token:?} has no position index")]
    MissingPosition { line: usize, token: String },
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("asset not found: {0:?}")]
    NotFound(AssetId),
    #[error("OBJ error: {0}")]
    Obj(#[from] ObjError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}
