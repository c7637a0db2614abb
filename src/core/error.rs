//! Error types for mesh loading, processing and export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the crate.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while reading, canonicalizing or writing meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed OBJ content.
    #[error("OBJ parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A face references a vertex that does not exist.
    #[error("face index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    /// A flattened vertex record carries fewer than three coordinates.
    #[error("vertex {index} has {len} components, expected at least 3")]
    MalformedVertex { index: usize, len: usize },

    /// Operation needs at least one vertex.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Bounding box has zero diagonal, so the mesh cannot be scaled.
    #[error("degenerate bounding box (zero extent)")]
    DegenerateBounds,

    /// Bit width that gives an empty or overflowing quantization grid.
    #[error("invalid quantization bit width {0}, expected 1..=30")]
    InvalidQuantizationBits(u32),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("artifact (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
