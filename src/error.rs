//! Error taxonomy for scene loading and instance expansion.
//!
//! Every variant here is fatal for the load that raised it. Dangling block
//! references are deliberately absent: they are tolerated and only logged.

use thiserror::Error;

/// Which of the shared scene buffers a view points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertices,
    Indices,
    Transforms,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferKind::Vertices => f.write_str("vertex"),
            BufferKind::Indices => f.write_str("index"),
            BufferKind::Transforms => f.write_str("transform"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// An instance batch was expanded while another instance was already active.
    #[error("instance of block {block:?} expanded inside an active instance context")]
    InvalidInstancing { block: Option<String> },

    /// A view declared by a batch record does not fit the shared buffer.
    #[error("{buffer} view at offset {offset} with size {size} exceeds buffer length {len}")]
    MalformedBuffer {
        buffer: BufferKind,
        offset: usize,
        size: usize,
        len: usize,
    },

    /// A chunk index addresses a vertex outside of its vertex view.
    #[error("index {index} out of range for chunk with {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },

    /// A batch record carries neither chunks nor inline vertex data.
    #[error("batch (block {block:?}, layer {layer:?}) has neither chunks nor vertex data")]
    MissingGeometry {
        block: Option<String>,
        layer: Option<String>,
    },

    /// A block instances itself, directly or through other blocks.
    #[error("block {block:?} references itself through nested instances")]
    CyclicBlockReference { block: String },

    #[error("invalid key color {0}")]
    InvalidColor(i64),

    #[error("invalid geometry type {0}")]
    InvalidGeometryType(u8),
}

pub type Result<T> = std::result::Result<T, EngineError>;
