//! dxf-ngin
//!
//! The resolution stage of a 2D DXF viewer. A scene arrives already batched:
//! geometry of the same kind, layer, block and color shares one batch, and all
//! batches point into two shared numeric buffers. This crate turns such a
//! scene into drawable entities: it files block definitions, expands block and
//! point instances with their color and layer inheritance, and adjusts every
//! color so that it stays readable on the chosen background.
//!
//! High-level modules
//! - `color`: packed RGB colors, luminance math and contrast correction
//! - `context`: user options and the runtime context derived from them
//! - `data_structures`: batches, blocks, layers, placements and entities
//! - `expand`: instance expansion with color and layer inheritance
//! - `resources`: the scene input contract and manifest loading
//! - `session`: two-pass scene loading and the resulting entity store
//! - `error`: the engine's error type
//!

pub mod color;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod expand;
pub mod resources;
pub mod session;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Matrix3, Point2, Vector2};
pub use color::Rgb;
pub use context::{Context, Options};
pub use data_structures::{
    entity::Entity,
    key::{BatchingKey, GeometryType, KeyColor},
};
pub use error::{EngineError, Result};
pub use session::{LoadStats, Session};
