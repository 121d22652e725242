//! The scene as delivered by the batching stage, and helpers to load it.
//!
//! A [`Scene`] owns the two shared numeric buffers every batch points into.
//! Batch records only carry offsets and sizes (in elements, not bytes); the
//! views built from them borrow the scene and cannot outlive it.

pub mod buffers;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::{color::Rgb, data_structures::key::BatchingKey};

pub use buffers::SceneBuffers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub vertices_offset: usize,
    pub vertices_size: usize,
    #[serde(default)]
    pub indices_offset: usize,
    #[serde(default)]
    pub indices_size: usize,
}

/// One batch: either a chunk list or a single inline vertex segment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub key: BatchingKey,
    #[serde(default)]
    pub chunks: Option<Vec<ChunkRecord>>,
    #[serde(default)]
    pub vertices_offset: Option<usize>,
    #[serde(default)]
    pub vertices_size: Option<usize>,
    /// Point instance translations, as an offset into the vertex buffer.
    #[serde(default)]
    pub transforms_offset: Option<usize>,
    #[serde(default)]
    pub transforms_size: Option<usize>,
}

impl BatchRecord {
    pub fn chunked(key: BatchingKey, chunks: Vec<ChunkRecord>) -> Self {
        Self {
            key,
            chunks: Some(chunks),
            vertices_offset: None,
            vertices_size: None,
            transforms_offset: None,
            transforms_size: None,
        }
    }

    pub fn inline(key: BatchingKey, vertices_offset: usize, vertices_size: usize) -> Self {
        Self {
            key,
            chunks: None,
            vertices_offset: Some(vertices_offset),
            vertices_size: Some(vertices_size),
            transforms_offset: None,
            transforms_size: None,
        }
    }

    pub fn with_transforms(mut self, offset: usize, size: usize) -> Self {
        self.transforms_offset = Some(offset);
        self.transforms_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub color: Rgb,
}

impl LayerRecord {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Everything of a scene except its numeric buffers.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneHeader {
    pub batches: Vec<BatchRecord>,
    pub layers: Vec<LayerRecord>,
    pub origin: Origin,
    pub bounds: Option<Bounds>,
    pub has_missing_chars: bool,
    pub point_shape_has_dot: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub buffers: SceneBuffers,
    pub batches: Vec<BatchRecord>,
    pub layers: Vec<LayerRecord>,
    pub origin: Origin,
    pub bounds: Option<Bounds>,
    pub has_missing_chars: bool,
    pub point_shape_has_dot: bool,
}

impl Scene {
    pub fn from_parts(buffers: SceneBuffers, header: SceneHeader) -> Self {
        Self {
            buffers,
            batches: header.batches,
            layers: header.layers,
            origin: header.origin,
            bounds: header.bounds,
            has_missing_chars: header.has_missing_chars,
            point_shape_has_dot: header.point_shape_has_dot,
        }
    }

    pub fn from_json(header: &str, buffers: SceneBuffers) -> serde_json::Result<Self> {
        let header: SceneHeader = serde_json::from_str(header)?;
        Ok(Self::from_parts(buffers, header))
    }
}

/**
 * On-disk form of a scene: a JSON header naming two sibling binary files with
 * little-endian `f32` vertices and `u16` indices.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneManifest {
    #[serde(flatten)]
    header: SceneHeader,
    vertices_file: PathBuf,
    #[serde(default)]
    indices_file: Option<PathBuf>,
}

pub fn load_scene_file(manifest: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let manifest = manifest.as_ref();
    let text = std::fs::read_to_string(manifest)
        .with_context(|| format!("failed to read scene manifest {}", manifest.display()))?;
    let parsed: SceneManifest = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse scene manifest {}", manifest.display()))?;

    let base = manifest.parent().unwrap_or_else(|| Path::new("."));
    let vertex_path = base.join(&parsed.vertices_file);
    let vertex_bytes = std::fs::read(&vertex_path)
        .with_context(|| format!("failed to read vertex buffer {}", vertex_path.display()))?;
    let index_bytes = match &parsed.indices_file {
        Some(file) => {
            let index_path = base.join(file);
            std::fs::read(&index_path)
                .with_context(|| format!("failed to read index buffer {}", index_path.display()))?
        }
        None => Vec::new(),
    };

    let buffers = SceneBuffers::from_le_bytes(&vertex_bytes, &index_bytes)?;
    log::info!(
        "loaded scene manifest {} ({} batches, {} layers, {} vertex floats, {} indices)",
        manifest.display(),
        parsed.header.batches.len(),
        parsed.header.layers.len(),
        buffers.vertices().len(),
        buffers.indices().len()
    );
    Ok(Scene::from_parts(buffers, parsed.header))
}
