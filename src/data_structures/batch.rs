//! Read-only views of one batch over the shared scene buffers.
//!
//! A [`BatchDescriptor`] never copies numeric data: its chunks and transforms
//! are slices borrowed from the [`SceneBuffers`] of the scene being loaded.
//! Every offset and size is validated once, here, so that expansion can read
//! the views without further checks.

use cgmath::{Point2, Vector2};

use crate::{
    data_structures::{
        instance::Instance,
        key::{BatchingKey, GeometryType},
        layer::{LayerId, LayerRegistry},
    },
    error::{BufferKind, EngineError, Result},
    resources::{BatchRecord, ChunkRecord, SceneBuffers},
};

/// Floats per block instance placement: two affine rows.
const BLOCK_TRANSFORM_STRIDE: usize = 6;
/// Floats per point instance translation.
const POINT_TRANSFORM_STRIDE: usize = 2;

/// One vertex run, optionally indexed. Yields exactly one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkView<'a> {
    vertices: &'a [f32],
    indices: Option<&'a [u16]>,
}

impl<'a> ChunkView<'a> {
    fn new(vertices: &'a [f32], indices: Option<&'a [u16]>, offset: usize) -> Result<Self> {
        if vertices.len() % 2 != 0 {
            return Err(EngineError::MalformedBuffer {
                buffer: BufferKind::Vertices,
                offset,
                size: vertices.len(),
                len: vertices.len() - 1,
            });
        }
        let chunk = Self { vertices, indices };
        let vertex_count = chunk.vertex_count();
        if let Some(&index) = indices
            .into_iter()
            .flatten()
            .find(|&&index| usize::from(index) >= vertex_count)
        {
            return Err(EngineError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(chunk)
    }

    fn from_record(record: &ChunkRecord, buffers: &'a SceneBuffers) -> Result<Self> {
        let vertices = buffers.vertex_view(record.vertices_offset, record.vertices_size)?;
        let indices = if record.indices_size > 0 {
            Some(buffers.index_view(record.indices_offset, record.indices_size)?)
        } else {
            None
        };
        Self::new(vertices, indices, record.vertices_offset)
    }

    pub fn vertices(&self) -> &'a [f32] {
        self.vertices
    }

    pub fn indices(&self) -> Option<&'a [u16]> {
        self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Number of points the chunk emits: its index count, or its vertex count if unindexed.
    pub fn point_count(&self) -> usize {
        self.indices.map_or(self.vertex_count(), <[u16]>::len)
    }

    fn vertex(&self, idx: usize) -> Point2<f32> {
        Point2::new(self.vertices[idx * 2], self.vertices[idx * 2 + 1])
    }

    /// Points in draw order, resolved through the index view when present.
    pub fn points(&self) -> Vec<Point2<f32>> {
        match self.indices {
            Some(indices) => indices
                .iter()
                .map(|&index| self.vertex(usize::from(index)))
                .collect(),
            None => (0..self.vertex_count()).map(|idx| self.vertex(idx)).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchDescriptor<'a> {
    key: &'a BatchingKey,
    chunks: Vec<ChunkView<'a>>,
    transforms: &'a [f32],
    layer: Option<LayerId>,
}

impl<'a> BatchDescriptor<'a> {
    /**
     * Build the views of `record` over `buffers`.
     *
     * Instance batches keep their placements in `transforms`; for point
     * instances with `point_shape_has_dot` set, the vertex segment is also
     * kept as the dot geometry drawn at every translation.
     */
    pub fn new(
        record: &'a BatchRecord,
        buffers: &'a SceneBuffers,
        layers: &LayerRegistry,
        point_shape_has_dot: bool,
    ) -> Result<Self> {
        let key = &record.key;
        let layer = key.layer_name.as_deref().and_then(|name| {
            let id = layers.id(name);
            if id.is_none() {
                log::warn!("batch refers to unknown layer {:?}", name);
            }
            id
        });

        let inline = match (record.vertices_offset, record.vertices_size) {
            (Some(offset), Some(size)) => Some((offset, buffers.vertex_view(offset, size)?)),
            _ => None,
        };
        let explicit_transforms = match (record.transforms_offset, record.transforms_size) {
            (Some(offset), Some(size)) => Some((offset, buffers.transform_view(offset, size)?)),
            _ => None,
        };

        // instance batches ignore chunk lists
        let mut chunks = Vec::new();
        let mut transforms: &'a [f32] = &[];
        match (key.geometry_type, &record.chunks) {
            (GeometryType::BlockInstance, _) => {
                let (offset, view) = inline.ok_or_else(|| missing_geometry(key))?;
                transforms = strided(view, BLOCK_TRANSFORM_STRIDE, offset)?;
            }
            (GeometryType::PointInstance, _) => {
                let (offset, view) = explicit_transforms
                    .or(inline)
                    .ok_or_else(|| missing_geometry(key))?;
                transforms = strided(view, POINT_TRANSFORM_STRIDE, offset)?;
                if point_shape_has_dot {
                    if let Some((offset, vertices)) = inline {
                        chunks.push(ChunkView::new(vertices, None, offset)?);
                    }
                }
            }
            (_, Some(records)) => {
                chunks = records
                    .iter()
                    .map(|chunk| ChunkView::from_record(chunk, buffers))
                    .collect::<Result<_>>()?;
            }
            (_, None) => {
                let (offset, vertices) = inline.ok_or_else(|| missing_geometry(key))?;
                chunks.push(ChunkView::new(vertices, None, offset)?);
            }
        }

        Ok(Self {
            key,
            chunks,
            transforms,
            layer,
        })
    }

    pub fn key(&self) -> &'a BatchingKey {
        self.key
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.key.geometry_type
    }

    pub fn is_instance(&self) -> bool {
        self.key.is_instance()
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn chunks(&self) -> &[ChunkView<'a>] {
        &self.chunks
    }

    /// Whether a point instance batch also draws its own point shape.
    pub fn has_dot(&self) -> bool {
        self.key.geometry_type == GeometryType::PointInstance && !self.chunks.is_empty()
    }

    /// Placements of an instance batch. Empty for ordinary geometry.
    pub fn instances(&self) -> Vec<Instance> {
        match self.key.geometry_type {
            GeometryType::BlockInstance => self
                .transforms
                .chunks_exact(BLOCK_TRANSFORM_STRIDE)
                .map(|rows| {
                    Instance::from_rows([rows[0], rows[1], rows[2], rows[3], rows[4], rows[5]])
                })
                .collect(),
            GeometryType::PointInstance => self
                .transforms
                .chunks_exact(POINT_TRANSFORM_STRIDE)
                .map(|offset| Instance::from_translation(Vector2::new(offset[0], offset[1])))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn strided(view: &[f32], stride: usize, offset: usize) -> Result<&[f32]> {
    if view.len() % stride != 0 {
        return Err(EngineError::MalformedBuffer {
            buffer: BufferKind::Transforms,
            offset,
            size: view.len(),
            len: view.len() - view.len() % stride,
        });
    }
    Ok(view)
}

fn missing_geometry(key: &BatchingKey) -> EngineError {
    EngineError::MissingGeometry {
        block: key.block_name.clone(),
        layer: key.layer_name.clone(),
    }
}
