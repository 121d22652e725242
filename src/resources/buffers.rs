use crate::error::{BufferKind, EngineError};

/// The two shared numeric buffers of a scene.
///
/// All batch views are windows into this storage. It is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneBuffers {
    vertices: Vec<f32>,
    indices: Vec<u16>,
}

impl SceneBuffers {
    pub fn new(vertices: Vec<f32>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    /**
     * Copy raw little-endian byte buffers into aligned storage.
     *
     * Byte slices read from disk or received over the wire carry no alignment
     * guarantee, so they cannot be cast in place. This is the single copy a
     * scene's numeric data goes through.
     */
    pub fn from_le_bytes(vertices: &[u8], indices: &[u8]) -> Result<Self, EngineError> {
        let float_size = std::mem::size_of::<f32>();
        if vertices.len() % float_size != 0 {
            return Err(EngineError::MalformedBuffer {
                buffer: BufferKind::Vertices,
                offset: 0,
                size: vertices.len() / float_size + 1,
                len: vertices.len() / float_size,
            });
        }
        let index_size = std::mem::size_of::<u16>();
        if indices.len() % index_size != 0 {
            return Err(EngineError::MalformedBuffer {
                buffer: BufferKind::Indices,
                offset: 0,
                size: indices.len() / index_size + 1,
                len: indices.len() / index_size,
            });
        }

        let mut vertices: Vec<f32> = bytemuck::pod_collect_to_vec(vertices);
        let mut indices: Vec<u16> = bytemuck::pod_collect_to_vec(indices);
        if cfg!(target_endian = "big") {
            vertices
                .iter_mut()
                .for_each(|v| *v = f32::from_bits(v.to_bits().swap_bytes()));
            indices.iter_mut().for_each(|i| *i = i.swap_bytes());
        }
        Ok(Self { vertices, indices })
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_view(&self, offset: usize, size: usize) -> Result<&[f32], EngineError> {
        view(&self.vertices, BufferKind::Vertices, offset, size)
    }

    pub fn transform_view(&self, offset: usize, size: usize) -> Result<&[f32], EngineError> {
        view(&self.vertices, BufferKind::Transforms, offset, size)
    }

    pub fn index_view(&self, offset: usize, size: usize) -> Result<&[u16], EngineError> {
        view(&self.indices, BufferKind::Indices, offset, size)
    }
}

fn view<T>(buffer: &[T], kind: BufferKind, offset: usize, size: usize) -> Result<&[T], EngineError> {
    offset
        .checked_add(size)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(EngineError::MalformedBuffer {
            buffer: kind,
            offset,
            size,
            len: buffer.len(),
        })
}
