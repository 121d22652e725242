#![allow(dead_code)]

use dxf_ngin::{
    BatchingKey, Rgb,
    data_structures::{
        batch::BatchDescriptor,
        block::BlockRegistry,
        layer::LayerRegistry,
    },
    error::Result,
    resources::{BatchRecord, ChunkRecord, LayerRecord, Scene, SceneBuffers},
};

pub const RED: u32 = 0xFF0000;
pub const GREEN: u32 = 0x00FF00;
pub const BLUE: u32 = 0x0000FF;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assembles a scene the way the batching stage would: every batch appends
/// its data to the two shared buffers and records where it went.
#[derive(Default)]
pub struct SceneBuilder {
    vertices: Vec<f32>,
    indices: Vec<u16>,
    batches: Vec<BatchRecord>,
    layers: Vec<LayerRecord>,
    point_shape_has_dot: bool,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, name: &str, color: u32) -> Self {
        self.layers.push(LayerRecord::new(name, Rgb::from_packed(color)));
        self
    }

    pub fn with_dot(mut self) -> Self {
        self.point_shape_has_dot = true;
        self
    }

    fn push_floats(&mut self, floats: impl IntoIterator<Item = f32>) -> (usize, usize) {
        let offset = self.vertices.len();
        self.vertices.extend(floats);
        (offset, self.vertices.len() - offset)
    }

    fn push_points(&mut self, points: &[[f32; 2]]) -> (usize, usize) {
        self.push_floats(points.iter().flatten().copied())
    }

    /// Batch with a single inline vertex segment.
    pub fn inline(mut self, key: BatchingKey, points: &[[f32; 2]]) -> Self {
        let (offset, size) = self.push_points(points);
        self.batches.push(BatchRecord::inline(key, offset, size));
        self
    }

    /// Batch with one unindexed chunk per point run.
    pub fn chunks(mut self, key: BatchingKey, runs: &[&[[f32; 2]]]) -> Self {
        let chunks = runs
            .iter()
            .map(|run| {
                let (vertices_offset, vertices_size) = self.push_points(run);
                ChunkRecord {
                    vertices_offset,
                    vertices_size,
                    indices_offset: 0,
                    indices_size: 0,
                }
            })
            .collect();
        self.batches.push(BatchRecord::chunked(key, chunks));
        self
    }

    pub fn indexed(mut self, key: BatchingKey, points: &[[f32; 2]], indices: &[u16]) -> Self {
        let (vertices_offset, vertices_size) = self.push_points(points);
        let indices_offset = self.indices.len();
        self.indices.extend_from_slice(indices);
        let chunk = ChunkRecord {
            vertices_offset,
            vertices_size,
            indices_offset,
            indices_size: indices.len(),
        };
        self.batches.push(BatchRecord::chunked(key, vec![chunk]));
        self
    }

    /// Block instance batch: each placement is `(a, b, tx, c, d, ty)`.
    pub fn block_instance(mut self, key: BatchingKey, placements: &[[f32; 6]]) -> Self {
        let (offset, size) = self.push_floats(placements.iter().flatten().copied());
        self.batches.push(BatchRecord::inline(key, offset, size));
        self
    }

    /// Point instance batch with its dot shape inline and translations in a transform segment.
    pub fn point_instance(
        mut self,
        key: BatchingKey,
        dot: &[[f32; 2]],
        translations: &[[f32; 2]],
    ) -> Self {
        let (dot_offset, dot_size) = self.push_points(dot);
        let (offset, size) = self.push_points(translations);
        self.batches
            .push(BatchRecord::inline(key, dot_offset, dot_size).with_transforms(offset, size));
        self
    }

    pub fn record(mut self, record: BatchRecord) -> Self {
        self.batches.push(record);
        self
    }

    pub fn build(self) -> Scene {
        Scene {
            buffers: SceneBuffers::new(self.vertices, self.indices),
            batches: self.batches,
            layers: self.layers,
            point_shape_has_dot: self.point_shape_has_dot,
            ..Scene::default()
        }
    }
}

pub fn layer_registry(scene: &Scene) -> LayerRegistry {
    let mut layers = LayerRegistry::new();
    for layer in &scene.layers {
        layers.register(layer.name.clone(), layer.display_name.clone(), layer.color);
    }
    layers
}

/// Run the first loading pass by hand: returns the block registry and the
/// batches left for top-level expansion.
pub fn first_pass<'a>(
    scene: &'a Scene,
    layers: &LayerRegistry,
) -> Result<(BlockRegistry<'a>, Vec<BatchDescriptor<'a>>)> {
    let mut blocks = BlockRegistry::new();
    let mut top_level = Vec::new();
    for record in &scene.batches {
        let batch =
            BatchDescriptor::new(record, &scene.buffers, layers, scene.point_shape_has_dot)?;
        top_level.extend(blocks.register(batch));
    }
    Ok((blocks, top_level))
}

pub fn translate(x: f32, y: f32) -> [f32; 6] {
    [1.0, 0.0, x, 0.0, 1.0, y]
}
