//! The engine's output unit.

use cgmath::Point2;

use crate::{
    color::Rgb,
    data_structures::{instance::Instance, key::GeometryType},
};

/// A run of points with a fully resolved color, ready to be drawn.
///
/// `block` and `parent_block` are copied from the originating batch key for
/// traceability only.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub vertices: Vec<Point2<f32>>,
    pub color: Rgb,
    pub layer: String,
    pub geometry_type: GeometryType,
    pub block: Option<String>,
    pub parent_block: Option<String>,
    /// Placements of the geometry in drawing space. Empty when drawn as is.
    pub instances: Vec<Instance>,
}

impl Entity {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices of every placed copy, in placement order.
    pub fn placed_vertices(&self) -> Vec<Point2<f32>> {
        if self.instances.is_empty() {
            return self.vertices.clone();
        }
        self.instances
            .iter()
            .flat_map(|instance| {
                self.vertices
                    .iter()
                    .map(move |&vertex| instance.transform_point(vertex))
            })
            .collect()
    }
}
