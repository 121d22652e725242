//! Per-instance placement of block geometry.
//!
//! Block instances carry one affine transform per placed copy, point
//! instances a plain translation. Nested instances compose their placements
//! with the enclosing ones the same way a scene graph composes world
//! transforms: `parent * local`.

use std::ops::Mul;

use cgmath::{Matrix3, Point2, SquareMatrix, Vector2, Vector3};

/// A 2D affine placement stored as a homogeneous 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub transform: Matrix3<f32>,
}

impl Instance {
    /// Identity placement (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            transform: Matrix3::identity(),
        }
    }

    pub fn from_translation(offset: Vector2<f32>) -> Self {
        Self {
            transform: Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, offset.x, offset.y, 1.0),
        }
    }

    /**
     * Build a placement from the two affine rows `(a, b, tx)` and `(c, d, ty)`
     * as they are packed into block instance buffers.
     */
    pub fn from_rows(rows: [f32; 6]) -> Self {
        let [a, b, tx, c, d, ty] = rows;
        // cgmath matrices are column-major
        Self {
            transform: Matrix3::new(a, c, 0.0, b, d, 0.0, tx, ty, 1.0),
        }
    }

    pub fn translation(&self) -> Vector2<f32> {
        Vector2::new(self.transform.z.x, self.transform.z.y)
    }

    pub fn transform_point(&self, point: Point2<f32>) -> Point2<f32> {
        let moved = self.transform * Vector3::new(point.x, point.y, 1.0);
        Point2::new(moved.x, moved.y)
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        Instance {
            transform: self.transform * rhs.transform,
        }
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        Instance {
            transform: self.transform * rhs.transform,
        }
    }
}

impl From<Vector2<f32>> for Instance {
    fn from(offset: Vector2<f32>) -> Self {
        Instance::from_translation(offset)
    }
}

/// Compose every enclosing placement with every local one, outer-major.
///
/// An empty side acts as a single identity placement.
pub fn compose(parents: &[Instance], locals: &[Instance]) -> Vec<Instance> {
    match (parents.is_empty(), locals.is_empty()) {
        (true, _) => locals.to_vec(),
        (false, true) => parents.to_vec(),
        (false, false) => parents
            .iter()
            .flat_map(|parent| locals.iter().map(move |local| parent * local))
            .collect(),
    }
}
