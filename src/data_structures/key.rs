//! Batching keys as produced by the batching stage.

use serde::Deserialize;

use crate::{color::Rgb, error::EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum GeometryType {
    Points,
    Lines,
    IndexedLines,
    Triangles,
    IndexedTriangles,
    BlockInstance,
    PointInstance,
}

impl GeometryType {
    pub fn is_instance(self) -> bool {
        matches!(self, GeometryType::BlockInstance | GeometryType::PointInstance)
    }
}

impl TryFrom<u8> for GeometryType {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => GeometryType::Points,
            1 => GeometryType::Lines,
            2 => GeometryType::IndexedLines,
            3 => GeometryType::Triangles,
            4 => GeometryType::IndexedTriangles,
            5 => GeometryType::BlockInstance,
            6 => GeometryType::PointInstance,
            other => return Err(EngineError::InvalidGeometryType(other)),
        })
    }
}

/**
 * The color stored in a batching key.
 *
 * On the wire this is a single integer: `-1` inherits from the owning layer,
 * `-2` from the owning block instance, anything in `0..=0xFFFFFF` is a packed
 * RGB value. Neither inheriting form ever reaches an [`Entity`].
 *
 * [`Entity`]: crate::data_structures::entity::Entity
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum KeyColor {
    Rgb(Rgb),
    ByLayer,
    ByBlock,
}

impl KeyColor {
    pub const BY_LAYER_CODE: i64 = -1;
    pub const BY_BLOCK_CODE: i64 = -2;
}

impl TryFrom<i64> for KeyColor {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            KeyColor::BY_LAYER_CODE => Ok(KeyColor::ByLayer),
            KeyColor::BY_BLOCK_CODE => Ok(KeyColor::ByBlock),
            0..=0xFF_FFFF => Ok(KeyColor::Rgb(Rgb::from_packed(value as u32))),
            other => Err(EngineError::InvalidColor(other)),
        }
    }
}

impl From<Rgb> for KeyColor {
    fn from(rgb: Rgb) -> Self {
        KeyColor::Rgb(rgb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchingKey {
    pub geometry_type: GeometryType,
    #[serde(default)]
    pub layer_name: Option<String>,
    /// Definition geometry: the block it belongs to. Instances: the block they place.
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub parent_block: Option<String>,
    pub color: KeyColor,
}

impl BatchingKey {
    pub fn new(geometry_type: GeometryType, color: impl Into<KeyColor>) -> Self {
        Self {
            geometry_type,
            layer_name: None,
            block_name: None,
            parent_block: None,
            color: color.into(),
        }
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer_name = Some(layer.into());
        self
    }

    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block_name = Some(block.into());
        self
    }

    pub fn with_parent_block(mut self, parent: impl Into<String>) -> Self {
        self.parent_block = Some(parent.into());
        self
    }

    pub fn is_instance(&self) -> bool {
        self.geometry_type.is_instance()
    }

    /// Geometry that makes up a block definition rather than being drawn directly.
    pub fn is_block_definition(&self) -> bool {
        self.block_name.is_some() && !self.is_instance()
    }

    /// An instance placed inside another block's definition.
    pub fn is_nested_instance(&self) -> bool {
        self.is_instance() && self.parent_block.is_some()
    }
}
