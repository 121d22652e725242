//! Layers and the per-load layer registry.

use std::{collections::HashMap, rc::Rc};

use crate::{color::Rgb, context::Context, data_structures::entity::Entity};

/// Name of the layer every DXF drawing has and every orphan entity lands on.
pub const DEFAULT_LAYER: &str = "0";

/// Index of a layer inside its [`LayerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub display_name: String,
    pub color: Rgb,
    entities: Vec<Rc<Entity>>,
}

impl Layer {
    pub fn new(name: impl Into<String>, display_name: Option<String>, color: Rgb) -> Self {
        let name = name.into();
        Self {
            display_name: display_name.unwrap_or_else(|| name.clone()),
            name,
            color,
            entities: Vec::new(),
        }
    }

    pub fn entities(&self) -> &[Rc<Entity>] {
        &self.entities
    }
}

/// What the UI gets to see of a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub display_name: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    by_name: HashMap<String, LayerId>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer. Registering a known name again replaces its attributes.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        display_name: Option<String>,
        color: Rgb,
    ) -> LayerId {
        let layer = Layer::new(name, display_name, color);
        match self.by_name.get(&layer.name) {
            Some(&id) => {
                let existing = &mut self.layers[id.0];
                existing.display_name = layer.display_name;
                existing.color = layer.color;
                id
            }
            None => {
                let id = LayerId(self.layers.len());
                self.by_name.insert(layer.name.clone(), id);
                self.layers.push(layer);
                id
            }
        }
    }

    /// Make sure layer `"0"` exists, synthesizing a black one if needed.
    pub fn ensure_default(&mut self) -> LayerId {
        if let Some(&id) = self.by_name.get(DEFAULT_LAYER) {
            return id;
        }
        self.register(DEFAULT_LAYER, None, Rgb::BLACK)
    }

    pub fn id(&self, name: &str) -> Option<LayerId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.id(name).map(|id| &self.layers[id.0])
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    /// Append an entity to `layer`, or to the default layer when there is none.
    pub fn push_entity(&mut self, layer: Option<LayerId>, entity: Rc<Entity>) {
        let id = match layer.filter(|id| id.0 < self.layers.len()) {
            Some(id) => id,
            None => self.ensure_default(),
        };
        self.layers[id.0].entities.push(entity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in registration order, with display colors contrast corrected.
    pub fn list_layers(&self, ctx: &Context) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .map(|layer| LayerInfo {
                name: layer.name.clone(),
                display_name: layer.display_name.clone(),
                color: ctx.correct(layer.color),
            })
            .collect()
    }

    /// Drop every layer's entities but keep the layers.
    pub fn dispose(&mut self) {
        self.layers
            .iter_mut()
            .for_each(|layer| layer.entities.clear());
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.by_name.clear();
    }
}
