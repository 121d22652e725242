//! Loading a scene into layers and entities.
//!
//! A [`Session`] is the owner of everything one load produces. Loading runs
//! in two passes over the scene's batches: the first builds a view of every
//! batch and files block definitions into the block registry, the second
//! expands the remaining top-level batches. Colors are contrast corrected
//! against the session's background before entities are stored.

use std::{rc::Rc, time::Duration};

use instant::Instant;

use crate::{
    context::Context,
    data_structures::{
        batch::BatchDescriptor,
        block::BlockRegistry,
        entity::Entity,
        layer::{DEFAULT_LAYER, Layer, LayerInfo, LayerRegistry},
    },
    error::Result,
    expand::InstanceExpander,
    resources::{Bounds, Origin, Scene},
};

/// Scene metadata handed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneInfo {
    pub origin: Origin,
    pub bounds: Option<Bounds>,
    pub has_missing_chars: bool,
}

/// Counters of one successful [`Session::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStats {
    pub batches: usize,
    pub blocks: usize,
    pub entities: usize,
    pub dangling_references: usize,
    pub elapsed: Duration,
}

/// Owner of one loaded scene.
///
/// The layer registry always holds the default layer `"0"`, also before the
/// first load and after `clear`.
#[derive(Debug)]
pub struct Session {
    context: Context,
    layers: LayerRegistry,
    entities: Vec<Rc<Entity>>,
    info: SceneInfo,
}

impl Session {
    pub fn new(context: Context) -> Self {
        let mut layers = LayerRegistry::new();
        layers.ensure_default();
        Self {
            context,
            layers,
            entities: Vec::new(),
            info: SceneInfo::default(),
        }
    }

    /**
     * Replace the session content with the entities of `scene`.
     *
     * Anything from a previous load is dropped first. If the scene violates
     * its buffer contract, or instancing goes wrong, the session is left
     * cleared and the error is returned.
     */
    pub fn load(&mut self, scene: &Scene) -> Result<LoadStats> {
        self.clear();
        let result = self.build(scene);
        if let Err(e) = &result {
            log::error!("failed to load scene: {}", e);
            self.clear();
        }
        result
    }

    fn build(&mut self, scene: &Scene) -> Result<LoadStats> {
        let start = Instant::now();

        // scene layers keep their own order, "0" included
        self.layers.clear();
        for record in &scene.layers {
            self.layers
                .register(record.name.clone(), record.display_name.clone(), record.color);
        }
        if self.layers.id(DEFAULT_LAYER).is_none() {
            log::warn!("scene has no layer \"{}\", adding a default one", DEFAULT_LAYER);
            self.layers.ensure_default();
        }

        let mut blocks = BlockRegistry::new();
        let mut top_level = Vec::new();
        for record in &scene.batches {
            let batch = BatchDescriptor::new(
                record,
                &scene.buffers,
                &self.layers,
                scene.point_shape_has_dot,
            )?;
            top_level.extend(blocks.register(batch));
        }

        let expander = InstanceExpander::new(&blocks, &self.layers);
        let mut entities = Vec::new();
        let mut dangling_references = 0;
        for batch in &top_level {
            let mut expansion = expander.expand(batch, None)?;
            for entity in expansion.by_ref() {
                entities.push(entity?);
            }
            dangling_references += expansion.dangling_references();
        }

        for mut entity in entities {
            entity.color = self.context.correct(entity.color);
            let layer = self.layers.id(&entity.layer);
            let entity = Rc::new(entity);
            self.layers.push_entity(layer, Rc::clone(&entity));
            self.entities.push(entity);
        }

        self.info = SceneInfo {
            origin: scene.origin,
            bounds: scene.bounds,
            has_missing_chars: scene.has_missing_chars,
        };

        let stats = LoadStats {
            batches: scene.batches.len(),
            blocks: blocks.len(),
            entities: self.entities.len(),
            dangling_references,
            elapsed: start.elapsed(),
        };
        log::info!(
            "loaded {} batches, {} blocks, {} entities on {} layers in {:?}",
            stats.batches,
            stats.blocks,
            stats.entities,
            self.layers.len(),
            stats.elapsed
        );
        if dangling_references > 0 {
            log::warn!("{} instances refer to unknown blocks", dangling_references);
        }
        Ok(stats)
    }

    /// All entities of the last load, in emission order.
    pub fn entities(&self) -> &[Rc<Entity>] {
        &self.entities
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Layers for display, with their colors corrected against the background.
    pub fn list_layers(&self) -> Vec<LayerInfo> {
        self.layers.list_layers(&self.context)
    }

    pub fn info(&self) -> &SceneInfo {
        &self.info
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Changing the background only affects loads that happen afterwards.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Release entities and the scene's layers. Only the default layer remains.
    pub fn dispose(&mut self) {
        self.layers.dispose();
        self.layers.clear();
        self.layers.ensure_default();
        self.entities.clear();
    }

    pub fn clear(&mut self) {
        self.dispose();
        self.info = SceneInfo::default();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Context::default())
    }
}

/// Install the platform logger: `env_logger` natively, the browser console on wasm.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("could not initialize logger: {}", e);
        }
    }
}
