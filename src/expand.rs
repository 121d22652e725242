//! Instance expansion: from batches to resolved entities.
//!
//! Ordinary geometry turns into one [`Entity`] per chunk. Block and point
//! instances pull in the batches of the block they reference, resolving
//! color and layer inheritance on the way:
//!
//! - a definition color of "by block" takes the color of the instance
//! - a definition color of "by layer" takes the color of the instance's layer,
//!   falling back to the definition's own layer and finally to black
//! - the instance's layer, when it has one, replaces the definition's layer
//!
//! Expansion is driven by an explicit work stack instead of recursion, so
//! deeply nested blocks cannot overflow the call stack. Entities come out in
//! strict pre-order: definition batches in their original order, and an
//! instance's own point shape after everything its block produced.

use std::{collections::VecDeque, iter::FusedIterator, rc::Rc};

use crate::{
    color::Rgb,
    data_structures::{
        batch::BatchDescriptor,
        block::BlockRegistry,
        entity::Entity,
        instance::{Instance, compose},
        key::KeyColor,
        layer::{DEFAULT_LAYER, LayerId, LayerRegistry},
    },
    error::{EngineError, Result},
};

/// A resolved block or point instance that definition batches are expanded under.
///
/// Its color is always concrete and its placements are already composed with
/// every enclosing instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceContext {
    block: String,
    color: Rgb,
    layer: Option<LayerId>,
    instances: Vec<Instance>,
    parent: Option<Rc<InstanceContext>>,
}

impl InstanceContext {
    /// The block this instance places.
    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// The instance this one is nested in, if any.
    pub fn parent(&self) -> Option<&InstanceContext> {
        self.parent.as_deref()
    }

    /// Whether `block` is being expanded by this instance or one enclosing it.
    pub fn is_expanding(&self, block: &str) -> bool {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if ctx.block == block {
                return true;
            }
            current = ctx.parent();
        }
        false
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstanceExpander<'r, 'a> {
    blocks: &'r BlockRegistry<'a>,
    layers: &'r LayerRegistry,
}

impl<'r, 'a> InstanceExpander<'r, 'a> {
    pub fn new(blocks: &'r BlockRegistry<'a>, layers: &'r LayerRegistry) -> Self {
        Self { blocks, layers }
    }

    /**
     * Lazily expand `batch` into entities.
     *
     * `context` is the instance `batch` is being expanded under. Passing an
     * instance batch together with a context is double instancing and fails
     * right away; nested instances inside block definitions are resolved by
     * the expansion itself.
     */
    pub fn expand(
        &self,
        batch: &'r BatchDescriptor<'a>,
        context: Option<Rc<InstanceContext>>,
    ) -> Result<Expansion<'r, 'a>> {
        if batch.is_instance() && context.is_some() {
            return Err(EngineError::InvalidInstancing {
                block: batch.key().block_name.clone(),
            });
        }
        Ok(Expansion {
            expander: *self,
            stack: vec![Pending::Expand { batch, context }],
            ready: VecDeque::new(),
            dangling_references: 0,
        })
    }

    /// Eager form of [`expand`](Self::expand).
    pub fn expand_all(
        &self,
        batch: &'r BatchDescriptor<'a>,
        context: Option<Rc<InstanceContext>>,
    ) -> Result<Vec<Entity>> {
        self.expand(batch, context)?.collect()
    }

    /// Resolve an instance batch into the context its block is expanded under.
    pub fn instance_context(
        &self,
        instance: &BatchDescriptor<'a>,
        enclosing: Option<&Rc<InstanceContext>>,
    ) -> InstanceContext {
        let layer = enclosing.and_then(|ctx| ctx.layer).or(instance.layer());
        let color = match instance.key().color {
            KeyColor::Rgb(color) => color,
            KeyColor::ByLayer => self.layer_color(layer),
            KeyColor::ByBlock => match enclosing {
                Some(ctx) => ctx.color,
                None => self.layer_color(layer),
            },
        };
        let parents = enclosing.map_or(&[][..], |ctx| ctx.instances.as_slice());
        InstanceContext {
            block: instance.key().block_name.clone().unwrap_or_default(),
            color,
            layer,
            instances: compose(parents, &instance.instances()),
            parent: enclosing.cloned(),
        }
    }

    /// Color of a definition batch drawn as part of `instance`.
    pub fn resolve_instance_color(
        &self,
        definition: &BatchDescriptor<'a>,
        instance: &InstanceContext,
    ) -> Rgb {
        match definition.key().color {
            KeyColor::Rgb(color) => color,
            KeyColor::ByBlock => instance.color,
            KeyColor::ByLayer => self.layer_color(instance.layer.or(definition.layer())),
        }
    }

    /// Color of a batch drawn outside of any instance.
    ///
    /// With no block to inherit from, "by block" falls back to the layer.
    pub fn resolve_color(&self, batch: &BatchDescriptor<'a>) -> Rgb {
        match batch.key().color {
            KeyColor::Rgb(color) => color,
            KeyColor::ByLayer | KeyColor::ByBlock => self.layer_color(batch.layer()),
        }
    }

    fn layer_color(&self, layer: Option<LayerId>) -> Rgb {
        layer
            .and_then(|id| self.layers.layer(id))
            .map_or(Rgb::BLACK, |layer| layer.color)
    }

    fn emit(
        &self,
        batch: &BatchDescriptor<'a>,
        context: Option<&InstanceContext>,
        out: &mut VecDeque<Entity>,
    ) {
        let color = match context {
            Some(ctx) => self.resolve_instance_color(batch, ctx),
            None => self.resolve_color(batch),
        };
        let layer = context
            .and_then(|ctx| ctx.layer)
            .or(batch.layer())
            .and_then(|id| self.layers.layer(id))
            .map_or(DEFAULT_LAYER, |layer| layer.name.as_str());
        let instances = context.map(|ctx| ctx.instances.clone()).unwrap_or_default();
        let key = batch.key();

        out.extend(batch.chunks().iter().map(|chunk| Entity {
            vertices: chunk.points(),
            color,
            layer: layer.to_string(),
            geometry_type: key.geometry_type,
            block: key.block_name.clone(),
            parent_block: key.parent_block.clone(),
            instances: instances.clone(),
        }));
    }
}

enum Pending<'r, 'a> {
    /// Expand a batch, entering the instancing branch for instance batches.
    Expand {
        batch: &'r BatchDescriptor<'a>,
        context: Option<Rc<InstanceContext>>,
    },
    /// Emit an instance batch's own point shape as plain geometry.
    Dot {
        batch: &'r BatchDescriptor<'a>,
        context: Option<Rc<InstanceContext>>,
    },
}

/// Entities produced by one [`InstanceExpander::expand`] call.
///
/// Yields at most one error, after which it is exhausted.
pub struct Expansion<'r, 'a> {
    expander: InstanceExpander<'r, 'a>,
    stack: Vec<Pending<'r, 'a>>,
    ready: VecDeque<Entity>,
    dangling_references: usize,
}

impl<'r, 'a> Expansion<'r, 'a> {
    /// Instances seen so far whose block does not exist.
    pub fn dangling_references(&self) -> usize {
        self.dangling_references
    }

    fn step(&mut self, pending: Pending<'r, 'a>) -> Result<()> {
        match pending {
            Pending::Dot { batch, context } => {
                self.expander.emit(batch, context.as_deref(), &mut self.ready);
            }
            Pending::Expand { batch, context } if batch.is_instance() => {
                self.enter_instance(batch, context)?;
            }
            Pending::Expand { batch, context } => {
                self.expander.emit(batch, context.as_deref(), &mut self.ready);
            }
        }
        Ok(())
    }

    fn enter_instance(
        &mut self,
        batch: &'r BatchDescriptor<'a>,
        enclosing: Option<Rc<InstanceContext>>,
    ) -> Result<()> {
        let blocks = self.expander.blocks;
        let name = batch.key().block_name.as_deref();
        let Some((name, block)) =
            name.and_then(|name| blocks.lookup(name).map(|block| (name, block)))
        else {
            self.dangling_references += 1;
            log::warn!("instance refers to unknown block {:?}, skipping", name);
            return Ok(());
        };
        if enclosing
            .as_ref()
            .is_some_and(|ctx| ctx.is_expanding(name))
        {
            return Err(EngineError::CyclicBlockReference {
                block: name.to_string(),
            });
        }

        let context = Rc::new(self.expander.instance_context(batch, enclosing.as_ref()));
        if batch.has_dot() {
            self.stack.push(Pending::Dot {
                batch,
                context: enclosing,
            });
        }
        self.stack.extend(block.batches().iter().rev().map(|child| Pending::Expand {
            batch: child,
            context: Some(Rc::clone(&context)),
        }));
        Ok(())
    }
}

impl<'r, 'a> Iterator for Expansion<'r, 'a> {
    type Item = Result<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entity) = self.ready.pop_front() {
                return Some(Ok(entity));
            }
            let pending = self.stack.pop()?;
            if let Err(e) = self.step(pending) {
                self.stack.clear();
                self.ready.clear();
                return Some(Err(e));
            }
        }
    }
}

impl FusedIterator for Expansion<'_, '_> {}
