use std::collections::HashMap;

use crate::data_structures::batch::BatchDescriptor;

/**
 * A `Block` is the definition geometry shared by every instance that places it.
 *
 * Its batches keep the order they had in the scene. Besides plain geometry a
 * definition may contain nested instance batches, which place other blocks
 * inside this one.
 */
#[derive(Debug, Clone)]
pub struct Block<'a> {
    name: String,
    batches: Vec<BatchDescriptor<'a>>,
}

impl<'a> Block<'a> {
    fn new(name: String) -> Self {
        Self {
            name,
            batches: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batches(&self) -> &[BatchDescriptor<'a>] {
        &self.batches
    }
}

/// Block definitions of one load, looked up by name during expansion.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry<'a> {
    blocks: HashMap<String, Block<'a>>,
}

impl<'a> BlockRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Append `batch` to the definition it belongs to, creating the block on
     * first sight.
     *
     * Definition geometry goes to the block its key names; nested instances go
     * to their parent block. Anything else is top-level content and is handed
     * back unchanged.
     */
    pub fn register(&mut self, batch: BatchDescriptor<'a>) -> Option<BatchDescriptor<'a>> {
        let key = batch.key();
        let owner = if key.is_block_definition() {
            key.block_name.as_deref()
        } else if key.is_nested_instance() {
            key.parent_block.as_deref()
        } else {
            None
        };
        let Some(owner) = owner else {
            return Some(batch);
        };
        self.blocks
            .entry(owner.to_string())
            .or_insert_with(|| {
                log::debug!("registering block {:?}", owner);
                Block::new(owner.to_string())
            })
            .batches
            .push(batch);
        None
    }

    pub fn lookup(&self, name: &str) -> Option<&Block<'a>> {
        self.blocks.get(name)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
