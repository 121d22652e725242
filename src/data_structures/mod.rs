//! Engine data structures: batches, blocks, layers, instances and entities.
//!
//! - `key` holds the batching key a batch is grouped by, with its inheritable color
//! - `batch` contains zero-copy views of one batch over the shared scene buffers
//! - `block` is the block registry filled from block definition batches
//! - `layer` is the layer registry that also collects each layer's entities
//! - `instance` holds per-instance placement data
//! - `entity` is the resolved output record

pub mod batch;
pub mod block;
pub mod entity;
pub mod instance;
pub mod key;
pub mod layer;
