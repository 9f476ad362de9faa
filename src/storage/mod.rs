//! Storage capabilities consumed by the engine.
//!
//! Two traits define the seams: [`MemoryIndex`] (the session working set) and
//! [`DurableStore`] (the bounded persistence substrate). Default in-process
//! implementations are provided; applications with their own substrates
//! implement the traits instead.

pub mod durable_memory;
pub mod memory_index;
pub mod traits;

pub use durable_memory::BoundedDurableStore;
pub use memory_index::OrderedMemoryIndex;
pub use traits::{DurableError, DurableStore, MemoryIndex};
