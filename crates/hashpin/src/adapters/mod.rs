//! # Adapters
//!
//! Concrete implementations of the ports shipped with the library.

pub mod memory;

pub use memory::MemoryStore;
