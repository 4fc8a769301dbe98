//! # Domain Logic
//!
//! Pure data model and the algorithms over it. Nothing here performs I/O
//! beyond the `ObjectStore` port it is handed.

pub mod chain;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod tree;
pub mod verify;
