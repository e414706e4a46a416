//! Packing: building an archive model from disk or memory.

pub mod walker;

pub use walker::TreeWalker;
