// src/models/mod.rs
// Stateful handles over collections and vectors

pub mod collection;
pub(crate) mod mapper;
pub mod vector;

pub use collection::Collection;
pub use vector::Vector;
