// src/lib.rs
// emno - client library for the emno vector database

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod policy;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use api::{
    Algo, CollectionConfig, CollectionRecord, CreateCollectionRequest, ListVectorsRequest,
    NewTextVector, NewVector, QueryByTextRequest, QueryByVectorRequest, UpdateCollectionRequest,
    VectorPatch, VectorRecord,
};
pub use client::Emno;
pub use config::EmnoConfig;
pub use error::{EmnoError, Result};
pub use models::{Collection, Vector};
pub use policy::ErrorPolicy;
pub use transport::{ErrorEnvelope, FailureKind, RetryPolicy};
