// src/api/mod.rs
// Resource client: one method per REST endpoint, no retry or interpretation

pub mod types;

pub use types::*;

use crate::transport::{CallResult, Transport};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Thin request-shape builder over the transport. Every method returns the
/// transport's envelope unchanged.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    transport: Arc<Transport>,
}

fn collection_path(identifier: &str) -> String {
    format!("/collections/{}", urlencoding::encode(identifier))
}

fn vectors_path(collection_id: &str, suffix: &str) -> String {
    format!("{}/{}", collection_path(collection_id), suffix)
}

impl ResourceClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> CallResult<T> {
        self.transport.call(path, Method::GET, None::<&()>, None).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> CallResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.transport.call(path, Method::POST, Some(body), None).await
    }

    // ========================================================================
    // Collections
    // ========================================================================

    pub async fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> CallResult<CollectionRecord> {
        self.post("/collections", request).await
    }

    /// `identifier` may be an id or a name; the service resolves either
    pub async fn get_collection(&self, identifier: &str) -> CallResult<CollectionRecord> {
        self.get(&collection_path(identifier)).await
    }

    pub async fn update_collection(
        &self,
        collection_id: &str,
        request: &UpdateCollectionRequest,
    ) -> CallResult<CollectionRecord> {
        self.post(&collection_path(collection_id), request).await
    }

    pub async fn delete_collection(&self, identifier: &str) -> CallResult<DeletedCollection> {
        self.transport
            .call(&collection_path(identifier), Method::DELETE, None::<&()>, None)
            .await
    }

    pub async fn list_collections(&self) -> CallResult<Vec<CollectionRecord>> {
        self.get("/collections").await
    }

    // ========================================================================
    // Vectors
    // ========================================================================

    pub async fn count_vectors(&self, collection_id: &str) -> CallResult<CountResponse> {
        self.get(&vectors_path(collection_id, "vectors/count")).await
    }

    pub async fn get_vectors(
        &self,
        collection_id: &str,
        request: &GetVectorsRequest,
    ) -> CallResult<Vec<VectorRecord>> {
        self.post(&vectors_path(collection_id, "vectors/get"), request).await
    }

    pub async fn list_vectors(
        &self,
        collection_id: &str,
        request: &ListVectorsRequest,
    ) -> CallResult<Vec<VectorRecord>> {
        self.post(&vectors_path(collection_id, "vectors/getAll"), request).await
    }

    pub async fn add_vectors(
        &self,
        collection_id: &str,
        vectors: &[NewVector],
    ) -> CallResult<Vec<VectorRecord>> {
        self.post(&vectors_path(collection_id, "vectors/create"), vectors).await
    }

    pub async fn add_text(
        &self,
        collection_id: &str,
        texts: &[NewTextVector],
    ) -> CallResult<Vec<VectorRecord>> {
        self.post(&vectors_path(collection_id, "vectors/create/text"), texts).await
    }

    pub async fn update_vectors(
        &self,
        collection_id: &str,
        patches: &[VectorPatch],
    ) -> CallResult<UpsertResponse> {
        self.post(&vectors_path(collection_id, "vectors/update"), patches).await
    }

    pub async fn delete_vectors(
        &self,
        collection_id: &str,
        request: &DeleteVectorsRequest,
    ) -> CallResult<DeletedVectors> {
        self.post(&vectors_path(collection_id, "vectors/delete"), request).await
    }

    /// One ranked result list per query vector
    pub async fn query_by_vector(
        &self,
        collection_id: &str,
        query: &QueryByVectorRequest,
    ) -> CallResult<Vec<Vec<VectorRecord>>> {
        self.post(&vectors_path(collection_id, "query"), query).await
    }

    /// One ranked result list per query text
    pub async fn query_by_text(
        &self,
        collection_id: &str,
        query: &QueryByTextRequest,
    ) -> CallResult<Vec<Vec<VectorRecord>>> {
        self.post(&vectors_path(collection_id, "query/text"), query).await
    }
}
