// src/models/collection.rs
// Collection handle: identity, index config, and the vector operations scoped to it

use super::Vector;
use super::mapper::{merge_upsert, to_ranked_lists, to_vectors};
use crate::api::types::{require_content, require_dim};
use crate::api::{
    CollectionConfig, CollectionRecord, DeleteVectorsRequest, GetVectorsRequest,
    ListVectorsRequest, NewTextVector, NewVector, QueryByTextRequest, QueryByVectorRequest,
    UpdateCollectionRequest, VectorPatch,
};
use crate::client::Shared;
use crate::error::{EmnoError, Result};
use std::fmt;
use std::sync::Arc;

/// A collection as last seen from the service.
///
/// Without an `id` the handle is unbound and every instance operation fails
/// with [`EmnoError::Uninitialized`] before touching the network.
#[derive(Clone)]
pub struct Collection {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub config: CollectionConfig,
    shared: Arc<Shared>,
}

impl Collection {
    pub(crate) fn from_record(record: CollectionRecord, shared: Arc<Shared>) -> Self {
        let mut collection = Self {
            id: None,
            name: String::new(),
            description: None,
            config: CollectionConfig::new(0),
            shared,
        };
        collection.populate(record);
        collection
    }

    fn populate(&mut self, record: CollectionRecord) {
        let CollectionRecord {
            id,
            name,
            description,
            config,
        } = record;
        // A bound handle never becomes unbound, even if an echo omits the id
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            self.id = Some(id);
        }
        self.name = name;
        self.description = description.filter(|d| !d.is_empty());
        self.config = config;
    }

    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    /// Plain data view of this handle
    pub fn to_record(&self) -> CollectionRecord {
        CollectionRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            config: self.config.clone(),
        }
    }

    fn bound_id(&self) -> Result<String> {
        self.id.clone().ok_or(EmnoError::Uninitialized("Collection"))
    }

    /// Rename or re-describe the collection. On success the handle takes the
    /// server-confirmed values.
    pub async fn update(&mut self, request: &UpdateCollectionRequest) -> Result<Option<&Self>> {
        let id = self.bound_id()?;
        request.validate()?;

        let outcome = self.shared.api.update_collection(&id, request).await;
        match self.shared.policy.resolve("update_collection", outcome)? {
            Some(record) => {
                self.populate(record);
                Ok(Some(self))
            }
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> Result<Option<u64>> {
        let id = self.bound_id()?;
        let outcome = self.shared.api.count_vectors(&id).await;
        self.shared
            .policy
            .resolve_map("count_vectors", outcome, |c| c.count)
    }

    /// Fetch vectors by id, in the order the service returns them
    pub async fn get_vectors(&self, ids: &[String], include_values: bool) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        if ids.is_empty() {
            return Err(EmnoError::InvalidInput("at least one vector id is required".into()));
        }
        let request = GetVectorsRequest {
            ids: ids.to_vec(),
            include_vector_values: include_values.then_some(true),
        };
        let outcome = self.shared.api.get_vectors(&id, &request).await;
        self.shared
            .policy
            .resolve_map("get_vectors", outcome, |records| to_vectors(records, &id, &self.shared))
    }

    /// One page of the collection in insertion order
    pub async fn list_vectors(&self, request: ListVectorsRequest) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        let outcome = self.shared.api.list_vectors(&id, &request).await;
        self.shared
            .policy
            .resolve_map("list_vectors", outcome, |records| to_vectors(records, &id, &self.shared))
    }

    pub async fn add_vectors(&self, vectors: &[NewVector]) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        for vector in vectors {
            require_content(&vector.content)?;
            require_dim(&vector.values, self.config.dim)?;
        }
        let outcome = self.shared.api.add_vectors(&id, vectors).await;
        self.shared
            .policy
            .resolve_map("add_vectors", outcome, |records| to_vectors(records, &id, &self.shared))
    }

    /// Add vectors whose embeddings the service computes from `content`
    pub async fn add_text(&self, texts: &[NewTextVector]) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        for text in texts {
            require_content(&text.content)?;
        }
        let outcome = self.shared.api.add_text(&id, texts).await;
        self.shared
            .policy
            .resolve_map("add_text", outcome, |records| to_vectors(records, &id, &self.shared))
    }

    /// Batch update. Returns updated vectors followed by created ones; entries
    /// the service rejected are logged and left out.
    pub async fn update_vectors(&self, patches: &[VectorPatch]) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        for patch in patches {
            if let Some(content) = &patch.content {
                require_content(content)?;
            }
            if let Some(values) = &patch.values {
                require_dim(values, self.config.dim)?;
            }
        }
        let outcome = self.shared.api.update_vectors(&id, patches).await;
        self.shared
            .policy
            .resolve_map("update_vectors", outcome, |response| {
                merge_upsert(response, &id, &self.shared)
            })
    }

    /// Returns the deleted vectors as echoed by the service
    pub async fn delete_vectors(&self, ids: &[String]) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        self.delete(&id, DeleteVectorsRequest::ids(ids.to_vec())).await
    }

    pub async fn delete_all_vectors(&self) -> Result<Option<Vec<Vector>>> {
        let id = self.bound_id()?;
        self.delete(&id, DeleteVectorsRequest::all()).await
    }

    async fn delete(&self, id: &str, request: DeleteVectorsRequest) -> Result<Option<Vec<Vector>>> {
        let outcome = self.shared.api.delete_vectors(id, &request).await;
        self.shared
            .policy
            .resolve_map("delete_vectors", outcome, |response| {
                to_vectors(response.deleted, id, &self.shared)
            })
    }

    /// Nearest neighbours for each query vector
    pub async fn query_by_vector(&self, query: &QueryByVectorRequest) -> Result<Option<Vec<Vec<Vector>>>> {
        let id = self.bound_id()?;
        for vector in &query.vectors {
            require_dim(vector, self.config.dim)?;
        }
        let outcome = self.shared.api.query_by_vector(&id, query).await;
        self.shared
            .policy
            .resolve_map("query_by_vector", outcome, |lists| to_ranked_lists(lists, &id, &self.shared))
    }

    /// Nearest neighbours for each query text, embedded server-side
    pub async fn query_by_text(&self, query: &QueryByTextRequest) -> Result<Option<Vec<Vec<Vector>>>> {
        let id = self.bound_id()?;
        for content in &query.content {
            require_content(content)?;
        }
        let outcome = self.shared.api.query_by_text(&id, query).await;
        self.shared
            .policy
            .resolve_map("query_by_text", outcome, |lists| to_ranked_lists(lists, &id, &self.shared))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("config", &self.config)
            .finish()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.to_record()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
