// src/models/vector.rs
// Vector handle bound to the collection it was read from

use super::mapper::{merge_upsert, to_vectors};
use crate::api::{DeleteVectorsRequest, VectorPatch, VectorRecord};
use crate::client::Shared;
use crate::error::{EmnoError, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A stored vector. Query results also carry `distance` and `score`.
#[derive(Clone)]
pub struct Vector {
    pub id: Option<String>,
    pub content: String,
    pub metadata: Option<Value>,
    /// Empty unless values were requested or supplied
    pub values: Vec<f32>,
    pub distance: Option<f32>,
    pub score: Option<f32>,
    collection_id: String,
    shared: Arc<Shared>,
}

impl Vector {
    pub(crate) fn from_record(record: VectorRecord, collection_id: &str, shared: Arc<Shared>) -> Self {
        Self {
            id: record.id.filter(|id| !id.is_empty()),
            content: record.content,
            metadata: record.metadata,
            values: record.values.unwrap_or_default(),
            distance: record.distance,
            score: record.score,
            collection_id: collection_id.to_string(),
            shared,
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    pub fn to_record(&self) -> VectorRecord {
        VectorRecord {
            id: self.id.clone(),
            content: self.content.clone(),
            metadata: self.metadata.clone(),
            values: Some(self.values.clone()),
            distance: self.distance,
            score: self.score,
        }
    }

    fn bound_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or(EmnoError::Uninitialized("Vector"))
    }

    /// Apply a patch to this vector and return the stored result.
    ///
    /// ```ignore
    /// vector.update(|p| p.content("new text")).await?;
    /// ```
    pub async fn update<F>(&self, build: F) -> Result<Option<Vector>>
    where
        F: FnOnce(VectorPatch) -> VectorPatch,
    {
        let id = self.bound_id()?;
        let patch = build(VectorPatch::new(id));
        if let Some(content) = &patch.content {
            crate::api::types::require_content(content)?;
        }

        let outcome = self
            .shared
            .api
            .update_vectors(&self.collection_id, std::slice::from_ref(&patch))
            .await;
        let updated = self.shared.policy.resolve_map("update_vector", outcome, |response| {
            merge_upsert(response, &self.collection_id, &self.shared)
        })?;
        Ok(updated.and_then(|vectors| vectors.into_iter().next()))
    }

    /// Remove this vector from its collection
    pub async fn delete(&self) -> Result<Option<Vector>> {
        let id = self.bound_id()?;
        let request = DeleteVectorsRequest::ids(vec![id.to_string()]);
        let outcome = self.shared.api.delete_vectors(&self.collection_id, &request).await;
        let deleted = self.shared.policy.resolve_map("delete_vector", outcome, |response| {
            to_vectors(response.deleted, &self.collection_id, &self.shared)
        })?;
        Ok(deleted.and_then(|vectors| vectors.into_iter().next()))
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("id", &self.id)
            .field("collection_id", &self.collection_id)
            .field("content", &self.content)
            .field("metadata", &self.metadata)
            .field("values", &self.values.len())
            .field("distance", &self.distance)
            .field("score", &self.score)
            .finish()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.to_record()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Emno;
    use crate::config::EmnoConfig;
    use crate::test_support::Recorder;
    use crate::transport::RetryPolicy;
    use serde_json::json;

    fn shared(base: &str) -> Arc<Shared> {
        let config = EmnoConfig::new("tok")
            .with_base_url(base)
            .with_should_throw(true)
            .with_retry(RetryPolicy::none());
        Emno::new(config).unwrap().shared().clone()
    }

    fn vector(id: Option<&str>, shared: Arc<Shared>) -> Vector {
        let record = VectorRecord {
            id: id.map(String::from),
            content: "hello".into(),
            metadata: None,
            values: None,
            distance: None,
            score: None,
        };
        Vector::from_record(record, "c1", shared)
    }

    #[tokio::test]
    async fn test_update_sends_single_patch() {
        let reply = json!({"updated": [{"id": "v1", "content": "bye"}], "created": [], "errored": []});
        let (recorder, base) = Recorder::start(200, reply).await;
        let v = vector(Some("v1"), shared(&base));

        let updated = v.update(|p| p.content("bye")).await.unwrap().unwrap();
        assert_eq!(updated.content, "bye");
        assert_eq!(updated.collection_id(), "c1");

        let req = recorder.last();
        assert_eq!(req.path, "/collections/c1/vectors/update");
        assert_eq!(req.body, Some(json!([{"id": "v1", "content": "bye"}])));
    }

    #[tokio::test]
    async fn test_delete_by_own_id() {
        let reply = json!({"deleted": [{"id": "v1", "content": "hello"}]});
        let (recorder, base) = Recorder::start(200, reply).await;
        let v = vector(Some("v1"), shared(&base));

        let deleted = v.delete().await.unwrap().unwrap();
        assert_eq!(deleted.id.as_deref(), Some("v1"));
        assert_eq!(recorder.last().body, Some(json!({"ids": ["v1"]})));
    }

    #[tokio::test]
    async fn test_unbound_vector_is_rejected() {
        let (recorder, base) = Recorder::start(200, json!({})).await;
        let v = vector(None, shared(&base));
        let err = v.delete().await.unwrap_err();
        assert_eq!(err.to_string(), "Uninitialized Vector object");
        assert!(v.update(|p| p).await.is_err());
        assert!(recorder.requests().is_empty());
    }

    #[test]
    fn test_display_is_json() {
        let v = vector(Some("v1"), shared("http://127.0.0.1:1"));
        let parsed: Value = serde_json::from_str(&v.to_string()).unwrap();
        assert_eq!(parsed["id"], "v1");
        assert_eq!(parsed["content"], "hello");
        assert_eq!(parsed["values"], json!([]));
    }
}
