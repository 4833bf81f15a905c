// src/client.rs
// Entry point: configuration, shared plumbing, and collection-level operations

use crate::api::{CollectionRecord, CreateCollectionRequest, ResourceClient};
use crate::config::EmnoConfig;
use crate::error::Result;
use crate::models::Collection;
use crate::models::mapper::{to_collection, to_collections};
use crate::policy::ErrorPolicy;
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// State every handle needs to issue calls. Built once per [`Emno`] and
/// shared read-only.
pub(crate) struct Shared {
    pub(crate) api: ResourceClient,
    pub(crate) policy: ErrorPolicy,
    config: EmnoConfig,
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("base_url", &self.config.base_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Client for the emno vector database.
///
/// ```ignore
/// let emno = Emno::new(EmnoConfig::new(token).with_should_throw(true))?;
/// let docs = emno.get_collection("docs").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Emno {
    shared: Arc<Shared>,
}

impl Emno {
    pub fn new(config: EmnoConfig) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;
        debug!(base_url = transport.base_url(), "emno client ready");
        Ok(Self {
            shared: Arc::new(Shared {
                api: ResourceClient::new(Arc::new(transport)),
                policy: ErrorPolicy::from_config(&config),
                config,
            }),
        })
    }

    /// Build from `~/.emno/config.toml` and `EMNO_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(EmnoConfig::load()?)
    }

    pub fn config(&self) -> &EmnoConfig {
        &self.shared.config
    }

    /// Raw endpoint access, bypassing handles and the error policy
    pub fn resources(&self) -> &ResourceClient {
        &self.shared.api
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    /// Wrap a record obtained elsewhere (e.g. from `resources()`) in a handle
    pub fn collection_handle(&self, record: CollectionRecord) -> Collection {
        to_collection(record, &self.shared)
    }

    pub async fn list_collections(&self) -> Result<Option<Vec<Collection>>> {
        let outcome = self.shared.api.list_collections().await;
        self.shared
            .policy
            .resolve_map("list_collections", outcome, |records| {
                to_collections(records, &self.shared)
            })
    }

    pub async fn create_collection(&self, request: &CreateCollectionRequest) -> Result<Option<Collection>> {
        request.validate()?;
        let outcome = self.shared.api.create_collection(request).await;
        let created = self
            .shared
            .policy
            .resolve_map("create_collection", outcome, |record| to_collection(record, &self.shared))?;
        if let Some(collection) = &created {
            info!(id = ?collection.id, name = %collection.name, "Collection created");
        }
        Ok(created)
    }

    /// Look a collection up by id or name
    pub async fn get_collection(&self, identifier: &str) -> Result<Option<Collection>> {
        let outcome = self.shared.api.get_collection(identifier).await;
        self.shared
            .policy
            .resolve_map("get_collection", outcome, |record| to_collection(record, &self.shared))
    }

    /// Delete by id or name.
    ///
    /// The collection is looked up first so the delete always targets its id.
    /// A failed lookup is handled by the error policy like any other failure.
    pub async fn delete_collection(&self, identifier: &str) -> Result<Option<Collection>> {
        let Some(existing) = self.get_collection(identifier).await? else {
            return Ok(None);
        };
        let Some(id) = existing.id.as_deref() else {
            return Err(crate::error::EmnoError::Uninitialized("Collection"));
        };

        let outcome = self.shared.api.delete_collection(id).await;
        let deleted = self
            .shared
            .policy
            .resolve_map("delete_collection", outcome, |response| {
                to_collection(response.deleted, &self.shared)
            })?;
        if deleted.is_some() {
            info!(id, "Collection deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CollectionConfig;
    use crate::error::EmnoError;
    use crate::test_support::Recorder;
    use crate::transport::RetryPolicy;
    use reqwest::Method;
    use serde_json::json;

    fn emno(base: &str, should_throw: bool) -> Emno {
        Emno::new(
            EmnoConfig::new("tok")
                .with_base_url(base)
                .with_should_throw(should_throw)
                .with_log_errors(false)
                .with_retry(RetryPolicy::none()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_blank_token() {
        let err = Emno::new(EmnoConfig::new("  ")).unwrap_err();
        assert!(matches!(err, EmnoError::Config(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = Emno::new(EmnoConfig::new("super-secret")).unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let (recorder, base) = Recorder::start(200, json!({})).await;
        let client = emno(&base, false);
        let bad = CreateCollectionRequest::new("docs", CollectionConfig::new(0));
        assert!(matches!(
            client.create_collection(&bad).await,
            Err(EmnoError::InvalidInput(_))
        ));
        assert!(recorder.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_collections_binds_handles() {
        let reply = json!([
            {"id": "a", "name": "one", "config": {"dim": 2}},
            {"id": "b", "name": "two", "config": {"dim": 2}}
        ]);
        let (_, base) = Recorder::start(200, reply).await;
        let listed = emno(&base, true).list_collections().await.unwrap().unwrap();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert!(listed.iter().all(Collection::is_bound));
    }

    #[tokio::test]
    async fn test_delete_looks_up_then_deletes_by_id() {
        // The recorder answers both calls with the same body
        let reply = json!({
            "id": "c1", "name": "docs", "config": {"dim": 3},
            "deleted": {"id": "c1", "name": "docs", "config": {"dim": 3}}
        });
        let (recorder, base) = Recorder::start(200, reply).await;
        let deleted = emno(&base, true).delete_collection("docs").await.unwrap().unwrap();
        assert_eq!(deleted.id.as_deref(), Some("c1"));

        let requests = recorder.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!((requests[0].method.clone(), requests[0].path.as_str()), (Method::GET, "/collections/docs"));
        assert_eq!((requests[1].method.clone(), requests[1].path.as_str()), (Method::DELETE, "/collections/c1"));
    }

    #[tokio::test]
    async fn test_delete_missing_collection_follows_policy() {
        let (recorder, base) = Recorder::start(404, json!({"message": "Collection not found"})).await;

        assert_eq!(emno(&base, false).delete_collection("gone").await.unwrap().map(|c| c.name), None);
        let err = emno(&base, true).delete_collection("gone").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        // Only lookups were attempted
        assert!(recorder.requests().iter().all(|r| r.method == Method::GET));
    }
}
