// src/models/mapper.rs
// Decoded payloads -> domain handles

use super::{Collection, Vector};
use crate::api::{CollectionRecord, UpsertResponse, VectorRecord};
use crate::client::Shared;
use std::sync::Arc;
use tracing::warn;

pub fn to_collection(record: CollectionRecord, shared: &Arc<Shared>) -> Collection {
    Collection::from_record(record, Arc::clone(shared))
}

pub fn to_collections(records: Vec<CollectionRecord>, shared: &Arc<Shared>) -> Vec<Collection> {
    records
        .into_iter()
        .map(|record| to_collection(record, shared))
        .collect()
}

pub fn to_vectors(
    records: Vec<VectorRecord>,
    collection_id: &str,
    shared: &Arc<Shared>,
) -> Vec<Vector> {
    records
        .into_iter()
        .map(|record| Vector::from_record(record, collection_id, Arc::clone(shared)))
        .collect()
}

/// One ranked list per query item, order preserved
pub fn to_ranked_lists(
    lists: Vec<Vec<VectorRecord>>,
    collection_id: &str,
    shared: &Arc<Shared>,
) -> Vec<Vec<Vector>> {
    lists
        .into_iter()
        .map(|list| to_vectors(list, collection_id, shared))
        .collect()
}

/// Flatten a batch update into `updated` followed by `created`.
///
/// `errored` entries do not become handles. They are only logged, so callers
/// that care about partial failure must compare ids or counts.
pub fn merge_upsert(
    response: UpsertResponse,
    collection_id: &str,
    shared: &Arc<Shared>,
) -> Vec<Vector> {
    let UpsertResponse {
        created,
        mut updated,
        errored,
    } = response;

    if !errored.is_empty() {
        warn!(
            collection_id,
            errored = errored.len(),
            entries = %serde_json::Value::Array(errored),
            "Some vectors could not be updated"
        );
    }

    updated.extend(created);
    to_vectors(updated, collection_id, shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Emno;
    use crate::config::EmnoConfig;
    use serde_json::json;

    fn shared() -> Arc<Shared> {
        Emno::new(EmnoConfig::new("tok").with_base_url("http://127.0.0.1:1"))
            .unwrap()
            .shared()
            .clone()
    }

    fn record(id: &str) -> VectorRecord {
        serde_json::from_value(json!({"id": id, "content": format!("text {}", id)})).unwrap()
    }

    #[test]
    fn test_to_collections() {
        let records: Vec<CollectionRecord> = serde_json::from_value(json!([
            {"id": "a", "name": "first", "config": {"dim": 2}},
            {"name": "pending", "config": {"dim": 4}}
        ]))
        .unwrap();
        let collections = to_collections(records, &shared());
        assert_eq!(collections.len(), 2);
        assert!(collections[0].is_bound());
        assert!(!collections[1].is_bound());
        assert_eq!(collections[1].config.dim, 4);
    }

    #[test]
    fn test_vectors_default_values_and_owner() {
        let vectors = to_vectors(vec![record("v1")], "c9", &shared());
        assert_eq!(vectors[0].values, Vec::<f32>::new());
        assert_eq!(vectors[0].collection_id(), "c9");
    }

    #[test]
    fn test_merge_upsert_orders_updated_before_created() {
        let response = UpsertResponse {
            created: vec![record("new")],
            updated: vec![record("u1"), record("u2")],
            errored: vec![json!({"id": "bad", "reason": "dim mismatch"})],
        };
        let merged = merge_upsert(response, "c1", &shared());
        let ids: Vec<_> = merged.iter().filter_map(|v| v.id.as_deref()).collect();
        assert_eq!(ids, vec!["u1", "u2", "new"]);
    }

    #[test]
    fn test_ranked_lists_preserve_shape() {
        let lists = vec![vec![record("a"), record("b")], vec![], vec![record("c")]];
        let ranked = to_ranked_lists(lists, "c1", &shared());
        assert_eq!(ranked.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 0, 1]);
        assert_eq!(ranked[0][1].id.as_deref(), Some("b"));
    }
}
