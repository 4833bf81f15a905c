// src/api/types.rs
// Wire shapes for the emno REST API (camelCase on the wire)

use crate::error::{EmnoError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Names accepted when renaming a collection
static COLLECTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: static literal pattern; compilation cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("collection name regex")
});

// ============================================================================
// Collections
// ============================================================================

/// Distance metric used by a collection's index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algo {
    L2,
    /// Inner product
    Ip,
    Cosine,
    /// A metric this client does not know about yet, kept verbatim
    Other(String),
}

impl Algo {
    /// Known metrics only; unrecognised names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "l2" => Some(Self::L2),
            "ip" => Some(Self::Ip),
            "cosine" => Some(Self::Cosine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::L2 => "l2",
            Self::Ip => "ip",
            Self::Cosine => "cosine",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Algo {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or(Self::Other(name))
    }
}

impl From<Algo> for String {
    fn from(algo: Algo) -> Self {
        match algo {
            Algo::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Index configuration. `dim` is fixed when the collection is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub dim: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_construction: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef: Option<u32>,
    /// Embedding model used for text operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algo: Option<Algo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_replace: Option<bool>,
}

impl CollectionConfig {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            m: None,
            ef_construction: None,
            ef: None,
            model: None,
            algo: None,
            allow_replace: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_algo(mut self, algo: Algo) -> Self {
        self.algo = Some(algo);
        self
    }

    /// HNSW tuning: graph degree, build-time and query-time beam widths
    pub fn with_index_params(mut self, m: u32, ef_construction: u32, ef: u32) -> Self {
        self.m = Some(m);
        self.ef_construction = Some(ef_construction);
        self.ef = Some(ef);
        self
    }
}

/// Collection as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub config: CollectionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub config: CollectionConfig,
}

impl CreateCollectionRequest {
    pub fn new(name: impl Into<String>, config: CollectionConfig) -> Self {
        Self {
            name: name.into(),
            description: None,
            config,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EmnoError::InvalidInput("collection name must not be empty".into()));
        }
        if self.config.dim == 0 {
            return Err(EmnoError::InvalidInput("collection dim must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateCollectionRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if !COLLECTION_NAME.is_match(name) {
                return Err(EmnoError::InvalidInput(format!(
                    "collection name '{}' may only contain letters, digits, '_' and '-'",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedCollection {
    pub deleted: CollectionRecord,
}

// ============================================================================
// Vectors
// ============================================================================

/// Vector as returned by the service. `distance` and `score` are only set on
/// query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub values: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A vector supplied with its embedding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVector {
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub content: String,
}

impl NewVector {
    pub fn new(content: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            values,
            metadata: None,
            content: content.into(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A vector the service embeds from its content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTextVector {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewTextVector {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Partial update of an existing vector; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VectorPatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
}

impl VectorPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn values(mut self, values: Vec<f32>) -> Self {
        self.values = Some(values);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVectorsRequest {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_vector_values: Option<bool>,
}

/// Page through a collection in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVectorsRequest {
    pub include_vector_values: bool,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListVectorsRequest {
    fn default() -> Self {
        Self {
            include_vector_values: false,
            page: 0,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVectorsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_all: Option<bool>,
}

impl DeleteVectorsRequest {
    pub fn ids(ids: Vec<String>) -> Self {
        Self {
            ids: Some(ids),
            delete_all: None,
        }
    }

    pub fn all() -> Self {
        Self {
            ids: Some(Vec::new()),
            delete_all: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryByVectorRequest {
    pub vectors: Vec<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryByTextRequest {
    pub content: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Restrict matches to vectors whose metadata contains these pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl QueryByTextRequest {
    pub fn new<I, S>(content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: content.into_iter().map(Into::into).collect(),
            top_k: None,
            metadata: None,
        }
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.top_k = Some(k);
        self
    }

    pub fn metadata(mut self, filter: Value) -> Self {
        self.metadata = Some(filter);
        self
    }
}

/// Batch update outcome, partitioned by the service
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpsertResponse {
    #[serde(default)]
    pub created: Vec<VectorRecord>,
    #[serde(default)]
    pub updated: Vec<VectorRecord>,
    #[serde(default)]
    pub errored: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedVectors {
    #[serde(default)]
    pub deleted: Vec<VectorRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

// ============================================================================
// Client-side checks
// ============================================================================

pub(crate) fn require_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(EmnoError::InvalidInput("vector content must not be empty".into()));
    }
    Ok(())
}

/// Every embedding must match the collection's dimensionality
pub(crate) fn require_dim(values: &[f32], dim: usize) -> Result<()> {
    if values.len() != dim {
        return Err(EmnoError::InvalidInput(format!(
            "vector has {} values, collection dim is {}",
            values.len(),
            dim
        )));
    }
    Ok(())
}
