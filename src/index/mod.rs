//! Vector index access
//!
//! The engine never computes similarity itself; it consumes ranked results
//! from a backend that also enforces per-person scoping through metadata
//! filtering, so irrelevant vectors are never shipped over the wire.

mod pinecone;

use async_trait::async_trait;
use serde::Serialize;

pub use pinecone::PineconeIndex;

use crate::Result;

/// One ranked nearest-neighbor result from the backend
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Vector id
    pub id: String,

    /// Backend-defined relevance score (opaque; higher is more relevant)
    pub score: f32,

    /// Metadata stored with the vector
    pub metadata: serde_json::Value,
}

/// One (id, vector, metadata) record for upsert
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    /// Vector id
    pub id: String,

    /// Embedding values
    pub values: Vec<f32>,

    /// Metadata stored alongside the vector
    pub metadata: serde_json::Value,
}

/// Exact-match filter on a single metadata field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    field: String,
    value: String,
}

impl MetadataFilter {
    /// Filter requiring `field` to equal `value`
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Render the filter in the backend's `$eq` form
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ &self.field: { "$eq": &self.value } })
    }
}

/// Ranked nearest-neighbor store with metadata filtering
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query the `top_k` nearest neighbors of `vector`, optionally filtered.
    /// Results arrive in backend rank order and are not re-sorted.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredMatch>>;

    /// Upsert records into the index
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_eq_form() {
        let filter = MetadataFilter::equals("person_id", "jose");
        assert_eq!(
            filter.to_value(),
            serde_json::json!({ "person_id": { "$eq": "jose" } })
        );
    }

    #[test]
    fn test_record_wire_shape() {
        let record = VectorRecord {
            id: "jose-chunk-0".to_string(),
            values: vec![0.5, -0.5],
            metadata: serde_json::json!({ "person_id": "jose", "text": "hola" }),
        };

        let wire = serde_json::to_value(&record).expect("serializable");
        assert_eq!(wire["id"], "jose-chunk-0");
        assert_eq!(wire["values"][1], -0.5);
        assert_eq!(wire["metadata"]["person_id"], "jose");
    }
}
