//! CV ingestion pipeline
//!
//! Loads each person's CV text, chunks it, embeds the chunks in batch and
//! upserts everything into the vector index tagged with the person's id and
//! name. Retrieval scoping relies on that `person_id` metadata.

pub mod chunker;

use crate::config::Config;
use crate::embedding::TextEmbedder;
use crate::index::{VectorIndex, VectorRecord};
use crate::{Error, Result};

/// What one ingestion run processed
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    /// Persons whose CVs were ingested
    pub persons: usize,

    /// Total fragments upserted
    pub chunks: usize,
}

/// Ingest all configured CVs into the index.
///
/// Records are accumulated across persons and upserted in one pass at the
/// end, so a failure in any CV leaves the index untouched.
///
/// # Errors
///
/// Returns `Error::Ingest` for unreadable CV files; embedding and index
/// errors propagate unchanged.
pub async fn run(
    config: &Config,
    embedder: &dyn TextEmbedder,
    index: &dyn VectorIndex,
) -> Result<IngestReport> {
    let mut records: Vec<VectorRecord> = Vec::new();
    let mut total_chunks = 0;

    for person in &config.persons {
        tracing::info!(person = %person.id, path = %person.cv_path.display(), "ingesting CV");

        let raw = std::fs::read_to_string(&person.cv_path).map_err(|e| {
            Error::Ingest(format!(
                "cannot read CV for {} at {}: {e}",
                person.id,
                person.cv_path.display()
            ))
        })?;

        let chunks = chunker::chunk_text(&raw, chunker::DEFAULT_MAX_CHARS);
        if chunks.is_empty() {
            tracing::warn!(person = %person.id, "CV produced no chunks, skipping");
            continue;
        }
        tracing::info!(person = %person.id, chunks = chunks.len(), "chunked CV");

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        for (i, (chunk, values)) in chunks.iter().zip(vectors).enumerate() {
            records.push(VectorRecord {
                id: format!("{}-chunk-{i}", person.id),
                values,
                metadata: serde_json::json!({
                    "person_id": person.id,
                    "person_name": person.name,
                    "text": chunk,
                }),
            });
        }

        total_chunks += chunks.len();
    }

    tracing::info!(records = records.len(), "upserting all vectors");
    index.upsert(&records).await?;

    Ok(IngestReport {
        persons: config.persons.len(),
        chunks: total_chunks,
    })
}
