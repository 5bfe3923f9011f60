//! Pinecone serverless index client
//!
//! Control-plane calls (list, create, describe) go to `api.pinecone.io`;
//! query and upsert go to the index's own data-plane host resolved at
//! connect time. A missing index is created with the configured serverless
//! cloud and region, and the client waits until it reports ready.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{MetadataFilter, ScoredMatch, VectorIndex, VectorRecord};
use crate::config::PineconeConfig;
use crate::{Error, Result};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2025-01";

/// Distance metric; fragment scores are cosine similarities
const METRIC: &str = "cosine";

/// Max vectors per upsert request
const UPSERT_BATCH: usize = 100;

/// Readiness polling after index creation
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READY_POLL_ATTEMPTS: usize = 60;

#[derive(Debug, Deserialize)]
struct IndexList {
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    host: String,
    status: IndexStatus,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    ready: bool,
}

/// Pinecone-backed vector index
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl PineconeIndex {
    /// Connect to the configured index, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the control-plane calls fail or the index does
    /// not become ready within the polling window.
    pub async fn connect(config: &PineconeConfig, dimension: usize) -> Result<Self> {
        let client = reqwest::Client::new();

        let existing = list_indexes(&client, &config.api_key).await?;
        let description = match existing.into_iter().find(|i| i.name == config.index_name) {
            Some(description) => description,
            None => {
                tracing::info!(
                    index = %config.index_name,
                    cloud = %config.cloud,
                    region = %config.region,
                    dimension,
                    "index not found, creating"
                );
                create_index(&client, config, dimension).await?;
                wait_until_ready(&client, &config.api_key, &config.index_name).await?
            }
        };

        let description = if description.status.ready {
            description
        } else {
            wait_until_ready(&client, &config.api_key, &config.index_name).await?
        };

        tracing::debug!(index = %description.name, host = %description.host, "index ready");

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            host: description.host,
        })
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredMatch>> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRequest<'a> {
            vector: &'a [f32],
            top_k: usize,
            include_metadata: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            filter: Option<serde_json::Value>,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            #[serde(default)]
            matches: Vec<Match>,
        }

        #[derive(Deserialize)]
        struct Match {
            id: String,
            score: f32,
            metadata: Option<serde_json::Value>,
        }

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            filter: filter.map(MetadataFilter::to_value),
        };

        let response = self
            .client
            .post(format!("https://{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Retrieval(format!("query failed {status}: {body}")));
        }

        let result: QueryResponse = response.json().await?;

        Ok(result
            .matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or(serde_json::Value::Null),
            })
            .collect())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        #[derive(serde::Serialize)]
        struct UpsertRequest<'a> {
            vectors: &'a [VectorRecord],
        }

        for batch in records.chunks(UPSERT_BATCH) {
            let response = self
                .client
                .post(format!("https://{}/vectors/upsert", self.host))
                .header("Api-Key", &self.api_key)
                .header("X-Pinecone-API-Version", API_VERSION)
                .json(&UpsertRequest { vectors: batch })
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Retrieval(format!("upsert failed {status}: {body}")));
            }
        }

        Ok(())
    }
}

async fn list_indexes(client: &reqwest::Client, api_key: &str) -> Result<Vec<IndexDescription>> {
    let response = client
        .get(format!("{CONTROL_PLANE_URL}/indexes"))
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Retrieval(format!(
            "list indexes failed {status}: {body}"
        )));
    }

    let list: IndexList = response.json().await?;
    Ok(list.indexes)
}

async fn create_index(
    client: &reqwest::Client,
    config: &PineconeConfig,
    dimension: usize,
) -> Result<()> {
    let request = serde_json::json!({
        "name": config.index_name,
        "dimension": dimension,
        "metric": METRIC,
        "spec": {
            "serverless": {
                "cloud": config.cloud,
                "region": config.region,
            }
        }
    });

    let response = client
        .post(format!("{CONTROL_PLANE_URL}/indexes"))
        .header("Api-Key", &config.api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Retrieval(format!(
            "create index failed {status}: {body}"
        )));
    }

    Ok(())
}

async fn wait_until_ready(
    client: &reqwest::Client,
    api_key: &str,
    index_name: &str,
) -> Result<IndexDescription> {
    for _ in 0..READY_POLL_ATTEMPTS {
        let response = client
            .get(format!("{CONTROL_PLANE_URL}/indexes/{index_name}"))
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Retrieval(format!(
                "describe index failed {status}: {body}"
            )));
        }

        let description: IndexDescription = response.json().await?;
        if description.status.ready {
            return Ok(description);
        }

        tracing::debug!(index = %index_name, "index not ready yet");
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }

    Err(Error::Retrieval(format!(
        "index {index_name} did not become ready"
    )))
}
