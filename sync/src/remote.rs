//! Remote table store collaborator.
//!
//! The orchestrator talks to the authoritative store through the
//! [`RemoteStore`] trait: partial selects for the remote index, and bulk
//! insert/upsert submission (one call per batch, never per row). The
//! concrete implementation speaks a PostgREST-style API.

use async_trait::async_trait;
use mirror_engine::Record;
use std::time::Duration;
use thiserror::Error;

/// Errors from the remote table store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport-level failure, including an expired per-operation timeout.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store reached a decision and said no.
    #[error("remote rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Client for the remote, authoritative table store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a partial snapshot: only the named columns, all rows.
    async fn select(&self, table: &str, columns: &[String]) -> Result<Vec<Record>, RemoteError>;

    /// Bulk-insert new rows.
    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), RemoteError>;

    /// Bulk insert-or-update, keyed on the conflict columns.
    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        conflict_columns: &[String],
    ) -> Result<(), RemoteError>;
}

/// PostgREST-style remote store client.
///
/// Each operation is bounded by the configured timeout; an expired
/// operation fails and is never retried, since a retried bulk insert could
/// duplicate rows.
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestStore {
    /// Build a client for the given endpoint and API key.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select(&self, table: &str, columns: &[String]) -> Result<Vec<Record>, RemoteError> {
        let request = self
            .authed(self.client.get(self.endpoint(table)))
            .query(&[("select", columns.join(","))]);

        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), RemoteError> {
        let request = self
            .authed(self.client.post(self.endpoint(table)))
            .header("Prefer", "return=minimal")
            .json(rows);

        Self::ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        conflict_columns: &[String],
    ) -> Result<(), RemoteError> {
        let request = self
            .authed(self.client.post(self.endpoint(table)))
            .query(&[("on_conflict", conflict_columns.join(","))])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows);

        Self::ensure_success(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_handles_trailing_slash() {
        let store = RestStore::new(
            "https://example.supabase.co/",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            store.endpoint("billing"),
            "https://example.supabase.co/rest/v1/billing"
        );
    }
}
