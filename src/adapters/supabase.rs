use crate::domain::model::ToolRecord;
use crate::domain::ports::UpsertSink;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// PostgREST client for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    timeout: Option<Duration>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

#[async_trait]
impl UpsertSink for SupabaseClient {
    async fn upsert(&self, table: &str, records: &[ToolRecord], on_conflict: &str) -> Result<()> {
        let url = self.table_url(table);
        tracing::debug!("POST {} ({} records, on_conflict={})", url, records.len(), on_conflict);

        let mut request = self
            .client
            .post(&url)
            .query(&[("on_conflict", on_conflict)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("prefer", "resolution=merge-duplicates,return=minimal")
            .json(records);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Supabase response status: {}", status);

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(EtlError::ApiStatusError {
            status: status.as_u16(),
            body,
        })
    }
}
