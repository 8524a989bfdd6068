//! PostgREST client for the hosted database API

use crate::backup::{
    BackupError, BackupResult, ColumnInfo, FunctionDefinition, IndexDefinition, Row,
    SchemaSource, TableInfo, TriggerDefinition, ViewDefinition,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;

/// Environment variable holding the API root
pub const URL_VAR: &str = "VITE_SUPABASE_URL";

/// Environment variable holding the anonymous API key
pub const ANON_KEY_VAR: &str = "VITE_SUPABASE_ANON_KEY";

/// Calls remote functions under `/rest/v1/rpc/` and selects table rows
/// under `/rest/v1/<table>`
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    /// Creates a client for an API root and key
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Creates a client from the environment
    ///
    /// Variables are first loaded from `env_file` when given; a missing file
    /// only logs a warning since the variables may already be set.
    pub fn from_env(env_file: Option<&Path>) -> BackupResult<Self> {
        if let Some(path) = env_file {
            match dotenvy::from_path(path) {
                Ok(()) => tracing::debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => {
                    tracing::warn!("Environment file {} not found", path.display())
                }
                Err(source) => {
                    return Err(BackupError::EnvFile {
                        path: path.display().to_string(),
                        source,
                    })
                }
            }
        }

        let url = std::env::var(URL_VAR).map_err(|_| BackupError::MissingCredential(URL_VAR))?;
        let key =
            std::env::var(ANON_KEY_VAR).map_err(|_| BackupError::MissingCredential(ANON_KEY_VAR))?;
        Ok(Self::new(&url, &key))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: String,
    ) -> BackupResult<Vec<T>> {
        tracing::debug!("Calling {}", endpoint);

        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|source| BackupError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| BackupError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(BackupError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(Vec::new());
        }

        serde_json::from_str(body).map_err(|source| BackupError::Decode { endpoint, source })
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        params: serde_json::Value,
    ) -> BackupResult<Vec<T>> {
        let endpoint = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let request = self.client.post(&endpoint).json(&params);
        self.send(request, endpoint).await
    }
}

#[async_trait]
impl SchemaSource for PostgrestClient {
    async fn list_all_tables(&self) -> BackupResult<Vec<TableInfo>> {
        self.rpc("list_all_tables", json!({})).await
    }

    async fn get_table_schema(&self, table: &str) -> BackupResult<Vec<ColumnInfo>> {
        self.rpc("get_table_schema", json!({ "p_table_name": table }))
            .await
    }

    async fn get_function_definitions(&self) -> BackupResult<Vec<FunctionDefinition>> {
        self.rpc("get_function_definitions", json!({})).await
    }

    async fn get_index_definitions(&self) -> BackupResult<Vec<IndexDefinition>> {
        self.rpc("get_index_definitions", json!({})).await
    }

    async fn get_trigger_definitions(&self) -> BackupResult<Vec<TriggerDefinition>> {
        self.rpc("get_trigger_definitions", json!({})).await
    }

    async fn get_view_definitions(&self) -> BackupResult<Vec<ViewDefinition>> {
        self.rpc("get_view_definitions", json!({})).await
    }

    async fn select_all(&self, table: &str) -> BackupResult<Vec<Row>> {
        let endpoint = format!("{}/rest/v1/{}", self.base_url, table);
        let request = self.client.get(&endpoint).query(&[("select", "*")]);
        self.send(request, endpoint).await
    }
}
