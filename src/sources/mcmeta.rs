//! HTTP client for the mcmeta and vanilla-mcdoc raw file services.
//!
//! URL layout:
//! - `{mcmeta}/summary/versions/data.min.json`
//! - `{mcmeta}/{version}-summary/registries/data.min.json`
//! - `{mcmeta}/{version}-summary/blocks/data.min.json`
//! - `{vanilla_mcdoc}/generated/symbols.json`

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_lsp::async_trait;

use super::{DataSource, FetchError, VersionManifest};
use crate::Config;

/// Namespace prepended to every registry entry
const VANILLA_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone)]
pub struct McmetaClient {
    http: reqwest::Client,
    mcmeta_url: String,
    vanilla_mcdoc_url: String,
}

impl McmetaClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| FetchError::Http {
                url: "client_init".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            mcmeta_url: config.mcmeta_url.trim_end_matches('/').to_string(),
            vanilla_mcdoc_url: config.vanilla_mcdoc_url.trim_end_matches('/').to_string(),
        })
    }

    fn summary_url(&self, version: &str, kind: &str) -> String {
        format!("{}/{}-summary/{}/data.min.json", self.mcmeta_url, version, kind)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        log::debug!("Fetching {}", url);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(FetchError::Http { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        match response.json().await {
            Ok(body) => Ok(body),
            Err(source) => Err(FetchError::Decode { url, source }),
        }
    }
}

#[async_trait]
impl DataSource for McmetaClient {
    async fn versions(&self) -> Result<VersionManifest, FetchError> {
        self.fetch_json(format!("{}/summary/versions/data.min.json", self.mcmeta_url))
            .await
    }

    async fn registries(&self, version: &str) -> Result<BTreeMap<String, Vec<String>>, FetchError> {
        let raw: BTreeMap<String, Vec<String>> =
            self.fetch_json(self.summary_url(version, "registries")).await?;

        Ok(raw
            .into_iter()
            .map(|(registry, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|entry| format!("{}:{}", VANILLA_NAMESPACE, entry))
                    .collect();
                (registry, entries)
            })
            .collect())
    }

    async fn block_states(&self, version: &str) -> Result<BTreeMap<String, Value>, FetchError> {
        self.fetch_json(self.summary_url(version, "blocks")).await
    }

    async fn vanilla_mcdoc(&self) -> Result<Value, FetchError> {
        self.fetch_json(format!("{}/generated/symbols.json", self.vanilla_mcdoc_url))
            .await
    }
}
