//! Config-server fetcher.
//!
//! # Responsibilities
//! - Build the per-namespace URL
//!   `{server}/configfiles/json/{app_id}/{cluster}/{namespace}`
//! - Issue one GET per namespace, bounded by the configured timeout
//! - Classify the response
//!
//! # Status Policy
//! - 200: body must be a JSON object, otherwise `MalformedResponse`
//! - 404, 500: `ConfigFetchFailure`
//! - anything else: no data for the namespace (`FetchOutcome::Absent`)

use std::time::Instant;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::client::change::ConfigDocument;
use crate::client::error::{ClientError, FetchError};
use crate::config::ClientConfig;
use crate::observability::metrics;

/// Successful result of fetching one namespace.
#[derive(Debug)]
pub enum FetchOutcome {
    Document(ConfigDocument),
    /// Server had no usable data; carries the status it answered with.
    Absent(StatusCode),
}

/// Fetches namespaces for one app/cluster from one config server.
#[derive(Debug, Clone)]
pub struct ConfigFetcher {
    http: Client,
    base_url: Url,
    app_id: String,
    cluster: String,
}

impl ConfigFetcher {
    /// Build a fetcher from an already validated config.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.config_server_url).map_err(|e| {
            ClientError::InvalidConfig(vec![crate::config::ValidationError {
                field: "client.config_server_url",
                message: e.to_string(),
            }])
        })?;

        let mut builder = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("remote-config-middleware/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            app_id: config.app_id.clone(),
            cluster: config.cluster.clone(),
        })
    }

    /// URL serving the JSON document of `namespace`.
    pub fn namespace_url(&self, namespace: &str) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path to extend
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([
                    "configfiles",
                    "json",
                    self.app_id.as_str(),
                    self.cluster.as_str(),
                    namespace,
                ]);
        }
        url
    }

    /// Fetch the current document for `namespace`.
    pub async fn fetch(&self, namespace: &str) -> Result<FetchOutcome, FetchError> {
        let url = self.namespace_url(namespace);
        let started = Instant::now();

        tracing::debug!(namespace = %namespace, url = %url, "Fetching namespace");

        let result = self.fetch_url(namespace, url).await;

        let outcome = match &result {
            Ok(FetchOutcome::Document(_)) => "document",
            Ok(FetchOutcome::Absent(_)) => "absent",
            Err(e) => e.kind(),
        };
        metrics::record_fetch(namespace, outcome, started);

        result
    }

    async fn fetch_url(&self, namespace: &str, url: Url) -> Result<FetchOutcome, FetchError> {
        let transport = |source| FetchError::Transport {
            namespace: namespace.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();

        match status {
            StatusCode::OK => {
                let body = response.bytes().await.map_err(transport)?;
                let document = serde_json::from_slice::<ConfigDocument>(&body).map_err(|source| {
                    FetchError::MalformedResponse {
                        namespace: namespace.to_string(),
                        source,
                    }
                })?;
                Ok(FetchOutcome::Document(document))
            }
            StatusCode::NOT_FOUND | StatusCode::INTERNAL_SERVER_ERROR => {
                Err(FetchError::ConfigFetchFailure {
                    namespace: namespace.to_string(),
                    status,
                })
            }
            other => {
                tracing::debug!(namespace = %namespace, status = %other, "No data for namespace");
                Ok(FetchOutcome::Absent(other))
            }
        }
    }
}
