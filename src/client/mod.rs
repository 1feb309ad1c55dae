//! Remote configuration client.
//!
//! # Data Flow
//! ```text
//! Startup hook (start_refresh_task):
//!     prime_if_empty → spawn refresh.rs loop
//!
//! Refresh cycle:
//!     fetcher.rs (GET per namespace)
//!     → change.rs (fingerprint, replace?)
//!     → cache.rs (atomic snapshot swap)
//!
//! Request path:
//!     cache.rs snapshot → http middleware → handler
//! ```
//!
//! # Design Decisions
//! - One client handle per app, passed explicitly; clones share state
//! - A failing namespace aborts the rest of its cycle; namespaces applied
//!   earlier in the same cycle stay applied
//! - Fetch errors stay inside the refresh path

pub mod cache;
pub mod change;
pub mod error;
pub mod fetcher;
pub mod refresh;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub use cache::{ConfigCache, ConfigSnapshot};
pub use change::{ConfigDocument, ConfigEntry, Fingerprint};
pub use error::{ClientError, FetchError};
pub use fetcher::{ConfigFetcher, FetchOutcome};
pub use refresh::{CycleReport, RefreshLoop};

use crate::config::validation::validate_client;
use crate::config::ClientConfig;

struct ClientInner {
    config: ClientConfig,
    fetcher: ConfigFetcher,
    cache: ConfigCache,
}

/// Handle to one config-server client and its cache.
#[derive(Clone)]
pub struct RemoteConfigClient {
    inner: Arc<ClientInner>,
}

impl RemoteConfigClient {
    /// Create a client with an empty cache. Nothing is fetched yet.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        validate_client(&config).map_err(ClientError::InvalidConfig)?;
        let fetcher = ConfigFetcher::new(&config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                fetcher,
                cache: ConfigCache::new(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn fetcher(&self) -> &ConfigFetcher {
        &self.inner.fetcher
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.inner.cache
    }

    /// Currently committed configuration. Never waits for a refresh.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.inner.cache.get()
    }

    /// Run a refresh cycle only if nothing has been cached yet.
    ///
    /// Returns `None` when the cache was already populated.
    pub async fn prime_if_empty(
        &self,
        namespaces: &[String],
    ) -> Result<Option<CycleReport>, FetchError> {
        if self.inner.cache.is_populated() {
            return Ok(None);
        }
        self.refresh(namespaces).await.map(Some)
    }

    /// Fetch every namespace in order and apply what changed.
    pub async fn refresh(&self, namespaces: &[String]) -> Result<CycleReport, FetchError> {
        let cache = &self.inner.cache;
        let mut report = CycleReport::default();

        for namespace in namespaces {
            match self.inner.fetcher.fetch(namespace).await? {
                FetchOutcome::Document(document) => {
                    let entry = ConfigEntry::new(document);
                    let current = cache.get();
                    if change::should_replace(current.entry(namespace), &entry) {
                        tracing::debug!(
                            namespace = %namespace,
                            fingerprint = %entry.fingerprint(),
                            "Namespace changed"
                        );
                        cache.apply_update(namespace, entry);
                        report.replaced += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                FetchOutcome::Absent(_) => {
                    cache.mark_absent(namespace);
                    report.absent += 1;
                }
            }
        }

        Ok(report)
    }

    /// Startup hook: prime the cache, then spawn the refresh loop.
    ///
    /// A failed first fetch is logged, not returned; the loop retries it one
    /// full interval later.
    pub async fn start_refresh_task(
        &self,
        namespaces: Vec<String>,
        shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let refresh_loop = RefreshLoop::new(self.clone(), namespaces);
        refresh_loop.prime().await;
        tokio::spawn(refresh_loop.run_after_prime(shutdown))
    }
}
