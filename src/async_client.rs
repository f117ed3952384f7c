//! Async wrapper around [`CatalogClient`] for use in Tokio runtimes.
//!
//! Runs all client operations on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], since catalog downloads use reqwest's
//! blocking client.
//!
//! # Example
//!
//! ```no_run
//! use hearthstone_catalog::AsyncCatalogClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AsyncCatalogClient::builder().build().await.unwrap();
//!
//!     let featured = client.run(|c| c.cards().featured()).await.unwrap();
//!
//!     let count = client.run(|c| Ok(c.catalog()?.len())).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{CatalogError, Result};
use crate::models::CatalogPayload;
use crate::CatalogClient;

// ---------------------------------------------------------------------------
// AsyncCatalogClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCatalogClient`].
#[derive(Default)]
pub struct AsyncCatalogClientBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
    locale: Option<String>,
    api_key: Option<String>,
}

impl AsyncCatalogClientBuilder {
    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP timeout for downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Build the async client on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCatalogClient> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CatalogClient::builder().offline(self.offline);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(locale) = &self.locale {
                builder = builder.locale(locale);
            }
            if let Some(key) = &self.api_key {
                builder = builder.api_key(key);
            }
            Ok(AsyncCatalogClient::from_client(builder.build()?))
        })
        .await
        .map_err(|e| CatalogError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCatalogClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`CatalogClient`].
///
/// The underlying client is protected by a [`Mutex`] since it uses `RefCell`
/// internally.
pub struct AsyncCatalogClient {
    inner: Arc<Mutex<CatalogClient>>,
}

impl AsyncCatalogClient {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncCatalogClientBuilder {
        AsyncCatalogClientBuilder::default()
    }

    /// Wrap an already-built client.
    pub fn from_client(client: CatalogClient) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Run a sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CatalogClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = client
                .lock()
                .map_err(|_| CatalogError::InvalidArgument("Client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| CatalogError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// The current catalog, fetching it on first access.
    pub async fn catalog(&self) -> Result<Arc<CatalogPayload>> {
        self.run(|c| c.catalog()).await
    }

    /// Re-download and decode the catalog.
    pub async fn refresh(&self) -> Result<Arc<CatalogPayload>> {
        self.run(|c| c.refresh()).await
    }

    /// Switch locale; the next catalog access fetches the new locale.
    pub async fn set_locale(&self, locale: &str) -> Result<()> {
        let locale = locale.to_string();
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = client
                .lock()
                .map_err(|_| CatalogError::InvalidArgument("Client lock poisoned".into()))?;
            guard.set_locale(&locale);
            Ok(())
        })
        .await
        .map_err(|e| CatalogError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
