//! Hearthstone card catalog SDK for Rust.
//!
//! Fetches the card catalog, decodes its category-partitioned payload into a
//! flat, deterministically ordered list of cards, projects cards into
//! display-ready view-models, tracks favorites, and resolves card images with
//! a blocking fallback.
//!
//! # Quick start
//!
//! ```no_run
//! use hearthstone_catalog::{CatalogClient, MemoryFavorites, ServiceType};
//!
//! let client = CatalogClient::builder().api_key("my-key").build().unwrap();
//!
//! // Every card, in the fixed category order
//! let cards = client.cards().list(ServiceType::AllCards, &MemoryFavorites::new()).unwrap();
//!
//! // Display-ready projections
//! let favorites = client.open_favorites().unwrap();
//! let grid = client.cards().view_models(ServiceType::AllCards, &favorites).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod queries;
pub mod resolver;
pub mod transport;

#[cfg(feature = "async")]
pub use async_client::AsyncCatalogClient;
pub use cache::{CacheManager, CatalogSource};
pub use error::{CatalogError, Result};
pub use favorites::{FavoritesStore, FileFavorites, MemoryFavorites};
pub use models::{
    url_for, CardRecord, CardViewModel, CatalogPayload, Category, DecodeMode, Mechanic,
};
pub use queries::cards::{CardQuery, ServiceType};
pub use resolver::{DisplayMode, ImageDelivery, ImageResolver, ResolveHandle, ResolveState};
pub use transport::{HttpTransport, Transport};

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CatalogClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CatalogClient`].
///
/// Use [`CatalogClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CatalogClientBuilder::build).
pub struct CatalogClientBuilder {
    cache_dir: Option<PathBuf>,
    favorites_path: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    max_age: Duration,
    source: CatalogSource,
    mode: DecodeMode,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            favorites_path: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            max_age: config::DEFAULT_MAX_AGE,
            source: CatalogSource::default(),
            mode: DecodeMode::Strict,
        }
    }
}

impl CatalogClientBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/hearthstone-catalog` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set where favorites are persisted.
    ///
    /// Defaults to `favorites.json` in the platform data directory, outside
    /// the cache so that [`CacheManager::clear`] never removes it.
    pub fn favorites_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.favorites_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the client never downloads and only uses a previously
    /// cached catalog. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP timeout for catalog and image downloads.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long a cached catalog stays fresh. Defaults to 24 hours.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the catalog locale (e.g. `"enUS"`, `"deDE"`).
    pub fn locale(mut self, locale: &str) -> Self {
        self.source.locale = locale.to_string();
        self
    }

    /// Set the RapidAPI key. Defaults to the `HEARTHSTONE_API_KEY` env var.
    pub fn api_key(mut self, key: &str) -> Self {
        self.source.api_key = Some(key.to_string());
        self
    }

    /// Override the dataset endpoint.
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.source.endpoint = endpoint.to_string();
        self
    }

    /// Fail on unknown category labels (`true`, the default) or skip them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.mode = if strict {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        };
        self
    }

    /// Build the client. Does not download anything; the catalog is fetched
    /// lazily on first access.
    pub fn build(self) -> Result<CatalogClient> {
        self.source.url()?;
        let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout, self.max_age)?;
        let favorites_path = self
            .favorites_path
            .unwrap_or_else(|| config::default_data_dir().join(config::FAVORITES_FILE));
        Ok(CatalogClient {
            cache: RefCell::new(cache),
            source: self.source,
            mode: self.mode,
            timeout: self.timeout,
            favorites_path,
            payload: RefCell::new(None),
        })
    }
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// The main entry point: owns the cache and the current decoded catalog.
///
/// The catalog is decoded once per fetch and shared as an immutable
/// [`Arc<CatalogPayload>`] until [`refresh`](Self::refresh) or a locale change.
pub struct CatalogClient {
    pub(crate) cache: RefCell<CacheManager>,
    source: CatalogSource,
    mode: DecodeMode,
    timeout: Duration,
    favorites_path: PathBuf,
    payload: RefCell<Option<Arc<CatalogPayload>>>,
}

impl CatalogClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    /// Access the card query interface.
    pub fn cards(&self) -> CardQuery<'_> {
        CardQuery::new(self)
    }

    /// The current catalog, fetching and decoding it on first access.
    pub fn catalog(&self) -> Result<Arc<CatalogPayload>> {
        if let Some(payload) = self.payload.borrow().as_ref() {
            return Ok(payload.clone());
        }
        let payload = Arc::new(self.fetch(false)?);
        *self.payload.borrow_mut() = Some(payload.clone());
        Ok(payload)
    }

    /// Re-download and decode the catalog.
    ///
    /// The current catalog is replaced only if the new one decodes; on error
    /// the previous catalog stays available. Offline, this re-reads the
    /// cached file.
    pub fn refresh(&self) -> Result<Arc<CatalogPayload>> {
        let payload = Arc::new(self.fetch(true)?);
        *self.payload.borrow_mut() = Some(payload.clone());
        log::info!("Catalog refreshed: {} cards", payload.len());
        Ok(payload)
    }

    fn fetch(&self, force: bool) -> Result<CatalogPayload> {
        let bytes = self.cache.borrow_mut().load_catalog(&self.source, force)?;
        match self.decode_bytes(&bytes) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                // Unparseable JSON is treated as a corrupt download
                if let CatalogError::MalformedPayload { path, .. } = &e {
                    if path == "$" {
                        self.cache.borrow().remove_catalog(&self.source.locale);
                    }
                }
                Err(e)
            }
        }
    }

    /// Decode raw catalog bytes with this client's decode mode.
    pub fn decode_bytes(&self, raw: &[u8]) -> Result<CatalogPayload> {
        CatalogPayload::decode_with(raw, self.mode)
    }

    pub fn locale(&self) -> &str {
        &self.source.locale
    }

    /// Switch locale. The current catalog is dropped and fetched again on
    /// next access; view-models built from it should be recomputed.
    pub fn set_locale(&mut self, locale: &str) {
        if self.source.locale != locale {
            self.source.locale = locale.to_string();
            *self.payload.borrow_mut() = None;
        }
    }

    /// Open the persisted favorites store.
    pub fn open_favorites(&self) -> Result<FileFavorites> {
        FileFavorites::open(&self.favorites_path)
    }

    /// Build an image resolver delivering to `ui`, sharing this client's
    /// HTTP timeout.
    pub fn image_resolver(&self, ui: resolver::UiSender) -> Result<ImageResolver<HttpTransport>> {
        Ok(ImageResolver::new(HttpTransport::new(self.timeout)?, ui))
    }

    /// Release the HTTP client and drop the current catalog.
    pub fn close(self) {
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.borrow();
        let cards = self.payload.borrow().as_ref().map(|p| p.len());
        write!(
            f,
            "CatalogClient(cache_dir={}, locale={}, offline={}, cards={})",
            cache.cache_dir.display(),
            self.source.locale,
            cache.offline,
            cards.map_or_else(|| "not loaded".to_string(), |n| n.to_string())
        )
    }
}
