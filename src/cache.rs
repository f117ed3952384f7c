//! Download and local file cache for the catalog payload.
//!
//! The catalog is fetched once per locale and stored as
//! `cards.<locale>.json` in the cache directory. A cached file older than the
//! configured maximum age is considered stale and re-downloaded, unless the
//! manager is offline.

use crate::config;
use crate::error::{CatalogError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use reqwest::Url;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Where and how to request the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub endpoint: String,
    pub locale: String,
    pub api_key: Option<String>,
}

impl CatalogSource {
    /// Full request URL, e.g. `https://.../cards?locale=enUS`.
    pub fn url(&self) -> Result<Url> {
        Url::parse_with_params(&self.endpoint, &[("locale", self.locale.as_str())]).map_err(|e| {
            CatalogError::InvalidArgument(format!("Invalid endpoint {:?}: {}", self.endpoint, e))
        })
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self {
            endpoint: config::DATASET_URL.to_string(),
            locale: config::DEFAULT_LOCALE.to_string(),
            api_key: std::env::var(config::API_KEY_ENV).ok(),
        }
    }
}

/// Downloads and caches catalog payloads.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    timeout: Duration,
    max_age: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
        max_age: Duration,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            max_age,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .user_agent(config::USER_AGENT)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| CatalogError::InvalidArgument("HTTP client unavailable".into()))
    }

    /// Local path of the cached catalog for `locale`.
    pub fn catalog_path(&self, locale: &str) -> PathBuf {
        self.cache_dir.join(config::catalog_file(locale))
    }

    fn gz_path(&self, locale: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.gz", config::catalog_file(locale)))
    }

    /// Existing cached file for `locale`, plain or gzipped.
    fn existing(&self, locale: &str) -> Option<PathBuf> {
        [self.catalog_path(locale), self.gz_path(locale)]
            .into_iter()
            .find(|p| p.exists())
    }

    /// A file is stale when missing or last modified more than `max_age` ago.
    pub fn is_stale(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age > self.max_age,
            // modified in the future
            Err(_) => false,
        }
    }

    /// Download the catalog to `dest`.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download(&mut self, source: &CatalogSource, dest: &Path) -> Result<()> {
        let url = source.url()?;
        log::info!("Downloading catalog {}", url);

        let tmp_dest = dest.with_extension("json.tmp");
        let client = self.client()?.clone();
        let result = (|| -> Result<()> {
            let mut req = client.get(url.clone());
            if let Some(key) = &source.api_key {
                req = req
                    .header("X-RapidAPI-Key", key)
                    .header("X-RapidAPI-Host", config::API_HOST);
            }
            let resp = req.send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            log::info!("Cached {} bytes at {}", bytes.len(), dest.display());
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure the catalog for `source.locale` is cached, downloading if
    /// missing or stale.
    ///
    /// With `force`, downloads even when a fresh copy exists (ignored when
    /// offline).
    pub fn ensure_catalog(&mut self, source: &CatalogSource, force: bool) -> Result<PathBuf> {
        let existing = self.existing(&source.locale);

        if self.offline {
            return existing.ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "Catalog {} not cached and offline mode is enabled",
                    config::catalog_file(&source.locale)
                ))
            });
        }

        if let Some(path) = &existing {
            if !force && !self.is_stale(path) {
                log::debug!("Using cached catalog {}", path.display());
                return Ok(path.clone());
            }
        }

        let dest = self.catalog_path(&source.locale);
        self.download(source, &dest)?;
        // a fresh plain download supersedes any pre-seeded gzip copy
        let _ = fs::remove_file(self.gz_path(&source.locale));
        Ok(dest)
    }

    /// Read the cached catalog bytes (handles `.gz` transparently).
    pub fn load_catalog(&mut self, source: &CatalogSource, force: bool) -> Result<Vec<u8>> {
        let path = self.ensure_catalog(source, force)?;

        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(&path)?;
            let mut decoder = GzDecoder::new(BufReader::new(file));
            let mut contents = Vec::new();
            decoder.read_to_end(&mut contents)?;
            Ok(contents)
        } else {
            Ok(fs::read(&path)?)
        }
    }

    /// Remove the cached catalog for `locale` after it failed to decode, so
    /// the next load downloads a fresh copy.
    pub fn remove_catalog(&self, locale: &str) {
        for path in [self.catalog_path(locale), self.gz_path(locale)] {
            if path.exists() {
                log::warn!("Removing cached catalog {}", path.display());
                let _ = fs::remove_file(&path);
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}
