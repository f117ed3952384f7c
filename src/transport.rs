//! Byte-fetching transport used by the image resolver.

use std::sync::OnceLock;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Url;

use crate::config;
use crate::error::Result;

/// Status and body of an asynchronous fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// "Fetch bytes from a URL", asynchronously or by blocking the caller.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> BoxFuture<'static, Result<FetchResponse>>;

    /// Blocking read of the URL's contents. The status code is not consulted.
    ///
    /// Must not be called from an async context.
    fn fetch_blocking(&self, url: &Url) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// [`Transport`] backed by reqwest's async and blocking clients.
///
/// The blocking client is built lazily by the first fallback, which runs on
/// the blocking pool, and shared by every fallback after it. It is dropped on
/// a dedicated thread so it never goes away inside the async runtime.
pub struct HttpTransport {
    timeout: Duration,
    client: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(Self {
            timeout,
            client,
            blocking: OnceLock::new(),
        })
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(self.blocking.get_or_init(|| client))
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        if let Some(client) = self.blocking.take() {
            std::thread::spawn(move || drop(client));
        }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &Url) -> BoxFuture<'static, Result<FetchResponse>> {
        let client = self.client.clone();
        let url = url.clone();
        Box::pin(async move {
            let resp = client.get(url).send().await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?.to_vec();
            Ok(FetchResponse { status, body })
        })
    }

    fn fetch_blocking(&self, url: &Url) -> Result<Vec<u8>> {
        let resp = self.blocking_client()?.get(url.clone()).send()?;
        Ok(resp.bytes()?.to_vec())
    }
}
