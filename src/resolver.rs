//! Remote image resolution with a blocking fallback.
//!
//! Each [`ImageResolver::resolve`] call runs as one Tokio task:
//!
//! 1. an asynchronous fetch of the URL; success requires status 200 and a
//!    non-empty body that decodes as an image,
//! 2. on any failure, a blocking read of the same URL on the blocking pool,
//!    whose body must decode as an image,
//! 3. if both fail, nothing is delivered.
//!
//! Results are sent to a single UI channel, at most once per call. The
//! returned [`ResolveHandle`] scopes the work: dropping it cancels the task
//! and suppresses delivery.
//!
//! There is no request coalescing, image caching or per-request timeout
//! beyond the transport's own HTTP timeout.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageFormat};
use reqwest::Url;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::view_model::{url_for, CardViewModel};
use crate::transport::Transport;

// ---------------------------------------------------------------------------
// Delivery types
// ---------------------------------------------------------------------------

/// How the presentation layer should fit a delivered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    ScaleAspectFit,
    ScaleAspectFill,
    ScaleToFill,
    Center,
}

/// Where a resolve call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Pending,
    /// Delivered from the primary async fetch.
    Succeeded,
    /// Delivered from the blocking fallback.
    FallbackSucceeded,
    /// Both fetches failed; nothing was delivered.
    Unresolved,
    /// The requester lost interest before delivery.
    Cancelled,
}

/// Identifies one [`ImageResolver::resolve`] call.
pub type RequestId = u64;

/// Image bytes that are known to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
}

impl ResolvedImage {
    /// Validate `bytes` as an image. Empty or undecodable input is rejected.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("empty body".into());
        }
        let decoded = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
        let (width, height) = decoded.dimensions();
        Ok(ResolvedImage {
            format: image::guess_format(&bytes).ok(),
            bytes,
            width,
            height,
        })
    }

    /// Decode the pixels.
    pub fn decode(&self) -> image::ImageResult<DynamicImage> {
        image::load_from_memory(&self.bytes)
    }
}

/// A resolved image on its way to the UI context.
#[derive(Debug, Clone)]
pub struct ImageDelivery {
    pub request: RequestId,
    pub url: Url,
    pub image: ResolvedImage,
    pub mode: DisplayMode,
    /// [`ResolveState::Succeeded`] or [`ResolveState::FallbackSucceeded`].
    pub outcome: ResolveState,
}

pub type UiSender = mpsc::UnboundedSender<ImageDelivery>;
pub type UiReceiver = mpsc::UnboundedReceiver<ImageDelivery>;

/// Create the channel whose receiver is drained on the UI context.
pub fn ui_channel() -> (UiSender, UiReceiver) {
    mpsc::unbounded_channel()
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Shared flag set when the requester no longer wants the result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Scope of one resolve call. Dropping it cancels the call.
#[must_use = "dropping the handle cancels the resolve"]
pub struct ResolveHandle {
    id: RequestId,
    token: CancelToken,
    task: Option<JoinHandle<ResolveState>>,
}

impl ResolveHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the task and return its final state.
    ///
    /// A call that never started, because no runtime was available, is
    /// [`ResolveState::Unresolved`].
    pub async fn finished(mut self) -> ResolveState {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(ResolveState::Cancelled),
            None => ResolveState::Unresolved,
        }
    }

    /// Let the task run to completion without tying it to this handle.
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for ResolveHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.token.cancel();
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// ImageResolver
// ---------------------------------------------------------------------------

/// Resolves image URLs and delivers the results to one UI channel.
///
/// Work is spawned on the runtime that was current when the resolver was
/// built, or on the caller's runtime otherwise.
pub struct ImageResolver<T: Transport> {
    transport: Arc<T>,
    ui: UiSender,
    runtime: Option<Handle>,
    next_id: AtomicU64,
}

impl<T: Transport> ImageResolver<T> {
    pub fn new(transport: T, ui: UiSender) -> Self {
        Self::with_shared(Arc::new(transport), ui)
    }

    pub fn with_shared(transport: Arc<T>, ui: UiSender) -> Self {
        Self {
            transport,
            ui,
            runtime: Handle::try_current().ok(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Spawn resolve work on `runtime`.
    pub fn on_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Start resolving `url`.
    ///
    /// Never fails; the absence of a delivery is the only failure signal.
    /// Without a runtime to spawn on, nothing is fetched and the handle
    /// finishes as [`ResolveState::Unresolved`].
    pub fn resolve(&self, url: Url, mode: DisplayMode) -> ResolveHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancelToken::default();
        let runtime = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => runtime,
            None => {
                log::warn!("No Tokio runtime to resolve {} on; request {} unresolved", url, id);
                return ResolveHandle {
                    id,
                    token,
                    task: None,
                };
            }
        };
        let task = runtime.spawn(run_resolve(
            self.transport.clone(),
            self.ui.clone(),
            token.clone(),
            id,
            url,
            mode,
        ));
        ResolveHandle {
            id,
            token,
            task: Some(task),
        }
    }

    /// Resolve the image of a view-model (placeholder URL when unparseable).
    pub fn resolve_view_model(&self, view_model: &CardViewModel, mode: DisplayMode) -> ResolveHandle {
        self.resolve(url_for(view_model), mode)
    }
}

async fn run_resolve<T: Transport>(
    transport: Arc<T>,
    ui: UiSender,
    token: CancelToken,
    id: RequestId,
    url: Url,
    mode: DisplayMode,
) -> ResolveState {
    let primary = match transport.fetch(&url).await {
        Ok(resp) if resp.status == 200 => ResolvedImage::from_bytes(resp.body),
        Ok(resp) => Err(format!("HTTP {}", resp.status)),
        Err(e) => Err(e.to_string()),
    };

    let (image, outcome) = match primary {
        Ok(image) => (image, ResolveState::Succeeded),
        Err(reason) => {
            log::debug!("Primary fetch of {} failed ({}); trying fallback", url, reason);
            if token.is_cancelled() {
                return ResolveState::Cancelled;
            }
            let fallback_transport = transport.clone();
            let fallback_url = url.clone();
            let fallback = tokio::task::spawn_blocking(move || {
                fallback_transport
                    .fetch_blocking(&fallback_url)
                    .map_err(|e| e.to_string())
                    .and_then(ResolvedImage::from_bytes)
            })
            .await;
            match fallback {
                Ok(Ok(image)) => (image, ResolveState::FallbackSucceeded),
                Ok(Err(reason)) => {
                    log::warn!("Image {} unresolved: fallback failed ({})", url, reason);
                    return ResolveState::Unresolved;
                }
                Err(e) => {
                    log::warn!("Image {} unresolved: fallback task failed ({})", url, e);
                    return ResolveState::Unresolved;
                }
            }
        }
    };

    if token.is_cancelled() {
        log::debug!("Dropping image {} for cancelled request {}", url, id);
        return ResolveState::Cancelled;
    }

    let delivery = ImageDelivery {
        request: id,
        url,
        image,
        mode,
        outcome,
    };
    if ui.send(delivery).is_err() {
        log::debug!("UI channel closed; request {} not delivered", id);
        return ResolveState::Cancelled;
    }
    outcome
}
