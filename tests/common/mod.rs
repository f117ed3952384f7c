//! Shared test fixtures for the catalog SDK integration tests.
//!
//! Provides sample payloads, dummy card constructors, in-memory PNG bytes and
//! a scripted [`Transport`] for exercising the image resolver without a
//! network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use hearthstone_catalog::error::{CatalogError, Result};
use hearthstone_catalog::transport::{FetchResponse, Transport};
use hearthstone_catalog::{CardRecord, CatalogClient, Mechanic};
use reqwest::Url;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Cards and payloads
// ---------------------------------------------------------------------------

/// A dummy card with only a name and image set.
pub fn test_card(name: Option<&str>, img: Option<&str>) -> CardRecord {
    CardRecord {
        name: name.map(str::to_string),
        image: img.map(str::to_string),
        ..Default::default()
    }
}

/// Six named cards sharing one image reference.
pub fn test_card_array() -> Vec<CardRecord> {
    (0..=5)
        .map(|i| test_card(Some(format!("Card #{}", i).as_str()), Some("a://whatever.image")))
        .collect()
}

pub fn legendary(mechanics: &[&str]) -> CardRecord {
    CardRecord {
        card_id: Some("FP1_012".into()),
        name: Some("Sludge Belcher".into()),
        rarity: Some("Legendary".into()),
        mechanics: Some(mechanics.iter().map(|m| Mechanic::named(m)).collect()),
        ..Default::default()
    }
}

/// A small payload spanning several categories, deliberately listed out of
/// display order.
pub fn sample_payload() -> serde_json::Value {
    serde_json::json!({
        "Journey to Un'Goro": [
            {
                "cardId": "UNG_001",
                "name": "Pterrordax Hatchling",
                "cardSet": "Journey to Un'Goro",
                "type": "Minion",
                "rarity": "Common",
                "cost": 3,
                "attack": 2,
                "health": 2,
                "flavor": "",
                "img": "https://img.example/UNG_001.png"
            }
        ],
        "Classic": [
            {
                "cardId": "EX1_016",
                "name": "Sylvanas Windrunner",
                "cardSet": "Classic",
                "type": "Minion",
                "rarity": "Legendary",
                "cost": 6,
                "attack": 5,
                "health": 5,
                "flavor": "Sylvanas was turned into the Banshee Queen by Arthas.",
                "elite": true,
                "img": "https://img.example/EX1_016.png",
                "mechanics": [{ "name": "Deathrattle" }]
            },
            {
                "cardId": "EX1_002",
                "name": "The Black Knight",
                "cardSet": "Classic",
                "type": "Minion",
                "rarity": "Legendary",
                "cost": 6,
                "mechanics": [{ "name": "Battlecry" }]
            }
        ],
        "Basic": [
            {
                "cardId": "CS2_231",
                "name": "Wisp",
                "cardSet": "Basic",
                "type": "Minion",
                "rarity": "Common",
                "cost": 0,
                "flavor": "If you hit an Eredar Lord with enough Wisps, it will explode."
            }
        ],
        "Hall of Fame": [
            { "cardId": "HOF_001", "cost": "free", "name": null }
        ],
        "Debug": []
    })
}

pub fn sample_bytes() -> Vec<u8> {
    serde_json::to_vec(&sample_payload()).unwrap()
}

/// Offline client whose cache already holds `payload` for `enUS`.
pub fn offline_client(dir: &Path, payload: &[u8]) -> CatalogClient {
    std::fs::write(dir.join("cards.enUS.json"), payload).unwrap();
    CatalogClient::builder()
        .cache_dir(dir)
        .favorites_path(dir.join("favorites.json"))
        .offline(true)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A valid `width` x `height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

// ---------------------------------------------------------------------------
// FakeTransport
// ---------------------------------------------------------------------------

/// Scripted result of an async fetch.
pub enum Primary {
    Respond(u16, Vec<u8>),
    Fail,
    /// Waits before responding.
    Slow(Duration, u16, Vec<u8>),
}

/// Transport returning pre-scripted responses and counting calls.
pub struct FakeTransport {
    primary: Mutex<VecDeque<Primary>>,
    fallback: Mutex<VecDeque<Option<Vec<u8>>>>,
    pub primary_calls: AtomicUsize,
    pub fallback_calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new(primary: Vec<Primary>, fallback: Vec<Option<Vec<u8>>>) -> Self {
        Self {
            primary: Mutex::new(primary.into()),
            fallback: Mutex::new(fallback.into()),
            primary_calls: AtomicUsize::new(0),
            fallback_calls: AtomicUsize::new(0),
        }
    }

    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

impl Transport for FakeTransport {
    fn fetch(&self, _url: &Url) -> BoxFuture<'static, Result<FetchResponse>> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.primary.lock().unwrap().pop_front();
        Box::pin(async move {
            match next {
                Some(Primary::Respond(status, body)) => Ok(FetchResponse { status, body }),
                Some(Primary::Slow(delay, status, body)) => {
                    tokio::time::sleep(delay).await;
                    Ok(FetchResponse { status, body })
                }
                Some(Primary::Fail) | None => {
                    Err(CatalogError::NotFound("connection refused".into()))
                }
            }
        })
    }

    fn fetch_blocking(&self, _url: &Url) -> Result<Vec<u8>> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        match self.fallback.lock().unwrap().pop_front() {
            Some(Some(bytes)) => Ok(bytes),
            _ => Err(CatalogError::NotFound("connection refused".into())),
        }
    }
}
