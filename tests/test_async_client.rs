//! Async wrapper over the offline fixture catalog.

#![cfg(feature = "async")]

mod common;

use std::sync::Arc;

use hearthstone_catalog::{AsyncCatalogClient, CatalogError};

fn async_client(dir: &std::path::Path) -> AsyncCatalogClient {
    common::init_logging();
    AsyncCatalogClient::from_client(common::offline_client(dir, &common::sample_bytes()))
}

#[tokio::test]
async fn catalog_is_memoized_across_calls() {
    let tmp = tempfile::tempdir().unwrap();
    let client = async_client(tmp.path());

    let first = client.catalog().await.unwrap();
    let second = client.catalog().await.unwrap();
    assert_eq!(first.len(), 5);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn run_exposes_queries() {
    let tmp = tempfile::tempdir().unwrap();
    let client = async_client(tmp.path());

    let featured = client.run(|c| c.cards().featured()).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].card_id.as_deref(), Some("EX1_016"));

    let missing = client.run(|c| c.cards().get_by_id("nope")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn refresh_rereads_cached_file() {
    let tmp = tempfile::tempdir().unwrap();
    let client = async_client(tmp.path());
    assert_eq!(client.catalog().await.unwrap().len(), 5);

    std::fs::write(
        tmp.path().join("cards.enUS.json"),
        br#"{"Basic": [{"cardId": "CS2_231", "name": "Wisp"}]}"#,
    )
    .unwrap();
    assert_eq!(client.refresh().await.unwrap().len(), 1);
    assert_eq!(client.catalog().await.unwrap().len(), 1);
}

#[tokio::test]
async fn set_locale_switches_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let client = async_client(tmp.path());
    assert_eq!(client.catalog().await.unwrap().len(), 5);

    client.set_locale("frFR").await.unwrap();
    assert_eq!(client.run(|c| Ok(c.locale().to_string())).await.unwrap(), "frFR");
    // offline and nothing cached for the new locale
    assert!(matches!(client.catalog().await, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn builder_offline_without_cache_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let client = AsyncCatalogClient::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .await
        .unwrap();
    assert!(matches!(client.catalog().await, Err(CatalogError::NotFound(_))));
}
