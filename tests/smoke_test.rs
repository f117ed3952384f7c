//! Live smoke test against the real catalog API.
//!
//! Requires `HEARTHSTONE_API_KEY`. Run with:
//! ```sh
//! cargo test --test smoke_test -- --ignored --nocapture
//! ```

mod common;

use hearthstone_catalog::resolver::ui_channel;
use hearthstone_catalog::{CatalogClient, DisplayMode, ResolveState, ServiceType};

#[test]
#[ignore]
fn live_catalog_and_image() {
    common::init_logging();
    let tmp = tempfile::tempdir().unwrap();
    let client = CatalogClient::builder()
        .cache_dir(tmp.path())
        .favorites_path(tmp.path().join("favorites.json"))
        .strict(false)
        .build()
        .unwrap();

    let catalog = client.catalog().unwrap();
    eprintln!("{} cards across {:?}", catalog.len(), catalog.counts());
    assert!(!catalog.is_empty());

    let favorites = client.open_favorites().unwrap();
    let vms = client.cards().view_models(ServiceType::AllCards, &favorites).unwrap();
    let with_image = vms
        .iter()
        .find(|vm| vm.image.starts_with("http"))
        .cloned()
        .expect("some card has an image");

    let rt = tokio::runtime::Runtime::new().unwrap();
    let (tx, mut rx) = ui_channel();
    let resolver = client.image_resolver(tx).unwrap();
    let state = rt.block_on(async {
        resolver
            .resolve_view_model(&with_image, DisplayMode::ScaleAspectFit)
            .finished()
            .await
    });
    eprintln!("{} -> {:?}", with_image.image, state);
    if state != ResolveState::Unresolved {
        assert!(rx.try_recv().is_ok());
    }
}
