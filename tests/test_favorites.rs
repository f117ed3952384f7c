//! Favorites stores and favorites-filtered listings.

mod common;

use common::test_card;
use hearthstone_catalog::{
    CardRecord, CatalogError, FavoritesStore, FileFavorites, MemoryFavorites, ServiceType,
};

fn wisp() -> CardRecord {
    CardRecord {
        card_id: Some("CS2_231".into()),
        name: Some("Wisp".into()),
        ..Default::default()
    }
}

#[test]
fn memory_store_set_and_toggle() {
    let store = MemoryFavorites::new();
    let card = wisp();
    assert!(!store.is_favorite(&card));

    store.set_favorite(&card, true).unwrap();
    assert!(store.is_favorite(&card));
    assert_eq!(store.favorite_keys(), vec!["CS2_231".to_string()]);

    assert!(!store.toggle(&card).unwrap());
    assert!(!store.is_favorite(&card));
}

#[test]
fn anonymous_card_cannot_be_favorited() {
    let store = MemoryFavorites::new();
    let card = CardRecord::default();
    let err = store.set_favorite(&card, true).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
    assert!(!store.is_favorite(&card));
}

#[test]
fn name_is_used_when_id_missing() {
    let store = MemoryFavorites::new();
    store.set_favorite(&test_card(Some("Leeroy Jenkins"), None), true).unwrap();
    assert!(store.is_favorite(&test_card(Some("Leeroy Jenkins"), None)));
}

#[test]
fn file_store_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("favorites.json");

    let store = FileFavorites::open(&path).unwrap();
    store.set_favorite(&wisp(), true).unwrap();
    drop(store);

    let reopened = FileFavorites::open(&path).unwrap();
    assert!(reopened.is_favorite(&wisp()));
    reopened.set_favorite(&wisp(), false).unwrap();

    let again = FileFavorites::open(&path).unwrap();
    assert!(!again.is_favorite(&wisp()));
    assert!(again.favorite_keys().is_empty());
}

#[test]
fn corrupt_file_starts_empty() {
    common::init_logging();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("favorites.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileFavorites::open(&path).unwrap();
    assert!(store.favorite_keys().is_empty());
    store.set_favorite(&wisp(), true).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let keys: Vec<String> = serde_json::from_str(&contents).unwrap();
    assert_eq!(keys, vec!["CS2_231"]);
}

#[test]
fn favorites_service_lists_only_favorites() {
    let tmp = tempfile::tempdir().unwrap();
    let client = common::offline_client(tmp.path(), &common::sample_bytes());
    let favorites = client.open_favorites().unwrap();

    let sylvanas = client.cards().get_by_id("EX1_016").unwrap().unwrap();
    let wisp = client.cards().get_by_id("CS2_231").unwrap().unwrap();
    favorites.set_favorite(&sylvanas, true).unwrap();
    favorites.set_favorite(&wisp, true).unwrap();

    let listed = client.cards().list(ServiceType::Favorites, &favorites).unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.name.as_deref().unwrap()).collect();
    // catalog order, not insertion order
    assert_eq!(names, vec!["Wisp", "Sylvanas Windrunner"]);

    let vms = client
        .cards()
        .view_models(ServiceType::AllCards, &favorites)
        .unwrap();
    let flags: Vec<_> = vms.iter().map(|vm| vm.is_favorite).collect();
    assert_eq!(flags, vec![true, true, false, false, false]);
}
