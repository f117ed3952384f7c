use std::path::PathBuf;
use std::time::Duration;

pub const DATASET_URL: &str = "https://omgvamp-hearthstone-v1.p.rapidapi.com/cards";
pub const API_HOST: &str = "omgvamp-hearthstone-v1.p.rapidapi.com";
pub const API_KEY_ENV: &str = "HEARTHSTONE_API_KEY";
pub const USER_AGENT: &str = "hearthstone-catalog";

pub const DEFAULT_LOCALE: &str = "enUS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

// Fallbacks for records with missing or corrupt fields
pub const PLACEHOLDER_TITLE: &str = "No Name";
pub const PLACEHOLDER_DESCRIPTION: &str = "No Information to show";
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/500x500.png?text=No+Image+Found";

pub const FEATURED_RARITY: &str = "Legendary";
pub const FEATURED_MECHANIC: &str = "Deathrattle";

pub const FAVORITES_FILE: &str = "favorites.json";

/// Cached catalog file name for a locale, e.g. `cards.enUS.json`.
pub fn catalog_file(locale: &str) -> String {
    format!("cards.{}.json", locale)
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("hearthstone-catalog")
    } else {
        PathBuf::from(".hearthstone-catalog-cache")
    }
}

/// Directory for user data that must survive cache clears (favorites).
pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("hearthstone-catalog")
    } else {
        PathBuf::from(".hearthstone-catalog")
    }
}
