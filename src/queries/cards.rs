//! Card queries against the decoded in-memory catalog.

use crate::error::Result;
use crate::favorites::FavoritesStore;
use crate::models::{CardRecord, CardViewModel, Category};
use crate::CatalogClient;

// ---------------------------------------------------------------------------
// ServiceType
// ---------------------------------------------------------------------------

/// Which cards a listing screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceType {
    #[default]
    AllCards,
    Favorites,
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface over the client's current catalog.
///
/// Every method loads the catalog on first use. Results preserve the fixed
/// category order.
pub struct CardQuery<'a> {
    client: &'a CatalogClient,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given client.
    pub fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    // -- Listings ----------------------------------------------------------

    /// All cards, or only the ones `favorites` marks as favorite.
    pub fn list(
        &self,
        service: ServiceType,
        favorites: &dyn FavoritesStore,
    ) -> Result<Vec<CardRecord>> {
        let catalog = self.client.catalog()?;
        let cards = match service {
            ServiceType::AllCards => catalog.get_all_cards(),
            ServiceType::Favorites => catalog
                .iter()
                .filter(|c| favorites.is_favorite(c))
                .cloned()
                .collect(),
        };
        Ok(cards)
    }

    /// Cards of one category, in payload order.
    pub fn by_category(&self, category: Category) -> Result<Vec<CardRecord>> {
        Ok(self.client.catalog()?.category(category).to_vec())
    }

    /// Legendary cards with the Deathrattle mechanic.
    pub fn featured(&self) -> Result<Vec<CardRecord>> {
        let catalog = self.client.catalog()?;
        Ok(catalog.iter().filter(|c| c.is_featured()).cloned().collect())
    }

    // -- Lookups -----------------------------------------------------------

    /// First card with the given `cardId`.
    pub fn get_by_id(&self, card_id: &str) -> Result<Option<CardRecord>> {
        let catalog = self.client.catalog()?;
        let found = catalog
            .iter()
            .find(|c| c.card_id.as_deref() == Some(card_id))
            .cloned();
        Ok(found)
    }

    /// Cards whose name contains `name` (case-insensitive).
    pub fn search_by_name(&self, name: &str) -> Result<Vec<CardRecord>> {
        let catalog = self.client.catalog()?;
        let needle = name.to_lowercase();
        Ok(catalog
            .iter()
            .filter(|c| {
                c.name
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    // -- Projections -------------------------------------------------------

    /// View-models for a listing, with favorite status from `favorites`.
    pub fn view_models(
        &self,
        service: ServiceType,
        favorites: &dyn FavoritesStore,
    ) -> Result<Vec<CardViewModel>> {
        let cards = self.list(service, favorites)?;
        Ok(cards
            .iter()
            .map(|c| CardViewModel::map(c, |r| favorites.is_favorite(r)))
            .collect())
    }
}
