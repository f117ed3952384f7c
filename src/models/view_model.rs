use std::fmt;
use std::sync::Arc;

use reqwest::Url;

use crate::config;
use crate::models::card::CardRecord;

/// Deferred action run when the presentation layer selects a card.
pub type SelectAction = Arc<dyn Fn() + Send + Sync>;

// ---------------------------------------------------------------------------
// CardViewModel
// ---------------------------------------------------------------------------

/// Display-ready projection of a [`CardRecord`].
///
/// `title`, `image` and `description` are always populated; missing source
/// fields are replaced by the placeholders in [`config`].
#[derive(Clone)]
pub struct CardViewModel {
    pub title: String,
    pub image: String,
    pub description: String,
    pub type_field: Option<String>,
    pub is_favorite: bool,
    select: SelectAction,
}

impl CardViewModel {
    /// Project a record, asking `favorite_lookup` for its favorite status.
    ///
    /// The selection action starts as a no-op; see [`bind_select`](Self::bind_select).
    pub fn map<F>(record: &CardRecord, favorite_lookup: F) -> Self
    where
        F: Fn(&CardRecord) -> bool,
    {
        let description = match record.flavor_text.as_deref() {
            Some(flavor) if !flavor.is_empty() => flavor.to_string(),
            _ => config::PLACEHOLDER_DESCRIPTION.to_string(),
        };

        let title = match record.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => config::PLACEHOLDER_TITLE.to_string(),
        };

        CardViewModel {
            title,
            image: record
                .image
                .clone()
                .unwrap_or_else(|| config::PLACEHOLDER_IMAGE_URL.to_string()),
            description,
            type_field: record.type_field.clone(),
            is_favorite: favorite_lookup(record),
            select: Arc::new(|| {}),
        }
    }

    /// Project a record with no favorites information.
    pub fn from_record(record: &CardRecord) -> Self {
        Self::map(record, |_| false)
    }

    /// Replace the selection action.
    pub fn bind_select<F>(&mut self, action: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.select = Arc::new(action);
    }

    /// Run the selection action.
    pub fn select(&self) {
        (self.select)()
    }

    /// Recompute `is_favorite` after the favorites store changed.
    pub fn refresh_favorite<F>(&mut self, record: &CardRecord, favorite_lookup: F)
    where
        F: Fn(&CardRecord) -> bool,
    {
        self.is_favorite = favorite_lookup(record);
    }

    /// Parsed image URL, or the placeholder URL when `image` does not parse.
    pub fn url(&self) -> Url {
        Url::parse(&self.image).unwrap_or_else(|_| {
            log::debug!("Unparseable image reference {:?}; using placeholder", self.image);
            placeholder_url()
        })
    }

    /// Whether `record` is a featured card (Legendary with Deathrattle).
    pub fn is_featured(record: &CardRecord) -> bool {
        record.is_featured()
    }
}

impl fmt::Debug for CardViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardViewModel")
            .field("title", &self.title)
            .field("image", &self.image)
            .field("description", &self.description)
            .field("type_field", &self.type_field)
            .field("is_favorite", &self.is_favorite)
            .finish_non_exhaustive()
    }
}

/// The fixed image URL used when a card has no usable image reference.
pub fn placeholder_url() -> Url {
    Url::parse(config::PLACEHOLDER_IMAGE_URL).expect("placeholder image URL is valid")
}

/// Free-function form of [`CardViewModel::url`].
pub fn url_for(view_model: &CardViewModel) -> Url {
    view_model.url()
}
