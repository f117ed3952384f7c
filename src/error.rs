#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structural failure at the category level of a catalog payload.
    #[error("Malformed payload at `{path}`: {reason}")]
    MalformedPayload { path: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::MalformedPayload {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
