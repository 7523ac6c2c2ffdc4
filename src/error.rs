//! Error types shared by every stage of the emoji pipeline.

use thiserror::Error;

/// Why an image could not be turned into pixels.
#[derive(Debug, Error)]
pub enum LoadCause {
    /// Reading the bytes from disk failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The bytes were fetched but are not a decodable image.
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The browser fetch failed or returned a non-success status.
    #[error("{0}")]
    Fetch(String),
}

#[derive(Debug, Error)]
pub enum EmojiError {
    /// Empty or unusable emoji name. Raised before any I/O.
    #[error("invalid emoji name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Network, file system or decode failure for the source image.
    #[error("failed to load emoji '{url}': {cause}")]
    ImageLoad {
        url: String,
        #[source]
        cause: LoadCause,
    },

    /// A configuration value outside its accepted range.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl EmojiError {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn image_load(url: &str, cause: impl Into<LoadCause>) -> Self {
        Self::ImageLoad {
            url: url.to_string(),
            cause: cause.into(),
        }
    }
}

pub type Result<T, E = EmojiError> = std::result::Result<T, E>;
