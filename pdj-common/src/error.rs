use std::path::PathBuf;

use thiserror::Error;

use crate::editor::SubmitState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON object of strings: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("file type {media_type:?} is not an image")]
    InvalidType { media_type: String },

    #[error("image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("failed to read image {name}: {reason}")]
    Read { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is empty")]
    EmptyName,

    #[error("price {0:?} is not a number")]
    InvalidPrice(String),

    #[error("stock {0:?} is not an integer")]
    InvalidStock(String),
}

/// Everything that can go wrong on the edit page.
///
/// Most of these end in a message through the [`MessageSink`](crate::MessageSink)
/// or a redirect. `Busy` and `Abandoned` are silent.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("page URL has no product id")]
    MissingIdParameter,

    #[error("product {id:?} not found")]
    RecordNotFound { id: String },

    #[error("invalid form input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("failed to save products: {0}")]
    Storage(#[from] StorageError),

    #[error("submit ignored while page is {0:?}")]
    Busy(SubmitState),

    #[error("page was left before the image was read")]
    Abandoned,
}

impl EditError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            EditError::MissingIdParameter => "Missing product id.",
            EditError::RecordNotFound { .. } => "Product not found.",
            EditError::Validation(_) => "Please fill in all fields correctly.",
            EditError::Image(ImageError::InvalidType { .. }) => "The selected file is not a valid image.",
            EditError::Image(ImageError::TooLarge { .. }) => "The image is too large. Max 200 KB.",
            EditError::Image(ImageError::Read { .. }) => "The selected image could not be read.",
            EditError::Storage(_) => "Changes could not be saved.",
            EditError::Busy(_) => "Changes are still being saved.",
            EditError::Abandoned => "Changes were discarded.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_validation_failure_shares_one_message() {
        let empty = EditError::from(ValidationError::EmptyName);
        let price = EditError::from(ValidationError::InvalidPrice("abc".to_string()));
        let stock = EditError::from(ValidationError::InvalidStock("x".to_string()));
        assert_eq!(empty.user_message(), price.user_message());
        assert_eq!(price.user_message(), stock.user_message());
    }

    #[test]
    fn image_errors_display_their_details() {
        let err = EditError::from(ImageError::TooLarge { size: 300_000, limit: 204_800 });
        assert_eq!(err.to_string(), "image is 300000 bytes, limit is 204800 bytes");
        assert_eq!(err.user_message(), "The image is too large. Max 200 KB.");
    }
}
