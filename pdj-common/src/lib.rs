// pdj-common/src/lib.rs
use serde::Deserialize;
use std::time::Duration;

// Define modules
pub mod editor;
pub mod error;
pub mod form;
pub mod image;
pub mod product_store;
pub mod query;
pub mod storage;
pub mod ui;

// Re-export for convenience
pub use editor::{EditPage, SubmitState};
pub use error::{EditError, ImageError, StorageError, ValidationError};
pub use form::{FormFields, ProductEdit};
pub use image::{ImageFile, InMemoryFile};
pub use product_store::{LocalProductStore, ProductStore};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use ui::{EditView, MessageSink, Navigator};

// --- Storage Constants ---
pub const STORAGE_KEY: &str = "pdj_products_v1";
pub const IMAGE_MAX_BYTES: u64 = 200 * 1024;
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

// --- Product Record ---

/// The fields of one stored product that the edit form works with.
///
/// Decoded leniently from a single stored record: text fields accept numbers,
/// numeric fields accept numeric strings, and anything unusable reads as
/// absent. The record itself stays in storage as raw JSON.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Product {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stock: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: Option<String>, // data URL
}

impl Product {
    /// The stored image, treating an empty string as no image.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|img| !img.is_empty())
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text(deserializer)?.unwrap_or_default())
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        })
    }
}

// --- Navigation & Feedback ---

/// Pages the edit form can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    List,   // product listing
    Create, // product creation form
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::List => "Lista.html",
            Page::Create => "Crear.html",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Severity tag passed along with every user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Error => write!(f, "error"),
        }
    }
}
