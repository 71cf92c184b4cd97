// pdj-common/src/image.rs
use crate::error::ImageError;
use crate::IMAGE_MAX_BYTES;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{info, warn};

/// A file picked by the user for the product image.
pub trait ImageFile: Send + Sync {
    fn name(&self) -> &str;

    /// Declared media type, e.g. `image/png`. May be empty.
    fn media_type(&self) -> &str;

    /// Declared size in bytes.
    fn size(&self) -> u64;

    /// Read the file contents. This is the only await point of the edit flow.
    fn read_bytes(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>>;
}

/// An image file whose bytes are already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: &str, media_type: &str, bytes: Vec<u8>) -> Self {
        InMemoryFile {
            name: name.to_string(),
            media_type: media_type.to_string(),
            bytes,
        }
    }
}

impl ImageFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_bytes(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        let bytes = self.bytes.clone();
        async move { Ok(bytes) }.boxed()
    }
}

/// Check media type, then size. The type check wins regardless of size.
pub fn validate_image(file: &dyn ImageFile) -> Result<(), ImageError> {
    let media_type = file.media_type();
    if !media_type.starts_with("image/") {
        warn!("Rejected {}: media type {:?} is not an image", file.name(), media_type);
        return Err(ImageError::InvalidType {
            media_type: media_type.to_string(),
        });
    }

    if file.size() > IMAGE_MAX_BYTES {
        warn!("Rejected {}: {} bytes exceeds {}", file.name(), file.size(), IMAGE_MAX_BYTES);
        return Err(ImageError::TooLarge {
            size: file.size(),
            limit: IMAGE_MAX_BYTES,
        });
    }

    Ok(())
}

pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, B64.encode(bytes))
}

/// Read `file` and encode it as a base64 data URL.
pub async fn read_as_data_url(file: &dyn ImageFile) -> Result<String, ImageError> {
    let bytes = file.read_bytes().await.map_err(|e| ImageError::Read {
        name: file.name().to_string(),
        reason: e.to_string(),
    })?;
    info!("Decoded image {} ({} bytes)", file.name(), bytes.len());
    Ok(encode_data_url(file.media_type(), &bytes))
}

/// Validate and decode in one step.
pub async fn intake(file: &dyn ImageFile) -> Result<String, ImageError> {
    validate_image(file)?;
    read_as_data_url(file).await
}
