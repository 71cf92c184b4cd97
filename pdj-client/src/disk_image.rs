use futures::future::BoxFuture;
use futures::FutureExt;
use pdj_common::ImageFile;
use std::path::{Path, PathBuf};

/// An image chosen from disk. Metadata is read up front, contents on demand.
#[derive(Debug, Clone)]
pub struct DiskImage {
    path: PathBuf,
    name: String,
    media_type: String,
    size: u64,
}

impl DiskImage {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        Ok(DiskImage {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            media_type: media_type_for(path).to_string(),
            size: metadata.len(),
        })
    }
}

impl ImageFile for DiskImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn read_bytes(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        tokio::fs::read(&self.path).boxed()
    }
}

/// Media type from the file extension, as a browser file picker reports it.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_by_extension() {
        assert_eq!(media_type_for(Path::new("a.PNG")), "image/png");
        assert_eq!(media_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(media_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(media_type_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn open_reads_metadata_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let image = DiskImage::open(&path).await.unwrap();
        assert_eq!(image.name(), "dot.gif");
        assert_eq!(image.media_type(), "image/gif");
        assert_eq!(image.size(), 6);
        assert_eq!(image.read_bytes().await.unwrap(), b"GIF89a");
    }

    #[tokio::test]
    async fn open_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DiskImage::open(&dir.path().join("nope.png")).await.is_err());
        assert!(DiskImage::open(dir.path()).await.is_err());
    }
}
