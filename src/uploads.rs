//! Image attachment manager: validates uploaded payloads and stores them
//! under the media root with collision-resistant names.

use std::path::Path;

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Namespace under the media root where videogame images live.
pub const VIDEOGAME_UPLOAD_DIR: &str = "uploads/videogame";

/// Checks that the payload decodes as an image and picks the stored file's
/// extension: the client-supplied one when it is sane, otherwise the
/// detected format's canonical extension.
fn validate_payload(data: &[u8], original_name: Option<&str>) -> Result<String, ApiError> {
    let format = image::guess_format(data)
        .map_err(|_| ApiError::UnsupportedMedia("Upload is not a valid image".to_string()))?;
    image::load_from_memory(data)
        .map_err(|_| ApiError::UnsupportedMedia("Upload is not a valid image".to_string()))?;

    let client_extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    Ok(match client_extension {
        Some(ext) => ext,
        None => format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("img")
            .to_string(),
    })
}

/// Stores a validated image payload and returns its path relative to the
/// media root. The stored name is a fresh UUID plus the extension, never
/// derived from the client-supplied file name.
pub async fn store_videogame_image(
    media_root: &Path,
    data: &[u8],
    original_name: Option<&str>,
) -> Result<String, ApiError> {
    let extension = validate_payload(data, original_name)?;
    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    let relative_path = format!("{}/{}", VIDEOGAME_UPLOAD_DIR, file_name);

    let directory = media_root.join(VIDEOGAME_UPLOAD_DIR);
    fs::create_dir_all(&directory).await?;

    let full_path = directory.join(&file_name);
    fs::write(&full_path, data).await?;
    info!(path = %full_path.display(), "Stored uploaded image");

    Ok(relative_path)
}

/// Removes the backing file of a stored image reference. Failure to delete
/// is logged but never fails the surrounding operation.
pub async fn remove_stored_image(media_root: &Path, relative_path: &str) {
    let full_path = media_root.join(relative_path);
    if let Err(e) = fs::remove_file(&full_path).await {
        warn!(path = %full_path.display(), "Failed to remove stored image: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(1, 1);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn temp_media_root() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("gamevault-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_validate_payload_rejects_non_image() {
        let result = validate_payload(b"definitely not an image", Some("file.png"));
        assert!(matches!(result, Err(ApiError::UnsupportedMedia(_))));
    }

    #[test]
    fn test_validate_payload_uses_client_extension() {
        let ext = validate_payload(&png_bytes(), Some("screenshot.PNG")).unwrap();
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_validate_payload_falls_back_to_detected_format() {
        let ext = validate_payload(&png_bytes(), Some("../../etc/passwd")).unwrap();
        assert_eq!(ext, "png");
        let ext = validate_payload(&png_bytes(), None).unwrap();
        assert_eq!(ext, "png");
    }

    #[tokio::test]
    async fn test_store_and_remove_image() {
        let media_root = temp_media_root();
        let relative = store_videogame_image(&media_root, &png_bytes(), Some("cover.png"))
            .await
            .unwrap();

        // Stored under the fixed namespace with a generated name.
        assert!(relative.starts_with("uploads/videogame/"));
        assert!(!relative.contains("cover"));
        assert!(media_root.join(&relative).exists());

        remove_stored_image(&media_root, &relative).await;
        assert!(!media_root.join(&relative).exists());

        std::fs::remove_dir_all(&media_root).ok();
    }

    #[tokio::test]
    async fn test_stored_names_do_not_collide() {
        let media_root = temp_media_root();
        let first = store_videogame_image(&media_root, &png_bytes(), Some("a.png"))
            .await
            .unwrap();
        let second = store_videogame_image(&media_root, &png_bytes(), Some("a.png"))
            .await
            .unwrap();
        assert_ne!(first, second);

        std::fs::remove_dir_all(&media_root).ok();
    }
}
