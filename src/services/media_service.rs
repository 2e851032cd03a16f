use crate::config::MediaConfig;
use crate::error::{AppError, AppResult};
use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// URL prefix uploaded files are served under.
pub const UPLOADS_URL_PREFIX: &str = "uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Artist,
    Venue,
    Event,
}

impl MediaKind {
    fn dir(self) -> &'static str {
        match self {
            MediaKind::Artist => "artists",
            MediaKind::Venue => "venues",
            MediaKind::Event => "events",
        }
    }
}

/// Lower-cased extension of an accepted image file name.
pub fn image_extension(filename: &str) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| AppError::ValidationError(format!("File {filename} has no extension")))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::ValidationError(format!(
            "Unsupported image type .{ext}"
        )));
    }
    Ok(ext)
}

/// Writes uploaded images to disk and hands back their stored relative paths.
#[derive(Clone)]
pub struct MediaService {
    upload_dir: PathBuf,
    max_upload_bytes: usize,
}

impl MediaService {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Save every file part of `payload`; non-file fields are ignored.
    pub async fn save_images(&self, mut payload: Multipart, kind: MediaKind) -> AppResult<Vec<String>> {
        let mut saved = Vec::new();
        while let Some(field) = payload.next().await {
            let field = match field {
                Ok(field) => field,
                Err(e) => {
                    self.discard(&saved).await;
                    return Err(AppError::ValidationError(format!(
                        "Invalid multipart payload: {e}"
                    )));
                }
            };
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);
            let Some(filename) = filename else {
                continue;
            };

            match self.save_field(field, &filename, kind).await {
                Ok(path) => saved.push(path),
                Err(e) => {
                    self.discard(&saved).await;
                    return Err(e);
                }
            }
        }

        if saved.is_empty() {
            return Err(AppError::ValidationError(
                "No image files in upload".to_string(),
            ));
        }
        log::info!("Stored {} {} image(s)", saved.len(), kind.dir());
        Ok(saved)
    }

    async fn save_field(
        &self,
        mut field: actix_multipart::Field,
        filename: &str,
        kind: MediaKind,
    ) -> AppResult<String> {
        let ext = image_extension(filename)?;
        let name = format!("{}.{ext}", Uuid::new_v4());
        let dir = self.upload_dir.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&name);

        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0usize;
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(AppError::ValidationError(format!(
                        "Failed to read upload {filename}: {e}"
                    )));
                }
            };
            written += chunk.len();
            if written > self.max_upload_bytes {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(AppError::ValidationError(format!(
                    "File {filename} exceeds {} bytes",
                    self.max_upload_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(format!("{UPLOADS_URL_PREFIX}/{}/{name}", kind.dir()))
    }

    /// Best-effort removal of files saved for a request that failed later on.
    pub async fn discard(&self, stored_paths: &[String]) {
        for stored in stored_paths {
            let relative = stored
                .strip_prefix(UPLOADS_URL_PREFIX)
                .map(|p| p.trim_start_matches('/'))
                .unwrap_or(stored);
            let path = self.upload_dir.join(relative);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                log::warn!("Failed to remove orphaned upload {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("poster.PNG").unwrap(), "png");
        assert_eq!(image_extension("a.b.jpeg").unwrap(), "jpeg");
        assert!(image_extension("script.sh").is_err());
        assert!(image_extension("noext").is_err());
    }

    #[tokio::test]
    async fn test_discard_removes_stored_files() {
        let dir = std::env::temp_dir().join(format!("stagehand-media-{}", Uuid::new_v4()));
        let service = MediaService::new(&MediaConfig {
            public_base_url: "http://localhost".to_string(),
            upload_dir: dir.to_string_lossy().to_string(),
            max_upload_bytes: 1024,
        });
        tokio::fs::create_dir_all(dir.join("venues")).await.unwrap();
        let file = dir.join("venues").join("a.png");
        tokio::fs::write(&file, b"png").await.unwrap();

        service.discard(&["uploads/venues/a.png".to_string()]).await;

        assert!(!file.exists());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
