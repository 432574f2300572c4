use axum::body::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const ALLOWED_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/webp", ".webp"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadFolder {
    #[default]
    Root,
    Avatar,
}

impl UploadFolder {
    pub fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("avatar") => UploadFolder::Avatar,
            _ => UploadFolder::Root,
        }
    }

    fn subdir(self) -> Option<&'static str> {
        match self {
            UploadFolder::Root => None,
            UploadFolder::Avatar => Some("avatar"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageRejection {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("empty file")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image rejected: {0}")]
    Rejected(#[from] ImageRejection),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Not `Clone`: deleting it consumes the handle, so a file is compensated at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a stored image must be referenced by a product or deleted"]
pub struct StoredImage {
    filename: String,
    path: PathBuf,
}

impl StoredImage {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
}

impl ImageStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn extension_for(content_type: Option<&str>) -> Result<&'static str, ImageRejection> {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        ALLOWED_TYPES
            .iter()
            .find(|(mime, _)| *mime == essence)
            .map(|(_, ext)| *ext)
            .ok_or(ImageRejection::UnsupportedType(essence))
    }

    pub async fn save(
        &self,
        upload: ImageUpload,
        folder: UploadFolder,
    ) -> Result<StoredImage, ImageError> {
        let extension = Self::extension_for(upload.content_type.as_deref())?;
        if upload.bytes.is_empty() {
            return Err(ImageRejection::Empty.into());
        }

        let dir = match folder.subdir() {
            Some(sub) => self.base_dir.join(sub),
            None => self.base_dir.clone(),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}{}", Uuid::new_v4(), extension);
        let path = dir.join(&filename);
        // Partial writes stay under the temp name and are removed, never published.
        let tmp_path = dir.join(format!(".{filename}.tmp"));
        if let Err(err) = tokio::fs::write(&tmp_path, &upload.bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }

        tracing::debug!(filename = %filename, bytes = upload.bytes.len(), "stored uploaded image");
        Ok(StoredImage { filename, path })
    }

    pub async fn delete(&self, image: StoredImage) -> bool {
        match tokio::fs::remove_file(&image.path).await {
            Ok(()) => {
                tracing::info!(filename = %image.filename, "removed uploaded image");
                true
            }
            Err(err) => {
                tracing::warn!(
                    filename = %image.filename,
                    path = %image.path.display(),
                    error = %err,
                    "failed to remove uploaded image"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(bytes: &'static [u8]) -> ImageUpload {
        ImageUpload {
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn allow_list_maps_extensions() {
        assert_eq!(ImageStore::extension_for(Some("image/jpeg")), Ok(".jpg"));
        assert_eq!(ImageStore::extension_for(Some("image/png")), Ok(".png"));
        assert_eq!(ImageStore::extension_for(Some("IMAGE/WEBP; q=1")), Ok(".webp"));
    }

    #[test]
    fn other_types_are_rejected_with_reason() {
        assert_eq!(
            ImageStore::extension_for(Some("image/gif")),
            Err(ImageRejection::UnsupportedType("image/gif".into()))
        );
        assert_eq!(
            ImageStore::extension_for(None),
            Err(ImageRejection::UnsupportedType(String::new()))
        );
    }

    #[test]
    fn folder_field_is_an_enumeration() {
        assert_eq!(UploadFolder::from_field(Some("avatar")), UploadFolder::Avatar);
        assert_eq!(UploadFolder::from_field(Some("../etc")), UploadFolder::Root);
        assert_eq!(UploadFolder::from_field(Some("Avatar")), UploadFolder::Root);
        assert_eq!(UploadFolder::from_field(None), UploadFolder::Root);
    }

    #[tokio::test]
    async fn save_writes_uuid_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let stored = store.save(png(b"\x89PNG"), UploadFolder::Root).await.unwrap();
        assert!(stored.filename().ends_with(".png"));
        let stem = stored.filename().trim_end_matches(".png");
        assert!(Uuid::parse_str(stem).is_ok());
        assert_eq!(stored.path(), dir.path().join(stored.filename()));
        assert_eq!(std::fs::read(stored.path()).unwrap(), b"\x89PNG");
        assert!(store.delete(stored).await);
    }

    #[tokio::test]
    async fn avatar_folder_lands_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let stored = store.save(png(b"img"), UploadFolder::Avatar).await.unwrap();
        assert_eq!(stored.path().parent().unwrap(), dir.path().join("avatar"));
        assert!(stored.path().exists());
        assert!(store.delete(stored).await);
    }

    #[tokio::test]
    async fn concurrent_saves_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let (a, b) = tokio::join!(
            store.save(png(b"a"), UploadFolder::Root),
            store.save(png(b"b"), UploadFolder::Root)
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.filename(), b.filename());
        assert!(store.delete(a).await);
        assert!(store.delete(b).await);
    }

    #[tokio::test]
    async fn rejected_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let upload = ImageUpload {
            content_type: Some("application/pdf".into()),
            bytes: Bytes::from_static(b"%PDF"),
        };

        let err = store.save(upload, UploadFolder::Root).await.unwrap_err();
        assert!(matches!(err, ImageError::Rejected(ImageRejection::UnsupportedType(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let err = store.save(png(b""), UploadFolder::Root).await.unwrap_err();
        assert!(matches!(err, ImageError::Rejected(ImageRejection::Empty)));
    }

    #[tokio::test]
    async fn unwritable_root_fails_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let store = ImageStore::new(&blocker);

        let err = store.save(png(b"img"), UploadFolder::Root).await.unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn saved_file_leaves_no_temp_name_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let stored = store.save(png(b"img"), UploadFolder::Root).await.unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![stored.filename().to_string()]);
        assert!(store.delete(stored).await);
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let stored = store.save(png(b"x"), UploadFolder::Root).await.unwrap();
        std::fs::remove_file(stored.path()).unwrap();
        assert!(!store.delete(stored).await);
    }
}
