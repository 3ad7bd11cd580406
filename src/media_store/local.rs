use super::{MediaKind, MediaStore, MediaStoreError, StoredMedia};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Media store writing to a local directory, served under `/media/`.
pub struct LocalMediaStore {
    media_dir: PathBuf,
}

impl LocalMediaStore {
    pub fn new<P: Into<PathBuf>>(media_dir: P) -> Result<Self, MediaStoreError> {
        let media_dir = media_dir.into();
        std::fs::create_dir_all(&media_dir)?;
        Ok(Self { media_dir })
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }
}

impl MediaStore for LocalMediaStore {
    fn store(&self, bytes: &[u8], kind: MediaKind) -> Result<StoredMedia, MediaStoreError> {
        let detected =
            infer::get(bytes).ok_or(MediaStoreError::UnsupportedPayload(kind.label()))?;
        let matches_kind = match kind {
            MediaKind::Image => detected.matcher_type() == infer::MatcherType::Image,
            MediaKind::Video => detected.matcher_type() == infer::MatcherType::Video,
        };
        if !matches_kind {
            return Err(MediaStoreError::UnsupportedPayload(kind.label()));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), detected.extension());
        let file_path = self.media_dir.join(&file_name);
        std::fs::write(&file_path, bytes)?;
        debug!("Stored {} bytes at {:?}", bytes.len(), file_path);

        Ok(StoredMedia {
            url: format!("/media/{file_name}"),
        })
    }

    fn delete(&self, url: &str) -> Result<(), MediaStoreError> {
        // Only the trailing path component is honored, so a stored URL can
        // never point outside the media directory.
        let file_name = match url.rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(()),
        };
        let file_path = self.media_dir.join(file_name);
        if file_path.exists() {
            std::fs::remove_file(file_path)?;
        }
        Ok(())
    }
}
