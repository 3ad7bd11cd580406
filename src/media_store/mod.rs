//! Storage for uploaded media payloads (avatars, covers, thumbnails, videos).

mod local;

pub use local::LocalMediaStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("unsupported payload, expected {0}")]
    UnsupportedPayload(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Durable reference to a stored payload.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// URL path the file is served under.
    pub url: String,
}

pub trait MediaStore: Send + Sync {
    /// Validates the payload against the expected kind and persists it,
    /// returning a durable URL.
    fn store(&self, bytes: &[u8], kind: MediaKind) -> Result<StoredMedia, MediaStoreError>;

    /// Removes a previously stored payload. Unknown URLs are a no-op.
    fn delete(&self, url: &str) -> Result<(), MediaStoreError>;
}
