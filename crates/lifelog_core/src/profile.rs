//! Profile photo file store.
//!
//! # Responsibility
//! - Persist and load the single profile image under a fixed filename.
//!
//! # Invariants
//! - Failures are swallowed: a bad save or load keeps the previous image as
//!   the display state. No retry, no timeout.
//! - Only bytes that sniff as PNG or JPEG are accepted.

use log::warn;
use std::path::{Path, PathBuf};

const PHOTO_FILENAME: &str = "profile_photo";

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// File-backed store for the user's profile photo.
pub struct ProfilePhotoStore {
    path: PathBuf,
}

impl ProfilePhotoStore {
    /// Stores the photo under `dir`, which must already exist.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PHOTO_FILENAME),
        }
    }

    /// Writes new photo bytes. Returns `false` (leaving any previous photo
    /// in place) when the bytes do not decode as a known image format or the
    /// write fails.
    pub fn save(&self, bytes: &[u8]) -> bool {
        if !looks_like_image(bytes) {
            warn!("event=photo_save module=profile status=error reason=decode");
            return false;
        }
        match std::fs::write(&self.path, bytes) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=photo_save module=profile status=error reason=io error={err}");
                false
            }
        }
    }

    /// Reads the stored photo. `None` when absent, unreadable, or corrupt.
    pub fn load(&self) -> Option<Vec<u8>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return None,
        };
        if !looks_like_image(&bytes) {
            warn!("event=photo_load module=profile status=error reason=decode");
            return None;
        }
        Some(bytes)
    }
}

fn looks_like_image(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_MAGIC) || bytes.starts_with(JPEG_MAGIC)
}
