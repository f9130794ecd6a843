//! Gallery entries shared between the UI thread and decode workers.
//!
//! Entry indices match the row indices of the Slint tile model; both are
//! appended in the same UI-thread callback.

use crate::error::{AppError, Result};
use crate::image_loader::{self, ImageEntry};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Full resolution copy of an entry, fetched on first hover.
#[derive(Clone, Default)]
enum FullImage {
    #[default]
    NotLoaded,
    Loading,
    Ready(Arc<DynamicImage>),
}

struct GalleryEntry {
    entry: ImageEntry,
    full: FullImage,
}

/// Thread-safe list of the images shown in the gallery.
#[derive(Clone, Default)]
pub struct GalleryEntries {
    entries: Arc<Mutex<Vec<GalleryEntry>>>,
}

impl GalleryEntries {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GalleryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an entry and returns its index.
    pub fn push(&self, entry: ImageEntry) -> usize {
        let mut entries = self.lock();
        entries.push(GalleryEntry {
            entry,
            full: FullImage::NotLoaded,
        });
        entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn path(&self, index: usize) -> Option<PathBuf> {
        self.lock().get(index).map(|e| e.entry.path.clone())
    }

    /// Marks the full image as loading.
    ///
    /// Returns `false` when it is already loading or loaded, so repeated hovers
    /// start at most one decode.
    pub fn begin_full_load(&self, index: usize) -> bool {
        let mut entries = self.lock();
        match entries.get_mut(index) {
            Some(entry) if matches!(entry.full, FullImage::NotLoaded) => {
                entry.full = FullImage::Loading;
                true
            }
            _ => false,
        }
    }

    /// Returns the full image if it has been decoded already.
    pub fn cached_full(&self, index: usize) -> Option<Arc<DynamicImage>> {
        match self.lock().get(index).map(|e| e.full.clone()) {
            Some(FullImage::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Returns the full image, decoding it now if necessary.
    ///
    /// Blocks on disk I/O; call from a worker thread. The lock is released
    /// while decoding.
    pub fn full_image(&self, index: usize) -> Result<Arc<DynamicImage>> {
        if let Some(image) = self.cached_full(index) {
            return Ok(image);
        }

        let path = self
            .path(index)
            .ok_or_else(|| AppError::ImageLoad(format!("No gallery entry at index {}", index)))?;

        match image_loader::load_full(&path) {
            Ok(image) => {
                let image = Arc::new(image);
                if let Some(entry) = self.lock().get_mut(index) {
                    entry.full = FullImage::Ready(image.clone());
                }
                Ok(image)
            }
            Err(e) => {
                if let Some(entry) = self.lock().get_mut(index) {
                    if matches!(entry.full, FullImage::Loading) {
                        entry.full = FullImage::NotLoaded;
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn entry_for(path: &Path, width: u32, height: u32) -> ImageEntry {
        ImageEntry {
            path: path.to_path_buf(),
            width,
            height,
            preview_width: width.min(400),
            preview_height: height.min(400),
        }
    }

    #[test]
    fn indices_follow_insertion_order() {
        let gallery = GalleryEntries::new();
        assert_eq!(gallery.len(), 0);

        let first = gallery.push(entry_for(Path::new("/a"), 800, 600));
        let second = gallery.push(entry_for(Path::new("/b"), 800, 600));

        assert_eq!((first, second), (0, 1));
        assert_eq!(gallery.path(1), Some(PathBuf::from("/b")));
        assert_eq!(gallery.len(), 2);
        assert!(gallery.path(2).is_none());
    }

    #[test]
    fn full_load_starts_only_once() {
        let gallery = GalleryEntries::new();
        gallery.push(entry_for(Path::new("/a"), 800, 600));

        assert!(gallery.begin_full_load(0));
        assert!(!gallery.begin_full_load(0));
        assert!(!gallery.begin_full_load(7));
    }

    #[test]
    fn full_image_is_decoded_once_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallpaper");
        RgbImage::from_pixel(640, 480, Rgb([1, 2, 3]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let gallery = GalleryEntries::new();
        gallery.push(entry_for(&path, 640, 480));
        assert!(gallery.cached_full(0).is_none());

        let image = gallery.full_image(0).unwrap();
        assert_eq!((image.width(), image.height()), (640, 480));

        std::fs::remove_file(&path).unwrap();
        let again = gallery.full_image(0).unwrap();
        assert!(Arc::ptr_eq(&image, &again));
    }

    #[test]
    fn failed_decode_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = GalleryEntries::new();
        gallery.push(entry_for(&dir.path().join("gone"), 800, 600));

        assert!(gallery.begin_full_load(0));
        assert!(gallery.full_image(0).is_err());
        assert!(gallery.begin_full_load(0));
    }
}
