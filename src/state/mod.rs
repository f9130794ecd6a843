//! State management for the application.

use std::sync::{Arc, Mutex};
use tempfile::TempPath;

pub mod gallery;
pub mod window_bounds;

pub use gallery::GalleryEntries;
pub use window_bounds::WindowBounds;

/// Application-wide state container.
pub struct AppState {
    /// Images currently shown in the gallery.
    pub gallery: GalleryEntries,
    /// Temporary PNGs handed to the system viewer, deleted on drop.
    pub temp_files: Arc<Mutex<Vec<TempPath>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            gallery: GalleryEntries::new(),
            temp_files: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
