//! Service that turns the located files into gallery previews.

use crate::config::{MIN_IMAGE_WIDTH, PREVIEW_BOUND};
use crate::image_loader::{self, PreviewImage};
use crate::locator;
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Decodes previews for candidate files.
#[derive(Debug, Clone, Copy)]
pub struct GalleryService {
    bound: u32,
    min_width: u32,
}

impl Default for GalleryService {
    fn default() -> Self {
        Self::new(PREVIEW_BOUND, MIN_IMAGE_WIDTH)
    }
}

impl GalleryService {
    pub fn new(bound: u32, min_width: u32) -> Self {
        Self { bound, min_width }
    }

    /// Decodes one candidate. Failures and gated images yield `None`.
    pub fn preview(&self, path: &Path) -> Option<PreviewImage> {
        match image_loader::load_preview(path, self.bound, self.min_width) {
            Ok(preview) => preview,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Decodes all `paths` in parallel, calling `on_preview` for each accepted
    /// image as soon as it is ready. Returns the number of accepted images.
    ///
    /// Blocks until every candidate has been processed.
    pub fn load_previews<F>(&self, paths: Vec<PathBuf>, on_preview: F) -> usize
    where
        F: Fn(PreviewImage) + Send + Sync,
    {
        let accepted = AtomicUsize::new(0);

        paths.par_iter().for_each(|path| {
            if let Some(preview) = self.preview(path) {
                accepted.fetch_add(1, Ordering::Relaxed);
                on_preview(preview);
            }
        });

        accepted.into_inner()
    }

    /// Locates the lock screen assets and loads previews for them.
    pub fn scan<F>(&self, on_preview: F) -> usize
    where
        F: Fn(PreviewImage) + Send + Sync,
    {
        let start = std::time::Instant::now();
        let paths = locator::locate();
        info!("Found {} candidate files", paths.len());

        let accepted = self.load_previews(paths, on_preview);
        info!("Loaded {} previews in {:?}", accepted, start.elapsed());
        accepted
    }
}
