//! Updates of the gallery tiles and status line.
//!
//! Everything here runs on the UI thread; workers reach it through
//! `slint::invoke_from_event_loop`.

use crate::error::AppError;
use crate::image_loader::{self, ImageEntry};
use crate::state::GalleryEntries;
use log::{debug, error};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use slint::{ComponentHandle, Model, ModelRc, Rgba8Pixel, SharedPixelBuffer, VecModel};

/// Installs an empty tile model.
pub fn init_tiles(ui: &crate::AppWindow) {
    ui.global::<crate::GalleryState>()
        .set_tiles(ModelRc::new(VecModel::<crate::TileData>::default()));
}

fn with_tiles<R>(
    ui: &crate::AppWindow,
    f: impl FnOnce(&VecModel<crate::TileData>) -> R,
) -> Option<R> {
    let tiles = ui.global::<crate::GalleryState>().get_tiles();
    tiles
        .as_any()
        .downcast_ref::<VecModel<crate::TileData>>()
        .map(f)
}

/// Adds a decoded preview to the gallery.
///
/// The entry and the tile are appended together so their indices match.
pub fn append_tile(
    ui: &crate::AppWindow,
    gallery: &GalleryEntries,
    entry: ImageEntry,
    preview: SharedPixelBuffer<Rgba8Pixel>,
) {
    let tile = crate::TileData {
        preview: image_loader::create_slint_image(preview),
        file_name: entry.file_name().into(),
        caption: entry.caption().into(),
        full_ready: false,
    };

    let path = entry.path.clone();
    let preview_size = (entry.preview_width, entry.preview_height);
    let appended = with_tiles(ui, |tiles| {
        let index = gallery.push(entry);
        tiles.push(tile);
        debug!(
            "Tile {} of {}: {} (preview {}x{})",
            index + 1,
            gallery.len(),
            path.display(),
            preview_size.0,
            preview_size.1
        );
    });

    if appended.is_none() {
        error!("Gallery tile model is not a VecModel");
    }
}

/// Flags the tile at `index` once its full resolution image is available.
///
/// The tile's View and Save buttons stay disabled until then.
pub fn mark_full_ready(ui: &crate::AppWindow, index: usize) {
    with_tiles(ui, |tiles| flag_full_ready(tiles, index));
}

fn flag_full_ready(tiles: &VecModel<crate::TileData>, index: usize) -> bool {
    match tiles.row_data(index) {
        Some(mut tile) if !tile.full_ready => {
            tile.full_ready = true;
            tiles.set_row_data(index, tile);
            true
        }
        _ => false,
    }
}

pub fn set_status(ui: &crate::AppWindow, status: &str) {
    ui.global::<crate::GalleryState>().set_status(status.into());
}

/// Status line text after the scan has finished.
pub fn scan_summary(count: usize) -> String {
    match count {
        0 => "No lock screen images found".to_string(),
        1 => "1 image".to_string(),
        n => format!("{} images", n),
    }
}

/// Shows a modal error dialog for a failed save.
pub fn show_save_error(err: AppError) {
    let name = err.export_file_name().unwrap_or_default();
    let message = match &err {
        AppError::ImageExport { message, .. } => message.clone(),
        other => other.to_string(),
    };

    let _ = slint::spawn_local(async move {
        AsyncMessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(format!("Could not save {}", name))
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show()
            .await;
    });
}
