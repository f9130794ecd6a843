//! Event handlers for UI callbacks.
//!
//! Sets up the Logic callbacks (tile_entered, view_image, save_image) and
//! starts the initial scan, using the appropriate threading model for each
//! operation type.

use crate::config::{PNG_EXTENSION, PNG_FILTER_NAME};
use crate::error::AppError;
use crate::image_loader;
use crate::services::export_service::ensure_png_extension;
use crate::services::{ExportService, GalleryService};
use crate::state::{AppState, GalleryEntries};
use crate::ui::gallery_view;
use log::{debug, error};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::PathBuf;

/// Sets up all UI event handlers and starts loading the gallery.
pub fn setup_handlers(ui: &crate::AppWindow, state: &AppState) {
    gallery_view::init_tiles(ui);

    let export = ExportService::new(state.temp_files.clone());

    // Hover: fetch the full resolution image in the background
    ui.global::<crate::Logic>().on_tile_entered({
        let ui_handle = ui.as_weak();
        let gallery = state.gallery.clone();
        move |index| {
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            if !gallery.begin_full_load(index) {
                return;
            }

            let ui_handle = ui_handle.clone();
            let gallery = gallery.clone();
            rayon::spawn(move || match gallery.full_image(index) {
                Ok(_) => {
                    let _ = slint::invoke_from_event_loop(move || {
                        if let Some(ui) = ui_handle.upgrade() {
                            gallery_view::mark_full_ready(&ui, index);
                        }
                    });
                }
                Err(e) => error!("Could not load full image: {}", e),
            });
        }
    });

    // View: temporary PNG opened in the system viewer, failures are only logged
    ui.global::<crate::Logic>().on_view_image({
        let gallery = state.gallery.clone();
        let export = export.clone();
        move |index| {
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            let gallery = gallery.clone();
            let export = export.clone();
            rayon::spawn(move || {
                let result = gallery
                    .full_image(index)
                    .and_then(|image| export.view(&image));
                if let Err(e) = result {
                    error!("view_image: {}", e);
                }
            });
        }
    });

    // Save: the dialog must run on the main thread, so spawn_local rather than rayon
    ui.global::<crate::Logic>().on_save_image({
        let gallery = state.gallery.clone();
        let export = export.clone();
        move |index| {
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            let Some(source) = gallery.path(index) else {
                return;
            };
            let gallery = gallery.clone();
            let export = export.clone();
            let _ = slint::spawn_local(async move {
                let Some(target) = pick_save_target(&source).await else {
                    debug!("Save cancelled");
                    return;
                };
                save_in_background(gallery, export, index, target);
            });
        }
    });

    start_scan(ui.as_weak(), state.gallery.clone());
}

/// Native save dialog starting in the home directory.
async fn pick_save_target(source: &std::path::Path) -> Option<PathBuf> {
    let suggested = source
        .file_stem()
        .map(|stem| format!("{}.{}", stem.to_string_lossy(), PNG_EXTENSION))
        .unwrap_or_default();

    let mut dialog = AsyncFileDialog::new()
        .add_filter(PNG_FILTER_NAME, &[PNG_EXTENSION])
        .set_file_name(suggested);
    if let Some(home) = dirs::home_dir() {
        dialog = dialog.set_directory(home);
    }

    let handle = dialog.save_file().await?;
    Some(ensure_png_extension(handle.path().to_path_buf()))
}

fn save_in_background(
    gallery: GalleryEntries,
    export: ExportService,
    index: usize,
    target: PathBuf,
) {
    rayon::spawn(move || {
        let result = gallery
            .full_image(index)
            .and_then(|image| export.save(&image, &target));

        match result {
            Ok(()) => {}
            Err(e @ AppError::ImageExport { .. }) => {
                error!("save_image: {}", e);
                let _ = slint::invoke_from_event_loop(move || gallery_view::show_save_error(e));
            }
            Err(e) => error!("save_image: {}", e),
        }
    });
}

/// Locates and decodes the lock screen images, adding tiles as they arrive.
fn start_scan(ui_handle: slint::Weak<crate::AppWindow>, gallery: GalleryEntries) {
    rayon::spawn(move || {
        let count = GalleryService::default().scan(|preview| {
            let buffer = image_loader::create_pixel_buffer(&preview.pixels);
            let entry = preview.entry;
            let ui_handle = ui_handle.clone();
            let gallery = gallery.clone();
            let _ = slint::invoke_from_event_loop(move || {
                if let Some(ui) = ui_handle.upgrade() {
                    gallery_view::append_tile(&ui, &gallery, entry, buffer);
                }
            });
        });

        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui_handle.upgrade() {
                gallery_view::set_status(&ui, &gallery_view::scan_summary(count));
            }
        });
    });
}
