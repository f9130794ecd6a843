//! Service for exporting gallery images as PNG files.
//!
//! Saves to a user-chosen path, or writes a temporary copy and hands it to the
//! system's default image viewer.

use crate::config::{PNG_EXTENSION, TEMP_FILE_PREFIX};
use crate::error::{AppError, Result};
use image::{DynamicImage, ImageFormat};
use log::info;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::TempPath;

/// Writes `image` to `path` as PNG.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AppError::ImageExport {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Writes `image` to a new temporary `image_*.png` file.
///
/// The file is removed when the returned `TempPath` is dropped.
pub fn write_temp_png(image: &DynamicImage) -> Result<TempPath> {
    let export_error = |path: PathBuf, message: String| AppError::ImageExport { path, message };

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(&format!(".{}", PNG_EXTENSION))
        .tempfile()
        .map_err(|e| export_error(std::env::temp_dir(), e.to_string()))?;

    let path = file.path().to_path_buf();
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| export_error(path.clone(), e.to_string()))?;
        writer
            .flush()
            .map_err(|e| export_error(path.clone(), e.to_string()))?;
    }

    Ok(file.into_temp_path())
}

/// Appends `.png` to paths picked without an extension.
pub fn ensure_png_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(PNG_EXTENSION)
    }
}

/// Asks the OS to open `path` with its default application.
///
/// Waits for the launcher (not the viewer) to exit; call from a worker thread.
pub fn open_with_default_viewer(path: &Path) -> Result<()> {
    let status = viewer_command(path)
        .status()
        .map_err(|e| AppError::Launch(format!("{}: {}", path.display(), e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Launch(format!(
            "{}: launcher exited with {}",
            path.display(),
            status
        )))
    }
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

/// Service for saving and viewing images.
#[derive(Clone)]
pub struct ExportService {
    temp_files: Arc<Mutex<Vec<TempPath>>>,
}

impl ExportService {
    /// Creates a new export service that keeps its temporary files in `temp_files`.
    pub fn new(temp_files: Arc<Mutex<Vec<TempPath>>>) -> Self {
        Self { temp_files }
    }

    /// Saves `image` as PNG at `path`.
    pub fn save(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        write_png(image, path)?;
        info!("Saved {}", path.display());
        Ok(())
    }

    /// Writes a temporary copy of `image` and opens it in the default viewer.
    ///
    /// The temporary file lives until the application exits.
    pub fn view(&self, image: &DynamicImage) -> Result<()> {
        let temp_path = write_temp_png(image)?;
        let path = temp_path.to_path_buf();

        self.temp_files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(temp_path);

        open_with_default_viewer(&path)?;
        info!("Opened {} in the default viewer", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 16, Rgba([200, 100, 50, 255])))
    }

    #[test]
    fn saved_file_is_a_png_with_the_same_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.png");

        write_png(&sample_image(), &path).unwrap();

        let reread = image::open(&path).unwrap();
        assert_eq!(image::ImageFormat::from_path(&path).unwrap(), ImageFormat::Png);
        assert_eq!(reread.to_rgba8(), sample_image().to_rgba8());
    }

    #[test]
    fn unwritable_target_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("wallpaper.png");

        let err = write_png(&sample_image(), &path).unwrap_err();

        match &err {
            AppError::ImageExport { path: failed, .. } => assert_eq!(failed, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.export_file_name().as_deref(), Some("wallpaper.png"));
    }

    #[test]
    fn service_save_keeps_working_after_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new(Arc::new(Mutex::new(Vec::new())));
        let image = sample_image();

        assert!(service.save(&image, &dir.path().join("nope/a.png")).is_err());
        assert!(service.save(&image, &dir.path().join("a.png")).is_ok());
    }

    #[test]
    fn temp_png_is_removed_on_drop() {
        let temp_path = write_temp_png(&sample_image()).unwrap();
        let path = temp_path.to_path_buf();

        assert!(path.file_name().unwrap().to_string_lossy().starts_with("image_"));
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(image::open(&path).unwrap().width(), 32);

        drop(temp_path);
        assert!(!path.exists());
    }

    #[test]
    fn png_extension_is_added_only_when_missing() {
        assert_eq!(
            ensure_png_extension(PathBuf::from("/tmp/wallpaper")),
            PathBuf::from("/tmp/wallpaper.png")
        );
        assert_eq!(
            ensure_png_extension(PathBuf::from("/tmp/wallpaper.png")),
            PathBuf::from("/tmp/wallpaper.png")
        );
    }
}
