//! Image decoding for gallery previews and full resolution exports.
//!
//! Lock screen assets have no file extension, so the format is always guessed
//! from the file content.

use crate::error::{AppError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage};
use log::debug;
use slint::{Image, Rgba8Pixel, SharedPixelBuffer};
use std::path::{Path, PathBuf};

/// A file that decoded to an acceptable preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Dimensions of the source image.
    pub width: u32,
    pub height: u32,
    /// Dimensions of the downscaled preview.
    pub preview_width: u32,
    pub preview_height: u32,
}

impl ImageEntry {
    /// File name for display purposes.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Short size caption, e.g. `1920 × 1080`.
    pub fn caption(&self) -> String {
        format!("{} × {}", self.width, self.height)
    }
}

/// Preview pixels together with the entry describing them.
pub struct PreviewImage {
    pub entry: ImageEntry,
    pub pixels: RgbaImage,
}

/// Size an image gets when it is downscaled to fit a `bound` square.
///
/// Images that already fit are left alone.
pub fn fit_within(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if width <= bound && height <= bound {
        return (width, height);
    }

    let scale = f64::min(bound as f64 / width as f64, bound as f64 / height as f64);
    let fitted_width = ((width as f64 * scale).round() as u32).max(1);
    let fitted_height = ((height as f64 * scale).round() as u32).max(1);
    (fitted_width, fitted_height)
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>> {
    ImageReader::open(path)
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Decodes a preview of at most `bound` pixels per side.
///
/// Returns `Ok(None)` when the preview would be narrower than `min_width`.
/// The header is checked first so small files are never fully decoded.
pub fn load_preview(path: &Path, bound: u32, min_width: u32) -> Result<Option<PreviewImage>> {
    let (width, height) = open_reader(path)?.into_dimensions()?;

    let (fitted_width, _) = fit_within(width, height, bound);
    if fitted_width < min_width {
        debug!(
            "Skipping {} ({}x{}): preview narrower than {}",
            path.display(),
            width,
            height,
            min_width
        );
        return Ok(None);
    }

    let image = open_reader(path)?.decode()?;
    let preview = if width > bound || height > bound {
        image.resize(bound, bound, FilterType::Triangle)
    } else {
        image
    };

    if preview.width() < min_width {
        return Ok(None);
    }

    let pixels = preview.to_rgba8();
    Ok(Some(PreviewImage {
        entry: ImageEntry {
            path: path.to_path_buf(),
            width,
            height,
            preview_width: pixels.width(),
            preview_height: pixels.height(),
        },
        pixels,
    }))
}

/// Decodes the image at full resolution.
pub fn load_full(path: &Path) -> Result<DynamicImage> {
    Ok(open_reader(path)?.decode()?)
}

/// Copies RGBA pixels into a buffer Slint can display.
///
/// The buffer is `Send`, so it can be built on a worker thread and turned
/// into a `slint::Image` on the UI thread.
pub fn create_pixel_buffer(pixels: &RgbaImage) -> SharedPixelBuffer<Rgba8Pixel> {
    SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        pixels.as_raw(),
        pixels.width(),
        pixels.height(),
    )
}

/// Creates a Slint image from a pixel buffer.
pub fn create_slint_image(buffer: SharedPixelBuffer<Rgba8Pixel>) -> Image {
    Image::from_rgba8(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([30, 90, 160]))
            .save_with_format(&path, format)
            .unwrap();
        path
    }

    #[test]
    fn fit_within_downscales_preserving_aspect_ratio() {
        assert_eq!(fit_within(800, 600, 400), (400, 300));
        assert_eq!(fit_within(1920, 1080, 400), (400, 225));
        assert_eq!(fit_within(1080, 1920, 400), (225, 400));
    }

    #[test]
    fn fit_within_never_upscales() {
        assert_eq!(fit_within(300, 200, 400), (300, 200));
        assert_eq!(fit_within(400, 400, 400), (400, 400));
    }

    #[test]
    fn landscape_image_becomes_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "wide", 800, 600, ImageFormat::Jpeg);

        let preview = load_preview(&path, 400, 400).unwrap().unwrap();

        assert_eq!(preview.entry.path, path);
        assert_eq!((preview.entry.width, preview.entry.height), (800, 600));
        assert_eq!((preview.pixels.width(), preview.pixels.height()), (400, 300));
        assert_eq!(preview.entry.caption(), "800 × 600");
    }

    #[test]
    fn image_exactly_at_minimum_width_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "edge.png", 400, 250, ImageFormat::Png);

        let preview = load_preview(&path, 400, 400).unwrap().unwrap();
        assert_eq!(preview.entry.preview_width, 400);
    }

    #[test]
    fn narrow_images_are_gated() {
        let dir = tempfile::tempdir().unwrap();
        let small = write_image(dir.path(), "icon", 120, 120, ImageFormat::Png);
        let portrait = write_image(dir.path(), "portrait", 600, 1200, ImageFormat::Png);

        assert!(load_preview(&small, 400, 400).unwrap().is_none());
        assert!(load_preview(&portrait, 400, 400).unwrap().is_none());
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(load_preview(&path, 400, 400), Err(AppError::ImageLoad(_))));
        assert!(load_full(&path).is_err());
    }

    #[test]
    fn full_decode_keeps_source_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "wide", 1024, 512, ImageFormat::Png);

        let image = load_full(&path).unwrap();
        assert_eq!((image.width(), image.height()), (1024, 512));
    }
}
