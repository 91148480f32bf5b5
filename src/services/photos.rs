//! Item photos stored as JPEG files beside the database.
//!
//! Paths handed back to callers (and stored on items) are relative to the
//! store root, e.g. `photos/3f2c….jpg`, so the data directory can move.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// Subdirectory of the store root holding photo files.
pub const PHOTOS_DIR: &str = "photos";

/// Encodings larger than this are redone at [`REDUCED_QUALITY`].
pub const MAX_PHOTO_BYTES: usize = 1_000_000;

pub const JPEG_QUALITY: u8 = 70;
pub const REDUCED_QUALITY: u8 = 40;

/// Reads and writes photo files under a root directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
    max_bytes: usize,
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(image)?;
    Ok(buf.into_inner())
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: MAX_PHOTO_BYTES,
        }
    }

    /// Override the size threshold that triggers re-encoding.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Absolute location of a stored relative path.
    #[must_use]
    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Decode any supported image, store it as JPEG and return its
    /// relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a decodable image or the file
    /// cannot be written.
    pub fn save(&self, bytes: &[u8]) -> Result<String> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();

        let mut data = encode_jpeg(&rgb, JPEG_QUALITY)?;
        if data.len() > self.max_bytes {
            debug!(size = data.len(), "Photo over size limit, re-encoding");
            data = encode_jpeg(&rgb, REDUCED_QUALITY)?;
        }

        let relative = format!("{PHOTOS_DIR}/{}.jpg", Uuid::new_v4());
        let path = self.path_of(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &data)?;

        debug!(path = %relative, size = data.len(), "Saved photo");
        Ok(relative)
    }

    /// Read an image file from disk and [`save`](Self::save) it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or saved.
    pub fn save_file(&self, source: &Path) -> Result<String> {
        let bytes = fs::read(source)?;
        self.save(&bytes)
    }

    /// # Errors
    ///
    /// Returns an error if the file is missing or not a valid image.
    pub fn load(&self, relative: &str) -> Result<DynamicImage> {
        let bytes = fs::read(self.path_of(relative))?;
        Ok(image::load_from_memory(&bytes)?)
    }

    /// Remove a stored photo. A photo that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for any other removal failure.
    pub fn delete(&self, relative: &str) -> Result<()> {
        match fs::remove_file(self.path_of(relative)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %relative, "Photo already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path());

        let relative = store.save(&png_bytes(40, 30)).unwrap();
        assert!(relative.starts_with("photos/"));
        assert!(relative.ends_with(".jpg"));
        assert!(store.path_of(&relative).exists());

        let loaded = store.load(&relative).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (40, 30));
    }

    #[test]
    fn test_oversized_photo_reencoded_at_lower_quality() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path()).with_max_bytes(10);
        let bytes = png_bytes(64, 64);

        let relative = store.save(&bytes).unwrap();

        let rgb = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let expected = encode_jpeg(&rgb, REDUCED_QUALITY).unwrap();
        let stored = fs::read(store.path_of(&relative)).unwrap();
        assert_eq!(stored.len(), expected.len());
    }

    #[test]
    fn test_save_rejects_non_image() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path());
        assert!(store.save(b"definitely not an image").is_err());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path());
        let relative = store.save(&png_bytes(8, 8)).unwrap();

        store.delete(&relative).unwrap();
        assert!(!store.path_of(&relative).exists());
        store.delete(&relative).unwrap();
    }
}
