//! Shared test utilities for the stylecam test suite.
//!
//! Provides synthetic image fixtures and a scripted capture device so session
//! and batch tests can run real transforms without a camera.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let images = setup_images(tmp.path(), &["a.jpg", "b.jpg"]);
//! let device = FixtureCamera::new(tmp.path().join("shot.jpg"), 64, 48);
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::session::{CaptureDevice, CaptureError};
use crate::types::ImageRef;

// =========================================================================
// Image fixtures
// =========================================================================

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create one 64x48 JPEG per name under `dir` and return their refs in order.
pub fn setup_images(dir: &Path, names: &[&str]) -> Vec<ImageRef> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            create_test_jpeg(&path, 64, 48);
            ImageRef::new(path)
        })
        .collect()
}

/// Dimensions of an image on disk. Panics if it cannot be read.
pub fn dimensions_of(image: &ImageRef) -> (u32, u32) {
    image::image_dimensions(image.path())
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", image.path().display()))
}

// =========================================================================
// Capture device
// =========================================================================

/// A camera that writes a synthetic JPEG to a fixed path on every capture.
pub struct FixtureCamera {
    path: PathBuf,
    width: u32,
    height: u32,
    captures: AtomicUsize,
}

impl FixtureCamera {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            captures: AtomicUsize::new(0),
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl CaptureDevice for FixtureCamera {
    fn capture_still(&self) -> Result<ImageRef, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        create_test_jpeg(&self.path, self.width, self.height);
        Ok(ImageRef::new(self.path.clone()))
    }
}

/// A camera whose every capture fails.
pub struct BrokenCamera;

impl CaptureDevice for BrokenCamera {
    fn capture_still(&self) -> Result<ImageRef, CaptureError> {
        Err(CaptureError::new("sensor unavailable"))
    }
}
