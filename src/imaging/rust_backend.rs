//! Pure Rust transform backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader`, format sniffed from content |
//! | Rotate by quarter turns | `DynamicImage::rotate90` / `rotate180` / `rotate270` |
//! | Rotate by any other angle | inverse-mapped nearest-neighbour onto an expanded RGBA canvas |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` (RGB8) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Output is written to a hidden `.part` sibling and renamed into place, so a
//! failed encode never leaves a truncated image at the output path. Every
//! write gets its own `.part` name, so two workers producing the same output
//! never share a temporary file.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{quarter_turns, rotated_dimensions};
use super::params::{Operation, Quality, RasterFormat, TransformParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Extensions of still images the backend can decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether `path` has a decodable still-image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn apply_operation(img: DynamicImage, op: Operation) -> DynamicImage {
    match op {
        Operation::Rotate { degrees } => match quarter_turns(degrees) {
            Some(0) => img,
            Some(1) => img.rotate90(),
            Some(2) => img.rotate180(),
            Some(_) => img.rotate270(),
            None => DynamicImage::ImageRgba8(rotate_any(&img.to_rgba8(), degrees)),
        },
    }
}

/// Rotate clockwise by an arbitrary angle onto a canvas that fits the result.
///
/// Pixels outside the rotated source are transparent (black once flattened
/// to JPEG).
fn rotate_any(src: &RgbaImage, degrees: i32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let (out_w, out_h) = rotated_dimensions(w, h, degrees);
    let theta = (degrees as f64).to_radians();
    let (sin, cos) = theta.sin_cos();

    let (src_cx, src_cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let (dst_cx, dst_cy) = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        // Sample at pixel centres; inverse of a clockwise rotation (y down).
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;
        let sx = dx * cos + dy * sin + src_cx;
        let sy = -dx * sin + dy * cos + src_cy;

        if sx >= 0.0 && sy >= 0.0 && sx < w as f64 && sy < h as f64 {
            *src.get_pixel(sx as u32, sy as u32)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

fn part_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    output.with_file_name(format!(".{name}.{}-{n}.part", std::process::id()))
}

fn encode_to(
    img: &DynamicImage,
    path: &Path,
    format: RasterFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        RasterFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);
            rgb.write_with_encoder(encoder)
        }
        RasterFormat::Png => img.write_with_encoder(PngEncoder::new(&mut writer)),
    };
    encoded.map_err(|e| BackendError::ProcessingFailed(format!("{format} encode failed: {e}")))?;

    writer
        .into_inner()
        .map_err(|e| BackendError::Io(e.into_error()))?
        .sync_all()
        .map_err(BackendError::Io)
}

/// Encode and move into place; the output path only ever holds a complete file.
fn save_image(
    img: &DynamicImage,
    output: &Path,
    format: RasterFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let part = part_path(output);
    let result = encode_to(img, &part, format, quality)
        .and_then(|()| std::fs::rename(&part, output).map_err(BackendError::Io));
    if result.is_err() {
        let _ = std::fs::remove_file(&part);
    }
    result
}

impl ImageBackend for RustBackend {
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let transformed = params
            .operations
            .iter()
            .fold(img, |img, op| apply_operation(img, *op));
        save_image(&transformed, &params.output, params.format, params.quality)
    }
}
