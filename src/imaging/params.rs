//! Parameter types for image transforms.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the filter applier in [`operations`](super::operations)
//! (which decides which operations a capture needs) and the
//! [`backend`](super::backend) (which does the pixel work). Swapping the
//! backend for a recording mock leaves the planning logic untouched.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Operation`]: One geometric instruction, applied in list order.
//! - [`RasterFormat`]: Output container for the mandatory re-encode.
//! - [`TransformParams`]: Full specification for one transform: source, output, operations, quality, format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Map a `compress` factor in (0, 1] onto the encoder's 1-100 scale.
    ///
    /// Out-of-range factors are clamped; a non-finite factor yields the default.
    pub fn from_compress(compress: f64) -> Self {
        if !compress.is_finite() {
            return Self::default();
        }
        let scaled = (compress * 100.0).round().clamp(1.0, 100.0);
        Self(scaled as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// A single geometric instruction for the transform collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Rotate clockwise by `degrees`. Negative values rotate counter-clockwise.
    /// The value is passed through as exported, without normalization.
    Rotate { degrees: i32 },
}

/// Output format of the re-encode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Jpeg,
    Png,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
        }
    }

    /// Whether the encoder honours [`Quality`]. PNG is lossless.
    pub fn is_lossy(self) -> bool {
        matches!(self, RasterFormat::Jpeg)
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterFormat::Jpeg => f.write_str("jpeg"),
            RasterFormat::Png => f.write_str("png"),
        }
    }
}

/// Parameters for one transform: decode `source`, run `operations` in
/// order, encode to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub operations: Vec<Operation>,
    pub quality: Quality,
    pub format: RasterFormat,
}
