//! Image processing in pure Rust, with no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Rotate** | `rotate90`/`rotate180`/`rotate270`, nearest-neighbour for other angles |
//! | **Re-encode → JPEG/PNG** | `JpegEncoder::new_with_quality` / `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for rotation geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Filter planning and [`apply_filters`], combining the above

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{quarter_turns, rotated_dimensions};
pub use operations::{ApplyConfig, apply_filters, plan_filters, plan_transform};
pub use params::{Operation, Quality, RasterFormat, TransformParams};
pub use rust_backend::{RustBackend, is_supported_image};
