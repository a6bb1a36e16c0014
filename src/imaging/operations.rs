//! Filter application.
//!
//! These functions turn [`StyleSettings`] into a [`TransformParams`] and hand
//! it to the backend. Planning is pure; only [`apply_filters`] touches the
//! backend.
//!
//! The operation list is:
//!
//! 1. `Rotate { degrees: rotation }`, only when `rotation != 0`
//! 2. the re-encode at `Quality::from_compress(compress)`, always, even at full
//!    quality, so the result is always a new image
//!
//! Brightness, saturation and contrast are not translated into operations.

use super::backend::{BackendError, ImageBackend};
use super::params::{Operation, Quality, RasterFormat, TransformParams};
use crate::naming;
use crate::settings::StyleSettings;
use crate::types::ImageRef;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Where and how styled images are written.
#[derive(Debug, Clone)]
pub struct ApplyConfig {
    pub output_dir: PathBuf,
    pub format: RasterFormat,
}

impl ApplyConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: RasterFormat::default(),
        }
    }
}

/// Geometric operations implied by `settings`, in execution order.
pub fn plan_filters(settings: &StyleSettings) -> Vec<Operation> {
    let mut operations = Vec::new();
    if settings.rotation != 0 {
        operations.push(Operation::Rotate {
            degrees: settings.rotation,
        });
    }
    operations
}

/// Plan a full transform without executing it.
pub fn plan_transform(
    image: &ImageRef,
    settings: &StyleSettings,
    config: &ApplyConfig,
) -> TransformParams {
    TransformParams {
        source: image.path().to_path_buf(),
        output: naming::output_path(image, settings, config.format, &config.output_dir),
        operations: plan_filters(settings),
        quality: Quality::from_compress(settings.compress),
        format: config.format,
    }
}

/// Apply `settings` to a captured still and return the new image.
///
/// The source image and `settings` are left untouched; the returned handle
/// always points at a different file than `image`.
pub fn apply_filters(
    backend: &impl ImageBackend,
    image: &ImageRef,
    settings: &StyleSettings,
    config: &ApplyConfig,
) -> Result<ImageRef> {
    if settings.has_tone_adjustments() {
        debug!(
            brightness = settings.brightness,
            saturation = settings.saturation,
            contrast = settings.contrast,
            "tone settings are not applied to pixels"
        );
    }

    ensure_dir(&config.output_dir)?;
    let params = plan_transform(image, settings, config);
    backend.transform(&params)?;

    info!(
        source = %image,
        output = %params.output.display(),
        operations = params.operations.len(),
        quality = params.quality.value(),
        "styled image written"
    );
    Ok(ImageRef::new(params.output))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    fn rotated(degrees: i32) -> StyleSettings {
        StyleSettings {
            rotation: degrees,
            ..StyleSettings::default()
        }
    }

    #[test]
    fn plan_filters_no_rotation_is_empty() {
        assert!(plan_filters(&StyleSettings::default()).is_empty());
    }

    #[test]
    fn plan_filters_rotation_passes_through_unnormalized() {
        assert_eq!(
            plan_filters(&rotated(-450)),
            vec![Operation::Rotate { degrees: -450 }]
        );
    }

    #[test]
    fn plan_filters_ignores_tone_settings() {
        let s = StyleSettings {
            brightness: 0.8,
            saturation: 0.0,
            contrast: 2.0,
            ..StyleSettings::default()
        };
        assert!(plan_filters(&s).is_empty());
    }

    #[test]
    fn plan_transform_maps_compress_to_quality() {
        let s = StyleSettings {
            compress: 0.5,
            ..StyleSettings::default()
        };
        let params = plan_transform(&ImageRef::new("/in.jpg"), &s, &ApplyConfig::new("/out"));
        assert_eq!(params.quality.value(), 50);
        assert_eq!(params.format, RasterFormat::Jpeg);
        assert!(params.output.starts_with("/out"));
    }

    #[test]
    fn apply_rotation_then_reencode() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let config = ApplyConfig::new(tmp.path());

        apply_filters(&backend, &ImageRef::new("/in.jpg"), &rotated(90), &config).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Transform { operations, quality: 90, .. }
                if operations == &[Operation::Rotate { degrees: 90 }]
        ));
    }

    #[test]
    fn apply_without_rotation_only_reencodes() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let config = ApplyConfig::new(tmp.path());

        apply_filters(&backend, &ImageRef::new("/in.jpg"), &rotated(0), &config).unwrap();

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Transform { operations, .. } if operations.is_empty()
        ));
    }

    #[test]
    fn apply_full_quality_still_reencodes() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let s = StyleSettings {
            compress: 1.0,
            ..StyleSettings::default()
        };

        let out = apply_filters(&backend, &ImageRef::new("/in.jpg"), &s, &ApplyConfig::new(tmp.path()))
            .unwrap();

        assert_ne!(out.path(), Path::new("/in.jpg"));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Transform { quality: 100, .. }
        ));
    }

    #[test]
    fn apply_returns_new_ref_and_leaves_inputs() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let image = ImageRef::new(tmp.path().join("in.jpg"));
        let settings = rotated(180);
        let (image_before, settings_before) = (image.clone(), settings.clone());

        let out = apply_filters(&backend, &image, &settings, &ApplyConfig::new(tmp.path())).unwrap();

        assert_ne!(out, image);
        assert_eq!(image, image_before);
        assert_eq!(settings, settings_before);
    }

    #[test]
    fn apply_surfaces_backend_failure() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::failing_on("/broken.jpg");

        let result = apply_filters(
            &backend,
            &ImageRef::new("/broken.jpg"),
            &StyleSettings::default(),
            &ApplyConfig::new(tmp.path()),
        );
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn apply_creates_output_dir() {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("captures/styled");
        let backend = MockBackend::new();

        apply_filters(
            &backend,
            &ImageRef::new("/in.jpg"),
            &StyleSettings::default(),
            &ApplyConfig::new(&out_dir),
        )
        .unwrap();
        assert!(out_dir.is_dir());
    }
}
