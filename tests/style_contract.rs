//! End-to-end checks of the style document contract and the filter applier,
//! through the public API only.
//!
//! Run with: `cargo test --test style_contract`

use std::path::Path;
use std::sync::Mutex;
use stylecam::codec::{decode, encode, load_style, load_style_or_default, save_style, CodecError};
use stylecam::imaging::{
    ApplyConfig, BackendError, ImageBackend, Operation, RustBackend, TransformParams,
    apply_filters,
};
use stylecam::settings::{Field, StyleSettings};
use stylecam::types::ImageRef;
use tempfile::TempDir;

// ===========================================================================
// Helpers
// ===========================================================================

/// Records every transform request without touching the filesystem.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<TransformParams>>,
}

impl ImageBackend for Recorder {
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(params.clone());
        Ok(())
    }
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 4) as u8, (y * 4) as u8, 200])
    });
    img.save(path).unwrap();
}

fn sample_settings() -> Vec<StyleSettings> {
    vec![
        StyleSettings::default(),
        StyleSettings {
            preset: "noir".into(),
            brightness: -0.35,
            saturation: 0.0,
            contrast: 1.85,
            rotation: -90,
            compress: 0.55,
        },
        StyleSettings {
            preset: "vivid warm".into(),
            brightness: 1.0 / 3.0,
            saturation: 2.0,
            contrast: 0.5,
            rotation: 720,
            compress: 1.0,
        },
        StyleSettings {
            preset: "x".into(),
            brightness: 1e-12,
            saturation: 123456.789,
            contrast: -4.0,
            rotation: i32::MAX,
            compress: 0.1,
        },
    ]
}

// ===========================================================================
// Codec
// ===========================================================================

#[test]
fn round_trip_law() {
    for s in sample_settings() {
        assert_eq!(decode(&encode(&s)), s, "round trip of {s:?}");
    }
}

#[test]
fn encode_is_deterministic() {
    for s in sample_settings() {
        assert_eq!(encode(&s), encode(&s.clone()));
    }
}

#[test]
fn default_fill() {
    let expected = StyleSettings {
        preset: "default".into(),
        brightness: 0.0,
        saturation: 1.0,
        contrast: 1.0,
        rotation: 0,
        compress: 0.9,
    };
    assert_eq!(decode(""), expected);
    assert_eq!(decode("<style><unknown>3</unknown></style>"), expected);
    assert_eq!(decode("not xml at all"), expected);
}

#[test]
fn partial_document() {
    let s = decode("<style><brightness>0.5</brightness></style>");
    assert_eq!(
        s,
        StyleSettings {
            brightness: 0.5,
            ..StyleSettings::default()
        }
    );
}

#[test]
fn malformed_field_is_isolated() {
    let s = decode("<style><rotation>abc</rotation><contrast>1.5</contrast></style>");
    assert_eq!(s.rotation, 0);
    assert_eq!(s.contrast, 1.5);
    assert_eq!(s.saturation, 1.0);
}

#[test]
fn encode_shape_and_order() {
    let doc = encode(&StyleSettings::default());
    let mut last = 0;
    for field in Field::ALL {
        let open = format!("<{}>", field.tag());
        let close = format!("</{}>", field.tag());
        assert_eq!(doc.matches(&open).count(), 1, "{open} in {doc}");
        assert_eq!(doc.matches(&close).count(), 1, "{close} in {doc}");
        let pos = doc.find(&open).unwrap();
        assert!(pos > last, "{open} out of order in {doc}");
        last = pos;
    }
    assert!(doc.trim_start().starts_with("<style>"));
    assert!(doc.trim_end().ends_with("</style>"));
}

#[test]
fn missing_document_is_detectable_but_soft() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("style.xml");

    assert!(matches!(load_style(&path), Err(CodecError::NotFound(_))));
    assert_eq!(load_style_or_default(&path), StyleSettings::default());
}

#[test]
fn saved_document_loads_back() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("looks/noir.xml");
    let s = &sample_settings()[1];

    save_style(&path, s).unwrap();
    assert_eq!(load_style(&path).unwrap(), *s);
}

// ===========================================================================
// Filter applier
// ===========================================================================

#[test]
fn apply_does_not_mutate_inputs_and_returns_new_ref() {
    let tmp = TempDir::new().unwrap();
    let image = ImageRef::new(tmp.path().join("IMG_0001.jpg"));
    let settings = sample_settings()[1].clone();
    let (image_before, settings_before) = (image.clone(), settings.clone());

    let out = apply_filters(
        &Recorder::default(),
        &image,
        &settings,
        &ApplyConfig::new(tmp.path()),
    )
    .unwrap();

    assert_ne!(out, image);
    assert_eq!(image, image_before);
    assert_eq!(settings, settings_before);
}

#[test]
fn rotation_pass_through() {
    let tmp = TempDir::new().unwrap();
    let image = ImageRef::new("/dcim/IMG_0002.jpg");
    let config = ApplyConfig::new(tmp.path());

    let rotated = Recorder::default();
    let s90 = StyleSettings {
        rotation: 90,
        ..StyleSettings::default()
    };
    apply_filters(&rotated, &image, &s90, &config).unwrap();
    let calls = rotated.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operations, vec![Operation::Rotate { degrees: 90 }]);
    assert_eq!(calls[0].quality.value(), 90);

    let plain = Recorder::default();
    apply_filters(&plain, &image, &StyleSettings::default(), &config).unwrap();
    let calls = plain.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].operations.is_empty());
}

#[test]
fn apply_with_real_backend_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("IMG_0003.jpg");
    write_jpeg(&source, 40, 30);
    let before = std::fs::read(&source).unwrap();

    let settings = decode("<style><rotation>270</rotation><compress>1</compress></style>");
    let out = apply_filters(
        &RustBackend::new(),
        &ImageRef::new(&source),
        &settings,
        &ApplyConfig::new(tmp.path().join("styled")),
    )
    .unwrap();

    assert_eq!(image::image_dimensions(out.path()).unwrap(), (30, 40));
    assert_eq!(std::fs::read(&source).unwrap(), before);
}

#[test]
fn apply_unreadable_source_is_processing_failure() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("broken.jpg");
    std::fs::write(&source, b"\xff\xd8 truncated").unwrap();

    let result = apply_filters(
        &RustBackend::new(),
        &ImageRef::new(&source),
        &StyleSettings::default(),
        &ApplyConfig::new(tmp.path().join("styled")),
    );
    assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
}
