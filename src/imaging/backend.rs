//! Image transform backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the image-transform collaborator: given a
//! source image and an ordered list of operations, it produces a new encoded
//! image. Everything above it (filter planning, output naming, the capture
//! session) is backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` in this module.

use super::params::TransformParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image transform backends.
pub trait ImageBackend: Sync {
    /// Decode `params.source`, apply `params.operations` in order, and
    /// encode the result to `params.output`.
    ///
    /// Must fail rather than leave a partial file at `params.output`.
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{Operation, Quality, RasterFormat};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Sources whose transform should fail.
        pub failing_sources: Mutex<Vec<String>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Transform {
            source: String,
            output: String,
            operations: Vec<Operation>,
            quality: u32,
            format: RasterFormat,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// A backend whose transforms of `source` fail with a decode error.
        pub fn failing_on(source: &str) -> Self {
            Self {
                failing_sources: Mutex::new(vec![source.to_string()]),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
            let source = params.source.to_string_lossy().to_string();
            self.operations.lock().unwrap().push(RecordedOp::Transform {
                source: source.clone(),
                output: params.output.to_string_lossy().to_string(),
                operations: params.operations.clone(),
                quality: params.quality.value(),
                format: params.format,
            });

            if self.failing_sources.lock().unwrap().contains(&source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "Failed to decode {source}"
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_transform() {
        let backend = MockBackend::new();

        backend
            .transform(&TransformParams {
                source: "/source.jpg".into(),
                output: "/output.jpg".into(),
                operations: vec![Operation::Rotate { degrees: 90 }],
                quality: Quality::new(80),
                format: RasterFormat::Jpeg,
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Transform {
                quality: 80,
                format: RasterFormat::Jpeg,
                operations,
                ..
            } if operations == &[Operation::Rotate { degrees: 90 }]
        ));
    }

    #[test]
    fn mock_fails_on_configured_source() {
        let backend = MockBackend::failing_on("/broken.jpg");
        let result = backend.transform(&TransformParams {
            source: "/broken.jpg".into(),
            output: "/out.jpg".into(),
            operations: Vec::new(),
            quality: Quality::default(),
            format: RasterFormat::Jpeg,
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        assert_eq!(backend.get_operations().len(), 1);
    }
}
