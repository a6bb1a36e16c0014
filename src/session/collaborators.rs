//! Platform capabilities the session drives but does not implement.
//!
//! The camera sensor, the document store and the share sheet belong to the
//! host. Only the document store has an in-crate implementation
//! ([`FsDocumentStore`]); the CLI uses it for style files.

use crate::codec;
use crate::types::ImageRef;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("capture failed: {message}")]
pub struct CaptureError {
    message: String,
}

impl CaptureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sharing unavailable: {message}")]
pub struct ShareError {
    message: String,
}

impl ShareError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Takes a still photo and returns a handle to the stored frame.
pub trait CaptureDevice: Sync {
    fn capture_still(&self) -> Result<ImageRef, CaptureError>;
}

/// Text document persistence.
pub trait DocumentStore {
    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Must not leave a partial document at `path` on failure.
    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Hands a file to the platform share sheet.
pub trait ShareSheet {
    fn share(&self, path: &Path, mime_type: &str) -> Result<(), ShareError>;
}

/// Documents on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDocumentStore;

impl DocumentStore for FsDocumentStore {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        codec::read_document(path)
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        codec::write_document(path, contents)
    }
}
