//! Applying one style to many images.
//!
//! The gallery flow: pick a set of stills, apply the current settings to all
//! of them. Every image gets the same settings snapshot. Images are processed
//! in parallel using [rayon](https://docs.rs/rayon); results come back in
//! input order and a failing image does not stop the others.

use crate::imaging::{ApplyConfig, BackendError, ImageBackend, apply_filters, is_supported_image};
use crate::settings::StyleSettings;
use crate::types::ImageRef;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Result of styling one image.
#[derive(Debug)]
pub struct BatchOutcome {
    pub source: ImageRef,
    pub result: Result<ImageRef, BackendError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Totals over a finished batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub styled: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(outcomes: &[BatchOutcome]) -> Self {
        let styled = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            styled,
            failed: outcomes.len() - styled,
        }
    }
}

/// Apply `settings` to every image, in parallel, preserving input order.
pub fn apply_to_all(
    backend: &impl ImageBackend,
    images: &[ImageRef],
    settings: &StyleSettings,
    config: &ApplyConfig,
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = images
        .par_iter()
        .map(|image| {
            let result = apply_filters(backend, image, settings, config);
            if let Err(e) = &result {
                warn!(source = %image, error = %e, "failed to style image");
            }
            BatchOutcome {
                source: image.clone(),
                result,
            }
        })
        .collect();

    let summary = BatchSummary::of(&outcomes);
    info!(styled = summary.styled, failed = summary.failed, "batch complete");
    outcomes
}

/// All supported still images under `dir`, sorted by path.
///
/// Hidden entries (including the `.part` files the backend writes) are
/// skipped, and so is `output_dir` when it lies under `dir`, so earlier
/// results are never styled again. Unreadable entries are logged and skipped.
pub fn collect_images(dir: &Path, output_dir: &Path) -> Vec<ImageRef> {
    let output_dir = output_dir.canonicalize().ok();
    let mut images: Vec<ImageRef> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(is_hidden(e.file_name()) || is_output_dir(e, output_dir.as_deref()))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_supported_image(e.path()))
        .map(|e| ImageRef::new(e.into_path()))
        .collect();
    images.sort_by(|a, b| a.path().cmp(b.path()));
    images
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn is_output_dir(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    output_dir.is_some_and(|out| {
        entry.file_type().is_dir() && entry.path().canonicalize().is_ok_and(|p| p == out)
    })
}
