//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Show
//!
//! ```text
//! Style (style.xml)
//!     preset: default
//!     brightness: 0.3 (not applied)
//!     saturation: 1
//!     contrast: 1
//!     rotation: 90°
//!     compress: 0.9 → JPEG quality 90
//! ```
//!
//! ## Apply
//!
//! ```text
//! 001 IMG_0001.jpg → captures/IMG_0001-styled-3f9a1c0b22de.jpg
//! 002 IMG_0002.jpg
//!     Error: Processing failed: Failed to decode IMG_0002.jpg
//!
//! Styled 1 image, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::batch::{BatchOutcome, BatchSummary};
use crate::imaging::{Quality, RasterFormat};
use crate::settings::{Field, StyleSettings};
use serde::Serialize;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `base` when it lives under it.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// show
// ============================================================================

fn is_unapplied_adjustment(settings: &StyleSettings, field: Field) -> bool {
    let neutral = StyleSettings::default();
    match field {
        Field::Brightness => settings.brightness != neutral.brightness,
        Field::Saturation => settings.saturation != neutral.saturation,
        Field::Contrast => settings.contrast != neutral.contrast,
        _ => false,
    }
}

/// Format the settings record as an indented field list.
pub fn format_settings(settings: &StyleSettings, source: &Path, format: RasterFormat) -> Vec<String> {
    let mut lines = vec![format!("Style ({})", source.display())];
    for field in Field::ALL {
        let value = settings.field_text(field);
        let line = match field {
            Field::Rotation => format!("{field}: {value}°"),
            Field::Compress if format.is_lossy() => format!(
                "{field}: {value} → {} quality {}",
                format.to_string().to_uppercase(),
                Quality::from_compress(settings.compress).value()
            ),
            _ if is_unapplied_adjustment(settings, field) => {
                format!("{field}: {value} (not applied)")
            }
            _ => format!("{field}: {value}"),
        };
        lines.push(format!("{}{}", indent(1), line));
    }
    lines
}

pub fn print_settings(settings: &StyleSettings, source: &Path, format: RasterFormat) {
    for line in format_settings(settings, source, format) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct SettingsReport<'a> {
    source: &'a Path,
    settings: &'a StyleSettings,
    quality: u32,
}

/// Machine-readable form of `show`.
pub fn format_settings_json(
    settings: &StyleSettings,
    source: &Path,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SettingsReport {
        source,
        settings,
        quality: Quality::from_compress(settings.compress).value(),
    })
}

// ============================================================================
// set / export
// ============================================================================

/// One line confirming a panel edit, showing the stored value.
pub fn format_set(settings: &StyleSettings, field: Field, path: &Path) -> String {
    format!(
        "{field} = {} → {}",
        settings.field_text(field),
        path.display()
    )
}

pub fn format_export(path: &Path) -> String {
    format!("Exported style → {}", path.display())
}

// ============================================================================
// apply
// ============================================================================

/// Format batch results: one entry per source, errors as indented context.
pub fn format_batch_output(outcomes: &[BatchOutcome], base: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        let source = display_path(outcome.source.path(), base);
        match &outcome.result {
            Ok(output) => lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                source,
                display_path(output.path(), base)
            )),
            Err(e) => {
                lines.push(format!("{} {}", format_index(i + 1), source));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }

    let summary = BatchSummary::of(outcomes);
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(if summary.failed == 0 {
        format!("Styled {}", plural(summary.styled, "image"))
    } else {
        format!(
            "Styled {}, {} failed",
            plural(summary.styled, "image"),
            summary.failed
        )
    });
    lines
}

pub fn print_batch_output(outcomes: &[BatchOutcome], base: &Path) {
    for line in format_batch_output(outcomes, base) {
        println!("{}", line);
    }
}
