//! Style document codec.
//!
//! A style document is a flat XML file with one root element and one child tag
//! per [`StyleSettings`] field:
//!
//! ```xml
//! <style>
//!     <preset>default</preset>
//!     <brightness>0</brightness>
//!     <saturation>1</saturation>
//!     <contrast>1</contrast>
//!     <rotation>0</rotation>
//!     <compress>0.9</compress>
//! </style>
//! ```
//!
//! ## Decoding is fail-soft
//!
//! [`decode`] never fails. The root element name is ignored, unknown tags are
//! ignored, and the first occurrence of each known tag wins. A missing tag, an
//! empty tag, or a value that does not parse as the field's type all produce
//! that field's default, without affecting sibling fields.
//!
//! Numbers are read from the front of the text: leading whitespace is skipped
//! and the longest leading number is taken, so `90.5` is rotation 90 and
//! `0.5abc` is brightness 0.5. Text that does not start with a number is a
//! parse failure.
//!
//! Documents are read with `quick-xml`. Text is taken verbatim: entity
//! references are kept as written, mirroring [`encode`], which writes the
//! preset without escaping. When the document is not well-formed, every field
//! the reader had not reached yet is recovered with a non-greedy
//! `<tag>(.*?)</tag>` match over the raw text.
//!
//! ## Encoding is deterministic
//!
//! [`encode`] always writes all six fields in [`Field::ALL`] order under a
//! `<style>` root, with no prolog and no trailing newline. Numbers use Rust's
//! shortest round-trip decimal form, so `decode(&encode(&s)) == s` for any
//! settings with finite numbers and a non-empty preset free of `<` and `>`.
//!
//! ## Files
//!
//! [`load_style`] distinguishes a missing document from an unreadable one so
//! callers can detect total failure; [`load_style_or_default`] is the
//! startup path that swallows both, and [`load_style_for_edit`] is the
//! read-modify-write path that only forgives a missing file. Bytes that are
//! not valid UTF-8 are replaced rather than failing the read. [`save_style`] writes through a temporary
//! sibling file so a failed export never leaves a partial document behind.

use crate::settings::{Field, StyleSettings};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Conventional file name of the style document.
pub const STYLE_FILE_NAME: &str = "style.xml";

/// MIME type used when sharing a style document.
pub const STYLE_MIME_TYPE: &str = "application/xml";

const ROOT_TAG: &str = "style";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("style document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Decode a style document into fully-populated settings.
pub fn decode(document: &str) -> StyleSettings {
    let found = extract_fields(document);
    let mut settings = StyleSettings::default();

    for field in Field::ALL {
        if let Some(text) = found.get(&field) {
            apply_field(&mut settings, field, text);
        }
    }

    settings
}

/// Encode settings as a style document.
pub fn encode(settings: &StyleSettings) -> String {
    let mut doc = format!("<{ROOT_TAG}>\n");
    for field in Field::ALL {
        let tag = field.tag();
        doc.push_str(&format!(
            "    <{tag}>{}</{tag}>\n",
            settings.field_text(field)
        ));
    }
    doc.push_str(&format!("</{ROOT_TAG}>"));
    doc
}

/// Parse one field's raw text into `settings`, keeping the default on failure.
fn apply_field(settings: &mut StyleSettings, field: Field, text: &str) {
    let parsed = match field {
        Field::Preset => {
            if !text.is_empty() {
                settings.preset = text.to_string();
            }
            return;
        }
        Field::Rotation => parse_leading_int(text).map(|v| settings.rotation = v).is_some(),
        Field::Brightness => parse_leading_float(text).map(|v| settings.brightness = v).is_some(),
        Field::Saturation => parse_leading_float(text).map(|v| settings.saturation = v).is_some(),
        Field::Contrast => parse_leading_float(text).map(|v| settings.contrast = v).is_some(),
        Field::Compress => parse_leading_float(text).map(|v| settings.compress = v).is_some(),
    };

    if !parsed {
        debug!(field = %field, value = text, "unparsable style field, using default");
    }
}

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?[0-9]+").expect("valid integer pattern"));

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("valid decimal pattern")
});

/// The integer at the start of `text`; anything after it is ignored.
fn parse_leading_int(text: &str) -> Option<i32> {
    LEADING_INT.find(text)?.as_str().trim_start().parse().ok()
}

/// The finite decimal number at the start of `text`; anything after it is ignored.
fn parse_leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(text)?
        .as_str()
        .trim_start()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Collect the raw text of the first occurrence of each known tag.
fn extract_fields(document: &str) -> HashMap<Field, String> {
    let mut found = HashMap::new();

    if let Err(e) = read_structured(document, &mut found) {
        debug!(error = %e, "style document is not well-formed, scanning remaining tags");
        for field in Field::ALL {
            if found.contains_key(&field) {
                continue;
            }
            if let Some(text) = scan_tag(document, field) {
                found.insert(field, text);
            }
        }
    }

    found
}

/// Text capture for a known tag currently open in the reader.
struct Capture {
    field: Field,
    text: String,
}

/// Walk the document, keeping one stack entry per open element.
///
/// Only text directly inside a known tag is captured. A known tag nested in
/// another one is captured in its own right, and self-closing tags carry no
/// value, so they never claim a field.
fn read_structured(
    document: &str,
    found: &mut HashMap<Field, String>,
) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(document);
    let mut open: Vec<Option<Capture>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let capture = Field::from_tag(&name)
                    .filter(|f| !found.contains_key(f))
                    .filter(|f| !open.iter().flatten().any(|c| c.field == *f))
                    .map(|field| Capture {
                        field,
                        text: String::new(),
                    });
                open.push(capture);
            }
            Event::End(_) => {
                if let Some(Some(c)) = open.pop() {
                    found.entry(c.field).or_insert(c.text);
                }
            }
            Event::Text(t) => push_text(&mut open, &String::from_utf8_lossy(&t)),
            Event::CData(t) => push_text(&mut open, &String::from_utf8_lossy(&t)),
            Event::GeneralRef(r) => {
                push_text(&mut open, &format!("&{};", String::from_utf8_lossy(&r)));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn push_text(open: &mut [Option<Capture>], text: &str) {
    if let Some(Some(c)) = open.last_mut() {
        c.text.push_str(text);
    }
}

static TAG_PATTERNS: LazyLock<HashMap<Field, Regex>> = LazyLock::new(|| {
    Field::ALL
        .into_iter()
        .map(|field| {
            let tag = field.tag();
            let pattern = Regex::new(&format!("<{tag}>(.*?)</{tag}>"))
                .expect("tag names are plain identifiers");
            (field, pattern)
        })
        .collect()
});

/// First non-greedy `<tag>…</tag>` match on a single line.
fn scan_tag(document: &str, field: Field) -> Option<String> {
    TAG_PATTERNS
        .get(&field)?
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read and decode a style document from disk.
///
/// A document that exists but is malformed still decodes field-by-field;
/// only a missing or unreadable file is an error.
pub fn load_style(path: &Path) -> Result<StyleSettings, CodecError> {
    let text = read_document(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CodecError::NotFound(path.to_path_buf()),
        _ => CodecError::Io(e),
    })?;
    Ok(decode(&text))
}

/// Load a document that is about to be modified and saved back.
///
/// A missing document starts from the defaults. Any other read failure is
/// returned, so a save never replaces a document that could not be read.
pub fn load_style_for_edit(path: &Path) -> Result<StyleSettings, CodecError> {
    match load_style(path) {
        Err(CodecError::NotFound(_)) => Ok(StyleSettings::default()),
        other => other,
    }
}

/// Startup loading: any read failure means "use the defaults".
pub fn load_style_or_default(path: &Path) -> StyleSettings {
    match load_style(path) {
        Ok(settings) => settings,
        Err(e) => {
            debug!(error = %e, "using default style settings");
            StyleSettings::default()
        }
    }
}

/// Encode `settings` and write the document to `path`.
pub fn save_style(path: &Path, settings: &StyleSettings) -> Result<(), CodecError> {
    write_document(path, &encode(settings))?;
    Ok(())
}

/// Read a document as text. Invalid UTF-8 sequences become U+FFFD, so only
/// an I/O failure is an error.
pub fn read_document(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `contents` to `path` through a temporary sibling and a rename.
///
/// Parent directories are created as needed. On failure the temporary file
/// is removed and `path` is left as it was.
pub fn write_document(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| STYLE_FILE_NAME.to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let result = fs::write(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
