//! Output file naming for styled images.
//!
//! Every apply produces a new image next to (or away from) its source. The
//! name is derived from the source stem plus a short content hash:
//!
//! ```text
//! IMG_0042.jpg  +  settings  →  IMG_0042-styled-3f9a1c0b22de.jpg
//! ```
//!
//! The hash covers the source path and the encoded style document, so the
//! same capture styled two different ways lands in two files, and re-applying
//! identical settings to the same capture is idempotent.

use crate::codec;
use crate::imaging::RasterFormat;
use crate::settings::StyleSettings;
use crate::types::ImageRef;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const HASH_LEN: usize = 12;

/// SHA-256 over the source location and the style document, hex-encoded.
pub fn style_hash(source: &ImageRef, settings: &StyleSettings) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"stylecam\0");
    hasher.update(source.path().to_string_lossy().as_bytes());
    hasher.update(b"\0");
    hasher.update(codec::encode(settings).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// File name for the styled version of `source`.
pub fn output_name(source: &ImageRef, settings: &StyleSettings, format: RasterFormat) -> String {
    let hash = style_hash(source, settings);
    format!(
        "{}-styled-{}.{}",
        source.stem(),
        &hash[..HASH_LEN],
        format.extension()
    )
}

/// Full output path in `output_dir`, guaranteed to differ from the source.
pub fn output_path(
    source: &ImageRef,
    settings: &StyleSettings,
    format: RasterFormat,
    output_dir: &Path,
) -> PathBuf {
    let path = output_dir.join(output_name(source, settings, format));
    if path != source.path() {
        return path;
    }
    let name = format!(
        "{}-1.{}",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("image"),
        format.extension()
    );
    output_dir.join(name)
}
