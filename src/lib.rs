//! # stylecam
//!
//! The style pipeline of a camera app: a flat XML style document drives how
//! each captured still is post-processed.
//!
//! # Architecture: Decode → Edit → Apply / Export
//!
//! ```text
//! style.xml ──decode──► StyleSettings ◄── settings panel (update_settings)
//!                           │ snapshot
//!             ┌─────────────┴──────────────┐
//!             ▼                            ▼
//!   capture → apply_filters → new image    encode → style.xml → share
//! ```
//!
//! Decoding is fail-soft: a missing document means all defaults, and a field
//! that does not parse falls back to its own default without disturbing the
//! others. Apply and export failures are always surfaced.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`settings`] | The `StyleSettings` record, its fields, defaults and panel ranges |
//! | [`codec`] | Style document `decode`/`encode`, load and atomic save |
//! | [`imaging`] | Filter planning, [`imaging::apply_filters`], the `ImageBackend` trait and the pure-Rust backend |
//! | [`naming`] | Output file names for styled images |
//! | [`session`] | Camera session: owned settings, capture gating, viewfinder controls, export |
//! | [`batch`] | Parallel apply over a set of gallery images |
//! | [`config`] | `stylecam.toml` loading, validation and merging |
//! | [`types`] | Shared handle types (`ImageRef`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Tone Fields Are Stored, Not Applied
//!
//! Brightness, saturation and contrast round-trip through the document and the
//! settings panel, but the applier only rotates and re-encodes. There is no
//! defined pixel algorithm for them yet; when they are non-neutral the applier
//! logs that they were skipped.
//!
//! ## Every Apply Produces a New File
//!
//! The re-encode step always runs, even at full quality, and the output name
//! carries a hash of the source and the style document. Callers never see
//! their input handle come back.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, rotation and
//! JPEG/PNG encoding. No system libraries are needed.

pub mod batch;
pub mod codec;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod session;
pub mod settings;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
