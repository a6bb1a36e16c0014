//! Camera session: the one place that owns the current style settings.
//!
//! A [`CameraSession`] holds the settings record the settings panel edits,
//! the viewfinder [`Controls`], and the last image shown in the preview. The
//! codec and the filter applier only ever see snapshots:
//!
//! ```text
//! load_settings ──► current settings ◄── update_settings (panel)
//!                        │ snapshot
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!   capture → apply_filters      export → encode → store → share
//! ```
//!
//! Capture is not re-entrant: while one capture/apply cycle is in flight a
//! second request fails fast with [`SessionError::CaptureInProgress`].

mod collaborators;
mod controls;

pub use collaborators::{
    CaptureDevice, CaptureError, DocumentStore, FsDocumentStore, ShareError, ShareSheet,
};
pub use controls::{
    AspectRatio, CaptureMode, Controls, Facing, FlashMode, SelfTimer, ZoomPreset,
};

use crate::codec::{self, STYLE_MIME_TYPE};
use crate::imaging::{ApplyConfig, BackendError, ImageBackend, apply_filters};
use crate::settings::{Field, SettingsError, StyleSettings};
use crate::types::ImageRef;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a capture is already in progress")]
    CaptureInProgress,
    #[error("{0} mode does not produce still images")]
    UnsupportedMode(CaptureMode),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("processing failed: {0}")]
    Processing(#[from] BackendError),
    #[error("could not write style document: {0}")]
    Storage(#[source] std::io::Error),
    #[error(transparent)]
    Share(#[from] ShareError),
}

impl SessionError {
    /// Notice shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::CaptureInProgress => "Hold on, the last photo is still being processed.",
            SessionError::UnsupportedMode(_) => "Styles can only be applied to photos.",
            SessionError::Capture(_) | SessionError::Processing(_) => {
                "Could not take the photo. Please try again."
            }
            SessionError::Storage(_) => "Export failed: the style file could not be saved.",
            SessionError::Share(_) => "Share failed: the style file could not be shared.",
        }
    }
}

/// Clears the in-flight flag when the capture cycle ends, however it ends.
struct CaptureGuard<'a>(&'a AtomicBool);

impl<'a> CaptureGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CaptureGuard(flag))
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct CameraSession {
    settings: RwLock<StyleSettings>,
    controls: Mutex<Controls>,
    capturing: AtomicBool,
    last_image: Mutex<Option<ImageRef>>,
}

impl CameraSession {
    pub fn new(settings: StyleSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            ..Self::default()
        }
    }

    /// A snapshot of the current settings.
    pub fn settings(&self) -> StyleSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply one panel edit to the current settings.
    pub fn update_settings(&self, field: Field, value: &str) -> Result<(), SettingsError> {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        settings.set(field, value)?;
        debug!(%field, value = %settings.field_text(field), "settings updated");
        Ok(())
    }

    /// Replace the current settings with the document at `path`.
    ///
    /// A missing or unreadable document silently resets to the defaults.
    pub fn load_settings(&self, store: &impl DocumentStore, path: &Path) -> StyleSettings {
        let loaded = match store.read_text(path) {
            Ok(text) => codec::decode(&text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "style document unavailable, using defaults");
                StyleSettings::default()
            }
        };
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = loaded.clone();
        loaded
    }

    pub fn controls(&self) -> Controls {
        *lock(&self.controls)
    }

    pub fn set_mode(&self, mode: CaptureMode) {
        lock(&self.controls).mode = mode;
    }

    pub fn cycle_flash(&self) -> FlashMode {
        let mut controls = lock(&self.controls);
        controls.flash = controls.flash.next();
        controls.flash
    }

    pub fn cycle_timer(&self) -> SelfTimer {
        let mut controls = lock(&self.controls);
        controls.timer = controls.timer.next();
        controls.timer
    }

    pub fn toggle_ratio(&self) -> AspectRatio {
        let mut controls = lock(&self.controls);
        controls.ratio = controls.ratio.toggle();
        controls.ratio
    }

    pub fn set_ratio(&self, ratio: AspectRatio) {
        lock(&self.controls).ratio = ratio;
    }

    pub fn set_zoom(&self, zoom: ZoomPreset) {
        lock(&self.controls).zoom = zoom;
    }

    pub fn toggle_facing(&self) -> Facing {
        let mut controls = lock(&self.controls);
        controls.facing = controls.facing.toggle();
        controls.facing
    }

    /// Whether a capture/apply cycle is in flight (the shutter is disabled).
    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    /// The image currently shown in the preview, if any.
    pub fn last_image(&self) -> Option<ImageRef> {
        lock(&self.last_image).clone()
    }

    /// Take a still, style it, and make it the preview image.
    ///
    /// In modes that do not apply filters the captured frame is shown as is.
    /// On failure the previous preview image is kept.
    pub fn capture(
        &self,
        device: &impl CaptureDevice,
        backend: &impl ImageBackend,
        config: &ApplyConfig,
    ) -> Result<ImageRef, SessionError> {
        let controls = self.controls();
        if !controls.mode.is_still() {
            return Err(SessionError::UnsupportedMode(controls.mode));
        }

        let _guard = CaptureGuard::acquire(&self.capturing).ok_or_else(|| {
            warn!("capture requested while another is in flight");
            SessionError::CaptureInProgress
        })?;

        if controls.timer != SelfTimer::Off {
            debug!(seconds = controls.timer.seconds(), "self-timer countdown");
            std::thread::sleep(controls.timer.delay());
        }

        let captured = device.capture_still()?;
        let shown = if controls.mode.applies_filters() {
            let snapshot = self.settings();
            apply_filters(backend, &captured, &snapshot, config)?
        } else {
            captured
        };

        info!(mode = %controls.mode, image = %shown, "capture complete");
        *lock(&self.last_image) = Some(shown.clone());
        Ok(shown)
    }

    /// Encode the current settings to `path` and offer it to the share sheet.
    pub fn export(
        &self,
        store: &impl DocumentStore,
        share: &impl ShareSheet,
        path: &Path,
    ) -> Result<(), SessionError> {
        let document = codec::encode(&self.settings());
        store
            .write_text(path, &document)
            .map_err(SessionError::Storage)?;
        share.share(path, STYLE_MIME_TYPE)?;
        info!(path = %path.display(), "style exported");
        Ok(())
    }
}
