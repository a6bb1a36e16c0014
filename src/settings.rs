//! The style settings record.
//!
//! [`StyleSettings`] is the only domain entity: six filter parameters that are
//! decoded from a style document at startup, mutated by the settings panel, fed
//! to the filter applier on every capture, and encoded back to a document on
//! export.
//!
//! ## Fields
//!
//! | Field | Type | Conventional domain | Default |
//! |---|---|---|---|
//! | `preset` | text | any non-empty token | `"default"` |
//! | `brightness` | `f64` | [-1, 1] | 0 |
//! | `saturation` | `f64` | [0, 2] | 1 |
//! | `contrast` | `f64` | [0.5, 2] | 1 |
//! | `rotation` | `i32` degrees | multiples of 90 | 0 |
//! | `compress` | `f64` | (0, 1] | 0.9 |
//!
//! The record is always fully populated. Values outside the conventional
//! domains are representable (a hand-edited document may carry them) and are
//! only clamped when they come in through [`StyleSettings::set`], which models
//! the slider panel.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PRESET: &str = "default";
pub const DEFAULT_BRIGHTNESS: f64 = 0.0;
pub const DEFAULT_SATURATION: f64 = 1.0;
pub const DEFAULT_CONTRAST: f64 = 1.0;
pub const DEFAULT_ROTATION: i32 = 0;
pub const DEFAULT_COMPRESS: f64 = 0.9;

/// Filter parameters for captured stills.
///
/// `brightness`, `saturation` and `contrast` are carried and persisted but
/// the applier does not act on them yet; see
/// [`has_tone_adjustments`](Self::has_tone_adjustments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub preset: String,
    pub brightness: f64,
    pub saturation: f64,
    pub contrast: f64,
    pub rotation: i32,
    pub compress: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            brightness: DEFAULT_BRIGHTNESS,
            saturation: DEFAULT_SATURATION,
            contrast: DEFAULT_CONTRAST,
            rotation: DEFAULT_ROTATION,
            compress: DEFAULT_COMPRESS,
        }
    }
}

/// One of the six settings fields, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Preset,
    Brightness,
    Saturation,
    Contrast,
    Rotation,
    Compress,
}

impl Field {
    /// All fields in the fixed order the encoder emits them.
    pub const ALL: [Field; 6] = [
        Field::Preset,
        Field::Brightness,
        Field::Saturation,
        Field::Contrast,
        Field::Rotation,
        Field::Compress,
    ];

    /// Tag name used in the style document.
    pub fn tag(self) -> &'static str {
        match self {
            Field::Preset => "preset",
            Field::Brightness => "brightness",
            Field::Saturation => "saturation",
            Field::Contrast => "contrast",
            Field::Rotation => "rotation",
            Field::Compress => "compress",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }

    /// Slider range for the settings panel, if the field has one.
    ///
    /// `preset` and `rotation` are not exposed as sliders.
    pub fn panel_range(self) -> Option<PanelRange> {
        match self {
            Field::Brightness => Some(PanelRange::new(-1.0, 1.0, 0.1)),
            Field::Saturation => Some(PanelRange::new(0.0, 2.0, 0.1)),
            Field::Contrast => Some(PanelRange::new(0.5, 2.0, 0.1)),
            Field::Compress => Some(PanelRange::new(0.1, 1.0, 0.05)),
            Field::Preset | Field::Rotation => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Field {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_tag(&s.to_ascii_lowercase())
            .ok_or_else(|| SettingsError::UnknownField(s.to_string()))
    }
}

/// Min/max/step of a settings-panel slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl PanelRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown settings field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: Field, value: String },
}

impl StyleSettings {
    /// Apply one panel edit.
    ///
    /// Numeric slider fields are clamped into their panel range, rotation
    /// takes whole degrees, preset takes the trimmed text (an empty preset
    /// is rejected).
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            field,
            value: raw.to_string(),
        };
        let raw = raw.trim();
        match field {
            Field::Preset => {
                if raw.is_empty() {
                    return Err(invalid());
                }
                self.preset = raw.to_string();
            }
            Field::Rotation => {
                self.rotation = raw.parse().map_err(|_| invalid())?;
            }
            Field::Brightness | Field::Saturation | Field::Contrast | Field::Compress => {
                let value: f64 = raw.parse().map_err(|_| invalid())?;
                if !value.is_finite() {
                    return Err(invalid());
                }
                let value = field.panel_range().map_or(value, |r| r.clamp(value));
                match field {
                    Field::Brightness => self.brightness = value,
                    Field::Saturation => self.saturation = value,
                    Field::Contrast => self.contrast = value,
                    _ => self.compress = value,
                }
            }
        }
        Ok(())
    }

    /// Render one field as it would appear inside its document tag.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Preset => self.preset.clone(),
            Field::Brightness => self.brightness.to_string(),
            Field::Saturation => self.saturation.to_string(),
            Field::Contrast => self.contrast.to_string(),
            Field::Rotation => self.rotation.to_string(),
            Field::Compress => self.compress.to_string(),
        }
    }

    /// Whether any of the tone fields differ from neutral.
    ///
    /// Tone fields are modeled and persisted but not applied to pixels.
    pub fn has_tone_adjustments(&self) -> bool {
        self.brightness != DEFAULT_BRIGHTNESS
            || self.saturation != DEFAULT_SATURATION
            || self.contrast != DEFAULT_CONTRAST
    }
}
