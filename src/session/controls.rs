//! Viewfinder controls: capture mode, flash, self-timer, aspect ratio, zoom.
//!
//! These are plain value types. Each control that the top bar cycles through
//! has a `next()` method returning the following state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Entries of the mode selector, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Photo,
    Portrait,
    Video,
    Night,
    Pro,
}

impl CaptureMode {
    pub const ALL: [CaptureMode; 5] = [
        CaptureMode::Photo,
        CaptureMode::Portrait,
        CaptureMode::Video,
        CaptureMode::Night,
        CaptureMode::Pro,
    ];

    /// Label shown in the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            CaptureMode::Photo => "Foto",
            CaptureMode::Portrait => "Retrato",
            CaptureMode::Video => "Vídeo",
            CaptureMode::Night => "Noche",
            CaptureMode::Pro => "Pro",
        }
    }

    /// Whether captures in this mode go through the style filters.
    pub fn applies_filters(self) -> bool {
        matches!(self, CaptureMode::Photo | CaptureMode::Portrait)
    }

    pub fn is_still(self) -> bool {
        self != CaptureMode::Video
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
    Auto,
}

impl FlashMode {
    /// Off → On → Auto → Off.
    pub fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Auto,
            FlashMode::Auto => FlashMode::Off,
        }
    }
}

/// Self-timer delay before a still capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelfTimer {
    #[default]
    Off,
    Three,
    Ten,
}

impl SelfTimer {
    /// 0 → 3 → 10 → 0 seconds.
    pub fn next(self) -> Self {
        match self {
            SelfTimer::Off => SelfTimer::Three,
            SelfTimer::Three => SelfTimer::Ten,
            SelfTimer::Ten => SelfTimer::Off,
        }
    }

    pub fn seconds(self) -> u64 {
        match self {
            SelfTimer::Off => 0,
            SelfTimer::Three => 3,
            SelfTimer::Ten => 10,
        }
    }

    pub fn delay(self) -> Duration {
        Duration::from_secs(self.seconds())
    }
}

/// Preview aspect ratio, expressed as long side : short side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// The ratio button flips between 4:3 and 16:9; square returns to 4:3.
    pub fn toggle(self) -> Self {
        match self {
            AspectRatio::FourThree => AspectRatio::SixteenNine,
            AspectRatio::SixteenNine | AspectRatio::Square => AspectRatio::FourThree,
        }
    }

    fn parts(self) -> (u32, u32) {
        match self {
            AspectRatio::FourThree => (4, 3),
            AspectRatio::SixteenNine => (16, 9),
            AspectRatio::Square => (1, 1),
        }
    }

    /// Height of a portrait preview `width` pixels wide.
    pub fn preview_height(self, width: u32) -> u32 {
        let (long, short) = self.parts();
        (u64::from(width) * u64::from(long) / u64::from(short)) as u32
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (long, short) = self.parts();
        write!(f, "{long}:{short}")
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:3" => Ok(AspectRatio::FourThree),
            "16:9" => Ok(AspectRatio::SixteenNine),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(format!("unsupported aspect ratio: {other}")),
        }
    }
}

/// Zoom pills under the viewfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomPreset {
    #[default]
    Wide,
    Standard,
    Tele,
}

impl ZoomPreset {
    pub const ALL: [ZoomPreset; 3] = [ZoomPreset::Wide, ZoomPreset::Standard, ZoomPreset::Tele];

    pub fn label(self) -> &'static str {
        match self {
            ZoomPreset::Wide => "0.6",
            ZoomPreset::Standard => "1",
            ZoomPreset::Tele => "2",
        }
    }

    /// Device zoom factor in `0.0..=1.0`.
    pub fn device_zoom(self) -> f64 {
        match self {
            ZoomPreset::Wide => 0.0,
            ZoomPreset::Standard => 0.15,
            ZoomPreset::Tele => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    Back,
    Front,
}

impl Facing {
    pub fn toggle(self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }
}

/// Snapshot of every viewfinder control.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub mode: CaptureMode,
    pub flash: FlashMode,
    pub timer: SelfTimer,
    pub ratio: AspectRatio,
    pub zoom: ZoomPreset,
    pub facing: Facing,
}
