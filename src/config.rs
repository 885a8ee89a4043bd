// Page formats, card geometry and the immutable run configuration.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::AppError;

/// Default card size in cm
pub const DEFAULT_CARD_WIDTH_CM: f32 = 6.0;
pub const DEFAULT_CARD_HEIGHT_CM: f32 = 4.0;

/// Default outer margins and inter-card gap in cm
pub const DEFAULT_MARGIN_CM: f32 = 0.5;
pub const DEFAULT_GAP_CM: f32 = 0.5;

/// Default font sizes in points
pub const DEFAULT_BODY_FONT_SIZE: f32 = 11.0;
pub const DEFAULT_MIN_FONT_SIZE: f32 = 6.0;

/// ISO 216 A-series page formats, portrait convention (width < height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageFormat {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PageFormat {
    /// Portrait dimensions in cm.
    pub fn dimensions_cm(self) -> (f32, f32) {
        match self {
            PageFormat::A0 => (84.1, 118.9),
            PageFormat::A1 => (59.4, 84.1),
            PageFormat::A2 => (42.0, 59.4),
            PageFormat::A3 => (29.7, 42.0),
            PageFormat::A4 => (21.0, 29.7),
            PageFormat::A5 => (14.8, 21.0),
            PageFormat::A6 => (10.5, 14.8),
        }
    }

    /// Parse a format name like "A4" or "a4" (used for settings files,
    /// where clap's ValueEnum machinery is not in play).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A0" => Some(PageFormat::A0),
            "A1" => Some(PageFormat::A1),
            "A2" => Some(PageFormat::A2),
            "A3" => Some(PageFormat::A3),
            "A4" => Some(PageFormat::A4),
            "A5" => Some(PageFormat::A5),
            "A6" => Some(PageFormat::A6),
            _ => None,
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Page orientation. `Auto` turns the page sideways when the card is
/// wider than tall, so wide cards pack without wasting a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Orientation {
    Auto,
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Orientation::Auto),
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }
}

/// Card dimensions and page clearances, all in cm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub card_width: f32,
    pub card_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub gap: f32,
}

/// Point sizes for the card faces and the tag corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Side A body size
    pub body_front: f32,
    /// Side B body size
    pub body_back: f32,
    /// Tag size (bottom-right corner, oblique)
    pub tag: f32,
    /// Floor size the text fitter may shrink down to
    pub min: f32,
}

impl FontSpec {
    /// Tag size derived from the side A size when not given explicitly.
    pub fn derived_tag_size(body_front: f32) -> f32 {
        (body_front * 0.85).max(8.0)
    }
}

/// Everything the pipeline needs, built once before any page is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub format: PageFormat,
    pub orientation: Orientation,
    pub geometry: CardGeometry,
    pub fonts: FontSpec,
    /// Draw an outline around unfilled trailing slots on the last page
    pub outline_blank_slots: bool,
}

impl Config {
    /// Page dimensions in cm with the orientation applied.
    pub fn page_dimensions_cm(&self) -> (f32, f32) {
        let (w, h) = self.format.dimensions_cm();
        let landscape = match self.orientation {
            Orientation::Portrait => false,
            Orientation::Landscape => true,
            Orientation::Auto => self.geometry.card_width > self.geometry.card_height,
        };
        if landscape {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// The orientation that will actually be used (resolves `Auto`).
    pub fn applied_orientation(&self) -> Orientation {
        let (w, h) = self.page_dimensions_cm();
        if w > h {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let f = &self.fonts;
        if f.body_front <= 0.0 || f.body_back <= 0.0 || f.tag <= 0.0 || f.min <= 0.0 {
            return Err(AppError::ConfigurationError(
                "font sizes must be positive".to_string(),
            ));
        }
        if f.min > f.body_front || f.min > f.body_back {
            return Err(AppError::ConfigurationError(format!(
                "minimum font size {} exceeds body font size {}",
                f.min,
                f.body_front.min(f.body_back)
            )));
        }
        Ok(())
    }
}

/// Optional settings file (JSON). Any subset of fields may be present;
/// explicit command-line flags win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: Option<String>,
    pub orientation: Option<String>,
    pub card_width: Option<f32>,
    pub card_height: Option<f32>,
    pub margin_x: Option<f32>,
    pub margin_y: Option<f32>,
    pub gap: Option<f32>,
    pub font_size_a: Option<f32>,
    pub font_size_b: Option<f32>,
    pub tag_font_size: Option<f32>,
    pub min_font_size: Option<f32>,
    pub outline_blank_slots: Option<bool>,
}

pub fn load_settings(path: &Path) -> Result<Settings, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::SettingsError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::SettingsError(format!("Invalid JSON: {}", e)))
}
