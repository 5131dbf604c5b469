//! Label crop and quality settings
//!
//! Mirrors the settings object the print-server expects in print and
//! preview requests. Offsets keep their camelCase wire names.

use serde::{Deserialize, Serialize};

/// Output color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Rgb,
    #[default]
    Grayscale,
    Monochrome,
}

/// Resampling filter used when rescaling the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    #[default]
    Lanczos,
    Bicubic,
    Bilinear,
    Nearest,
}

/// Label crop/quality settings sent with every print request
///
/// Dimensions and offsets are inches, scale is a percentage, threshold
/// only applies to monochrome output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "offsetX")]
    pub offset_x: f64,
    #[serde(rename = "offsetY")]
    pub offset_y: f64,
    pub scale: f64,
    pub dpi: u32,
    pub color_mode: ColorMode,
    pub sharpening: bool,
    pub resampling: Resampling,
    pub contrast: f64,
    pub threshold: u8,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            width: 3.94,
            height: 1.5,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 100.0,
            dpi: 600,
            color_mode: ColorMode::default(),
            sharpening: true,
            resampling: Resampling::default(),
            contrast: 1.0,
            threshold: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_object_fills_defaults() {
        // Stored settings may predate newer fields
        let settings: LabelSettings =
            serde_json::from_str(r#"{"width": 2.0, "offsetX": 0.25}"#).unwrap();

        assert_eq!(settings.width, 2.0);
        assert_eq!(settings.offset_x, 0.25);
        assert_eq!(settings.height, 1.5);
        assert_eq!(settings.dpi, 600);
        assert_eq!(settings.color_mode, ColorMode::Grayscale);
        assert_eq!(settings.resampling, Resampling::Lanczos);
    }

    #[test]
    fn wire_names_round_trip() {
        let value = serde_json::to_value(LabelSettings::default()).unwrap();
        assert_eq!(value["offsetY"], 0.0);
        assert_eq!(value["color_mode"], "grayscale");
        assert_eq!(value["resampling"], "lanczos");

        let back: LabelSettings = serde_json::from_value(value).unwrap();
        assert_eq!(back, LabelSettings::default());
    }
}
