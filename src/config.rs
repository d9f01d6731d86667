// Chart presentation configuration
use std::path::Path;

use serde::Deserialize;

use crate::error::{PlotError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Text size in points.
    pub font_size: f64,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    /// Marker circle radius in pixels.
    pub marker_size: u32,
    pub line_width: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            width_in: 20.0,
            height_in: 10.0,
            dpi: 100,
            marker_size: 5,
            line_width: 2,
        }
    }
}

impl ChartConfig {
    /// Image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }

    /// Every size must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("font_size", self.font_size),
            ("width_in", self.width_in),
            ("height_in", self.height_in),
            ("dpi", f64::from(self.dpi)),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlotError::ConfigValue { field, value });
            }
        }
        Ok(())
    }

    /// Font size in pixels at the configured dpi.
    pub fn font_px(&self) -> f64 {
        self.font_size * f64::from(self.dpi) / 72.0
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ChartConfig> {
    let s = std::fs::read_to_string(path)?;
    let config = toml::from_str::<ChartConfig>(&s)?;
    config.validate()?;
    Ok(config)
}
