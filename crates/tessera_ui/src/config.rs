//! Runtime configuration.
//!
//! ```toml
//! click_window_ms = 400
//! tooltip_max_width = 240.0
//! screen_size = [1280.0, 720.0]
//! ```
//!
//! Missing keys take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::layout::Vec2;
use crate::text_flow::MonospaceMeasure;
use crate::tooltip::TooltipConfig;

/// Font size the monospace metrics are given at.
const METRICS_REFERENCE_SIZE: f32 = 16.0;

/// UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Longest press-to-release time that still counts as a click.
    pub click_window_ms: u64,
    /// Font size used until a skin sets one.
    pub default_font_size: f32,
    /// Widest a tooltip may get, padding included.
    pub tooltip_max_width: f32,
    /// Tooltip offset from the cursor.
    pub tooltip_cursor_offset: [f32; 2],
    /// Space between the tooltip frame and its text.
    pub tooltip_padding: f32,
    /// Glyph advance at font size 16, for the built-in measure.
    pub glyph_width: f32,
    /// Line height at font size 16, for the built-in measure.
    pub line_height: f32,
    /// Opacity of the layer painted behind a modal element.
    pub modal_backdrop_alpha: f32,
    /// Screen size in pixels.
    pub screen_size: [f32; 2],
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            click_window_ms: 500,
            default_font_size: 12.0,
            tooltip_max_width: 300.0,
            tooltip_cursor_offset: [12.0, 12.0],
            tooltip_padding: 8.0,
            glyph_width: 8.0,
            line_height: 16.0,
            modal_backdrop_alpha: 0.3,
            screen_size: [1920.0, 1080.0],
        }
    }
}

impl UiConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML,
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`UiConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Writes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every value, clamping the backdrop opacity into `0..=1`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first negative or non-finite value.
    pub fn validate(mut self) -> ConfigResult<Self> {
        let lengths = [
            ("default_font_size", self.default_font_size),
            ("tooltip_max_width", self.tooltip_max_width),
            ("tooltip_cursor_offset.x", self.tooltip_cursor_offset[0]),
            ("tooltip_cursor_offset.y", self.tooltip_cursor_offset[1]),
            ("tooltip_padding", self.tooltip_padding),
            ("glyph_width", self.glyph_width),
            ("line_height", self.line_height),
            ("modal_backdrop_alpha", self.modal_backdrop_alpha),
            ("screen_size.width", self.screen_size[0]),
            ("screen_size.height", self.screen_size[1]),
        ];

        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "{name} must be finite and non-negative, got {value}"
            )));
        }

        if self.modal_backdrop_alpha > 1.0 {
            tracing::warn!(
                value = self.modal_backdrop_alpha,
                "modal_backdrop_alpha above 1.0, clamped"
            );
            self.modal_backdrop_alpha = 1.0;
        }
        Ok(self)
    }

    /// Measure built from the glyph metrics.
    #[must_use]
    pub const fn measure(&self) -> MonospaceMeasure {
        MonospaceMeasure::new(self.glyph_width, self.line_height, METRICS_REFERENCE_SIZE)
    }

    /// Tooltip layout settings.
    #[must_use]
    pub fn tooltip(&self) -> TooltipConfig {
        TooltipConfig {
            padding: self.tooltip_padding,
            cursor_offset: self.tooltip_cursor_offset.into(),
            max_width: self.tooltip_max_width,
            ..TooltipConfig::default()
        }
    }

    /// Screen size as a vector.
    #[must_use]
    pub fn screen(&self) -> Vec2 {
        self.screen_size.into()
    }
}
