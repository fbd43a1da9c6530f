//! Skin store: sectioned key/value theme data.
//!
//! A skin is a TOML document of sections, each a table of keys:
//!
//! ```toml
//! [General]
//! DefaultFontSize = 14
//! DefaultFontColor = "0.9,0.9,0.9,1"
//!
//! [Button]
//! HitPadding = [4, 4]
//! ```
//!
//! Lookups never fail: every accessor takes the value to use when the key
//! is missing or malformed. Numeric tuples may be written either as arrays
//! or as comma-separated strings.

use std::fs;
use std::path::Path;

use toml::{Table, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::layout::Vec2;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn from_components(components: &[f32]) -> Option<Self> {
        match *components {
            [r, g, b] => Some(Self::rgba(r, g, b, 1.0)),
            [r, g, b, a] => Some(Self::rgba(r, g, b, a)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Sectioned theme values applied to panels on registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
    sections: Table,
}

impl Skin {
    /// Creates an empty skin; every lookup yields its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a skin document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if a top-level entry is not a section.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let sections: Table = toml::from_str(source)?;

        if let Some((name, _)) = sections.iter().find(|(_, value)| !value.is_table()) {
            return Err(ConfigError::Invalid(format!("skin entry `{name}` is not a section")));
        }

        Ok(Self { sections })
    }

    /// Reads and parses a skin file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Skin::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Writes the skin back as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(&self.sections)?)
    }

    /// Returns true if the section exists.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Sets `key` in `section`, creating the section if needed.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .sections
            .entry(section.to_owned())
            .or_insert_with(|| Value::Table(Table::new()));

        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Value::Table(table) = entry {
            table.insert(key.to_owned(), value.into());
        }
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.as_table()?.get(key)
    }

    /// String value, or `default`.
    #[must_use]
    pub fn get_string<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.value(section, key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Integer value, or `default`. Floats are truncated.
    #[must_use]
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.value(section, key) {
            Some(Value::Integer(value)) => *value,
            #[allow(clippy::cast_possible_truncation)]
            Some(Value::Float(value)) if value.is_finite() => *value as i64,
            Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Float value, or `default`.
    #[must_use]
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.value(section, key)
            .and_then(as_f32)
            .unwrap_or(default)
    }

    /// Two-component value (`[x, y]` or `"x,y"`), or `default`.
    #[must_use]
    pub fn get_vec2(&self, section: &str, key: &str, default: Vec2) -> Vec2 {
        match self.value(section, key).and_then(components).as_deref() {
            Some(&[x, y]) => Vec2::new(x, y),
            _ => default,
        }
    }

    /// Color value (`"r,g,b,a"`, `"r,g,b"` or an array), or `default`.
    #[must_use]
    pub fn get_color(&self, section: &str, key: &str, default: Color) -> Color {
        self.value(section, key)
            .and_then(components)
            .and_then(|parts| Color::from_components(&parts))
            .unwrap_or(default)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn as_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Float(value) => Some(*value as f32),
        Value::Integer(value) => Some(*value as f32),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn components(value: &Value) -> Option<Vec<f32>> {
    match value {
        Value::Array(items) => items.iter().map(as_f32).collect(),
        Value::String(text) => text
            .split(',')
            .map(|part| part.trim().parse().ok())
            .collect(),
        _ => None,
    }
}
