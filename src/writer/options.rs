//! # Writer Options
//!
//! Physical sizing and styling for one render pass.
//!
//! | Key | Unit | Default | Backend |
//! |-----|------|---------|---------|
//! | `module_width` | mm | 0.2 | all |
//! | `module_height` | mm | 15.0 | all |
//! | `quiet_zone` | mm | 6.5 | all |
//! | `font_size` | pt | 10 | all |
//! | `text_distance` | mm | 5.0 | all |
//! | `text_line_distance` | mm | 1.0 | all |
//! | `background` | color | `white` | all |
//! | `foreground` | color | `black` | all |
//! | `write_text` | bool | true | all |
//! | `text` | string | empty (use the full code) | all |
//! | `center_text` | bool | true | all |
//! | `compress` | bool | false | vector |
//! | `dpi` | dots/inch | 300 | raster |
//!
//! Options are layered: [`WriterOptions::default`], then the symbology's
//! preset ([`Barcode::writer_defaults`](crate::symbology::Barcode::writer_defaults)),
//! then caller [`OptionOverrides`]. Each layer produces a new value.
//!
//! ```
//! use barline::writer::Backend;
//! use barline::writer::options::{OptionOverrides, WriterOptions};
//!
//! let mut overrides = OptionOverrides::new();
//! overrides.set("module_height", "10");
//! let options = WriterOptions::default().merged(&overrides, Backend::Vector).unwrap();
//! assert_eq!(options.module_height, 10.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Backend;
use super::color::parse_color;
use crate::error::{BarlineError, Result};

/// Keys every backend understands.
pub const COMMON_KEYS: &[&str] = &[
    "module_width",
    "module_height",
    "quiet_zone",
    "font_size",
    "text_distance",
    "text_line_distance",
    "background",
    "foreground",
    "write_text",
    "text",
    "center_text",
];

/// Configuration for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Width of one module in mm
    pub module_width: f64,
    /// Bar height in mm
    pub module_height: f64,
    /// Blank margin left and right of the bars in mm
    pub quiet_zone: f64,
    /// Font size in pt; 0 disables text
    pub font_size: f64,
    /// Gap between the bars and the first text line in mm
    pub text_distance: f64,
    /// Gap between text lines in mm
    pub text_line_distance: f64,
    pub background: String,
    pub foreground: String,
    pub write_text: bool,
    /// Text printed under the bars; lines are separated by `\n`
    pub text: String,
    pub center_text: bool,
    /// Gzip the vector output
    pub compress: bool,
    /// Raster resolution; `None` uses the backend default
    pub dpi: Option<f64>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            module_width: 0.2,
            module_height: 15.0,
            quiet_zone: 6.5,
            font_size: 10.0,
            text_distance: 5.0,
            text_line_distance: 1.0,
            background: "white".to_string(),
            foreground: "black".to_string(),
            write_text: true,
            text: String::new(),
            center_text: true,
            compress: false,
            dpi: None,
        }
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: impl ToString) -> BarlineError {
    BarlineError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl WriterOptions {
    /// Apply `overrides` for `backend` and validate the result.
    ///
    /// Keys the backend does not recognise fail with
    /// [`BarlineError::UnsupportedOption`].
    pub fn merged(&self, overrides: &OptionOverrides, backend: Backend) -> Result<Self> {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            if !backend.recognises(key) {
                return Err(BarlineError::UnsupportedOption {
                    key: key.to_string(),
                    backend: backend.name(),
                });
            }
            merged.set(key, value)?;
        }
        merged.validate(backend)?;
        Ok(merged)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "module_width" => self.module_width = parse_f64(key, value)?,
            "module_height" => self.module_height = parse_f64(key, value)?,
            "quiet_zone" => self.quiet_zone = parse_f64(key, value)?,
            "font_size" => self.font_size = parse_f64(key, value)?,
            "text_distance" => self.text_distance = parse_f64(key, value)?,
            "text_line_distance" => self.text_line_distance = parse_f64(key, value)?,
            "background" => self.background = value.to_string(),
            "foreground" => self.foreground = value.to_string(),
            "write_text" => self.write_text = parse_bool(key, value)?,
            "text" => self.text = value.to_string(),
            "center_text" => self.center_text = parse_bool(key, value)?,
            "compress" => self.compress = parse_bool(key, value)?,
            "dpi" => self.dpi = Some(parse_f64(key, value)?),
            _ => {
                return Err(BarlineError::UnsupportedOption {
                    key: key.to_string(),
                    backend: "any",
                });
            }
        }
        Ok(())
    }

    /// Check sizing invariants, and colors when `backend` has to parse them.
    pub fn validate(&self, backend: Backend) -> Result<()> {
        let positive = [
            ("module_width", self.module_width),
            ("module_height", self.module_height),
        ];
        for (key, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(key, value));
            }
        }

        let non_negative = [
            ("quiet_zone", self.quiet_zone),
            ("font_size", self.font_size),
            ("text_distance", self.text_distance),
            ("text_line_distance", self.text_line_distance),
        ];
        for (key, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(invalid(key, value));
            }
        }

        if let Some(dpi) = self.dpi {
            if !(dpi > 0.0 && dpi.is_finite()) {
                return Err(invalid("dpi", dpi));
            }
        }

        if backend == Backend::Raster {
            for (key, color) in [("background", &self.background), ("foreground", &self.foreground)] {
                if parse_color(color).is_none() {
                    return Err(invalid(key, color));
                }
            }
        }
        Ok(())
    }

    /// Use `full_code` as the text unless a text override is set.
    pub fn with_human_text(mut self, full_code: &str) -> Self {
        if self.text.is_empty() {
            self.text = full_code.to_string();
        }
        self
    }

    /// The text to paint, if any.
    pub fn display_text(&self) -> Option<&str> {
        if self.write_text && !self.text.is_empty() && self.font_size > 0.0 {
            Some(&self.text)
        } else {
            None
        }
    }

    /// Number of text lines painted under the bars.
    pub fn text_lines(&self) -> usize {
        self.display_text().map_or(0, |text| text.split('\n').count())
    }

    /// Resolution for `backend`.
    pub fn effective_dpi(&self, backend: Backend) -> f64 {
        match backend {
            Backend::Vector => backend.default_dpi(),
            Backend::Raster => self.dpi.unwrap_or(backend.default_dpi()),
        }
    }
}

/// Ordered caller overrides as string key/value pairs; later entries win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    entries: Vec<(String, String)>,
}

impl OptionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Parse and add a `key=value` pair.
    pub fn set_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| invalid(pair, ""))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid(pair, value));
        }
        self.set(key, value);
        Ok(())
    }

    /// Read overrides from a JSON object of scalar values.
    ///
    /// ```
    /// use barline::writer::options::OptionOverrides;
    ///
    /// let overrides = OptionOverrides::from_json(r#"{"module_height": 8, "write_text": false}"#).unwrap();
    /// assert_eq!(overrides.len(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| invalid("config", "expected a JSON object"))?;

        let mut overrides = Self::new();
        for (key, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => return Err(invalid(key, other)),
            };
            overrides.set(key.clone(), value);
        }
        Ok(overrides)
    }

    /// Read overrides from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Append all entries of `other` after ours.
    pub fn extend(&mut self, other: OptionOverrides) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn overrides(pairs: &[(&str, &str)]) -> OptionOverrides {
        let mut o = OptionOverrides::new();
        for (k, v) in pairs {
            o.set(*k, *v);
        }
        o
    }

    #[test]
    fn test_defaults() {
        let options = WriterOptions::default();
        assert_eq!(options.module_width, 0.2);
        assert_eq!(options.module_height, 15.0);
        assert_eq!(options.quiet_zone, 6.5);
        assert_eq!(options.font_size, 10.0);
        assert_eq!(options.text_distance, 5.0);
        assert_eq!(options.background, "white");
        assert_eq!(options.foreground, "black");
        assert!(options.write_text);
        assert!(!options.compress);
        assert_eq!(options.effective_dpi(Backend::Vector), 25.4);
        assert_eq!(options.effective_dpi(Backend::Raster), 300.0);
    }

    #[test]
    fn test_merge_does_not_mutate_base() {
        let base = WriterOptions::default();
        let merged = base
            .merged(&overrides(&[("quiet_zone", "2"), ("write_text", "false")]), Backend::Vector)
            .unwrap();
        assert_eq!(merged.quiet_zone, 2.0);
        assert!(!merged.write_text);
        assert_eq!(base, WriterOptions::default());
    }

    #[test]
    fn test_later_override_wins() {
        let merged = WriterOptions::default()
            .merged(&overrides(&[("font_size", "8"), ("font_size", "12")]), Backend::Vector)
            .unwrap();
        assert_eq!(merged.font_size, 12.0);
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let err = WriterOptions::default()
            .merged(&overrides(&[("colour", "red")]), Backend::Vector)
            .unwrap_err();
        assert!(matches!(err, BarlineError::UnsupportedOption { ref key, backend: "vector" } if key == "colour"));
    }

    #[test]
    fn test_backend_specific_keys() {
        let compress = overrides(&[("compress", "true")]);
        assert!(WriterOptions::default().merged(&compress, Backend::Vector).unwrap().compress);
        let err = WriterOptions::default().merged(&compress, Backend::Raster).unwrap_err();
        assert!(matches!(err, BarlineError::UnsupportedOption { backend: "raster", .. }));

        let dpi = overrides(&[("dpi", "600")]);
        assert_eq!(WriterOptions::default().merged(&dpi, Backend::Raster).unwrap().dpi, Some(600.0));
        assert!(WriterOptions::default().merged(&dpi, Backend::Vector).is_err());
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("module_width", "0"),
            ("module_width", "wide"),
            ("module_height", "-1"),
            ("quiet_zone", "-0.5"),
            ("write_text", "maybe"),
            ("module_width", "NaN"),
        ] {
            let err = WriterOptions::default()
                .merged(&overrides(&[(key, value)]), Backend::Vector)
                .unwrap_err();
            assert!(matches!(err, BarlineError::InvalidOption { .. }), "{}={}", key, value);
        }
    }

    #[test]
    fn test_raster_checks_colors() {
        let color = overrides(&[("foreground", "not-a-color")]);
        assert!(WriterOptions::default().merged(&color, Backend::Vector).is_ok());
        let err = WriterOptions::default().merged(&color, Backend::Raster).unwrap_err();
        assert!(matches!(err, BarlineError::InvalidOption { ref key, .. } if key == "foreground"));
    }

    #[test]
    fn test_human_text() {
        let options = WriterOptions::default().with_human_text("12345");
        assert_eq!(options.display_text(), Some("12345"));
        let options = WriterOptions {
            text: "custom".into(),
            ..WriterOptions::default()
        }
        .with_human_text("12345");
        assert_eq!(options.display_text(), Some("custom"));
        let options = WriterOptions {
            write_text: false,
            ..WriterOptions::default()
        }
        .with_human_text("12345");
        assert_eq!(options.display_text(), None);
        assert_eq!(options.text_lines(), 0);
    }

    #[test]
    fn test_text_lines() {
        let options = WriterOptions::default().with_human_text("a\nb\nc");
        assert_eq!(options.text_lines(), 3);
    }

    #[test]
    fn test_set_pair() {
        let mut o = OptionOverrides::new();
        o.set_pair("text=a=b").unwrap();
        assert_eq!(o.iter().collect::<Vec<_>>(), vec![("text", "a=b")]);
        assert!(o.set_pair("novalue").is_err());
        assert!(o.set_pair("=x").is_err());
    }

    #[test]
    fn test_from_json() {
        let o = OptionOverrides::from_json(r##"{"module_width": 0.3, "background": "#eee", "center_text": false}"##)
            .unwrap();
        let merged = WriterOptions::default().merged(&o, Backend::Raster).unwrap();
        assert_eq!(merged.module_width, 0.3);
        assert_eq!(merged.background, "#eee");
        assert!(!merged.center_text);

        assert!(matches!(OptionOverrides::from_json("[1, 2]"), Err(BarlineError::InvalidOption { .. })));
        assert!(matches!(OptionOverrides::from_json("{"), Err(BarlineError::Config(_))));
        assert!(matches!(
            OptionOverrides::from_json(r#"{"text": ["a"]}"#),
            Err(BarlineError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let options: WriterOptions = serde_json::from_str(r#"{"module_height": 20.0}"#).unwrap();
        assert_eq!(options.module_height, 20.0);
        assert_eq!(options.quiet_zone, 6.5);
    }
}
