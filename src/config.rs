//! Configuration
//!
//! JSON configuration for a [`Terminal`](crate::Terminal). Every field has a
//! default, so a partial file (or `{}`) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Color, CursorStyle, MouseFlags};
use crate::font::{FontError, FontSource, DEFAULT_FONT_SIZE};
use crate::geom::Rect;
use crate::screen::{DEFAULT_BLINK_CURSOR_MS, DEFAULT_BLINK_TEXT_MS};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub cursor: CursorConfig,
    pub blink: BlinkConfig,
    pub capture: CaptureConfig,
    /// Lay out at device resolution instead of logical pixels
    pub high_dpi: bool,
    pub reporting: ReportingConfig,
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// `"system"` or `"file:<path>"`
    pub source: String,
    /// Font size in pixels
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            source: "system".to_string(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Text cursor appearance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub color: Color,
    pub style: CursorStyle,
}

/// Blink cycle lengths in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub text_ms: u64,
    pub cursor_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            text_ms: DEFAULT_BLINK_TEXT_MS,
            cursor_ms: DEFAULT_BLINK_CURSOR_MS,
        }
    }
}

/// Input capture areas, in game image pixels. Empty captures everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub mouse: Rect,
    /// Cell rectangle the mouse area maps onto; empty divides by cell size
    pub mouse_cells: Rect,
    pub key: Rect,
}

/// Which event categories are reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub mouse: MouseFlags,
    pub focus: bool,
    pub paste: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            mouse: MouseFlags::BUTTON_EVENTS,
            focus: false,
            paste: false,
        }
    }
}

fn check_rect(name: &str, rect: &Rect) -> Result<(), ConfigError> {
    if rect.min.x > rect.max.x || rect.min.y > rect.max.y {
        return Err(ConfigError::Invalid(format!(
            "{}: min corner {:?} is past max corner {:?}",
            name, rect.min, rect.max
        )));
    }
    Ok(())
}

impl Config {
    /// Parse and validate JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("loading config from {}", path.display());
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "font.size must be positive, got {}",
                self.font.size
            )));
        }
        self.font_source()
            .map_err(|e| ConfigError::Invalid(format!("font.source: {}", e)))?;
        if self.blink.text_ms == 0 || self.blink.cursor_ms == 0 {
            return Err(ConfigError::Invalid(
                "blink cycles must be positive".to_string(),
            ));
        }
        check_rect("capture.mouse", &self.capture.mouse)?;
        check_rect("capture.mouse_cells", &self.capture.mouse_cells)?;
        check_rect("capture.key", &self.capture.key)?;
        Ok(())
    }

    pub fn font_source(&self) -> Result<FontSource, FontError> {
        self.font.source.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.font.source, "system");
        assert_eq!(config.font.size, 11.0);
        assert_eq!(config.blink.text_ms, 900);
        assert_eq!(config.blink.cursor_ms, 750);
        assert_eq!(config.reporting.mouse, MouseFlags::BUTTON_EVENTS);
        assert!(config.capture.mouse.is_empty());
        assert!(!config.high_dpi);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(
            r#"{
                "font": { "size": 14.0 },
                "cursor": { "style": "blinking-bar", "color": { "Indexed": 10 } },
                "capture": { "key": { "min": { "x": 0, "y": 0 }, "max": { "x": 40, "y": 30 } } },
                "high_dpi": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.font.size, 14.0);
        assert_eq!(config.font.source, "system");
        assert_eq!(config.cursor.style, CursorStyle::BlinkingBar);
        assert_eq!(config.cursor.color, Color::LIME);
        assert_eq!(config.capture.key, Rect::new(0, 0, 40, 30));
        assert!(config.high_dpi);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.font.size = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.blink.cursor_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.font.source = "ftp://fonts".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            config.font_source(),
            Err(FontError::UnknownSource(_))
        ));

        let mut config = Config::default();
        config.capture.mouse = Rect {
            min: Point::new(10, 0),
            max: Point::new(0, 10),
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_and_save() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "reporting": {{ "focus": true }} }}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert!(config.reporting.focus);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
