use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::history::MAX_HISTORY;
use crate::selection::MovePolicy;
use crate::tools::{DEFAULT_REGION_SIZE, DEFAULT_SIZE, DEFAULT_TEXT_SIZE, ToolKind};

pub const MIN_CANVAS: u32 = 100;
pub const MAX_CANVAS: u32 = 2000;

/// Named colours accepted wherever a colour string is expected.
pub const NAMED_COLORS: [(&str, [u8; 3]); 10] = [
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("gray", [128, 128, 128]),
    ("orange", [255, 165, 0]),
];

/// Startup settings, read from a JSON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub color: String,
    /// Tool selected at startup.
    pub tool: ToolKind,
    pub brush_size: u32,
    pub text_size: u32,
    pub region_size: u32,
    pub max_history: usize,
    pub min_canvas: u32,
    pub max_canvas: u32,
    pub move_policy: MovePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "white".to_string(),
            color: "black".to_string(),
            tool: ToolKind::default(),
            brush_size: DEFAULT_SIZE,
            text_size: DEFAULT_TEXT_SIZE,
            region_size: DEFAULT_REGION_SIZE,
            max_history: MAX_HISTORY,
            min_canvas: MIN_CANVAS,
            max_canvas: MAX_CANVAS,
            move_policy: MovePolicy::default(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Background colour, white if the string does not parse.
    pub fn background_rgb(&self) -> [u8; 3] {
        parse_color(&self.background).unwrap_or_else(|| {
            warn!("unknown background colour {:?}, using white", self.background);
            [255, 255, 255]
        })
    }

    /// Initial drawing colour, black if the string does not parse.
    pub fn color_rgb(&self) -> [u8; 3] {
        parse_color(&self.color).unwrap_or_else(|| {
            warn!("unknown drawing colour {:?}, using black", self.color);
            [0, 0, 0]
        })
    }

    pub fn check_canvas_size(&self, width: u32, height: u32) -> Result<()> {
        let range = self.min_canvas..=self.max_canvas;
        if range.contains(&width) && range.contains(&height) {
            Ok(())
        } else {
            Err(EditorError::InvalidDimension { width, height })
        }
    }
}

/// Parses `#rrggbb` or one of [`NAMED_COLORS`].
pub fn parse_color(s: &str) -> Option<[u8; 3]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some([channel(0)?, channel(2)?, channel(4)?]);
    }
    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| *rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_color(" #0A0b0C "), Some([10, 11, 12]));
        assert_eq!(parse_color("Red"), Some([255, 0, 0]));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "width": 300, "move_policy": "keep_source", "tool": "gaussian_blur" }"#).unwrap();
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 600);
        assert_eq!(config.move_policy, MovePolicy::KeepSource);
        assert_eq!(config.tool, ToolKind::GaussianBlur);
        assert_eq!(config.max_history, 50);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = std::env::temp_dir();
        let missing = dir.join("layerpaint_config_missing.json");
        let _ = fs::remove_file(&missing);
        assert!(matches!(EditorConfig::load(&missing), Err(EditorError::ConfigRead(_))));

        let bad = dir.join("layerpaint_config_bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&bad), Err(EditorError::ConfigParse(_))));
        let _ = fs::remove_file(&bad);
    }

    #[test]
    fn load_round_trips_through_file() {
        let path = std::env::temp_dir().join("layerpaint_config_ok.json");
        let config = EditorConfig {
            background: "#102030".to_string(),
            ..EditorConfig::default()
        };
        fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.background_rgb(), [16, 32, 48]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn canvas_bounds() {
        let config = EditorConfig::default();
        assert!(config.check_canvas_size(100, 2000).is_ok());
        assert!(config.check_canvas_size(99, 500).is_err());
        assert!(config.check_canvas_size(500, 2001).is_err());
    }

    #[test]
    fn bad_colour_strings_fall_back() {
        let config = EditorConfig {
            background: "nope".to_string(),
            color: "nope".to_string(),
            ..EditorConfig::default()
        };
        assert_eq!(config.background_rgb(), [255, 255, 255]);
        assert_eq!(config.color_rgb(), [0, 0, 0]);
    }
}
