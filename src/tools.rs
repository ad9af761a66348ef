use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: u32 = 5;
pub const DEFAULT_TEXT_SIZE: u32 = 12;
pub const DEFAULT_REGION_SIZE: u32 = 40;
/// Stroke sizes offered by the shell as presets.
pub const SIZE_PRESETS: [u32; 6] = [2, 5, 7, 9, 11, 15];

/// Next preset above (`up`) or below `size`, staying put at either end.
pub fn step_preset(size: u32, up: bool) -> u32 {
    if up {
        SIZE_PRESETS.into_iter().find(|&p| p > size).unwrap_or(size)
    } else {
        SIZE_PRESETS.into_iter().rev().find(|&p| p < size).unwrap_or(size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Fill,
    Circle,
    Rectangle,
    Line,
    Ellipse,
    Text,
    Selection,
    Grayscale,
    Sharpen,
    GaussianBlur,
}

impl ToolKind {
    pub const ALL: [ToolKind; 12] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Fill,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Line,
        ToolKind::Ellipse,
        ToolKind::Text,
        ToolKind::Selection,
        ToolKind::Grayscale,
        ToolKind::Sharpen,
        ToolKind::GaussianBlur,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Fill => "fill",
            ToolKind::Circle => "circle",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Line => "straight_line",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Text => "text",
            ToolKind::Selection => "selection",
            ToolKind::Grayscale => "grayscale",
            ToolKind::Sharpen => "sharpen",
            ToolKind::GaussianBlur => "gaussian_blur",
        }
    }

    /// Shape tools preview during a drag and commit on release.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            ToolKind::Circle | ToolKind::Rectangle | ToolKind::Line | ToolKind::Ellipse
        )
    }

    /// Filter tools re-apply on every pointer sample.
    pub fn is_filter(&self) -> bool {
        matches!(self, ToolKind::Grayscale | ToolKind::Sharpen | ToolKind::GaussianBlur)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "line" => return Ok(ToolKind::Line),
            "gauss" | "blur" => return Ok(ToolKind::GaussianBlur),
            _ => {}
        }
        ToolKind::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}

/// Current tool plus the parameters every tool reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: ToolKind,
    pub color: [u8; 3],
    pub size: u32,
    pub text_size: u32,
    pub region_size: u32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: [0, 0, 0],
            size: DEFAULT_SIZE,
            text_size: DEFAULT_TEXT_SIZE,
            region_size: DEFAULT_REGION_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.name().parse::<ToolKind>(), Ok(tool));
        }
        assert_eq!("gauss".parse::<ToolKind>(), Ok(ToolKind::GaussianBlur));
        assert_eq!(" Line ".parse::<ToolKind>(), Ok(ToolKind::Line));
        assert!("lasso".parse::<ToolKind>().is_err());
    }

    #[test]
    fn defaults() {
        let state = ToolState::default();
        assert_eq!(state.tool, ToolKind::Brush);
        assert_eq!(state.size, 5);
        assert_eq!(state.region_size, 40);
        assert!(ToolKind::Ellipse.is_shape());
        assert!(ToolKind::Sharpen.is_filter());
        assert!(!ToolKind::Fill.is_shape());
    }

    #[test]
    fn presets_step_between_neighbours() {
        assert_eq!(step_preset(5, true), 7);
        assert_eq!(step_preset(6, true), 7);
        assert_eq!(step_preset(6, false), 5);
        assert_eq!(step_preset(15, true), 15);
        assert_eq!(step_preset(2, false), 2);
        assert_eq!(step_preset(40, false), 15);
    }
}
