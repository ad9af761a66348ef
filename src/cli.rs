use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::Result;
use crate::tools::ToolKind;

/// Layered raster paint program.
///
/// Without `--batch` a window opens on a fresh canvas. With `--batch` no
/// window is created: the starting canvas is written to `--output`.
#[derive(Parser, Debug, Default)]
#[command(name = "layerpaint", about = "Layered raster paint program")]
pub struct Cli {
    /// JSON settings file. Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels, overriding the config file.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels, overriding the config file.
    #[arg(long)]
    pub height: Option<u32>,

    /// Starting tool, e.g. `brush`, `fill` or `selection`.
    #[arg(short, long)]
    pub tool: Option<ToolKind>,

    /// Run without a window.
    #[arg(long)]
    pub batch: bool,

    /// Export path for batch mode; the format follows the extension.
    #[arg(short, long, value_name = "FILE", default_value = "output.png")]
    pub output: PathBuf,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tool) = self.tool {
            config.tool = tool;
        }
        if self.width.is_some() || self.height.is_some() {
            config.check_canvas_size(config.width, config.height)?;
        }
        Ok(config)
    }
}

/// Builds the editor and exports its composite without opening a window.
pub fn run_batch(cli: &Cli) -> Result<()> {
    let editor = Editor::new(cli.editor_config()?)?;
    editor.export(&cli.output)?;
    info!("batch export written to {}", cli.output.display());
    Ok(())
}
