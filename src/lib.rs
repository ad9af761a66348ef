//! Layered raster paint core: layer stack, drawing tools, rectangle
//! selection and snapshot undo, with a small wgpu/winit shell on top.

pub mod brush;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod drawing;
pub mod editor;
pub mod error;
pub mod fill;
pub mod filters;
pub mod gpu;
pub mod history;
pub mod input;
pub mod io;
pub mod layer;
pub mod rect;
pub mod selection;
pub mod shapes;
pub mod text;
pub mod tools;

#[cfg(test)]
mod io_tests;

pub use canvas::LayerStack;
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{EditorError, Result};
pub use input::PointerEvent;
pub use selection::MovePolicy;
pub use tools::ToolKind;
