use std::path::Path;

use image::RgbImage;
use log::{debug, info, warn};

use crate::canvas::{LayerStack, check_dimensions};
use crate::config::EditorConfig;
use crate::drawing::{DrawingEngine, TextEntry};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::input::PointerEvent;
use crate::io;
use crate::layer::{Layer, TRANSPARENT, opaque};
use crate::rect::Rect;
use crate::selection::{MovePolicy, SelectionEngine};
use crate::text::draw_text;
use crate::tools::{ToolKind, ToolState};

const MARQUEE_COLOR: [u8; 3] = [255, 0, 0];
const MARQUEE_DASH: i32 = 4;

/// The editing session: layer stack, tools, selection, history and
/// clipboard behind one command/query surface.
///
/// Every layer mutation goes through here, so each one is snapshotted into
/// history right before it happens.
pub struct Editor {
    config: EditorConfig,
    canvas: LayerStack,
    drawing: DrawingEngine,
    selection: SelectionEngine,
    history: HistoryStore,
    clipboard: Option<Layer>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        let canvas = LayerStack::new(config.width, config.height, config.background_rgb())?;
        let state = ToolState {
            tool: config.tool,
            color: config.color_rgb(),
            size: config.brush_size.max(1),
            text_size: config.text_size.max(1),
            region_size: config.region_size.max(1),
        };
        info!("new {}x{} canvas", canvas.width(), canvas.height());
        Ok(Self {
            drawing: DrawingEngine::new(state),
            selection: SelectionEngine::new(config.move_policy),
            history: HistoryStore::new(config.max_history),
            clipboard: None,
            canvas,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &LayerStack {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn tool_state(&self) -> &ToolState {
        self.drawing.state()
    }

    pub fn tool(&self) -> ToolKind {
        self.drawing.tool()
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.drawing.text_entry()
    }

    pub fn clipboard(&self) -> Option<&Layer> {
        self.clipboard.as_ref()
    }

    // Configuration

    /// Commits pending text and drops any selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.drawing.set_tool(tool, &mut self.canvas, &mut self.history);
        self.selection.cancel();
    }

    pub fn set_color(&mut self, color: [u8; 3]) {
        self.drawing.set_color(color);
    }

    pub fn set_size(&mut self, size: u32) -> bool {
        self.drawing.set_size(size)
    }

    pub fn set_text_size(&mut self, size: u32) -> bool {
        self.drawing.set_text_size(size)
    }

    pub fn set_region_size(&mut self, size: u32) -> bool {
        self.drawing.set_region_size(size)
    }

    pub fn set_move_policy(&mut self, policy: MovePolicy) {
        self.selection.set_policy(policy);
        self.config.move_policy = policy;
    }

    pub fn set_max_history(&mut self, depth: usize) {
        self.history.set_max_depth(depth);
        self.config.max_history = self.history.max_depth();
    }

    /// Resizes every layer. Both sides must lie within the configured canvas
    /// bounds.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<()> {
        self.config.check_canvas_size(width, height)?;
        check_dimensions(width, height)?;
        if (width, height) == (self.canvas.width(), self.canvas.height()) {
            return Ok(());
        }
        self.selection.cancel();
        self.history.snapshot(&self.canvas);
        self.canvas.resize(width, height)
    }

    // Layers

    pub fn add_layer(&mut self) -> usize {
        self.history.snapshot(&self.canvas);
        self.canvas.add_layer()
    }

    pub fn delete_layer(&mut self, index: usize) -> Result<()> {
        self.canvas.check_delete(index)?;
        self.selection.cancel();
        self.history.snapshot(&self.canvas);
        self.canvas.delete_layer(index)
    }

    pub fn switch_layer(&mut self, index: usize) -> Result<()> {
        self.canvas.switch_layer(index)?;
        self.selection.cancel();
        Ok(())
    }

    /// Rewinds one snapshot. A gesture still in progress keeps going, but
    /// its next write takes a new snapshot.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            debug!("nothing to undo");
            return false;
        }
        self.selection.cancel();
        self.drawing.invalidate_snapshot();
        self.history.undo(&mut self.canvas)
    }

    // Pointer

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press(x, y) => self.press(x, y),
            PointerEvent::Drag(x, y) => self.drag(x, y),
            PointerEvent::Release(x, y) => self.release(x, y),
        }
    }

    pub fn press(&mut self, x: i32, y: i32) {
        if self.drawing.tool() == ToolKind::Selection {
            if !self.selection.begin_drag(x, y) {
                self.selection.start(x, y);
            }
        } else {
            self.drawing.press(&mut self.canvas, &mut self.history, x, y);
        }
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        if self.drawing.tool() == ToolKind::Selection {
            self.selection.update(x, y);
        } else {
            self.drawing.drag(&mut self.canvas, &mut self.history, x, y);
        }
    }

    pub fn release(&mut self, x: i32, y: i32) {
        if self.drawing.tool() == ToolKind::Selection {
            if self.selection.will_paste(x, y) {
                self.history.snapshot(&self.canvas);
            }
            self.selection.finish(x, y, self.canvas.active_layer_mut());
        } else {
            self.drawing.release(&mut self.canvas, &mut self.history, x, y);
        }
    }

    // Text

    pub fn type_text(&mut self, text: &str) {
        self.drawing.type_text(text);
    }

    pub fn backspace(&mut self) {
        self.drawing.backspace();
    }

    pub fn commit_text(&mut self) -> bool {
        self.drawing.commit_text(&mut self.canvas, &mut self.history)
    }

    pub fn cancel_text(&mut self) {
        self.drawing.cancel_text();
    }

    // Selection and clipboard

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    fn selected_area(&self) -> Option<Rect> {
        let area = self.selection.area()?.clamped(self.canvas.width(), self.canvas.height());
        (!area.is_empty()).then_some(area)
    }

    /// Paints the selected area with the current colour.
    pub fn fill_selection(&mut self) -> bool {
        let Some(area) = self.selected_area() else {
            return false;
        };
        self.history.snapshot(&self.canvas);
        let color = opaque(self.drawing.state().color);
        self.canvas.active_layer_mut().fill_rect(area, color);
        self.selection.recapture(self.canvas.active_layer());
        true
    }

    /// Moves the selected pixels to the clipboard, leaving transparency.
    pub fn cut_selection(&mut self) -> bool {
        let Some(area) = self.selected_area() else {
            return false;
        };
        self.clipboard = self.canvas.active_layer().crop(area);
        self.history.snapshot(&self.canvas);
        self.canvas.active_layer_mut().fill_rect(area, TRANSPARENT);
        self.selection.cancel();
        info!("cut {}x{} region", area.width(), area.height());
        true
    }

    pub fn copy_selection(&mut self) -> bool {
        let Some(area) = self.selected_area() else {
            return false;
        };
        self.clipboard = self.canvas.active_layer().crop(area);
        debug!("copied {}x{} region", area.width(), area.height());
        self.clipboard.is_some()
    }

    /// Pastes the clipboard with its top-left corner at (`x`, `y`).
    pub fn paste_clipboard(&mut self, x: i32, y: i32) -> bool {
        let Some(pixels) = self.clipboard.as_ref() else {
            return false;
        };
        self.history.snapshot(&self.canvas);
        self.canvas.active_layer_mut().paste(pixels, x, y);
        debug!("pasted clipboard at ({x}, {y})");
        true
    }

    // Output

    /// Flattened layers, without any overlay.
    pub fn composite(&self) -> RgbImage {
        self.canvas.composite()
    }

    /// What the window shows: the composite plus the shape preview, pending
    /// text, a moving selection's pixels and the selection marquee.
    pub fn display_frame(&self) -> RgbImage {
        let mut frame = self.canvas.composite();
        let state = self.drawing.state();
        let color = opaque(state.color);
        let mut overlay: Option<Layer> = None;
        let (w, h) = (self.canvas.width(), self.canvas.height());

        if let Some(shape) = self.drawing.preview() {
            let layer = overlay.get_or_insert_with(|| Layer::new("overlay".to_string(), w, h));
            shape.draw(layer, state.size, color);
        }
        if let Some(entry) = self.drawing.text_entry() {
            let layer = overlay.get_or_insert_with(|| Layer::new("overlay".to_string(), w, h));
            draw_text(layer, entry.origin, &entry.buffer, state.text_size, color);
        }
        if self.selection.is_dragging() {
            if let (Some(rect), Some(pixels)) = (self.selection.area(), self.selection.captured()) {
                let layer = overlay.get_or_insert_with(|| Layer::new("overlay".to_string(), w, h));
                layer.paste(pixels, rect.x1, rect.y1);
            }
        }

        if let Some(layer) = overlay {
            blend_overlay(&mut frame, &layer);
        }
        if let Some(rect) = self.selection.area() {
            draw_marquee(&mut frame, rect);
        }
        frame
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        io::export_composite(&self.canvas.composite(), path).inspect_err(|e| warn!("{e}"))
    }
}

fn blend_overlay(frame: &mut RgbImage, overlay: &Layer) {
    for (x, y, px) in frame.enumerate_pixels_mut() {
        let Some(src) = overlay.get_pixel(x as i32, y as i32) else {
            continue;
        };
        if src[3] == 0 {
            continue;
        }
        let alpha = src[3] as f32 / 255.0;
        for i in 0..3 {
            let v = src[i] as f32 * alpha + px.0[i] as f32 * (1.0 - alpha);
            px.0[i] = v.round() as u8;
        }
    }
}

/// Dashed outline along the inside edge of `rect`.
fn draw_marquee(frame: &mut RgbImage, rect: Rect) {
    let (w, h) = (frame.width() as i32, frame.height() as i32);
    let mut plot = |x: i32, y: i32, step: i32| {
        if (step / MARQUEE_DASH) % 2 == 0 && x >= 0 && y >= 0 && x < w && y < h {
            frame.put_pixel(x as u32, y as u32, image::Rgb(MARQUEE_COLOR));
        }
    };
    let (right, bottom) = ((rect.x2 - 1).max(rect.x1), (rect.y2 - 1).max(rect.y1));
    for x in rect.x1..=right {
        plot(x, rect.y1, x - rect.x1);
        plot(x, bottom, x - rect.x1);
    }
    for y in rect.y1..=bottom {
        plot(rect.x1, y, y - rect.y1);
        plot(right, y, y - rect.y1);
    }
}
