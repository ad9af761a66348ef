use log::{debug, warn};

use crate::brush::Brush;
use crate::canvas::LayerStack;
use crate::error::EditorError;
use crate::fill::flood_fill;
use crate::filters::{Filter, filter_region};
use crate::history::HistoryStore;
use crate::layer::opaque;
use crate::shapes::Shape;
use crate::text::draw_text;
use crate::tools::{ToolKind, ToolState};

/// Text typed at a canvas position, not yet rasterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub origin: (i32, i32),
    pub buffer: String,
}

/// Tool state machine driven by press/drag/release gestures.
///
/// Every method takes the layer stack and history explicitly and resolves the
/// active layer at call time. A gesture is snapshotted into history once,
/// right before its first write.
pub struct DrawingEngine {
    state: ToolState,
    anchor: Option<(i32, i32)>,
    last: Option<(i32, i32)>,
    preview: Option<Shape>,
    text: Option<TextEntry>,
    snapshotted: bool,
}

impl DrawingEngine {
    pub fn new(state: ToolState) -> Self {
        Self {
            state,
            anchor: None,
            last: None,
            preview: None,
            text: None,
            snapshotted: false,
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.state.tool
    }

    /// Switching tools commits any open text entry and drops a pending gesture.
    pub fn set_tool(&mut self, tool: ToolKind, canvas: &mut LayerStack, history: &mut HistoryStore) {
        if self.text.is_some() {
            self.commit_text(canvas, history);
        }
        self.reset_gesture();
        self.state.tool = tool;
        debug!("tool set to {tool}");
    }

    pub fn set_color(&mut self, color: [u8; 3]) {
        self.state.color = color;
    }

    pub fn set_size(&mut self, size: u32) -> bool {
        if size == 0 {
            warn!("ignoring stroke size 0");
            return false;
        }
        self.state.size = size;
        true
    }

    pub fn set_text_size(&mut self, size: u32) -> bool {
        if size == 0 {
            warn!("ignoring text size 0");
            return false;
        }
        self.state.text_size = size;
        true
    }

    pub fn set_region_size(&mut self, size: u32) -> bool {
        if size == 0 {
            warn!("ignoring filter region size 0");
            return false;
        }
        self.state.region_size = size;
        true
    }

    /// Shape being dragged out, for on-screen preview only.
    pub fn preview(&self) -> Option<Shape> {
        self.preview
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.text.as_ref()
    }

    pub fn press(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore, x: i32, y: i32) {
        self.reset_gesture();
        self.anchor = Some((x, y));
        self.last = Some((x, y));

        if self.text.is_some() {
            self.commit_text(canvas, history);
            return;
        }

        match self.state.tool {
            ToolKind::Fill => self.fill_at(canvas, history, x, y),
            ToolKind::Text => {
                debug!("text entry opened at ({x}, {y})");
                self.text = Some(TextEntry {
                    origin: (x, y),
                    buffer: String::new(),
                });
            }
            _ => {}
        }
    }

    pub fn drag(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore, x: i32, y: i32) {
        match self.state.tool {
            ToolKind::Brush | ToolKind::Eraser => {
                let Some(from) = self.last else {
                    return;
                };
                let brush = if self.state.tool == ToolKind::Brush {
                    Brush::with_width(self.state.size, opaque(self.state.color))
                } else {
                    Brush::eraser(self.state.size)
                };
                self.begin_mutation(canvas, history);
                brush.stroke(canvas.active_layer_mut(), from, (x, y));
                self.last = Some((x, y));
            }
            tool if tool.is_shape() => self.preview = self.shape_to(x, y),
            tool if tool.is_filter() => self.filter_at(canvas, history, x, y),
            _ => {}
        }
    }

    pub fn release(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore, x: i32, y: i32) {
        if let Some(shape) = self.shape_to(x, y) {
            self.begin_mutation(canvas, history);
            shape.draw(canvas.active_layer_mut(), self.state.size, opaque(self.state.color));
            debug!("committed {shape:?}");
        }
        self.reset_gesture();
    }

    pub fn type_text(&mut self, text: &str) {
        if let Some(entry) = self.text.as_mut() {
            entry.buffer.push_str(text);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(entry) = self.text.as_mut() {
            entry.buffer.pop();
        }
    }

    /// Rasterizes the open text entry onto the active layer and closes it.
    /// Blank text closes the entry without drawing. Returns true if drawn.
    pub fn commit_text(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore) -> bool {
        let Some(entry) = self.text.take() else {
            return false;
        };
        if entry.buffer.trim().is_empty() {
            debug!("discarding blank text entry");
            return false;
        }
        history.snapshot(canvas);
        draw_text(
            canvas.active_layer_mut(),
            entry.origin,
            &entry.buffer,
            self.state.text_size,
            opaque(self.state.color),
        );
        debug!("committed text {:?} at {:?}", entry.buffer, entry.origin);
        true
    }

    pub fn cancel_text(&mut self) {
        self.text = None;
    }

    /// Forgets that the current gesture was snapshotted, so its next write
    /// takes a fresh undo point. Called after history is rewound.
    pub fn invalidate_snapshot(&mut self) {
        self.snapshotted = false;
    }

    fn reset_gesture(&mut self) {
        self.anchor = None;
        self.last = None;
        self.preview = None;
        self.snapshotted = false;
    }

    fn begin_mutation(&mut self, canvas: &LayerStack, history: &mut HistoryStore) {
        if !self.snapshotted {
            history.snapshot(canvas);
            self.snapshotted = true;
        }
    }

    fn shape_to(&self, x: i32, y: i32) -> Option<Shape> {
        let start = self.anchor?;
        let shape = match self.state.tool {
            ToolKind::Circle => {
                let dx = (x - start.0) as f32;
                let dy = (y - start.1) as f32;
                Shape::Circle {
                    center: start,
                    radius: (dx * dx + dy * dy).sqrt(),
                }
            }
            ToolKind::Rectangle => Shape::Rectangle { a: start, b: (x, y) },
            ToolKind::Ellipse => Shape::Ellipse { a: start, b: (x, y) },
            ToolKind::Line => Shape::Line { from: start, to: (x, y) },
            _ => return None,
        };
        Some(shape)
    }

    fn fill_at(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore, x: i32, y: i32) {
        let color = opaque(self.state.color);
        match canvas.active_layer().get_pixel(x, y) {
            None => debug!("skipping fill: {}", EditorError::FillFailure { x, y }),
            Some(seed) if seed == color => debug!("fill at ({x}, {y}) already has the fill colour"),
            Some(_) => {
                self.begin_mutation(canvas, history);
                match flood_fill(canvas.active_layer_mut(), x, y, color) {
                    Ok(count) => debug!("filled {count} pixels from ({x}, {y})"),
                    Err(e) => warn!("fill failed: {e}"),
                }
            }
        }
    }

    fn filter_at(&mut self, canvas: &mut LayerStack, history: &mut HistoryStore, x: i32, y: i32) {
        let filter = match self.state.tool {
            ToolKind::Grayscale => Filter::Grayscale,
            ToolKind::Sharpen => Filter::Sharpen,
            ToolKind::GaussianBlur => Filter::BoxBlur { radius: self.state.size },
            _ => return,
        };
        let Some(rect) = filter_region(x, y, self.state.region_size, canvas.width(), canvas.height()) else {
            return;
        };
        self.begin_mutation(canvas, history);
        filter.apply(canvas.active_layer_mut(), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    struct Fixture {
        canvas: LayerStack,
        history: HistoryStore,
        engine: DrawingEngine,
    }

    impl Fixture {
        fn new(tool: ToolKind) -> Self {
            let state = ToolState {
                tool,
                ..ToolState::default()
            };
            Self {
                canvas: LayerStack::new(100, 100, WHITE).unwrap(),
                history: HistoryStore::default(),
                engine: DrawingEngine::new(state),
            }
        }

        fn press(&mut self, x: i32, y: i32) {
            self.engine.press(&mut self.canvas, &mut self.history, x, y);
        }

        fn drag(&mut self, x: i32, y: i32) {
            self.engine.drag(&mut self.canvas, &mut self.history, x, y);
        }

        fn release(&mut self, x: i32, y: i32) {
            self.engine.release(&mut self.canvas, &mut self.history, x, y);
        }

        fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
            self.canvas.active_layer().get_pixel(x, y).unwrap()
        }
    }

    #[test]
    fn brush_stroke_follows_samples_and_snapshots_once() {
        let mut f = Fixture::new(ToolKind::Brush);
        f.engine.set_color([0, 128, 0]);
        f.press(10, 10);
        f.drag(30, 10);
        f.drag(30, 30);
        f.release(30, 30);
        assert_eq!(f.pixel(20, 10), [0, 128, 0, 255]);
        assert_eq!(f.pixel(30, 20), [0, 128, 0, 255]);
        // Not a chord from the first to the last sample.
        assert_eq!(f.pixel(20, 20), [255, 255, 255, 255]);
        assert_eq!(f.history.len(), 1);
    }

    #[test]
    fn press_without_drag_does_not_touch_history() {
        let mut f = Fixture::new(ToolKind::Brush);
        f.press(10, 10);
        f.release(10, 10);
        assert!(f.history.is_empty());
    }

    #[test]
    fn eraser_writes_transparency() {
        let mut f = Fixture::new(ToolKind::Eraser);
        f.press(10, 50);
        f.drag(90, 50);
        assert_eq!(f.pixel(50, 50), [0, 0, 0, 0]);
        assert_eq!(f.canvas.composite().get_pixel(50, 50).0, WHITE);
    }

    #[test]
    fn fill_on_press() {
        let mut f = Fixture::new(ToolKind::Fill);
        f.engine.set_color([0, 0, 255]);
        f.press(50, 50);
        assert_eq!(f.pixel(0, 99), [0, 0, 255, 255]);
        assert_eq!(f.history.len(), 1);
    }

    #[test]
    fn fill_outside_canvas_is_silent() {
        let mut f = Fixture::new(ToolKind::Fill);
        f.press(150, 50);
        f.press(-1, -1);
        assert!(f.history.is_empty());
        assert_eq!(f.pixel(50, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn shapes_preview_without_committing() {
        let mut f = Fixture::new(ToolKind::Circle);
        f.press(50, 50);
        f.drag(60, 50);
        assert_eq!(
            f.engine.preview(),
            Some(Shape::Circle { center: (50, 50), radius: 10.0 })
        );
        assert!(f.history.is_empty());
        assert_eq!(f.pixel(60, 50), [255, 255, 255, 255]);

        f.release(70, 50);
        assert_eq!(f.engine.preview(), None);
        assert_eq!(f.pixel(70, 50), [0, 0, 0, 255]);
        assert_eq!(f.pixel(50, 50), [255, 255, 255, 255]);
        assert_eq!(f.history.len(), 1);
    }

    #[test]
    fn rectangle_commits_on_release() {
        let mut f = Fixture::new(ToolKind::Rectangle);
        f.engine.set_size(1);
        f.press(40, 40);
        f.drag(45, 45);
        f.release(20, 30);
        assert_eq!(f.pixel(20, 30), [0, 0, 0, 255]);
        assert_eq!(f.pixel(40, 40), [0, 0, 0, 255]);
        assert_eq!(f.pixel(30, 35), [255, 255, 255, 255]);
    }

    #[test]
    fn line_tool_draws_start_to_release() {
        let mut f = Fixture::new(ToolKind::Line);
        f.press(10, 80);
        f.release(90, 80);
        assert_eq!(f.pixel(50, 80), [0, 0, 0, 255]);
    }

    #[test]
    fn filters_compound_per_drag_sample() {
        let mut f = Fixture::new(ToolKind::GaussianBlur);
        f.canvas.active_layer_mut().fill_rect(crate::rect::Rect::new(0, 0, 50, 100), [0, 0, 0, 255]);
        f.engine.set_size(2);
        f.press(50, 50);
        assert!(f.history.is_empty());
        f.drag(50, 50);
        let once = f.pixel(51, 50);
        f.drag(50, 50);
        assert_ne!(f.pixel(51, 50), once);
        f.release(50, 50);
        assert_eq!(f.history.len(), 1);
    }

    #[test]
    fn grayscale_region_stays_local() {
        let mut f = Fixture::new(ToolKind::Grayscale);
        f.canvas.active_layer_mut().clear([255, 0, 0, 255]);
        f.press(50, 50);
        f.drag(50, 50);
        assert_eq!(f.pixel(50, 50), [76, 76, 76, 255]);
        assert_eq!(f.pixel(5, 5), [255, 0, 0, 255]);
    }

    #[test]
    fn text_commits_on_next_press() {
        let mut f = Fixture::new(ToolKind::Text);
        f.press(10, 10);
        assert_eq!(f.engine.text_entry().map(|e| e.origin), Some((10, 10)));
        f.engine.type_text("Hx");
        f.engine.backspace();
        f.engine.type_text("I");
        f.press(80, 80);
        assert!(f.engine.text_entry().is_none());
        assert_eq!(f.history.len(), 1);
        // 'H' left column.
        assert_eq!(f.pixel(10, 10), [0, 0, 0, 255]);
        // The commit press does not open a new entry.
        assert!(f.engine.text_entry().is_none());
    }

    #[test]
    fn blank_text_commits_nothing() {
        let mut f = Fixture::new(ToolKind::Text);
        f.press(10, 10);
        f.engine.type_text("   ");
        assert!(!f.engine.commit_text(&mut f.canvas, &mut f.history));
        assert!(f.history.is_empty());
        assert!(f.engine.text_entry().is_none());
    }

    #[test]
    fn switching_tool_commits_text() {
        let mut f = Fixture::new(ToolKind::Text);
        f.press(10, 10);
        f.engine.type_text("T");
        f.engine.set_tool(ToolKind::Brush, &mut f.canvas, &mut f.history);
        assert!(f.engine.text_entry().is_none());
        assert_eq!(f.pixel(12, 10), [0, 0, 0, 255]);
        assert_eq!(f.engine.tool(), ToolKind::Brush);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut f = Fixture::new(ToolKind::Brush);
        assert!(!f.engine.set_size(0));
        assert!(!f.engine.set_text_size(0));
        assert!(!f.engine.set_region_size(0));
        assert_eq!(f.engine.state().size, 5);
        assert!(f.engine.set_size(9));
        assert_eq!(f.engine.state().size, 9);
    }

    #[test]
    fn stroke_resumed_after_rewind_snapshots_again() {
        let mut f = Fixture::new(ToolKind::Brush);
        f.press(10, 10);
        f.drag(50, 10);
        assert!(f.history.undo(&mut f.canvas));
        f.engine.invalidate_snapshot();
        f.drag(50, 60);
        f.release(50, 60);
        assert_eq!(f.history.len(), 1);
        assert_eq!(f.pixel(50, 40), [0, 0, 0, 255]);
    }

    #[test]
    fn drawing_follows_the_active_layer() {
        let mut f = Fixture::new(ToolKind::Brush);
        f.canvas.add_layer();
        f.canvas.switch_layer(0).unwrap();
        f.press(10, 10);
        f.drag(20, 10);
        assert_eq!(f.canvas.layers()[0].get_pixel(15, 10), Some([0, 0, 0, 255]));
        assert_eq!(f.canvas.layers()[1].get_pixel(15, 10), Some([0, 0, 0, 0]));
    }
}
