/// Pointer gesture events in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press(i32, i32),
    Drag(i32, i32),
    Release(i32, i32),
}

/// Turns raw button/cursor notifications into press/drag/release events.
#[derive(Debug, Default)]
pub struct PointerState {
    pub pressed: bool,
    pub last_pos: Option<(i32, i32)>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, pos: (i32, i32)) -> Option<PointerEvent> {
        if self.last_pos == Some(pos) {
            return None;
        }
        self.last_pos = Some(pos);
        self.pressed.then_some(PointerEvent::Drag(pos.0, pos.1))
    }

    pub fn press(&mut self) -> Option<PointerEvent> {
        let (x, y) = self.last_pos?;
        self.pressed = true;
        Some(PointerEvent::Press(x, y))
    }

    pub fn release(&mut self) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        let (x, y) = self.last_pos?;
        Some(PointerEvent::Release(x, y))
    }
}

/// Maps a window position to canvas pixels when the canvas is stretched over
/// the whole window. Points outside the window map outside the canvas.
pub fn window_to_canvas(
    pos: (f64, f64),
    window_size: (u32, u32),
    canvas_size: (u32, u32),
) -> Option<(i32, i32)> {
    if window_size.0 == 0 || window_size.1 == 0 {
        return None;
    }
    let x = pos.0 * canvas_size.0 as f64 / window_size.0 as f64;
    let y = pos.1 * canvas_size.1 as f64 / window_size.1 as f64;
    Some((x.floor() as i32, y.floor() as i32))
}
