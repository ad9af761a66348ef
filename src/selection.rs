use log::debug;
use serde::{Deserialize, Serialize};

use crate::layer::{Layer, TRANSPARENT};
use crate::rect::Rect;

/// What happens to the original pixels when a captured selection is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePolicy {
    /// The source rectangle is cleared to transparent before pasting.
    #[default]
    ClearSource,
    /// The source is left alone, so a move duplicates the content.
    KeepSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Defining,
    Defined,
    Dragging,
}

/// Rectangle selection: define, capture, drag-move, paste back, cancel.
pub struct SelectionEngine {
    phase: SelectionPhase,
    rect: Option<Rect>,
    anchor: (i32, i32),
    last: (i32, i32),
    captured: Option<Layer>,
    source: Option<Rect>,
    policy: MovePolicy,
}

impl SelectionEngine {
    pub fn new(policy: MovePolicy) -> Self {
        Self {
            phase: SelectionPhase::Idle,
            rect: None,
            anchor: (0, 0),
            last: (0, 0),
            captured: None,
            source: None,
            policy,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn policy(&self) -> MovePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MovePolicy) {
        self.policy = policy;
    }

    pub fn is_active(&self) -> bool {
        self.phase != SelectionPhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == SelectionPhase::Dragging
    }

    /// The rectangle as currently shown, possibly unnormalized while defining.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Normalized selection rectangle.
    pub fn area(&self) -> Option<Rect> {
        self.rect.map(|r| r.normalized())
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.is_some_and(|r| r.contains(x, y))
    }

    /// Pixels held since the last capture.
    pub fn captured(&self) -> Option<&Layer> {
        self.captured.as_ref()
    }

    /// Starts a new selection, dropping any previous one.
    pub fn start(&mut self, x: i32, y: i32) {
        self.cancel();
        self.phase = SelectionPhase::Defining;
        self.anchor = (x, y);
        self.last = (x, y);
        self.rect = Some(Rect::from_point(x, y));
    }

    pub fn update(&mut self, x: i32, y: i32) {
        match self.phase {
            SelectionPhase::Defining => {
                self.rect = Some(Rect::new(self.anchor.0, self.anchor.1, x, y));
            }
            SelectionPhase::Dragging => {
                let (dx, dy) = (x - self.last.0, y - self.last.1);
                self.rect = self.rect.map(|r| r.translated(dx, dy));
            }
            SelectionPhase::Idle | SelectionPhase::Defined => {}
        }
        self.last = (x, y);
    }

    /// Begins moving the captured pixels. Only valid on a defined selection
    /// and only from a point inside it.
    pub fn begin_drag(&mut self, x: i32, y: i32) -> bool {
        if self.phase != SelectionPhase::Defined || self.captured.is_none() || !self.contains(x, y) {
            return false;
        }
        self.phase = SelectionPhase::Dragging;
        self.last = (x, y);
        true
    }

    /// True when finishing at (`x`, `y`) would write pixels back onto the layer.
    pub fn will_paste(&self, x: i32, y: i32) -> bool {
        if self.phase != SelectionPhase::Dragging || self.captured.is_none() {
            return false;
        }
        let (dx, dy) = (x - self.last.0, y - self.last.1);
        match (self.rect, self.source) {
            (Some(rect), Some(source)) => rect.translated(dx, dy).normalized() != source,
            _ => false,
        }
    }

    /// Ends the current gesture. A defining gesture captures the region under
    /// the rectangle; a drag pastes the captured pixels at the new position.
    /// Returns true when `layer` was modified.
    pub fn finish(&mut self, x: i32, y: i32, layer: &mut Layer) -> bool {
        match self.phase {
            SelectionPhase::Defining => {
                self.update(x, y);
                self.capture(layer);
                false
            }
            SelectionPhase::Dragging => {
                let pasting = self.will_paste(x, y);
                self.update(x, y);
                if pasting {
                    self.paste_back(layer);
                } else {
                    self.phase = SelectionPhase::Defined;
                    self.rect = self.source;
                }
                pasting
            }
            SelectionPhase::Idle | SelectionPhase::Defined => false,
        }
    }

    /// Re-reads the held pixels after the selected area was edited in place.
    pub fn recapture(&mut self, layer: &Layer) {
        if self.phase == SelectionPhase::Defined {
            self.capture(layer);
        }
    }

    pub fn cancel(&mut self) {
        if self.phase != SelectionPhase::Idle {
            debug!("selection cancelled");
        }
        self.phase = SelectionPhase::Idle;
        self.rect = None;
        self.captured = None;
        self.source = None;
    }

    fn capture(&mut self, layer: &Layer) {
        let Some(rect) = self.rect else {
            return self.cancel();
        };
        let region = rect.clamped(layer.width, layer.height);
        match layer.crop(region) {
            Some(pixels) => {
                debug!("selection captured {}x{} at ({}, {})", region.width(), region.height(), region.x1, region.y1);
                self.captured = Some(pixels);
                self.source = Some(region);
                self.rect = Some(region);
                self.phase = SelectionPhase::Defined;
            }
            None => self.cancel(),
        }
    }

    fn paste_back(&mut self, layer: &mut Layer) {
        let (Some(rect), Some(pixels)) = (self.rect, self.captured.take()) else {
            return self.cancel();
        };
        let target = rect.normalized();
        if let (MovePolicy::ClearSource, Some(source)) = (self.policy, self.source) {
            layer.fill_rect(source, TRANSPARENT);
        }
        layer.paste(&pixels, target.x1, target.y1);
        debug!("selection pasted at ({}, {})", target.x1, target.y1);

        // The pasted pixels become the new selection so they can be moved again.
        self.rect = Some(target);
        self.capture(layer);
    }
}
