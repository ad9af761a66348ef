use std::collections::VecDeque;

use log::debug;

use crate::canvas::LayerStack;
use crate::layer::Layer;

pub const MAX_HISTORY: usize = 50;

/// Full copy of the layer stack at one point in time.
pub struct HistoryState {
    pub layers: Vec<Layer>,
    pub active: usize,
}

/// Bounded undo stack of whole-stack snapshots. The oldest entry is evicted
/// once the depth limit is reached. There is no redo.
pub struct HistoryStore {
    states: VecDeque<HistoryState>,
    max_depth: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl HistoryStore {
    pub fn new(max_depth: usize) -> Self {
        Self {
            states: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the current layers as the most recent undo point.
    pub fn snapshot(&mut self, stack: &LayerStack) {
        self.states.push_back(HistoryState {
            layers: stack.layers().to_vec(),
            active: stack.active_index(),
        });
        while self.states.len() > self.max_depth {
            self.states.pop_front();
        }
        debug!("history snapshot ({} / {})", self.states.len(), self.max_depth);
    }

    /// Restores the most recent snapshot. Returns false when there is none.
    pub fn undo(&mut self, stack: &mut LayerStack) -> bool {
        match self.states.pop_back() {
            Some(state) => {
                stack.replace_layers(state.layers, state.active);
                debug!("undo ({} left)", self.states.len());
                true
            }
            None => false,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        while self.states.len() > self.max_depth {
            self.states.pop_front();
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Snapshots from oldest to newest.
    pub fn states(&self) -> impl Iterator<Item = &HistoryState> {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> LayerStack {
        LayerStack::new(8, 8, [255, 255, 255]).unwrap()
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut history = HistoryStore::default();
        let mut s = stack();
        let before = s.composite();
        assert!(!history.undo(&mut s));
        assert_eq!(s.composite(), before);
    }

    #[test]
    fn undo_restores_pre_image() {
        let mut history = HistoryStore::default();
        let mut s = stack();
        let before = s.composite();
        history.snapshot(&s);
        s.active_layer_mut().set_pixel(3, 3, [0, 0, 0, 255]);
        assert_ne!(s.composite(), before);
        assert!(history.undo(&mut s));
        assert_eq!(s.composite(), before);
        assert!(history.is_empty());
    }

    #[test]
    fn snapshots_are_deep_copies() {
        let mut history = HistoryStore::default();
        let mut s = stack();
        history.snapshot(&s);
        s.active_layer_mut().set_pixel(0, 0, [1, 2, 3, 255]);
        let stored = history.states().next().unwrap();
        assert_eq!(stored.layers[0].get_pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn depth_is_bounded_and_keeps_most_recent() {
        let mut history = HistoryStore::new(50);
        let mut s = stack();
        for i in 0..1000u32 {
            s.active_layer_mut().set_pixel(0, 0, [(i % 256) as u8, (i / 256) as u8, 0, 255]);
            history.snapshot(&s);
        }
        assert_eq!(history.len(), 50);
        let tags: Vec<u32> = history
            .states()
            .map(|st| {
                let p = st.layers[0].get_pixel(0, 0).unwrap();
                p[0] as u32 + p[1] as u32 * 256
            })
            .collect();
        assert_eq!(tags, (950..1000).collect::<Vec<_>>());
    }

    #[test]
    fn undo_restores_layer_count_and_size() {
        let mut history = HistoryStore::default();
        let mut s = stack();
        history.snapshot(&s);
        s.add_layer();
        s.resize(20, 4).unwrap();
        history.undo(&mut s);
        assert_eq!(s.layer_count(), 1);
        assert_eq!((s.width(), s.height()), (8, 8));
        assert_eq!(s.active_index(), 0);
    }

    #[test]
    fn shrinking_max_depth_trims_oldest() {
        let mut history = HistoryStore::new(10);
        let s = stack();
        for _ in 0..10 {
            history.snapshot(&s);
        }
        history.set_max_depth(3);
        assert_eq!(history.len(), 3);
        history.set_max_depth(0);
        assert_eq!(history.max_depth(), 1);
        assert_eq!(history.len(), 1);
    }
}
