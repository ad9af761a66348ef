use image::RgbImage;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::{EditorError, Result};
use crate::layer::{Layer, opaque};

/// Largest width or height a stack accepts.
pub const MAX_DIMENSION: u32 = 16384;

/// Ordered layers sharing one size, bottom to top, with one active layer.
pub struct LayerStack {
    width: u32,
    height: u32,
    background: [u8; 3],
    layers: Vec<Layer>,
    active: usize,
    next_layer_id: usize,
}

/// Rejects zero or oversized dimensions before anything is allocated.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EditorError::InvalidDimension { width, height });
    }
    Ok(())
}

impl LayerStack {
    /// One opaque layer filled with `background`.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Result<Self> {
        check_dimensions(width, height)?;
        let base = Layer::filled("Layer 1".to_string(), width, height, opaque(background));
        Ok(Self {
            width,
            height,
            background,
            layers: vec![base],
            active: 0,
            next_layer_id: 2,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> [u8; 3] {
        self.background
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active]
    }

    /// The layer every drawing operation writes to. Resolved on each call;
    /// never hold on to it across a layer switch.
    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active]
    }

    /// Appends a transparent layer and makes it active.
    pub fn add_layer(&mut self) -> usize {
        let name = format!("Layer {}", self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.push(Layer::new(name, self.width, self.height));
        self.active = self.layers.len() - 1;
        info!("added {} (now {} layers)", self.layers[self.active].name, self.layers.len());
        self.active
    }

    /// Validates a delete without performing it.
    pub fn check_delete(&self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(EditorError::InvalidIndex { index, len: self.layers.len() });
        }
        if self.layers.len() == 1 {
            return Err(EditorError::InvalidLastLayer);
        }
        Ok(())
    }

    pub fn delete_layer(&mut self, index: usize) -> Result<()> {
        self.check_delete(index)?;
        let removed = self.layers.remove(index);
        self.active = index.saturating_sub(1).min(self.layers.len() - 1);
        info!("deleted {}, active is now {}", removed.name, self.active);
        Ok(())
    }

    pub fn switch_layer(&mut self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(EditorError::InvalidIndex { index, len: self.layers.len() });
        }
        self.active = index;
        debug!("switched to layer {index}");
        Ok(())
    }

    /// Reallocates every layer, keeping content anchored at the origin.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        for layer in &mut self.layers {
            *layer = layer.resized(width, height);
        }
        self.width = width;
        self.height = height;
        self.active = self.active.min(self.layers.len() - 1);
        info!("canvas resized to {width}x{height}");
        Ok(())
    }

    /// Swaps in a previously captured set of layers. Empty input is ignored.
    pub fn replace_layers(&mut self, layers: Vec<Layer>, active: usize) {
        let Some(first) = layers.first() else {
            return;
        };
        self.width = first.width;
        self.height = first.height;
        self.active = active.min(layers.len() - 1);
        self.layers = layers;
    }

    /// Flattens the stack over an opaque background with "over" blending.
    pub fn composite(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        let row_len = self.width as usize;
        let bg = self.background;

        out.par_chunks_mut(row_len * 3)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, dst) in row.chunks_exact_mut(3).enumerate() {
                    dst.copy_from_slice(&bg);
                    let src_idx = (y * row_len + x) * 4;
                    for layer in &self.layers {
                        let src = &layer.pixels[src_idx..src_idx + 4];
                        let alpha = src[3] as f32 / 255.0;
                        if alpha == 0.0 {
                            continue;
                        }
                        for i in 0..3 {
                            let v = src[i] as f32 * alpha + dst[i] as f32 * (1.0 - alpha);
                            dst[i] = v.round() as u8;
                        }
                    }
                }
            });

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn new_stack_composites_to_background() {
        let stack = LayerStack::new(13, 7, [10, 20, 30]).unwrap();
        let img = stack.composite();
        assert_eq!(img.dimensions(), (13, 7));
        assert!(img.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            LayerStack::new(0, 10, WHITE),
            Err(EditorError::InvalidDimension { width: 0, height: 10 })
        ));
        assert!(LayerStack::new(10, MAX_DIMENSION + 1, WHITE).is_err());
        let mut stack = LayerStack::new(10, 10, WHITE).unwrap();
        assert!(stack.resize(10, 0).is_err());
        assert_eq!((stack.width(), stack.height()), (10, 10));
    }

    #[test]
    fn add_layer_is_transparent_and_active() {
        let mut stack = LayerStack::new(5, 5, WHITE).unwrap();
        let idx = stack.add_layer();
        assert_eq!(idx, 1);
        assert_eq!(stack.active_index(), 1);
        assert!(stack.active_layer().pixels.iter().all(|&b| b == 0));
        assert_eq!(stack.active_layer().name, "Layer 2");
    }

    #[test]
    fn delete_clamps_active_index() {
        let mut stack = LayerStack::new(5, 5, WHITE).unwrap();
        stack.add_layer();
        stack.add_layer();
        stack.delete_layer(2).unwrap();
        assert_eq!(stack.active_index(), 1);
        stack.delete_layer(0).unwrap();
        assert_eq!(stack.active_index(), 0);
        assert_eq!(stack.layer_count(), 1);
    }

    #[test]
    fn cannot_delete_last_layer() {
        let mut stack = LayerStack::new(5, 5, WHITE).unwrap();
        assert!(matches!(stack.delete_layer(0), Err(EditorError::InvalidLastLayer)));
        assert!(matches!(
            stack.delete_layer(3),
            Err(EditorError::InvalidIndex { index: 3, len: 1 })
        ));
        assert_eq!(stack.layer_count(), 1);
    }

    #[test]
    fn switch_layer_validates_index() {
        let mut stack = LayerStack::new(5, 5, WHITE).unwrap();
        stack.add_layer();
        stack.switch_layer(0).unwrap();
        assert_eq!(stack.active_index(), 0);
        assert!(stack.switch_layer(2).is_err());
        assert_eq!(stack.active_index(), 0);
    }

    #[test]
    fn composite_blends_over() {
        let mut stack = LayerStack::new(2, 1, [0, 0, 0]).unwrap();
        stack.add_layer();
        stack.active_layer_mut().set_pixel(0, 0, [255, 255, 255, 255]);
        stack.active_layer_mut().set_pixel(1, 0, [255, 0, 0, 128]);
        let img = stack.composite();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        // 255 * 128/255 = 128
        assert_eq!(img.get_pixel(1, 0).0, [128, 0, 0]);
    }

    #[test]
    fn erased_base_layer_shows_background() {
        let mut stack = LayerStack::new(3, 3, [1, 2, 3]).unwrap();
        stack.active_layer_mut().set_pixel(1, 1, [0, 0, 0, 0]);
        assert_eq!(stack.composite().get_pixel(1, 1).0, [1, 2, 3]);
    }

    #[test]
    fn resize_preserves_content() {
        let mut stack = LayerStack::new(10, 10, WHITE).unwrap();
        stack.active_layer_mut().set_pixel(9, 9, [5, 5, 5, 255]);
        stack.resize(20, 15).unwrap();
        assert_eq!(stack.active_layer().get_pixel(9, 9), Some([5, 5, 5, 255]));
        assert_eq!(stack.active_layer().get_pixel(19, 14), Some([0, 0, 0, 0]));
        assert_eq!(stack.composite().get_pixel(19, 14).0, WHITE);
    }
}
