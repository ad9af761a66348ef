use crate::layer::{Layer, TRANSPARENT};

/// Round stamp dragged along a path. Pixels under the stamp are replaced, so
/// an eraser is just a brush whose colour is transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub radius: f32,
    pub color: [u8; 4],
}

impl Brush {
    /// A brush whose stroke is `width` pixels across.
    pub fn with_width(width: u32, color: [u8; 4]) -> Self {
        Self {
            radius: (width as f32 / 2.0).max(0.5),
            color,
        }
    }

    pub fn eraser(width: u32) -> Self {
        Self::with_width(width, TRANSPARENT)
    }

    pub fn stamp(&self, layer: &mut Layer, pos: (i32, i32)) {
        stamp_circle(layer, pos.0 as f32 + 0.5, pos.1 as f32 + 0.5, self.radius, self.color);
    }

    pub fn stroke(&self, layer: &mut Layer, from: (i32, i32), to: (i32, i32)) {
        let dx = (to.0 - from.0) as f32;
        let dy = (to.1 - from.1) as f32;
        let dist = (dx * dx + dy * dy).sqrt();
        let steps = dist.max(1.0).ceil();
        let step_x = dx / steps;
        let step_y = dy / steps;
        let mut x = from.0 as f32 + 0.5;
        let mut y = from.1 as f32 + 0.5;
        for _ in 0..=steps as i32 {
            stamp_circle(layer, x, y, self.radius, self.color);
            x += step_x;
            y += step_y;
        }
    }
}

/// Fills every pixel whose centre lies within `radius` of (`cx`, `cy`).
pub fn stamp_circle(layer: &mut Layer, cx: f32, cy: f32, radius: f32, color: [u8; 4]) {
    if radius <= 0.0 || layer.width == 0 || layer.height == 0 {
        return;
    }
    let r2 = radius * radius;
    let min_x = (cx - radius).floor().max(0.0) as i32;
    let max_x = (cx + radius).ceil().min((layer.width - 1) as f32) as i32;
    let min_y = (cy - radius).floor().max(0.0) as i32;
    let max_y = (cy + radius).ceil().min((layer.height - 1) as f32) as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                layer.set_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [u8; 4] = [0, 128, 0, 255];

    fn blank() -> Layer {
        Layer::filled("bg".to_string(), 100, 100, [255, 255, 255, 255])
    }

    #[test]
    fn stroke_marks_the_diagonal() {
        let mut layer = blank();
        Brush::with_width(5, GREEN).stroke(&mut layer, (10, 10), (20, 20));
        for i in 10..=20 {
            assert_eq!(layer.get_pixel(i, i), Some(GREEN), "pixel {i},{i}");
        }
        assert_eq!(layer.get_pixel(40, 40), Some([255, 255, 255, 255]));
    }

    #[test]
    fn width_one_paints_single_pixels() {
        let mut layer = blank();
        Brush::with_width(1, GREEN).stamp(&mut layer, (5, 5));
        assert_eq!(layer.get_pixel(5, 5), Some(GREEN));
        assert_eq!(layer.get_pixel(6, 5), Some([255, 255, 255, 255]));
        assert_eq!(layer.get_pixel(5, 6), Some([255, 255, 255, 255]));
    }

    #[test]
    fn eraser_clears_what_the_brush_drew() {
        let mut layer = Layer::new("t".to_string(), 50, 50);
        Brush::with_width(7, GREEN).stroke(&mut layer, (5, 40), (45, 8));
        Brush::eraser(7).stroke(&mut layer, (5, 40), (45, 8));
        assert!(layer.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn stamp_near_edge_is_clipped() {
        let mut layer = Layer::new("t".to_string(), 10, 10);
        Brush::with_width(9, GREEN).stamp(&mut layer, (0, 0));
        Brush::with_width(9, GREEN).stamp(&mut layer, (-30, 500));
        assert_eq!(layer.get_pixel(0, 0), Some(GREEN));
    }
}
