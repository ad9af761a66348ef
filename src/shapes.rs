//! Outline rasterizers for the shape tools.
//!
//! Bounding boxes are given as two opposite corners in any order and are
//! inclusive of both corner pixels.

use crate::brush::Brush;
use crate::layer::Layer;

/// A shape pending commit, as previewed during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line { from: (i32, i32), to: (i32, i32) },
    Rectangle { a: (i32, i32), b: (i32, i32) },
    Ellipse { a: (i32, i32), b: (i32, i32) },
    Circle { center: (i32, i32), radius: f32 },
}

impl Shape {
    pub fn draw(&self, layer: &mut Layer, width: u32, color: [u8; 4]) {
        match *self {
            Shape::Line { from, to } => Brush::with_width(width, color).stroke(layer, from, to),
            Shape::Rectangle { a, b } => rectangle_outline(layer, a, b, width, color),
            Shape::Ellipse { a, b } => ellipse_outline(layer, a, b, width, color),
            Shape::Circle { center, radius } => circle_outline(layer, center, radius, width, color),
        }
    }
}

fn sorted(a: (i32, i32), b: (i32, i32)) -> (i32, i32, i32, i32) {
    (a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
}

pub fn rectangle_outline(layer: &mut Layer, a: (i32, i32), b: (i32, i32), width: u32, color: [u8; 4]) {
    let (x0, y0, x1, y1) = sorted(a, b);
    let w = width.max(1) as i32;
    let clip_x = (x0.max(0), x1.min(layer.width as i32 - 1));
    let clip_y = (y0.max(0), y1.min(layer.height as i32 - 1));
    for y in clip_y.0..=clip_y.1 {
        for x in clip_x.0..=clip_x.1 {
            if x < x0 + w || x > x1 - w || y < y0 + w || y > y1 - w {
                layer.set_pixel(x, y, color);
            }
        }
    }
}

pub fn ellipse_outline(layer: &mut Layer, a: (i32, i32), b: (i32, i32), width: u32, color: [u8; 4]) {
    let (x0, y0, x1, y1) = sorted(a, b);
    // Continuous box covering both corner pixels.
    let rx = (x1 + 1 - x0) as f32 / 2.0;
    let ry = (y1 + 1 - y0) as f32 / 2.0;
    let cx = x0 as f32 + rx;
    let cy = y0 as f32 + ry;
    ring(layer, (cx, cy), (rx, ry), width, color);
}

pub fn circle_outline(layer: &mut Layer, center: (i32, i32), radius: f32, width: u32, color: [u8; 4]) {
    if !radius.is_finite() {
        return;
    }
    let c = (center.0 as f32 + 0.5, center.1 as f32 + 0.5);
    // A zero radius still leaves a dot, like a single click with the pen.
    let r = radius.max(0.5);
    ring(layer, c, (r, r), width, color);
}

/// Pixels inside the outer ellipse but outside the one shrunk by `width`.
fn ring(layer: &mut Layer, center: (f32, f32), radii: (f32, f32), width: u32, color: [u8; 4]) {
    if layer.width == 0 || layer.height == 0 {
        return;
    }
    let (cx, cy) = center;
    let (rx, ry) = radii;
    let w = width.max(1) as f32;
    let (ix, iy) = (rx - w, ry - w);
    let hollow = ix > 0.0 && iy > 0.0;

    let min_x = (cx - rx).floor().max(0.0) as i32;
    let max_x = (cx + rx).ceil().min((layer.width - 1) as f32) as i32;
    let min_y = (cy - ry).floor().max(0.0) as i32;
    let max_y = (cy + ry).ceil().min((layer.height - 1) as f32) as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let outer = (dx / rx).powi(2) + (dy / ry).powi(2);
            if outer > 1.0 {
                continue;
            }
            if hollow && (dx / ix).powi(2) + (dy / iy).powi(2) < 1.0 {
                continue;
            }
            layer.set_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn blank() -> Layer {
        Layer::new("t".to_string(), 60, 60)
    }

    #[test]
    fn rectangle_corners_need_not_be_sorted() {
        let mut a = blank();
        let mut b = blank();
        rectangle_outline(&mut a, (10, 10), (30, 20), 2, RED);
        rectangle_outline(&mut b, (30, 20), (10, 10), 2, RED);
        assert_eq!(a, b);
        assert_eq!(a.get_pixel(10, 10), Some(RED));
        assert_eq!(a.get_pixel(30, 20), Some(RED));
        assert_eq!(a.get_pixel(11, 15), Some(RED));
        assert_eq!(a.get_pixel(12, 15), Some([0, 0, 0, 0]));
        assert_eq!(a.get_pixel(31, 20), Some([0, 0, 0, 0]));
    }

    #[test]
    fn ellipse_touches_box_edges_and_is_hollow() {
        let mut layer = blank();
        ellipse_outline(&mut layer, (10, 10), (50, 30), 3, RED);
        assert_eq!(layer.get_pixel(30, 10), Some(RED));
        assert_eq!(layer.get_pixel(10, 20), Some(RED));
        assert_eq!(layer.get_pixel(50, 20), Some(RED));
        assert_eq!(layer.get_pixel(30, 20), Some([0, 0, 0, 0]));
        assert_eq!(layer.get_pixel(9, 20), Some([0, 0, 0, 0]));
    }

    #[test]
    fn circle_ring_has_requested_radius() {
        let mut layer = blank();
        circle_outline(&mut layer, (30, 30), 20.0, 2, RED);
        assert_eq!(layer.get_pixel(30, 11), Some(RED));
        assert_eq!(layer.get_pixel(49, 30), Some(RED));
        assert_eq!(layer.get_pixel(30, 30), Some([0, 0, 0, 0]));
        assert_eq!(layer.get_pixel(30, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn thick_outline_fills_small_shapes() {
        let mut layer = blank();
        ellipse_outline(&mut layer, (0, 0), (4, 4), 10, RED);
        assert_eq!(layer.get_pixel(2, 2), Some(RED));
    }

    #[test]
    fn shape_line_uses_brush_stroke() {
        let mut layer = blank();
        Shape::Line { from: (5, 5), to: (40, 5) }.draw(&mut layer, 3, RED);
        assert_eq!(layer.get_pixel(20, 5), Some(RED));
        assert_eq!(layer.get_pixel(20, 9), Some([0, 0, 0, 0]));
    }
}
