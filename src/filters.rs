//! Destructive filters applied to a square region of one layer.
//!
//! Every filter reads the region as it was before the call, so neighbour
//! sampling never sees already-filtered pixels, and neighbours outside the
//! region are never sampled.

use rayon::prelude::*;

use crate::layer::Layer;
use crate::rect::Rect;

const SHARPEN_AMOUNT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Grayscale,
    Sharpen,
    BoxBlur { radius: u32 },
}

/// Square of side `region_size` centred on (`x`, `y`), clipped to the layer.
pub fn filter_region(x: i32, y: i32, region_size: u32, width: u32, height: u32) -> Option<Rect> {
    let half = (region_size / 2) as i32;
    let rect = Rect::new(x - half, y - half, x + half, y + half).clamped(width, height);
    if rect.is_empty() { None } else { Some(rect) }
}

impl Filter {
    pub fn apply(&self, layer: &mut Layer, rect: Rect) {
        let Some(mut region) = layer.crop(rect) else {
            return;
        };
        match *self {
            Filter::Grayscale => grayscale(&mut region),
            Filter::Sharpen => region = sharpen(&region),
            Filter::BoxBlur { radius } => region = box_blur(&region, radius),
        }
        let r = rect.clamped(layer.width, layer.height);
        layer.paste(&region, r.x1, r.y1);
    }
}

fn grayscale(region: &mut Layer) {
    for px in region.pixels.chunks_exact_mut(4) {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
        let gray = (0.299 * r + 0.587 * g + 0.114 * b) as u8;
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
}

fn sharpen(src: &Layer) -> Layer {
    let (w, h) = (src.width as i32, src.height as i32);
    let mut out = src.clone();
    for y in 0..h {
        for x in 0..w {
            let Some(p) = src.get_pixel(x, y) else { continue };
            let neighbours: Vec<[u8; 4]> = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                .into_iter()
                .filter_map(|(nx, ny)| src.get_pixel(nx, ny))
                .collect();

            let mut sharpened = p;
            if !neighbours.is_empty() {
                let n = neighbours.len() as f32;
                for c in 0..3 {
                    let mean = neighbours.iter().map(|q| q[c] as f32).sum::<f32>() / n;
                    let v = p[c] as f32;
                    sharpened[c] = ((v + SHARPEN_AMOUNT * (v - mean)) as i32).clamp(0, 255) as u8;
                }
            }
            out.set_pixel(x, y, sharpened);
        }
    }
    out
}

fn box_blur(src: &Layer, radius: u32) -> Layer {
    let (w, h) = (src.width as i32, src.height as i32);
    let r = radius.min(i32::MAX as u32 / 4) as i32;
    let mut pixels = vec![0u8; src.pixels.len()];

    pixels
        .par_chunks_mut(w as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut sum = [0u32; 4];
                let mut count = 0u32;
                for ny in (y - r).max(0)..=(y + r).min(h - 1) {
                    for nx in (x - r).max(0)..=(x + r).min(w - 1) {
                        let idx = ((ny * w + nx) * 4) as usize;
                        for (c, s) in sum.iter_mut().enumerate() {
                            *s += src.pixels[idx + c] as u32;
                        }
                        count += 1;
                    }
                }
                let o = x as usize * 4;
                for c in 0..4 {
                    row[o + c] = (sum[c] / count) as u8;
                }
            }
        });

    Layer::from_rgba(src.name.clone(), src.width, src.height, pixels)
}
