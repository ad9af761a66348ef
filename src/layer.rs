use crate::rect::Rect;

pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Widens a user colour to an opaque pixel.
pub fn opaque(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], 255]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA8, packed in row-major order
}

impl Layer {
    /// Fully transparent layer.
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self::filled(name, width, height, TRANSPARENT)
    }

    pub fn filled(name: String, width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut layer = Self {
            name,
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        };
        if color != TRANSPARENT {
            layer.clear(color);
        }
        layer
    }

    pub fn from_rgba(name: String, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);
        Self {
            name,
            width,
            height,
            pixels,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(((y as usize) * (self.width as usize) + x as usize) * 4)
        } else {
            None
        }
    }

    /// Writes a pixel; coordinates outside the layer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if let Some(idx) = self.offset(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let idx = self.offset(x, y)?;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(color)
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Overwrites a region (clipped to the layer) with one colour.
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let r = rect.clamped(self.width, self.height);
        for y in r.y1..r.y2 {
            for x in r.x1..r.x2 {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Copies the region under `rect`, clipped to the layer. `None` when the
    /// clipped region is empty.
    pub fn crop(&self, rect: Rect) -> Option<Layer> {
        let r = rect.clamped(self.width, self.height);
        if r.is_empty() {
            return None;
        }
        let (w, h) = (r.width(), r.height());
        let row_bytes = w as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * h as usize);
        for y in r.y1..r.y2 {
            let start = ((y as usize) * (self.width as usize) + r.x1 as usize) * 4;
            pixels.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        Some(Layer::from_rgba(format!("{} (crop)", self.name), w, h, pixels))
    }

    /// Replaces pixels with `src` placed at (`x`, `y`), including transparent
    /// ones. Parts falling outside the layer are dropped.
    pub fn paste(&mut self, src: &Layer, x: i32, y: i32) {
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy as u32 >= self.height {
                continue;
            }
            for sx in 0..src.width as i32 {
                if let Some(color) = src.get_pixel(sx, sy) {
                    self.set_pixel(x + sx, dy, color);
                }
            }
        }
    }

    /// New layer of the given size holding this content anchored at (0, 0);
    /// uncovered area is transparent.
    pub fn resized(&self, new_width: u32, new_height: u32) -> Layer {
        let mut out = Layer::new(self.name.clone(), new_width, new_height);
        let copy_w = self.width.min(new_width) as usize * 4;
        for y in 0..self.height.min(new_height) as usize {
            let src = y * self.width as usize * 4;
            let dst = y * new_width as usize * 4;
            out.pixels[dst..dst + copy_w].copy_from_slice(&self.pixels[src..src + copy_w]);
        }
        out
    }
}
