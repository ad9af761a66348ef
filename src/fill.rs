use crate::error::{EditorError, Result};
use crate::layer::Layer;

/// 4-connected flood fill seeded at (`x`, `y`).
///
/// Every pixel connected to the seed and exactly equal to it is replaced by
/// `fill_color`. Returns the number of pixels changed; zero when the seed
/// already has the fill colour.
pub fn flood_fill(layer: &mut Layer, x: i32, y: i32, fill_color: [u8; 4]) -> Result<usize> {
    let target = layer
        .get_pixel(x, y)
        .ok_or(EditorError::FillFailure { x, y })?;

    if target == fill_color {
        return Ok(0);
    }

    let width = layer.width as i32;
    let height = layer.height as i32;
    let mut filled = 0;
    let mut stack = vec![(x, y)];
    let mut visited = vec![false; (layer.width as usize) * (layer.height as usize)];

    while let Some((x, y)) = stack.pop() {
        let visit_idx = (y * width + x) as usize;
        if visited[visit_idx] {
            continue;
        }
        visited[visit_idx] = true;

        if layer.get_pixel(x, y) != Some(target) {
            continue;
        }
        layer.set_pixel(x, y, fill_color);
        filled += 1;

        if x > 0 { stack.push((x - 1, y)); }
        if x + 1 < width { stack.push((x + 1, y)); }
        if y > 0 { stack.push((x, y - 1)); }
        if y + 1 < height { stack.push((x, y + 1)); }
    }

    Ok(filled)
}
