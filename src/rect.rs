/// Axis-aligned rectangle in canvas pixels.
///
/// Corners may be stored unsorted (a live drag preview); call [`Rect::normalized`]
/// before using it as a pixel region. As a region it is half-open:
/// `x1..x2` by `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_point(x: i32, y: i32) -> Self {
        Self::new(x, y, x, y)
    }

    pub fn normalized(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn width(&self) -> u32 {
        self.x1.abs_diff(self.x2)
    }

    pub fn height(&self) -> u32 {
        self.y1.abs_diff(self.y2)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Point test against the normalized, half-open region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let r = self.normalized();
        x >= r.x1 && x < r.x2 && y >= r.y1 && y < r.y2
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Normalizes and clips to `0..width` by `0..height`.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let r = self.normalized();
        let w = width.min(i32::MAX as u32) as i32;
        let h = height.min(i32::MAX as u32) as i32;
        Self {
            x1: r.x1.clamp(0, w),
            y1: r.y1.clamp(0, h),
            x2: r.x2.clamp(0, w),
            y2: r.y2.clamp(0, h),
        }
    }
}
