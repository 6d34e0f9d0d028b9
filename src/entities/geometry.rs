/// A position in grid units. Multiplied by the cell size only when a pixel
/// rectangle is needed for drawing or collision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale into pixel space, truncating toward zero.
    pub fn to_pixels(self, cell_size: u16) -> (i32, i32) {
        let cell = f32::from(cell_size);
        ((self.x * cell) as i32, (self.y * cell) as i32)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Integer rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Moves the rectangle so its vertical centre lands on `center_y`,
    /// keeping its size.
    pub fn set_center_y(&mut self, center_y: i32) {
        self.y = center_y - self.height / 2;
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Axis-aligned overlap test. Touching edges do not count and an empty
    /// rectangle never overlaps anything.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
