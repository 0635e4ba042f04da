//! Integer rectangle used by the bitmap allocator

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in grid cells
///
/// `(x, y)` is the top-left corner, `w` and `h` the extent. The allocator never
/// stores a `Rect`; it only reads coordinates from it and writes a found
/// position back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    /// Width in cells
    pub w: u32,
    /// Height in cells
    pub h: u32,
}

impl Rect {
    /// Create a rectangle at `(x, y)` of size `w × h`
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle of size `w × h` at the origin
    ///
    /// Handy as the input to a search, whose position is overwritten anyway.
    pub const fn sized(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Same size, moved to `(x, y)`
    #[must_use]
    pub const fn at(self, x: u32, y: u32) -> Self {
        Self { x, y, ..self }
    }

    /// One past the last column
    pub const fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the last row
    pub const fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Number of cells covered
    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// True when the rectangle covers no cells
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True when cell `(x, y)` lies inside the rectangle
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when the rectangle lies entirely inside a `width × height` grid
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        // Compare in u64 so corners near u32::MAX cannot wrap
        (self.x as u64 + self.w as u64) <= width as u64
            && (self.y as u64 + self.h as u64) <= height as u64
    }
}
