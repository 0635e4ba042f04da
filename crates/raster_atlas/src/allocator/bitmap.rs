//! Bitmap-backed 2D rectangle allocator
//!
//! The allocator keeps one bit per grid cell, packed row-major into 64-bit
//! words. A row occupies `pitch = ceil(width / 64)` words, so cell `(x, y)`
//! lives in word `y * pitch + x / 64` at bit `x % 64`. A set bit means the
//! cell is occupied.
//!
//! ```text
//!   width = 70, pitch = 2
//!
//!   word:   [ row 0, x 0..64 ][ row 0, x 64..70 + unused ]
//!           [ row 1, x 0..64 ][ row 1, x 64..70 + unused ]
//!           ...
//! ```
//!
//! Searches are exhaustive first-fit scans in column-major order (x outer,
//! y inner). Placement order is deterministic, so the same sequence of calls
//! always produces the same layout.

use std::fmt;

use super::Rect;

const WORD_BITS: u32 = u64::BITS;

/// Occupancy bitmap over a fixed `width × height` grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapRectAllocator {
    width: u32,
    height: u32,
    pitch: u32,
    bits: Vec<u64>,
}

impl BitmapRectAllocator {
    /// Create an allocator covering a `width × height` grid
    ///
    /// Every cell starts free. Zero dimensions are a caller error.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(
            width > 0 && height > 0,
            "allocator dimensions must be non-zero, got {width}x{height}"
        );

        let pitch = width.div_ceil(WORD_BITS);
        Self {
            width,
            height,
            pitch,
            bits: vec![0; pitch as usize * height as usize],
        }
    }

    /// Grid width in cells
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Words per row
    pub const fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Mark every cell free
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// True when cell `(x, y)` is occupied
    pub fn get_bit(&self, x: u32, y: u32) -> bool {
        let (index, mask) = self.locate(x, y);
        self.bits[index] & mask != 0
    }

    /// Mark cell `(x, y)` occupied
    pub fn set_bit(&mut self, x: u32, y: u32) {
        let (index, mask) = self.locate(x, y);
        self.bits[index] |= mask;
    }

    /// Mark cell `(x, y)` free
    pub fn clear_bit(&mut self, x: u32, y: u32) {
        let (index, mask) = self.locate(x, y);
        self.bits[index] &= !mask;
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> u64 {
        // Bits past `width` in a row's last word are never written
        self.bits.iter().map(|word| u64::from(word.count_ones())).sum()
    }

    /// True when every cell of `rect` is free
    ///
    /// Rows are scanned top to bottom and the scan stops at the first
    /// occupied cell. `rect` must lie inside the grid.
    pub fn is_rect_free(&self, rect: Rect) -> bool {
        self.debug_check_rect(rect);
        if rect.is_empty() {
            return true;
        }

        (rect.y..rect.bottom()).all(|y| {
            let row = self.row_start(y);
            span_words(rect.x, rect.right()).all(|(word, mask)| self.bits[row + word] & mask == 0)
        })
    }

    /// True when every cell that `other` marks occupied lands on a free cell
    ///
    /// `other`'s origin maps onto `(rect.x, rect.y)`. Cells the mask leaves
    /// free are not checked against this allocator.
    pub fn is_rect_free_masked(&self, rect: Rect, other: &Self) -> bool {
        self.debug_check_rect(rect);
        other.debug_check_mask(rect);

        for dy in 0..rect.h {
            for dx in 0..rect.w {
                if other.get_bit(dx, dy) && self.get_bit(rect.x + dx, rect.y + dy) {
                    return false;
                }
            }
        }
        true
    }

    /// Find the first free position for a `rect.w × rect.h` rectangle
    ///
    /// The incoming position is ignored. On success the found position is
    /// written into `rect`; on failure `rect` is left untouched. A request
    /// larger than the grid never fits.
    pub fn find(&self, rect: &mut Rect) -> bool {
        self.first_fit(rect, |candidate| self.is_rect_free(candidate))
    }

    /// Find the first position where `other`'s occupied cells all land on free cells
    ///
    /// Same scan order as [`find`](Self::find).
    pub fn find_masked(&self, rect: &mut Rect, other: &Self) -> bool {
        self.first_fit(rect, |candidate| self.is_rect_free_masked(candidate, other))
    }

    /// Mark every cell of `rect` occupied
    ///
    /// Cells already occupied stay occupied; conflicts are not reported.
    pub fn alloc(&mut self, rect: Rect) {
        self.debug_check_rect(rect);
        if rect.is_empty() {
            return;
        }

        for y in rect.y..rect.bottom() {
            let row = self.row_start(y);
            for (word, mask) in span_words(rect.x, rect.right()) {
                self.bits[row + word] |= mask;
            }
        }
    }

    /// Mark occupied the cells of `rect` that `other` marks occupied
    pub fn alloc_masked(&mut self, rect: Rect, other: &Self) {
        self.debug_check_rect(rect);
        other.debug_check_mask(rect);

        for dy in 0..rect.h {
            for dx in 0..rect.w {
                if other.get_bit(dx, dy) {
                    self.set_bit(rect.x + dx, rect.y + dy);
                }
            }
        }
    }

    /// Mark every cell of `rect` free
    pub fn free(&mut self, rect: Rect) {
        self.debug_check_rect(rect);
        if rect.is_empty() {
            return;
        }

        for y in rect.y..rect.bottom() {
            let row = self.row_start(y);
            for (word, mask) in span_words(rect.x, rect.right()) {
                self.bits[row + word] &= !mask;
            }
        }
    }

    /// Mark free the cells of `rect` that `other` marks occupied
    pub fn free_masked(&mut self, rect: Rect, other: &Self) {
        self.debug_check_rect(rect);
        other.debug_check_mask(rect);

        for dy in 0..rect.h {
            for dx in 0..rect.w {
                if other.get_bit(dx, dy) {
                    self.clear_bit(rect.x + dx, rect.y + dy);
                }
            }
        }
    }

    /// Mirror the cells of `rect` left to right
    pub fn flip_x(&mut self, rect: Rect) {
        self.debug_check_rect(rect);

        for y in rect.y..rect.bottom() {
            for i in 0..rect.w / 2 {
                let left = rect.x + i;
                let right = rect.right() - 1 - i;
                self.swap_cells((left, y), (right, y));
            }
        }
    }

    /// Mirror the cells of `rect` top to bottom
    pub fn flip_y(&mut self, rect: Rect) {
        self.debug_check_rect(rect);

        for i in 0..rect.h / 2 {
            let top = rect.y + i;
            let bottom = rect.bottom() - 1 - i;
            for x in rect.x..rect.right() {
                self.swap_cells((x, top), (x, bottom));
            }
        }
    }

    fn first_fit(&self, rect: &mut Rect, mut test: impl FnMut(Rect) -> bool) -> bool {
        if rect.w > self.width || rect.h > self.height {
            log::trace!(
                "{}x{} request exceeds {}x{} grid",
                rect.w,
                rect.h,
                self.width,
                self.height
            );
            return false;
        }

        let max_x = self.width - rect.w;
        let max_y = self.height - rect.h;

        for x in 0..=max_x {
            for y in 0..=max_y {
                let candidate = rect.at(x, y);
                if test(candidate) {
                    *rect = candidate;
                    return true;
                }
            }
        }
        false
    }

    fn swap_cells(&mut self, a: (u32, u32), b: (u32, u32)) {
        let bit_a = self.get_bit(a.0, a.1);
        let bit_b = self.get_bit(b.0, b.1);
        if bit_a != bit_b {
            self.put_bit(a.0, a.1, bit_b);
            self.put_bit(b.0, b.1, bit_a);
        }
    }

    fn put_bit(&mut self, x: u32, y: u32, occupied: bool) {
        if occupied {
            self.set_bit(x, y);
        } else {
            self.clear_bit(x, y);
        }
    }

    fn row_start(&self, y: u32) -> usize {
        y as usize * self.pitch as usize
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u64) {
        debug_assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        (self.row_start(y) + (x / WORD_BITS) as usize, 1 << (x % WORD_BITS))
    }

    fn debug_check_rect(&self, rect: Rect) {
        debug_assert!(
            rect.fits_within(self.width, self.height),
            "{rect:?} outside {}x{} grid",
            self.width,
            self.height
        );
    }

    fn debug_check_mask(&self, rect: Rect) {
        debug_assert!(
            rect.w <= self.width && rect.h <= self.height,
            "{}x{} mask smaller than {}x{} rect",
            self.width,
            self.height,
            rect.w,
            rect.h
        );
    }
}

impl fmt::Display for BitmapRectAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.get_bit(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Word offsets and bit masks covering columns `[x0, x1)` of one row
///
/// Requires `x0 < x1`.
fn span_words(x0: u32, x1: u32) -> impl Iterator<Item = (usize, u64)> {
    let first = x0 / WORD_BITS;
    let last = (x1 - 1) / WORD_BITS;

    (first..=last).map(move |word| {
        let base = word * WORD_BITS;
        let lo = x0.max(base) - base;
        let hi = x1.min(base + WORD_BITS) - base;
        let run = hi - lo;
        let mask = if run == WORD_BITS { u64::MAX } else { ((1 << run) - 1) << lo };
        (word as usize, mask)
    })
}
