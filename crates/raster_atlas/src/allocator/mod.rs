//! 2D rectangle allocation over occupancy bitmaps
//!
//! [`BitmapRectAllocator`] tracks which cells of a fixed grid are taken and
//! finds room for new rectangles with a deterministic first-fit scan.

mod bitmap;
mod rect;

pub use bitmap::BitmapRectAllocator;
pub use rect::Rect;
