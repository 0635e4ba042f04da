//! Rasterization into occupancy bitmaps
//!
//! UV charts are irregular, so packing them with rectangles wastes space.
//! Instead each chart's triangles are rasterized into a small
//! [`BitmapRectAllocator`] whose set cells form a shape mask, which is then
//! placed with [`BitmapRectAllocator::find_masked`] and committed with
//! [`BitmapRectAllocator::alloc_masked`].

mod triangle;

pub use triangle::TriangleRasterizer;

use nalgebra::Vector2;

use crate::allocator::BitmapRectAllocator;

/// Receives the cells covered by a rasterized primitive
pub trait CellSink {
    /// Handle one covered cell
    fn process(&mut self, x: u32, y: u32);
}

impl CellSink for BitmapRectAllocator {
    fn process(&mut self, x: u32, y: u32) {
        self.set_bit(x, y);
    }
}

impl CellSink for Vec<(u32, u32)> {
    fn process(&mut self, x: u32, y: u32) {
        self.push((x, y));
    }
}

/// Rasterize a chart's triangles into a `width × height` shape mask
///
/// Vertices are in cell units with the mask's top-left corner at the origin.
/// Coverage outside the mask is clipped.
pub fn rasterize_chart(
    width: u32,
    height: u32,
    triangles: &[[Vector2<f32>; 3]],
) -> BitmapRectAllocator {
    let mut mask = BitmapRectAllocator::new(width, height);
    let rasterizer = TriangleRasterizer::new(width, height);

    for triangle in triangles {
        rasterizer.draw(triangle, &mut mask);
    }

    log::trace!(
        "Rasterized {} triangles into {}x{} mask ({} cells)",
        triangles.len(),
        width,
        height,
        mask.occupied_count()
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_chart_fills_mask() {
        let quad = [
            [Vector2::new(0.0, 0.0), Vector2::new(4.0, 0.0), Vector2::new(4.0, 3.0)],
            [Vector2::new(0.0, 0.0), Vector2::new(4.0, 3.0), Vector2::new(0.0, 3.0)],
        ];
        let mask = rasterize_chart(4, 3, &quad);
        assert_eq!(mask.occupied_count(), 12);
    }

    #[test]
    fn test_chart_mask_packs_against_complement() {
        // Lower-left half of a 4x4 block
        let lower = [[Vector2::new(0.0, 0.0), Vector2::new(4.0, 4.0), Vector2::new(0.0, 4.0)]];
        let mask = rasterize_chart(4, 4, &lower);

        // Everything the mask leaves free is already taken
        let mut page = BitmapRectAllocator::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                if !mask.get_bit(x, y) {
                    page.set_bit(x, y);
                }
            }
        }
        assert_eq!(page.occupied_count(), 6);

        let mut rect = crate::allocator::Rect::sized(4, 4);
        assert!(page.find_masked(&mut rect, &mask));
        page.alloc_masked(rect, &mask);
        assert_eq!(page.occupied_count(), 16);
    }
}
