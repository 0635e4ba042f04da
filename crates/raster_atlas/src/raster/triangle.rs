//! Edge-function triangle rasterizer

use nalgebra::Vector2;

use super::CellSink;

/// Scans triangles over a clipped `width × height` cell grid
///
/// A cell is covered when its center `(x + 0.5, y + 0.5)` lies inside the
/// triangle or on one of its edges. Either winding is accepted and
/// zero-area triangles cover nothing.
#[derive(Debug, Clone, Copy)]
pub struct TriangleRasterizer {
    width: u32,
    height: u32,
}

impl TriangleRasterizer {
    /// Create a rasterizer clipping to `[0, width) × [0, height)`
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Send every covered cell of `triangle` to `sink`
    pub fn draw<S: CellSink + ?Sized>(&self, triangle: &[Vector2<f32>; 3], sink: &mut S) {
        let [a, b, c] = triangle;

        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            return;
        }
        let (b, c) = if area < 0.0 { (c, b) } else { (b, c) };

        let (x0, x1) = cell_span(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x), self.width);
        let (y0, y1) = cell_span(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y), self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                if edge(a, b, &center) >= 0.0
                    && edge(b, c, &center) >= 0.0
                    && edge(c, a, &center) >= 0.0
                {
                    sink.process(x, y);
                }
            }
        }
    }
}

/// Signed doubled area of `(a, b, p)`; positive when `p` is left of `a -> b`
fn edge(a: &Vector2<f32>, b: &Vector2<f32>, p: &Vector2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Cells whose centers fall in `[min, max]`, clipped to `[0, limit)`
#[allow(clippy::cast_sign_loss)]
fn cell_span(min: f32, max: f32, limit: u32) -> (u32, u32) {
    let first = (min - 0.5).ceil().max(0.0);
    let end = ((max - 0.5).floor() + 1.0).clamp(0.0, limit as f32);
    (first as u32, end as u32)
}
