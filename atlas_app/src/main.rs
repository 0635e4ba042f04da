//! Atlas packing demo
//!
//! Packs a reproducible batch of triangle-shaped UV charts and sprite
//! rectangles into an atlas, then prints every page as ASCII
//! (`#` occupied, `.` free).
//!
//! Usage: `pack_demo [atlas.toml | atlas.ron]`

use std::path::PathBuf;

use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use raster_atlas::foundation::logging;
use raster_atlas::prelude::*;

const SEED: u64 = 0x5EED;
const CHART_COUNT: usize = 6;
const SPRITE_COUNT: usize = 40;

/// Right-triangle chart filling the upper-left half of a `size × size` box
fn triangle_chart(size: u32) -> BitmapRectAllocator {
    let extent = size as f32;
    rasterize_chart(
        size,
        size,
        &[[Vector2::new(0.0, 0.0), Vector2::new(extent, 0.0), Vector2::new(0.0, extent)]],
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AtlasConfig::load_or_default(config_path.as_deref())?;
    log::info!(
        "Packing into {}x{} pages (max {}, padding {})",
        config.page_width,
        config.page_height,
        config.max_pages,
        config.padding
    );

    let mut packer = AtlasPacker::new(config)?;
    let mut rng = StdRng::seed_from_u64(SEED);

    for i in 0..CHART_COUNT {
        let size = rng.gen_range(4..=10);
        let mut chart = triangle_chart(size);

        // Every other chart is rotated half a turn so pairs can interlock
        if i % 2 == 1 {
            chart.flip_x(Rect::sized(size, size));
            chart.flip_y(Rect::sized(size, size));
        }

        match packer.pack_masked(chart) {
            Ok(handle) => {
                if let Some(placement) = packer.placement(handle) {
                    log::info!(
                        "Chart {} ({}x{}) -> page {} at ({}, {})",
                        i,
                        size,
                        size,
                        placement.page,
                        placement.rect.x,
                        placement.rect.y
                    );
                }
            }
            Err(err) => log::warn!("Chart {} skipped: {}", i, err),
        }
    }

    let mut placed = 0;
    let mut rejected = 0;
    for _ in 0..SPRITE_COUNT {
        let (width, height) = (rng.gen_range(2..=12), rng.gen_range(2..=8));
        match packer.pack(width, height) {
            Ok(_) => placed += 1,
            Err(err @ (AtlasError::PageLimitReached(_) | AtlasError::ItemTooLarge { .. })) => {
                log::debug!("Sprite {}x{} rejected: {}", width, height, err);
                rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    log::info!("Packed {} sprites, {} did not fit", placed, rejected);

    for page in packer.pages() {
        println!(
            "Page {} ({} items, {:.1}% used)",
            page.index(),
            page.item_count(),
            page.utilization() * 100.0
        );
        println!("{}", page.allocator());
    }

    Ok(())
}
