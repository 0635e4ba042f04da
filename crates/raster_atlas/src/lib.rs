//! # Raster Atlas
//!
//! Bitmap-backed 2D rectangle allocation for texture atlases and UV-chart
//! layout.
//!
//! ## Features
//!
//! - **Occupancy Bitmap**: One bit per cell, packed into 64-bit words
//! - **First-Fit Search**: Deterministic column-major placement
//! - **Masked Placement**: Irregular shapes stamped through an occupancy mask
//! - **Chart Rasterization**: Triangle footprints turned into shape masks
//! - **Multi-Page Atlases**: Pages opened on demand, handle-based removal
//!
//! ## Quick Start
//!
//! ```rust
//! use raster_atlas::prelude::*;
//!
//! let mut allocator = BitmapRectAllocator::new(8, 8);
//! allocator.alloc(Rect::new(0, 0, 3, 8));
//!
//! let mut rect = Rect::sized(3, 3);
//! assert!(allocator.find(&mut rect));
//! assert_eq!((rect.x, rect.y), (3, 0));
//! allocator.alloc(rect);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod allocator;
pub mod atlas;
pub mod config;
pub mod foundation;
pub mod raster;

/// Common imports for allocator users
pub mod prelude {
    pub use crate::{
        allocator::{BitmapRectAllocator, Rect},
        atlas::{AtlasError, AtlasPacker, AtlasPage, AtlasPlacement},
        config::{AtlasConfig, Config, ConfigError},
        foundation::collections::AtlasHandle,
        raster::{rasterize_chart, CellSink, TriangleRasterizer},
    };
}
