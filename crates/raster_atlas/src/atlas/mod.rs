//! Multi-page atlas packing
//!
//! An atlas is a list of fixed-size pages, each backed by its own
//! [`BitmapRectAllocator`](crate::allocator::BitmapRectAllocator). Items are
//! placed on the first page with room, in page creation order, and a new page
//! is opened only when none of the existing ones fit.

mod packer;
mod page;

pub use packer::{AtlasPacker, AtlasPlacement};
pub use page::AtlasPage;

/// Errors that can occur while packing an atlas
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    /// Item covers no cells
    #[error("Item has zero area")]
    EmptyItem,

    /// Item is larger than a whole page
    #[error("{width}x{height} item can never fit a {page_width}x{page_height} page")]
    ItemTooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Configured page width
        page_width: u32,
        /// Configured page height
        page_height: u32,
    },

    /// Every allowed page is open and none has room
    #[error("All {0} atlas pages are full")]
    PageLimitReached(usize),

    /// Configuration failed validation
    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(String),
}
