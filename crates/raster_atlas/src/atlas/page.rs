//! Single atlas page

use crate::allocator::BitmapRectAllocator;

/// One fixed-size page of an atlas
#[derive(Debug, Clone)]
pub struct AtlasPage {
    index: usize,
    allocator: BitmapRectAllocator,
    item_count: usize,
}

impl AtlasPage {
    pub(super) fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            allocator: BitmapRectAllocator::new(width, height),
            item_count: 0,
        }
    }

    /// Position of this page in the atlas
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Occupancy of this page
    pub const fn allocator(&self) -> &BitmapRectAllocator {
        &self.allocator
    }

    pub(super) fn allocator_mut(&mut self) -> &mut BitmapRectAllocator {
        &mut self.allocator
    }

    /// Number of items currently placed on this page
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    pub(super) fn add_item(&mut self) {
        self.item_count += 1;
    }

    pub(super) fn remove_item(&mut self) {
        self.item_count = self.item_count.saturating_sub(1);
    }

    pub(super) fn clear(&mut self) {
        self.allocator.clear();
        self.item_count = 0;
    }

    /// Fraction of cells reserved, in `[0, 1]`
    pub fn utilization(&self) -> f32 {
        let total = u64::from(self.allocator.width()) * u64::from(self.allocator.height());
        self.allocator.occupied_count() as f32 / total as f32
    }
}
