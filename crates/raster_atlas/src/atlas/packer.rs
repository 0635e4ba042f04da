//! Atlas packer built on bitmap allocators

use serde::{Deserialize, Serialize};

use super::{AtlasError, AtlasPage};
use crate::allocator::{BitmapRectAllocator, Rect};
use crate::config::AtlasConfig;
use crate::foundation::collections::{AtlasHandle, AtlasMap};

/// Where an item ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasPlacement {
    /// Page index
    pub page: usize,
    /// Item rectangle on the page, without padding
    pub rect: Rect,
}

/// Shape reserved for an item on its page
#[derive(Debug, Clone)]
enum Footprint {
    /// Every cell of the item plus a gutter to the right and below
    Solid {
        /// Gutter width in cells
        padding: u32,
    },
    /// Only the cells the mask marks occupied
    Masked(BitmapRectAllocator),
}

impl Footprint {
    /// First-fit position for a `width × height` item, as the rect to reserve
    fn find(&self, page: &BitmapRectAllocator, width: u32, height: u32) -> Option<Rect> {
        let mut rect = Rect::sized(width, height);
        match self {
            Self::Solid { padding: 0 } => page.find(&mut rect).then_some(rect),
            Self::Solid { padding } => padded_first_fit(page, width, height, *padding),
            Self::Masked(mask) => page.find_masked(&mut rect, mask).then_some(rect),
        }
    }

    fn alloc(&self, page: &mut BitmapRectAllocator, rect: Rect) {
        match self {
            Self::Solid { .. } => page.alloc(rect),
            Self::Masked(mask) => page.alloc_masked(rect, mask),
        }
    }

    fn free(&self, page: &mut BitmapRectAllocator, rect: Rect) {
        match self {
            Self::Solid { .. } => page.free(rect),
            Self::Masked(mask) => page.free_masked(rect, mask),
        }
    }
}

/// Column-major first fit where the gutter is cut off at the page edge
///
/// Scans the same positions as [`BitmapRectAllocator::find`] for the bare
/// item, so an item may sit flush against the right or bottom edge.
fn padded_first_fit(
    page: &BitmapRectAllocator,
    width: u32,
    height: u32,
    padding: u32,
) -> Option<Rect> {
    if width > page.width() || height > page.height() {
        return None;
    }

    for x in 0..=page.width() - width {
        for y in 0..=page.height() - height {
            let reserved = Rect::new(
                x,
                y,
                width.saturating_add(padding).min(page.width() - x),
                height.saturating_add(padding).min(page.height() - y),
            );
            if page.is_rect_free(reserved) {
                return Some(reserved);
            }
        }
    }
    None
}

#[derive(Debug, Clone)]
struct PackedItem {
    page: usize,
    reserved: Rect,
    width: u32,
    height: u32,
    footprint: Footprint,
}

impl PackedItem {
    const fn placement(&self) -> AtlasPlacement {
        AtlasPlacement {
            page: self.page,
            rect: Rect::new(self.reserved.x, self.reserved.y, self.width, self.height),
        }
    }
}

/// Packs rectangles and shape masks into fixed-size pages
///
/// Placement is first-fit: pages are tried in creation order and each page
/// is scanned column-major, so identical call sequences give identical
/// layouts. Callers sharing a packer across threads must lock around it.
#[derive(Debug)]
pub struct AtlasPacker {
    config: AtlasConfig,
    pages: Vec<AtlasPage>,
    items: AtlasMap<PackedItem>,
}

impl AtlasPacker {
    /// Create an empty packer
    pub fn new(config: AtlasConfig) -> Result<Self, AtlasError> {
        config.validate().map_err(AtlasError::InvalidConfig)?;

        log::debug!(
            "Created atlas packer: {}x{} pages, max {}, padding {}",
            config.page_width,
            config.page_height,
            config.max_pages,
            config.padding
        );
        Ok(Self {
            config,
            pages: Vec::new(),
            items: AtlasMap::with_key(),
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Open pages, in creation order
    pub fn pages(&self) -> &[AtlasPage] {
        &self.pages
    }

    /// Number of open pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of items currently packed
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Place a `width × height` rectangle
    ///
    /// `padding` extra cells are reserved to the right and below. The gutter
    /// stops at the page edge, so items may sit flush against it.
    pub fn pack(&mut self, width: u32, height: u32) -> Result<AtlasHandle, AtlasError> {
        if width == 0 || height == 0 {
            return Err(AtlasError::EmptyItem);
        }
        self.check_size(width, height)?;

        let padding = self.config.padding;
        self.insert(width, height, Footprint::Solid { padding })
    }

    /// Place an irregular shape given as an occupancy mask
    ///
    /// Only the mask's occupied cells are reserved, so shapes may interlock.
    /// Padding is not applied; rasterize the gutter into the mask instead.
    pub fn pack_masked(&mut self, mask: BitmapRectAllocator) -> Result<AtlasHandle, AtlasError> {
        if mask.occupied_count() == 0 {
            return Err(AtlasError::EmptyItem);
        }
        let (width, height) = (mask.width(), mask.height());
        self.check_size(width, height)?;

        self.insert(width, height, Footprint::Masked(mask))
    }

    /// Look up where an item was placed
    pub fn placement(&self, handle: AtlasHandle) -> Option<AtlasPlacement> {
        self.items.get(handle).map(PackedItem::placement)
    }

    /// Release an item's cells so later items can reuse them
    pub fn remove(&mut self, handle: AtlasHandle) -> Option<AtlasPlacement> {
        let item = self.items.remove(handle)?;
        let page = &mut self.pages[item.page];
        item.footprint.free(page.allocator_mut(), item.reserved);
        page.remove_item();

        log::trace!("Removed item from page {} at {:?}", item.page, item.reserved);
        Some(item.placement())
    }

    /// Clear every page and forget every item
    ///
    /// Pages stay open; outstanding handles become stale.
    pub fn reset(&mut self) {
        for page in &mut self.pages {
            page.clear();
        }
        self.items.clear();
        log::debug!("Reset atlas with {} pages", self.pages.len());
    }

    fn check_size(&self, width: u32, height: u32) -> Result<(), AtlasError> {
        if width > self.config.page_width || height > self.config.page_height {
            return Err(AtlasError::ItemTooLarge {
                width,
                height,
                page_width: self.config.page_width,
                page_height: self.config.page_height,
            });
        }
        Ok(())
    }

    fn insert(
        &mut self,
        width: u32,
        height: u32,
        footprint: Footprint,
    ) -> Result<AtlasHandle, AtlasError> {
        let found = self.pages.iter().enumerate().find_map(|(index, page)| {
            footprint
                .find(page.allocator(), width, height)
                .map(|reserved| (index, reserved))
        });
        let (page_index, reserved) = match found {
            Some(found) => found,
            None => self.open_page(&footprint, width, height)?,
        };

        let page = &mut self.pages[page_index];
        footprint.alloc(page.allocator_mut(), reserved);
        page.add_item();

        log::trace!(
            "Placed {}x{} item on page {} at ({}, {})",
            width,
            height,
            page_index,
            reserved.x,
            reserved.y
        );
        Ok(self.items.insert(PackedItem {
            page: page_index,
            reserved,
            width,
            height,
            footprint,
        }))
    }

    fn open_page(
        &mut self,
        footprint: &Footprint,
        width: u32,
        height: u32,
    ) -> Result<(usize, Rect), AtlasError> {
        if self.pages.len() >= self.config.max_pages {
            log::warn!(
                "Atlas full: no room for {}x{} item in {} pages",
                width,
                height,
                self.pages.len()
            );
            return Err(AtlasError::PageLimitReached(self.config.max_pages));
        }

        let index = self.pages.len();
        let page = AtlasPage::new(index, self.config.page_width, self.config.page_height);
        let reserved = footprint
            .find(page.allocator(), width, height)
            .ok_or(AtlasError::ItemTooLarge {
                width,
                height,
                page_width: self.config.page_width,
                page_height: self.config.page_height,
            })?;

        self.pages.push(page);
        log::debug!("Opened atlas page {}", index);
        Ok((index, reserved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn packer(width: u32, height: u32, max_pages: usize) -> AtlasPacker {
        AtlasPacker::new(AtlasConfig::new(width, height).with_max_pages(max_pages)).unwrap()
    }

    fn position(packer: &AtlasPacker, handle: AtlasHandle) -> (usize, u32, u32) {
        let placement = packer.placement(handle).unwrap();
        (placement.page, placement.rect.x, placement.rect.y)
    }

    /// Upper-left (`upper = true`) or strict lower-right triangle of a square
    fn triangle_mask(size: u32, upper: bool) -> BitmapRectAllocator {
        let mut mask = BitmapRectAllocator::new(size, size);
        for y in 0..size {
            for x in 0..size {
                if (x + y < size) == upper {
                    mask.set_bit(x, y);
                }
            }
        }
        mask
    }

    #[test]
    fn test_fills_page_column_major_then_opens_next() {
        let mut packer = packer(4, 4, 2);
        let handles: Vec<_> = (0..5).map(|_| packer.pack(2, 2).unwrap()).collect();

        let positions: Vec<_> = handles.iter().map(|&h| position(&packer, h)).collect();
        assert_eq!(positions, vec![(0, 0, 0), (0, 0, 2), (0, 2, 0), (0, 2, 2), (1, 0, 0)]);
        assert_eq!(packer.page_count(), 2);
        assert_eq!(packer.pages()[0].item_count(), 4);
        assert_eq!(packer.item_count(), 5);
    }

    #[test]
    fn test_earlier_pages_are_reused_first() {
        let mut packer = packer(4, 4, 2);
        packer.pack(4, 3).unwrap();
        packer.pack(4, 4).unwrap();

        // Fits in the leftover row of page 0
        let handle = packer.pack(4, 1).unwrap();
        assert_eq!(position(&packer, handle), (0, 0, 3));
    }

    #[test]
    fn test_page_limit() {
        let mut packer = packer(4, 4, 1);
        packer.pack(4, 4).unwrap();

        assert_eq!(packer.pack(1, 1), Err(AtlasError::PageLimitReached(1)));
        assert_eq!(packer.page_count(), 1);
    }

    #[test]
    fn test_rejects_empty_and_oversized_items() {
        let mut packer = packer(8, 8, 4);

        assert_eq!(packer.pack(0, 3), Err(AtlasError::EmptyItem));
        assert_eq!(
            packer.pack(9, 2),
            Err(AtlasError::ItemTooLarge {
                width: 9,
                height: 2,
                page_width: 8,
                page_height: 8,
            })
        );
        assert!(matches!(
            packer.pack_masked(BitmapRectAllocator::new(3, 3)),
            Err(AtlasError::EmptyItem)
        ));
        assert!(matches!(
            packer.pack_masked(triangle_mask(9, true)),
            Err(AtlasError::ItemTooLarge { .. })
        ));
        assert_eq!(packer.page_count(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let result = AtlasPacker::new(AtlasConfig::new(0, 16));
        assert!(matches!(result, Err(AtlasError::InvalidConfig(_))));
    }

    #[test]
    fn test_padding_reserves_gutter() {
        let config = AtlasConfig::new(8, 8).with_max_pages(1).with_padding(1);
        let mut packer = AtlasPacker::new(config).unwrap();

        let handles: Vec<_> = (0..4).map(|_| packer.pack(3, 3).unwrap()).collect();
        let positions: Vec<_> = handles.iter().map(|&h| position(&packer, h)).collect();
        assert_eq!(positions, vec![(0, 0, 0), (0, 0, 4), (0, 4, 0), (0, 4, 4)]);

        // Reported rect excludes the gutter
        assert_eq!(packer.placement(handles[0]).unwrap().rect, Rect::new(0, 0, 3, 3));
        assert_eq!(packer.pages()[0].allocator().occupied_count(), 64);
    }

    #[test]
    fn test_padding_is_clamped_to_page() {
        let config = AtlasConfig::new(8, 8).with_padding(2);
        let mut packer = AtlasPacker::new(config).unwrap();

        let handle = packer.pack(8, 7).unwrap();
        assert_eq!(packer.placement(handle).unwrap().rect, Rect::new(0, 0, 8, 7));
    }

    #[test]
    fn test_gutter_stops_at_page_edge() {
        // 4 + gutter + 4 fills a 9-wide page exactly
        let config = AtlasConfig::new(9, 4).with_max_pages(1).with_padding(1);
        let mut packer = AtlasPacker::new(config).unwrap();

        let left = packer.pack(4, 4).unwrap();
        let right = packer.pack(4, 4).unwrap();
        assert_eq!(position(&packer, left), (0, 0, 0));
        assert_eq!(position(&packer, right), (0, 5, 0));
        assert_eq!(packer.page_count(), 1);
        assert_eq!(packer.pages()[0].allocator().occupied_count(), 36);

        // Freeing the flush item releases only cells inside the page
        packer.remove(right).unwrap();
        assert_eq!(packer.pages()[0].allocator().occupied_count(), 20);
    }

    #[test]
    fn test_gutter_keeps_items_apart() {
        let config = AtlasConfig::new(8, 4).with_max_pages(1).with_padding(1);
        let mut packer = AtlasPacker::new(config).unwrap();

        packer.pack(4, 4).unwrap();
        assert_eq!(packer.pack(4, 4), Err(AtlasError::PageLimitReached(1)));

        // Three columns stay free to the right of the gutter
        let narrow = packer.pack(3, 4).unwrap();
        assert_eq!(position(&packer, narrow), (0, 5, 0));
    }

    #[test]
    fn test_remove_frees_space_for_reuse() {
        let mut packer = packer(4, 4, 1);
        let first = packer.pack(2, 2).unwrap();
        let second = packer.pack(2, 2).unwrap();
        packer.pack(2, 4).unwrap();

        let removed = packer.remove(first).unwrap();
        assert_eq!(removed.rect, Rect::new(0, 0, 2, 2));
        assert_eq!(packer.placement(first), None);
        assert_eq!(packer.remove(first), None);
        assert_eq!(packer.pages()[0].item_count(), 2);

        let reused = packer.pack(2, 2).unwrap();
        assert_eq!(position(&packer, reused), (0, 0, 0));
        assert_eq!(position(&packer, second), (0, 0, 2));
    }

    #[test]
    fn test_masked_shapes_interlock() {
        let mut packer = packer(4, 4, 1);
        let upper = packer.pack_masked(triangle_mask(4, true)).unwrap();
        let lower = packer.pack_masked(triangle_mask(4, false)).unwrap();

        assert_eq!(position(&packer, upper), (0, 0, 0));
        assert_eq!(position(&packer, lower), (0, 0, 0));
        assert_eq!(packer.pages()[0].allocator().occupied_count(), 16);

        // Removing one half frees exactly its cells
        packer.remove(lower).unwrap();
        assert_eq!(packer.pages()[0].allocator().occupied_count(), 10);
    }

    #[test]
    fn test_utilization() {
        let mut packer = packer(10, 10, 1);
        packer.pack(5, 5).unwrap();
        assert_relative_eq!(packer.pages()[0].utilization(), 0.25);

        packer.pack(5, 10).unwrap();
        assert_relative_eq!(packer.pages()[0].utilization(), 0.75);
    }

    #[test]
    fn test_reset_keeps_pages_and_drops_items() {
        let mut packer = packer(4, 4, 2);
        let handle = packer.pack(4, 4).unwrap();
        packer.pack(4, 4).unwrap();

        packer.reset();
        assert_eq!(packer.page_count(), 2);
        assert_eq!(packer.item_count(), 0);
        assert_eq!(packer.placement(handle), None);
        assert!(packer.pages().iter().all(|page| page.allocator().occupied_count() == 0));

        let handle = packer.pack(4, 4).unwrap();
        assert_eq!(position(&packer, handle), (0, 0, 0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let sizes = [(3, 5), (7, 2), (4, 4), (1, 9), (6, 6), (2, 3), (5, 1)];
        let run = || {
            let mut packer = packer(12, 12, 3);
            sizes
                .iter()
                .map(|&(w, h)| {
                    let handle = packer.pack(w, h).unwrap();
                    packer.placement(handle).unwrap()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
