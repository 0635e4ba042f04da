//! Atlas packing configuration

use serde::{Deserialize, Serialize};

use super::Config;

/// Settings for an [`AtlasPacker`](crate::atlas::AtlasPacker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Width of every page in cells (texels)
    pub page_width: u32,
    /// Height of every page in cells (texels)
    pub page_height: u32,
    /// Maximum number of pages the packer may open
    pub max_pages: usize,
    /// Gutter cells reserved to the right of and below every item
    pub padding: u32,
}

impl AtlasConfig {
    /// Create a configuration for `page_width × page_height` pages
    pub fn new(page_width: u32, page_height: u32) -> Self {
        Self {
            page_width,
            page_height,
            ..Self::default()
        }
    }

    /// Set the page limit
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the gutter around items
    #[must_use]
    pub const fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Check the settings describe a usable atlas
    pub fn validate(&self) -> Result<(), String> {
        if self.page_width == 0 || self.page_height == 0 {
            return Err(format!(
                "Page dimensions must be non-zero, got {}x{}",
                self.page_width, self.page_height
            ));
        }
        if self.max_pages == 0 {
            return Err("At least one page must be allowed".to_string());
        }
        if self.padding >= self.page_width || self.padding >= self.page_height {
            return Err(format!(
                "Padding {} leaves no room on {}x{} pages",
                self.padding, self.page_width, self.page_height
            ));
        }
        Ok(())
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            page_width: 1024,
            page_height: 1024,
            max_pages: 4,
            padding: 0,
        }
    }
}

impl Config for AtlasConfig {}
