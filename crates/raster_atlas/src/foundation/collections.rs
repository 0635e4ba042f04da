//! Handle-based collections

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to an item packed into an atlas
    pub struct AtlasHandle;
}

/// Map from atlas handles to per-item data
pub type AtlasMap<T> = SlotMap<AtlasHandle, T>;
