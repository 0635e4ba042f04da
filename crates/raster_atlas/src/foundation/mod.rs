//! Foundation module - Core utilities shared by the allocator and the packer
//!
//! - Logging setup
//! - Handle collections

pub mod collections;
pub mod logging;
