//! Page-replacement simulation engine.
//!
//! An [`mmu::Mmu`] replays [`trace::AddressEvent`]s against a fixed-size
//! [`page_table::PageTable`], asking a [`page_replacer::PageReplacer`] for a
//! victim whenever a fault hits a full table, and counts the backing-store
//! reads and writes that policy would cost.

pub mod address;
pub mod error;
pub mod eviction_list;
pub mod mmu;
pub mod page_replacer;
pub mod page_table;
pub mod policy;
pub mod trace;

pub use error::{Error, Result};
