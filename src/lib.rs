//! # extendible-hash
//!
//! An in-memory extendible hash index over `i64` values.
//!
//! A directory of `2^global_depth` slots routes each value by its low-order
//! bits to a bucket of bounded capacity. When a bucket fills up only that
//! bucket is split; the directory doubles only when the bucket is already as
//! deep as the directory. Existing entries are never rehashed wholesale.
//!
//! Based on "Extendible Hashing: A Fast Access Method for Dynamic Files"
//! (Fagin, Nievergelt, Pippenger, Strong; TODS 1979).
//!
//! ## Example
//!
//! ```rust
//! use extendible_hash::ExtendibleHashTable;
//!
//! let mut table = ExtendibleHashTable::new(2, 2)?;
//! for v in [10, 22, 5, 3, 8, 15] {
//!     table.insert(v)?;
//! }
//!
//! assert!(table.find(10));
//! table.remove(10);
//! assert!(!table.find(10));
//! assert!(table.directory_len().is_power_of_two());
//! # Ok::<(), extendible_hash::Error>(())
//! ```

#![warn(clippy::all)]

pub mod bucket;
pub mod config;
pub mod error;
pub mod table;

pub use bucket::Bucket;
pub use config::{TableConfig, DEFAULT_MAX_GLOBAL_DEPTH, MAX_SUPPORTED_DEPTH};
pub use error::{Error, Result};
pub use table::{BucketId, ExtendibleHashTable, SlotSnapshot};

#[cfg(test)]
mod proptests;
