//! Construction parameters.

use crate::error::{Error, Result};

/// Deepest directory the table can address: `1 << depth` must fit in `usize`.
pub const MAX_SUPPORTED_DEPTH: u32 = usize::BITS - 1;

/// Default cap on directory growth (a directory of one million slots).
pub const DEFAULT_MAX_GLOBAL_DEPTH: u32 = 20;

/// Configuration for an [`ExtendibleHashTable`](crate::ExtendibleHashTable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Global depth of the directory at construction. The directory starts
    /// with `2^initial_global_depth` slots, each owning its own empty bucket.
    pub initial_global_depth: u32,
    /// Maximum number of values a bucket holds before it must split.
    pub bucket_capacity: usize,
    /// Global depth the directory may never exceed.
    ///
    /// Values that agree on every low-order bit up to this depth cannot be
    /// separated; inserting more of them than a bucket holds fails with
    /// [`Error::DepthLimit`] instead of doubling the directory forever.
    pub max_global_depth: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_global_depth: 0,
            bucket_capacity: 4,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH,
        }
    }
}

impl TableConfig {
    /// Config with the given depth and capacity and the default depth limit.
    pub fn new(initial_global_depth: u32, bucket_capacity: usize) -> Self {
        Self {
            initial_global_depth,
            bucket_capacity,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH.max(initial_global_depth),
        }
    }

    /// Builder-style override of [`TableConfig::max_global_depth`].
    pub fn max_global_depth(mut self, depth: u32) -> Self {
        self.max_global_depth = depth;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(Error::invalid_config("bucket capacity must be at least 1"));
        }
        if self.max_global_depth > MAX_SUPPORTED_DEPTH {
            return Err(Error::invalid_config(format!(
                "max global depth {} exceeds the supported {}",
                self.max_global_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        if self.initial_global_depth > self.max_global_depth {
            return Err(Error::invalid_config(format!(
                "initial global depth {} exceeds max global depth {}",
                self.initial_global_depth, self.max_global_depth
            )));
        }
        Ok(())
    }
}
