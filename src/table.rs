//! The directory and the insert / expand / split / find / remove algorithms.

use std::fmt;

use crate::bucket::Bucket;
use crate::config::TableConfig;
use crate::error::{Error, Result};

/// Handle of a bucket in the table's bucket arena.
///
/// Several directory slots hold the same handle when the bucket's local depth
/// is below the global depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketId(usize);

impl BucketId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// One directory slot as reported by [`ExtendibleHashTable::dump`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSnapshot {
    /// Directory slot index.
    pub slot: usize,
    /// Local depth of the bucket the slot points to.
    pub local_depth: u32,
    /// Values in that bucket, in bucket order.
    pub values: Vec<i64>,
}

/// An extendible hash index over `i64` values.
///
/// The directory has `2^global_depth` slots. A value lives in the bucket
/// addressed by its low `global_depth` bits (two's complement). Full buckets
/// are split on their next bit; the directory doubles only when the bucket
/// being split is already as deep as the directory.
///
/// Buckets are never merged and the directory never shrinks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendibleHashTable {
    global_depth: u32,
    max_global_depth: u32,
    bucket_capacity: usize,
    /// `directory[slot]` is the bucket for every value whose low bits equal `slot`.
    directory: Vec<BucketId>,
    /// Bucket arena; buckets are only ever appended.
    buckets: Vec<Bucket>,
    count: usize,
}

impl ExtendibleHashTable {
    /// Creates a table with `2^initial_global_depth` empty buckets holding up
    /// to `bucket_capacity` values each.
    pub fn new(initial_global_depth: u32, bucket_capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(initial_global_depth, bucket_capacity))
    }

    /// Creates a table from a full [`TableConfig`].
    ///
    /// Fails with [`Error::InvalidConfig`] if the config does not validate or
    /// the initial directory cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;

        let depth = config.initial_global_depth;
        let slots = 1usize << depth;
        let alloc_err = |_| {
            Error::invalid_config(format!(
                "cannot allocate {} slots for initial global depth {}",
                slots, depth
            ))
        };

        let mut directory: Vec<BucketId> = Vec::new();
        directory.try_reserve_exact(slots).map_err(alloc_err)?;
        let mut buckets: Vec<Bucket> = Vec::new();
        buckets.try_reserve_exact(slots).map_err(alloc_err)?;

        directory.extend((0..slots).map(BucketId));
        buckets.extend((0..slots).map(|_| Bucket::new(depth)));

        log::debug!(
            "extendible hash table: global_depth={}, bucket_capacity={}, max_global_depth={}",
            depth,
            config.bucket_capacity,
            config.max_global_depth
        );

        Ok(Self {
            global_depth: depth,
            max_global_depth: config.max_global_depth,
            bucket_capacity: config.bucket_capacity,
            directory,
            buckets,
            count: 0,
        })
    }

    #[inline]
    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    #[inline]
    pub fn max_global_depth(&self) -> u32 {
        self.max_global_depth
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Number of directory slots, always `2^global_depth`.
    #[inline]
    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Number of distinct buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Handle of the bucket at `slot`. Panics if `slot >= directory_len()`.
    #[inline]
    pub fn bucket_id(&self, slot: usize) -> BucketId {
        self.directory[slot]
    }

    /// The bucket at `slot`. Panics if `slot >= directory_len()`.
    #[inline]
    pub fn bucket(&self, slot: usize) -> &Bucket {
        &self.buckets[self.directory[slot].index()]
    }

    /// Directory slot for `value`: its low `global_depth` bits.
    #[inline]
    pub fn hash(&self, value: i64) -> usize {
        let mask = (1u64 << self.global_depth) - 1;
        ((value as u64) & mask) as usize
    }

    /// Inserts `value`, splitting buckets and doubling the directory as needed.
    ///
    /// Returns `Ok(false)` if the value was already present, in which case
    /// nothing changes. Capacity is checked before the value is committed, so
    /// no bucket ever holds more than `bucket_capacity` values; each pass of
    /// the loop either stores the value or splits the bucket it routes to.
    ///
    /// Fails with [`Error::DepthLimit`] when the target bucket is full and
    /// splitting it would push the directory past `max_global_depth`. Splits
    /// performed before that point are kept; the table stays consistent.
    pub fn insert(&mut self, value: i64) -> Result<bool> {
        loop {
            let slot = self.hash(value);
            let bucket = &mut self.buckets[self.directory[slot].index()];

            if bucket.find(value) {
                return Ok(false);
            }
            if bucket.len() < self.bucket_capacity {
                bucket.insert(value);
                self.count += 1;
                return Ok(true);
            }

            if bucket.local_depth() == self.global_depth {
                if self.global_depth >= self.max_global_depth {
                    log::warn!(
                        "cannot place {}: bucket at slot {} is full at max global depth {}",
                        value,
                        slot,
                        self.max_global_depth
                    );
                    return Err(Error::DepthLimit {
                        value,
                        max_global_depth: self.max_global_depth,
                    });
                }
                self.expand();
            }
            self.split_bucket(slot);
        }
    }

    /// Doubles the directory. Slot `i + old_len` aliases slot `i`.
    fn expand(&mut self) {
        let old_len = self.directory.len();
        self.directory.extend_from_within(..);
        self.global_depth += 1;
        log::trace!(
            "directory expanded: {} -> {} slots (global_depth={})",
            old_len,
            self.directory.len(),
            self.global_depth
        );
    }

    /// Splits the bucket at `slot` on its next bit and repoints the directory
    /// slots that now belong to the new sibling.
    fn split_bucket(&mut self, slot: usize) {
        let id = self.directory[slot];
        let old_depth = self.buckets[id.index()].local_depth();
        debug_assert!(old_depth < self.global_depth);

        let sibling = self.buckets[id.index()].split();
        let sibling_id = BucketId(self.buckets.len());
        self.buckets.push(sibling);

        // Slots referencing the bucket agree with `slot` on the low `old_depth`
        // bits; those with bit `old_depth` set move to the sibling.
        let high_bit = 1usize << old_depth;
        let first = (slot & (high_bit - 1)) | high_bit;
        for i in (first..self.directory.len()).step_by(high_bit << 1) {
            debug_assert_eq!(self.directory[i], id);
            self.directory[i] = sibling_id;
        }

        log::trace!(
            "split bucket {:?} at slot {}: local_depth {} -> {}, sibling {:?} ({} values stay, {} move)",
            id,
            slot,
            old_depth,
            old_depth + 1,
            sibling_id,
            self.buckets[id.index()].len(),
            self.buckets[sibling_id.index()].len()
        );
    }

    /// Whether `value` is stored.
    pub fn find(&self, value: i64) -> bool {
        self.bucket(self.hash(value)).find(value)
    }

    /// Removes `value`. Returns `false` (and changes nothing) if it was absent.
    ///
    /// Emptied buckets stay allocated and keep their directory slots.
    pub fn remove(&mut self, value: i64) -> bool {
        let id = self.directory[self.hash(value)];
        let removed = self.buckets[id.index()].remove(value);
        if removed {
            self.count -= 1;
        }
        removed
    }

    /// Snapshot of every directory slot in slot order.
    pub fn dump(&self) -> Vec<SlotSnapshot> {
        self.directory
            .iter()
            .enumerate()
            .map(|(slot, id)| {
                let bucket = &self.buckets[id.index()];
                SlotSnapshot {
                    slot,
                    local_depth: bucket.local_depth(),
                    values: bucket.values().to_vec(),
                }
            })
            .collect()
    }

    /// Every stored value exactly once, grouped by bucket.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.buckets
            .iter()
            .flat_map(|b| b.values().iter().copied())
    }
}

impl fmt::Display for ExtendibleHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, id) in self.directory.iter().enumerate() {
            let bucket = &self.buckets[id.index()];
            write!(f, "Bucket {}: Depth: {} | Values:", slot, bucket.local_depth())?;
            for v in bucket.values() {
                write!(f, " {}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
