//! Buckets: small unordered sets of values tagged with a local depth.

/// A set of distinct values that share their low `local_depth` hash bits.
///
/// A bucket does not know its capacity. [`Bucket::insert`] appends whenever
/// the value is absent, and the owning table decides when a bucket is too
/// full and must split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    local_depth: u32,
    values: Vec<i64>,
}

impl Bucket {
    /// Empty bucket at the given local depth.
    pub fn new(local_depth: u32) -> Self {
        Self {
            local_depth,
            values: Vec::new(),
        }
    }

    #[inline]
    pub fn local_depth(&self) -> u32 {
        self.local_depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in insertion order (order is not otherwise meaningful).
    #[inline]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Adds `value` unless already present. Returns `false` on a duplicate.
    pub fn insert(&mut self, value: i64) -> bool {
        if self.find(value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Removes `value`. Returns `false` if it was absent.
    pub fn remove(&mut self, value: i64) -> bool {
        match self.values.iter().position(|&v| v == value) {
            Some(idx) => {
                self.values.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn find(&self, value: i64) -> bool {
        self.values.contains(&value)
    }

    /// Bumps the local depth by one and moves out every value whose newly
    /// significant bit is set.
    ///
    /// `self` keeps the values with that bit clear; the returned sibling has
    /// the same (new) local depth and holds the rest.
    pub(crate) fn split(&mut self) -> Bucket {
        let high_bit = 1u64 << self.local_depth;
        self.local_depth += 1;

        let (stay, moved): (Vec<i64>, Vec<i64>) = self
            .values
            .drain(..)
            .partition(|&v| (v as u64) & high_bit == 0);
        self.values = stay;

        Bucket {
            local_depth: self.local_depth,
            values: moved,
        }
    }
}
