//! A set of integers with O(1) amortized "take any element".

use crate::collections::bitvec::RankSelectBitvec;

/// A subset of `1..=capacity` backed by a [`RankSelectBitvec`].
///
/// All members are at or after an internal cursor, so [`choice`](Self::choice)
/// only ever searches forward from it. Inserting below the cursor pulls it
/// back; draining never rescans the prefix.
#[derive(Clone, Debug)]
pub struct ChoiceDictionary {
    members: RankSelectBitvec,
    cursor: usize,
}

impl ChoiceDictionary {
    /// Creates an empty dictionary over `1..=capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            members: RankSelectBitvec::new(capacity),
            cursor: 1,
        }
    }

    /// Largest value the dictionary can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.members.len()
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.ones()
    }

    /// Returns `true` if there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.ones() == 0
    }

    /// Returns `true` if `value` is a member.
    #[inline]
    pub fn contains(&self, value: usize) -> bool {
        self.members.get(value)
    }

    /// Adds `value`. Returns `false` if it was already present or lies
    /// outside `1..=capacity`.
    pub fn insert(&mut self, value: usize) -> bool {
        if value == 0 || value > self.capacity() || self.members.get(value) {
            return false;
        }
        self.members.set(value, true);
        if value < self.cursor {
            self.cursor = value;
        }
        true
    }

    /// Removes `value`. Returns `false` if it was not a member.
    pub fn remove(&mut self, value: usize) -> bool {
        if !self.members.get(value) {
            return false;
        }
        self.members.set(value, false);
        true
    }

    /// Removes and returns some member, or `0` if the dictionary is empty.
    pub fn choice(&mut self) -> usize {
        let found = if self.members.get(self.cursor) {
            self.cursor
        } else {
            self.members.next_one(self.cursor)
        };
        if found == 0 {
            return 0;
        }
        self.members.set(found, false);
        self.cursor = found;
        found
    }

    /// All members in increasing order.
    pub fn elements(&self) -> Vec<usize> {
        (0..self.members.ones()).map(|k| self.members.select(k)).collect()
    }
}
