//! Frozen rank/select directory in the rank9 layout.
//!
//! Bits are grouped into 512-bit superblocks. Each superblock stores two
//! words: the absolute number of ones before it, and seven 9-bit counts of
//! the ones preceding words 1..7 inside the superblock. Rank is two lookups
//! plus one popcount; select binary-searches the absolute counts.

const WORDS_PER_SUPERBLOCK: usize = 8;
const SUBCOUNT_BITS: usize = 9;
const SUBCOUNT_MASK: u64 = (1 << SUBCOUNT_BITS) - 1;

/// Read-only rank/select accelerator over a borrowed word array.
///
/// The index does not own the bits; every query takes the same word slice
/// the index was built from.
#[derive(Clone, Debug)]
pub struct Rank9Index {
    counts: Vec<u64>,
    ones: usize,
}

impl Rank9Index {
    /// Builds the directory over `words`.
    pub fn build(words: &[u64]) -> Self {
        let superblocks = words.len().div_ceil(WORDS_PER_SUPERBLOCK);
        let mut counts = Vec::with_capacity(2 * superblocks + 2);
        let mut total = 0u64;
        for chunk in words.chunks(WORDS_PER_SUPERBLOCK) {
            counts.push(total);
            let mut packed = 0u64;
            let mut within = 0u64;
            for sub in 0..WORDS_PER_SUPERBLOCK {
                if sub > 0 {
                    packed |= within << (SUBCOUNT_BITS * (sub - 1));
                }
                if let Some(word) = chunk.get(sub) {
                    within += u64::from(word.count_ones());
                }
            }
            counts.push(packed);
            total += within;
        }
        counts.push(total);
        counts.push(0);
        #[allow(clippy::cast_possible_truncation)]
        let ones = total as usize;
        Self { counts, ones }
    }

    /// Total number of set bits.
    #[inline]
    pub fn ones(&self) -> usize {
        self.ones
    }

    #[inline]
    fn superblocks(&self) -> usize {
        self.counts.len() / 2 - 1
    }

    #[inline]
    fn subcount(packed: u64, sub: usize) -> u64 {
        if sub == 0 {
            0
        } else {
            (packed >> (SUBCOUNT_BITS * (sub - 1))) & SUBCOUNT_MASK
        }
    }

    /// Number of ones among the first `bits` bits (0-based, exclusive).
    #[allow(clippy::cast_possible_truncation)]
    pub fn rank(&self, words: &[u64], bits: usize) -> usize {
        let word = bits / 64;
        if word >= words.len() {
            return self.ones;
        }
        let superblock = word / WORDS_PER_SUPERBLOCK;
        let mut rank = self.counts[2 * superblock]
            + Self::subcount(self.counts[2 * superblock + 1], word % WORDS_PER_SUPERBLOCK);
        let offset = bits % 64;
        if offset > 0 {
            rank += u64::from((words[word] & ((1u64 << offset) - 1)).count_ones());
        }
        rank as usize
    }

    /// 0-based position of the one with 0-based rank `k`, or `None` if there
    /// are not that many ones.
    #[allow(clippy::cast_possible_truncation)]
    pub fn select(&self, words: &[u64], k: usize) -> Option<usize> {
        if k >= self.ones {
            return None;
        }
        let k = k as u64;
        // counts[2 * lo] <= k < counts[2 * hi]
        let (mut lo, mut hi) = (0, self.superblocks());
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.counts[2 * mid] <= k {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let packed = self.counts[2 * lo + 1];
        let mut remaining = k - self.counts[2 * lo];
        let mut sub = 0;
        for candidate in 1..WORDS_PER_SUPERBLOCK {
            if Self::subcount(packed, candidate) <= remaining {
                sub = candidate;
            } else {
                break;
            }
        }
        remaining -= Self::subcount(packed, sub);
        let word = lo * WORDS_PER_SUPERBLOCK + sub;
        Some(word * 64 + select_in_word(words[word], remaining as u32))
    }
}

/// Bit index of the set bit with 0-based rank `rank` inside `word`.
#[inline]
pub(crate) fn select_in_word(mut word: u64, rank: u32) -> usize {
    for _ in 0..rank {
        word &= word - 1;
    }
    word.trailing_zeros() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_rank(words: &[u64], bits: usize) -> usize {
        (0..bits).filter(|&i| words[i / 64] >> (i % 64) & 1 == 1).count()
    }

    #[test]
    fn test_rank_matches_popcount_scan() {
        let words: Vec<u64> = (0..23u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect();
        let index = Rank9Index::build(&words);
        for bits in (0..words.len() * 64).step_by(37) {
            assert_eq!(index.rank(&words, bits), naive_rank(&words, bits), "rank({bits})");
        }
        assert_eq!(index.rank(&words, words.len() * 64), index.ones());
    }

    #[test]
    fn test_select_inverts_rank() {
        let mut words = vec![0u64; 20];
        for bit in [0usize, 5, 63, 64, 511, 512, 700, 1279] {
            words[bit / 64] |= 1 << (bit % 64);
        }
        let index = Rank9Index::build(&words);
        assert_eq!(index.ones(), 8);
        for (k, bit) in [0usize, 5, 63, 64, 511, 512, 700, 1279].into_iter().enumerate() {
            assert_eq!(index.select(&words, k), Some(bit));
            assert_eq!(index.rank(&words, bit), k);
        }
        assert_eq!(index.select(&words, 8), None);
    }

    #[test]
    fn test_empty_words() {
        let index = Rank9Index::build(&[]);
        assert_eq!(index.ones(), 0);
        assert_eq!(index.rank(&[], 0), 0);
        assert_eq!(index.select(&[], 0), None);
    }

    #[test]
    fn test_select_in_word() {
        assert_eq!(select_in_word(0b1011_0100, 0), 2);
        assert_eq!(select_in_word(0b1011_0100, 2), 5);
        assert_eq!(select_in_word(u64::MAX, 63), 63);
    }
}
