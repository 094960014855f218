use alloc::vec;
use alloc::vec::Vec;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-width set of NFA state indices.
///
/// Subsets are used as map keys during subset construction, so the
/// representation is canonical: two sets with the same members and the same
/// width compare equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Bitset {
    words: Vec<u64>,
    width: usize,
}

impl Bitset {
    pub fn new(width: usize) -> Self {
        Self {
            words: vec![0; width.div_ceil(WORD_BITS)],
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `true` when the bit was not already set.
    pub fn insert(&mut self, bit: usize) -> bool {
        if bit >= self.width {
            return false;
        }
        let (word, mask) = locate(bit);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    pub fn remove(&mut self, bit: usize) {
        if bit < self.width {
            let (word, mask) = locate(bit);
            self.words[word] &= !mask;
        }
    }

    pub fn contains(&self, bit: usize) -> bool {
        if bit >= self.width {
            return false;
        }
        let (word, mask) = locate(bit);
        self.words[word] & mask != 0
    }

    pub fn union_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            let merged = *mine | *theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(index, &word)| BitIter { word, base: index * WORD_BITS })
    }
}

const fn locate(bit: usize) -> (usize, u64) {
    (bit / WORD_BITS, 1u64 << (bit % WORD_BITS))
}

struct BitIter {
    word: u64,
    base: usize,
}

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.word == 0 {
            return None;
        }
        let offset = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base + offset)
    }
}
