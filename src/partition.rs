//! Exhaustive search for complete, non-overlapping partitions of an order.

use crate::options::OrderOptions;
use crate::subset::{enumerate_subsets, SubsetKey};

/// A set of disjoint subsets covering the whole order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    pub subsets: Vec<SubsetKey>,
}

impl Partition {
    /// Union of all member subsets.
    pub fn covered(&self) -> SubsetKey {
        self.subsets
            .iter()
            .fold(SubsetKey::default(), |acc, &key| acc.union(key))
    }

    /// Check that the members are pairwise disjoint and cover exactly `n` items.
    pub fn is_exact_cover(&self, n: usize) -> bool {
        let mut covered = SubsetKey::default();
        for &key in &self.subsets {
            if key.is_empty() || !key.is_disjoint(covered) {
                return false;
            }
            covered = covered.union(key);
        }
        covered == SubsetKey::full(n)
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }
}

/// One level of the search: the cover built so far and the item it anchors on.
struct Frame {
    covered: SubsetKey,
    anchor: usize,
    next: usize,
}

/// Stack-driven enumeration of every complete partition.
///
/// Each step anchors on the lowest item not yet covered and tries, in turn,
/// every admissible subset containing it that shares nothing with the cover
/// built so far. Anchoring on the lowest uncovered item means each partition
/// is reached along exactly one path, and the stack never grows deeper than
/// the number of items.
pub struct PartitionSearch {
    full: SubsetKey,
    /// Admissible subsets grouped by their lowest member
    candidates: Vec<Vec<SubsetKey>>,
    stack: Vec<Frame>,
    chosen: Vec<SubsetKey>,
}

impl PartitionSearch {
    /// Search over every non-empty subset of `n` items.
    pub fn new(n: usize) -> Self {
        Self::with_filter(n, |_| true)
    }

    /// Search using only subsets accepted by `admissible`.
    ///
    /// Single-item subsets are always kept so every order stays coverable.
    pub fn with_filter<F>(n: usize, mut admissible: F) -> Self
    where
        F: FnMut(SubsetKey) -> bool,
    {
        let mut candidates = vec![Vec::new(); n];
        for key in enumerate_subsets(n) {
            if key.len() == 1 || admissible(key) {
                if let Some(lowest) = key.lowest_index() {
                    candidates[lowest].push(key);
                }
            }
        }

        let stack = if n == 0 {
            Vec::new()
        } else {
            vec![Frame {
                covered: SubsetKey::default(),
                anchor: 0,
                next: 0,
            }]
        };

        PartitionSearch {
            full: SubsetKey::full(n),
            candidates,
            stack,
            chosen: Vec::with_capacity(n),
        }
    }

    /// Search the subsets of an order, optionally skipping multi-item
    /// subsets no vendor can supply.
    pub fn for_options(options: &OrderOptions, prune_unsourceable: bool) -> Self {
        let n = options.catalog().len();
        if prune_unsourceable {
            Self::with_filter(n, |key| options.is_sourceable(key))
        } else {
            Self::new(n)
        }
    }

    /// Number of subsets the search draws from.
    pub fn candidate_count(&self) -> usize {
        self.candidates.iter().map(Vec::len).sum()
    }
}

impl Iterator for PartitionSearch {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        loop {
            let frame = self.stack.last_mut()?;
            let candidates = &self.candidates[frame.anchor];

            while frame.next < candidates.len()
                && !candidates[frame.next].is_disjoint(frame.covered)
            {
                frame.next += 1;
            }

            if frame.next == candidates.len() {
                // Branch exhausted: undo the choice that opened it.
                self.stack.pop();
                self.chosen.pop();
                continue;
            }

            let key = candidates[frame.next];
            frame.next += 1;
            let covered = frame.covered.union(key);
            self.chosen.push(key);

            if covered == self.full {
                let partition = Partition {
                    subsets: self.chosen.clone(),
                };
                self.chosen.pop();
                return Some(partition);
            }

            // The full cover was not reached, so an uncovered item exists.
            let anchor = covered.bits().trailing_ones() as usize;
            self.stack.push(Frame {
                covered,
                anchor,
                next: 0,
            });
        }
    }
}
