//! Meld candidate search over a hand.
//!
//! Candidates are index subsets of the hand that pass the validator. The
//! enumeration is brute force in the hand's own order, size by size, but a
//! branch is abandoned as soon as its normal tiles can no longer be part of
//! any set or run.

use smallvec::SmallVec;

use crate::core::Tile;
use crate::rules::validator::is_consistent_partial;
use crate::rules::{is_valid_combination, meld_value, MIN_MELD_LEN};

/// Bitmask over hand positions. Positions past 31 are never searched.
pub type HandMask = u32;

/// A valid meld found in a hand, by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeldCandidate {
    pub indices: SmallVec<[usize; 5]>,
    /// Positions used, for overlap checks.
    pub mask: HandMask,
    /// Face-number total toward the first-meld threshold.
    pub value: u32,
}

impl MeldCandidate {
    fn new(hand: &[Tile], indices: &[usize]) -> Self {
        let tiles: SmallVec<[Tile; 8]> = indices.iter().map(|&i| hand[i]).collect();
        Self {
            indices: SmallVec::from_slice(indices),
            mask: indices.iter().fold(0, |m, &i| m | (1 << i)),
            value: meld_value(&tiles),
        }
    }

    /// True if the two candidates share a hand position.
    #[must_use]
    pub fn overlaps(&self, other: &MeldCandidate) -> bool {
        self.mask & other.mask != 0
    }
}

/// Every valid meld of `MIN_MELD_LEN..=max_len` tiles in `hand`, smallest
/// sizes first, stopping once `limit` candidates are found.
#[must_use]
pub fn find_candidates(hand: &[Tile], max_len: usize, limit: usize) -> Vec<MeldCandidate> {
    let hand = &hand[..hand.len().min(HandMask::BITS as usize)];
    let mut search = Search {
        hand,
        limit,
        found: Vec::new(),
        picked: SmallVec::new(),
        tiles: SmallVec::new(),
    };

    for size in MIN_MELD_LEN..=max_len.min(hand.len()) {
        if !search.descend(0, size) {
            break;
        }
    }
    search.found
}

/// Greedy first meld: take candidates by descending value, skipping any
/// that overlap an earlier pick or would push the total past `soft_cap`,
/// until the total reaches `threshold`.
///
/// Returns `None` if the threshold cannot be reached this way.
#[must_use]
pub fn greedy_initial_meld(
    mut candidates: Vec<MeldCandidate>,
    threshold: u32,
    soft_cap: u32,
) -> Option<Vec<MeldCandidate>> {
    candidates.sort_by(|a, b| b.value.cmp(&a.value));

    let mut chosen = Vec::new();
    let mut used: HandMask = 0;
    let mut total = 0;
    for candidate in candidates {
        if candidate.mask & used != 0 || total + candidate.value > soft_cap {
            continue;
        }
        used |= candidate.mask;
        total += candidate.value;
        chosen.push(candidate);
        if total >= threshold {
            return Some(chosen);
        }
    }
    None
}

/// First valid triple in nested `i < j < k` order.
#[must_use]
pub fn first_valid_triple(hand: &[Tile]) -> Option<[usize; 3]> {
    let n = hand.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                if is_valid_combination(&[hand[i], hand[j], hand[k]]) {
                    return Some([i, j, k]);
                }
            }
        }
    }
    None
}

struct Search<'a> {
    hand: &'a [Tile],
    limit: usize,
    found: Vec<MeldCandidate>,
    picked: SmallVec<[usize; 8]>,
    tiles: SmallVec<[Tile; 8]>,
}

impl Search<'_> {
    /// Returns false once the candidate limit is hit.
    fn descend(&mut self, start: usize, size: usize) -> bool {
        if self.picked.len() == size {
            if is_valid_combination(&self.tiles) {
                self.found.push(MeldCandidate::new(self.hand, &self.picked));
                return self.found.len() < self.limit;
            }
            return true;
        }

        let needed = size - self.picked.len();
        for i in start..self.hand.len() {
            if self.hand.len() - i < needed {
                break;
            }
            self.picked.push(i);
            self.tiles.push(self.hand[i]);
            let keep_going = !is_consistent_partial(&self.tiles) || self.descend(i + 1, size);
            self.picked.pop();
            self.tiles.pop();
            if !keep_going {
                return false;
            }
        }
        true
    }
}
