//! 3'/5' shuffling of indels within a sequence window
//!
//! # Coordinate System
//!
//! | Parameter | Basis | Notes |
//! |-----------|-------|-------|
//! | `start` | 0-based | Inclusive start position |
//! | `end` | 0-based | Exclusive end position (`start == end` for insertions) |
//! | `boundaries.left` | 0-based | Inclusive left limit |
//! | `boundaries.right` | 0-based | Exclusive right limit |
//!
//! Positions are indices into the `seq` slice handed in, not genome offsets.

use crate::normalize::boundary::Boundaries;
use crate::normalize::config::ShuffleDirection;

/// Result of a shuffle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleResult {
    /// New start position (0-based, inclusive)
    pub start: u64,
    /// New end position (0-based, exclusive)
    pub end: u64,
    /// Number of bases moved
    pub distance: u64,
    /// Direction the variant was moved in
    pub direction: ShuffleDirection,
}

impl ShuffleResult {
    /// Whether the variant was moved
    pub fn shifted(&self) -> bool {
        self.distance > 0
    }

    /// Whether shifting stopped because it ran into the boundary
    pub fn reached_boundary(&self, boundaries: &Boundaries) -> bool {
        match self.direction {
            ShuffleDirection::ThreePrime => self.end >= boundaries.right,
            ShuffleDirection::FivePrime => self.start <= boundaries.left,
        }
    }

    /// The inserted bases as they read at the new position
    ///
    /// Moving an insertion through a repeat rotates its bases.
    pub fn rotated_insertion(&self, alt: &[u8]) -> Vec<u8> {
        if alt.is_empty() {
            return Vec::new();
        }
        let k = (self.distance % alt.len() as u64) as usize;
        let split = match self.direction {
            ShuffleDirection::ThreePrime => k,
            ShuffleDirection::FivePrime => (alt.len() - k) % alt.len(),
        };
        let mut rotated = Vec::with_capacity(alt.len());
        rotated.extend_from_slice(&alt[split..]);
        rotated.extend_from_slice(&alt[..split]);
        rotated
    }
}

/// Shuffle an insertion or deletion towards the 3' or 5' end of `seq`
///
/// A deletion `[start, end)` (empty `alt`) moves while the base leaving the
/// deleted block equals the base entering it. An insertion (`start == end`)
/// moves while the next base of the sequence equals the matching base of the
/// rotating inserted allele. Movement never crosses `boundaries`.
pub fn shuffle(
    seq: &[u8],
    alt: &[u8],
    start: u64,
    end: u64,
    boundaries: &Boundaries,
    direction: ShuffleDirection,
) -> ShuffleResult {
    let right = boundaries.right.min(seq.len() as u64);
    let left = boundaries.left;
    let len = alt.len() as u64;
    let mut distance = 0u64;

    match direction {
        ShuffleDirection::ThreePrime => {
            while end + distance < right {
                let incoming = seq[(end + distance) as usize];
                let outgoing = if alt.is_empty() {
                    seq[(start + distance) as usize]
                } else {
                    alt[(distance % len) as usize]
                };
                if incoming != outgoing {
                    break;
                }
                distance += 1;
            }
        }
        ShuffleDirection::FivePrime => {
            while start > left + distance && start - distance - 1 < seq.len() as u64 {
                let incoming = seq[(start - distance - 1) as usize];
                let outgoing = if alt.is_empty() {
                    seq[(end - distance - 1) as usize]
                } else {
                    alt[(len - 1 - distance % len) as usize]
                };
                if incoming != outgoing {
                    break;
                }
                distance += 1;
            }
        }
    }

    let (start, end) = match direction {
        ShuffleDirection::ThreePrime => (start + distance, end + distance),
        ShuffleDirection::FivePrime => (start - distance, end - distance),
    };
    ShuffleResult {
        start,
        end,
        distance,
        direction,
    }
}
