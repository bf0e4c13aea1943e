//! Boundaries for variant shuffling

/// Half-open limits a shuffled variant must stay within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    /// Leftmost position (cannot shift left of this)
    pub left: u64,
    /// Exclusive right limit (cannot shift right of this)
    pub right: u64,
}

impl Boundaries {
    pub fn new(left: u64, right: u64) -> Self {
        Self { left, right }
    }

    /// The whole of a sequence of `len` bases
    pub fn whole(len: usize) -> Self {
        Self::new(0, len as u64)
    }

    /// Check if a position is within bounds, `[left, right)`
    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.left && pos < self.right
    }
}
