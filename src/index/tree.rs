//! Centered interval tree
//!
//! Each node holds the intervals that straddle its center, once sorted by
//! start and once by end, so that a query can stop scanning a node as soon as
//! the next interval cannot overlap. Intervals wholly left of the center go to
//! the left subtree, wholly right to the right subtree. The center is the
//! median interval midpoint, which keeps the depth logarithmic.
//!
//! Intervals are 0-based half-open. Empty intervals are dropped at build time.

use crate::reference::transcript::Interval;

/// An interval and its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub interval: Interval,
    pub value: T,
}

#[derive(Debug)]
struct Node {
    center: u64,
    /// Straddling entries, ascending start
    by_start: Vec<usize>,
    /// Straddling entries, descending end
    by_end: Vec<usize>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Immutable interval tree over `Entry<T>`
#[derive(Debug)]
pub struct CenteredIntervalTree<T> {
    entries: Vec<Entry<T>>,
    root: Option<Box<Node>>,
}

impl<T> CenteredIntervalTree<T> {
    pub fn new(entries: impl IntoIterator<Item = Entry<T>>) -> Self {
        let entries: Vec<Entry<T>> = entries
            .into_iter()
            .filter(|e| !e.interval.is_empty())
            .collect();
        let all: Vec<usize> = (0..entries.len()).collect();
        let root = build_node(&entries, all);
        Self { entries, root }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    /// Entries containing the 0-based position `pos`
    pub fn query_point(&self, pos: u64) -> Vec<&Entry<T>> {
        self.query(pos, pos.saturating_add(1))
    }

    /// Entries sharing at least one base with `[begin, end)`, in no particular order
    pub fn query(&self, begin: u64, end: u64) -> Vec<&Entry<T>> {
        let mut hits = Vec::new();
        if begin >= end {
            return hits;
        }
        let mut stack: Vec<&Node> = self.root.iter().map(|n| n.as_ref()).collect();
        while let Some(node) = stack.pop() {
            if end <= node.center {
                // Query lies left of the center: straddlers overlap while start < end
                for &i in &node.by_start {
                    if self.entries[i].interval.start >= end {
                        break;
                    }
                    hits.push(&self.entries[i]);
                }
                stack.extend(node.left.as_deref());
            } else if begin > node.center {
                // Query lies right of the center: straddlers overlap while end > begin
                for &i in &node.by_end {
                    if self.entries[i].interval.end <= begin {
                        break;
                    }
                    hits.push(&self.entries[i]);
                }
                stack.extend(node.right.as_deref());
            } else {
                hits.extend(node.by_start.iter().map(|&i| &self.entries[i]));
                if begin < node.center {
                    stack.extend(node.left.as_deref());
                }
                if end > node.center + 1 {
                    stack.extend(node.right.as_deref());
                }
            }
        }
        hits
    }
}

fn build_node<T>(entries: &[Entry<T>], members: Vec<usize>) -> Option<Box<Node>> {
    if members.is_empty() {
        return None;
    }

    let mut midpoints: Vec<u64> = members
        .iter()
        .map(|&i| {
            let iv = entries[i].interval;
            iv.start + (iv.end - iv.start) / 2
        })
        .collect();
    midpoints.sort_unstable();
    let center = midpoints[midpoints.len() / 2];

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut straddling = Vec::new();
    for i in members {
        let iv = entries[i].interval;
        if iv.end <= center {
            left.push(i);
        } else if iv.start > center {
            right.push(i);
        } else {
            straddling.push(i);
        }
    }

    let mut by_start = straddling.clone();
    by_start.sort_by_key(|&i| entries[i].interval.start);
    let mut by_end = straddling;
    by_end.sort_by_key(|&i| std::cmp::Reverse(entries[i].interval.end));

    Some(Box::new(Node {
        center,
        by_start,
        by_end,
        left: build_node(entries, left),
        right: build_node(entries, right),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(intervals: &[(u64, u64)]) -> CenteredIntervalTree<usize> {
        CenteredIntervalTree::new(intervals.iter().enumerate().map(|(i, &(s, e))| Entry {
            interval: Interval::new(s, e),
            value: i,
        }))
    }

    fn ids(hits: Vec<&Entry<usize>>) -> Vec<usize> {
        let mut ids: Vec<usize> = hits.into_iter().map(|e| e.value).collect();
        ids.sort_unstable();
        ids
    }

    fn brute(intervals: &[(u64, u64)], begin: u64, end: u64) -> Vec<usize> {
        intervals
            .iter()
            .enumerate()
            .filter(|&(_, &(s, e))| s < e && s < end && begin < e)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let t = tree(&[]);
        assert!(t.is_empty());
        assert!(t.query_point(5).is_empty());
    }

    #[test]
    fn test_point_queries_at_edges() {
        let t = tree(&[(10, 20)]);
        assert_eq!(ids(t.query_point(10)), vec![0]);
        assert_eq!(ids(t.query_point(19)), vec![0]);
        assert!(t.query_point(20).is_empty());
        assert!(t.query_point(9).is_empty());
    }

    #[test]
    fn test_empty_intervals_are_dropped() {
        let t = tree(&[(10, 10), (5, 15)]);
        assert_eq!(t.len(), 1);
        assert_eq!(ids(t.query_point(10)), vec![1]);
    }

    #[test]
    fn test_matches_brute_force() {
        let intervals: Vec<(u64, u64)> = (0..60u64)
            .map(|i| {
                let start = (i * 37) % 500;
                (start, start + 1 + (i * 13) % 80)
            })
            .collect();
        let t = tree(&intervals);
        for begin in (0..620).step_by(7) {
            for width in [1, 5, 40] {
                assert_eq!(
                    ids(t.query(begin, begin + width)),
                    brute(&intervals, begin, begin + width),
                    "query [{}, {})",
                    begin,
                    begin + width
                );
            }
        }
    }

    #[test]
    fn test_inverted_query_is_empty() {
        let t = tree(&[(0, 100)]);
        assert!(t.query(50, 50).is_empty());
        assert!(t.query(60, 50).is_empty());
    }
}
