//! Shared bookkeeping for the strategies: the priority open list, the
//! per-step touched-node collector and parent-chain reconstruction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use wayfind_core::{Graph, NodeIx};

// ---------------------------------------------------------------------------
// Open list
// ---------------------------------------------------------------------------

/// Heap entry ordered by `key`, smallest first. Equal keys pop in insertion
/// order so that ties resolve to the candidate encountered first.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) node: NodeIx,
    pub(crate) key: f64,
    seq: u64,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops smallest key first.
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of nodes with lazy deletion: callers push a node again
/// when its key improves and skip stale entries on pop.
#[derive(Debug, Default)]
pub(crate) struct OpenList {
    heap: BinaryHeap<NodeRef>,
    seq: u64,
}

impl OpenList {
    pub(crate) fn push(&mut self, node: NodeIx, key: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(NodeRef { node, key, seq });
    }

    pub(crate) fn pop(&mut self) -> Option<NodeRef> {
        self.heap.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }
}

// ---------------------------------------------------------------------------
// Touched nodes
// ---------------------------------------------------------------------------

/// Nodes changed during one step, deduplicated, in first-touch order.
#[derive(Debug, Default)]
pub(crate) struct Touched(Vec<NodeIx>);

impl Touched {
    pub(crate) fn push(&mut self, ix: NodeIx) {
        if !self.0.contains(&ix) {
            self.0.push(ix);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<NodeIx> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Sides of a bidirectional search
// ---------------------------------------------------------------------------

/// Which frontier of a bidirectional search a piece of state belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Start,
    End,
}

impl Side {
    pub(crate) const BOTH: [Side; 2] = [Side::Start, Side::End];

    #[inline]
    pub(crate) fn idx(self) -> usize {
        match self {
            Side::Start => 0,
            Side::End => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Path reconstruction
// ---------------------------------------------------------------------------

/// Follow a predecessor table from `from` back to its root.
///
/// The walk is bounded by the table size so a corrupted table cannot loop.
pub(crate) fn chain(parents: &[Option<NodeIx>], from: NodeIx) -> Vec<NodeIx> {
    let mut out = vec![from];
    let mut cur = from;
    while let Some(p) = parents[cur.index()] {
        if out.len() > parents.len() {
            break;
        }
        out.push(p);
        cur = p;
    }
    out
}

/// Reconstruct `start ..= end` by walking `SearchState::parent` from `end`.
pub(crate) fn trace_parents(graph: &Graph, start: NodeIx, end: NodeIx) -> Option<Vec<NodeIx>> {
    let mut path = vec![end];
    let mut cur = end;
    while cur != start {
        let p = graph.state(cur).parent?;
        if path.len() > graph.len() {
            return None;
        }
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some(path)
}

/// Join a start-side chain ending at `start_half` with an end-side chain
/// beginning at `end_half`. When both halves are the same meeting node it
/// appears once.
pub(crate) fn join_chains(
    parents: &[Vec<Option<NodeIx>>; 2],
    start_half: NodeIx,
    end_half: NodeIx,
) -> Vec<NodeIx> {
    let mut path = chain(&parents[Side::Start.idx()], start_half);
    path.reverse();
    let tail = chain(&parents[Side::End.idx()], end_half);
    let skip = usize::from(start_half == end_half);
    path.extend(tail.into_iter().skip(skip));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_list_pops_smallest_key_first() {
        let mut open = OpenList::default();
        open.push(NodeIx::new(0), 3.0);
        open.push(NodeIx::new(1), 1.0);
        open.push(NodeIx::new(2), 2.0);
        let order: Vec<_> = std::iter::from_fn(|| open.pop()).map(|r| r.node.index()).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn open_list_ties_are_fifo() {
        let mut open = OpenList::default();
        for i in 0..4 {
            open.push(NodeIx::new(i), 1.0);
        }
        let order: Vec<_> = std::iter::from_fn(|| open.pop()).map(|r| r.node.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert!(open.pop().is_none());
    }

    #[test]
    fn touched_dedups_in_order() {
        let mut t = Touched::default();
        for i in [2, 0, 2, 1, 0] {
            t.push(NodeIx::new(i));
        }
        assert_eq!(t.into_vec(), vec![NodeIx::new(2), NodeIx::new(0), NodeIx::new(1)]);
    }

    #[test]
    fn join_chains_shares_meeting_node() {
        // start 0 -> 1 -> 2 (meeting) <- 3 <- 4 end
        let n = NodeIx::new;
        let mut start = vec![None; 5];
        start[1] = Some(n(0));
        start[2] = Some(n(1));
        let mut end = vec![None; 5];
        end[3] = Some(n(4));
        end[2] = Some(n(3));
        let path = join_chains(&[start.clone(), end.clone()], n(2), n(2));
        assert_eq!(path, vec![n(0), n(1), n(2), n(3), n(4)]);

        // Adjacent halves: start side stopped at 1, end side at 2.
        let path = join_chains(&[start, end], n(1), n(2));
        assert_eq!(path, vec![n(0), n(1), n(2), n(3), n(4)]);
    }
}
