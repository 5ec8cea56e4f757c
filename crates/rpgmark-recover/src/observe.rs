//! Hand-off point between a heap observer and the recovery pipeline.
//!
//! An observer pushes nodes into an [`ObservationBuffer`] while the target
//! program runs. Recovery only ever sees the [`Snapshot`] returned by
//! [`ObservationBuffer::finish`], which consumes the buffer, so a partially
//! filled buffer cannot be decoded.

use std::collections::VecDeque;

/// Ring buffer of observed nodes, newest first.
#[derive(Debug, Clone)]
pub struct ObservationBuffer<N> {
    capacity: Option<usize>,
    nodes: VecDeque<N>,
}

impl<N> ObservationBuffer<N> {
    /// Creates a buffer keeping at most `capacity` nodes (`None` is unbounded).
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            nodes: VecDeque::new(),
        }
    }

    /// Creates a buffer that never evicts.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Creates a buffer that evicts its oldest node beyond `capacity`.
    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    /// Records a node, returning the evicted oldest node if the buffer was full.
    pub fn push(&mut self, node: N) -> Option<N> {
        if self.capacity == Some(0) {
            return Some(node);
        }
        self.nodes.push_front(node);
        match self.capacity {
            Some(cap) if self.nodes.len() > cap => self.nodes.pop_back(),
            _ => None,
        }
    }

    /// Number of buffered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been buffered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Signals that observation is complete and freezes the contents.
    pub fn finish(self) -> Snapshot<N> {
        Snapshot {
            nodes: self.nodes.into_iter().collect(),
        }
    }
}

impl<N> Extend<N> for ObservationBuffer<N> {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        for node in iter {
            self.push(node);
        }
    }
}

/// Immutable set of observed nodes, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<N> {
    nodes: Vec<N>,
}

impl<N> Snapshot<N> {
    /// Wraps nodes that were collected without a buffer.
    pub fn from_nodes(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    /// Observed nodes.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of observed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the owned nodes.
    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }
}
