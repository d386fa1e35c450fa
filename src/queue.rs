use std::collections::{BinaryHeap, HashSet};

use geo::GeoFloat;

use crate::events::{Event, EventKind, SweepPoint};

/// Priority queue of sweep events.
///
/// Pops events in sweep order and keeps at most one pending
/// intersection event per unordered pair of segments: scheduling a
/// pair that is already pending is a no-op.
#[derive(Debug)]
pub(crate) struct EventQueue<T: GeoFloat> {
    heap: BinaryHeap<Event<T>>,
    pending: HashSet<(usize, usize)>,
}

impl<T: GeoFloat> EventQueue<T> {
    pub(crate) fn with_capacity(size: usize) -> Self {
        EventQueue {
            heap: BinaryHeap::with_capacity(size),
            pending: HashSet::new(),
        }
    }

    /// Push an event. Returns `false` if it was an intersection event
    /// for a pair that already has one pending.
    pub(crate) fn push(&mut self, event: Event<T>) -> bool {
        if let EventKind::Intersection(a, b) = event.kind {
            if !self.pending.insert((a, b)) {
                return false;
            }
        }
        self.heap.push(event);
        true
    }

    /// Remove and return the smallest event.
    pub(crate) fn pop(&mut self) -> Option<Event<T>> {
        let event = self.heap.pop()?;
        if let EventKind::Intersection(a, b) = event.kind {
            self.pending.remove(&(a, b));
        }
        Some(event)
    }

    #[cfg(test)]
    pub(crate) fn peek_point(&self) -> Option<SweepPoint<T>> {
        self.heap.peek().map(|e| e.point)
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, a: usize, b: usize) -> bool {
        let pair = if a <= b { (a, b) } else { (b, a) };
        self.pending.contains(&pair)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
