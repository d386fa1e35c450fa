use std::{cmp::Ordering, ops::Range};

use geo::GeoFloat;
use slab::Slab;

use crate::{
    events::SweepPoint,
    predicates::{cmp_along_sweep, segment_contains, Tolerance},
    segment::Segment,
};

/// Order of two stored segments along the sweep line through `at`.
///
/// Extends [`cmp_along_sweep`] with the key as the last tie-break, so
/// that collinear segments are also totally ordered.
fn cmp_keys<T: GeoFloat>(
    a: usize,
    b: usize,
    at: SweepPoint<T>,
    storage: &Slab<Segment<T>>,
    tolerance: Tolerance<T>,
) -> Ordering {
    cmp_along_sweep(&storage[a], &storage[b], at, tolerance).then_with(|| a.cmp(&b))
}

/// The segments currently crossing the sweep line, bottom to top.
///
/// Segments are referenced by their key in the sweep's storage. The
/// order is maintained explicitly: a segment is placed by comparing
/// positions at the sweep point where it is inserted, and only moves
/// again when [`swap_order`](Self::swap_order) is called at a
/// crossing. Between events it is the order along the sweep line.
///
/// The order is a plain vector: finding, inserting or removing a key
/// is linear in the number of active segments.
#[derive(Debug, Default)]
pub(crate) struct ActiveSegments {
    order: Vec<usize>,
}

impl ActiveSegments {
    fn index_of(&self, key: usize) -> Option<usize> {
        self.order.iter().position(|&k| k == key)
    }

    /// Index of a segment that must be active.
    fn expect_index(&self, key: usize) -> usize {
        self.index_of(key)
            .unwrap_or_else(|| panic!("segment {} is not in the active set", key))
    }

    #[inline]
    pub(crate) fn contains(&self, key: usize) -> bool {
        self.index_of(key).is_some()
    }

    /// Keys bottom to top.
    #[inline]
    pub(crate) fn keys(&self) -> &[usize] {
        &self.order
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Neighbors below and above the segment at `index`.
    fn neighbors_at(&self, index: usize) -> (Option<usize>, Option<usize>) {
        let prev = index.checked_sub(1).map(|i| self.order[i]);
        let next = self.order.get(index + 1).copied();
        (prev, next)
    }

    /// Insert the segment `key` at its position along the sweep line
    /// through `at`, and return its neighbors (below, above).
    pub(crate) fn insert<T: GeoFloat>(
        &mut self,
        key: usize,
        at: SweepPoint<T>,
        storage: &Slab<Segment<T>>,
        tolerance: Tolerance<T>,
    ) -> (Option<usize>, Option<usize>) {
        debug_assert!(storage.contains(key));
        assert!(!self.contains(key), "segment {} is already active", key);

        let index = self
            .order
            .partition_point(|&k| cmp_keys(k, key, at, storage, tolerance) == Ordering::Less);
        self.order.insert(index, key);
        self.neighbors_at(index)
    }

    /// Remove the segment `key`.
    ///
    /// Panics if it is not active: that is a bookkeeping bug in the
    /// sweep, not bad input.
    pub(crate) fn remove(&mut self, key: usize) {
        let index = self.expect_index(key);
        self.order.remove(index);
    }

    /// Neighbors (below, above) of an active segment.
    ///
    /// Panics if the segment is not active.
    pub(crate) fn neighbors(&self, key: usize) -> (Option<usize>, Option<usize>) {
        self.neighbors_at(self.expect_index(key))
    }

    /// Reorder two segments that meet at `at` into their order just
    /// past it.
    ///
    /// The reordered block is the run of segments from `a` to `b`,
    /// grown by any adjacent segments that also pass through `at`; all
    /// of them cross at that point. Returns the index range of the
    /// block. For two segments crossing alone this is a swap.
    pub(crate) fn swap_order<T: GeoFloat>(
        &mut self,
        a: usize,
        b: usize,
        at: SweepPoint<T>,
        storage: &Slab<Segment<T>>,
        tolerance: Tolerance<T>,
    ) -> Range<usize> {
        let (ia, ib) = (self.expect_index(a), self.expect_index(b));
        let (mut lo, mut hi) = (ia.min(ib), ia.max(ib));

        let through = |key: usize| segment_contains(&storage[key], at.coord(), tolerance);
        while lo > 0 && through(self.order[lo - 1]) {
            lo -= 1;
        }
        while hi + 1 < self.order.len() && through(self.order[hi + 1]) {
            hi += 1;
        }

        // Segments through the point leave it in slope order, even when
        // rounding puts their positions at `at` further apart than the
        // tolerance.
        let cmp = |x: usize, y: usize| {
            if through(x) && through(y) {
                let (sx, sy) = (storage[x].slope(), storage[y].slope());
                sx.partial_cmp(&sy)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| x.cmp(&y))
            } else {
                cmp_keys(x, y, at, storage, tolerance)
            }
        };

        // Insertion sort: the block is small, and adjacent swaps never
        // panic on the approximate comparisons.
        let run = &mut self.order[lo..=hi];
        for i in 1..run.len() {
            let mut j = i;
            while j > 0 && cmp(run[j - 1], run[j]) == Ordering::Greater {
                run.swap(j - 1, j);
                j -= 1;
            }
        }
        lo..hi + 1
    }
}
