use geo::{Coordinate, GeoFloat};
use std::cmp::Ordering;

/// A sweep event for the intersection sweep.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event<T: GeoFloat> {
    pub(crate) point: SweepPoint<T>,
    pub(crate) kind: EventKind,
}

impl<T: GeoFloat> Event<T> {
    pub(crate) fn start(point: SweepPoint<T>, key: usize) -> Self {
        Event {
            point,
            kind: EventKind::Start(key),
        }
    }

    pub(crate) fn end(point: SweepPoint<T>, key: usize) -> Self {
        Event {
            point,
            kind: EventKind::End(key),
        }
    }

    /// Intersection candidate between two segments. The keys are
    /// stored in increasing order.
    pub(crate) fn intersection(point: SweepPoint<T>, a: usize, b: usize) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Event {
            point,
            kind: EventKind::Intersection(a, b),
        }
    }
}

/// Equality check consistent with the ordering below.
impl<T: GeoFloat> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point && self.kind == other.kind
    }
}

/// Assert total equality
impl<T: GeoFloat> Eq for Event<T> {}

/// Ordering for use with a max-heap (`BinaryHeap`): the smallest
/// event compares greatest so that it is popped first.
impl<T: GeoFloat> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: GeoFloat> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point
            .cmp(&other.point)
            .then_with(|| self.kind.cmp(&other.kind))
            .reverse()
    }
}

/// Event kind, carrying the keys of the segments involved.
///
/// The ordering of the variants is important for the algorithm. At a
/// common point, crossings are resolved first so that the active
/// segments are in their order just past the point. Then segments
/// ending at the point are removed, and only after that new segments
/// are inserted.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
pub(crate) enum EventKind {
    Intersection(usize, usize),
    End(usize),
    Start(usize),
}

/// A finite point, ordered the way the sweep visits points.
///
/// Points compare by `x` and then by `y`, so a vertical segment is
/// swept bottom to top. The constructor rejects NaN and infinite
/// coordinates; every value is therefore comparable, and the order is
/// total. Event keys and segment end points use this type.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint<T: GeoFloat>(Coordinate<T>);

impl<T: GeoFloat> SweepPoint<T> {
    /// Wrap a coordinate, or `None` if any component is not finite.
    pub fn new(coord: Coordinate<T>) -> Option<Self> {
        if coord.x.is_finite() && coord.y.is_finite() {
            Some(SweepPoint(coord))
        } else {
            None
        }
    }

    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0.y
    }

    /// Whether both coordinates are within `tolerance` of `other`.
    pub(crate) fn is_close(&self, other: &Self, tolerance: T) -> bool {
        let dx = self.0.x - other.0.x;
        let dy = self.0.y - other.0.y;
        dx <= tolerance && -dx <= tolerance && dy <= tolerance && -dy <= tolerance
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl<T: GeoFloat> PartialOrd for SweepPoint<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: GeoFloat> Ord for SweepPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Both points are finite, so the partial comparisons always
        // succeed.
        let by_x = self.0.x.partial_cmp(&other.0.x).unwrap_or(Ordering::Equal);
        by_x.then_with(|| self.0.y.partial_cmp(&other.0.y).unwrap_or(Ordering::Equal))
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: GeoFloat> Eq for SweepPoint<T> {}
