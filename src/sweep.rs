use std::collections::HashSet;

use geo::{Coordinate, GeoFloat};
use itertools::Itertools;
use log::{debug, trace};
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    active::ActiveSegments,
    crossings::Intersection,
    events::{Event, EventKind, SweepPoint},
    predicates::{intersect, segment_contains, Tolerance},
    queue::EventQueue,
    segment::Segment,
};

/// Sweep algorithm for detecting all intersections.
///
/// This is an internal data-structure that implements the
/// [Bentley-Ottman] sweep. Maintains a heap of events, and the
/// currently active segments. End-users should use one of the
/// interfaces built around this sweep.
///
/// Segments are identified by their key in `segments`, which is their
/// position in the input.
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub(crate) struct Sweep<T: GeoFloat> {
    segments: Slab<Segment<T>>,
    events: EventQueue<T>,
    active: ActiveSegments,
    /// Unordered pairs already reported.
    reported: HashSet<(usize, usize)>,
    /// The point of the last handled event.
    current: Option<SweepPoint<T>>,
    /// Segments that ended at `current`.
    ended_here: SmallVec<[usize; 4]>,
    tolerance: Tolerance<T>,
}

impl<T: GeoFloat> Sweep<T> {
    pub(crate) fn new<I: IntoIterator<Item = Segment<T>>>(iter: I, tolerance: Tolerance<T>) -> Self {
        let iter = iter.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };

        let mut sweep = Sweep {
            segments: Slab::with_capacity(size),
            events: EventQueue::with_capacity(2 * size),
            active: Default::default(),
            reported: HashSet::new(),
            current: None,
            ended_here: SmallVec::new(),
            tolerance,
        };
        for segment in iter {
            let key = sweep.segments.insert(segment);
            sweep.events.push(Event::start(segment.sweep_start(), key));
            sweep.events.push(Event::end(segment.sweep_end(), key));
        }
        debug!(
            "sweep of {} segments, {} events",
            sweep.segments.len(),
            sweep.events.len()
        );

        sweep
    }

    /// Record an intersection of `a` and `b` at `point`, unless that
    /// pair was already reported.
    fn record<F: FnMut(Intersection<T>)>(
        &mut self,
        point: Coordinate<T>,
        a: usize,
        b: usize,
        cb: &mut F,
    ) {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        if !self.reported.insert((a, b)) {
            return;
        }
        let intersection = Intersection {
            point,
            first: self.segments[a],
            second: self.segments[b],
            first_index: a,
            second_index: b,
        };
        debug!("found intersection: {:?}", intersection);
        cb(intersection);
    }

    /// Test two segments that just became adjacent at `at`, and
    /// schedule their intersection.
    ///
    /// A contact behind the sweep is dropped if the pair was already
    /// reported. Otherwise rounding put it there, and it is handled at
    /// `at`.
    fn check_pair(&mut self, a: usize, b: usize, at: SweepPoint<T>) {
        let point = match intersect(&self.segments[a], &self.segments[b], self.tolerance)
            .and_then(SweepPoint::new)
        {
            Some(point) => point,
            None => return,
        };

        let pair = if a <= b { (a, b) } else { (b, a) };
        let point = if point < at || self.tolerance.points_close(point, at) {
            if self.reported.contains(&pair) {
                trace!("ignoring reported intersection of {} and {} at {:?}", a, b, point);
                return;
            }
            if point < at {
                debug!(
                    "intersection of {} and {} at {:?} is behind the sweep; handling at {:?}",
                    a, b, point, at
                );
            }
            at
        } else {
            point
        };

        if self.events.push(Event::intersection(point, a, b)) {
            trace!("scheduled intersection of {} and {} at {:?}", a, b, point);
        } else {
            trace!("intersection of {} and {} already pending", a, b);
        }
    }

    /// The point to report for `a` and `b` meeting at the event point
    /// `at`: `at` itself if both pass through it, else their contact.
    fn contact(&self, a: usize, b: usize, at: SweepPoint<T>) -> Coordinate<T> {
        let (sa, sb) = (&self.segments[a], &self.segments[b]);
        if segment_contains(sa, at.coord(), self.tolerance)
            && segment_contains(sb, at.coord(), self.tolerance)
        {
            at.coord()
        } else {
            intersect(sa, sb, self.tolerance).unwrap_or_else(|| at.coord())
        }
    }

    fn handle_start<F: FnMut(Intersection<T>)>(&mut self, key: usize, at: SweepPoint<T>, cb: &mut F) {
        let (prev, next) = self
            .active
            .insert(key, at, &self.segments, self.tolerance);
        for adj_key in prev.into_iter().chain(next.into_iter()) {
            self.check_pair(key, adj_key, at);
        }

        // Segments that ended here have left the active set, but they
        // share this point with the new segment.
        let ended = self.ended_here.clone();
        for other in ended {
            self.record(at.coord(), other, key, cb);
        }
    }

    fn handle_end(&mut self, key: usize, at: SweepPoint<T>) {
        // Neighbors must be read before removal: they become adjacent.
        let (prev, next) = self.active.neighbors(key);
        self.active.remove(key);
        self.ended_here.push(key);

        if let (Some(prev_key), Some(next_key)) = (prev, next) {
            self.check_pair(prev_key, next_key, at);
        }
    }

    fn handle_intersection<F: FnMut(Intersection<T>)>(
        &mut self,
        a: usize,
        b: usize,
        at: SweepPoint<T>,
        cb: &mut F,
    ) {
        let point = self.contact(a, b, at);
        self.record(point, a, b, cb);
        if !self.active.contains(a) || !self.active.contains(b) {
            debug!(
                "intersection of {} and {} after one of them ended; not reordering",
                a, b
            );
            return;
        }

        let range = self
            .active
            .swap_order(a, b, at, &self.segments, self.tolerance);
        let run: SmallVec<[usize; 4]> = self.active.keys()[range.clone()].iter().copied().collect();

        // All segments of the run through `at` meet there.
        let through: SmallVec<[usize; 4]> = run
            .iter()
            .copied()
            .filter(|&key| segment_contains(&self.segments[key], at.coord(), self.tolerance))
            .collect();
        for (x, y) in through.iter().copied().tuple_combinations() {
            self.record(at.coord(), x, y, cb);
        }

        let keys = self.active.keys();
        let below = range.start.checked_sub(1).map(|i| keys[i]);
        let above = keys.get(range.end).copied();
        if let (Some(below), Some(&lowest)) = (below, run.first()) {
            self.check_pair(below, lowest, at);
        }
        if let (Some(&highest), Some(above)) = (run.last(), above) {
            self.check_pair(highest, above, at);
        }
    }

    /// Handle one event.
    fn handle_event<F: FnMut(Intersection<T>)>(&mut self, event: Event<T>, cb: &mut F) {
        trace!("handling event: {:?}", event);
        if self.current != Some(event.point) {
            self.current = Some(event.point);
            self.ended_here.clear();
        }

        match event.kind {
            EventKind::Start(key) => self.handle_start(key, event.point, cb),
            EventKind::End(key) => self.handle_end(key, event.point),
            EventKind::Intersection(a, b) => self.handle_intersection(a, b, event.point, cb),
        }
    }

    /// Process the next event in heap.
    ///
    /// Calls the callback for every intersection recorded while
    /// handling it. Returns the event point, or `None` once the sweep
    /// is done.
    #[inline]
    pub(crate) fn next_event<F: FnMut(Intersection<T>)>(
        &mut self,
        mut cb: F,
    ) -> Option<SweepPoint<T>> {
        self.events.pop().map(|event| {
            let pt = event.point;
            self.handle_event(event, &mut cb);

            pt
        })
    }

    /// Peek and return the next point in the sweep.
    #[cfg(test)]
    pub(crate) fn peek_point(&self) -> Option<SweepPoint<T>> {
        self.events.peek_point()
    }

    /// Run the sweep to completion and return the report.
    pub(crate) fn run(mut self) -> Vec<Intersection<T>> {
        let mut report = Vec::new();
        while self.next_event(|intersection| report.push(intersection)).is_some() {}
        debug_assert_eq!(self.active.len(), 0, "segments left active after the sweep");
        debug!("sweep done: {} intersections", report.len());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(lines: &[((f64, f64), (f64, f64))]) -> Sweep<f64> {
        crate::crossings::tests::init_log();
        Sweep::new(
            lines
                .iter()
                .map(|&(a, b)| Segment::new(a.into(), b.into()).unwrap()),
            Tolerance::default(),
        )
    }

    fn pairs(report: &[Intersection<f64>]) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = report.iter().map(|i| i.indices()).collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn walks_events_in_sweep_order() {
        let mut sweep = sweep(&[((0., 0.), (4., 4.)), ((0., 4.), (4., 0.))]);
        let mut points = vec![];
        let mut found = vec![];
        while let Some(pt) = sweep.next_event(|i| found.push(i)) {
            points.push(pt.coord());
        }
        let expected: Vec<Coordinate<f64>> = vec![
            (0., 0.).into(),
            (0., 4.).into(),
            (2., 2.).into(),
            (4., 0.).into(),
            (4., 4.).into(),
        ];
        assert_eq!(points, expected);
        assert_eq!(found.len(), 1);
        assert!(sweep.peek_point().is_none());
    }

    #[test]
    fn schedules_each_pair_once() {
        // The long segment is re-tested against the same neighbor
        // after each short segment between them ends.
        let mut sweep = sweep(&[
            ((0., 0.), (10., 10.)),
            ((0., 10.), (10., 0.)),
            ((1., 5.), (2., 5.)),
            ((3., 5.), (4., 5.)),
        ]);
        let mut found = vec![];
        while sweep.next_event(|i| found.push(i)).is_some() {
            assert!(sweep.events.len() <= 8);
        }
        assert_eq!(pairs(&found), vec![(0, 1)]);
    }

    #[test]
    fn contact_behind_the_sweep_is_handled_at_the_sweep_point() {
        let mut sweep = sweep(&[((0., 0.), (4., 4.)), ((0., 4.), (4., 0.))]);
        let at = SweepPoint::new(Coordinate { x: 3., y: 1. }).unwrap();
        sweep.check_pair(0, 1, at);
        assert!(sweep.events.is_pending(0, 1));

        let mut points = vec![];
        let mut found = vec![];
        while let Some(pt) = sweep.next_event(|i| found.push(i)) {
            points.push(pt.coord());
        }
        assert!(points.contains(&at.coord()));
        assert_eq!(pairs(&found), vec![(0, 1)]);
        assert_eq!(found[0].point, Coordinate { x: 2., y: 2. });
    }

    #[test]
    fn reported_contact_behind_the_sweep_is_dropped() {
        let mut sweep = sweep(&[((0., 0.), (4., 4.)), ((0., 4.), (4., 0.))]);
        let mut found = vec![];
        while sweep.next_event(|i| found.push(i)).is_some() {}
        assert_eq!(found.len(), 1);

        let at = SweepPoint::new(Coordinate { x: 3., y: 1. }).unwrap();
        sweep.check_pair(0, 1, at);
        assert!(!sweep.events.is_pending(0, 1));
    }

    #[test]
    fn shared_end_point_is_reported_across_end_and_start() {
        let report = sweep(&[((0., 0.), (2., 2.)), ((2., 2.), (4., 0.))]).run();
        assert_eq!(pairs(&report), vec![(0, 1)]);
        assert_eq!(report[0].point, Coordinate { x: 2., y: 2. });
    }

    #[test]
    fn vertical_segment_crosses_a_stack() {
        let report = sweep(&[
            ((0., 1.), (2., 1.)),
            ((0., 2.), (2., 2.)),
            ((0., 3.), (2., 3.)),
            ((1., 0.), (1., 4.)),
        ])
        .run();
        assert_eq!(pairs(&report), vec![(0, 3), (1, 3), (2, 3)]);
        let ys: Vec<_> = report.iter().map(|i| i.point.y).collect();
        assert_eq!(ys, vec![1., 2., 3.]);
    }

    #[test]
    fn concurrent_lines_report_every_pair() {
        let report = sweep(&[
            ((0., 0.), (4., 4.)),
            ((0., 1.), (4., 3.)),
            ((0., 2.), (4., 2.)),
            ((0., 3.), (4., 1.)),
            ((0., 4.), (4., 0.)),
        ])
        .run();
        let expected: Vec<_> = (0..5usize).tuple_combinations().collect();
        assert_eq!(pairs(&report), expected);
        for i in &report {
            assert_eq!(i.point, Coordinate { x: 2., y: 2. });
        }
    }

    #[test]
    fn star_of_segments_from_one_point() {
        let report = sweep(&[
            ((0., 0.), (3., 1.)),
            ((0., 0.), (3., -1.)),
            ((0., 0.), (0., 3.)),
            ((0., 0.), (3., 3.)),
        ])
        .run();
        let expected: Vec<_> = (0..4usize).tuple_combinations().collect();
        assert_eq!(pairs(&report), expected);
    }

    #[test]
    fn t_junction_and_touching_vertical() {
        let report = sweep(&[
            ((0., 0.), (4., 0.)),
            ((2., 0.), (2., 3.)),
            ((2., 3.), (4., 3.)),
        ])
        .run();
        assert_eq!(pairs(&report), vec![(0, 1), (1, 2)]);
    }
}
