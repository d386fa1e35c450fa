use std::{collections::VecDeque, convert::TryFrom, iter::FromIterator};

use geo::{Coordinate, GeoFloat, Line};

use crate::{error::Error, predicates::Tolerance, segment::Segment, sweep::Sweep};

/// An intersection between two input segments.
///
/// Segments are identified by their position in the input:
/// `first_index < second_index`. For collinear overlapping segments
/// `point` is the first point of the overlap in sweep order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<T: GeoFloat> {
    /// A point shared by both segments.
    pub point: Coordinate<T>,
    /// The segment at `first_index`.
    pub first: Segment<T>,
    /// The segment at `second_index`.
    pub second: Segment<T>,
    pub first_index: usize,
    pub second_index: usize,
}

impl<T: GeoFloat> Intersection<T> {
    /// The input indices of the two segments, smaller first.
    #[inline]
    pub fn indices(&self) -> (usize, usize) {
        (self.first_index, self.second_index)
    }
}

/// Iterator that yields all intersections.
///
/// Yields every intersecting pair of a set of segments exactly once,
/// in the order the sweep discovers them. Construct it by `collect`-ing
/// an iterator of [`Segment`]s, or with [`Intersections::with_tolerance`].
///
/// The implementation uses the [Bentley-Ottman] algorithm. Each of the
/// O(n + k) events costs O(log(n)) in the event heap plus O(m) to
/// update the active segments, where m is the number of segments
/// crossing the sweep line at that event. This is faster than a
/// brute-force search across all pairs of input segments when k, the
/// number of intersections, is small compared to n^2 and few segments
/// are active at once.
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub struct Intersections<T: GeoFloat> {
    sweep: Sweep<T>,
    found: VecDeque<Intersection<T>>,
}

impl<T: GeoFloat> Intersections<T> {
    /// Sweep `segments` using a custom tolerance.
    pub fn with_tolerance<I: IntoIterator<Item = Segment<T>>>(
        segments: I,
        tolerance: Tolerance<T>,
    ) -> Self {
        Intersections {
            sweep: Sweep::new(segments, tolerance),
            found: VecDeque::new(),
        }
    }
}

impl<T: GeoFloat> FromIterator<Segment<T>> for Intersections<T> {
    fn from_iter<I: IntoIterator<Item = Segment<T>>>(iter: I) -> Self {
        Intersections::with_tolerance(iter, Tolerance::default())
    }
}

impl<T: GeoFloat> Iterator for Intersections<T> {
    type Item = Intersection<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(intersection) = self.found.pop_front() {
                return Some(intersection);
            }
            let found = &mut self.found;
            self.sweep.next_event(|intersection| found.push_back(intersection))?;
        }
    }
}

/// Find all intersections among `segments` with the default
/// [`Tolerance`].
pub fn find_intersections<T: GeoFloat>(segments: &[Segment<T>]) -> Vec<Intersection<T>> {
    find_intersections_with_tolerance(segments, Tolerance::default())
}

/// Find all intersections among `segments`.
pub fn find_intersections_with_tolerance<T: GeoFloat>(
    segments: &[Segment<T>],
    tolerance: Tolerance<T>,
) -> Vec<Intersection<T>> {
    Sweep::new(segments.iter().copied(), tolerance).run()
}

/// Validate `lines` as segments and find all their intersections.
///
/// Fails on the first line with equal or non-finite end points,
/// before anything is swept.
pub fn find_line_intersections<T, I>(lines: I) -> Result<Vec<Intersection<T>>, Error>
where
    T: GeoFloat,
    I: IntoIterator<Item = Line<T>>,
{
    let segments = lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            Segment::try_from(line).map_err(|source| Error::InvalidSegment { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(find_intersections(&segments))
}
