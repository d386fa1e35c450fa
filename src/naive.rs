use geo::GeoFloat;
use itertools::Itertools;

use crate::{
    crossings::Intersection,
    predicates::{intersect, Tolerance},
    segment::Segment,
};

/// Test every pair of `segments` for an intersection.
///
/// Runs in O(n^2) and reports pairs in lexicographic order of their
/// indices. Uses the same predicates as the sweep, so the two agree on
/// which pairs intersect.
pub fn brute_force_intersections<T: GeoFloat>(
    segments: &[Segment<T>],
    tolerance: Tolerance<T>,
) -> Vec<Intersection<T>> {
    segments
        .iter()
        .enumerate()
        .tuple_combinations()
        .filter_map(|((i, s1), (j, s2))| {
            intersect(s1, s2, tolerance).map(|point| Intersection {
                point,
                first: *s1,
                second: *s2,
                first_index: i,
                second_index: j,
            })
        })
        .collect()
}
