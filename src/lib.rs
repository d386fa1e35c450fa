//! Finds all pairwise intersections of a set of line segments.
//!
//! This is an implementation of the [Bentley-Ottman] algorithm to
//! efficiently compute all intersections of a collection of line
//! segments. Segments that touch at an end point, cross in their
//! interiors, or overlap collinearly all intersect; every intersecting
//! pair is reported exactly once, with one point the segments share.
//! This is essentially a drop-in replacement to testing all pairs with
//! [`brute_force_intersections`], but is typically more efficient.
//!
//! ## Usage
//!
//! Validate input with [`Segment::new`] (or convert a geo-type
//! [`Line`]), and call [`find_intersections`]. The [`Intersections`]
//! iterator yields the same report lazily, in sweep order.
//!
//! ```rust
//! use geo::Line;
//! use segment_sweep::find_line_intersections;
//! let input = vec![
//!     Line::from([(1., 0.), (0., 1.)]),
//!     Line::from([(0., 0.5), (1., 0.5)]),
//!     Line::from([(0., 0.), (1., 1.)]),
//! ];
//! let report = find_line_intersections(input).unwrap();
//! // All pairs intersect
//! assert_eq!(report.len(), 3);
//! ```
//!
//! ## Tolerance
//!
//! Points are compared exactly, but geometric predicates are evaluated
//! up to a relative [`Tolerance`], by default the square root of the
//! machine epsilon times the magnitude of the coordinates involved.
//! Use [`find_intersections_with_tolerance`] to change it.
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
//! [`Line`]: geo::Line
mod events;
pub use events::SweepPoint;

mod segment;
pub use segment::Segment;

pub mod predicates;
pub use predicates::{intersect, on_segment, orientation, Tolerance};

mod queue;

mod active;

mod sweep;

pub mod crossings;
pub use crossings::{
    find_intersections, find_intersections_with_tolerance, find_line_intersections,
    Intersection, Intersections,
};

mod naive;
pub use naive::brute_force_intersections;

mod error;
pub use error::{Error, SegmentError};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
