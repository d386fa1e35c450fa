use std::convert::TryFrom;

use geo::{Coordinate, GeoFloat, Line};

use crate::{error::SegmentError, events::SweepPoint};

/// A line segment with distinct, ordered end points.
///
/// The end points are canonicalized on construction so that
/// `start < end` in the sweep order (see [`SweepPoint`]): by `x`, and
/// by `y` for vertical segments. A segment never changes once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<T: GeoFloat> {
    start: SweepPoint<T>,
    end: SweepPoint<T>,
}

impl<T: GeoFloat> Segment<T> {
    /// Create a segment between two points, in either order.
    ///
    /// Fails if the points are equal or any coordinate is not finite.
    pub fn new(a: Coordinate<T>, b: Coordinate<T>) -> Result<Self, SegmentError> {
        let a = SweepPoint::new(a).ok_or(SegmentError::NonFinite)?;
        let b = SweepPoint::new(b).ok_or(SegmentError::NonFinite)?;
        if a < b {
            Ok(Segment { start: a, end: b })
        } else if a > b {
            Ok(Segment { start: b, end: a })
        } else {
            Err(SegmentError::Degenerate)
        }
    }

    /// The end point swept first.
    #[inline]
    pub fn start(&self) -> Coordinate<T> {
        self.start.coord()
    }

    /// The end point swept last.
    #[inline]
    pub fn end(&self) -> Coordinate<T> {
        self.end.coord()
    }

    #[inline]
    pub(crate) fn sweep_start(&self) -> SweepPoint<T> {
        self.start
    }

    #[inline]
    pub(crate) fn sweep_end(&self) -> SweepPoint<T> {
        self.end
    }

    /// The segment as a [`Line`] from `start` to `end`.
    #[inline]
    pub fn line(&self) -> Line<T> {
        Line::new(self.start(), self.end())
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.start.x() == self.end.x()
    }

    /// Slope `dy / dx`; positive infinity for vertical segments.
    pub(crate) fn slope(&self) -> T {
        if self.is_vertical() {
            T::infinity()
        } else {
            (self.end.y() - self.start.y()) / (self.end.x() - self.start.x())
        }
    }

    /// Position of the segment along the sweep line through `at`.
    ///
    /// For a non-vertical segment this is its `y` at `at.x`, clamped
    /// to its end points. A vertical segment lies on the sweep line,
    /// and its position is `at.y` clamped to its extent.
    pub(crate) fn position_at(&self, at: SweepPoint<T>) -> T {
        let (p, q) = (self.start, self.end);
        if self.is_vertical() {
            at.y().max(p.y()).min(q.y())
        } else if at.x() <= p.x() {
            p.y()
        } else if at.x() >= q.x() {
            q.y()
        } else {
            p.y() + (at.x() - p.x()) * (q.y() - p.y()) / (q.x() - p.x())
        }
    }
}

/// Convert from a [`Line`], ordering its end points.
impl<T: GeoFloat> TryFrom<Line<T>> for Segment<T> {
    type Error = SegmentError;

    fn try_from(l: Line<T>) -> Result<Self, Self::Error> {
        Segment::new(l.start, l.end)
    }
}

impl<T: GeoFloat> From<Segment<T>> for Line<T> {
    fn from(s: Segment<T>) -> Self {
        s.line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment<f64> {
        Segment::new(a.into(), b.into()).unwrap()
    }

    fn pt(x: f64, y: f64) -> SweepPoint<f64> {
        SweepPoint::new(Coordinate { x, y }).unwrap()
    }

    #[test]
    fn canonicalizes_end_points() {
        let s = seg((4., 0.), (0., 4.));
        assert_eq!(s.start(), Coordinate { x: 0., y: 4. });
        assert_eq!(s.end(), Coordinate { x: 4., y: 0. });

        let v = seg((1., 3.), (1., -2.));
        assert_eq!(v.start(), Coordinate { x: 1., y: -2. });
        assert_eq!(v.end(), Coordinate { x: 1., y: 3. });
        assert!(v.is_vertical());
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            Segment::new((1., 1.).into(), (1., 1.).into()),
            Err(SegmentError::Degenerate)
        );
        assert_eq!(
            Segment::new((f64::NAN, 1.).into(), (1., 1.).into()),
            Err(SegmentError::NonFinite)
        );
        assert_eq!(
            Segment::try_from(Line::from([(0., f64::INFINITY), (1., 1.)])),
            Err(SegmentError::NonFinite)
        );
    }

    #[test]
    fn line_conversions() {
        let line = Line::from([(2., 2.), (0., 0.)]);
        let s = Segment::try_from(line).unwrap();
        assert_eq!(Line::from(s), Line::from([(0., 0.), (2., 2.)]));
    }

    #[test]
    fn position_along_sweep_line() {
        let s = seg((0., 0.), (4., 2.));
        assert_eq!(s.position_at(pt(2., 100.)), 1.);
        assert_eq!(s.position_at(pt(0., -5.)), 0.);
        assert_eq!(s.position_at(pt(4., 0.)), 2.);

        let v = seg((1., 0.), (1., 4.));
        assert_eq!(v.position_at(pt(1., 2.5)), 2.5);
        assert_eq!(v.position_at(pt(1., -1.)), 0.);
        assert_eq!(v.position_at(pt(1., 9.)), 4.);
    }

    #[test]
    fn slopes() {
        assert_eq!(seg((0., 0.), (2., 1.)).slope(), 0.5);
        assert_eq!(seg((0., 0.), (0., 1.)).slope(), f64::INFINITY);
    }
}
