//! Geometric predicates with a tolerance.
//!
//! Point identity in the sweep is exact, but every geometric decision
//! (collinearity, bounding boxes, parallelism, parameter ranges) is
//! taken up to a [`Tolerance`]. The tolerance is relative: it is scaled
//! by the magnitude of the coordinates involved, so scaling the input
//! by a power of two does not change any decision.

use std::cmp::Ordering;

use geo::{algorithm::kernels::Orientation, Coordinate, GeoFloat};

use crate::{events::SweepPoint, segment::Segment};

/// Relative tolerance used by the predicates and the sweep.
///
/// Two points are within tolerance when they are closer than
/// `value * m`, where `m` is the largest absolute coordinate involved
/// in the test. Two directions are parallel when the sine of their
/// angle is at most `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T: GeoFloat>(T);

impl<T: GeoFloat> Tolerance<T> {
    /// Use `value` as tolerance. Returns `None` unless it is finite and
    /// non-negative.
    pub fn new(value: T) -> Option<Self> {
        if value.is_finite() && value >= T::zero() {
            Some(Tolerance(value))
        } else {
            None
        }
    }

    #[inline]
    pub fn value(&self) -> T {
        self.0
    }

    /// Distance tolerance for coordinates of the given magnitude.
    #[inline]
    pub(crate) fn at_scale(&self, magnitude: T) -> T {
        self.0 * magnitude
    }

    /// Whether two sweep points are within tolerance of each other.
    pub(crate) fn points_close(&self, a: SweepPoint<T>, b: SweepPoint<T>) -> bool {
        a.is_close(&b, self.at_scale(magnitude(&[a.coord(), b.coord()])))
    }
}

/// Square root of the machine epsilon (about `1.5e-8` for `f64`).
impl<T: GeoFloat> Default for Tolerance<T> {
    fn default() -> Self {
        Tolerance(T::epsilon().sqrt())
    }
}

#[inline]
fn abs<T: GeoFloat>(v: T) -> T {
    if v < T::zero() {
        -v
    } else {
        v
    }
}

#[inline]
fn cross<T: GeoFloat>(ax: T, ay: T, bx: T, by: T) -> T {
    ax * by - ay * bx
}

#[inline]
fn norm<T: GeoFloat>(x: T, y: T) -> T {
    (x * x + y * y).sqrt()
}

/// Largest absolute coordinate among `points`.
pub(crate) fn magnitude<T: GeoFloat>(points: &[Coordinate<T>]) -> T {
    points
        .iter()
        .fold(T::zero(), |m, p| m.max(abs(p.x)).max(abs(p.y)))
}

/// Orientation of the turn `p -> q -> r`.
///
/// `CounterClockwise` is a left turn, `Clockwise` a right turn. The
/// turn is `Collinear` when `r` is within tolerance of the line through
/// `p` and `q`.
pub fn orientation<T: GeoFloat>(
    p: Coordinate<T>,
    q: Coordinate<T>,
    r: Coordinate<T>,
    tolerance: Tolerance<T>,
) -> Orientation {
    let area = cross(q.x - p.x, q.y - p.y, r.x - p.x, r.y - p.y);
    // |area| / |q - p| is the distance of r from the line.
    let bound = tolerance.at_scale(magnitude(&[p, q, r])) * norm(q.x - p.x, q.y - p.y);
    if area > bound {
        Orientation::CounterClockwise
    } else if area < -bound {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Whether `p` lies on the closed segment `a`-`b`: collinear with it
/// and inside its bounding box.
pub fn on_segment<T: GeoFloat>(
    a: Coordinate<T>,
    p: Coordinate<T>,
    b: Coordinate<T>,
    tolerance: Tolerance<T>,
) -> bool {
    let eps = tolerance.at_scale(magnitude(&[a, p, b]));
    orientation(a, b, p, tolerance) == Orientation::Collinear
        && p.x >= a.x.min(b.x) - eps
        && p.x <= a.x.max(b.x) + eps
        && p.y >= a.y.min(b.y) - eps
        && p.y <= a.y.max(b.y) + eps
}

/// Whether `p` lies on `segment`.
#[inline]
pub(crate) fn segment_contains<T: GeoFloat>(
    segment: &Segment<T>,
    p: Coordinate<T>,
    tolerance: Tolerance<T>,
) -> bool {
    on_segment(segment.start(), p, segment.end(), tolerance)
}

/// Intersect two segments and return a point they share, if any.
///
/// Solves `s1.start + t (s1.end - s1.start) = s2.start + u (s2.end -
/// s2.start)` and accepts `t, u` in `[0, 1]`, so touching end points
/// count. The parameter tolerance of each segment is the distance
/// tolerance divided by its length; a parameter within it of either
/// bound yields the exact end point.
///
/// Parallel segments intersect only when collinear and overlapping or
/// touching; the first contact point in sweep order is returned.
pub fn intersect<T: GeoFloat>(
    s1: &Segment<T>,
    s2: &Segment<T>,
    tolerance: Tolerance<T>,
) -> Option<Coordinate<T>> {
    let dist = tolerance.at_scale(magnitude(&[s1.start(), s1.end(), s2.start(), s2.end()]));
    let (p, q) = (s1.start(), s2.start());
    let (rx, ry) = (s1.end().x - p.x, s1.end().y - p.y);
    let (sx, sy) = (s2.end().x - q.x, s2.end().y - q.y);
    let (len_r, len_s) = (norm(rx, ry), norm(sx, sy));

    let denom = cross(rx, ry, sx, sy);
    if abs(denom) > tolerance.value() * len_r * len_s {
        let (qpx, qpy) = (q.x - p.x, q.y - p.y);
        let t = cross(qpx, qpy, sx, sy) / denom;
        let u = cross(qpx, qpy, rx, ry) / denom;

        let one = T::one();
        let (eps_t, eps_u) = (dist / len_r, dist / len_s);
        if t < -eps_t || t > one + eps_t || u < -eps_u || u > one + eps_u {
            return None;
        }
        let point = if t <= eps_t {
            s1.start()
        } else if t >= one - eps_t {
            s1.end()
        } else if u <= eps_u {
            s2.start()
        } else if u >= one - eps_u {
            s2.end()
        } else {
            Coordinate {
                x: p.x + t * rx,
                y: p.y + t * ry,
            }
        };
        return Some(point);
    }

    // Parallel: only collinear segments can meet.
    if orientation(s1.start(), s1.end(), s2.start(), tolerance) != Orientation::Collinear
        || orientation(s1.start(), s1.end(), s2.end(), tolerance) != Orientation::Collinear
    {
        return None;
    }
    let first = s1.sweep_start().max(s2.sweep_start());
    let last = s1.sweep_end().min(s2.sweep_end());
    if first > last && !first.is_close(&last, dist) {
        return None;
    }
    let contact = first.coord();
    if segment_contains(s1, contact, tolerance) && segment_contains(s2, contact, tolerance) {
        Some(contact)
    } else {
        None
    }
}

/// Order of `a` and `b` along the sweep line through `at`, and just
/// past it when they meet there.
///
/// Positions within tolerance are ties, broken by slope (the segment
/// that rises less is below after the point; vertical segments last).
/// Segments with the same slope are not ordered here; callers break
/// that tie by segment key.
pub(crate) fn cmp_along_sweep<T: GeoFloat>(
    a: &Segment<T>,
    b: &Segment<T>,
    at: SweepPoint<T>,
    tolerance: Tolerance<T>,
) -> Ordering {
    let (ya, yb) = (a.position_at(at), b.position_at(at));
    let scale = abs(ya).max(abs(yb)).max(magnitude(&[at.coord()]));
    let eps = tolerance.at_scale(scale);
    if ya + eps < yb {
        Ordering::Less
    } else if yb + eps < ya {
        Ordering::Greater
    } else {
        a.slope().partial_cmp(&b.slope()).unwrap_or(Ordering::Equal)
    }
}
