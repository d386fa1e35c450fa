//! Random segment generators shared by the benchmarks and the tests.
#![allow(dead_code)]

use std::f64::consts::PI;

use geo::{Coordinate, Line, Rect};

use rand::Rng;
use rand_distr::Standard;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

/// A line of the given length, from a uniform start point in a uniform
/// direction. The end point may leave `bounds`.
#[inline]
pub fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, length: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    let angle = rng.sample::<f64, _>(Standard) * 2. * PI;
    let end = Coordinate {
        x: start.x + length * angle.cos(),
        y: start.y + length * angle.sin(),
    };
    Line::new(start, end)
}

/// A line between integer points of a `size` x `size` grid. Such lines
/// share end points, overlap and are often vertical. Both ends may
/// coincide.
#[inline]
pub fn grid_line<R: Rng>(rng: &mut R, size: u32) -> Line<f64> {
    let mut coord = || f64::from(rng.gen_range(0..=size));
    let start = Coordinate {
        x: coord(),
        y: coord(),
    };
    let end = Coordinate {
        x: coord(),
        y: coord(),
    };
    Line::new(start, end)
}
