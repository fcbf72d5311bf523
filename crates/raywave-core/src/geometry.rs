//! Planar geometry kernel
//!
//! Points, direction vectors and segments in scene units, plus the handful of
//! line operations the ray engine is built on: general-form coefficients,
//! two-line intersection, segment membership, reflection and mirroring.
//!
//! Lines are handled in general form:
//!
//! ```text
//!   a*x + b*y + c = 0
//!
//!   a = y2 - y1
//!   b = -(x2 - x1)
//!   c = -a*x1 - b*y1
//! ```
//!
//! Every function here is pure. Degenerate inputs (parallel lines, zero
//! vectors) are reported through `Option` rather than errors.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Denominator threshold below which two lines are treated as parallel
pub const FLOAT_ZERO: f64 = 1e-6;
/// Default tolerance of the point-on-segment test, in scene units
pub const FLOAT_COMP: f64 = 0.05;

/// Position in the scene plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance_point_to_point(self, other)
    }

    /// Scale both coordinates, used when converting scene units
    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// Direction or displacement in the scene plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product
    pub fn cross(&self, other: &Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector
    pub fn normalize(&self) -> Option<Vector> {
        let m = self.magnitude();
        if m == 0.0 || !m.is_finite() {
            return None;
        }
        Some(Vector::new(self.x / m, self.y / m))
    }

    /// Angle between two vectors in radians, in [0, pi]
    pub fn angle_to(&self, other: &Vector) -> f64 {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// Line in general form `a*x + b*y + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Same line with `(a, b)` scaled to unit length
    pub fn normalized(&self) -> Line {
        let n = (self.a * self.a + self.b * self.b).sqrt();
        Line {
            a: self.a / n,
            b: self.b / n,
            c: self.c / n,
        }
    }
}

/// Segment between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        distance_point_to_point(&self.start, &self.end)
    }

    /// Vector from `start` to `end`
    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    pub fn line(&self) -> Line {
        line_coefficients(&self.start, &self.end)
    }
}

/// General-form coefficients of the line through `p1` and `p2`
pub fn line_coefficients(p1: &Point, p2: &Point) -> Line {
    let a = p2.y - p1.y;
    let b = -(p2.x - p1.x);
    let c = -a * p1.x - b * p1.y;
    Line { a, b, c }
}

/// Coefficients with `a^2 + b^2 = 1`, so `a*x + b*y + c` is a signed distance
pub fn normalized_line_coefficients(p1: &Point, p2: &Point) -> Line {
    line_coefficients(p1, p2).normalized()
}

/// Intersection point of two lines
///
/// Returns `None` when the determinant is below `float_zero` in magnitude,
/// i.e. the lines are parallel or nearly so.
pub fn intersect(line1: &Line, line2: &Line, float_zero: f64) -> Option<Point> {
    let det = line1.a * line2.b - line2.a * line1.b;
    if det.abs() < float_zero {
        return None;
    }
    let x = (line1.b * line2.c - line2.b * line1.c) / det;
    let y = (line2.a * line1.c - line1.a * line2.c) / det;
    Some(Point::new(x, y))
}

/// Perpendicular distance from `point` to the infinite line through `segment`
pub fn distance_point_to_line(point: &Point, segment: &Segment) -> f64 {
    if segment.start.x == segment.end.x {
        // vertical line
        return (point.x - segment.start.x).abs();
    }
    let Line { a, b, c } = segment.line();
    (a * point.x + b * point.y + c).abs() / (a * a + b * b).sqrt()
}

pub fn distance_point_to_point(p1: &Point, p2: &Point) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Tolerance-based segment membership
///
/// The point is accepted when the detour through it differs from the segment
/// length by at most `tol`. Editor snapping and intersection round-off both
/// land points slightly off the exact segment, so `tol` must stay loose.
pub fn is_point_on_segment(segment: &Segment, point: &Point, tol: f64) -> bool {
    let detour = distance_point_to_point(point, &segment.start)
        + distance_point_to_point(point, &segment.end);
    (segment.length() - detour).abs() <= tol
}

/// Mirror `vec` about a surface with unit normal `normal`
///
/// `normal` must already be normalized.
pub fn reflect(vec: &Vector, normal: &Vector) -> Vector {
    *vec - *normal * (2.0 * vec.dot(normal))
}

/// Image of `point` across the infinite line through `segment`
pub fn mirror_point_across_line(segment: &Segment, point: &Point) -> Point {
    let Line { a, b, c } = normalized_line_coefficients(&segment.start, &segment.end);
    let d = a * point.x + b * point.y + c;
    Point::new(point.x - 2.0 * a * d, point.y - 2.0 * b * d)
}

/// Evenly spaced samples between two points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentSamples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Distance of each sample from the start point, non-decreasing
    pub distances: Vec<f64>,
}

impl SegmentSamples {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| Point::new(x, y))
    }
}

/// Sample `steps` points from `start` to `end` inclusive
///
/// The axis with the larger extent is interpolated linearly and the other
/// coordinate is derived from the line equation, so near-vertical and
/// near-horizontal segments never divide by a vanishing slope.
pub fn sample_along_segment(start: &Point, end: &Point, steps: usize) -> SegmentSamples {
    let mut samples = SegmentSamples {
        xs: Vec::with_capacity(steps),
        ys: Vec::with_capacity(steps),
        distances: Vec::with_capacity(steps),
    };
    if steps == 0 {
        return samples;
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let denom = (steps.max(2) - 1) as f64;

    for i in 0..steps {
        let t = i as f64 / denom;
        let (x, y) = if dx.abs() >= dy.abs() {
            let x = start.x + t * dx;
            let y = if dx == 0.0 {
                start.y
            } else {
                start.y + (x - start.x) * dy / dx
            };
            (x, y)
        } else {
            let y = start.y + t * dy;
            (start.x + (y - start.y) * dx / dy, y)
        };
        samples.xs.push(x);
        samples.ys.push(y);
        samples
            .distances
            .push(distance_point_to_point(start, &Point::new(x, y)));
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_line_coefficients() {
        let line = line_coefficients(&Point::new(1.0, 2.0), &Point::new(4.0, 6.0));
        assert_eq!(line.a, 4.0);
        assert_eq!(line.b, -3.0);
        assert_eq!(line.c, -4.0 * 1.0 + 3.0 * 2.0);
        // both endpoints satisfy the equation
        assert_abs_diff_eq!(line.a * 4.0 + line.b * 6.0 + line.c, 0.0);
    }

    #[test]
    fn test_normalized_coefficients_unit_length() {
        let line = normalized_line_coefficients(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0));
        assert_relative_eq!(line.a * line.a + line.b * line.b, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_perpendicular() {
        let l1 = seg(0.0, 5.0, 10.0, 5.0).line();
        let l2 = seg(3.0, 0.0, 3.0, 10.0).line();
        let p = intersect(&l1, &l2, FLOAT_ZERO).unwrap();
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_parallel_is_none() {
        let l1 = seg(0.0, 0.0, 10.0, 0.0).line();
        let l2 = seg(0.0, 1.0, 10.0, 1.0).line();
        assert!(intersect(&l1, &l2, FLOAT_ZERO).is_none());
    }

    #[test]
    fn test_intersect_symmetry() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let l1 = seg(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            )
            .line();
            let l2 = seg(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            )
            .line();
            match (intersect(&l1, &l2, FLOAT_ZERO), intersect(&l2, &l1, FLOAT_ZERO)) {
                (Some(p), Some(q)) => {
                    assert_relative_eq!(p.x, q.x, epsilon = 1e-6, max_relative = 1e-9);
                    assert_relative_eq!(p.y, q.y, epsilon = 1e-6, max_relative = 1e-9);
                }
                (None, None) => {}
                other => panic!("asymmetric intersection result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_distance_point_to_line() {
        assert_abs_diff_eq!(
            distance_point_to_line(&Point::new(7.0, 2.0), &seg(3.0, 0.0, 3.0, 10.0)),
            4.0
        );
        assert_abs_diff_eq!(
            distance_point_to_line(&Point::new(0.0, 0.0), &seg(0.0, 2.0, 2.0, 0.0)),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_point_on_segment_boundary() {
        let wall = seg(0.0, 50.0, 100.0, 50.0);
        assert!(is_point_on_segment(&wall, &Point::new(50.0, 50.0), FLOAT_COMP));
        assert!(is_point_on_segment(&wall, &Point::new(100.0, 50.0), FLOAT_COMP));
        assert!(!is_point_on_segment(
            &wall,
            &Point::new(100.0 + 2.0 * FLOAT_COMP, 50.0),
            FLOAT_COMP
        ));
        assert!(!is_point_on_segment(
            &wall,
            &Point::new(-2.0 * FLOAT_COMP, 50.0),
            FLOAT_COMP
        ));
    }

    #[test]
    fn test_reflect_law() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let a = rng.gen_range(0.0..2.0 * PI);
            let b = rng.gen_range(0.0..2.0 * PI);
            let v = Vector::new(a.cos(), a.sin());
            let n = Vector::new(b.cos(), b.sin());
            let r = reflect(&v, &n);

            assert_relative_eq!(r.magnitude(), 1.0, epsilon = 1e-12);
            // incidence measured on the incoming side, reflection on the outgoing side
            let incidence = (-v).angle_to(&n).min(v.angle_to(&n));
            let reflection = r.angle_to(&n).min((-r).angle_to(&n));
            assert_abs_diff_eq!(incidence, reflection, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reflect_off_horizontal_wall() {
        let r = reflect(&Vector::new(1.0, 1.0), &Vector::new(0.0, 1.0));
        assert_eq!(r, Vector::new(1.0, -1.0));
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(3.0, 4.0).normalize().unwrap();
        assert_relative_eq!(v.x, 0.6);
        assert_relative_eq!(v.y, 0.8);
        assert!(Vector::new(0.0, 0.0).normalize().is_none());
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let line = seg(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(51.0..100.0),
                rng.gen_range(-50.0..50.0),
            );
            let p = Point::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
            let back = mirror_point_across_line(&line, &mirror_point_across_line(&line, &p));
            assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
            assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mirror_across_horizontal() {
        let m = mirror_point_across_line(&seg(0.0, 50.0, 100.0, 50.0), &Point::new(10.0, 10.0));
        assert_abs_diff_eq!(m.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.y, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_along_segment() {
        let s = sample_along_segment(&Point::new(0.0, 0.0), &Point::new(30.0, 40.0), 11);
        assert_eq!(s.len(), 11);
        assert_abs_diff_eq!(s.xs[10], 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.ys[10], 40.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.distances[0], 0.0);
        assert_abs_diff_eq!(s.distances[10], 50.0, epsilon = 1e-12);
        assert!(s.distances.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_sample_vertical_segment() {
        let s = sample_along_segment(&Point::new(5.0, 0.0), &Point::new(5.0, 20.0), 5);
        assert!(s.xs.iter().all(|&x| x == 5.0));
        assert_eq!(s.ys, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_sample_edge_counts() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(2.0, 3.0);
        assert!(sample_along_segment(&a, &b, 0).is_empty());
        let one = sample_along_segment(&a, &b, 1);
        assert_eq!(one.points().collect::<Vec<_>>(), vec![a]);
    }
}
