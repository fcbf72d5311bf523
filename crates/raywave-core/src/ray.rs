//! Ray engine
//!
//! A [`Ray`] starts at a transmitter and records the vertices of its path as
//! a list of [`Bounce`]s. Two propagation modes fill that list:
//!
//! - **Free propagation** ([`Ray::propagate`]): march from the transmitter in
//!   the ray direction, reflect off the nearest wall ahead, repeat until the
//!   bounce budget runs out or no wall is left ahead, in which case the path
//!   ends on the scene boundary.
//! - **Forced propagation** ([`Ray::propagate_to_point`]): construct the path
//!   that reaches a destination after reflecting off a given wall sequence,
//!   using the method of images.
//!
//! ```text
//!            wall
//!   ----------*----------        * bounce
//!            / \
//!           /   \
//!         TX     RX . . . RX'    RX' image of RX across the wall
//! ```
//!
//! A ray borrows its transmitter and the walls it bounces off, and can be
//! propagated again any number of times; each run replaces the bounce list.

use tracing::{debug, trace, warn};

use crate::config::{EngineConfig, ParallelCheck};
use crate::geometry::{
    intersect, is_point_on_segment, line_coefficients, mirror_point_across_line, reflect, Point,
    Segment, Vector,
};
use crate::scene::{Boundary, Transmitter, Wall};
use crate::types::{RayError, RayResult};

/// One path vertex
#[derive(Debug, Clone, Copy)]
pub struct Bounce<'a> {
    pub point: Point,
    /// Reflecting wall, or `None` when the path ends on the scene boundary
    /// or at a forced destination
    pub wall: Option<&'a Wall>,
}

/// Ray leaving a transmitter
#[derive(Debug, Clone)]
pub struct Ray<'a> {
    transmitter: &'a Transmitter,
    direction: Vector,
    allowed_bounces: usize,
    bounces: Vec<Bounce<'a>>,
}

impl<'a> Ray<'a> {
    /// Create a ray; `direction` is normalized and must not be zero
    pub fn new(
        transmitter: &'a Transmitter,
        direction: Vector,
        allowed_bounces: usize,
    ) -> RayResult<Self> {
        let direction = direction.normalize().ok_or(RayError::ZeroDirection)?;
        Ok(Self {
            transmitter,
            direction,
            allowed_bounces,
            bounces: Vec::new(),
        })
    }

    /// Ray aimed from the transmitter at `target`
    pub fn towards(
        transmitter: &'a Transmitter,
        target: Point,
        allowed_bounces: usize,
    ) -> RayResult<Self> {
        Self::new(transmitter, target - transmitter.position, allowed_bounces)
    }

    pub fn transmitter(&self) -> &'a Transmitter {
        self.transmitter
    }

    /// Unit direction at the transmitter
    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vector) -> RayResult<()> {
        self.direction = direction.normalize().ok_or(RayError::ZeroDirection)?;
        Ok(())
    }

    pub fn allowed_bounces(&self) -> usize {
        self.allowed_bounces
    }

    pub fn set_allowed_bounces(&mut self, allowed_bounces: usize) {
        self.allowed_bounces = allowed_bounces;
    }

    pub fn bounces(&self) -> &[Bounce<'a>] {
        &self.bounces
    }

    pub fn is_empty(&self) -> bool {
        self.bounces.is_empty()
    }

    /// Whether the last run ended on the scene boundary or a destination
    pub fn is_terminated(&self) -> bool {
        matches!(self.bounces.last(), Some(b) if b.wall.is_none())
    }

    /// Transmitter position followed by every bounce point
    pub fn path_points(&self) -> Vec<Point> {
        std::iter::once(self.transmitter.position)
            .chain(self.bounces.iter().map(|b| b.point))
            .collect()
    }

    /// Each leg of the path: start, end and the wall reflecting at the end
    pub fn legs(&self) -> impl Iterator<Item = (Point, Point, Option<&'a Wall>)> + '_ {
        std::iter::once(self.transmitter.position)
            .chain(self.bounces.iter().map(|b| b.point))
            .zip(self.bounces.iter())
            .map(|(from, b)| (from, b.point, b.wall))
    }

    /// Total unfolded length of the recorded path
    pub fn path_length(&self) -> f64 {
        self.legs().map(|(from, to, _)| from.distance_to(&to)).sum()
    }

    /// Trace the ray through `walls` until the bounce budget is spent or the
    /// ray leaves the last reflector and hits the scene boundary.
    ///
    /// Direction and budget are left untouched so the ray can be traced
    /// again. Fails only when no boundary edge lies ahead of the ray, which
    /// cannot happen for a ray starting inside the boundary.
    pub fn propagate(
        &mut self,
        walls: &'a [Wall],
        boundary: &Boundary,
        config: &EngineConfig,
    ) -> RayResult<()> {
        self.bounces.clear();

        let mut origin = self.transmitter.position;
        let mut direction = self.direction;
        let mut remaining = self.allowed_bounces;

        while remaining > 0 {
            let nearest = walls
                .iter()
                .filter_map(|wall| {
                    probe_hit(&origin, &direction, wall.segment(), wall.direction(), config)
                        .map(|p| (p, wall))
                })
                .min_by(|a, b| {
                    origin
                        .distance_to(&a.0)
                        .total_cmp(&origin.distance_to(&b.0))
                });

            match nearest {
                Some((point, wall)) => {
                    remaining -= 1;
                    debug!(x = point.x, y = point.y, remaining, "ray reflected");
                    self.bounces.push(Bounce {
                        point,
                        wall: Some(wall),
                    });
                    direction = reflect(&direction, &wall.normal());
                    origin = point;
                }
                None => {
                    let point = boundary_hit(&origin, &direction, boundary, config)?;
                    debug!(x = point.x, y = point.y, "ray reached scene boundary");
                    self.bounces.push(Bounce { point, wall: None });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Build the path that reaches `destination` after reflecting off
    /// `forced_walls` in order.
    ///
    /// Without forced walls the path is the direct segment. Returns `false`
    /// and leaves the bounce list empty when some reflection point falls
    /// outside its wall, i.e. the wall ordering admits no path.
    pub fn propagate_to_point(
        &mut self,
        destination: Point,
        forced_walls: &[&'a Wall],
        config: &EngineConfig,
    ) -> bool {
        self.bounces.clear();

        // images[i] is the target the path aims at when leaving for wall i
        let mut images: Vec<Point> = forced_walls
            .iter()
            .rev()
            .scan(destination, |current, wall| {
                *current = mirror_point_across_line(wall.segment(), current);
                Some(*current)
            })
            .collect();
        images.reverse();

        let mut path = Vec::with_capacity(forced_walls.len() + 1);
        let mut origin = self.transmitter.position;

        for (i, (&wall, image)) in forced_walls.iter().zip(&images).enumerate() {
            let point = intersect(
                &line_coefficients(&origin, image),
                &wall.segment().line(),
                config.float_zero,
            )
            .filter(|p| wall.contains(p, config.segment_tolerance))
            .filter(|p| lies_between(&origin, image, p, config.segment_tolerance));

            match point {
                Some(point) => {
                    path.push(Bounce {
                        point,
                        wall: Some(wall),
                    });
                    origin = point;
                }
                None => {
                    warn!(wall = i, "forced path misses wall, no path for this ordering");
                    return false;
                }
            }
        }

        path.push(Bounce {
            point: destination,
            wall: None,
        });
        self.bounces = path;
        true
    }
}

/// Intersection of the probe ray with a segment, if it lies on the segment
/// and ahead of `origin`
fn probe_hit(
    origin: &Point,
    direction: &Vector,
    segment: &Segment,
    segment_direction: Vector,
    config: &EngineConfig,
) -> Option<Point> {
    if is_parallel(&segment_direction, direction, config) {
        return None;
    }
    let probe = line_coefficients(origin, &(*origin + *direction));
    let point = intersect(&probe, &segment.line(), config.float_zero)?;
    if !is_point_on_segment(segment, &point, config.segment_tolerance) {
        return None;
    }
    is_forward(direction, origin, &point, config.float_zero).then_some(point)
}

fn is_parallel(segment_direction: &Vector, direction: &Vector, config: &EngineConfig) -> bool {
    match config.parallel_check {
        ParallelCheck::ExactDirection => {
            segment_direction.x == direction.x && segment_direction.y == direction.y
        }
        ParallelCheck::CrossProduct => segment_direction
            .normalize()
            .map_or(true, |u| u.cross(direction).abs() < config.float_zero),
    }
}

/// Component-wise direction filter
///
/// Each axis where the direction is non-zero must advance with the same sign.
/// Candidates closer than `float_zero` to the origin are rejected so a ray
/// never re-hits the wall it just left.
pub(crate) fn is_forward(direction: &Vector, origin: &Point, candidate: &Point, float_zero: f64) -> bool {
    let d = *candidate - *origin;
    if d.magnitude() <= float_zero {
        return false;
    }
    let axis = |v: f64, step: f64| v.abs() <= float_zero || v * step > 0.0;
    axis(direction.x, d.x) && axis(direction.y, d.y)
}

/// `p` sits on the segment `from -> to`, measured along its direction
fn lies_between(from: &Point, to: &Point, p: &Point, tol: f64) -> bool {
    let span = *to - *from;
    let along = (*p - *from).dot(&span) / span.magnitude();
    along >= -tol && along <= span.magnitude() + tol
}

fn boundary_hit(
    origin: &Point,
    direction: &Vector,
    boundary: &Boundary,
    config: &EngineConfig,
) -> RayResult<Point> {
    let hit = boundary
        .edges()
        .iter()
        .filter_map(|edge| probe_hit(origin, direction, edge, edge.start - edge.end, config))
        .min_by(|a, b| origin.distance_to(a).total_cmp(&origin.distance_to(b)));

    hit.ok_or_else(|| {
        warn!(x = origin.x, y = origin.y, "no boundary edge ahead of ray");
        trace!(dx = direction.x, dy = direction.y, "exhausted ray direction");
        RayError::BoundaryExhausted {
            origin: *origin,
            direction: *direction,
        }
    })
}
