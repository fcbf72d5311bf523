//! Propagation physics over traced rays
//!
//! Turns a bounce list into complex path coefficients and received power.
//!
//! ## Path Model
//!
//! Isotropic antennas, Friis reference power and a `1/d` amplitude decay:
//!
//! ```text
//!   Pref = P_tx * (lambda / 4*pi)^2
//!   h(d) = alpha / d * exp(-j * 2*pi * f * d / c)
//!   P_rx = Pref * |sum of h over contributing rays|^2
//! ```
//!
//! `alpha` is the product of the reflection coefficients of every wall the
//! ray has bounced off before reaching distance `d`.
//!
//! ## Knife-Edge Diffraction
//!
//! When the straight path to an endpoint is blocked, a single sharp edge at
//! the diffraction point adds the ITU-R P.526 approximation
//!
//! ```text
//!   v = h * sqrt(2/lambda * (1/d1 + 1/d2))
//!   J(v) = 6.9 + 20*log10(sqrt((v - 0.1)^2 + 1) + v - 0.1)   [dB]
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, Polarization};
use crate::geometry::{distance_point_to_line, intersect, Point, Segment, Vector};
use crate::ray::{is_forward, Ray};
use crate::scene::{ReflectionModel, Wall};
use crate::types::{Complex, RayError, RayResult, SPEED_OF_LIGHT};

/// Coefficient sampled at one distance along a ray path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// Unfolded distance from the transmitter
    pub distance: f64,
    pub coefficient: Complex,
}

/// Result of a knife-edge evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diffraction {
    /// Coefficient of the (possibly bent) path, without the edge loss
    pub coefficient: Complex,
    /// Extra loss introduced by the edge, 0 dB with line of sight
    pub attenuation_db: f64,
    pub line_of_sight: bool,
}

impl Diffraction {
    /// Edge loss as an amplitude factor
    pub fn attenuation_linear(&self) -> f64 {
        10.0_f64.powf(-self.attenuation_db / 20.0)
    }

    /// Received power in watts including the edge loss
    pub fn received_power(&self, reference_power: f64) -> f64 {
        received_power(reference_power, self.coefficient * self.attenuation_linear())
    }
}

/// Friis reference power: transmit power times `(lambda / 4 pi)^2`
pub fn reference_power(ray: &Ray<'_>) -> f64 {
    let tx = ray.transmitter();
    tx.power() * (tx.wavelength() / (4.0 * PI)).powi(2)
}

/// Fresnel reflection coefficient for a real relative permittivity
///
/// `theta` is the angle of incidence measured from the surface normal.
pub fn fresnel_coefficient(theta: f64, eta: f64, polarization: Polarization) -> f64 {
    let cos = theta.cos();
    let root = (eta - theta.sin().powi(2)).max(0.0).sqrt();
    match polarization {
        Polarization::Te => (cos - root) / (cos + root),
        Polarization::Tm => (root - eta * cos) / (root + eta * cos),
    }
}

/// Reflection coefficient of `wall` for a ray travelling along `incoming`
pub fn reflection_coefficient(wall: &Wall, incoming: &Vector, polarization: Polarization) -> f64 {
    match wall.material.reflection {
        ReflectionModel::Fixed { alpha } => alpha,
        ReflectionModel::Fresnel { eta } => {
            // incoming and normal meet head to tail
            let mut theta = PI - incoming.angle_to(&wall.normal());
            if theta > FRAC_PI_2 {
                // hit from the side the normal points away from
                theta = PI - theta;
            }
            fresnel_coefficient(theta, eta, polarization)
        }
    }
}

fn path_coefficient(alpha: f64, distance: f64, freq: f64) -> Complex {
    Complex::from_polar(alpha / distance, -2.0 * PI * freq * distance / SPEED_OF_LIGHT)
}

/// Coefficient at a single distance along the path
///
/// Only reflections that happen before `distance` contribute. Returns `None`
/// when `distance` is not positive or exceeds the path length.
pub fn distance_coefficient(ray: &Ray<'_>, distance: f64, config: &EngineConfig) -> Option<Complex> {
    if !(distance > 0.0) {
        return None;
    }
    let freq = ray.transmitter().freq();
    let mut alpha = 1.0;
    let mut travelled = 0.0;

    for (from, to, wall) in ray.legs() {
        let len = from.distance_to(&to);
        if travelled + len >= distance {
            return Some(path_coefficient(alpha, distance, freq));
        }
        travelled += len;
        if let Some(wall) = wall {
            alpha *= reflection_coefficient(wall, &(to - from), config.polarization);
        }
    }

    None
}

/// Coefficients at `step, 2*step, ...` up to the full path length
pub fn distance_coefficient_array(ray: &Ray<'_>, step: f64, config: &EngineConfig) -> Vec<PathSample> {
    let mut samples = Vec::new();
    if !(step > 0.0) {
        return samples;
    }
    let freq = ray.transmitter().freq();
    let mut alpha = 1.0;
    let mut travelled = 0.0;
    let mut k = 1usize;

    for (from, to, wall) in ray.legs() {
        travelled += from.distance_to(&to);
        let mut distance = k as f64 * step;
        while distance <= travelled {
            samples.push(PathSample {
                distance,
                coefficient: path_coefficient(alpha, distance, freq),
            });
            k += 1;
            distance = k as f64 * step;
        }
        if let Some(wall) = wall {
            alpha *= reflection_coefficient(wall, &(to - from), config.polarization);
        }
    }

    samples
}

/// Coefficient at the final bounce, including every reflection on the way
///
/// `None` for an empty or zero-length path.
pub fn end_coefficient(ray: &Ray<'_>, config: &EngineConfig) -> Option<Complex> {
    let mut alpha = 1.0;
    let mut distance = 0.0;
    for (from, to, wall) in ray.legs() {
        distance += from.distance_to(&to);
        if let Some(wall) = wall {
            alpha *= reflection_coefficient(wall, &(to - from), config.polarization);
        }
    }
    if distance <= config.float_zero {
        return None;
    }
    Some(path_coefficient(alpha, distance, ray.transmitter().freq()))
}

pub fn received_power(reference_power: f64, coefficient: Complex) -> f64 {
    reference_power * coefficient.norm_sqr()
}

/// Coherent sum of end coefficients at one receiver point
///
/// Rays with an empty bounce list (infeasible forced paths) are skipped. All
/// remaining rays must come from transmitters with the same power and
/// frequency, otherwise the shared reference power is meaningless.
pub fn multi_ray_power(rays: &[Ray<'_>], config: &EngineConfig) -> RayResult<f64> {
    let mut contributing = rays.iter().filter(|r| !r.is_empty());
    let Some(first) = contributing.next() else {
        return Ok(0.0);
    };
    let reference = first.transmitter();

    let mut sum = end_coefficient(first, config).unwrap_or_default();
    for ray in contributing {
        let tx = ray.transmitter();
        if tx.freq() != reference.freq() || tx.power() != reference.power() {
            return Err(RayError::MixedTransmitters);
        }
        sum += end_coefficient(ray, config).unwrap_or_default();
    }

    Ok(received_power(reference_power(first), sum))
}

/// Single knife-edge diffraction from the ray's transmitter to `endpoint`
/// over the edge at `diffraction_point`
///
/// With an unobstructed line of sight the direct coefficient is returned with
/// no extra loss. An endpoint on the transmitter yields a zero coefficient.
/// An edge sitting on either end of the path grazes it, which is `v = 0`.
pub fn diffraction(
    ray: &Ray<'_>,
    diffraction_point: Point,
    endpoint: Point,
    walls: &[Wall],
    config: &EngineConfig,
) -> Diffraction {
    let tx = ray.transmitter();
    let origin = tx.position;
    let freq = tx.freq();
    let direct = Segment::new(origin, endpoint);
    let d = direct.length();

    if d <= config.float_zero {
        return Diffraction {
            coefficient: Complex::default(),
            attenuation_db: 0.0,
            line_of_sight: true,
        };
    }

    if !is_obstructed(&direct, walls, config) {
        return Diffraction {
            coefficient: Complex::from_polar(1.0 / d, 2.0 * PI * freq * d / SPEED_OF_LIGHT),
            attenuation_db: 0.0,
            line_of_sight: true,
        };
    }

    let h = distance_point_to_line(&diffraction_point, &direct);
    let d1 = origin.distance_to(&diffraction_point);
    let d2 = diffraction_point.distance_to(&endpoint);
    let v = if d1 <= config.float_zero || d2 <= config.float_zero {
        0.0
    } else {
        h * ((2.0 / tx.wavelength()) * (1.0 / d1 + 1.0 / d2)).sqrt()
    };
    let attenuation_db = knife_edge_loss_db(v);
    debug!(v, attenuation_db, "knife-edge diffraction");

    Diffraction {
        coefficient: Complex::from_polar(1.0 / (d1 + d2), 2.0 * PI * freq * (d1 + d2) / SPEED_OF_LIGHT),
        attenuation_db,
        line_of_sight: false,
    }
}

/// ITU-R P.526 single knife-edge loss approximation in dB
pub fn knife_edge_loss_db(v: f64) -> f64 {
    6.9 + 20.0 * (((v - 0.1).powi(2) + 1.0).sqrt() + v - 0.1).log10()
}

/// A wall crosses the segment strictly before its end
fn is_obstructed(direct: &Segment, walls: &[Wall], config: &EngineConfig) -> bool {
    let Some(direction) = direct.direction().normalize() else {
        return false;
    };
    let line = direct.line();
    let reach = direct.length();

    walls.iter().any(|wall| {
        intersect(&line, &wall.segment().line(), config.float_zero)
            .filter(|p| wall.contains(p, config.segment_tolerance))
            .filter(|p| is_forward(&direction, &direct.start, p, config.float_zero))
            .is_some_and(|p| direct.start.distance_to(&p) < reach - config.float_zero)
    })
}

/// Watts to dBm
pub fn watts_to_dbm(watts: f64) -> f64 {
    10.0 * (watts * 1000.0).log10()
}

/// Power ratio to dB
pub fn power_to_db(ratio: f64) -> f64 {
    10.0 * ratio.log10()
}
