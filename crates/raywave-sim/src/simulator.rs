//! Floor-plan propagation simulator
//!
//! Owns a [`Scene`] and a [`SimulationConfig`] and answers the queries an
//! editor front end issues: trace one ray, force a path through a wall
//! ordering, sum the multi-ray power at a point, and sweep power along a
//! segment.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Simulator                         │
//! │                                                          │
//! │  Scene (read-only) ──► Ray::propagate_to_point ──┐       │
//! │                                                  ▼       │
//! │  sample_along_segment ──► per-point rays ──► multi_ray   │
//! │                         (rayon with `parallel`)  power   │
//! │                                                  │       │
//! │                                    SweepResult ◄─┘       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every sweep point builds its own rays, so points are independent and the
//! scene is only ever borrowed immutably.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info};

use raywave_core::geometry::{sample_along_segment, Point, SegmentSamples, Vector};
use raywave_core::physics::{
    self, distance_coefficient_array, power_to_db, received_power, reference_power, watts_to_dbm,
};
use raywave_core::scene::{Scene, Transmitter, Wall};
use raywave_core::Ray;

use crate::error::{SimError, SimResult};
use crate::scenario::{SceneDescription, SimulationConfig};

/// Received power along a single traced ray
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerProfile {
    /// Unfolded distance from the transmitter
    pub distances: Vec<f64>,
    pub power_dbm: Vec<f64>,
}

/// Power evaluated at evenly spaced points of a segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Distance of each point from the sweep start
    pub distances: Vec<f64>,
    pub power_dbm: Vec<f64>,
    /// Transmit power over received power, in dB
    pub loss_db: Vec<f64>,
}

impl SweepResult {
    fn from_samples(samples: SegmentSamples, tx_power: f64, power_w: &[f64]) -> Self {
        Self {
            power_dbm: power_w.iter().map(|&p| watts_to_dbm(p)).collect(),
            loss_db: power_w.iter().map(|&p| power_to_db(tx_power / p)).collect(),
            xs: samples.xs,
            ys: samples.ys,
            distances: samples.distances,
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Knife-edge sweep: power along the segment plus the edge contribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffractionSweep {
    pub sweep: SweepResult,
    /// Extra loss added by the edge at each point
    pub attenuation_db: Vec<f64>,
    pub line_of_sight: Vec<bool>,
}

/// Propagation simulator over one scene
#[derive(Debug, Clone)]
pub struct Simulator {
    scene: Scene,
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(scene: Scene, config: SimulationConfig) -> Self {
        info!(
            walls = scene.walls.len(),
            transmitters = scene.transmitters.len(),
            receivers = scene.receivers.len(),
            "simulator created"
        );
        Self { scene, config }
    }

    /// Build the scene from its persisted form
    ///
    /// The file's scale replaces `config.scale`, so the boundary and the
    /// loaded coordinates are always sized by the same factor.
    pub fn from_description(description: &SceneDescription, config: SimulationConfig) -> SimResult<Self> {
        if config.scale != description.scale {
            debug!(
                configured = config.scale,
                file = description.scale,
                "using scene file scale"
            );
        }
        let config = SimulationConfig {
            scale: description.scale,
            ..config
        };
        let scene = description.build(config.boundary())?;
        Ok(Self::new(scene, config))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn transmitter(&self, index: usize) -> SimResult<&Transmitter> {
        self.scene
            .transmitters
            .get(index)
            .ok_or(SimError::UnknownTransmitter(index))
    }

    fn walls(&self, indices: &[usize]) -> SimResult<Vec<&Wall>> {
        indices
            .iter()
            .map(|&i| self.scene.walls.get(i).ok_or(SimError::UnknownWall(i)))
            .collect()
    }

    /// Trace one ray from transmitter `tx` with a bounce budget
    pub fn single_ray(&self, tx: usize, direction: Vector, bounces: usize) -> SimResult<Ray<'_>> {
        let transmitter = self.transmitter(tx)?;
        let mut ray = Ray::new(transmitter, direction, bounces)?;
        ray.propagate(&self.scene.walls, &self.scene.boundary, &self.config.engine)?;
        debug!(
            tx,
            bounces = ray.bounces().len(),
            length = ray.path_length(),
            "single ray traced"
        );
        Ok(ray)
    }

    /// Received power every `step` along a traced ray
    pub fn single_ray_profile(
        &self,
        tx: usize,
        direction: Vector,
        bounces: usize,
        step: f64,
    ) -> SimResult<PowerProfile> {
        let ray = self.single_ray(tx, direction, bounces)?;
        let pref = reference_power(&ray);
        let samples = distance_coefficient_array(&ray, step, &self.config.engine);

        Ok(PowerProfile {
            distances: samples.iter().map(|s| s.distance).collect(),
            power_dbm: samples
                .iter()
                .map(|s| watts_to_dbm(received_power(pref, s.coefficient)))
                .collect(),
        })
    }

    /// [`single_ray`](Self::single_ray) with the configured bounce budget
    pub fn trace(&self, tx: usize, direction: Vector) -> SimResult<Ray<'_>> {
        self.single_ray(tx, direction, self.config.default_bounces)
    }

    /// [`single_ray_profile`](Self::single_ray_profile) with the configured
    /// bounce budget and step
    pub fn profile(&self, tx: usize, direction: Vector) -> SimResult<PowerProfile> {
        self.single_ray_profile(tx, direction, self.config.default_bounces, self.config.profile_step)
    }

    /// Path from `tx` to `destination` reflecting off the walls at
    /// `wall_indices` in order; `None` when the ordering admits no path
    pub fn forced_ray(
        &self,
        tx: usize,
        destination: Point,
        wall_indices: &[usize],
    ) -> SimResult<Option<Ray<'_>>> {
        let transmitter = self.transmitter(tx)?;
        let walls = self.walls(wall_indices)?;
        let mut ray = aimed_ray(transmitter, destination, walls.len())?;
        if ray.propagate_to_point(destination, &walls, &self.config.engine) {
            Ok(Some(ray))
        } else {
            Ok(None)
        }
    }

    /// Coherent power in watts at `point`: the direct path plus one forced
    /// path per wall ordering
    ///
    /// At the transmitter position the direct path has zero length and adds
    /// nothing; only reflected paths contribute there.
    pub fn multi_ray_power(&self, tx: usize, point: Point, orderings: &[Vec<usize>]) -> SimResult<f64> {
        let transmitter = self.transmitter(tx)?;
        let orderings = orderings
            .iter()
            .map(|o| self.walls(o))
            .collect::<SimResult<Vec<_>>>()?;
        self.power_at(transmitter, point, &orderings)
    }

    /// [`multi_ray_power`](Self::multi_ray_power) at receiver `rx`
    pub fn receiver_power(&self, tx: usize, rx: usize, orderings: &[Vec<usize>]) -> SimResult<f64> {
        let receiver = self
            .scene
            .receivers
            .get(rx)
            .ok_or(SimError::UnknownReceiver(rx))?;
        self.multi_ray_power(tx, receiver.position, orderings)
    }

    fn power_at<'a>(
        &'a self,
        transmitter: &'a Transmitter,
        point: Point,
        orderings: &[Vec<&'a Wall>],
    ) -> SimResult<f64> {
        let engine = &self.config.engine;
        let mut rays = Vec::with_capacity(orderings.len() + 1);

        let mut direct = aimed_ray(transmitter, point, 0)?;
        direct.propagate_to_point(point, &[], engine);
        rays.push(direct);

        for walls in orderings {
            let mut ray = aimed_ray(transmitter, point, walls.len())?;
            if ray.propagate_to_point(point, walls, engine) {
                rays.push(ray);
            }
        }

        Ok(physics::multi_ray_power(&rays, engine)?)
    }

    /// Multi-ray power at `sweep_steps` points from `from` to `to`
    pub fn multi_ray_sweep(
        &self,
        tx: usize,
        from: Point,
        to: Point,
        orderings: &[Vec<usize>],
    ) -> SimResult<SweepResult> {
        let transmitter = self.transmitter(tx)?;
        let orderings = orderings
            .iter()
            .map(|o| self.walls(o))
            .collect::<SimResult<Vec<_>>>()?;

        let _span = debug_span!("multi_ray_sweep", tx, orderings = orderings.len()).entered();
        let samples = sample_along_segment(&from, &to, self.config.sweep_steps);
        let points: Vec<Point> = samples.points().collect();
        let power = evaluate(&points, |p| self.power_at(transmitter, p, &orderings))?;

        info!(points = points.len(), "multi-ray sweep finished");
        Ok(SweepResult::from_samples(samples, transmitter.power(), &power))
    }

    /// Single knife-edge diffraction over `diffraction_point` at
    /// `sweep_steps` points from `from` to `to`
    pub fn diffraction_sweep(
        &self,
        tx: usize,
        diffraction_point: Point,
        from: Point,
        to: Point,
    ) -> SimResult<DiffractionSweep> {
        let transmitter = self.transmitter(tx)?;
        let engine = &self.config.engine;
        let walls = &self.scene.walls;

        let _span = debug_span!("diffraction_sweep", tx).entered();
        let samples = sample_along_segment(&from, &to, self.config.sweep_steps);
        let points: Vec<Point> = samples.points().collect();
        let results = evaluate(&points, |p| {
            let ray = aimed_ray(transmitter, diffraction_point, 1)?;
            let d = physics::diffraction(&ray, diffraction_point, p, walls, engine);
            Ok((d.received_power(reference_power(&ray)), d))
        })?;

        let power: Vec<f64> = results.iter().map(|(p, _)| *p).collect();
        info!(points = points.len(), "diffraction sweep finished");
        Ok(DiffractionSweep {
            sweep: SweepResult::from_samples(samples, transmitter.power(), &power),
            attenuation_db: results.iter().map(|(_, d)| d.attenuation_db).collect(),
            line_of_sight: results.iter().map(|(_, d)| d.line_of_sight).collect(),
        })
    }
}

/// Ray from `transmitter` aimed at `target`, or along +x when the target
/// sits on the transmitter; forced propagation never reads the direction
fn aimed_ray<'a>(transmitter: &'a Transmitter, target: Point, bounces: usize) -> SimResult<Ray<'a>> {
    let direction = (target - transmitter.position)
        .normalize()
        .unwrap_or(Vector::new(1.0, 0.0));
    Ok(Ray::new(transmitter, direction, bounces)?)
}

#[cfg(feature = "parallel")]
fn evaluate<T, F>(points: &[Point], f: F) -> SimResult<Vec<T>>
where
    T: Send,
    F: Fn(Point) -> SimResult<T> + Sync + Send,
{
    use rayon::prelude::*;
    points.par_iter().map(|&p| f(p)).collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate<T, F>(points: &[Point], f: F) -> SimResult<Vec<T>>
where
    F: Fn(Point) -> SimResult<T>,
{
    points.iter().map(|&p| f(p)).collect()
}
