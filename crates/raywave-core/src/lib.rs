//! # Raywave Core
//!
//! Geometric ray tracing and propagation physics for radio waves over a 2D
//! floor plan of reflecting walls.
//!
//! ## Overview
//!
//! - **Geometry**: general-form lines, intersection, tolerant segment
//!   membership, reflection, mirroring, segment sampling
//! - **Scene**: materials, walls, transmitters, receivers, scene boundary
//! - **Ray engine**: free propagation with a bounce budget, forced
//!   propagation through a wall sequence by the method of images
//! - **Physics**: Friis reference power, Fresnel reflection, complex path
//!   coefficients, multi-ray superposition, single knife-edge diffraction
//!
//! ## Signal Flow
//!
//! ```text
//! Scene ──> Ray::propagate / Ray::propagate_to_point ──> bounce list
//!       ──> physics::{distance_coefficient, end_coefficient, ...} ──> Complex
//!       ──> Pref * |h|^2 ──> received power
//! ```
//!
//! ## Example
//!
//! ```rust
//! use raywave_core::prelude::*;
//!
//! let mut scene = Scene::new(Boundary::new(500.0, 300.0));
//! scene.materials.insert(Material::fixed("drywall", 0.5));
//! scene
//!     .add_wall(Point::new(0.0, 50.0), Point::new(100.0, 50.0), "drywall", 1.0)
//!     .unwrap();
//!
//! let tx = Transmitter::new(Point::new(10.0, 10.0), 1.0, 1e9).unwrap();
//! let config = EngineConfig::default();
//!
//! let mut ray = Ray::new(&tx, Vector::new(1.0, 1.0), 1).unwrap();
//! ray.propagate(&scene.walls, &scene.boundary, &config).unwrap();
//! assert_eq!(ray.bounces().len(), 1);
//!
//! let h = end_coefficient(&ray, &config).unwrap();
//! let power = received_power(reference_power(&ray), h);
//! assert!(power > 0.0);
//! ```

pub mod config;
pub mod geometry;
pub mod observe;
pub mod physics;
pub mod ray;
pub mod scene;
pub mod types;

pub use config::{EngineConfig, ParallelCheck, Polarization};
pub use ray::{Bounce, Ray};
pub use types::{Complex, RayError, RayResult, SPEED_OF_LIGHT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, ParallelCheck, Polarization};
    pub use crate::geometry::{Point, Segment, Vector};
    pub use crate::physics::{
        diffraction, distance_coefficient, distance_coefficient_array, end_coefficient,
        multi_ray_power, received_power, reference_power, Diffraction, PathSample,
    };
    pub use crate::ray::{Bounce, Ray};
    pub use crate::scene::{
        Boundary, Material, MaterialRegistry, Receiver, ReflectionModel, Scene, SceneObject,
        Transmitter, Wall,
    };
    pub use crate::types::{Complex, RayError, RayResult};
}
