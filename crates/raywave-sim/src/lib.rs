//! # Raywave Simulator
//!
//! Scene loading and propagation queries on top of `raywave-core`.
//!
//! - [`scenario`]: simulation settings and the JSON scene format
//! - [`Simulator`]: single rays, forced paths, multi-ray power and sweeps
//!
//! ## Example
//!
//! ```rust
//! use raywave_core::geometry::Point;
//! use raywave_sim::{SceneDescription, SimulationConfig, Simulator};
//!
//! let scene = SceneDescription::from_json(r#"{
//!     "materials": [{ "name": "brick", "reflection": { "model": "fresnel", "eta": 4.4 } }],
//!     "walls": [{ "start": {"x": 0.0, "y": 50.0}, "end": {"x": 400.0, "y": 50.0}, "material": "brick" }],
//!     "transmitters": [{ "position": {"x": 50.0, "y": 150.0}, "power": 1.0, "freq": 2.4e9 }]
//! }"#).unwrap();
//!
//! let sim = Simulator::from_description(&scene, SimulationConfig::default()).unwrap();
//! let sweep = sim
//!     .multi_ray_sweep(0, Point::new(100.0, 150.0), Point::new(350.0, 150.0), &[vec![0]])
//!     .unwrap();
//! assert_eq!(sweep.len(), 100);
//! ```
//!
//! Enable the `parallel` feature to evaluate sweep points on the rayon pool.

pub mod error;
pub mod scenario;
pub mod simulator;

pub use error::{SimError, SimResult};
pub use scenario::{SceneDescription, SimulationConfig, WallDescription};
pub use simulator::{DiffractionSweep, PowerProfile, Simulator, SweepResult};
