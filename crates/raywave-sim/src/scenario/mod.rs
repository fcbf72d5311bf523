//! Scene setup for the simulator
//!
//! [`SimulationConfig`] carries the draw-area size, sweep resolution and
//! engine tolerances; [`SceneDescription`] is the persisted form of a scene
//! (materials, walls, transmitters, receivers and a scale factor).

pub mod config;
pub mod description;

pub use config::SimulationConfig;
pub use description::{SceneDescription, WallDescription};
