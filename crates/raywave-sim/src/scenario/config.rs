//! Simulation configuration

use serde::{Deserialize, Serialize};

use raywave_core::scene::Boundary;
use raywave_core::EngineConfig;

/// Configuration for the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Draw area width before scaling
    pub scene_width: f64,
    /// Draw area height before scaling
    pub scene_height: f64,
    /// Scene units per draw-area unit; 1.0 means one pixel is one metre.
    /// A loaded scene file replaces it with its own scale.
    pub scale: f64,
    /// Number of points evaluated by a sweep along a segment
    pub sweep_steps: usize,
    /// Bounce budget of single-ray queries
    pub default_bounces: usize,
    /// Distance step of the power profile along a single ray
    pub profile_step: f64,
    pub engine: EngineConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scene_width: 500.0,
            scene_height: 300.0,
            scale: 1.0,
            sweep_steps: 100,
            default_bounces: 10,
            profile_step: 1.0,
            engine: EngineConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Boundary rectangle in scene units
    pub fn boundary(&self) -> Boundary {
        Boundary::new(self.scene_width * self.scale, self.scene_height * self.scale)
    }

    pub fn with_sweep_steps(mut self, steps: usize) -> Self {
        self.sweep_steps = steps;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.sweep_steps, 100);
        assert_eq!(cfg.default_bounces, 10);
        assert_eq!(cfg.boundary(), Boundary::new(500.0, 300.0));
    }

    #[test]
    fn test_scaled_boundary() {
        let cfg = SimulationConfig {
            scale: 0.1,
            ..Default::default()
        };
        let b = cfg.boundary();
        assert!((b.width - 50.0).abs() < 1e-12);
        assert!((b.height - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json() {
        let cfg: SimulationConfig =
            serde_json::from_str(r#"{"sweep_steps": 20, "engine": {"polarization": "TM"}}"#).unwrap();
        assert_eq!(cfg.sweep_steps, 20);
        assert_eq!(cfg.engine.polarization, raywave_core::Polarization::Tm);
        assert_eq!(cfg.scene_width, 500.0);
    }
}
