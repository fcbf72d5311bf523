//! Persisted scene format
//!
//! Scenes are stored as JSON. Coordinates are written in file units and
//! multiplied by `scale` when the scene is built, so a floor plan drawn at
//! one resolution can be simulated at another.
//!
//! ```json
//! {
//!   "scale": 1.0,
//!   "materials": [{ "name": "brick", "reflection": { "model": "fresnel", "eta": 4.4 } }],
//!   "walls": [{ "start": {"x": 0, "y": 50}, "end": {"x": 100, "y": 50},
//!               "width": 1.0, "material": "brick" }],
//!   "transmitters": [{ "position": {"x": 10, "y": 10}, "power": 1.0, "freq": 2.4e9 }],
//!   "receivers": [{ "position": {"x": 90, "y": 20} }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use raywave_core::geometry::Point;
use raywave_core::scene::{
    Boundary, Material, Receiver, Scene, Transmitter, TransmitterSpec, Wall,
};

use crate::error::{SimError, SimResult};

/// Wall as stored on disk; the material is referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDescription {
    pub start: Point,
    pub end: Point,
    #[serde(default = "default_width")]
    pub width: f64,
    pub material: String,
}

fn default_width() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

/// Serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub walls: Vec<WallDescription>,
    #[serde(default)]
    pub transmitters: Vec<TransmitterSpec>,
    #[serde(default)]
    pub receivers: Vec<Receiver>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            materials: Vec::new(),
            walls: Vec::new(),
            transmitters: Vec::new(),
            receivers: Vec::new(),
        }
    }
}

impl SceneDescription {
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn check_scale(scale: f64) -> SimResult<f64> {
        if scale.is_finite() && scale > 0.0 {
            Ok(scale)
        } else {
            Err(SimError::InvalidScale(scale))
        }
    }

    /// Build a scene, multiplying every coordinate by `scale`
    ///
    /// Wall materials are resolved by name against `materials`.
    pub fn build(&self, boundary: Boundary) -> SimResult<Scene> {
        let scale = Self::check_scale(self.scale)?;
        let mut scene = Scene::new(boundary);

        for material in &self.materials {
            scene.materials.insert(material.clone());
        }
        for wall in &self.walls {
            scene.add_wall(
                wall.start.scaled(scale),
                wall.end.scaled(scale),
                &wall.material,
                wall.width,
            )?;
        }
        for tx in &self.transmitters {
            scene.add_transmitter(Transmitter::new(tx.position.scaled(scale), tx.power, tx.freq)?);
        }
        for rx in &self.receivers {
            scene.add_receiver(Receiver::new(rx.position.scaled(scale)));
        }

        tracing::debug!(
            walls = scene.walls.len(),
            transmitters = scene.transmitters.len(),
            receivers = scene.receivers.len(),
            "scene built from description"
        );
        Ok(scene)
    }

    /// Describe an existing scene, dividing coordinates by `scale`
    ///
    /// Registry materials are written first, then any wall material the
    /// registry no longer holds. Each name appears once.
    pub fn from_scene(scene: &Scene, scale: f64) -> SimResult<Self> {
        let scale = Self::check_scale(scale)?;
        let inv = 1.0 / scale;

        let mut materials: Vec<Material> = scene.materials.iter().map(|m| (**m).clone()).collect();
        for wall in &scene.walls {
            if !materials.iter().any(|m| m.name == wall.material.name) {
                materials.push((*wall.material).clone());
            }
        }

        Ok(Self {
            scale,
            materials,
            walls: scene.walls.iter().map(|w| describe_wall(w, inv)).collect(),
            transmitters: scene
                .transmitters
                .iter()
                .map(|t| TransmitterSpec {
                    position: t.position.scaled(inv),
                    power: t.power(),
                    freq: t.freq(),
                })
                .collect(),
            receivers: scene
                .receivers
                .iter()
                .map(|r| Receiver::new(r.position.scaled(inv)))
                .collect(),
        })
    }
}

fn describe_wall(wall: &Wall, inv_scale: f64) -> WallDescription {
    WallDescription {
        start: wall.start().scaled(inv_scale),
        end: wall.end().scaled(inv_scale),
        width: wall.width,
        material: wall.material.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raywave_core::RayError;

    const SCENE: &str = r#"{
        "scale": 2.0,
        "materials": [
            { "name": "brick", "reflection": { "model": "fresnel", "eta": 4.4 } },
            { "name": "metal", "reflection": { "model": "fixed", "alpha": 0.9 } }
        ],
        "walls": [
            { "start": {"x": 0.0, "y": 50.0}, "end": {"x": 100.0, "y": 50.0}, "material": "brick" },
            { "start": {"x": 120.0, "y": 0.0}, "end": {"x": 120.0, "y": 80.0}, "width": 3.0, "material": "metal" }
        ],
        "transmitters": [{ "position": {"x": 10.0, "y": 10.0}, "power": 1.0, "freq": 2.4e9 }],
        "receivers": [{ "position": {"x": 90.0, "y": 20.0} }]
    }"#;

    #[test]
    fn test_build_scales_coordinates() {
        let desc = SceneDescription::from_json(SCENE).unwrap();
        let scene = desc.build(Boundary::new(1000.0, 600.0)).unwrap();

        assert_eq!(scene.walls.len(), 2);
        assert_eq!(scene.walls[0].end(), Point::new(200.0, 100.0));
        assert_eq!(scene.walls[1].width, 3.0);
        assert_eq!(scene.walls[0].width, 1.0);
        assert!(scene.walls[1].material.custom_alpha());
        assert_eq!(scene.transmitters[0].position, Point::new(20.0, 20.0));
        assert_eq!(scene.receivers[0].position, Point::new(180.0, 40.0));
        assert_eq!(scene.materials.len(), 2);
    }

    #[test]
    fn test_unknown_material() {
        let desc = SceneDescription {
            walls: vec![WallDescription {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 0.0),
                width: 1.0,
                material: "glass".into(),
            }],
            ..Default::default()
        };
        match desc.build(Boundary::default()) {
            Err(SimError::Ray(RayError::UnknownMaterial(name))) => assert_eq!(name, "glass"),
            other => panic!("expected unknown material, got {:?}", other.map(|s| s.walls.len())),
        }
    }

    #[test]
    fn test_invalid_scale() {
        let desc = SceneDescription {
            scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            desc.build(Boundary::default()),
            Err(SimError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_invalid_frequency_in_file() {
        let json = r#"{ "transmitters": [{ "position": {"x": 1.0, "y": 1.0}, "power": 1.0, "freq": -5.0 }] }"#;
        let desc = SceneDescription::from_json(json).unwrap();
        assert!(matches!(
            desc.build(Boundary::default()),
            Err(SimError::Ray(RayError::InvalidFrequency(_)))
        ));
    }

    #[test]
    fn test_describe_scene_roundtrip() {
        let desc = SceneDescription::from_json(SCENE).unwrap();
        let scene = desc.build(Boundary::new(1000.0, 600.0)).unwrap();
        let back = SceneDescription::from_scene(&scene, 2.0).unwrap();

        assert_eq!(back.walls, desc.walls);
        assert_eq!(back.transmitters, desc.transmitters);
        assert_eq!(back.receivers, desc.receivers);
        assert_eq!(back.materials.len(), 2);

        let json = back.to_json().unwrap();
        assert_eq!(SceneDescription::from_json(&json).unwrap(), back);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SceneDescription::from_json("{ \"walls\": 3 }"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let desc = SceneDescription::from_json(SCENE).unwrap();
        let path = std::env::temp_dir().join(format!("raywave-scene-{}.json", std::process::id()));
        desc.save(&path).unwrap();
        let loaded = SceneDescription::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, desc);
    }
}
