//! Scene model: materials, walls, transmitters and receivers
//!
//! A [`Scene`] is the explicit context handed to the ray engine. It owns the
//! walls and the material registry they point into, the transmitters and
//! receivers placed by the editor, and the rectangular [`Boundary`] that
//! terminates free-running rays.
//!
//! Materials are shared: every wall holds an `Arc<Material>` taken from the
//! registry, never a private copy, so a sweep running on several threads can
//! read the same scene without synchronisation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::geometry::{distance_point_to_line, is_point_on_segment, Point, Segment, Vector};
use crate::types::{RayError, RayResult, SPEED_OF_LIGHT};

/// How a material turns an incident ray into a reflected one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ReflectionModel {
    /// Angle-independent reflection coefficient in [0, 1]
    Fixed { alpha: f64 },
    /// Fresnel reflection with relative permittivity `eta`
    Fresnel { eta: f64 },
}

/// Named wall material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub reflection: ReflectionModel,
}

impl Material {
    /// Material with a fixed reflection coefficient
    pub fn fixed(name: impl Into<String>, alpha: f64) -> Self {
        Self {
            name: name.into(),
            reflection: ReflectionModel::Fixed { alpha },
        }
    }

    /// Material reflecting according to the Fresnel equations
    pub fn fresnel(name: impl Into<String>, eta: f64) -> Self {
        Self {
            name: name.into(),
            reflection: ReflectionModel::Fresnel { eta },
        }
    }

    /// Whether the reflection coefficient is a fixed user-supplied value
    pub fn custom_alpha(&self) -> bool {
        matches!(self.reflection, ReflectionModel::Fixed { .. })
    }
}

/// Scene-level material store keyed by name
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: BTreeMap<String, Arc<Material>>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a material, returning the shared handle
    pub fn insert(&mut self, material: Material) -> Arc<Material> {
        let shared = Arc::new(material);
        self.materials
            .insert(shared.name.clone(), Arc::clone(&shared));
        shared
    }

    pub fn get(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).cloned()
    }

    /// Like [`get`](Self::get) but reports a missing name as an error
    pub fn require(&self, name: &str) -> RayResult<Arc<Material>> {
        self.get(name)
            .ok_or_else(|| RayError::UnknownMaterial(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Material>> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// One-dimensional reflecting wall
#[derive(Debug, Clone)]
pub struct Wall {
    segment: Segment,
    /// Drawing width, no physical meaning
    pub width: f64,
    pub material: Arc<Material>,
    normal: Vector,
}

impl Wall {
    pub fn new(start: Point, end: Point, material: Arc<Material>, width: f64) -> RayResult<Self> {
        let segment = Segment::new(start, end);
        let normal = wall_normal(&segment)?;
        Ok(Self {
            segment,
            width,
            material,
            normal,
        })
    }

    pub fn start(&self) -> Point {
        self.segment.start
    }

    pub fn end(&self) -> Point {
        self.segment.end
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Unit normal with a non-positive x component
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Vector from the end point back to the start point
    pub fn direction(&self) -> Vector {
        self.segment.start - self.segment.end
    }

    pub fn length(&self) -> f64 {
        self.segment.length()
    }

    /// Move the wall; the normal is recomputed for the new orientation
    pub fn set_endpoints(&mut self, start: Point, end: Point) -> RayResult<()> {
        let segment = Segment::new(start, end);
        self.normal = wall_normal(&segment)?;
        self.segment = segment;
        Ok(())
    }

    /// Distance from `point` to the wall segment (not the infinite line)
    pub fn distance_to(&self, point: &Point) -> f64 {
        let d = self.segment.direction();
        let t = (*point - self.segment.start).dot(&d) / d.dot(&d);
        if (0.0..=1.0).contains(&t) {
            distance_point_to_line(point, &self.segment)
        } else {
            point
                .distance_to(&self.segment.start)
                .min(point.distance_to(&self.segment.end))
        }
    }

    pub fn contains(&self, point: &Point, tol: f64) -> bool {
        is_point_on_segment(&self.segment, point, tol)
    }
}

/// Canonical unit normal: perpendicular to the wall with `x <= 0`
///
/// Horizontal walls have `x == 0`; for those the normal points towards +y.
fn wall_normal(segment: &Segment) -> RayResult<Vector> {
    let d = segment.direction();
    let n = Vector::new(d.y, -d.x)
        .normalize()
        .ok_or(RayError::DegenerateWall(segment.start.x, segment.start.y))?;
    if n.x > 0.0 || (n.x == 0.0 && n.y < 0.0) {
        Ok(-n)
    } else {
        Ok(n)
    }
}

/// Isotropic point transmitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransmitterSpec", into = "TransmitterSpec")]
pub struct Transmitter {
    pub position: Point,
    power: f64,
    freq: f64,
    wavelength: f64,
}

impl Transmitter {
    /// `power` in watts, `freq` in hertz
    pub fn new(position: Point, power: f64, freq: f64) -> RayResult<Self> {
        if !(freq > 0.0) || !freq.is_finite() {
            return Err(RayError::InvalidFrequency(freq));
        }
        if !(power >= 0.0) || !power.is_finite() {
            return Err(RayError::InvalidPower(power));
        }
        Ok(Self {
            position,
            power,
            freq,
            wavelength: SPEED_OF_LIGHT / freq,
        })
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }
}

/// Serialized form of a transmitter; the wavelength is always derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmitterSpec {
    pub position: Point,
    pub power: f64,
    pub freq: f64,
}

impl TryFrom<TransmitterSpec> for Transmitter {
    type Error = RayError;

    fn try_from(spec: TransmitterSpec) -> RayResult<Self> {
        Transmitter::new(spec.position, spec.power, spec.freq)
    }
}

impl From<Transmitter> for TransmitterSpec {
    fn from(t: Transmitter) -> Self {
        Self {
            position: t.position,
            power: t.power,
            freq: t.freq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub position: Point,
}

impl Receiver {
    pub fn new(position: Point) -> Self {
        Self { position }
    }
}

/// Rectangle `[0, width] x [0, height]` bounding the draw area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub width: f64,
    pub height: f64,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 300.0,
        }
    }
}

impl Boundary {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Bottom, left, right and top edges
    pub fn edges(&self) -> [Segment; 4] {
        let (w, h) = (self.width, self.height);
        [
            Segment::new(Point::new(0.0, 0.0), Point::new(w, 0.0)),
            Segment::new(Point::new(0.0, 0.0), Point::new(0.0, h)),
            Segment::new(Point::new(w, 0.0), Point::new(w, h)),
            Segment::new(Point::new(0.0, h), Point::new(w, h)),
        ]
    }

    pub fn contains(&self, point: &Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Borrowed view over any object placed in the scene
#[derive(Debug, Clone, Copy)]
pub enum SceneObject<'a> {
    Wall(&'a Wall),
    Transmitter(&'a Transmitter),
    Receiver(&'a Receiver),
}

impl SceneObject<'_> {
    pub fn distance_to(&self, point: &Point) -> f64 {
        match self {
            SceneObject::Wall(w) => w.distance_to(point),
            SceneObject::Transmitter(t) => t.position.distance_to(point),
            SceneObject::Receiver(r) => r.position.distance_to(point),
        }
    }
}

/// Everything the engine reads during a propagation run
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub walls: Vec<Wall>,
    pub transmitters: Vec<Transmitter>,
    pub receivers: Vec<Receiver>,
    pub materials: MaterialRegistry,
    pub boundary: Boundary,
}

impl Scene {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            ..Default::default()
        }
    }

    /// Add a wall made of a registered material
    pub fn add_wall(
        &mut self,
        start: Point,
        end: Point,
        material: &str,
        width: f64,
    ) -> RayResult<&Wall> {
        let material = self.materials.require(material)?;
        self.walls.push(Wall::new(start, end, material, width)?);
        Ok(&self.walls[self.walls.len() - 1])
    }

    pub fn add_transmitter(&mut self, transmitter: Transmitter) {
        self.transmitters.push(transmitter);
    }

    pub fn add_receiver(&mut self, receiver: Receiver) {
        self.receivers.push(receiver);
    }

    pub fn objects(&self) -> impl Iterator<Item = SceneObject<'_>> {
        self.walls
            .iter()
            .map(SceneObject::Wall)
            .chain(self.transmitters.iter().map(SceneObject::Transmitter))
            .chain(self.receivers.iter().map(SceneObject::Receiver))
    }

    /// Closest object to `point` within `max_distance`
    pub fn nearest_object(&self, point: &Point, max_distance: f64) -> Option<SceneObject<'_>> {
        self.objects()
            .map(|o| (o.distance_to(point), o))
            .filter(|(d, _)| *d <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, o)| o)
    }

    /// Drop all walls, keeping materials and props
    pub fn clear_walls(&mut self) {
        self.walls.clear();
    }
}
