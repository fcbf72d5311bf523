//! Engine configuration
//!
//! Numeric tolerances and process-wide physics switches consumed by the ray
//! engine. The defaults reproduce the values the editor was tuned against.

use serde::{Deserialize, Serialize};

use crate::geometry::{FLOAT_COMP, FLOAT_ZERO};

/// Field polarization used by the Fresnel reflection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarization {
    /// Transverse electric (E perpendicular to the plane of incidence)
    Te,
    /// Transverse magnetic (E in the plane of incidence)
    Tm,
}

impl Default for Polarization {
    fn default() -> Self {
        Self::Te
    }
}

/// Test used to skip walls running parallel to a ray before intersecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelCheck {
    /// Skip only when the wall vector equals the ray direction component-wise.
    /// Misses most parallel walls; kept for reproducing legacy traces.
    ExactDirection,
    /// Skip when the cross product of the unit wall and ray directions is
    /// below `float_zero`
    CrossProduct,
}

impl Default for ParallelCheck {
    fn default() -> Self {
        Self::CrossProduct
    }
}

/// Ray engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tolerance of the point-on-segment test in scene units
    pub segment_tolerance: f64,
    /// Near-zero threshold for intersection determinants and distances
    pub float_zero: f64,
    /// Polarization for Fresnel reflection
    pub polarization: Polarization,
    /// Parallel-wall detection in free propagation
    pub parallel_check: ParallelCheck,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segment_tolerance: FLOAT_COMP,
            float_zero: FLOAT_ZERO,
            polarization: Polarization::Te,
            parallel_check: ParallelCheck::CrossProduct,
        }
    }
}

impl EngineConfig {
    /// Tight tolerances for scenes built from exact coordinates
    pub fn strict() -> Self {
        Self {
            segment_tolerance: 1e-6,
            float_zero: 1e-9,
            ..Default::default()
        }
    }

    /// Legacy behaviour, including the exact-match parallel test
    pub fn legacy() -> Self {
        Self {
            parallel_check: ParallelCheck::ExactDirection,
            ..Default::default()
        }
    }

    pub fn with_polarization(mut self, polarization: Polarization) -> Self {
        self.polarization = polarization;
        self
    }

    pub fn with_segment_tolerance(mut self, tol: f64) -> Self {
        self.segment_tolerance = tol;
        self
    }
}
