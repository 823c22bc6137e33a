//! Partitioning configuration.
//!
//! Everything the core needs to know about the target printer and the search
//! behavior travels in one explicit [`ChopConfig`] value, passed into tree
//! construction and plane generation. There is no process-wide state, so
//! several configurations can be evaluated concurrently (and tests can run
//! in parallel).

use crate::errors::ConfigError;
use crate::float_types::{PI, Real};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Which volume estimate feeds the `utilization` objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationMode {
    /// Use the leaf's oriented-bounding-box volume (fast, pessimistic).
    #[default]
    Obb,
    /// Use the leaf's exact mesh volume.
    Mesh,
}

/// Weights of the aggregate objective. Lower aggregate is better; the
/// weighting is purely linear, so these are load-bearing for search behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub part: Real,
    pub utilization: Real,
    pub connector: Real,
    pub fragility: Real,
    pub seam: Real,
    pub symmetry: Real,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            part: 1.0,
            utilization: 0.25,
            connector: 1.0,
            fragility: 1.0,
            seam: 0.1,
            symmetry: 0.25,
        }
    }
}

impl ObjectiveWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("part", self.part),
            ("utilization", self.utilization),
            ("connector", self.connector),
            ("fragility", self.fragility),
            ("seam", self.seam),
            ("symmetry", self.symmetry),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidWeight(name));
            }
        }
        Ok(())
    }
}

/// Configuration for one partitioning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChopConfig {
    /// Usable build volume of the target printer, in model units.
    pub build_volume: Vector3<Real>,
    /// Spacing between candidate cutting planes along a direction.
    pub plane_spacing: Real,
    /// Also propose one plane through the middle of the part's extent.
    pub add_middle_plane: bool,
    pub utilization_mode: UtilizationMode,
    pub weights: ObjectiveWeights,
    /// Cutting planes whose normals differ by more than this angle
    /// (radians) count as different cuts for the diversity filter.
    pub diversity_angle_tolerance: Real,
    /// Cutting planes whose offsets differ by more than this distance
    /// count as different cuts for the diversity filter.
    pub diversity_offset_tolerance: Real,
}

impl Default for ChopConfig {
    fn default() -> Self {
        ChopConfig {
            build_volume: Vector3::new(200.0, 200.0, 200.0),
            plane_spacing: 20.0,
            add_middle_plane: false,
            utilization_mode: UtilizationMode::default(),
            weights: ObjectiveWeights::default(),
            diversity_angle_tolerance: PI / 18.0,
            diversity_offset_tolerance: 10.0,
        }
    }
}

impl ChopConfig {
    /// Check the configuration before any objective is computed from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_volume.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(ConfigError::InvalidBuildVolume);
        }
        if !self.plane_spacing.is_finite() || self.plane_spacing <= 0.0 {
            return Err(ConfigError::InvalidPlaneSpacing);
        }
        self.weights.validate()?;
        let tols = [
            self.diversity_angle_tolerance,
            self.diversity_offset_tolerance,
        ];
        if tols.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(ConfigError::InvalidTolerance);
        }
        Ok(())
    }

    /// Volume of one build volume.
    pub fn build_volume_capacity(&self) -> Real {
        self.build_volume.x * self.build_volume.y * self.build_volume.z
    }
}
