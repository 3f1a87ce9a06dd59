use serde::{Deserialize, Serialize};

use crate::processing::fusion::FusionMethod;

/// Upper bound on `duration * fs` unless a caller overrides it.
pub const DEFAULT_MAX_SAMPLES: usize = 10_000_000;

/// Shared configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub max_samples: usize,
    pub fusion: FusionMethod,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            fusion: FusionMethod::default(),
        }
    }
}

/// Planar coordinate in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Bearing from `self` towards `other`, degrees, atan2 convention.
    pub fn bearing_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Common error type for every pipeline stage.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AvsError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("insufficient geometry: {0}")]
    InsufficientGeometry(String),
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl AvsError {
    /// Stable name of the failure class, used for telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            AvsError::InvalidParameter(_) => "invalid_parameter",
            AvsError::InvalidGeometry(_) => "invalid_geometry",
            AvsError::InsufficientGeometry(_) => "insufficient_geometry",
            AvsError::NumericDegeneracy(_) => "numeric_degeneracy",
        }
    }
}

pub type AvsResult<T> = Result<T, AvsError>;
