//! Distance units and Euclidean geometry.
//!
//! Three unit systems are in play:
//!
//! - **raw**: coordinates as stored by the data source (metres).
//! - **canonical**: raw scaled down by `raw_per_canonical`; every cost,
//!   position and `maxHopDistance` inside the optimizer is canonical.
//! - **display**: what a user reads (light-years by default).

use serde::{Deserialize, Serialize};

/// Scale applied by the source data pipeline to astronomical coordinates.
pub const DEFAULT_RAW_PER_CANONICAL: f64 = 1e15;

/// One light-year in metres.
pub const METRES_PER_LIGHT_YEAR: f64 = 9.460_730_472_580_8e15;

/// A point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`, in whatever unit both points share.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn scaled(&self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Converts between raw, canonical and display distance units.
///
/// # Examples
///
/// ```
/// use u_itinerary::distance::{DistanceModel, Position};
///
/// let model = DistanceModel::default();
/// let a = model.position_from_raw(Position::new(0.0, 0.0, 0.0));
/// let b = model.position_from_raw(Position::new(3e15, 4e15, 0.0));
/// assert!((a.distance(&b) - 5.0).abs() < 1e-12);
/// assert!((model.to_display(5.0) - 5e15 / 9.460_730_472_580_8e15).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceModel {
    /// Raw units per canonical unit.
    pub raw_per_canonical: f64,
    /// Raw units per display unit.
    pub raw_per_display: f64,
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self {
            raw_per_canonical: DEFAULT_RAW_PER_CANONICAL,
            raw_per_display: METRES_PER_LIGHT_YEAR,
        }
    }
}

impl DistanceModel {
    pub fn with_raw_per_canonical(mut self, factor: f64) -> Self {
        self.raw_per_canonical = factor;
        self
    }

    pub fn with_raw_per_display(mut self, factor: f64) -> Self {
        self.raw_per_display = factor;
        self
    }

    /// Validates the model.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("raw_per_canonical", self.raw_per_canonical),
            ("raw_per_display", self.raw_per_display),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive and finite, got {value}"));
            }
        }
        Ok(())
    }

    pub fn to_canonical(&self, raw: f64) -> f64 {
        raw / self.raw_per_canonical
    }

    pub fn to_display(&self, canonical: f64) -> f64 {
        canonical * self.raw_per_canonical / self.raw_per_display
    }

    pub fn position_from_raw(&self, raw: Position) -> Position {
        raw.scaled(1.0 / self.raw_per_canonical)
    }
}
