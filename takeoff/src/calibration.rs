//! Pixel-to-real-world calibration.
//!
//! A calibration maps a reference distance measured in plan-image pixels to
//! the real-world distance it represents. Lengths convert by the linear scale
//! factor, areas by its square; counts and text anchors are unit-less and
//! unaffected.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// User-established mapping between pixel distance and real-world distance
/// for one plan image. Both distances are validated at construction, so an
/// existing `Calibration` always has a usable scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalibrationRecord", into = "CalibrationRecord")]
pub struct Calibration {
    pixel_distance: f64,
    real_distance: f64,
    unit: String,
}

/// Raw persisted form; validated into [`Calibration`] on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalibrationRecord {
    pixel_distance: f64,
    real_distance: f64,
    unit: String,
}

impl Calibration {
    /// Creates a calibration from a reference segment.
    ///
    /// Fails with [`Error::InvalidCalibration`] when either distance is zero,
    /// negative or not finite, or when the pixel distance is so close to zero
    /// that the derived scale overflows or underflows.
    pub fn new(pixel_distance: f64, real_distance: f64, unit: &str) -> Result<Self, Error> {
        let scale = real_distance / pixel_distance;
        if !(pixel_distance.is_finite() && real_distance.is_finite())
            || pixel_distance <= 0.0
            || real_distance <= 0.0
            || !scale.is_finite()
            || scale <= 0.0
        {
            return Err(Error::InvalidCalibration {
                pixel: pixel_distance,
                real: real_distance,
            });
        }
        Ok(Self {
            pixel_distance,
            real_distance,
            unit: unit.to_string(),
        })
    }

    /// Reference distance in pixel space.
    pub fn pixel_distance(&self) -> f64 {
        self.pixel_distance
    }

    /// Real-world distance the reference segment represents.
    pub fn real_distance(&self) -> f64 {
        self.real_distance
    }

    /// Real-world unit label, e.g. `ft`.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Linear pixel-to-real conversion factor.
    pub fn scale(&self) -> f64 {
        self.real_distance / self.pixel_distance
    }

    /// Converts a pixel-space length to real-world units.
    pub fn to_real_length(&self, pixel_length: f64) -> f64 {
        pixel_length * self.scale()
    }

    /// Converts a pixel-space area to real-world units (scale squared).
    pub fn to_real_area(&self, pixel_area: f64) -> f64 {
        pixel_area * self.scale() * self.scale()
    }
}

impl TryFrom<CalibrationRecord> for Calibration {
    type Error = Error;

    fn try_from(rec: CalibrationRecord) -> Result<Self, Error> {
        Calibration::new(rec.pixel_distance, rec.real_distance, &rec.unit)
    }
}

impl From<Calibration> for CalibrationRecord {
    fn from(cal: Calibration) -> Self {
        Self {
            pixel_distance: cal.pixel_distance,
            real_distance: cal.real_distance,
            unit: cal.unit,
        }
    }
}
