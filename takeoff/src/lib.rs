//! Core library for the takeoff measurement and costing engine.
//!
//! Measurements are traced over a plan image in pixel space, converted to
//! real-world units through a user-established calibration, classified against
//! the construction division taxonomy and rolled up into costed report tables.

pub mod calibration;
pub mod costing;
pub mod divisions;
pub mod drawing;
pub mod error;
pub mod export;
pub mod geometry;
pub mod io;
pub mod measurement;
pub mod reporting;
pub mod store;

pub use calibration::Calibration;
pub use error::Error;
pub use measurement::{Measurement, MeasurementKind, Shape};
pub use store::MeasurementStore;
