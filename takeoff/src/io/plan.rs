//! Plan-scoped JSON persistence.
//!
//! One document per plan: the plan identifier, its calibration and every
//! measurement, with points on the wire as flat numeric arrays whose order
//! round-trips exactly.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::error::Error;
use crate::measurement::Measurement;
use crate::store::MeasurementStore;

/// Persisted takeoff document for one plan. The plan itself (image, project
/// membership) lives with an external collaborator; only its identifier is
/// carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTakeoff {
    pub plan_id: String,
    pub calibration: Option<Calibration>,
    pub measurements: Vec<Measurement>,
}

impl PlanTakeoff {
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            calibration: None,
            measurements: Vec::new(),
        }
    }

    /// Builds a store seeded with this plan's measurements and calibration.
    pub fn into_store(self) -> MeasurementStore {
        MeasurementStore::from_saved(self.measurements, self.calibration)
    }

    /// Snapshots a store back into a persistable document.
    pub fn from_store(plan_id: impl Into<String>, store: &MeasurementStore) -> Self {
        Self {
            plan_id: plan_id.into(),
            calibration: store.calibration().cloned(),
            measurements: store.measurements().to_vec(),
        }
    }
}

/// Reads a plan takeoff document from a JSON file.
pub fn read_plan_json(path: &str) -> Result<PlanTakeoff, Error> {
    let contents = crate::io::read_to_string(path)?;
    let plan: PlanTakeoff = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(plan)
}

/// Writes a plan takeoff document as pretty-printed JSON.
pub fn write_plan_json(path: &str, plan: &PlanTakeoff) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(plan).map_err(std::io::Error::other)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}
