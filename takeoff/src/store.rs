//! In-memory store owning the canonical measurement set for one plan.
//!
//! Raw pixel points are the source of truth; derived values are recomputed
//! whenever points or the calibration change, so recalibrating reinterprets
//! every measurement without data loss. The store assumes a single
//! interactive writer; every operation completes before any read observes it.

use chrono::Utc;
use log::debug;

use crate::calibration::Calibration;
use crate::error::Error;
use crate::geometry::Point;
use crate::measurement::{Measurement, MeasurementDraft, MeasurementPatch, Shape};

/// CRUD store for the measurements of one plan.
#[derive(Debug, Clone, Default)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
    calibration: Option<Calibration>,
    next_id: u64,
}

impl MeasurementStore {
    /// Creates an empty store with no calibration (values stay in pixels).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with an initial calibration.
    pub fn with_calibration(calibration: Calibration) -> Self {
        Self {
            calibration: Some(calibration),
            ..Self::default()
        }
    }

    /// Rebuilds a store from persisted records, preserving ids. Cached values
    /// are not trusted: every value is re-derived from the raw points and the
    /// loaded calibration.
    pub fn from_saved(
        measurements: Vec<Measurement>,
        calibration: Option<Calibration>,
    ) -> Self {
        let next_id = measurements.iter().map(|m| m.id + 1).max().unwrap_or(0);
        let mut store = Self {
            measurements,
            calibration,
            next_id,
        };
        store.recompute_all();
        store
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Replaces the calibration and recomputes every derived value. Stored
    /// points are untouched.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = Some(calibration);
        self.recompute_all();
        debug!("calibration replaced; {} values recomputed", self.measurements.len());
    }

    /// Re-derives `value` for every measurement under the current calibration.
    pub fn recompute_all(&mut self) {
        let cal = self.calibration.clone();
        for m in &mut self.measurements {
            m.value = m.shape.value(cal.as_ref());
        }
    }

    /// Stores a new measurement, assigning its id and computing the initial
    /// value under the current calibration. Returns the assigned id.
    pub fn create(&mut self, draft: MeasurementDraft) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let value = draft.shape.value(self.calibration.as_ref());
        let unit = draft
            .unit
            .unwrap_or_else(|| draft.shape.kind().default_unit(self.calibration.as_ref()));
        self.measurements.push(Measurement {
            id,
            shape: draft.shape,
            label: draft.label,
            division: draft.division,
            subcategory: draft.subcategory,
            layer: draft.layer,
            material_type: draft.material_type,
            price_per_unit: draft.price_per_unit,
            notes: draft.notes,
            unit,
            value,
            created_at: Utc::now(),
        });
        debug!("created measurement {id}");
        id
    }

    pub fn get(&self, id: u64) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == id)
    }

    /// All measurements in stable id (creation) order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Applies a metadata and/or point patch. Point patches revalidate the
    /// shape's minimum and recompute the value; the record is only written
    /// once the whole patch has validated.
    pub fn update(&mut self, id: u64, patch: MeasurementPatch) -> Result<(), Error> {
        let cal = self.calibration.clone();
        let m = self
            .measurements
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::NotFound(id))?;

        let new_shape = match patch.points {
            Some(points) => Some(replace_points(&m.shape, points)?),
            None => None,
        };

        if let Some(shape) = new_shape {
            m.shape = shape;
            m.value = m.shape.value(cal.as_ref());
        }
        if let Some(text) = patch.text {
            if let Shape::Text { text: t, .. } = &mut m.shape {
                *t = text;
            }
        }
        if let Some(label) = patch.label {
            m.label = label;
        }
        if let Some(division) = patch.division {
            m.division = division;
        }
        if let Some(subcategory) = patch.subcategory {
            m.subcategory = subcategory;
        }
        if let Some(layer) = patch.layer {
            m.layer = layer;
        }
        if let Some(material_type) = patch.material_type {
            m.material_type = material_type;
        }
        if let Some(price) = patch.price_per_unit {
            m.price_per_unit = price;
        }
        if let Some(notes) = patch.notes {
            m.notes = notes;
        }
        if let Some(unit) = patch.unit {
            m.unit = unit;
        }
        debug!("updated measurement {id}");
        Ok(())
    }

    /// Removes and returns the measurement with `id`.
    pub fn delete(&mut self, id: u64) -> Result<Measurement, Error> {
        let idx = self
            .measurements
            .iter()
            .position(|m| m.id == id)
            .ok_or(Error::NotFound(id))?;
        debug!("deleted measurement {id}");
        Ok(self.measurements.remove(idx))
    }

    /// Topmost (most recently created) measurement within `tol` pixels of a
    /// pointer location.
    pub fn hit_test(&self, p: Point, tol: f64) -> Option<u64> {
        self.measurements
            .iter()
            .rev()
            .find(|m| m.shape.hits(p, tol))
            .map(|m| m.id)
    }
}

/// Swaps a shape's coordinates for `points`, keeping the variant and
/// enforcing its minimum point count.
fn replace_points(shape: &Shape, points: Vec<Point>) -> Result<Shape, Error> {
    match shape {
        Shape::Line { .. } => Shape::line(points),
        Shape::Area { .. } => Shape::area(points),
        Shape::Count { .. } | Shape::Text { .. } => {
            if points.len() != 1 {
                return Err(Error::InvalidShape {
                    kind: "anchor",
                    expected: 1,
                    got: points.len(),
                });
            }
            Ok(match shape {
                Shape::Text { text, .. } => Shape::text(points[0], text.clone()),
                _ => Shape::count(points[0]),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementDraft;

    fn line_draft(points: &[(f64, f64)]) -> MeasurementDraft {
        let pts = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        MeasurementDraft::new(Shape::line(pts).unwrap())
    }

    #[test]
    fn create_assigns_sequential_ids_and_value() {
        let cal = Calibration::new(10.0, 1.0, "ft").unwrap();
        let mut store = MeasurementStore::with_calibration(cal);
        let a = store.create(line_draft(&[(0.0, 0.0), (100.0, 0.0)]));
        let b = store.create(line_draft(&[(0.0, 0.0), (50.0, 0.0)]));
        assert_eq!((a, b), (0, 1));
        assert!((store.get(a).unwrap().value - 10.0).abs() < 1e-9);
        assert_eq!(store.get(a).unwrap().unit, "ft");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = MeasurementStore::new();
        let err = store.update(42, MeasurementPatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(42)));
        assert!(matches!(store.delete(42).unwrap_err(), Error::NotFound(42)));
    }

    #[test]
    fn point_patch_recomputes_value() {
        let cal = Calibration::new(10.0, 1.0, "ft").unwrap();
        let mut store = MeasurementStore::with_calibration(cal);
        let id = store.create(line_draft(&[(0.0, 0.0), (100.0, 0.0)]));
        store
            .update(
                id,
                MeasurementPatch {
                    points: Some(vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0)]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!((store.get(id).unwrap().value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn bad_point_patch_leaves_record_untouched() {
        let mut store = MeasurementStore::new();
        let id = store.create(line_draft(&[(0.0, 0.0), (3.0, 4.0)]));
        let before = store.get(id).unwrap().clone();
        let err = store
            .update(
                id,
                MeasurementPatch {
                    points: Some(vec![Point::new(0.0, 0.0)]),
                    label: Some("should not land".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
        assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn recalibration_changes_values_not_points() {
        let mut store =
            MeasurementStore::with_calibration(Calibration::new(200.0, 20.0, "ft").unwrap());
        let id = store.create(line_draft(&[(0.0, 0.0), (100.0, 0.0)]));
        let points_before = store.get(id).unwrap().shape.points().to_vec();
        assert!((store.get(id).unwrap().value - 10.0).abs() < 1e-9);

        store.set_calibration(Calibration::new(100.0, 20.0, "ft").unwrap());
        let m = store.get(id).unwrap();
        assert!((m.value - 20.0).abs() < 1e-9);
        assert_eq!(m.shape.points(), points_before.as_slice());
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut store = MeasurementStore::new();
        let _under = store.create(line_draft(&[(0.0, 0.0), (10.0, 0.0)]));
        let over = store.create(line_draft(&[(0.0, 1.0), (10.0, 1.0)]));
        assert_eq!(store.hit_test(Point::new(5.0, 0.5), 2.0), Some(over));
        assert_eq!(store.hit_test(Point::new(50.0, 50.0), 2.0), None);
    }
}
