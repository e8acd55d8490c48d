//! Measurement records and their geometry variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::error::Error;
use crate::geometry::{self, Point};

/// Measurement geometry, tagged by takeoff type.
///
/// Each variant carries only the fields valid for it; point minimums are
/// enforced at construction. On the wire every variant serializes its
/// coordinates as a flat `[x0, y0, ...]` array under `points`, with point
/// order preserved exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Open polyline traced along a run; length takeoff.
    Line {
        #[serde(with = "geometry::flat")]
        points: Vec<Point>,
    },
    /// Closed ring (implicit closure); area takeoff.
    Area {
        #[serde(with = "geometry::flat")]
        points: Vec<Point>,
    },
    /// Single anchor marking one counted item.
    Count {
        #[serde(rename = "points", with = "geometry::flat_point")]
        anchor: Point,
    },
    /// Single anchor carrying a free-form note.
    Text {
        #[serde(rename = "points", with = "geometry::flat_point")]
        anchor: Point,
        text: String,
    },
}

impl Shape {
    /// Builds a line shape; fails unless at least two points are given.
    pub fn line(points: Vec<Point>) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::InvalidShape {
                kind: "line",
                expected: 2,
                got: points.len(),
            });
        }
        Ok(Self::Line { points })
    }

    /// Builds an area shape; fails unless at least three vertices are given.
    pub fn area(points: Vec<Point>) -> Result<Self, Error> {
        if points.len() < 3 {
            return Err(Error::InvalidShape {
                kind: "area",
                expected: 3,
                got: points.len(),
            });
        }
        Ok(Self::Area { points })
    }

    /// Builds a count marker at `anchor`.
    pub fn count(anchor: Point) -> Self {
        Self::Count { anchor }
    }

    /// Builds a text note anchored at `anchor`.
    pub fn text(anchor: Point, text: impl Into<String>) -> Self {
        Self::Text {
            anchor,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::Line { .. } => MeasurementKind::Line,
            Self::Area { .. } => MeasurementKind::Area,
            Self::Count { .. } => MeasurementKind::Count,
            Self::Text { .. } => MeasurementKind::Text,
        }
    }

    /// Raw pixel-space points of the shape, in traced order.
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Line { points } | Self::Area { points } => points,
            Self::Count { anchor } | Self::Text { anchor, .. } => std::slice::from_ref(anchor),
        }
    }

    /// Derived scalar value under `calibration`: real-world length for lines,
    /// real-world area for areas, 1.0 for counts and text notes. Without a
    /// calibration, lengths and areas stay in pixel units.
    pub fn value(&self, calibration: Option<&Calibration>) -> f64 {
        match self {
            Self::Line { points } => {
                let px = geometry::line_length(points);
                calibration.map_or(px, |c| c.to_real_length(px))
            }
            Self::Area { points } => {
                let px = geometry::polygon_area(points);
                calibration.map_or(px, |c| c.to_real_area(px))
            }
            Self::Count { .. } | Self::Text { .. } => 1.0,
        }
    }

    /// Tests whether a pointer location hits the shape within `tol` pixels.
    pub fn hits(&self, p: Point, tol: f64) -> bool {
        match self {
            Self::Line { points } => points
                .windows(2)
                .any(|seg| geometry::point_segment_distance(p, seg[0], seg[1]) <= tol),
            Self::Area { points } => {
                if geometry::point_in_polygon(p, points) {
                    return true;
                }
                (0..points.len()).any(|i| {
                    let j = (i + 1) % points.len();
                    geometry::point_segment_distance(p, points[i], points[j]) <= tol
                })
            }
            Self::Count { anchor } | Self::Text { anchor, .. } => {
                geometry::distance(p, *anchor) <= tol
            }
        }
    }
}

/// Discriminant used when rolling values up by measurement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Line,
    Area,
    Count,
    Text,
}

impl MeasurementKind {
    /// Default unit label under `calibration` (pixel units when absent).
    pub fn default_unit(&self, calibration: Option<&Calibration>) -> String {
        let base = calibration.map_or("px", |c| c.unit());
        match self {
            Self::Line => base.to_string(),
            Self::Area => format!("sq {base}"),
            Self::Count => "count".to_string(),
            Self::Text => "note".to_string(),
        }
    }
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Line => "line",
            Self::Area => "area",
            Self::Count => "count",
            Self::Text => "text",
        };
        f.write_str(s)
    }
}

/// A stored takeoff measurement.
///
/// `id` and `created_at` are assigned by the store and immutable. `value` is
/// a cache of [`Shape::value`] under the store's current calibration; it is
/// recomputed on creation, on point edits and on recalibration, never edited
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: u64,
    #[serde(flatten)]
    pub shape: Shape,
    pub label: String,
    pub division: String,
    pub subcategory: String,
    pub layer: String,
    pub material_type: String,
    #[serde(default)]
    pub price_per_unit: f64,
    pub notes: String,
    pub unit: String,
    pub value: f64,
    pub created_at: DateTime<Utc>,
}

impl Measurement {
    /// Cost contribution: derived value times unit price (price defaults 0).
    pub fn cost(&self) -> f64 {
        self.value * self.price_per_unit
    }
}

/// Fields supplied when creating a measurement; the store fills in the rest.
#[derive(Debug, Clone)]
pub struct MeasurementDraft {
    pub shape: Shape,
    pub label: String,
    pub division: String,
    pub subcategory: String,
    pub layer: String,
    pub material_type: String,
    pub price_per_unit: f64,
    pub notes: String,
    /// Overrides the kind's default unit when set.
    pub unit: Option<String>,
}

impl MeasurementDraft {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            label: String::new(),
            division: String::new(),
            subcategory: String::new(),
            layer: String::new(),
            material_type: String::new(),
            price_per_unit: 0.0,
            notes: String::new(),
            unit: None,
        }
    }
}

/// Partial update applied through [`crate::store::MeasurementStore::update`].
/// A `points` patch replaces the shape's coordinates (revalidating the
/// variant's minimum) and triggers a value recomputation.
#[derive(Debug, Clone, Default)]
pub struct MeasurementPatch {
    pub label: Option<String>,
    pub division: Option<String>,
    pub subcategory: Option<String>,
    pub layer: Option<String>,
    pub material_type: Option<String>,
    pub price_per_unit: Option<f64>,
    pub notes: Option<String>,
    pub unit: Option<String>,
    pub text: Option<String>,
    pub points: Option<Vec<Point>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_constructors_enforce_minimums() {
        assert!(Shape::line(vec![Point::new(0.0, 0.0)]).is_err());
        assert!(Shape::line(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_ok());
        assert!(Shape::area(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_err());
        assert!(Shape::area(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ])
        .is_ok());
    }

    #[test]
    fn value_applies_calibration() {
        let cal = Calibration::new(200.0, 20.0, "ft").unwrap();
        let line = Shape::line(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]).unwrap();
        assert!((line.value(Some(&cal)) - 10.0).abs() < 1e-9);
        assert!((line.value(None) - 100.0).abs() < 1e-9);

        let area = Shape::area(vec![
            Point::new(0.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 200.0),
            Point::new(0.0, 200.0),
        ])
        .unwrap();
        assert!((area.value(Some(&cal)) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn count_and_text_are_unit_less() {
        let cal = Calibration::new(2.0, 100.0, "ft").unwrap();
        assert_eq!(Shape::count(Point::new(1.0, 1.0)).value(Some(&cal)), 1.0);
        assert_eq!(
            Shape::text(Point::new(1.0, 1.0), "rebar note").value(Some(&cal)),
            1.0
        );
    }

    #[test]
    fn wire_format_is_flat_points() {
        let shape = Shape::line(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]).unwrap();
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["points"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn hit_testing() {
        let line = Shape::line(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]).unwrap();
        assert!(line.hits(Point::new(5.0, 2.0), 3.0));
        assert!(!line.hits(Point::new(5.0, 8.0), 3.0));

        let area = Shape::area(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(area.hits(Point::new(5.0, 5.0), 0.0));
        assert!(area.hits(Point::new(-1.0, 5.0), 2.0));
        assert!(!area.hits(Point::new(-9.0, 5.0), 2.0));
    }
}
