//! Grouping, rollups and costing of measurement sets.
//!
//! Measurements group by division code (ascending), then by subcategory in
//! first-occurrence order within the division. Value totals stay broken out
//! by measurement type; lengths, areas and counts are never summed together.

use std::collections::BTreeMap;

use crate::divisions;
use crate::measurement::{Measurement, MeasurementKind};

/// Per-type value totals for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TypeTotals {
    /// Total line length, in real-world length units.
    pub length: f64,
    /// Total area, in real-world area units.
    pub area: f64,
    /// Total counted items.
    pub count: f64,
    /// Number of text notes.
    pub notes: usize,
}

impl TypeTotals {
    fn add(&mut self, kind: MeasurementKind, value: f64) {
        match kind {
            MeasurementKind::Line => self.length += value,
            MeasurementKind::Area => self.area += value,
            MeasurementKind::Count => self.count += value,
            MeasurementKind::Text => self.notes += 1,
        }
    }
}

/// One measurement's contribution to a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub id: u64,
    pub label: String,
    pub kind: MeasurementKind,
    pub subcategory: String,
    pub value: f64,
    pub unit: String,
    pub price_per_unit: f64,
    pub cost: f64,
    pub notes: String,
}

/// Rollup for one division.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionSummary {
    /// Raw division code, also the fallback label for unknown codes.
    pub code: String,
    /// Human-readable taxonomy name, or the raw code when unknown.
    pub name: String,
    /// Items ordered by subcategory first occurrence, then creation order.
    pub items: Vec<ItemSummary>,
    pub totals: TypeTotals,
    pub subtotal_cost: f64,
}

/// Full costed rollup of a measurement set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TakeoffSummary {
    /// Divisions in ascending code order.
    pub divisions: Vec<DivisionSummary>,
    pub grand_total: f64,
}

/// Rolls a measurement set up into per-division, per-type totals and costs.
/// Pure and synchronous; safe to re-run on every mutation.
pub fn summarize(measurements: &[Measurement]) -> TakeoffSummary {
    let mut groups: BTreeMap<String, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        groups.entry(m.division.clone()).or_default().push(m);
    }

    let mut divisions_out = Vec::with_capacity(groups.len());
    let mut grand_total = 0.0;
    for (code, group) in groups {
        let name = divisions::division_name(&code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone());

        // Stable order: subcategory first occurrence, then creation order.
        let mut subcategory_order: Vec<&str> = Vec::new();
        for m in &group {
            if !subcategory_order.contains(&m.subcategory.as_str()) {
                subcategory_order.push(m.subcategory.as_str());
            }
        }

        let mut totals = TypeTotals::default();
        let mut subtotal_cost = 0.0;
        let mut items: Vec<ItemSummary> = Vec::with_capacity(group.len());
        for sub in &subcategory_order {
            for m in group.iter().filter(|m| m.subcategory == *sub) {
                let kind = m.shape.kind();
                let cost = m.cost();
                totals.add(kind, m.value);
                subtotal_cost += cost;
                items.push(ItemSummary {
                    id: m.id,
                    label: m.label.clone(),
                    kind,
                    subcategory: m.subcategory.clone(),
                    value: m.value,
                    unit: m.unit.clone(),
                    price_per_unit: m.price_per_unit,
                    cost,
                    notes: m.notes.clone(),
                });
            }
        }

        grand_total += subtotal_cost;
        divisions_out.push(DivisionSummary {
            code,
            name,
            items,
            totals,
            subtotal_cost,
        });
    }

    TakeoffSummary {
        divisions: divisions_out,
        grand_total,
    }
}
