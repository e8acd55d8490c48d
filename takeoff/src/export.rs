//! Format-agnostic export rows consumed by the CSV, Excel and PDF renderers.
//!
//! The formatter only shuffles already-computed values and costs into a fixed
//! row sequence; it performs no geometry or calibration math of its own.

use chrono::NaiveDate;

use crate::costing::{DivisionSummary, TakeoffSummary};
use crate::divisions;
use crate::measurement::MeasurementKind;

/// Row roles, in the order they appear in a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    DivisionTotal,
    Item,
    Spacer,
    GrandTotal,
}

/// Fixed-shape export row; every renderer consumes the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub kind: RowKind,
    pub label: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub cost: Option<f64>,
    pub description: String,
}

impl ExportRow {
    fn spacer() -> Self {
        Self {
            kind: RowKind::Spacer,
            label: String::new(),
            quantity: None,
            unit: String::new(),
            cost: None,
            description: String::new(),
        }
    }

    /// Flattens the row into display cells: label, quantity, unit, cost,
    /// description. Renderers emit these verbatim.
    pub fn cells(&self) -> [String; 5] {
        match self.kind {
            RowKind::Header => [
                "Division / Item".to_string(),
                "Quantity".to_string(),
                "Unit".to_string(),
                "Cost".to_string(),
                "Description".to_string(),
            ],
            _ => [
                self.label.clone(),
                self.quantity.map(|q| format!("{q:.2}")).unwrap_or_default(),
                self.unit.clone(),
                self.cost.map(|c| format!("{c:.2}")).unwrap_or_default(),
                self.description.clone(),
            ],
        }
    }
}

/// Output format requested by the export consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format {other:?}")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Pdf => "pdf",
        };
        f.write_str(s)
    }
}

/// Output filename following the `takeoff-{project}-{iso-date}.{ext}` pattern.
pub fn export_file_name(project: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "takeoff-{project}-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Builds the ordered row sequence: header, then per division a total row
/// followed by its item rows and a spacer, ending with a grand-total row.
pub fn export_rows(summary: &TakeoffSummary) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(summary.divisions.len() * 4 + 2);
    rows.push(ExportRow {
        kind: RowKind::Header,
        label: String::new(),
        quantity: None,
        unit: String::new(),
        cost: None,
        description: String::new(),
    });

    for div in &summary.divisions {
        rows.push(division_total_row(div));
        for item in &div.items {
            let label = if item.label.is_empty() {
                format!("{} #{}", item.kind, item.id)
            } else {
                item.label.clone()
            };
            let subcategory = if item.subcategory.is_empty() {
                "General".to_string()
            } else {
                item.subcategory.clone()
            };
            let description = if item.notes.is_empty() {
                subcategory
            } else {
                format!("{subcategory}: {}", item.notes)
            };
            rows.push(ExportRow {
                kind: RowKind::Item,
                label,
                quantity: Some(item.value),
                unit: item.unit.clone(),
                cost: Some(item.cost),
                description,
            });
        }
        rows.push(ExportRow::spacer());
    }

    rows.push(ExportRow {
        kind: RowKind::GrandTotal,
        label: "Grand Total".to_string(),
        quantity: None,
        unit: String::new(),
        cost: Some(summary.grand_total),
        description: String::new(),
    });
    rows
}

fn division_total_row(div: &DivisionSummary) -> ExportRow {
    // Break the totals out per type actually present in the division; a zero
    // total still renders when items of that kind exist.
    let has = |kind: MeasurementKind| div.items.iter().any(|i| i.kind == kind);
    let mut parts = Vec::new();
    let t = &div.totals;
    if has(MeasurementKind::Line) {
        parts.push(format!("line {:.2}", t.length));
    }
    if has(MeasurementKind::Area) {
        parts.push(format!("area {:.2}", t.area));
    }
    if has(MeasurementKind::Count) {
        parts.push(format!("count {:.0}", t.count));
    }
    if has(MeasurementKind::Text) {
        parts.push(format!("notes {}", t.notes));
    }
    ExportRow {
        kind: RowKind::DivisionTotal,
        label: divisions::display_label(&div.code),
        quantity: None,
        unit: String::new(),
        cost: Some(div.subtotal_cost),
        description: parts.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(
            export_file_name("riverside", date, ExportFormat::Csv),
            "takeoff-riverside-2026-08-25.csv"
        );
        assert_eq!(
            export_file_name("riverside", date, ExportFormat::Excel),
            "takeoff-riverside-2026-08-25.xlsx"
        );
    }

    #[test]
    fn format_parsing_and_content_types() {
        use std::str::FromStr;
        assert_eq!(ExportFormat::from_str("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("excel").unwrap(), ExportFormat::Excel);
        assert!(ExportFormat::from_str("docx").is_err());
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
    }

    #[test]
    fn zero_total_still_lists_present_types() {
        use crate::costing::summarize;
        use crate::geometry::Point;
        use crate::measurement::{MeasurementDraft, Shape};
        use crate::MeasurementStore;

        let mut store = MeasurementStore::new();
        // Degenerate run traced over two coincident points: length 0.
        let mut d = MeasurementDraft::new(
            Shape::line(vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0)]).unwrap(),
        );
        d.division = "05".into();
        store.create(d);

        let rows = export_rows(&summarize(store.measurements()));
        assert_eq!(rows[1].kind, RowKind::DivisionTotal);
        assert_eq!(rows[1].description, "line 0.00");
    }

    #[test]
    fn empty_summary_still_has_header_and_grand_total() {
        let rows = export_rows(&TakeoffSummary::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, RowKind::Header);
        assert_eq!(rows[1].kind, RowKind::GrandTotal);
        assert_eq!(rows[1].cost, Some(0.0));
    }
}
