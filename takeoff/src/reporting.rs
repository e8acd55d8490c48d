//! Renderers turning export rows into CSV, Excel and PDF files.
//!
//! Every renderer consumes the row sequence from [`crate::export`] verbatim;
//! none re-derives any arithmetic. Excel and PDF output sit behind the
//! `reporting` feature.

use crate::export::ExportRow;
#[cfg(feature = "reporting")]
use genpdf::{elements::Paragraph, Alignment, Document};
#[cfg(feature = "reporting")]
use umya_spreadsheet::{self, writer::xlsx, Spreadsheet};

/// Writes the row sequence as CSV.
pub fn write_csv(path: &str, rows: &[ExportRow]) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::File::create(path)?;
    for row in rows {
        let line = row
            .cells()
            .iter()
            .map(|c| escape_csv(c))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{line}")?;
    }
    Ok(())
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes the row sequence as an xlsx workbook.
#[cfg(feature = "reporting")]
pub fn write_excel(path: &str, rows: &[ExportRow]) -> std::io::Result<()> {
    let mut wb: Spreadsheet = umya_spreadsheet::new_file();
    let ws = wb.get_sheet_mut(&0).unwrap();
    for (r_idx, row) in rows.iter().enumerate() {
        for (c_idx, val) in row.cells().iter().enumerate() {
            ws.get_cell_mut(((c_idx + 1) as u32, (r_idx + 1) as u32))
                .set_value(val);
        }
    }
    xlsx::write(&wb, path).map_err(|e| std::io::Error::other(e.to_string()))
}

/// Writes the row sequence as a simple tabular PDF.
#[cfg(feature = "reporting")]
pub fn write_pdf(path: &str, title: &str, rows: &[ExportRow]) -> std::io::Result<()> {
    // Load fonts from the crate's `assets` directory. The font files are not
    // stored in the repository; place them in `takeoff/assets` as needed.
    let font_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
    let font_family = genpdf::fonts::from_files(font_dir, "DejaVuSans", None)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut doc = Document::new(font_family);
    doc.set_title(title);
    for row in rows {
        let line = row
            .cells()
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("  ");
        doc.push(Paragraph::new(line).aligned(Alignment::Left));
    }
    doc.render_to_file(path)
        .map_err(|e| std::io::Error::other(e.to_string()))
}
