use takeoff::costing::summarize;
use takeoff::export::{export_rows, RowKind};
use takeoff::geometry::Point;
use takeoff::measurement::{MeasurementDraft, Shape};
use takeoff::{Calibration, MeasurementStore};

fn sample_store() -> MeasurementStore {
    // 1px = 1ft so pixel quantities read directly as real values.
    let mut store = MeasurementStore::with_calibration(Calibration::new(1.0, 1.0, "ft").unwrap());

    let mut line = MeasurementDraft::new(
        Shape::line(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]).unwrap(),
    );
    line.division = "03".into();
    line.label = "Footing run".into();
    line.price_per_unit = 5.0;
    store.create(line);

    let mut area = MeasurementDraft::new(
        Shape::area(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap(),
    );
    area.division = "03".into();
    area.label = "Slab".into();
    area.price_per_unit = 2.0;
    store.create(area);

    for i in 0..4 {
        let mut count = MeasurementDraft::new(Shape::count(Point::new(i as f64, 0.0)));
        count.division = "09".into();
        count.label = format!("Fixture {}", i + 1);
        count.price_per_unit = 50.0;
        store.create(count);
    }
    store
}

#[test]
fn division_costs_roll_up() {
    let store = sample_store();
    let summary = summarize(store.measurements());

    assert_eq!(summary.divisions.len(), 2);
    assert_eq!(summary.divisions[0].code, "03");
    assert!((summary.divisions[0].subtotal_cost - 250.0).abs() < 1e-9);
    assert!((summary.divisions[1].subtotal_cost - 200.0).abs() < 1e-9);
    assert!((summary.grand_total - 450.0).abs() < 1e-9);

    let t03 = summary.divisions[0].totals;
    assert!((t03.length - 10.0).abs() < 1e-9);
    assert!((t03.area - 100.0).abs() < 1e-9);
    assert_eq!(t03.count, 0.0);
}

#[test]
fn export_row_sequence() {
    let store = sample_store();
    let rows = export_rows(&summarize(store.measurements()));

    let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        [
            RowKind::Header,
            RowKind::DivisionTotal, // 03
            RowKind::Item,
            RowKind::Item,
            RowKind::Spacer,
            RowKind::DivisionTotal, // 09
            RowKind::Item,
            RowKind::Item,
            RowKind::Item,
            RowKind::Item,
            RowKind::Spacer,
            RowKind::GrandTotal,
        ]
    );

    assert_eq!(rows[1].label, "03 - Concrete");
    assert_eq!(rows[1].cost, Some(250.0));
    assert_eq!(rows[5].cost, Some(200.0));
    assert_eq!(rows.last().unwrap().cost, Some(450.0));
    // Uncategorized items surface under the synthetic "General" label.
    assert_eq!(rows[2].description, "General");
}

#[test]
fn csv_render_consumes_rows_verbatim() {
    let store = sample_store();
    let rows = export_rows(&summarize(store.measurements()));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    takeoff::reporting::write_csv(path.to_str().unwrap(), &rows).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), rows.len());
    assert!(lines[0].starts_with("Division / Item,Quantity,Unit,Cost,Description"));
    assert!(lines[1].contains("03 - Concrete"));
    assert!(lines.last().unwrap().contains("450.00"));
}
