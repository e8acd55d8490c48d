use std::path::Path;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use takeoff::costing::summarize;
use takeoff::export::{export_file_name, export_rows, ExportFormat};
use takeoff::geometry::points_from_flat;
use takeoff::io::plan::{read_plan_json, write_plan_json, PlanTakeoff};
use takeoff::measurement::MeasurementDraft;
use takeoff::{Calibration, Error, Shape};

#[derive(Parser)]
#[command(name = "takeoff_cli", about = "Headless takeoff measurement and costing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print per-division rollups and the grand total.
    Summary { plan: String },
    /// List measurements in the plan.
    List { plan: String },
    /// Set or replace the plan calibration and recompute all values.
    Calibrate {
        plan: String,
        #[arg(long)]
        pixel_distance: f64,
        #[arg(long)]
        real_distance: f64,
        #[arg(long, default_value = "ft")]
        unit: String,
    },
    /// Append a line measurement from a flat x,y coordinate list.
    AddLine {
        plan: String,
        /// Flat coordinate list: x0,y0,x1,y1,...
        #[arg(long, value_delimiter = ',')]
        points: Vec<f64>,
        #[arg(long, default_value = "")]
        division: String,
        #[arg(long, default_value = "")]
        subcategory: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value_t = 0.0)]
        price_per_unit: f64,
    },
    /// Append an area measurement from a flat x,y coordinate list.
    AddArea {
        plan: String,
        /// Flat coordinate list: x0,y0,x1,y1,... (ring closes implicitly)
        #[arg(long, value_delimiter = ',')]
        points: Vec<f64>,
        #[arg(long, default_value = "")]
        division: String,
        #[arg(long, default_value = "")]
        subcategory: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value_t = 0.0)]
        price_per_unit: f64,
    },
    /// Append a count marker at the given anchor.
    AddCount {
        plan: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, default_value = "")]
        division: String,
        #[arg(long, default_value = "")]
        subcategory: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value_t = 0.0)]
        price_per_unit: f64,
    },
    /// Render an export in the requested format.
    Export {
        plan: String,
        /// csv, excel or pdf
        #[arg(long)]
        format: String,
        #[arg(long)]
        project: String,
        #[arg(long, default_value = ".")]
        out_dir: String,
    },
}

/// Loads an existing plan document, or starts a fresh one named after the
/// file stem.
fn load_or_new(path: &str) -> Result<PlanTakeoff, Error> {
    if Path::new(path).exists() {
        read_plan_json(path)
    } else {
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("plan");
        log::info!("starting new plan takeoff {stem:?}");
        Ok(PlanTakeoff::new(stem))
    }
}

fn add_measurement(path: &str, mut draft: MeasurementDraft, meta: Meta) -> Result<(), Error> {
    let plan = load_or_new(path)?;
    let plan_id = plan.plan_id.clone();
    let mut store = plan.into_store();
    draft.division = meta.division;
    draft.subcategory = meta.subcategory;
    draft.label = meta.label;
    draft.price_per_unit = meta.price_per_unit;
    let id = store.create(draft);
    write_plan_json(path, &PlanTakeoff::from_store(plan_id, &store))?;
    println!("created measurement {id}");
    Ok(())
}

struct Meta {
    division: String,
    subcategory: String,
    label: String,
    price_per_unit: f64,
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Summary { plan } => {
            let store = read_plan_json(&plan)?.into_store();
            let summary = summarize(store.measurements());
            for div in &summary.divisions {
                println!(
                    "{}: {} items, subtotal {:.2}",
                    takeoff::divisions::display_label(&div.code),
                    div.items.len(),
                    div.subtotal_cost
                );
                let t = div.totals;
                println!(
                    "  line {:.2}  area {:.2}  count {:.0}  notes {}",
                    t.length, t.area, t.count, t.notes
                );
            }
            println!("grand total {:.2}", summary.grand_total);
        }
        Commands::List { plan } => {
            let store = read_plan_json(&plan)?.into_store();
            for m in store.measurements() {
                println!(
                    "{}\t{}\t{}\t{:.2} {}\t{:.2}",
                    m.id,
                    m.shape.kind(),
                    if m.label.is_empty() { "-" } else { &m.label },
                    m.value,
                    m.unit,
                    m.cost()
                );
            }
        }
        Commands::Calibrate {
            plan,
            pixel_distance,
            real_distance,
            unit,
        } => {
            let doc = load_or_new(&plan)?;
            let plan_id = doc.plan_id.clone();
            let mut store = doc.into_store();
            store.set_calibration(Calibration::new(pixel_distance, real_distance, &unit)?);
            write_plan_json(&plan, &PlanTakeoff::from_store(plan_id, &store))?;
            println!(
                "calibrated: {pixel_distance} px = {real_distance} {unit}; {} values recomputed",
                store.len()
            );
        }
        Commands::AddLine {
            plan,
            points,
            division,
            subcategory,
            label,
            price_per_unit,
        } => {
            let pts = points_from_flat(&points)?;
            let draft = MeasurementDraft::new(Shape::line(pts)?);
            add_measurement(
                &plan,
                draft,
                Meta {
                    division,
                    subcategory,
                    label,
                    price_per_unit,
                },
            )?;
        }
        Commands::AddArea {
            plan,
            points,
            division,
            subcategory,
            label,
            price_per_unit,
        } => {
            let pts = points_from_flat(&points)?;
            let draft = MeasurementDraft::new(Shape::area(pts)?);
            add_measurement(
                &plan,
                draft,
                Meta {
                    division,
                    subcategory,
                    label,
                    price_per_unit,
                },
            )?;
        }
        Commands::AddCount {
            plan,
            x,
            y,
            division,
            subcategory,
            label,
            price_per_unit,
        } => {
            let draft =
                MeasurementDraft::new(Shape::count(takeoff::geometry::Point::new(x, y)));
            add_measurement(
                &plan,
                draft,
                Meta {
                    division,
                    subcategory,
                    label,
                    price_per_unit,
                },
            )?;
        }
        Commands::Export {
            plan,
            format,
            project,
            out_dir,
        } => {
            let format = ExportFormat::from_str(&format)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            let store = read_plan_json(&plan)?.into_store();
            let rows = export_rows(&summarize(store.measurements()));
            let file_name =
                export_file_name(&project, chrono::Utc::now().date_naive(), format);
            let out_path = Path::new(&out_dir).join(&file_name);
            let out = out_path.to_string_lossy().into_owned();
            match format {
                ExportFormat::Csv => takeoff::reporting::write_csv(&out, &rows)?,
                #[cfg(feature = "reporting")]
                ExportFormat::Excel => takeoff::reporting::write_excel(&out, &rows)?,
                #[cfg(feature = "reporting")]
                ExportFormat::Pdf => {
                    takeoff::reporting::write_pdf(&out, &format!("Takeoff - {project}"), &rows)?
                }
                #[cfg(not(feature = "reporting"))]
                ExportFormat::Excel | ExportFormat::Pdf => {
                    return Err(Error::Persistence(std::io::Error::new(
                        std::io::ErrorKind::Unsupported,
                        "rebuild with --features reporting for excel/pdf output",
                    )));
                }
            }
            println!("{file_name} ({})", format.content_type());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
