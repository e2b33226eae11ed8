//! CSV export for the estimate cost breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sizing::Estimate;

/// Column header for the cost breakdown CSV.
const HEADER: &str = "component,capacity,unit,cost,cost_lakhs";

const LAKH: f64 = 1e5;

/// Exports the cost breakdown of `estimate` to a CSV file at the given path.
///
/// Writes a header row followed by one row per component and a `total` row.
///
/// # Arguments
///
/// * `estimate` - Completed estimate
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cost_csv(estimate: &Estimate, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_cost_csv(estimate, buf)
}

/// Writes the cost breakdown as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cost_csv(estimate: &Estimate, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let d = &estimate.design;

    wtr.write_record(HEADER.split(','))?;

    let rows = [
        ("pv_array", d.pv_kw, "kWp", d.pv_cost),
        ("inverter", d.inverter_kw, "kW", d.inverter_cost),
        ("battery", d.battery_kwh, "kWh", d.battery_cost),
    ];
    for (component, capacity, unit, cost) in rows {
        wtr.write_record(&[
            component.to_string(),
            format!("{capacity:.1}"),
            unit.to_string(),
            format!("{cost:.2}"),
            format!("{:.4}", cost / LAKH),
        ])?;
    }
    let total = d.total_cost();
    wtr.write_record(&[
        "total".to_string(),
        String::new(),
        String::new(),
        format!("{total:.2}"),
        format!("{:.4}", total / LAKH),
    ])?;

    wtr.flush()?;
    Ok(())
}
