//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SimError;
use crate::sim::types::StepResult;

/// Column header for CSV telemetry export.
pub const HEADER: &str = "step,timestamp,sun_altitude_deg,sun_azimuth_deg,weather,irradiance,\
                          active_power_w,consumption_w,net_power_w,battery_status,\
                          battery_power_flow_w,usable_energy_kwh,cumulative_energy_kwh,\
                          battery_soc_percent,battery_temperature_c,voltage_v,current_a,power_factor";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be created, or `SimError::Csv`
/// if a row cannot be written.
pub fn export_csv(results: &[StepResult], path: &Path) -> Result<(), SimError> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns `SimError::Csv` or `SimError::Io` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> Result<(), SimError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        let o = &r.output;
        wtr.write_record(&[
            r.step.to_string(),
            r.timestamp.to_rfc3339(),
            format!("{:.3}", r.sun.altitude_deg),
            format!("{:.3}", r.sun.azimuth_deg),
            r.weather.clone(),
            format!("{:.4}", o.irradiance),
            format!("{:.2}", o.active_power_w),
            format!("{:.2}", o.consumption_w),
            format!("{:.2}", o.net_power_w),
            o.battery_status.to_string(),
            format!("{:.2}", o.battery_power_flow_w),
            format!("{:.6}", o.usable_energy_kwh),
            format!("{:.6}", o.cumulative_energy_kwh),
            format!("{:.4}", o.battery_soc_percent),
            format!("{:.3}", o.battery_temperature_c),
            format!("{:.2}", o.electrical.voltage_v),
            format!("{:.3}", o.electrical.current_a),
            format!("{:.3}", o.electrical.power_factor),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
