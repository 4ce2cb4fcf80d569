//! Per-sensor CSV serialization of assembled results. Values stay numeric
//! until this layer; "no data" cells render as `NA`.

use crate::assemble::SensorResult;
use crate::domain::{SimError, SimResult};
use crate::runner::SensorRun;
use std::path::{Path, PathBuf};

/// Marker written for a band/station pair that was not computable.
pub const NO_DATA_MARKER: &str = "NA";

pub fn output_file_name(key: &str) -> String {
    format!("{}_simulation.csv", key)
}

fn render_cell(value: Option<f64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => NO_DATA_MARKER.to_string(),
    }
}

/// Writes one assembled table: header `Wave,GID_1,...`, one row per band.
pub fn write_sensor_csv(path: &Path, result: &SensorResult) -> SimResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| {
        SimError::io_system(
            "IO.RESULT_WRITE",
            format!("failed to create result file '{}': {}", path.display(), source),
        )
    })?;

    let mut header = vec!["Wave".to_string()];
    header.extend(result.stations().iter().cloned());
    writer.write_record(&header).map_err(|source| {
        SimError::io_system(
            "IO.RESULT_WRITE",
            format!("failed to write result header '{}': {}", path.display(), source),
        )
    })?;

    for (band, wave) in result.waves().iter().enumerate() {
        let mut row = vec![wave.to_string()];
        row.extend(result.band_row(band).iter().map(|&value| render_cell(value)));
        writer.write_record(&row).map_err(|source| {
            SimError::io_system(
                "IO.RESULT_WRITE",
                format!("failed to write result row '{}': {}", path.display(), source),
            )
        })?;
    }

    writer.flush().map_err(|source| {
        SimError::io_system(
            "IO.RESULT_WRITE",
            format!("failed to flush result file '{}': {}", path.display(), source),
        )
    })
}

/// Writes every variant of every completed run under `output_dir`, creating
/// the directory if needed. Returns the written paths in run order.
pub fn write_all(output_dir: &Path, runs: &[SensorRun]) -> SimResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|source| {
        SimError::io_system(
            "IO.RESULT_DIRECTORY",
            format!(
                "failed to create output directory '{}': {}",
                output_dir.display(),
                source
            ),
        )
    })?;

    let mut written = Vec::new();
    for run in runs {
        for (key, result) in run.output_keys().iter().zip(run.results()) {
            let path = output_dir.join(output_file_name(key));
            tracing::info!(sensor = %run.sensor, path = %path.display(), "writing result table");
            write_sensor_csv(&path, result)?;
            written.push(path);
        }
    }
    Ok(written)
}
