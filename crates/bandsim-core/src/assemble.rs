//! Result assembly: reshape a (band x station) matrix into the externally
//! visible wave-centric table and pad the output station dimension to a
//! fixed width.
//!
//! Output-side padding is independent of input-side station padding:
//! downstream consumers expect a fixed-width table no matter how many real
//! stations existed, so existing result columns are duplicated cyclically
//! to reach the target.

use crate::engine::BandMatrix;

/// Prefix of output station columns, `GID_<n>`.
pub const OUTPUT_STATION_PREFIX: &str = "GID_";

/// One sensor variant's final table: a leading `Wave` label column followed
/// by one column per output station.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorResult {
    waves: Vec<i32>,
    stations: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl SensorResult {
    pub fn waves(&self) -> &[i32] {
        &self.waves
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn band_count(&self) -> usize {
        self.waves.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Per-station values for one band, in output column order.
    pub fn band_row(&self, band: usize) -> &[Option<f64>] {
        &self.rows[band]
    }
}

/// Attaches wave labels and reshapes into a fixed-width table of exactly
/// `target_stations` columns. Column `available + k` duplicates column
/// `k % available`; with zero available columns the fallback is all-zero
/// columns.
pub fn assemble(matrix: &BandMatrix, target_stations: usize) -> SensorResult {
    let available = matrix.station_count();
    let width = target_stations;

    let stations = (1..=width)
        .map(|n| format!("{}{}", OUTPUT_STATION_PREFIX, n))
        .collect();

    let rows = (0..matrix.band_count())
        .map(|band| {
            let source = matrix.band_row(band);
            (0..width)
                .map(|column| {
                    if available == 0 {
                        Some(0.0)
                    } else {
                        source[column % available]
                    }
                })
                .collect()
        })
        .collect();

    SensorResult {
        waves: matrix.centers().to_vec(),
        stations,
        rows,
    }
}
