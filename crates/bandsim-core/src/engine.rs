//! Band convolution engine: turns one sensor's SRF table and a cleaned
//! reflectance table into one weighted-average value per (band, station)
//! pair.
//!
//! Contract for unmatched wavelengths: SRF samples absent from the
//! spectrum's grid are dropped from the weighted sum. They contribute no
//! zero term and their weight is not redistributed.

use crate::catalog::BandDefinition;
use crate::domain::{SimError, SimResult};
use crate::reflectance::ReflectanceTable;
use crate::srf::SrfTable;

/// (band x station) simulation output. A `None` cell means "no data": the
/// band was not computable for that station, which is distinct from a
/// computed zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BandMatrix {
    centers: Vec<i32>,
    values: Vec<Vec<Option<f64>>>,
}

impl BandMatrix {
    pub fn centers(&self) -> &[i32] {
        &self.centers
    }

    pub fn band_count(&self) -> usize {
        self.centers.len()
    }

    pub fn station_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Row of per-station values for one band, in input station order.
    pub fn band_row(&self, band: usize) -> &[Option<f64>] {
        &self.values[band]
    }
}

/// Simulates every declared band of one sensor variant. Band-level SRF
/// degradation (empty window, non-positive response sum, no grid overlap)
/// yields "no data" rows and never an error; a band column missing from the
/// SRF table entirely is a shape error for the caller's dispatch boundary.
pub fn simulate_sensor_bands(
    srf: &SrfTable,
    bands: &[BandDefinition],
    table: &ReflectanceTable,
) -> SimResult<BandMatrix> {
    let grid = table.wavelength_rows();
    let station_count = table.station_count();
    let mut centers = Vec::with_capacity(bands.len());
    let mut values = Vec::with_capacity(bands.len());

    for band in bands {
        let response = srf.response_column(band.column).ok_or_else(|| {
            SimError::sensor_shape(
                "RUN.SRF_SHAPE",
                format!(
                    "band column {} not present in SRF table ({} response columns)",
                    band.column,
                    srf.column_count()
                ),
            )
        })?;
        centers.push(band.center_nm);
        values.push(simulate_band(srf.wavelength(), response, band, &grid, table, station_count));
    }

    Ok(BandMatrix { centers, values })
}

fn simulate_band(
    wavelength: &[f64],
    response: &[f64],
    band: &BandDefinition,
    grid: &std::collections::HashMap<i32, usize>,
    table: &ReflectanceTable,
    station_count: usize,
) -> Vec<Option<f64>> {
    // Pairs with an undefined wavelength or response are discarded before
    // anything else looks at them.
    let mut pairs: Vec<(i32, f64)> = wavelength
        .iter()
        .zip(response)
        .filter(|(wl, r)| !wl.is_nan() && !r.is_nan())
        .map(|(&wl, &r)| (wl.round() as i32, r))
        .collect();

    if let Some((min_wave, max_wave)) = band.window {
        pairs.retain(|&(wl, _)| (min_wave..=max_wave).contains(&wl));
    }

    let total: f64 = pairs.iter().map(|&(_, r)| r).sum();
    if pairs.is_empty() || total <= 0.0 {
        tracing::debug!(
            center_nm = band.center_nm,
            "band SRF support is empty or non-positive, marking no data"
        );
        return vec![None; station_count];
    }

    // Normalization uses the full windowed SRF; matching against the grid
    // happens afterwards and drops what it cannot find.
    let matched: Vec<(usize, f64)> = pairs
        .iter()
        .filter_map(|&(wl, r)| grid.get(&wl).map(|&row| (row, r / total)))
        .collect();

    if matched.is_empty() {
        tracing::debug!(
            center_nm = band.center_nm,
            "no SRF wavelengths match the spectrum grid, marking no data"
        );
        return vec![None; station_count];
    }

    (0..station_count)
        .map(|station| {
            let column = table.column(station);
            Some(
                matched
                    .iter()
                    .map(|&(row, weight)| weight * column[row])
                    .sum(),
            )
        })
        .collect()
}
