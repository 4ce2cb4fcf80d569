//! Reflectance table loading and preprocessing: parse the station CSV,
//! restrict to the [400, 900] nm grid, clip/fill invalid values and pad the
//! station dimension up to a target count.

use crate::catalog::VISIBLE_NIR_WINDOW;
use crate::domain::{SimError, SimResult};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Column holding the station identifier in the input CSV.
pub const STATION_ID_COLUMN: &str = "GLORIA_ID";

/// Prefix of per-wavelength reflectance columns, `Rrs_<nm>`.
pub const REFLECTANCE_PREFIX: &str = "Rrs_";

/// Identifier prefix for synthetic stations appended by padding.
pub const PLACEHOLDER_STATION_PREFIX: &str = "PLACEHOLDER_STATION_";

/// Rectangular station-by-wavelength reflectance table. One column per
/// station, rows aligned with the integer-nm wavelength grid.
#[derive(Debug, Clone)]
pub struct ReflectanceTable {
    wavelengths: Vec<i32>,
    stations: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl PartialEq for ReflectanceTable {
    fn eq(&self, other: &Self) -> bool {
        // NaN marks missing samples, so two tables with NaN in the same
        // cells must compare equal; derived float equality would not.
        self.wavelengths == other.wavelengths
            && self.stations == other.stations
            && self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
            })
    }
}

/// What station padding did, surfaced to the caller. `empty_input` flags the
/// case where padding was requested but there was nothing to duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingOutcome {
    pub real_stations: usize,
    pub appended: usize,
    pub empty_input: bool,
}

impl ReflectanceTable {
    pub fn new(
        wavelengths: Vec<i32>,
        stations: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> SimResult<Self> {
        if stations.len() != columns.len() {
            return Err(SimError::configuration(
                "CONFIG.REFLECTANCE_SHAPE",
                format!(
                    "{} station ids for {} data columns",
                    stations.len(),
                    columns.len()
                ),
            ));
        }
        for (station, column) in stations.iter().zip(&columns) {
            if column.len() != wavelengths.len() {
                return Err(SimError::configuration(
                    "CONFIG.REFLECTANCE_SHAPE",
                    format!(
                        "station '{}' has {} values, expected {}",
                        station,
                        column.len(),
                        wavelengths.len()
                    ),
                ));
            }
        }
        Ok(Self {
            wavelengths,
            stations,
            columns,
        })
    }

    pub fn from_csv_path(path: &Path) -> SimResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| {
            SimError::io_system(
                "IO.REFLECTANCE_READ",
                format!(
                    "failed to open reflectance table '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;
        Self::from_csv_reader(file)
    }

    /// Parses a station CSV: one row per station, a `GLORIA_ID` column and
    /// `Rrs_<nm>` reflectance columns. Only wavelengths inside [400, 900]
    /// are kept, sorted ascending; unparsable or absent cells come out as
    /// NaN and are resolved later by [`ReflectanceTable::clean`].
    pub fn from_csv_reader<R: Read>(reader: R) -> SimResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|source| {
                SimError::configuration(
                    "CONFIG.REFLECTANCE_HEADER",
                    format!("failed to read reflectance header: {}", source),
                )
            })?
            .clone();

        let id_index = headers
            .iter()
            .position(|name| name == STATION_ID_COLUMN)
            .ok_or_else(|| {
                SimError::configuration(
                    "CONFIG.REFLECTANCE_HEADER",
                    format!("missing station id column '{}'", STATION_ID_COLUMN),
                )
            })?;

        let (min_wave, max_wave) = VISIBLE_NIR_WINDOW;
        let mut wave_columns: Vec<(i32, usize)> = headers
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let rest = name.strip_prefix(REFLECTANCE_PREFIX)?;
                let wavelength: i32 = rest.parse().ok()?;
                (min_wave..=max_wave)
                    .contains(&wavelength)
                    .then_some((wavelength, index))
            })
            .collect();
        if wave_columns.is_empty() {
            return Err(SimError::configuration(
                "CONFIG.REFLECTANCE_HEADER",
                format!(
                    "no '{}' columns inside [{}, {}] nm",
                    REFLECTANCE_PREFIX, min_wave, max_wave
                ),
            ));
        }
        wave_columns.sort_by_key(|&(wavelength, _)| wavelength);

        let mut stations = Vec::new();
        let mut columns = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|source| {
                SimError::io_system(
                    "IO.REFLECTANCE_READ",
                    format!("failed to parse reflectance row: {}", source),
                )
            })?;

            let station = record
                .get(id_index)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    SimError::configuration(
                        "CONFIG.REFLECTANCE_STATION",
                        format!("row {} has an empty station id", stations.len() + 2),
                    )
                })?;
            stations.push(station.to_string());

            let column = wave_columns
                .iter()
                .map(|&(_, index)| {
                    record
                        .get(index)
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .and_then(|value| value.parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect();
            columns.push(column);
        }

        let wavelengths = wave_columns
            .into_iter()
            .map(|(wavelength, _)| wavelength)
            .collect();
        Self::new(wavelengths, stations, columns)
    }

    pub fn wavelengths(&self) -> &[i32] {
        &self.wavelengths
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Station column by index, aligned with [`ReflectanceTable::wavelengths`].
    pub fn column(&self, station: usize) -> &[f64] {
        &self.columns[station]
    }

    /// Row lookup table for exact-integer wavelength matching.
    pub fn wavelength_rows(&self) -> HashMap<i32, usize> {
        self.wavelengths
            .iter()
            .enumerate()
            .map(|(row, &wavelength)| (wavelength, row))
            .collect()
    }

    /// Clips negative reflectance to zero and replaces NaN with zero. The
    /// engine requires non-negative, fully defined spectra; this is where
    /// that invariant is established. Idempotent.
    pub fn clean(&mut self) {
        for column in &mut self.columns {
            for value in column {
                if value.is_nan() || *value < 0.0 {
                    *value = 0.0;
                }
            }
        }
    }

    /// Pads the station dimension up to `target` by cyclically duplicating
    /// real stations (appended station `real + k` copies station
    /// `k % real`). Synthetic ids are numbered over the whole padded list.
    /// Never truncates; with zero real stations there is nothing to
    /// duplicate and the table is returned unextended.
    pub fn extend_to(&mut self, target: usize) -> PaddingOutcome {
        let real = self.station_count();
        if real >= target {
            tracing::info!(stations = real, "using all real stations");
            return PaddingOutcome {
                real_stations: real,
                appended: 0,
                empty_input: false,
            };
        }
        if real == 0 {
            tracing::warn!("no real stations to duplicate; table left unextended");
            return PaddingOutcome {
                real_stations: 0,
                appended: 0,
                empty_input: true,
            };
        }

        let appended = target - real;
        for k in 0..appended {
            self.columns.push(self.columns[k % real].clone());
            self.stations
                .push(format!("{}{}", PLACEHOLDER_STATION_PREFIX, real + k + 1));
        }
        tracing::info!(
            real_stations = real,
            appended,
            "extended table with duplicated station data"
        );
        PaddingOutcome {
            real_stations: real,
            appended,
            empty_input: false,
        }
    }
}
