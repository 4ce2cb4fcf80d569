//! Spectral response function tables: one persisted table per SRF key,
//! loaded once, immutable afterwards. Loading is fail-fast: the whole store
//! either comes up with all eight tables or not at all, so downstream sensor
//! dispatch never has to reason about partial availability.

use crate::catalog::required_columns;
use crate::domain::{SimError, SimResult, SrfKey};
use std::io::Read;
use std::path::Path;

/// One sensor's SRF table. The wavelength grid and each response column are
/// kept in source order; malformed numeric cells survive as NaN and are
/// discarded per band by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SrfTable {
    wavelength: Vec<f64>,
    responses: Vec<Vec<f64>>,
}

impl SrfTable {
    pub fn new(wavelength: Vec<f64>, responses: Vec<Vec<f64>>) -> SimResult<Self> {
        for (index, column) in responses.iter().enumerate() {
            if column.len() != wavelength.len() {
                return Err(SimError::configuration(
                    "CONFIG.SRF_SHAPE",
                    format!(
                        "response column {} has {} rows, expected {}",
                        index + 1,
                        column.len(),
                        wavelength.len()
                    ),
                ));
            }
        }
        Ok(Self {
            wavelength,
            responses,
        })
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    /// Response column by 1-based source column index (column 0 is the
    /// wavelength column).
    pub fn response_column(&self, column: usize) -> Option<&[f64]> {
        if column == 0 {
            return None;
        }
        self.responses.get(column - 1).map(Vec::as_slice)
    }

    pub fn column_count(&self) -> usize {
        self.responses.len()
    }

    fn from_csv_reader<R: Read>(reader: R, name: &str) -> SimResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header_len = csv_reader
            .headers()
            .map_err(|source| {
                SimError::configuration(
                    "CONFIG.SRF_TABLE",
                    format!("failed to read header of SRF table '{}': {}", name, source),
                )
            })?
            .len();
        if header_len < 2 {
            return Err(SimError::configuration(
                "CONFIG.SRF_TABLE",
                format!(
                    "SRF table '{}' has {} columns, expected wavelength plus at least one band",
                    name, header_len
                ),
            ));
        }

        let column_count = header_len - 1;
        let mut wavelength = Vec::new();
        let mut responses = vec![Vec::new(); column_count];

        for record in csv_reader.records() {
            let record = record.map_err(|source| {
                SimError::configuration(
                    "CONFIG.SRF_TABLE",
                    format!("failed to parse SRF table '{}': {}", name, source),
                )
            })?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            wavelength.push(parse_cell(record.get(0)));
            for (index, column) in responses.iter_mut().enumerate() {
                column.push(parse_cell(record.get(index + 1)));
            }
        }

        if wavelength.is_empty() {
            return Err(SimError::configuration(
                "CONFIG.SRF_TABLE",
                format!("SRF table '{}' contains no data rows", name),
            ));
        }

        Self::new(wavelength, responses)
    }
}

fn parse_cell(field: Option<&str>) -> f64 {
    field
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// All eight SRF tables, keyed by [`SrfKey`].
#[derive(Debug, Clone)]
pub struct SrfStore {
    tables: Vec<SrfTable>,
}

impl SrfStore {
    /// Loads `<stem>.csv` for every key from `dir`. Any missing or
    /// malformed table aborts construction.
    pub fn load(dir: &Path) -> SimResult<Self> {
        let mut tables = Vec::with_capacity(SrfKey::ALL.len());
        for key in SrfKey::ALL {
            let path = dir.join(format!("{}.csv", key.file_stem()));
            tracing::debug!(table = %key, path = %path.display(), "loading SRF table");
            let file = std::fs::File::open(&path).map_err(|source| {
                SimError::configuration(
                    "CONFIG.SRF_TABLE",
                    format!("failed to open SRF table '{}': {}", path.display(), source),
                )
            })?;
            let table = SrfTable::from_csv_reader(file, key.file_stem())?;
            if table.column_count() < required_columns(key) {
                return Err(SimError::configuration(
                    "CONFIG.SRF_SHAPE",
                    format!(
                        "SRF table '{}' provides {} band columns, catalog requires {}",
                        key,
                        table.column_count(),
                        required_columns(key)
                    ),
                ));
            }
            tables.push(table);
        }
        Ok(Self { tables })
    }

    /// Builds a store from pre-parsed tables, in `SrfKey::ALL` order.
    pub fn from_tables(tables: Vec<SrfTable>) -> SimResult<Self> {
        if tables.len() != SrfKey::ALL.len() {
            return Err(SimError::configuration(
                "CONFIG.SRF_STORE",
                format!(
                    "expected {} SRF tables, got {}",
                    SrfKey::ALL.len(),
                    tables.len()
                ),
            ));
        }
        Ok(Self { tables })
    }

    pub fn table(&self, key: SrfKey) -> &SrfTable {
        &self.tables[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::{SrfStore, SrfTable};
    use crate::domain::{SimErrorCategory, SrfKey};
    use std::fs;
    use tempfile::TempDir;

    fn write_gaussian_table(dir: &std::path::Path, stem: &str, band_count: usize) {
        let mut lines = Vec::new();
        let mut header = vec!["Wavelength".to_string()];
        for band in 1..=band_count {
            header.push(format!("B{}", band));
        }
        lines.push(header.join(","));
        for wl in (400..=900).step_by(10) {
            let mut row = vec![wl.to_string()];
            for band in 1..=band_count {
                let center = 400.0 + 500.0 * band as f64 / band_count as f64;
                let response = (-(wl as f64 - center).powi(2) / (2.0 * 900.0)).exp();
                row.push(format!("{:.6}", response));
            }
            lines.push(row.join(","));
        }
        fs::write(dir.join(format!("{}.csv", stem)), lines.join("\n"))
            .expect("SRF fixture should be written");
    }

    fn stage_full_store(dir: &std::path::Path) {
        for key in SrfKey::ALL {
            let bands = crate::catalog::required_columns(key);
            write_gaussian_table(dir, key.file_stem(), bands);
        }
    }

    #[test]
    fn load_succeeds_when_all_tables_are_present() {
        let temp = TempDir::new().expect("tempdir should be created");
        stage_full_store(temp.path());

        let store = SrfStore::load(temp.path()).expect("store should load");
        assert_eq!(store.table(SrfKey::S3).column_count(), 19);
        assert_eq!(store.table(SrfKey::L5).column_count(), 4);
        assert_eq!(store.table(SrfKey::Modis).wavelength().len(), 51);
    }

    #[test]
    fn load_fails_fast_when_a_table_is_missing() {
        let temp = TempDir::new().expect("tempdir should be created");
        stage_full_store(temp.path());
        fs::remove_file(temp.path().join("l7_srf.csv")).expect("fixture should be removable");

        let error = SrfStore::load(temp.path()).expect_err("missing table should fail");
        assert_eq!(error.category(), SimErrorCategory::ConfigurationError);
        assert_eq!(error.code(), "CONFIG.SRF_TABLE");
    }

    #[test]
    fn load_rejects_tables_with_too_few_band_columns() {
        let temp = TempDir::new().expect("tempdir should be created");
        stage_full_store(temp.path());
        write_gaussian_table(temp.path(), "s3_srf", 3);

        let error = SrfStore::load(temp.path()).expect_err("narrow table should fail");
        assert_eq!(error.code(), "CONFIG.SRF_SHAPE");
    }

    #[test]
    fn unparsable_cells_become_nan_rather_than_errors() {
        let source = "Wavelength,B1\n400,0.5\nnot-a-number,0.6\n410,oops\n";
        let table = SrfTable::from_csv_reader(source.as_bytes(), "fixture")
            .expect("table with bad cells should still parse");

        assert_eq!(table.wavelength().len(), 3);
        assert!(table.wavelength()[1].is_nan());
        let band = table.response_column(1).expect("band column should exist");
        assert!(band[2].is_nan());
        assert_eq!(band[0], 0.5);
    }

    #[test]
    fn response_column_is_one_based() {
        let table = SrfTable::new(vec![400.0, 401.0], vec![vec![0.1, 0.2]])
            .expect("table should build");
        assert!(table.response_column(0).is_none());
        assert_eq!(table.response_column(1), Some(&[0.1, 0.2][..]));
        assert!(table.response_column(2).is_none());
    }

    #[test]
    fn ragged_tables_are_rejected() {
        let error = SrfTable::new(vec![400.0, 401.0], vec![vec![0.1]])
            .expect_err("ragged table should fail");
        assert_eq!(error.code(), "CONFIG.SRF_SHAPE");
    }
}
