//! Batch orchestration: run every enabled sensor over one cleaned
//! reflectance table. A sensor-level failure is reported and that sensor
//! omitted; the rest of the batch still runs.

use crate::assemble::{SensorResult, assemble};
use crate::catalog::{SensorSpec, spec_for};
use crate::domain::{Sensor, SimError, SimResult};
use crate::engine::simulate_sensor_bands;
use crate::reflectance::ReflectanceTable;
use crate::srf::SrfStore;
use serde::Serialize;

/// One sensor's assembled output. The dual-variant sensor (MSI) yields a
/// named pair, everything else a single table.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorRunOutput {
    Single(SensorResult),
    Dual {
        s2a: SensorResult,
        s2b: SensorResult,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorRun {
    pub sensor: Sensor,
    pub output: SensorRunOutput,
}

impl SensorRun {
    /// Output keys in serialization order, one per variant. These become
    /// the `<key>_simulation.csv` file stems.
    pub fn output_keys(&self) -> Vec<String> {
        match &self.output {
            SensorRunOutput::Single(_) => vec![self.sensor.as_str().to_lowercase()],
            SensorRunOutput::Dual { .. } => vec!["msi_s2a".to_string(), "msi_s2b".to_string()],
        }
    }

    pub fn results(&self) -> Vec<&SensorResult> {
        match &self.output {
            SensorRunOutput::Single(result) => vec![result],
            SensorRunOutput::Dual { s2a, s2b } => vec![s2a, s2b],
        }
    }
}

/// Outcome of a whole batch: completed runs plus per-sensor failures that
/// were absorbed at the dispatch boundary.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub runs: Vec<SensorRun>,
    pub failures: Vec<(Sensor, SimError)>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self, target_stations: usize) -> RunReport {
        RunReport {
            target_stations,
            completed: self
                .runs
                .iter()
                .map(|run| SensorReport {
                    sensor: run.sensor.as_str(),
                    bands: run.results()[0].band_count(),
                    outputs: run.output_keys(),
                })
                .collect(),
            failed: self
                .failures
                .iter()
                .map(|(sensor, error)| FailureReport {
                    sensor: sensor.as_str(),
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

/// Serializable batch summary for machine-readable reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target_stations: usize,
    pub completed: Vec<SensorReport>,
    pub failed: Vec<FailureReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorReport {
    pub sensor: &'static str,
    pub bands: usize,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub sensor: &'static str,
    pub error: String,
}

/// Runs one sensor: every variant's SRF table through the engine, then
/// output-side assembly to `target_stations` columns.
pub fn run_sensor(
    store: &SrfStore,
    sensor: Sensor,
    table: &ReflectanceTable,
    target_stations: usize,
) -> SimResult<SensorRun> {
    let spec: &SensorSpec = spec_for(sensor);
    let bands = spec.band_definitions();

    let mut results = Vec::with_capacity(spec.srf_keys.len());
    for &key in spec.srf_keys {
        let matrix = simulate_sensor_bands(store.table(key), &bands, table)?;
        results.push(assemble(&matrix, target_stations));
    }

    let output = if spec.is_dual_variant() {
        let s2b = results.pop().expect("dual-variant sensor has two results");
        let s2a = results.pop().expect("dual-variant sensor has two results");
        SensorRunOutput::Dual { s2a, s2b }
    } else {
        SensorRunOutput::Single(
            results
                .pop()
                .expect("single-variant sensor has one result"),
        )
    };

    Ok(SensorRun { sensor, output })
}

/// Runs `sensors` in order over a shared read-only table. Failures are
/// logged and collected; they never abort the remaining sensors.
pub fn run_sensors(
    store: &SrfStore,
    sensors: &[Sensor],
    table: &ReflectanceTable,
    target_stations: usize,
) -> BatchOutcome {
    let mut runs = Vec::new();
    let mut failures = Vec::new();

    for &sensor in sensors {
        tracing::info!(sensor = %sensor, "running band simulation");
        match run_sensor(store, sensor, table, target_stations) {
            Ok(run) => runs.push(run),
            Err(error) => {
                tracing::error!(sensor = %sensor, %error, "sensor simulation failed");
                failures.push((sensor, error));
            }
        }
    }

    BatchOutcome { runs, failures }
}

/// Full batch over every supported sensor in declaration order.
pub fn run_all(
    store: &SrfStore,
    table: &ReflectanceTable,
    target_stations: usize,
) -> BatchOutcome {
    run_sensors(store, &Sensor::ALL, table, target_stations)
}
