use super::CliError;
use anyhow::Context;
use bandsim_core::catalog::{SENSOR_SPECS, spec_for};
use bandsim_core::domain::Sensor;
use bandsim_core::output::write_all;
use bandsim_core::reflectance::ReflectanceTable;
use bandsim_core::runner::{BatchOutcome, run_sensors};
use bandsim_core::srf::SrfStore;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Station reflectance CSV (GLORIA_ID column plus Rrs_<nm> columns)
    #[arg(long)]
    input: PathBuf,

    /// Directory holding the per-sensor SRF tables (<stem>.csv)
    #[arg(long, default_value = "data-raw")]
    srf_dir: PathBuf,

    /// Output directory for per-sensor result tables
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Target output station count; smaller inputs are padded cyclically
    #[arg(long, default_value_t = 1000)]
    stations: usize,

    /// Restrict the run to named sensors (repeatable); default is all
    #[arg(long = "sensor", value_name = "NAME")]
    sensors: Vec<String>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SensorsArgs {
    /// Emit the catalog as JSON instead of a plain listing
    #[arg(long)]
    json: bool,
}

fn resolve_sensors(names: &[String]) -> Result<Vec<Sensor>, CliError> {
    if names.is_empty() {
        return Ok(Sensor::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| {
            Sensor::from_name(name).ok_or_else(|| {
                CliError::Usage(format!(
                    "unknown sensor '{}'; expected one of MSI, OLI, ETM, TM, OLCI, SuperDove, MODIS",
                    name
                ))
            })
        })
        .collect()
}

pub(super) fn run_simulation_command(args: RunArgs) -> Result<i32, CliError> {
    let sensors = resolve_sensors(&args.sensors)?;

    let store = SrfStore::load(&args.srf_dir).map_err(CliError::Compute)?;
    let mut table = ReflectanceTable::from_csv_path(&args.input).map_err(CliError::Compute)?;
    table.clean();
    let padding = table.extend_to(args.stations);
    if padding.empty_input {
        println!(
            "Warning: input has no stations; nothing to duplicate up to {}.",
            args.stations
        );
    } else {
        println!(
            "Loaded {} real stations ({} appended by padding).",
            padding.real_stations, padding.appended
        );
    }

    let batch = run_sensors(&store, &sensors, &table, args.stations);
    for run in &batch.runs {
        println!(
            "{} completed ({} bands, {} output tables).",
            run.sensor,
            run.results()[0].band_count(),
            run.output_keys().len()
        );
    }
    for (sensor, error) in &batch.failures {
        eprintln!("{} failed: {}", sensor, error.diagnostic_line());
    }

    let written = write_all(&args.output_dir, &batch.runs).map_err(CliError::Compute)?;
    println!(
        "Wrote {} result tables to {}.",
        written.len(),
        args.output_dir.display()
    );

    if let Some(report_path) = &args.report {
        write_report(&batch, args.stations, report_path)?;
        println!("JSON report: {}", report_path.display());
    }

    if batch.all_succeeded() { Ok(0) } else { Ok(1) }
}

fn write_report(
    batch: &BatchOutcome,
    target_stations: usize,
    path: &std::path::Path,
) -> Result<(), CliError> {
    let report = batch.report(target_stations);
    let rendered = serde_json::to_string_pretty(&report)
        .context("failed to serialize run report")
        .map_err(CliError::Internal)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))
            .map_err(CliError::Internal)?;
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write run report '{}'", path.display()))
        .map_err(CliError::Internal)
}

pub(super) fn run_sensors_command(args: SensorsArgs) -> Result<i32, CliError> {
    if args.json {
        let catalog: Vec<serde_json::Value> = SENSOR_SPECS
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "sensor": spec.sensor.as_str(),
                    "bands": spec.band_count(),
                    "centers_nm": spec.band_centers,
                    "window_nm": spec.window,
                    "variants": spec.srf_keys.iter().map(|key| key.file_stem()).collect::<Vec<_>>(),
                })
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&catalog)
            .context("failed to serialize sensor catalog")
            .map_err(CliError::Internal)?;
        println!("{}", rendered);
        return Ok(0);
    }

    for sensor in Sensor::ALL {
        let spec = spec_for(sensor);
        let window = match spec.window {
            Some((min, max)) => format!("window {}-{} nm", min, max),
            None => "native SRF range".to_string(),
        };
        println!(
            "{:<10} {:>2} bands, {} ({} SRF table{})",
            sensor.as_str(),
            spec.band_count(),
            window,
            spec.srf_keys.len(),
            if spec.is_dual_variant() { "s" } else { "" }
        );
    }
    Ok(0)
}
