use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn stage_srf_dir(dir: &Path) {
    let band_counts = [
        ("s3_srf", 19),
        ("s2_srf", 9),
        ("s2b_srf", 9),
        ("l8_srf", 5),
        ("l7_srf", 4),
        ("l5_srf", 4),
        ("planet_srf", 8),
        ("modis_srf", 16),
    ];
    for (stem, band_count) in band_counts {
        let mut lines = Vec::new();
        let mut header = vec!["Wavelength".to_string()];
        for band in 1..=band_count {
            header.push(format!("B{}", band));
        }
        lines.push(header.join(","));
        for wl in (400..=900).step_by(2) {
            let mut row = vec![wl.to_string()];
            for band in 1..=band_count {
                let center = 420.0 + 460.0 * (band - 1) as f64 / band_count as f64;
                let response = (-(wl as f64 - center).powi(2) / (2.0 * 900.0)).exp();
                row.push(format!("{:.8}", response));
            }
            lines.push(row.join(","));
        }
        fs::write(dir.join(format!("{}.csv", stem)), lines.join("\n"))
            .expect("SRF fixture should be written");
    }
}

fn stage_reflectance_csv(path: &Path) {
    let mut header = vec!["GLORIA_ID".to_string()];
    for wl in 400..=900 {
        header.push(format!("Rrs_{}", wl));
    }
    let mut lines = vec![header.join(",")];
    for station in 1..=3 {
        let mut row = vec![format!("GID_{}", station)];
        for _ in 400..=900 {
            row.push(format!("{:.4}", 0.005 * station as f64));
        }
        lines.push(row.join(","));
    }
    fs::write(path, lines.join("\n")).expect("reflectance fixture should be written");
}

fn bandsim_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bandsim"))
}

#[test]
fn run_command_writes_one_table_per_sensor_variant() {
    let temp = TempDir::new().expect("tempdir should be created");
    let srf_dir = temp.path().join("srf");
    let input_path = temp.path().join("reflectance.csv");
    let output_dir = temp.path().join("results");
    let report_path = temp.path().join("report/run.json");
    fs::create_dir_all(&srf_dir).expect("srf dir should be created");
    stage_srf_dir(&srf_dir);
    stage_reflectance_csv(&input_path);

    let output = bandsim_command()
        .arg("run")
        .arg("--input")
        .arg(&input_path)
        .arg("--srf-dir")
        .arg(&srf_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("--stations")
        .arg("5")
        .arg("--report")
        .arg(&report_path)
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded 3 real stations (2 appended by padding)."));
    assert!(stdout.contains("MSI completed (9 bands, 2 output tables)."));
    assert!(stdout.contains("Wrote 8 result tables"));

    for name in [
        "msi_s2a_simulation.csv",
        "msi_s2b_simulation.csv",
        "oli_simulation.csv",
        "etm_simulation.csv",
        "tm_simulation.csv",
        "olci_simulation.csv",
        "superdove_simulation.csv",
        "modis_simulation.csv",
    ] {
        assert!(
            output_dir.join(name).is_file(),
            "result table '{}' should exist",
            name
        );
    }

    let report: Value = serde_json::from_str(
        &fs::read_to_string(&report_path).expect("report should be readable"),
    )
    .expect("report should be valid JSON");
    assert_eq!(report["target_stations"], 5);
    assert_eq!(
        report["completed"]
            .as_array()
            .expect("completed should be an array")
            .len(),
        7
    );
    assert_eq!(
        report["failed"]
            .as_array()
            .expect("failed should be an array")
            .len(),
        0
    );
}

#[test]
fn run_command_honors_sensor_selection() {
    let temp = TempDir::new().expect("tempdir should be created");
    let srf_dir = temp.path().join("srf");
    let input_path = temp.path().join("reflectance.csv");
    let output_dir = temp.path().join("results");
    fs::create_dir_all(&srf_dir).expect("srf dir should be created");
    stage_srf_dir(&srf_dir);
    stage_reflectance_csv(&input_path);

    let output = bandsim_command()
        .arg("run")
        .arg("--input")
        .arg(&input_path)
        .arg("--srf-dir")
        .arg(&srf_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("--stations")
        .arg("3")
        .arg("--sensor")
        .arg("tm")
        .arg("--sensor")
        .arg("OLCI")
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output_dir.join("tm_simulation.csv").is_file());
    assert!(output_dir.join("olci_simulation.csv").is_file());
    assert!(!output_dir.join("oli_simulation.csv").exists());
}

#[test]
fn missing_input_file_maps_to_io_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let srf_dir = temp.path().join("srf");
    fs::create_dir_all(&srf_dir).expect("srf dir should be created");
    stage_srf_dir(&srf_dir);

    let output = bandsim_command()
        .arg("run")
        .arg("--input")
        .arg(temp.path().join("missing.csv"))
        .arg("--srf-dir")
        .arg(&srf_dir)
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("IO.REFLECTANCE_READ"));
    assert!(stderr.contains("FATAL EXIT CODE: 3"));
}

#[test]
fn missing_srf_table_fails_before_any_simulation() {
    let temp = TempDir::new().expect("tempdir should be created");
    let srf_dir = temp.path().join("srf");
    let input_path = temp.path().join("reflectance.csv");
    fs::create_dir_all(&srf_dir).expect("srf dir should be created");
    stage_srf_dir(&srf_dir);
    stage_reflectance_csv(&input_path);
    fs::remove_file(srf_dir.join("modis_srf.csv")).expect("fixture should be removable");

    let output = bandsim_command()
        .arg("run")
        .arg("--input")
        .arg(&input_path)
        .arg("--srf-dir")
        .arg(&srf_dir)
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CONFIG.SRF_TABLE"));
}

#[test]
fn unknown_sensor_name_is_a_usage_error() {
    let output = bandsim_command()
        .arg("run")
        .arg("--input")
        .arg("unused.csv")
        .arg("--sensor")
        .arg("AVHRR")
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown sensor 'AVHRR'"));
}

#[test]
fn sensors_command_lists_the_full_catalog() {
    let output = bandsim_command()
        .arg("sensors")
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["MSI", "OLI", "ETM", "TM", "OLCI", "SuperDove", "MODIS"] {
        assert!(stdout.contains(name), "listing should mention {}", name);
    }

    let output = bandsim_command()
        .arg("sensors")
        .arg("--json")
        .output()
        .expect("command should run");
    assert!(output.status.success());
    let catalog: Value = serde_json::from_slice(&output.stdout)
        .expect("catalog should be valid JSON");
    let entries = catalog.as_array().expect("catalog should be an array");
    assert_eq!(entries.len(), 7);
    let msi = entries
        .iter()
        .find(|entry| entry["sensor"] == "MSI")
        .expect("MSI entry should exist");
    assert_eq!(msi["bands"], 9);
    assert_eq!(msi["variants"].as_array().map(Vec::len), Some(2));
}
