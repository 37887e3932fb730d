//! End-to-end tests for the diabetes-train binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_dataset(dir: &Path) {
    let mut csv = String::from(
        "PatientID,Pregnancies,PlasmaGlucose,DiastolicBloodPressure,BMI,Age,Diabetic\n",
    );
    for i in 0..200u32 {
        let glucose = 60 + (i * 41) % 130;
        let pressure = 50 + (i * 17) % 40;
        let bmi = 19.0 + ((i * 11) % 30) as f64 / 1.5;
        let age = 21 + (i * 7) % 55;
        // every twentieth label is flipped
        let diabetic = u32::from((glucose + age > 170) != (i % 20 == 0));
        csv.push_str(&format!(
            "{},{},{},{},{:.1},{},{}\n",
            1_000_000 + i,
            i % 10,
            glucose,
            pressure,
            bmi,
            age,
            diabetic
        ));
    }
    fs::write(dir.join("diabetes-dev-1.csv"), csv).unwrap();
}

fn cmd() -> Command {
    Command::cargo_bin("diabetes-train").unwrap()
}

#[test]
fn test_missing_path_fails() {
    let runs = tempfile::tempdir().unwrap();
    cmd()
        .args(["--training_data", "does/not/exist"])
        .arg("--tracking_dir")
        .arg(runs.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Cannot use non-existent path provided: does/not/exist",
        ));
}

#[test]
fn test_no_csv_files_fails() {
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("readme.md"), "no data here").unwrap();
    cmd()
        .arg("--training_data")
        .arg(data.path())
        .arg("--tracking_dir")
        .arg(data.path().join("mlruns"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No CSV files found in provided data path"));
}

#[test]
fn test_rejects_bad_reg_rate() {
    let data = tempfile::tempdir().unwrap();
    write_dataset(data.path());
    cmd()
        .arg("--training_data")
        .arg(data.path())
        .args(["--reg_rate", "0"])
        .arg("--tracking_dir")
        .arg(data.path().join("mlruns"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reg_rate"));
}

#[test]
fn test_json_report_and_run_store() {
    let data = tempfile::tempdir().unwrap();
    let runs = tempfile::tempdir().unwrap();
    write_dataset(data.path());

    let output = cmd()
        .arg("--training_data")
        .arg(data.path())
        .args(["--reg_rate", "0.1", "--format", "json", "--max_iter", "300"])
        .env("TRAIN_TRACKING_DIR", runs.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["rows"], 200);
    assert_eq!(report["split"]["train"], 160);
    assert_eq!(report["split"]["test"], 40);
    assert_eq!(report["params"]["C"], "10");
    let acc = report["metrics"]["acc"].as_f64().unwrap();
    let auc = report["metrics"]["auc"].as_f64().unwrap();
    assert!(acc >= 0.75, "acc {acc}");
    assert!(auc >= 0.75, "auc {auc}");
    assert_eq!(report["model"]["converged"], true);

    let run_id = report["run_id"].as_str().unwrap();
    let run_dir = runs.path().join("Default").join(run_id);
    assert!(run_dir.join("meta.json").is_file());
    assert!(run_dir.join("metrics/acc").is_file());
    assert!(run_dir.join("metrics/auc").is_file());
    assert!(run_dir.join("params/solver").is_file());
}

#[test]
fn test_terminal_report() {
    let data = tempfile::tempdir().unwrap();
    write_dataset(data.path());
    cmd()
        .arg("--training_data")
        .arg(data.path())
        .arg("--tracking_dir")
        .arg(data.path().join("mlruns"))
        .args(["--experiment_name", "diabetes", "--no_autolog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acc"))
        .stdout(predicate::str::contains("auc"))
        .stdout(predicate::str::contains("160 train / 40 test"));
}
