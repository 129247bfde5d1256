mod common;

use assert_cmd::Command;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("crop-recommend").unwrap();
    cmd.env_remove("CROP_ARTIFACTS").env("RUST_LOG", "warn");
    cmd
}

fn reference_args(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "--nitrogen",
        "90",
        "--phosphorus",
        "42",
        "--potassium",
        "43",
        "--temperature",
        "20.8",
        "--humidity",
        "82",
        "--ph",
        "6.5",
        "--rainfall",
        "202.9",
    ])
}

#[test]
fn cli_help_smoke() {
    bin().arg("--help").assert().success();
    bin().args(["predict", "--help"]).assert().success();
}

#[test]
fn cli_predict_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.json");

    let mut cmd = bin();
    cmd.arg("--artifacts").arg(&path).arg("predict");
    let output = reference_args(&mut cmd).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Recommended crop: Rice"), "{}", stdout);
}

#[test]
fn cli_predict_json_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.bin");

    let mut cmd = bin();
    cmd.env("CROP_ARTIFACTS", &path).args(["predict", "--json", "--top", "2"]);
    let output = reference_args(&mut cmd).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["crop"], "Rice");
    assert_eq!(value["top"].as_array().unwrap().len(), 2);
    assert!(value["confidence"].as_f64().unwrap() > 0.0);
}

#[test]
fn cli_predict_negative_temperature() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.json");

    bin()
        .arg("--artifacts")
        .arg(&path)
        .args([
            "predict",
            "--nitrogen",
            "40",
            "--phosphorus",
            "60",
            "--potassium",
            "20",
            "--temperature",
            "-3.5",
            "--humidity",
            "40",
            "--ph",
            "6.0",
            "--rainfall",
            "80",
        ])
        .assert()
        .success();
}

#[test]
fn cli_without_artifacts_fails() {
    let mut cmd = bin();
    cmd.arg("predict");
    let output = reference_args(&mut cmd).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("CROP_ARTIFACTS"), "{}", stderr);
}

#[test]
fn cli_batch_reports_failing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.json");
    let csv = dir.path().join("samples.csv");
    std::fs::write(
        &csv,
        "Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall\n\
         90,42,43,20.8,82,6.5,202.9\n\
         90,0,43,20.8,82,6.5,202.9\n\
         20,130,200,23,92,5.9,110\n",
    )
    .unwrap();

    let output = bin()
        .arg("--artifacts")
        .arg(&path)
        .arg("batch")
        .arg("--input")
        .arg(&csv)
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{}", stdout);
    assert!(lines[0].starts_with("row 1: Rice"));
    assert!(lines[1].starts_with("row 2: error [invalid_input]"));
    assert!(lines[2].starts_with("row 3: "));
}

#[test]
fn cli_batch_json_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.bin");
    let csv = dir.path().join("samples.csv");
    std::fs::write(
        &csv,
        "Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall\n\
         90,42,43,20.8,82,6.5,202.9\n",
    )
    .unwrap();

    let output = bin()
        .arg("--artifacts")
        .arg(&path)
        .args(["batch", "--json", "--input"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let row: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(row["row"], 1);
    assert_eq!(row["crop"], "Rice");
}

#[test]
fn cli_inspect_lists_features_and_classes() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_bundle(dir.path(), "artifacts.json");

    let output = bin()
        .arg("--artifacts")
        .arg(&path)
        .arg("inspect")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Classifier (tree_ensemble, 10 features)"));
    assert!(stdout.contains("PT_Potassium"));
    assert!(stdout.contains("Rice"));
    assert!(stdout.contains("Watermelon"));
}
