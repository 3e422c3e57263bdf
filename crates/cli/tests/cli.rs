use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn init_small(config: &Path, extra: &[&str]) {
    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(config)
        .args(["--trees", "3", "--horizon", "5", "--capacity", "60"])
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));
}

fn tree_count(path: &Path) -> usize {
    let text = std::fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value.as_array().unwrap().len()
}

#[test]
fn test_init_writes_default_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Trees: 260"))
        .stdout(predicate::str::contains("Capacity: 1000 (birth)"))
        .stdout(predicate::str::contains("Discrete: 8 states"));

    let text = std::fs::read_to_string(&config).unwrap();
    assert!(text.contains("\"kind\": \"discrete\""));
    assert!(text.contains("\"type\": \"sigmoid\""));
}

#[test]
fn test_init_overrides() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--capacity-method", "hard", "-p", "0.5", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capacity: 1000 (hard)"))
        .stdout(predicate::str::contains("Random Seed: 7"))
        .stdout(predicate::str::contains("Sampling Probability: 0.5"));
}

#[test]
fn test_init_no_capacity() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .arg("--no-capacity")
        .assert()
        .success()
        .stdout(predicate::str::contains("Capacity: unbounded"));
}

#[test]
fn test_init_rejects_invalid_values() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .args(["-p", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration does not describe a valid simulation"));
    assert!(!config.exists());

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--capacity-method", "soft"])
        .assert()
        .failure();
}

#[test]
fn test_generate_writes_both_tree_files() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");
    let out_dir = temp.path().join("out");
    init_small(&config, &[]);

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--progress", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generation complete!"))
        .stdout(predicate::str::contains("Trees: 3"));

    assert_eq!(tree_count(&out_dir.join("trees-unpruned.json")), 3);
    assert_eq!(tree_count(&out_dir.join("trees.json")), 3);
}

#[test]
fn test_generate_is_reproducible() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");
    init_small(&config, &["--capacity-method", "hard"]);

    let mut outputs = Vec::new();
    for (dir, threads) in [("a", "1"), ("b", "4")] {
        let out_dir = temp.path().join(dir);
        let mut cmd = Command::cargo_bin("germinal").unwrap();
        cmd.args(["--threads", threads, "generate"])
            .arg("--config")
            .arg(&config)
            .arg("--out-dir")
            .arg(&out_dir)
            .args(["--progress", "false", "--seed", "11"])
            .assert()
            .success();
        outputs.push(std::fs::read_to_string(out_dir.join("trees.json")).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_generate_missing_config() {
    let temp = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("generate")
        .arg("--config")
        .arg(temp.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_inspect_generated_trees() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");
    init_small(&config, &[]);

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(temp.path())
        .args(["--progress", "false", "--trees", "2"])
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.arg("inspect")
        .arg(temp.path().join("trees.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Trees: 2"))
        .stdout(predicate::str::contains("Sampled leaves:"))
        .stdout(predicate::str::contains("Mean sampled affinity:"));
}

#[test]
fn test_trace_from_stdin() {
    let mut cmd = Command::cargo_bin("germinal").unwrap();
    let output = cmd
        .args(["trace", "--reference", "ATGGCAGGTTTACCA", "--horizon", "20"])
        .write_stdin("ATGGCAGGTTTACCA\nATGGCTGGTTTACCA\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines.iter().filter(|l| !l.is_empty()) {
        for transition in line.split(';') {
            let fields: Vec<&str> = transition.split(':').collect();
            assert_eq!(fields.len(), 3);
            let duration: f64 = fields[1].parse().unwrap();
            assert!(duration > 0.0);
        }
    }
}

#[test]
fn test_trace_rejects_length_mismatch() {
    let mut cmd = Command::cargo_bin("germinal").unwrap();
    cmd.args(["trace", "--reference", "ATGGCAGGT"])
        .write_stdin("ATGGCA\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has length 6"));
}
