//! Integration tests for the config subcommand and config-file settings.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn clean_cmd(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("ants-dbm");
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .env_remove("ANTS_DBM_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("RABIES")
        .env_remove("ants_dbm_cluster_type")
        .env_remove("ants_dbm_walltime")
        .env_remove("ants_dbm_memory_request")
        .env_remove("local_threads");
    cmd
}

#[test]
fn test_config_path_uses_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.toml");

    clean_cmd(&temp)
        .args(["config", "path", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_creates_file_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cfg").join("config.toml");

    clean_cmd(&temp)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[modelbuild]"));
    assert!(contents.contains("twolevel_dbm.py"));

    clean_cmd(&temp)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_config_show_prints_effective_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[cluster]\nwalltime = \"06:00:00\"\n").unwrap();

    clean_cmd(&temp)
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("06:00:00"))
        .stdout(predicate::str::contains("normmean"));
}

#[test]
fn test_config_file_supplies_cluster_settings() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[modelbuild]
model_iterations = 5

[cluster]
cluster_type = "sge"
walltime = "06:00:00"
memory_request = "16gb"
local_threads = 2
"#,
    )
    .unwrap();

    clean_cmd(&temp)
        .env("RABIES", "/opt/RABIES")
        .env("ANTS_DBM_CONFIG", &path)
        .args(["/a/in.txt", "/a/tpl.nii.gz", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--model-iterations 5"))
        .stdout(predicate::str::contains("--cluster-type sge"))
        .stdout(predicate::str::contains("--walltime 06:00:00"))
        .stdout(predicate::str::contains("--memory-request 16gb"))
        .stdout(predicate::str::contains("--local-threads 2"));
}

#[test]
fn test_invalid_config_rejected_before_run() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[modelbuild]\ngradient_step = -1.0\n").unwrap();

    clean_cmd(&temp)
        .env("ANTS_DBM_CONFIG", &path)
        .args(["/a/in.txt", "/a/tpl.nii.gz", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gradient_step"));

    assert!(!temp.path().join("ants_dbm").exists());
}

#[test]
fn test_missing_explicit_config_fails_run() {
    let temp = TempDir::new().unwrap();

    clean_cmd(&temp)
        .env("ANTS_DBM_CONFIG", temp.path().join("absent.toml"))
        .args(["/a/in.txt", "/a/tpl.nii.gz", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}
