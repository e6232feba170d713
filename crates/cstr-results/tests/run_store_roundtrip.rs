use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cstr_project::RunConfig;
use cstr_results::{
    ResultsError, RunManifest, RunStatus, RunStore, TrajectoryRecord, compute_run_id,
    timestamp_now,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(config: RunConfig, status: RunStatus) -> RunManifest {
    RunManifest {
        run_id: compute_run_id(&config, "0.1.0"),
        name: config.name.clone(),
        timestamp: timestamp_now(),
        solver_version: "0.1.0".to_string(),
        status,
        steps_completed: 2,
        metrics: BTreeMap::from([("max_error".to_string(), 30.0)]),
        config,
    }
}

fn records() -> Vec<TrajectoryRecord> {
    (0..2)
        .map(|step| TrajectoryRecord {
            step,
            time: (step + 1) as f64,
            concentration: 1.0,
            temperature: 349.17,
            command: 280.0,
            error: 30.0,
            setpoint: 350.0,
        })
        .collect()
}

#[test]
fn save_list_load_roundtrip() {
    let config_dir = unique_temp_dir("cstr_results_config");
    fs::create_dir_all(&config_dir).expect("failed to create temp config dir");
    let config_path = config_dir.join("run.yaml");
    fs::write(&config_path, "name: test\n").expect("failed to write config file");

    let store = RunStore::for_config(&config_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".cstrflow/runs"));

    let manifest = manifest(RunConfig::default(), RunStatus::Complete);
    store
        .save_run(&manifest, &records())
        .expect("failed to save run");
    assert!(store.has_run(&manifest.run_id));

    let runs = store.list_runs().expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0], manifest);

    let loaded_records = store
        .load_timeseries(&manifest.run_id)
        .expect("failed to load records");
    assert_eq!(loaded_records, records());
}

#[test]
fn failed_run_status_survives_storage() {
    let store = RunStore::new(unique_temp_dir("cstr_results_failed")).unwrap();
    let status = RunStatus::Failed {
        step: 1,
        reason: "non-physical state".to_string(),
    };
    let manifest = manifest(RunConfig::default(), status.clone());
    store.save_run(&manifest, &records()[..1]).unwrap();

    let loaded = store.load_manifest(&manifest.run_id).unwrap();
    assert_eq!(loaded.status, status);
    assert!(!loaded.status.is_complete());
}

#[test]
fn missing_run_reported() {
    let store = RunStore::new(unique_temp_dir("cstr_results_missing")).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(store.list_runs().unwrap().is_empty());
}

#[test]
fn delete_removes_run() {
    let store = RunStore::new(unique_temp_dir("cstr_results_delete")).unwrap();
    let manifest = manifest(RunConfig::default(), RunStatus::Complete);
    store.save_run(&manifest, &records()).unwrap();
    store.delete_run(&manifest.run_id).unwrap();
    assert!(!store.has_run(&manifest.run_id));
}
