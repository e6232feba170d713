use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cstr_app::{
    AppError, RunOptions, RunProgressEvent, RunRequest, RunStage, ensure_run,
    ensure_run_with_progress, list_runs, load_run, query,
};
use cstr_results::RunStatus;

fn config_in_temp_dir(prefix: &str, yaml: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join("run.yaml");
    fs::write(&path, yaml).expect("failed to write config");
    path
}

#[test]
fn run_persists_and_loads_back() {
    let config_path = config_in_temp_dir("cstr_app_persist", "name: default\n");
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };

    let response = ensure_run(&request).expect("run failed");
    assert!(!response.loaded_from_cache);
    assert_eq!(response.manifest.status, RunStatus::Complete);
    assert_eq!(response.manifest.steps_completed, 50);

    let (manifest, records) = load_run(&config_path, &response.run_id).expect("load failed");
    assert_eq!(manifest.run_id, response.run_id);
    assert_eq!(manifest.config, response.manifest.config);
    assert_eq!(records.len(), 50);

    let summary = query::get_run_summary(&records).unwrap();
    assert_eq!(summary.time_range, (1.0, 50.0));
    assert!(summary.command_range.0 >= 280.0 && summary.command_range.1 <= 400.0);

    let runs = list_runs(&config_path).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, response.run_id);
}

#[test]
fn second_run_is_served_from_cache() {
    let config_path = config_in_temp_dir("cstr_app_cache", "simulation:\n  n_steps: 10\n");
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };

    let first = ensure_run(&request).unwrap();
    let second = ensure_run(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(first.run_id, second.run_id);

    let forced = ensure_run(&RunRequest {
        config_path: &config_path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    })
    .unwrap();
    assert!(!forced.loaded_from_cache);
    assert_eq!(forced.run_id, first.run_id);
}

#[test]
fn diverged_run_is_stored_as_failed() {
    let yaml = "simulation:\n  substeps: 1\n  integrator: forward_euler\n";
    let config_path = config_in_temp_dir("cstr_app_failed", yaml);
    let response = ensure_run(&RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    })
    .unwrap();

    assert!(matches!(
        response.manifest.status,
        RunStatus::Failed { step: 1, .. }
    ));
    let (_, records) = load_run(&config_path, &response.run_id).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn progress_stages_are_reported() {
    let config_path = config_in_temp_dir("cstr_app_progress", "simulation:\n  n_steps: 5\n");
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };

    let mut events: Vec<RunProgressEvent> = Vec::new();
    ensure_run_with_progress(&request, Some(&mut |event| events.push(event))).unwrap();

    let simulating: Vec<_> = events
        .iter()
        .filter(|e| e.stage == RunStage::Simulating)
        .filter_map(|e| e.steps)
        .collect();
    assert_eq!(simulating.last(), Some(&(5, 5)));
    assert_eq!(simulating.len(), 5);
    assert!(events.iter().any(|e| e.stage == RunStage::SavingResults));
    assert_eq!(events.last().map(|e| &e.stage), Some(&RunStage::Completed));
}

#[test]
fn invalid_config_file_is_rejected() {
    let yaml = "controller:\n  dt: 0\n";
    let config_path = config_in_temp_dir("cstr_app_invalid", yaml);
    let err = ensure_run(&RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    })
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn unknown_run_id_reported() {
    let config_path = config_in_temp_dir("cstr_app_missing", "name: x\n");
    assert!(matches!(
        load_run(&config_path, "deadbeef"),
        Err(AppError::RunNotFound(_))
    ));
}
