use cstr_project::schema::*;
use cstr_project::{ProjectError, load_json, load_path, load_yaml, save_json, save_yaml, validate_config};

fn scheduled_config() -> RunConfig {
    RunConfig {
        name: "setpoint step".to_string(),
        controller: ControllerDef {
            kp: 3.0,
            ki: 0.1,
            ..ControllerDef::default()
        },
        simulation: SimulationDef {
            n_steps: 80,
            setpoint_changes: vec![SetpointChangeDef {
                step: 40,
                setpoint: 340.0,
            }],
            ..SimulationDef::default()
        },
        ..RunConfig::default()
    }
}

#[test]
fn roundtrip_yaml_default_config() {
    let config = RunConfig::default();
    validate_config(&config).unwrap();

    let path = std::env::temp_dir().join("cstr_project_roundtrip_default.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_yaml_with_schedule() {
    let config = scheduled_config();
    let path = std::env::temp_dir().join("cstr_project_roundtrip_schedule.yaml");
    save_yaml(&path, &config).unwrap();
    assert_eq!(load_path(&path).unwrap(), config);
}

#[test]
fn roundtrip_json_with_schedule() {
    let config = scheduled_config();
    let path = std::env::temp_dir().join("cstr_project_roundtrip_schedule.json");
    save_json(&path, &config).unwrap();
    assert_eq!(load_json(&path).unwrap(), config);
    assert_eq!(load_path(&path).unwrap(), config);
}

#[test]
fn save_rejects_invalid_config() {
    let mut config = RunConfig::default();
    config.controller.dt = -1.0;
    let path = std::env::temp_dir().join("cstr_project_invalid.yaml");
    let err = save_yaml(&path, &config).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn load_rejects_invalid_file() {
    let path = std::env::temp_dir().join("cstr_project_invalid_load.yaml");
    std::fs::write(&path, "controller:\n  output_lower: 400\n  output_upper: 300\n").unwrap();
    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn load_reports_missing_file() {
    let path = std::env::temp_dir().join("cstr_project_does_not_exist.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(load_yaml(&path), Err(ProjectError::Io(_))));
}

#[test]
fn flat_file_loads_through_flat_map() {
    let path = std::env::temp_dir().join("cstr_project_flat.json");
    std::fs::write(&path, r#"{"kp": 2.0, "n_steps": 20, "feed_flow": 5.0}"#).unwrap();
    let config = cstr_project::load_flat(&path).unwrap();
    assert_eq!(config.controller.kp, 2.0);
    assert_eq!(config.simulation.n_steps, 20);
    assert_eq!(config.feed.flow, 5.0);

    std::fs::write(&path, r#"{"gain": 2.0}"#).unwrap();
    assert!(matches!(
        cstr_project::load_flat(&path),
        Err(ProjectError::Validation(_))
    ));
}
