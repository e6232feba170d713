//! cstr-project: run configuration file format and validation.

pub mod flat;
pub mod schema;
pub mod validate;

pub use flat::FLAT_KEYS;
pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &RunConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &std::path::Path, config: &RunConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a flat `key: number` mapping (YAML or JSON) through
/// [`RunConfig::from_flat_map`].
pub fn load_flat(path: &std::path::Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let values: std::collections::BTreeMap<String, f64> = serde_yaml::from_str(&content)?;
    Ok(RunConfig::from_flat_map(&values)?)
}

/// Load a config by extension: `.json` is JSON, anything else YAML.
pub fn load_path(path: &std::path::Path) -> ProjectResult<RunConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
