//! Run execution and caching service.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use cstr_project::RunConfig;
use cstr_results::{RunManifest, RunStatus, RunStore, TrajectoryRecord};
use cstr_sim::{SimError, Trajectory};

use crate::compile;
use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute the run described by a config file.
pub struct RunRequest<'a> {
    pub config_path: &'a Path,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub total_time_s: f64,
}

/// Result of executing a config without touching a store.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub trajectory: Trajectory,
    pub metrics: BTreeMap<String, f64>,
    pub status: RunStatus,
}

impl SimulationOutcome {
    pub fn records(&self) -> Vec<TrajectoryRecord> {
        trajectory_records(&self.trajectory)
    }
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    steps: Option<(usize, usize)>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            steps,
        });
    }
}

/// Run the closed loop for `config` to completion or divergence.
///
/// Divergence is reported through `status`, with the steps committed before
/// it kept in the trajectory. Configuration errors are returned as `Err`.
pub fn run_simulation(config: &RunConfig) -> AppResult<SimulationOutcome> {
    execute(config, &mut None, Instant::now())
}

fn execute(
    config: &RunConfig,
    progress_cb: &mut ProgressCallback<'_>,
    started: Instant,
) -> AppResult<SimulationOutcome> {
    emit_progress(progress_cb, RunStage::Building, started, None, None);
    let mut sim = compile::build_simulation(config)?;
    let total = sim.options().total_steps;

    let mut status = RunStatus::Complete;
    while sim.steps_taken() < total {
        match sim.step() {
            Ok(_) => emit_progress(
                progress_cb,
                RunStage::Simulating,
                started,
                None,
                Some((sim.steps_taken(), total)),
            ),
            Err(SimError::Diverged { step, what }) => {
                status = RunStatus::Failed { step, reason: what };
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let metrics = sim.metrics();
    let (trajectory, _) = sim.into_parts();
    Ok(SimulationOutcome {
        trajectory,
        metrics,
        status,
    })
}

/// Execute or load the run for a config file, using the store next to it.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Like [`ensure_run`], streaming progress events to `progress_cb`.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let config = cstr_project::load_path(request.config_path)?;
    let store = RunStore::for_config(request.config_path)?;
    ensure_run_in_store(&config, &store, &request.options, progress_cb)
}

/// Execute or load the run for `config` in an explicit store.
pub fn ensure_run_in_store(
    config: &RunConfig,
    store: &RunStore,
    options: &RunOptions,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );
    let run_id = cstr_results::compute_run_id(config, &options.solver_version);

    if options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
            None,
        );
        let manifest = store.load_manifest(&run_id)?;
        tracing::info!(run_id = %run_id, "loaded cached run");
        emit_progress(&mut progress_cb, RunStage::Completed, started, None, None);

        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            total_time_s: started.elapsed().as_secs_f64(),
        });
    }

    let outcome = execute(config, &mut progress_cb, started)?;
    if let RunStatus::Failed { step, reason } = &outcome.status {
        tracing::warn!(run_id = %run_id, step, reason = %reason, "run diverged");
    }

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );
    let manifest = RunManifest {
        run_id: run_id.clone(),
        name: config.name.clone(),
        timestamp: cstr_results::timestamp_now(),
        solver_version: options.solver_version.clone(),
        status: outcome.status.clone(),
        steps_completed: outcome.trajectory.len(),
        metrics: outcome.metrics.clone(),
        config: config.clone(),
    };
    store.save_run(&manifest, &outcome.records())?;
    tracing::info!(run_id = %run_id, steps = manifest.steps_completed, "run saved");

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        total_time_s: started.elapsed().as_secs_f64(),
    })
}

fn trajectory_records(trajectory: &Trajectory) -> Vec<TrajectoryRecord> {
    trajectory
        .points()
        .iter()
        .map(|p| TrajectoryRecord {
            step: p.step,
            time: p.time,
            concentration: p.state.concentration,
            temperature: p.state.temperature,
            command: p.command,
            error: p.error,
            setpoint: p.setpoint,
        })
        .collect()
}

/// Stored runs for a config file's store, most recent first.
pub fn list_runs(config_path: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_config(config_path)?;

    let mut runs = store.list_runs()?;
    runs.reverse();
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(
    config_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TrajectoryRecord>)> {
    let store = RunStore::for_config(config_path)?;
    if !store.has_run(run_id) {
        return Err(AppError::RunNotFound(run_id.to_string()));
    }

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_completes_with_metrics() {
        let outcome = run_simulation(&RunConfig::default()).unwrap();
        assert_eq!(outcome.status, RunStatus::Complete);
        assert_eq!(outcome.trajectory.len(), 50);
        assert_eq!(outcome.metrics["max_error"], 30.0);
    }

    #[test]
    fn diverged_run_reports_failed_status() {
        let mut config = RunConfig::default();
        config.simulation.substeps = 1;
        config.simulation.integrator = cstr_project::IntegratorDef::ForwardEuler;
        let outcome = run_simulation(&config).unwrap();
        assert!(matches!(outcome.status, RunStatus::Failed { step: 1, .. }));
        assert_eq!(outcome.records().len(), 1);
    }
}
