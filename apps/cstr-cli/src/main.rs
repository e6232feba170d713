use clap::{Parser, Subcommand};
use cstr_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, query, run_service,
    steady_service,
};
use cstr_project::RunConfig;
use cstr_results::RunStatus;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "cstr-cli")]
#[command(about = "cstrflow CLI - closed-loop CSTR temperature control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run config file
    Validate {
        /// Path to the config file (YAML or JSON)
        config_path: PathBuf,
        /// Treat the file as a flat `key: number` mapping
        #[arg(long)]
        flat: bool,
    },
    /// Print the default run config as YAML
    Defaults {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve the reactor steady state for the configured feed
    Steady {
        /// Path to the config file
        config_path: PathBuf,
        /// Coolant temperature (defaults to feed.coolant_temperature)
        #[arg(long)]
        coolant: Option<f64>,
    },
    /// Uncontrolled response with the coolant held constant
    OpenLoop {
        /// Path to the config file
        config_path: PathBuf,
        /// End time
        #[arg(long, default_value_t = 60.0)]
        t_end: f64,
        /// Number of output intervals
        #[arg(long, default_value_t = 300)]
        points: usize,
        /// Coolant temperature (defaults to feed.coolant_temperature)
        #[arg(long)]
        coolant: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the closed-loop simulation
    Run {
        /// Path to the config file
        config_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs next to a config file
    Runs {
        /// Path to the config file
        config_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the config file
        config_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export time series data from a run
    ExportSeries {
        /// Path to the config file
        config_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Variable name (temperature, concentration, command, error, setpoint)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path, flat } => cmd_validate(&config_path, flat),
        Commands::Defaults { output } => cmd_defaults(output.as_deref()),
        Commands::Steady {
            config_path,
            coolant,
        } => cmd_steady(&config_path, coolant),
        Commands::OpenLoop {
            config_path,
            t_end,
            points,
            coolant,
            output,
        } => cmd_open_loop(&config_path, t_end, points, coolant, output.as_deref()),
        Commands::Run {
            config_path,
            no_cache,
        } => cmd_run(&config_path, !no_cache),
        Commands::Runs { config_path } => cmd_runs(&config_path),
        Commands::ShowRun {
            config_path,
            run_id,
        } => cmd_show_run(&config_path, &run_id),
        Commands::ExportSeries {
            config_path,
            run_id,
            variable,
            output,
        } => cmd_export_series(&config_path, &run_id, &variable, output.as_deref()),
    }
}

fn cmd_validate(config_path: &Path, flat: bool) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = if flat {
        cstr_project::load_flat(config_path)?
    } else {
        cstr_project::load_path(config_path)?
    };
    println!("✓ Config '{}' is valid", config.name);
    Ok(())
}

fn cmd_defaults(output: Option<&Path>) -> AppResult<()> {
    let yaml = serde_yaml::to_string(&RunConfig::default())
        .map_err(|e| cstr_app::AppError::Config(e.to_string()))?;
    write_or_print(output, &yaml, "default config")
}

fn cmd_steady(config_path: &Path, coolant: Option<f64>) -> AppResult<()> {
    let config = cstr_project::load_path(config_path)?;
    let summary = steady_service::solve_steady(&config, coolant)?;

    println!("Steady state (coolant = {:.2}):", summary.inputs.coolant_temperature);
    println!("  Concentration: {:.4}", summary.state.concentration);
    println!("  Temperature:   {:.2}", summary.state.temperature);
    println!("  Rate constant: {:.4e}", summary.rate_constant);
    println!("  Residual:      {:.3e}", summary.residual_norm);
    Ok(())
}

fn cmd_open_loop(
    config_path: &Path,
    t_end: f64,
    points: usize,
    coolant: Option<f64>,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = cstr_project::load_path(config_path)?;
    let response = steady_service::open_loop_response(&config, coolant, t_end, points)?;

    let mut csv = String::from("time,concentration,temperature\n");
    for p in &response {
        csv.push_str(&format!(
            "{},{},{}\n",
            p.time, p.state.concentration, p.state.temperature
        ));
    }
    write_or_print(output, &csv, "open-loop samples")
}

fn cmd_run(config_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running closed-loop simulation: {}", config_path.display());

    let request = RunRequest {
        config_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = String::new();
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let stage_key = format!("{:?}", event.stage);
            let emit_now = stage_key != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = stage_key;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation finished: {}", response.run_id);
    }
    if let RunStatus::Failed { step, reason } = &response.manifest.status {
        println!("✗ Diverged at step {}: {}", step, reason);
    }
    println!("  Total: {:.3}s", response.total_time_s);

    let (manifest, records) = run_service::load_run(config_path, &response.run_id)?;
    print_summary(&manifest, &records);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, event.steps) {
        (RunStage::Simulating, Some((done, total))) => {
            let width = 28usize;
            let fraction = done as f64 / total.max(1) as f64;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  step={}/{}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                done,
                total,
                event.elapsed_wall_s
            );
        }
        _ => {
            let mut line = format!(
                "\r{}  elapsed={:.2}s",
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_summary(manifest: &cstr_results::RunManifest, records: &[cstr_results::TrajectoryRecord]) {
    println!("\nRun '{}' ({})", manifest.name, manifest.timestamp);
    println!("  Steps: {}", manifest.steps_completed);
    if let Ok(summary) = query::get_run_summary(records) {
        println!(
            "  Time range: {:.3} - {:.3}",
            summary.time_range.0, summary.time_range.1
        );
        println!("  Final temperature:   {:.3}", summary.final_temperature);
        println!("  Final concentration: {:.5}", summary.final_concentration);
        println!(
            "  Command range: {:.2} - {:.2}",
            summary.command_range.0, summary.command_range.1
        );
    }
    if !manifest.metrics.is_empty() {
        println!("\nController metrics:");
        for (name, value) in &manifest.metrics {
            println!("  {:<14} {:.6}", name, value);
        }
    }
}

fn cmd_runs(config_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(config_path)?;

    if runs.is_empty() {
        println!("No cached runs found next to: {}", config_path.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            let status = match &manifest.status {
                RunStatus::Complete => "complete".to_string(),
                RunStatus::Failed { step, .. } => format!("failed at step {}", step),
            };
            println!(
                "  {} {} ({}, {})",
                manifest.run_id, manifest.name, manifest.timestamp, status
            );
        }
    }
    Ok(())
}

fn cmd_show_run(config_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);
    let (manifest, records) = run_service::load_run(config_path, run_id)?;
    print_summary(&manifest, &records);
    Ok(())
}

fn cmd_export_series(
    config_path: &Path,
    run_id: &str,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(config_path, run_id)?;
    let series = query::extract_series(&records, variable)?;

    let mut csv = String::from("time,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }
    write_or_print(output, &csv, "data points")
}

fn write_or_print(output: Option<&Path>, content: &str, what: &str) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!("✓ Wrote {} to {}", what, path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}
