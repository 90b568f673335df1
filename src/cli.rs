//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, HarnessConfig};
use crate::scenario::{
    standard_matrix, DiskMaterializer, DotnetInvoker, ParallelRun, Scenario, ScenarioContext,
    ScenarioMode, ScenarioRunner,
};

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Pubcheck - verify publish-output feature defaults across a scenario matrix
#[derive(Parser)]
#[command(name = "pubcheck")]
#[command(about = "Pubcheck - verify publish-output feature defaults across a scenario matrix")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the verification matrix against the external toolchain
    Run {
        /// Path to pubcheck.toml (default: walk up from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target framework(s) to verify, overriding the config list
        #[arg(short, long = "framework")]
        frameworks: Vec<String>,

        /// Runtime identifier to publish for
        #[arg(long)]
        rid: Option<String>,

        /// Restrict the matrix to one publish mode
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ScenarioMode>,

        /// Number of parallel workers (0 = available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Stop scheduling new scenarios after the first failure
        #[arg(long)]
        fail_fast: bool,

        /// Retain materialized scratch trees for inspection
        #[arg(long)]
        keep_scratch: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the scenario matrix without building anything
    List {
        /// Path to pubcheck.toml (default: walk up from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn parse_mode(value: &str) -> Result<ScenarioMode, String> {
    match value {
        "trimmed" => Ok(ScenarioMode::Trimmed),
        "aot" => Ok(ScenarioMode::AheadOfTime),
        other => Err(format!("unknown mode '{}', expected 'trimmed' or 'aot'", other)),
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            frameworks,
            rid,
            mode,
            jobs,
            fail_fast,
            keep_scratch,
            verbose,
        } => {
            let overrides = CliOverrides {
                target_frameworks: if frameworks.is_empty() { None } else { Some(frameworks) },
                runtime_identifier: rid,
                jobs,
                keep_scratch: if keep_scratch { Some(true) } else { None },
                verbose: if verbose { Some(true) } else { None },
            };
            run_matrix(config.as_deref(), &overrides, mode, fail_fast)
        }
        Commands::List { config } => run_list(config.as_deref()),
    }
}

/// Load configuration, apply overrides, and re-validate.
fn load_effective_config(
    path: Option<&std::path::Path>,
    overrides: &CliOverrides,
) -> Result<HarnessConfig, ConfigError> {
    let mut config = load_config(path)?;
    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }
    Ok(config)
}

/// Execute the run command
fn run_matrix(
    config_path: Option<&std::path::Path>,
    overrides: &CliOverrides,
    mode: Option<ScenarioMode>,
    fail_fast: bool,
) -> ExitCode {
    let config = match load_effective_config(config_path, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let work_root = match env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let scenarios: Vec<Scenario> = standard_matrix(&config)
        .into_iter()
        .filter(|s| mode.map(|m| s.mode == m).unwrap_or(true))
        .collect();

    let jobs = config.run.jobs;
    let invoker = DotnetInvoker::new(config.toolchain.command.clone());
    let context = ScenarioContext::new(config, work_root);
    let runner = ScenarioRunner::new(context, DiskMaterializer::new(), invoker);
    let parallel = ParallelRun::new(runner).with_jobs(jobs).with_fail_fast(fail_fast);

    match parallel.run(&scenarios) {
        Ok(result) => {
            println!("{}", result.summary());
            if result.is_success() {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the list command
fn run_list(config_path: Option<&std::path::Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let scenarios = standard_matrix(&config);
    println!("Scenario matrix: {} scenarios", scenarios.len());
    for scenario in &scenarios {
        println!(
            "  - {} ({}, {}, {})",
            scenario.id, scenario.target_framework, scenario.runtime_identifier, scenario.mode
        );
        for expectation in &scenario.expectations {
            println!("      expects {}", expectation.describe());
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
