//! Configuration schema types for `pubcheck.toml`
//!
//! Defines the structure and validation rules for harness configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// External toolchain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Build tool binary to invoke (e.g. "dotnet")
    #[serde(default = "default_command")]
    pub command: String,
    /// Build configuration name used in output paths
    #[serde(default = "default_configuration")]
    pub configuration: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self { command: default_command(), configuration: default_configuration() }
    }
}

fn default_command() -> String {
    "dotnet".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

/// Scenario matrix settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Supported target framework monikers (must be non-empty)
    #[serde(default = "default_target_frameworks")]
    pub target_frameworks: Vec<String>,
    /// Runtime identifier passed to every publish
    #[serde(default = "default_runtime_identifier")]
    pub runtime_identifier: String,
    /// Feature switch verified in both trimmed and AOT scenarios
    #[serde(default = "default_feature_switch")]
    pub feature_switch: String,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            target_frameworks: default_target_frameworks(),
            runtime_identifier: default_runtime_identifier(),
            feature_switch: default_feature_switch(),
        }
    }
}

fn default_target_frameworks() -> Vec<String> {
    vec!["net8.0".to_string()]
}

fn default_runtime_identifier() -> String {
    "linux-x64".to_string()
}

fn default_feature_switch() -> String {
    "Microsoft.AspNetCore.EnsureJsonTrimmability".to_string()
}

/// Run behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Scratch root for materialized projects
    #[serde(default = "default_scratch")]
    pub scratch: PathBuf,
    /// Retain materialized trees after the run for inspection
    #[serde(default)]
    pub keep_scratch: bool,
    /// Parallel workers (0 = available parallelism)
    #[serde(default)]
    pub jobs: usize,
    /// Verbose console output
    #[serde(default)]
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { scratch: default_scratch(), keep_scratch: false, jobs: 0, verbose: false }
    }
}

fn default_scratch() -> PathBuf {
    PathBuf::from(".pubcheck")
}

/// Telemetry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether scenario events are appended to the JSONL log
    #[serde(default)]
    pub enabled: bool,
    /// Path to the JSONL event log
    #[serde(default = "default_telemetry_log")]
    pub log: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: false, log: default_telemetry_log() }
    }
}

fn default_telemetry_log() -> PathBuf {
    PathBuf::from(".pubcheck/events.jsonl")
}

/// Root configuration loaded from `pubcheck.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// External toolchain settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Scenario matrix settings
    #[serde(default)]
    pub matrix: MatrixConfig,
    /// Run behavior settings
    #[serde(default)]
    pub run: RunConfig,
    /// Telemetry settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl HarnessConfig {
    /// Validate the configuration, collecting every violation.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.toolchain.command.is_empty() {
            errors.push("toolchain.command must not be empty".to_string());
        }
        if self.toolchain.configuration.is_empty() {
            errors.push("toolchain.configuration must not be empty".to_string());
        }
        if self.matrix.target_frameworks.is_empty() {
            errors.push("matrix.target_frameworks must list at least one framework".to_string());
        }
        for (i, tfm) in self.matrix.target_frameworks.iter().enumerate() {
            if tfm.is_empty() {
                errors.push(format!("matrix.target_frameworks[{}] is empty", i));
            }
        }
        if self.matrix.runtime_identifier.is_empty() {
            errors.push("matrix.runtime_identifier must not be empty".to_string());
        }
        if self.matrix.feature_switch.is_empty() {
            errors.push("matrix.feature_switch must not be empty".to_string());
        }

        errors
    }
}
