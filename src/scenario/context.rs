//! Scenario context containing configuration and paths for a run.

use crate::config::HarnessConfig;
use crate::telemetry::TelemetryLog;
use std::path::{Path, PathBuf};

/// Context shared by every scenario in one harness run.
///
/// Carries the loaded configuration, the scratch root under which each
/// scenario gets its identifier-partitioned directory, and the telemetry
/// sink. Passed explicitly; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    /// The loaded configuration
    config: HarnessConfig,
    /// Directory the scratch root is resolved against
    work_root: PathBuf,
    /// Whether to run in verbose mode
    verbose: bool,
    /// Whether to retain scratch trees after the run
    keep_scratch: bool,
    /// Telemetry sink for scenario lifecycle events
    telemetry: TelemetryLog,
}

impl ScenarioContext {
    /// Create a new scenario context.
    ///
    /// # Arguments
    /// - `config` - The loaded configuration
    /// - `work_root` - Directory relative scratch paths resolve against
    pub fn new(config: HarnessConfig, work_root: PathBuf) -> Self {
        let verbose = config.run.verbose;
        let keep_scratch = config.run.keep_scratch;
        let telemetry = if config.telemetry.enabled {
            let log_path = resolve(&work_root, &config.telemetry.log);
            TelemetryLog::new(log_path, true)
        } else {
            TelemetryLog::disabled()
        };
        Self { config, work_root, verbose, keep_scratch, telemetry }
    }

    /// Get the configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Get the work root directory.
    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    /// Get the scratch root (resolved to an absolute-or-rooted path).
    pub fn scratch_root(&self) -> PathBuf {
        resolve(&self.work_root, &self.config.run.scratch)
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether scratch trees are retained after the run.
    pub fn keep_scratch(&self) -> bool {
        self.keep_scratch
    }

    /// Get the telemetry sink.
    pub fn telemetry(&self) -> &TelemetryLog {
        &self.telemetry
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set scratch retention.
    pub fn with_keep_scratch(mut self, keep: bool) -> Self {
        self.keep_scratch = keep;
        self
    }

    /// Replace the telemetry sink.
    pub fn with_telemetry(mut self, telemetry: TelemetryLog) -> Self {
        self.telemetry = telemetry;
        self
    }
}

/// Resolve a path relative to a root directory.
///
/// If the path is absolute, returns it unchanged.
fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
