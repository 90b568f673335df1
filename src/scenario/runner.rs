//! Scenario execution.
//!
//! Each scenario moves through a linear state machine with no retries and
//! no backward transitions:
//!
//! ```text
//! Built -> Invoked -> Verified -> {Passed, Failed}
//! ```
//!
//! A failing step is terminal: an invalid spec or a non-zero tool exit
//! skips artifact reading entirely, and an unreadable artifact skips
//! evaluation. Expectation mismatches are not terminal to each other; every
//! failing message is aggregated so one run surfaces all violations.

use crate::artifact::{read_config_document, read_response_file};
use crate::assertion::{evaluate, Artifact};
use crate::config::ConfigError;
use crate::scenario::{
    ArtifactKind, BuildInvoker, Invocation, Materializer, MatrixResult, Scenario,
    ScenarioContext, ScenarioResult,
};
use crate::telemetry::Stage;
use std::collections::HashSet;
use std::fs;
use std::time::Instant;
use thiserror::Error;

/// Error during a harness run (outside any single scenario).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Two scenarios share an identifier, breaking scratch isolation
    #[error("duplicate scenario identifier '{0}'")]
    DuplicateScenario(String),
    /// IO error preparing the run
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check that every scenario identifier is unique.
///
/// Identifiers partition the scratch namespace; a duplicate would make two
/// scenarios share mutable state, so the run is rejected before anything
/// materializes.
pub fn validate_unique_ids(scenarios: &[Scenario]) -> Result<(), HarnessError> {
    let mut seen = HashSet::new();
    for scenario in scenarios {
        if !seen.insert(scenario.id.as_str()) {
            return Err(HarnessError::DuplicateScenario(scenario.id.clone()));
        }
    }
    Ok(())
}

/// Runs scenarios against a materializer and a build invoker.
pub struct ScenarioRunner<M, I> {
    /// Run context (config, scratch root, telemetry)
    context: ScenarioContext,
    /// Project tree materializer
    materializer: M,
    /// External tool invoker
    invoker: I,
}

impl<M: Materializer, I: BuildInvoker> ScenarioRunner<M, I> {
    /// Create a new runner.
    pub fn new(context: ScenarioContext, materializer: M, invoker: I) -> Self {
        Self { context, materializer, invoker }
    }

    /// Get the run context.
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Get the build invoker.
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Run a list of scenarios sequentially.
    pub fn run(&self, scenarios: &[Scenario]) -> Result<MatrixResult, HarnessError> {
        let start = Instant::now();
        validate_unique_ids(scenarios)?;
        fs::create_dir_all(self.context.scratch_root())?;

        let mut result = MatrixResult::new();
        for scenario in scenarios {
            result.add_result(self.run_scenario(scenario));
        }
        result.total_duration = start.elapsed();

        Ok(result)
    }

    /// Run a single scenario through the full state machine.
    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let telemetry = self.context.telemetry();

        if self.context.is_verbose() {
            println!("Running: {} ...", scenario.id);
        }

        // Built: validate the project spec
        if let Err(e) = scenario.project.validate() {
            let reason = format!("invalid project spec: {}", e);
            telemetry.record(&scenario.id, Stage::Built, reason.as_str());
            return self.finish(scenario, vec![reason], start);
        }
        telemetry.record(&scenario.id, Stage::Built, "spec validated");

        // Invoked: materialize and publish
        let project_dir = match self.materializer.materialize(
            &scenario.project,
            &self.context.scratch_root(),
            &scenario.id,
        ) {
            Ok(dir) => dir,
            Err(e) => {
                let reason = format!("materialization failed: {}", e);
                telemetry.record(&scenario.id, Stage::Invoked, reason.as_str());
                return self.finish(scenario, vec![reason], start);
            }
        };

        let invocation = Invocation {
            project_dir: project_dir.clone(),
            verb: scenario.verb,
            properties: vec![(
                "RuntimeIdentifier".to_string(),
                scenario.runtime_identifier.clone(),
            )],
        };

        let execution = match self.invoker.invoke(&invocation) {
            Ok(execution) => execution,
            Err(e) => {
                let reason = format!("build invocation failed: {}", e);
                telemetry.record(&scenario.id, Stage::Invoked, reason.as_str());
                return self.finish(scenario, vec![reason], start);
            }
        };

        if !execution.succeeded() {
            // Terminal: no artifact reading after a failing build.
            let reason = format!(
                "build exited with {}: {}",
                execution
                    .exit_code
                    .map(|c| format!("code {}", c))
                    .unwrap_or_else(|| "signal".to_string()),
                execution.captured_output()
            );
            telemetry.record(&scenario.id, Stage::Invoked, reason.as_str());
            return self.finish(scenario, vec![reason], start);
        }
        telemetry.record(&scenario.id, Stage::Invoked, "exit 0");

        // Verified: read the artifact and evaluate every expectation
        let configuration = &self.context.config().toolchain.configuration;
        let artifact_path = scenario.artifact_path(&project_dir, configuration);

        let artifact = match scenario.artifact {
            ArtifactKind::ConfigDocument => {
                read_config_document(&artifact_path).map(Artifact::ConfigDocument)
            }
            ArtifactKind::ResponseFile => {
                read_response_file(&artifact_path).map(Artifact::ResponseFile)
            }
        };

        let artifact = match artifact {
            Ok(artifact) => artifact,
            Err(e) => {
                let reason = e.to_string();
                telemetry.record(&scenario.id, Stage::Verified, reason.as_str());
                return self.finish(scenario, vec![reason], start);
            }
        };

        let mut failures = Vec::new();
        for expectation in &scenario.expectations {
            let outcome = evaluate(&artifact, expectation);
            telemetry.record(&scenario.id, Stage::Verified, outcome.message.as_str());
            if !outcome.passed {
                failures.push(outcome.message);
            }
        }

        self.finish(scenario, failures, start)
    }

    /// Record the terminal outcome and clean up the scenario's scratch tree.
    fn finish(
        &self,
        scenario: &Scenario,
        failures: Vec<String>,
        start: Instant,
    ) -> ScenarioResult {
        if !self.context.keep_scratch() {
            let scenario_dir = self.context.scratch_root().join(&scenario.id);
            let _ = fs::remove_dir_all(scenario_dir);
        }

        let duration = start.elapsed();
        if failures.is_empty() {
            self.context.telemetry().record(&scenario.id, Stage::Completed, "passed");
            if self.context.is_verbose() {
                println!("  Passed in {:?}", duration);
            }
            ScenarioResult::passed(scenario.id.clone(), duration)
        } else {
            self.context.telemetry().record(
                &scenario.id,
                Stage::Completed,
                format!("failed: {}", failures.join("; ")),
            );
            if self.context.is_verbose() {
                println!("  Failed: {}", failures.join("; "));
            }
            ScenarioResult::failed(scenario.id.clone(), failures, duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::project::ProjectSpec;
    use crate::scenario::{
        BuildVerb, DiskMaterializer, ExecutionResult, InvokeError, ScenarioMode,
    };
    use crate::assertion::Expectation;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Invoker that fails every build with a fixed exit code.
    struct FailingInvoker {
        calls: AtomicUsize,
    }

    impl BuildInvoker for FailingInvoker {
        fn invoke(&self, _invocation: &Invocation) -> Result<ExecutionResult, InvokeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExecutionResult {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "error MSB4025: project file could not be loaded".to_string(),
            })
        }
    }

    fn trimmed_scenario() -> Scenario {
        Scenario {
            id: "HelloWorld-net8.0-trimmed".to_string(),
            project: ProjectSpec::new("HelloWorld", "net8.0")
                .with_property("PublishTrimmed", "true"),
            target_framework: "net8.0".to_string(),
            runtime_identifier: "linux-x64".to_string(),
            mode: ScenarioMode::Trimmed,
            verb: BuildVerb::Publish,
            artifact: ArtifactKind::ConfigDocument,
            expectations: vec![Expectation::config_bool(
                ["runtimeOptions", "configProperties", "Microsoft.AspNetCore.EnsureJsonTrimmability"],
                true,
            )],
        }
    }

    fn context_in(temp: &TempDir) -> ScenarioContext {
        ScenarioContext::new(HarnessConfig::default(), temp.path().to_path_buf())
    }

    #[test]
    fn test_failing_build_is_terminal() {
        let temp = TempDir::new().unwrap();
        let runner = ScenarioRunner::new(
            context_in(&temp),
            DiskMaterializer::new(),
            FailingInvoker { calls: AtomicUsize::new(0) },
        );

        let result = runner.run_scenario(&trimmed_scenario());

        assert!(!result.is_passed());
        let reasons = result.status.reasons();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("build exited with code 1"));
        assert!(reasons[0].contains("MSB4025"));
    }

    #[test]
    fn test_invalid_spec_skips_invocation() {
        let temp = TempDir::new().unwrap();
        let invoker = FailingInvoker { calls: AtomicUsize::new(0) };
        let runner = ScenarioRunner::new(context_in(&temp), DiskMaterializer::new(), invoker);

        let mut scenario = trimmed_scenario();
        scenario.project.name.clear();
        let result = runner.run_scenario(&scenario);

        assert!(!result.is_passed());
        assert!(result.status.reasons()[0].contains("invalid project spec"));
        assert_eq!(runner.invoker.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected_before_run() {
        let temp = TempDir::new().unwrap();
        let runner = ScenarioRunner::new(
            context_in(&temp),
            DiskMaterializer::new(),
            FailingInvoker { calls: AtomicUsize::new(0) },
        );

        let scenarios = vec![trimmed_scenario(), trimmed_scenario()];
        let err = runner.run(&scenarios).unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateScenario(_)));
        assert_eq!(runner.invoker.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scratch_cleaned_after_scenario() {
        let temp = TempDir::new().unwrap();
        let runner = ScenarioRunner::new(
            context_in(&temp),
            DiskMaterializer::new(),
            FailingInvoker { calls: AtomicUsize::new(0) },
        );

        let scenario = trimmed_scenario();
        runner.run(std::slice::from_ref(&scenario)).unwrap();

        let scenario_dir = runner.context().scratch_root().join(&scenario.id);
        assert!(!scenario_dir.exists());
    }

    #[test]
    fn test_keep_scratch_retains_tree() {
        let temp = TempDir::new().unwrap();
        let context = context_in(&temp).with_keep_scratch(true);
        let runner = ScenarioRunner::new(
            context,
            DiskMaterializer::new(),
            FailingInvoker { calls: AtomicUsize::new(0) },
        );

        let scenario = trimmed_scenario();
        runner.run(std::slice::from_ref(&scenario)).unwrap();

        let scenario_dir = runner.context().scratch_root().join(&scenario.id);
        assert!(scenario_dir.exists());
        assert!(scenario_dir.join("HelloWorld/HelloWorld.csproj").exists());
    }

    #[test]
    fn test_validate_unique_ids() {
        let a = trimmed_scenario();
        let mut b = trimmed_scenario();
        b.id = "other".to_string();

        assert!(validate_unique_ids(&[a.clone(), b]).is_ok());
        assert!(validate_unique_ids(&[a.clone(), a]).is_err());
    }

    #[test]
    fn test_signal_exit_reported() {
        struct SignalInvoker;
        impl BuildInvoker for SignalInvoker {
            fn invoke(&self, _inv: &Invocation) -> Result<ExecutionResult, InvokeError> {
                Ok(ExecutionResult {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }

        let temp = TempDir::new().unwrap();
        let runner = ScenarioRunner::new(context_in(&temp), DiskMaterializer::new(), SignalInvoker);
        let result = runner.run_scenario(&trimmed_scenario());

        assert!(!result.is_passed());
        assert!(result.status.reasons()[0].contains("signal"));
    }

    #[test]
    fn test_missing_artifact_fails_verification() {
        /// Invoker that "succeeds" without producing any artifact.
        struct NoopInvoker;
        impl BuildInvoker for NoopInvoker {
            fn invoke(&self, _inv: &Invocation) -> Result<ExecutionResult, InvokeError> {
                Ok(ExecutionResult {
                    exit_code: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }

        let temp = TempDir::new().unwrap();
        let runner = ScenarioRunner::new(context_in(&temp), DiskMaterializer::new(), NoopInvoker);
        let result = runner.run_scenario(&trimmed_scenario());

        assert!(!result.is_passed());
        assert!(result.status.reasons()[0].contains("artifact not found"));
    }

    #[test]
    fn test_telemetry_records_lifecycle() {
        let temp = TempDir::new().unwrap();
        let mut config = HarnessConfig::default();
        config.telemetry.enabled = true;
        let context = ScenarioContext::new(config, temp.path().to_path_buf());
        let log_path = temp.path().join(".pubcheck/events.jsonl");

        let runner = ScenarioRunner::new(
            context,
            DiskMaterializer::new(),
            FailingInvoker { calls: AtomicUsize::new(0) },
        );
        runner.run_scenario(&trimmed_scenario());

        let contents = fs::read_to_string(log_path).unwrap();
        assert!(contents.contains("\"stage\":\"built\""));
        assert!(contents.contains("\"stage\":\"completed\""));
    }

    #[test]
    fn test_artifact_path_uses_configured_configuration() {
        let scenario = trimmed_scenario();
        let path = scenario.artifact_path(&PathBuf::from("/p/HelloWorld"), "Debug");
        assert!(path.starts_with("/p/HelloWorld/bin/Debug"));
    }
}
