//! Invoking the external build tool.
//!
//! The toolchain is an opaque collaborator: the harness passes a verb and
//! property overrides, captures exit status and output, and never retries.
//! A non-zero exit is terminal for the owning scenario.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Error spawning or waiting on the build tool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// The tool binary could not be spawned
    #[error("failed to run '{command}': {detail}")]
    Spawn { command: String, detail: String },
}

/// Build verb passed to the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVerb {
    /// Compile only
    Build,
    /// Compile and publish output artifacts
    Publish,
}

impl std::fmt::Display for BuildVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildVerb::Build => write!(f, "build"),
            BuildVerb::Publish => write!(f, "publish"),
        }
    }
}

/// One invocation of the external build tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Materialized project directory
    pub project_dir: PathBuf,
    /// Verb to run
    pub verb: BuildVerb,
    /// Property overrides passed as `/p:Key=Value`
    pub properties: Vec<(String, String)>,
}

impl Invocation {
    /// Create a publish invocation for a project directory.
    pub fn publish(project_dir: impl Into<PathBuf>) -> Self {
        Self { project_dir: project_dir.into(), verb: BuildVerb::Publish, properties: vec![] }
    }

    /// Add a property override.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Render the argument list (everything after the tool binary).
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.verb.to_string(), self.project_dir.display().to_string()];
        for (key, value) in &self.properties {
            args.push(format!("/p:{}={}", key, value));
        }
        args
    }
}

/// Captured result of one tool execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Process exit code; `None` when killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExecutionResult {
    /// Whether the tool exited successfully.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Combined captured output for diagnostics.
    pub fn captured_output(&self) -> String {
        let mut out = String::new();
        if !self.stdout.trim().is_empty() {
            out.push_str("stdout:\n");
            out.push_str(self.stdout.trim_end());
        }
        if !self.stderr.trim().is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("stderr:\n");
            out.push_str(self.stderr.trim_end());
        }
        out
    }
}

/// Runs the external build/publish tool against a materialized project.
pub trait BuildInvoker {
    /// Execute one invocation, capturing exit status and output.
    ///
    /// Failure to launch the tool is an error; the tool itself exiting
    /// non-zero is a successful capture with a failing exit code.
    fn invoke(&self, invocation: &Invocation) -> Result<ExecutionResult, InvokeError>;
}

/// Invoker shelling out to a dotnet-compatible CLI.
#[derive(Debug, Clone)]
pub struct DotnetInvoker {
    /// Tool binary (e.g. "dotnet")
    command: String,
}

impl DotnetInvoker {
    /// Create an invoker for the given tool binary.
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    /// The configured tool binary.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl BuildInvoker for DotnetInvoker {
    fn invoke(&self, invocation: &Invocation) -> Result<ExecutionResult, InvokeError> {
        let output = Command::new(&self.command)
            .args(invocation.args())
            .output()
            .map_err(|e| InvokeError::Spawn {
                command: self.command.clone(),
                detail: e.to_string(),
            })?;

        Ok(ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Published output directory for a (configuration, framework, rid) tuple.
///
/// `<project_dir>/bin/<configuration>/<tfm>/<rid>/publish`
pub fn output_directory(
    project_dir: &Path,
    configuration: &str,
    target_framework: &str,
    runtime_identifier: &str,
) -> PathBuf {
    project_dir
        .join("bin")
        .join(configuration)
        .join(target_framework)
        .join(runtime_identifier)
        .join("publish")
}

/// Intermediate output directory for a (configuration, framework, rid) tuple.
///
/// `<project_dir>/obj/<configuration>/<tfm>/<rid>`
pub fn intermediate_directory(
    project_dir: &Path,
    configuration: &str,
    target_framework: &str,
    runtime_identifier: &str,
) -> PathBuf {
    project_dir
        .join("obj")
        .join(configuration)
        .join(target_framework)
        .join(runtime_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_args() {
        let inv = Invocation::publish("/scratch/id1/HelloWorld")
            .with_property("RuntimeIdentifier", "linux-x64")
            .with_property("PublishTrimmed", "true");

        assert_eq!(
            inv.args(),
            vec![
                "publish",
                "/scratch/id1/HelloWorld",
                "/p:RuntimeIdentifier=linux-x64",
                "/p:PublishTrimmed=true",
            ]
        );
    }

    #[test]
    fn test_execution_result_succeeded() {
        let ok = ExecutionResult { exit_code: Some(0), stdout: String::new(), stderr: String::new() };
        let failed = ExecutionResult { exit_code: Some(1), stdout: String::new(), stderr: String::new() };
        let signaled = ExecutionResult { exit_code: None, stdout: String::new(), stderr: String::new() };

        assert!(ok.succeeded());
        assert!(!failed.succeeded());
        assert!(!signaled.succeeded());
    }

    #[test]
    fn test_captured_output_combines_streams() {
        let result = ExecutionResult {
            exit_code: Some(1),
            stdout: "restoring\n".to_string(),
            stderr: "error NETSDK1064\n".to_string(),
        };

        let captured = result.captured_output();
        assert!(captured.contains("stdout:\nrestoring"));
        assert!(captured.contains("stderr:\nerror NETSDK1064"));
    }

    #[test]
    fn test_captured_output_empty_streams() {
        let result = ExecutionResult {
            exit_code: Some(0),
            stdout: " \n".to_string(),
            stderr: String::new(),
        };
        assert!(result.captured_output().is_empty());
    }

    #[test]
    fn test_output_directory_layout() {
        let dir = output_directory(Path::new("/p/HelloWorld"), "Release", "net8.0", "linux-x64");
        assert_eq!(dir, PathBuf::from("/p/HelloWorld/bin/Release/net8.0/linux-x64/publish"));
    }

    #[test]
    fn test_intermediate_directory_layout() {
        let dir =
            intermediate_directory(Path::new("/p/HelloWorld"), "Release", "net8.0", "linux-x64");
        assert_eq!(dir, PathBuf::from("/p/HelloWorld/obj/Release/net8.0/linux-x64"));
    }

    #[test]
    fn test_invoker_spawn_failure() {
        let invoker = DotnetInvoker::new("definitely-not-a-real-binary-xyz");
        let inv = Invocation::publish("/tmp/nowhere");
        assert!(matches!(invoker.invoke(&inv), Err(InvokeError::Spawn { .. })));
    }
}
