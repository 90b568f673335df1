//! Scenario definitions and the standard verification matrix.
//!
//! A scenario pairs one ephemeral project with one publish-mode variant and
//! the expectations to check against the resulting artifact. The standard
//! matrix produces two scenarios per supported target framework: a trimmed
//! publish verified through the runtime configuration document, and an
//! ahead-of-time publish verified through the native response file.

use crate::assertion::Expectation;
use crate::config::HarnessConfig;
use crate::project::ProjectSpec;
use crate::scenario::invoke::{intermediate_directory, output_directory, BuildVerb};
use std::path::{Path, PathBuf};

/// Publish-mode variant a scenario exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioMode {
    /// Trimmed publish (`PublishTrimmed=true`)
    Trimmed,
    /// Ahead-of-time compiled publish (`PublishAOT=true`)
    AheadOfTime,
}

impl std::fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioMode::Trimmed => write!(f, "trimmed"),
            ScenarioMode::AheadOfTime => write!(f, "aot"),
        }
    }
}

/// Kind of artifact a scenario verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The runtime configuration document in the publish output
    ConfigDocument,
    /// The native response file in the intermediate output
    ResponseFile,
}

/// One verification scenario: project, variant, expectations.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Unique identifier, also the scratch directory name
    pub id: String,
    /// Project to materialize and publish
    pub project: ProjectSpec,
    /// Target framework this scenario publishes for
    pub target_framework: String,
    /// Runtime identifier passed to the publish
    pub runtime_identifier: String,
    /// Publish-mode variant
    pub mode: ScenarioMode,
    /// Verb passed to the build tool
    pub verb: BuildVerb,
    /// Artifact kind verified after the publish
    pub artifact: ArtifactKind,
    /// Expectations evaluated against the artifact
    pub expectations: Vec<Expectation>,
}

impl Scenario {
    /// Path of the verified artifact for a materialized project directory.
    pub fn artifact_path(&self, project_dir: &Path, configuration: &str) -> PathBuf {
        match self.artifact {
            ArtifactKind::ConfigDocument => output_directory(
                project_dir,
                configuration,
                &self.target_framework,
                &self.runtime_identifier,
            )
            .join(format!("{}.runtimeconfig.json", self.project.name)),
            ArtifactKind::ResponseFile => intermediate_directory(
                project_dir,
                configuration,
                &self.target_framework,
                &self.runtime_identifier,
            )
            .join("native")
            .join(format!("{}.ilc.rsp", self.project.name)),
        }
    }
}

/// Minimal executable web app used by the standard matrix.
fn hello_world_project(target_framework: &str) -> ProjectSpec {
    ProjectSpec::new("HelloWorld", target_framework)
        .with_sdk("Microsoft.NET.Sdk.Web")
        .with_source(
            "Program.cs",
            "using Microsoft.AspNetCore.Builder;\n\
             using Microsoft.Extensions.Hosting;\n\
             \n\
             var builder = WebApplication.CreateBuilder();\n\
             var app = builder.Build();\n\
             app.Start();\n",
        )
}

/// Build the standard scenario matrix from a configuration.
///
/// For each supported framework: one trimmed scenario asserting the feature
/// switch is `true` in the runtime configuration document, and one AOT
/// scenario asserting the literal `--feature:<switch>=true` directive in the
/// response file.
pub fn standard_matrix(config: &HarnessConfig) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let rid = &config.matrix.runtime_identifier;
    let switch = &config.matrix.feature_switch;

    for tfm in &config.matrix.target_frameworks {
        scenarios.push(Scenario {
            id: format!("HelloWorld-{}-trimmed", tfm),
            project: hello_world_project(tfm).with_property("PublishTrimmed", "true"),
            target_framework: tfm.clone(),
            runtime_identifier: rid.clone(),
            mode: ScenarioMode::Trimmed,
            verb: BuildVerb::Publish,
            artifact: ArtifactKind::ConfigDocument,
            expectations: vec![Expectation::config_bool(
                ["runtimeOptions", "configProperties", switch.as_str()],
                true,
            )],
        });

        scenarios.push(Scenario {
            id: format!("HelloWorld-{}-aot", tfm),
            project: hello_world_project(tfm).with_property("PublishAOT", "true"),
            target_framework: tfm.clone(),
            runtime_identifier: rid.clone(),
            mode: ScenarioMode::AheadOfTime,
            verb: BuildVerb::Publish,
            artifact: ArtifactKind::ResponseFile,
            expectations: vec![Expectation::response_line(format!(
                "--feature:{}=true",
                switch
            ))],
        });
    }

    scenarios
}
