//! Materializing project specs into buildable directory trees.
//!
//! Each scenario gets an isolated directory keyed by its identifier, so
//! parallel scenarios never share scratch state. Materializing the same
//! identifier twice is a collision error, which doubles as the re-entrancy
//! guard for the invocation step.

use crate::project::ProjectSpec;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error materializing a project tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaterializeError {
    /// The identifier directory already exists
    #[error("scratch directory for identifier '{identifier}' already exists: {}", path.display())]
    Collision { identifier: String, path: PathBuf },
    /// File I/O error
    #[error("failed to materialize project: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a [`ProjectSpec`] into an on-disk buildable project tree.
pub trait Materializer {
    /// Materialize `spec` under `<root>/<identifier>/`.
    ///
    /// Returns the project directory (the one containing the project file).
    /// Distinct identifiers must produce isolated directories.
    fn materialize(
        &self,
        spec: &ProjectSpec,
        root: &Path,
        identifier: &str,
    ) -> Result<PathBuf, MaterializeError>;
}

/// Default materializer writing an SDK-style project to disk.
#[derive(Debug, Default)]
pub struct DiskMaterializer;

impl DiskMaterializer {
    /// Create a new disk materializer.
    pub fn new() -> Self {
        Self
    }
}

impl Materializer for DiskMaterializer {
    fn materialize(
        &self,
        spec: &ProjectSpec,
        root: &Path,
        identifier: &str,
    ) -> Result<PathBuf, MaterializeError> {
        let scenario_dir = root.join(identifier);
        if scenario_dir.exists() {
            return Err(MaterializeError::Collision {
                identifier: identifier.to_string(),
                path: scenario_dir,
            });
        }

        let project_dir = scenario_dir.join(&spec.name);
        fs::create_dir_all(&project_dir)?;

        let project_file = project_dir.join(format!("{}.csproj", spec.name));
        fs::write(&project_file, render_project_file(spec))?;

        for (rel_path, contents) in &spec.source_files {
            let path = project_dir.join(rel_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)?;
        }

        Ok(project_dir)
    }
}

/// Render the project file XML for a spec.
///
/// Thin plumbing: SDK attribute, output type, target framework(s), then one
/// element per build property in map order.
fn render_project_file(spec: &ProjectSpec) -> String {
    let mut xml = String::new();

    match &spec.sdk {
        Some(sdk) => xml.push_str(&format!("<Project Sdk=\"{}\">\n", sdk)),
        None => xml.push_str("<Project Sdk=\"Microsoft.NET.Sdk\">\n"),
    }

    xml.push_str("  <PropertyGroup>\n");
    if spec.is_executable {
        xml.push_str("    <OutputType>Exe</OutputType>\n");
    }
    if spec.target_frameworks.len() == 1 {
        xml.push_str(&format!(
            "    <TargetFramework>{}</TargetFramework>\n",
            spec.target_frameworks[0]
        ));
    } else {
        xml.push_str(&format!(
            "    <TargetFrameworks>{}</TargetFrameworks>\n",
            spec.target_frameworks.join(";")
        ));
    }
    for (name, value) in &spec.properties {
        xml.push_str(&format!("    <{name}>{value}</{name}>\n", name = name, value = value));
    }
    xml.push_str("  </PropertyGroup>\n");
    xml.push_str("</Project>\n");

    xml
}
