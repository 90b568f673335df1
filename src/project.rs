//! Ephemeral project specifications.
//!
//! A [`ProjectSpec`] is an in-memory description of a buildable unit that the
//! harness materializes on disk, publishes, and then discards. It is a pure
//! value object: construction, builder-style mutation, validation, no I/O.

use std::collections::BTreeMap;
use thiserror::Error;

/// Error produced by [`ProjectSpec::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecError {
    /// Project name is empty
    #[error("project name must not be empty")]
    EmptyName,
    /// Project name contains a character that is unsafe in a file path
    #[error("project name '{name}' contains unsupported character '{ch}'")]
    UnsafeName { name: String, ch: char },
    /// No target frameworks were specified
    #[error("project '{0}' has no target frameworks")]
    NoTargetFrameworks(String),
    /// A target framework moniker is empty
    #[error("project '{0}' has an empty target framework entry")]
    EmptyTargetFramework(String),
}

/// Description of an ephemeral buildable project.
///
/// Created fresh per scenario and frozen (passed by shared reference) once
/// handed to the materializer. Source files and properties use ordered maps
/// so materialized output is deterministic; later property writes overwrite
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Project name, used for the project directory and artifact file names
    pub name: String,
    /// Target framework monikers, at least one (e.g. "net8.0")
    pub target_frameworks: Vec<String>,
    /// Whether the project produces an executable
    pub is_executable: bool,
    /// Project SDK moniker (e.g. "Microsoft.NET.Sdk.Web"), if any
    pub sdk: Option<String>,
    /// Relative source file path -> file contents
    pub source_files: BTreeMap<String, String>,
    /// Build property name -> value, passed through to the project file
    pub properties: BTreeMap<String, String>,
}

impl ProjectSpec {
    /// Create a new executable project spec with a single target framework.
    pub fn new(name: impl Into<String>, target_framework: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_frameworks: vec![target_framework.into()],
            is_executable: true,
            sdk: None,
            source_files: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Set the project SDK moniker.
    pub fn with_sdk(mut self, sdk: impl Into<String>) -> Self {
        self.sdk = Some(sdk.into());
        self
    }

    /// Set whether the project produces an executable.
    pub fn with_executable(mut self, is_executable: bool) -> Self {
        self.is_executable = is_executable;
        self
    }

    /// Add a target framework to the ordered list.
    pub fn with_target_framework(mut self, tfm: impl Into<String>) -> Self {
        self.target_frameworks.push(tfm.into());
        self
    }

    /// Add a source file; an existing file at the same path is replaced.
    pub fn with_source(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.source_files.insert(path.into(), contents.into());
        self
    }

    /// Set a build property; a later write overwrites an earlier one.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Validate the spec before materialization.
    ///
    /// The name must be non-empty and filesystem-safe (alphanumeric plus
    /// `-`, `_`, `.`), and at least one non-empty target framework must be
    /// present.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        if let Some(ch) = self
            .name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(SpecError::UnsafeName { name: self.name.clone(), ch });
        }
        if self.target_frameworks.is_empty() {
            return Err(SpecError::NoTargetFrameworks(self.name.clone()));
        }
        if self.target_frameworks.iter().any(|t| t.is_empty()) {
            return Err(SpecError::EmptyTargetFramework(self.name.clone()));
        }
        Ok(())
    }

    /// First target framework in the ordered list.
    ///
    /// Valid specs always have one; falls back to an empty string for
    /// unvalidated specs rather than panicking.
    pub fn primary_target_framework(&self) -> &str {
        self.target_frameworks.first().map(String::as_str).unwrap_or("")
    }
}
