//! Reading build output artifacts from disk.
//!
//! Two artifact kinds exist: the runtime configuration document (JSON) and
//! the native response file (line-oriented text). Reads are scenario-scoped
//! and uncached; the build step preceding the read writes each artifact
//! exactly once.

use crate::artifact::{ConfigValue, ResponseFile};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error reading or parsing an output artifact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArtifactError {
    /// The artifact file does not exist
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },
    /// The artifact exists but could not be read
    #[error("failed to read artifact {}: {detail}", path.display())]
    Unreadable { path: PathBuf, detail: String },
    /// The artifact content does not parse as the expected format
    #[error("malformed artifact {}: {detail}", path.display())]
    Malformed { path: PathBuf, detail: String },
}

/// Read and parse a runtime configuration document.
///
/// Fails with [`ArtifactError::Missing`] if the file does not exist and
/// [`ArtifactError::Malformed`] if the content is not valid JSON.
pub fn read_config_document(path: &Path) -> Result<ConfigValue, ArtifactError> {
    let content = read_artifact(path)?;
    let json: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        ArtifactError::Malformed { path: path.to_path_buf(), detail: e.to_string() }
    })?;
    Ok(ConfigValue::from(json))
}

/// Read and parse a response file.
///
/// Fails with [`ArtifactError::Missing`] if the file does not exist. An
/// empty file is a valid, empty sequence.
pub fn read_response_file(path: &Path) -> Result<ResponseFile, ArtifactError> {
    let content = read_artifact(path)?;
    Ok(ResponseFile::parse(&content))
}

fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing { path: path.to_path_buf() });
    }
    fs::read_to_string(path)
        .map_err(|e| ArtifactError::Unreadable { path: path.to_path_buf(), detail: e.to_string() })
}
