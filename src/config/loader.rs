//! Configuration loading and discovery for `pubcheck.toml`
//!
//! Provides functions to find, load, validate, and merge configuration.

use super::schema::HarnessConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pubcheck.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the supported target framework list
    pub target_frameworks: Option<Vec<String>>,
    /// Override the runtime identifier
    pub runtime_identifier: Option<String>,
    /// Override the number of parallel jobs
    pub jobs: Option<usize>,
    /// Retain scratch trees after the run
    pub keep_scratch: Option<bool>,
    /// Enable verbose output
    pub verbose: Option<bool>,
}

/// Find pubcheck.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a pubcheck.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find pubcheck.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start
/// directory, useful for testing.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join("pubcheck.toml");
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from a pubcheck.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()` to locate the config file. If no config file is found,
/// returns the default configuration.
///
/// # Arguments
/// - `path` - Optional path to a pubcheck.toml file
///
/// # Returns
/// - `Ok(HarnessConfig)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed, or validated
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(HarnessConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: HarnessConfig = toml::from_str(&contents)?;

    // Validate the config
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is re-validated by the caller before use.
pub fn merge_cli_overrides(config: &mut HarnessConfig, overrides: &CliOverrides) {
    if let Some(ref tfms) = overrides.target_frameworks {
        config.matrix.target_frameworks = tfms.clone();
    }

    if let Some(ref rid) = overrides.runtime_identifier {
        config.matrix.runtime_identifier = rid.clone();
    }

    if let Some(jobs) = overrides.jobs {
        config.run.jobs = jobs;
    }

    if let Some(keep) = overrides.keep_scratch {
        config.run.keep_scratch = keep;
    }

    if let Some(verbose) = overrides.verbose {
        config.run.verbose = verbose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("pubcheck.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_config_from_path() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
            [matrix]
            target_frameworks = ["net9.0"]
            runtime_identifier = "win-x64"
            "#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.matrix.target_frameworks, vec!["net9.0"]);
        assert_eq!(config.matrix.runtime_identifier, "win-x64");
    }

    #[test]
    fn test_load_config_rejects_empty_matrix() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
            [matrix]
            target_frameworks = []
            "#,
        );

        match load_config(Some(&path)) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("target_frameworks")));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "this is not toml [");

        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_find_config_from_walks_up() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "");
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_from(nested).unwrap();
        assert_eq!(found, temp.path().join("pubcheck.toml"));
    }

    #[test]
    fn test_find_config_from_none_when_absent() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = HarnessConfig::default();
        let overrides = CliOverrides {
            target_frameworks: Some(vec!["net9.0".to_string()]),
            jobs: Some(2),
            verbose: Some(true),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.matrix.target_frameworks, vec!["net9.0"]);
        assert_eq!(config.run.jobs, 2);
        assert!(config.run.verbose);
        // Untouched values keep their defaults
        assert_eq!(config.matrix.runtime_identifier, "linux-x64");
    }
}
