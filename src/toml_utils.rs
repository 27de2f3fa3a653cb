// -- imports
use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::evaluate::EvalArgs;

// -- config

/// Run configuration file: top-level run options, a `[dataset]` table and
/// one `[[endpoints]]` table per service.
#[derive(Debug, Deserialize, Default)]
#[serde(transparent)]
struct TomlConfig {
    eval: EvalArgs,
}

impl TomlConfig {
    /// Parse TOML config file with explicit project root for path resolution.
    ///
    /// # Arguments
    ///
    /// * `toml_path` - Path to the TOML config file
    /// * `project_root` - Base directory for resolving relative paths
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    /// - A value fails validation
    pub fn from_toml(toml_path: &Path, project_root: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().is_none_or(|ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve_paths(project_root);
        config.eval.validate()?;

        Ok(config)
    }

    /// Resolve relative paths against project root
    fn resolve_paths(&mut self, project_root: &Path) {
        let root = &mut self.eval.dataset.root;
        if !root.is_absolute() {
            *root = project_root.join(root.as_path());
        }
    }
}

impl From<TomlConfig> for EvalArgs {
    fn from(config: TomlConfig) -> Self {
        config.eval
    }
}

// -- public API

/// Parse TOML config file and return EvalArgs.
///
/// # Arguments
///
/// * `toml_path` - Path to the TOML config file
/// * `project_root` - Base directory for resolving relative paths
///
/// # Errors
///
/// Returns `AppError` if TOML parsing, validation or path resolution fails.
pub fn parse_toml(toml_path: &Path, project_root: &Path) -> Result<EvalArgs> {
    TomlConfig::from_toml(toml_path, project_root).map(Into::into)
}

// -- tests
