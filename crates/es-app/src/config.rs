//! Application configuration.

use std::path::{Path, PathBuf};

use es_model::SolverKind;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Settings read from a YAML file such as
///
/// ```yaml
/// general:
///   solver: microlp
/// paths:
///   lp_files: lp_files
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Solver backend name, see [`SolverKind`].
    pub solver: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::default().name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for LP files written in debug mode.
    pub lp_files: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            lp_files: PathBuf::from("lp_files"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The configured solver backend.
    pub fn solver(&self) -> AppResult<SolverKind> {
        Ok(self.general.solver.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("general:\n  solver: clarabel\n").unwrap();
        assert_eq!(config.solver().unwrap(), SolverKind::Clarabel);
        assert_eq!(config.paths.lp_files, PathBuf::from("lp_files"));
    }

    #[test]
    fn unknown_solver_is_reported() {
        let mut config = AppConfig::default();
        config.general.solver = "gurobi".to_string();
        assert!(matches!(
            config.solver(),
            Err(AppError::Model(es_model::ModelError::UnknownSolver { .. }))
        ));
    }
}
