//! Dump/restore of an energy system and its results.

use crate::types::ResultBundle;
use crate::{ResultsError, ResultsResult};
use es_graph::EnergySystem;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted state: the energy system plus the results of its last solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dump {
    pub energy_system: EnergySystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultBundle>,
}

/// Directory of dump files.
#[derive(Clone)]
pub struct DumpStore {
    root_dir: PathBuf,
}

impl DumpStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Split a file path into its store directory and file name.
    pub fn for_file(path: &Path) -> ResultsResult<(Self, String)> {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .ok_or_else(|| ResultsError::InvalidPath {
                message: format!("{} has no file name", path.display()),
            })?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok((Self::new(dir)?, filename))
    }

    fn dump_path(&self, filename: &str) -> PathBuf {
        self.root_dir.join(filename)
    }

    pub fn dump(&self, filename: &str, dump: &Dump) -> ResultsResult<PathBuf> {
        let path = self.dump_path(filename);
        let json = serde_json::to_string_pretty(dump)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn restore(&self, filename: &str) -> ResultsResult<Dump> {
        let path = self.dump_path(filename);

        if !path.exists() {
            return Err(ResultsError::DumpNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let dump = serde_json::from_str(&content)?;
        Ok(dump)
    }
}
