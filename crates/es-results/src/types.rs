//! Result data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a result sequence: a flow `(from, Some(to))` or a node
/// variable such as storage content `(label, None)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultKey {
    pub from: String,
    pub to: Option<String>,
}

impl ResultKey {
    pub fn flow(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Some(to.into()),
        }
    }

    pub fn node(label: impl Into<String>) -> Self {
        Self {
            from: label.into(),
            to: None,
        }
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.to {
            Some(to) => write!(f, "({}, {})", self.from, to),
            None => write!(f, "({}, None)", self.from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    Flow,
    StorageContent,
}

/// One optimised time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub key: ResultKey,
    pub kind: SequenceKind,
    pub values: Vec<f64>,
}

impl SequenceResult {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Information about the solve itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaResults {
    pub objective: f64,
    pub solver: String,
    pub status: String,
    pub variables: usize,
    pub constraints: usize,
    pub solve_time_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_date: Option<DateTime<Utc>>,
    pub framework_version: String,
}

/// Input parameters of one flow or node, as used by the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub scalars: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sequences: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamEntry {
    pub key: ResultKey,
    pub params: ParamSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub datetime: DateTime<Utc>,
    pub year: Option<i32>,
}

/// All facets captured after a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub main: Vec<SequenceResult>,
    pub meta: MetaResults,
    pub param: Vec<ParamEntry>,
    pub scenario: ScenarioInfo,
}

impl ResultBundle {
    /// Main result for `key`, if present.
    pub fn sequence(&self, key: &ResultKey) -> Option<&SequenceResult> {
        self.main.iter().find(|s| &s.key == key)
    }

    /// Flow result `(from, to)`.
    pub fn flow(&self, from: &str, to: &str) -> Option<&[f64]> {
        self.main
            .iter()
            .find(|s| s.key.from == from && s.key.to.as_deref() == Some(to))
            .map(|s| s.values.as_slice())
    }
}
