//! Drawing options.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

pub const DEFAULT_NODE_COLOR: &str = "#AFAFAF";
pub const DEFAULT_EDGE_COLOR: &str = "#CFCFCF";

/// Graphviz layout program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Neato,
    Dot,
    Twopi,
    Circo,
    Fdp,
    Sfdp,
}

impl Layout {
    /// Name of the Graphviz executable.
    pub fn program(self) -> &'static str {
        match self {
            Layout::Neato => "neato",
            Layout::Dot => "dot",
            Layout::Twopi => "twopi",
            Layout::Circo => "circo",
            Layout::Fdp => "fdp",
            Layout::Sfdp => "sfdp",
        }
    }
}

impl FromStr for Layout {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neato" => Ok(Layout::Neato),
            "dot" => Ok(Layout::Dot),
            "twopi" => Ok(Layout::Twopi),
            "circo" => Ok(Layout::Circo),
            "fdp" => Ok(Layout::Fdp),
            "sfdp" => Ok(Layout::Sfdp),
            _ => Err(VizError::UnknownLayout {
                name: s.to_string(),
            }),
        }
    }
}

/// Fill colour of the nodes: one for all, or looked up per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeColor {
    Uniform(String),
    ByLabel(HashMap<String, String>),
}

impl NodeColor {
    /// Colour of `label`; labels missing from a map get [`DEFAULT_NODE_COLOR`].
    pub fn for_label(&self, label: &str) -> &str {
        match self {
            NodeColor::Uniform(color) => color,
            NodeColor::ByLabel(map) => map
                .get(label)
                .map(String::as_str)
                .unwrap_or(DEFAULT_NODE_COLOR),
        }
    }
}

impl Default for NodeColor {
    fn default() -> Self {
        NodeColor::Uniform(DEFAULT_NODE_COLOR.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Label edges with the nominal value of their flow.
    pub edge_labels: bool,
    pub node_color: NodeColor,
    pub edge_color: String,
    /// Node area in square points.
    pub node_size: f64,
    pub with_labels: bool,
    pub arrows: bool,
    pub layout: Layout,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            edge_labels: true,
            node_color: NodeColor::default(),
            edge_color: DEFAULT_EDGE_COLOR.to_string(),
            node_size: 2000.0,
            with_labels: true,
            arrows: true,
            layout: Layout::default(),
        }
    }
}
