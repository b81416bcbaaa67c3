//! Write-once node registry.

use std::collections::HashMap;

use crate::error::{GraphError, GraphResult};
use crate::node::Node;

/// Ordered mapping from identifier to node where every key is write-once.
///
/// A registry collects the nodes of one scenario-build pass. Registering an
/// identifier twice fails and leaves the first entry untouched. Use a fresh
/// instance per pass.
#[derive(Debug, Clone)]
pub struct NodeRegistry<N = Node> {
    entries: Vec<(String, N)>,
    positions: HashMap<String, usize>,
}

impl<N> Default for NodeRegistry<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<N> NodeRegistry<N> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `node` with `identifier`.
    ///
    /// Fails with [`GraphError::DuplicateKey`] if `identifier` is already
    /// present; the registry is left unchanged in that case.
    pub fn register(&mut self, identifier: impl Into<String>, node: N) -> GraphResult<()> {
        let identifier = identifier.into();
        if self.positions.contains_key(&identifier) {
            return Err(GraphError::DuplicateKey { key: identifier });
        }
        self.positions.insert(identifier.clone(), self.entries.len());
        self.entries.push((identifier, node));
        Ok(())
    }

    /// Node registered under `identifier`.
    pub fn lookup(&self, identifier: &str) -> GraphResult<&N> {
        self.positions
            .get(identifier)
            .map(|&i| &self.entries[i].1)
            .ok_or_else(|| GraphError::NotFound {
                key: identifier.to_string(),
            })
    }

    /// All entries in registration order.
    pub fn all_entries(&self) -> &[(String, N)] {
        &self.entries
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End the build pass and hand the nodes over in registration order.
    pub fn into_nodes(self) -> impl Iterator<Item = N> {
        self.entries.into_iter().map(|(_, node)| node)
    }
}

impl NodeRegistry<Node> {
    /// Register `node` under its own label.
    pub fn register_node(&mut self, node: Node) -> GraphResult<()> {
        let label = node.label().to_string();
        self.register(label, node)
    }
}
