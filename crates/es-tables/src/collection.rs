//! Named collection of scenario tables.

use std::collections::BTreeMap;

use crate::table::Table;
use crate::{TableError, TableResult};

/// Mapping from table name to table, ordered by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCollection {
    tables: BTreeMap<String, Table>,
}

impl TableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a table, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn get(&self, name: &str) -> TableResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| TableError::TableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Move all tables of `other` into this collection; same-named tables are
    /// replaced.
    pub fn extend(&mut self, other: TableCollection) {
        self.tables.extend(other.tables);
    }

    /// Fail if table `name` holds a missing value, naming every affected column.
    pub fn check_table(&self, name: &str) -> TableResult<()> {
        let missing = self.get(name)?.missing_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingValues {
                table: name.to_string(),
                columns: missing,
            })
        }
    }
}
