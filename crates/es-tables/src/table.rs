//! Wide table with a two-level column header.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::{TableError, TableResult};

/// Two-level column header, e.g. `(output, capacity)` or `(profile, wind)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub group: String,
    pub name: String,
}

impl ColumnKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.group, self.name)
    }
}

/// A table: row index labels, column keys and a dense grid of cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    index_name: String,
    columns: Vec<ColumnKey>,
    index: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Empty table with the given columns.
    pub fn new(index_name: impl Into<String>, columns: Vec<ColumnKey>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The number of cells must match the number of columns.
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) -> TableResult<()> {
        let label = label.into();
        if cells.len() != self.columns.len() {
            return Err(TableError::RowLength {
                row: label,
                cells: cells.len(),
                columns: self.columns.len(),
            });
        }
        self.index.push(label);
        self.rows.push(cells);
        Ok(())
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn column_position(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    pub fn has_column(&self, group: &str, name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.group == group && c.name == name)
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, key: &ColumnKey) -> Option<Vec<&Cell>> {
        let pos = self.column_position(key)?;
        Some(self.rows.iter().map(|row| &row[pos]).collect())
    }

    /// Numeric values of one column; `None` if the column is absent or any
    /// cell is not a number.
    pub fn column_f64(&self, key: &ColumnKey) -> Option<Vec<f64>> {
        self.column(key)?.into_iter().map(Cell::as_f64).collect()
    }

    /// Cell at `(row label, column)`.
    pub fn get(&self, row: &str, key: &ColumnKey) -> Option<&Cell> {
        let r = self.index.iter().position(|l| l == row)?;
        let c = self.column_position(key)?;
        Some(&self.rows[r][c])
    }

    /// Columns holding at least one missing value, in column order.
    pub fn missing_columns(&self) -> Vec<ColumnKey> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(c, _)| self.rows.iter().any(|row| row[*c].is_missing()))
            .map(|(_, key)| key.clone())
            .collect()
    }
}
