//! Conversion between tables and raw cell grids.
//!
//! Grid layout, shared by CSV and xlsx:
//!
//! ```text
//! index_name | group_1 | group_1 | group_2
//!            | name_a  | name_b  | name_c
//! row_1      | v       | v       | v
//! ```
//!
//! Empty group cells repeat the group to their left (merged-cell layout).
//! A third row holding nothing but the index name is accepted when the
//! top-left cell is empty.

use crate::cell::Cell;
use crate::table::{ColumnKey, Table};
use crate::{TableError, TableResult};

/// A raw grid field as produced by a file reader.
pub(crate) trait GridField {
    /// Header/index rendering.
    fn label(&self) -> String;
    /// Data rendering.
    fn value(&self) -> Cell;
}

impl GridField for String {
    fn label(&self) -> String {
        self.trim().to_string()
    }

    fn value(&self) -> Cell {
        Cell::parse(self)
    }
}

impl GridField for Cell {
    fn label(&self) -> String {
        self.to_field()
    }

    fn value(&self) -> Cell {
        self.clone()
    }
}

pub(crate) fn table_from_grid<F: GridField>(name: &str, grid: &[Vec<F>]) -> TableResult<Table> {
    if grid.len() < 2 {
        return Err(TableError::Malformed {
            table: name.to_string(),
            what: "expected two header rows".to_string(),
        });
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let mut index_name = label_at(&grid[0], 0);
    let mut columns = Vec::with_capacity(width.saturating_sub(1));
    let mut group = String::new();
    for c in 1..width {
        let g = label_at(&grid[0], c);
        if !g.is_empty() {
            group = g;
        }
        columns.push(ColumnKey::new(group.clone(), label_at(&grid[1], c)));
    }

    let mut body = &grid[2..];
    if index_name.is_empty()
        && let Some(first) = body.first()
    {
        let head = label_at(first, 0);
        let rest_empty = (1..width).all(|c| label_at(first, c).is_empty());
        if !head.is_empty() && rest_empty {
            index_name = head;
            body = &body[1..];
        }
    }

    let mut table = Table::new(index_name, columns);
    for row in body {
        let label = label_at(row, 0);
        let cells: Vec<Cell> = (1..width)
            .map(|c| row.get(c).map(GridField::value).unwrap_or_default())
            .collect();
        if label.is_empty() && cells.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        table.push_row(label, cells)?;
    }

    Ok(table)
}

fn label_at<F: GridField>(row: &[F], c: usize) -> String {
    row.get(c).map(GridField::label).unwrap_or_default()
}

pub(crate) fn table_to_grid(table: &Table) -> Vec<Vec<Cell>> {
    let mut grid = Vec::with_capacity(table.index().len() + 2);

    let mut groups = vec![Cell::Text(table.index_name().to_string())];
    let mut names = vec![Cell::Empty];
    for key in table.columns() {
        groups.push(Cell::Text(key.group.clone()));
        names.push(Cell::Text(key.name.clone()));
    }
    grid.push(groups);
    grid.push(names);

    for (label, cells) in table.rows() {
        let mut row = Vec::with_capacity(cells.len() + 1);
        row.push(Cell::Text(label.to_string()));
        row.extend(cells.iter().cloned());
        grid.push(row);
    }

    grid
}
