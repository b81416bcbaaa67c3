//! xlsx workbooks: one sheet per table.

use std::fs;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;

use crate::cell::Cell;
use crate::collection::TableCollection;
use crate::grid;
use crate::TableResult;

/// Load every sheet of a workbook as a table named after the sheet.
pub fn load_workbook(path: &Path) -> TableResult<TableCollection> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut collection = TableCollection::new();
    for sheet in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet)?;
        let table = grid::table_from_grid(&sheet, &range_to_grid(&range))?;
        collection.insert(sheet, table);
    }
    Ok(collection)
}

/// Write all tables into one workbook, sheets in name order.
///
/// The parent directory is created if it does not exist.
pub fn save_workbook(collection: &TableCollection, path: &Path) -> TableResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    for (name, table) in collection.iter() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        for (r, row) in grid::table_to_grid(table).iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Number(v) if v.is_finite() => {
                        sheet.write_number(r, c, *v)?;
                    }
                    // xlsx has no infinity; written as `inf`/`-inf` text
                    Cell::Number(v) if v.is_infinite() => {
                        sheet.write_string(r, c, cell.to_field())?;
                    }
                    Cell::Text(s) if !s.is_empty() => {
                        sheet.write_string(r, c, s.as_str())?;
                    }
                    _ => {}
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Dense grid anchored at A1; calamine ranges start at the first used cell.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((row0, col0)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); row0 as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col0 as usize];
        cells.extend(row.iter().map(data_to_cell));
        grid.push(cells);
    }
    grid
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::String(s) => Cell::parse(s),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calamine_values_map_to_cells() {
        assert_eq!(data_to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(data_to_cell(&Data::Float(0.5)), Cell::Number(0.5));
        assert_eq!(data_to_cell(&Data::String("b_el".into())), Cell::Text("b_el".into()));
        assert_eq!(data_to_cell(&Data::String(" ".into())), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("-inf".into())),
            Cell::Number(f64::NEG_INFINITY)
        );
    }
}
