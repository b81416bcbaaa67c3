//! CSV collections: one file per table in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cell::Cell;
use crate::collection::TableCollection;
use crate::grid;
use crate::table::Table;
use crate::TableResult;

/// File name for a table; spaces become underscores.
pub fn file_name(table_name: &str) -> String {
    format!("{}.csv", table_name.replace(' ', "_"))
}

/// Read a single table from a CSV file.
pub fn read_table(path: &Path) -> TableResult<Table> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    grid::table_from_grid(&name, &rows)
}

/// Write a single table to a CSV file.
pub fn write_table(table: &Table, path: &Path) -> TableResult<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for row in grid::table_to_grid(table) {
        writer.write_record(row.iter().map(Cell::to_field))?;
    }
    writer.flush()?;
    Ok(())
}

/// Load every `*.csv` file of `dir`; table names are the file names without
/// the extension.
pub fn load_collection(dir: &Path) -> TableResult<TableCollection> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut collection = TableCollection::new();
    for path in paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::debug!("Reading table '{}' from {}", name, path.display());
        collection.insert(name, read_table(&path)?);
    }
    Ok(collection)
}

/// Write every table of `collection` into `dir`, creating it if needed.
pub fn save_collection(collection: &TableCollection, dir: &Path) -> TableResult<()> {
    fs::create_dir_all(dir)?;
    for (name, table) in collection.iter() {
        write_table(table, &dir.join(file_name(name)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_replace_spaces() {
        assert_eq!(file_name("volatile series"), "volatile_series.csv");
        assert_eq!(file_name("buses"), "buses.csv");
    }
}
