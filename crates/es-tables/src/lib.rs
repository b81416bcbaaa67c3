//! es-tables: scenario tables and their file formats.
//!
//! A scenario is stored as a collection of wide tables with two header rows
//! and the row index in the first column, either as one xlsx workbook (one
//! sheet per table) or as a directory of CSV files (one file per table).

pub mod cell;
pub mod collection;
pub mod csv_io;
mod grid;
pub mod table;
pub mod xlsx_io;

pub use cell::Cell;
pub use collection::TableCollection;
pub use table::{ColumnKey, Table};

pub type TableResult<T> = Result<T, TableError>;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Workbook write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Missing values in the '{table}' table (columns: {})", format_columns(.columns))]
    MissingValues {
        table: String,
        columns: Vec<ColumnKey>,
    },

    #[error("Row '{row}' has {cells} cells but the table has {columns} columns")]
    RowLength {
        row: String,
        cells: usize,
        columns: usize,
    },

    #[error("Malformed table '{table}': {what}")]
    Malformed { table: String, what: String },
}

fn format_columns(columns: &[ColumnKey]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
