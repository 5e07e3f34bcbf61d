//! Delimited-text import boundary.
//!
//! A delimited file is read into an all-string [`Table`] (no type
//! inference), then [`build_extended_table`] slices it into data, row
//! metadata and column metadata per the [`ImportSettings`], and applies
//! the configured normalization method through an injected
//! [`NormalizerRegistry`].

use std::path::Path;

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::extended::ExtendedTable;
use crate::normalization::NormalizerRegistry;
use crate::transform::{self, TransposeOptions};
use crate::value::{Column, Table};

/// User-editable import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub field_delimiter: char,
    pub merge_consecutive_delimiters: bool,
    /// Quote character; `None` disables string delimiting.
    pub string_delimiter: Option<char>,
    pub number_of_row_meta_data_types: usize,
    pub number_of_column_meta_data_types: usize,
    pub row_meta_data_type_of_interest: usize,
    pub column_meta_data_type_of_interest: usize,
    pub transpose: bool,
    pub normalization_method: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            field_delimiter: ',',
            merge_consecutive_delimiters: false,
            string_delimiter: Some('"'),
            number_of_row_meta_data_types: 1,
            number_of_column_meta_data_types: 1,
            row_meta_data_type_of_interest: 0,
            column_meta_data_type_of_interest: 0,
            transpose: false,
            normalization_method: "No".to_string(),
        }
    }
}

/// Read a delimited file into an all-string table.
///
/// No type inference happens here; every cell is kept as text. Ragged
/// rows are padded with empty cells to the widest row.
pub fn read_delimited_text(
    path: impl AsRef<Path>,
    settings: &ImportSettings,
) -> anyhow::Result<Table> {
    let path = path.as_ref();
    if !settings.field_delimiter.is_ascii() {
        anyhow::bail!(
            "field delimiter '{}' is not an ASCII character",
            settings.field_delimiter
        );
    }

    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(settings.field_delimiter as u8)
        .has_headers(false)
        .flexible(true);
    match settings.string_delimiter {
        Some(quote) if quote.is_ascii() => {
            builder.quote(quote as u8);
        }
        _ => {
            builder.quoting(false);
        }
    }

    let mut reader = builder
        .from_path(path)
        .with_context(|| format!("opening '{}'", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading '{}'", path.display()))?;
        let mut fields: Vec<String> = record.iter().map(String::from).collect();
        if settings.merge_consecutive_delimiters {
            fields.retain(|f| !f.is_empty());
        }
        rows.push(fields);
    }

    Ok(string_table_from_rows(rows))
}

/// Slice a raw string table into an [`ExtendedTable`] per the settings
/// and normalize the data block in place.
///
/// The top `NumberOfColumnMetaDataTypes` rows and the left
/// `NumberOfRowMetaDataTypes` columns become the metadata tables; the
/// remaining block is converted to floating-point data (a non-numeric
/// cell is logged and stored as 0). Data column names come from the
/// column-metadata kind of interest. The normalization method is looked
/// up in `registry`; an unknown name fails with
/// [`TableError::InvalidFormat`].
pub fn build_extended_table(
    raw: &Table,
    settings: &ImportSettings,
    registry: &NormalizerRegistry,
) -> Result<ExtendedTable> {
    let normalize = registry
        .get(&settings.normalization_method)
        .ok_or_else(|| {
            TableError::InvalidFormat(format!(
                "unknown normalization method '{}'",
                settings.normalization_method
            ))
        })?;

    let table = if settings.transpose {
        transform::transpose(raw, TransposeOptions::NONE)?
    } else {
        raw.clone()
    };

    let n_row_kinds = settings.number_of_row_meta_data_types;
    let n_column_kinds = settings.number_of_column_meta_data_types;
    if n_column_kinds > table.nrows() {
        return Err(TableError::OutOfRange(format!(
            "{} column-metadata kinds but only {} rows",
            n_column_kinds,
            table.nrows()
        )));
    }
    if n_row_kinds > table.ncols() {
        return Err(TableError::OutOfRange(format!(
            "{} row-metadata kinds but only {} columns",
            n_row_kinds,
            table.ncols()
        )));
    }

    let data_columns = table.ncols() - n_row_kinds;
    let data_rows = table.nrows() - n_column_kinds;

    // Column metadata: one table column per data column, one row per kind.
    let mut column_meta = Table::new();
    for cid in n_row_kinds..table.ncols() {
        let cells: Vec<String> = (0..n_column_kinds).map(|rid| cell(&table, rid, cid)).collect();
        column_meta.push_column(Column::strings("", cells))?;
    }
    let column_labels: Vec<String> = (0..n_column_kinds)
        .map(|i| format!("Column metadata {}", i + 1))
        .collect();

    // Row metadata: one table column per data row, one row per kind.
    let mut row_meta = Table::new();
    for rid in n_column_kinds..table.nrows() {
        let cells: Vec<String> = (0..n_row_kinds).map(|cid| cell(&table, rid, cid)).collect();
        row_meta.push_column(Column::strings("", cells))?;
    }
    let row_labels: Vec<String> = (0..n_row_kinds)
        .map(|i| format!("Row metadata {}", i + 1))
        .collect();

    // Data block, converted to floating point.
    let mut data = Table::new();
    for cid in n_row_kinds..table.ncols() {
        let mut values = Vec::with_capacity(data_rows);
        for rid in n_column_kinds..table.nrows() {
            let text = cell(&table, rid, cid);
            match text.trim().parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    warn!(
                        "data cell at row {rid}, column {cid} is not numeric ('{text}'), defaulting to 0"
                    );
                    values.push(0.0);
                }
            }
        }
        data.push_column(Column::double("", values))?;
    }
    debug_assert_eq!(data.ncols(), data_columns);

    let mut extended = ExtendedTable::new();
    extended.set_column_meta_data(column_meta, column_labels)?;
    extended.set_row_meta_data(row_meta, row_labels)?;
    extended.set_data(Some(data));
    extended.set_column_meta_data_type_of_interest(settings.column_meta_data_type_of_interest);
    extended.set_row_meta_data_type_of_interest(settings.row_meta_data_type_of_interest);

    let names = extended.column_meta_data_of_interest_as_string();
    transform::set_column_names(extended.data_mut(), &names);

    extended.validate()?;

    if !normalize(extended.data_mut()) {
        warn!(
            "normalization method '{}' reported failure",
            settings.normalization_method
        );
    }

    Ok(extended)
}

fn cell(table: &Table, row: usize, col: usize) -> String {
    table
        .value(row, col)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn string_table_from_rows(rows: Vec<Vec<String>>) -> Table {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut table = Table::new();
    for col in 0..width {
        let cells: Vec<String> = rows
            .iter()
            .map(|row| row.get(col).cloned().unwrap_or_default())
            .collect();
        // Equal lengths by construction.
        let _ = table.push_column(Column::strings("", cells));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::io::Write;
    use tempfile::tempdir;

    /// 5 rows x 4 columns: one column-metadata header row, one
    /// row-metadata header column, a 4x3 numeric block.
    fn raw_rows() -> Vec<Vec<String>> {
        let rows = vec![
            vec!["Sample", "s1", "s2", "s3"],
            vec!["m1", "1", "2", "3"],
            vec!["m2", "4", "5", "6"],
            vec!["m3", "7", "8", "9"],
            vec!["m4", "10", "11", "12"],
        ];
        rows.into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_end_to_end_import_shapes() {
        let raw = string_table_from_rows(raw_rows());
        let settings = ImportSettings::default();
        let registry = NormalizerRegistry::with_builtins();
        let extended = build_extended_table(&raw, &settings, &registry).unwrap();

        assert_eq!(extended.data().ncols(), 3);
        assert_eq!(extended.data().nrows(), 4);
        assert_eq!(extended.total_rows(), 5);
        assert_eq!(extended.total_columns(), 4);
        assert_eq!(extended.column_meta_data_type_of_interest(), Some(0));
        assert_eq!(extended.row_meta_data_type_of_interest(), Some(0));

        // Data column names come from the column-metadata of interest.
        assert_eq!(
            transform::column_names(extended.data(), 0).unwrap(),
            vec!["s1", "s2", "s3"]
        );
        assert_eq!(
            extended.row_meta_data_of_interest_as_string(),
            vec!["m1", "m2", "m3", "m4"]
        );
        assert_eq!(extended.data().value(0, 0), Some(Value::Double(1.0)));
        assert_eq!(extended.data().value(3, 2), Some(Value::Double(12.0)));
    }

    #[test]
    fn test_import_with_transpose() {
        let raw = string_table_from_rows(raw_rows());
        let settings = ImportSettings {
            transpose: true,
            ..Default::default()
        };
        let registry = NormalizerRegistry::with_builtins();
        let extended = build_extended_table(&raw, &settings, &registry).unwrap();

        // The 5x4 source becomes 4x5 before slicing.
        assert_eq!(extended.data().ncols(), 4);
        assert_eq!(extended.data().nrows(), 3);
        assert_eq!(
            transform::column_names(extended.data(), 0).unwrap(),
            vec!["m1", "m2", "m3", "m4"]
        );
    }

    #[test]
    fn test_import_applies_normalization() {
        let raw = string_table_from_rows(raw_rows());
        let settings = ImportSettings {
            normalization_method: "Log2".to_string(),
            ..Default::default()
        };
        let registry = NormalizerRegistry::with_builtins();
        let extended = build_extended_table(&raw, &settings, &registry).unwrap();
        assert_eq!(extended.data().value(0, 0), Some(Value::Double(0.0))); // log2(1)
        assert_eq!(extended.data().value(0, 1), Some(Value::Double(1.0))); // log2(2)
    }

    #[test]
    fn test_import_rejects_unknown_normalization() {
        let raw = string_table_from_rows(raw_rows());
        let settings = ImportSettings {
            normalization_method: "Frobnicate".to_string(),
            ..Default::default()
        };
        let registry = NormalizerRegistry::with_builtins();
        assert!(matches!(
            build_extended_table(&raw, &settings, &registry),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_import_rejects_oversized_metadata_counts() {
        let raw = string_table_from_rows(raw_rows());
        let settings = ImportSettings {
            number_of_column_meta_data_types: 9,
            ..Default::default()
        };
        let registry = NormalizerRegistry::with_builtins();
        assert!(matches!(
            build_extended_table(&raw, &settings, &registry),
            Err(TableError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_non_numeric_data_cell_defaults_to_zero() {
        let rows = vec![
            vec!["Sample".to_string(), "s1".to_string()],
            vec!["m1".to_string(), "oops".to_string()],
        ];
        let raw = string_table_from_rows(rows);
        let registry = NormalizerRegistry::with_builtins();
        let extended =
            build_extended_table(&raw, &ImportSettings::default(), &registry).unwrap();
        assert_eq!(extended.data().value(0, 0), Some(Value::Double(0.0)));
    }

    #[test]
    fn test_read_delimited_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Sample,s1,s2").unwrap();
        writeln!(file, "m1,\"1.5\",2.5").unwrap();

        let table = read_delimited_text(&path, &ImportSettings::default()).unwrap();
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.value(1, 1), Some(Value::Str("1.5".into())));
    }

    #[test]
    fn test_read_delimited_text_merges_consecutive_delimiters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "a;;b").unwrap();
        writeln!(file, "c;d;").unwrap();

        let settings = ImportSettings {
            field_delimiter: ';',
            merge_consecutive_delimiters: true,
            ..Default::default()
        };
        let table = read_delimited_text(&path, &settings).unwrap();
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.value(0, 1), Some(Value::Str("b".into())));
        assert_eq!(table.value(1, 0), Some(Value::Str("c".into())));
    }
}
