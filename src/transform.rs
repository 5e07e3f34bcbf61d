//! Table-transform algorithm library.
//!
//! Transpose with header-promotion options, axis flips, positional column
//! insertion, column-name utilities, and the bidirectional bridge between a
//! [`Table`] and a dense `ndarray` matrix handed to the external statistics
//! engine.
//!
//! Every function here follows copy-on-transform semantics: the source is
//! never touched unless the `_in_place` variant is called, and the in-place
//! variants are atomic (the table is either fully replaced or left as it
//! was on failure).

use log::warn;
use ndarray::{Array1, Array2};

use crate::error::{Result, TableError};
use crate::value::{Column, ColumnData, ColumnKind, Table, Value};

/// Header-promotion options for [`transpose`], combinable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransposeOptions {
    /// Exclude the source's first column from the transposed data and use
    /// its cells as the destination column names.
    pub first_column_into_names: bool,
    /// Prepend a string column holding the source column names to the
    /// destination.
    pub column_names_into_first_column: bool,
}

impl TransposeOptions {
    pub const NONE: TransposeOptions = TransposeOptions {
        first_column_into_names: false,
        column_names_into_first_column: false,
    };

    pub const FIRST_COLUMN_INTO_NAMES: TransposeOptions = TransposeOptions {
        first_column_into_names: true,
        column_names_into_first_column: false,
    };

    pub const COLUMN_NAMES_INTO_FIRST_COLUMN: TransposeOptions = TransposeOptions {
        first_column_into_names: false,
        column_names_into_first_column: true,
    };
}

/// Which axes [`flip`] reverses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipOptions {
    /// Reverse row order (top-bottom).
    pub vertical_axis: bool,
    /// Reverse column order (left-right).
    pub horizontal_axis: bool,
}

/// Transpose `src`: destination column `i` is the concatenation of `src`'s
/// row `i` across all columns.
///
/// When every source column (after header exclusion) shares one scalar
/// kind the destination columns use that kind; otherwise every destination
/// column falls back to variant storage. A zero-column table transposes to
/// itself trivially.
pub fn transpose(src: &Table, options: TransposeOptions) -> Result<Table> {
    if src.ncols() == 0 {
        return Ok(src.clone());
    }

    let cid_offset = usize::from(options.first_column_into_names);
    let data_columns = &src.columns()[cid_offset.min(src.ncols())..];

    // One shared kind across the transposed block, or variant fallback.
    let uniform_kind = data_columns
        .first()
        .map(Column::kind)
        .filter(|&kind| data_columns.iter().all(|c| c.kind() == kind));

    let mut dest = Table::new();
    for row in 0..src.nrows() {
        let values: Vec<Value> = data_columns
            .iter()
            .map(|c| c.data.value(row).unwrap_or(Value::Empty))
            .collect();
        let data = match uniform_kind {
            Some(ColumnKind::Variant) | None => ColumnData::Variant(values),
            Some(_) => ColumnData::from_values(values),
        };
        let name = if options.first_column_into_names {
            src.value(row, 0)
                .map(|v| v.to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        dest.push_column(Column::new(name, data))?;
    }

    if options.column_names_into_first_column {
        let names: Vec<String> = data_columns.iter().map(|c| c.name.clone()).collect();
        let header_name = if options.first_column_into_names {
            src.column(0).map(|c| c.name.clone()).unwrap_or_default()
        } else {
            String::new()
        };
        insert_column(&mut dest, 0, Column::strings(header_name, names))?;
    }

    Ok(dest)
}

/// In-place [`transpose`]; the table is untouched if the transpose fails.
pub fn transpose_in_place(table: &mut Table, options: TransposeOptions) -> Result<()> {
    let transposed = transpose(table, options)?;
    *table = transposed;
    Ok(())
}

/// Reverse row and/or column order from the given offsets onward; rows and
/// columns before an offset keep their position.
///
/// Columns being swapped by a horizontal flip must share one scalar kind
/// pairwise, otherwise the flip fails with [`TableError::TypeMismatch`].
/// An offset at or past the flipped dimension fails with
/// [`TableError::OutOfRange`].
pub fn flip(
    src: &Table,
    options: FlipOptions,
    horizontal_offset: usize,
    vertical_offset: usize,
) -> Result<Table> {
    if options.vertical_axis && vertical_offset >= src.nrows() {
        return Err(TableError::OutOfRange(format!(
            "vertical offset {vertical_offset} with {} rows",
            src.nrows()
        )));
    }
    if options.horizontal_axis && horizontal_offset >= src.ncols() {
        return Err(TableError::OutOfRange(format!(
            "horizontal offset {horizontal_offset} with {} columns",
            src.ncols()
        )));
    }

    if options.horizontal_axis {
        // Pairwise kind check before any copying so failure leaves nothing
        // half-flipped.
        let span = src.ncols() - horizontal_offset;
        for i in 0..span / 2 {
            let left = src.column(horizontal_offset + i).unwrap();
            let right = src.column(src.ncols() - 1 - i).unwrap();
            if left.kind() != right.kind() {
                return Err(TableError::TypeMismatch(format!(
                    "cannot swap column '{}' ({:?}) with '{}' ({:?})",
                    left.name,
                    left.kind(),
                    right.name,
                    right.kind()
                )));
            }
        }
    }

    let mut dest = src.clone();

    if options.vertical_axis {
        let nrows = dest.nrows();
        let span = nrows - vertical_offset;
        for col in 0..dest.ncols() {
            let column = dest.column_mut(col).unwrap();
            for i in 0..span / 2 {
                column.data.swap(vertical_offset + i, nrows - 1 - i);
            }
        }
    }

    if options.horizontal_axis {
        let ncols = dest.ncols();
        let span = ncols - horizontal_offset;
        for i in 0..span / 2 {
            dest.swap_columns(horizontal_offset + i, ncols - 1 - i);
        }
    }

    Ok(dest)
}

/// In-place [`flip`]; the table is untouched if the flip fails.
pub fn flip_in_place(
    table: &mut Table,
    options: FlipOptions,
    horizontal_offset: usize,
    vertical_offset: usize,
) -> Result<()> {
    let flipped = flip(table, options, horizontal_offset, vertical_offset)?;
    *table = flipped;
    Ok(())
}

/// Insert `column` at `position`, clamped into `[0, ncols]` (negative
/// clamps to 0, past-the-end appends).
///
/// Fails with [`TableError::DimensionMismatch`], leaving the table
/// unchanged, when the column length does not match the row count of a
/// non-empty table. A table with zero rows accepts any length; the
/// inserted column establishes the row count.
pub fn insert_column(table: &mut Table, position: isize, column: Column) -> Result<()> {
    if table.nrows() != 0 && column.len() != table.nrows() {
        return Err(TableError::DimensionMismatch(format!(
            "column '{}' has {} rows, table has {}",
            column.name,
            column.len(),
            table.nrows()
        )));
    }
    let position = position.clamp(0, table.ncols() as isize) as usize;
    table.insert_column_unchecked(position, column);
    Ok(())
}

/// Names of the columns from `offset` onward.
pub fn column_names(table: &Table, offset: usize) -> Result<Vec<String>> {
    if offset > table.ncols() {
        return Err(TableError::OutOfRange(format!(
            "column-name offset {offset} with {} columns",
            table.ncols()
        )));
    }
    Ok(table.columns()[offset..]
        .iter()
        .map(|c| c.name.clone())
        .collect())
}

/// Assign `names[i]` to column `i` up to whichever runs out first; extra
/// names are silently ignored.
pub fn set_column_names(table: &mut Table, names: &[String]) {
    for (i, name) in names.iter().enumerate().take(table.ncols()) {
        if let Some(column) = table.column_mut(i) {
            column.name = name.clone();
        }
    }
}

/// Build a dense row-major matrix from every column of `table`.
pub fn table_to_array(table: &Table) -> Result<Array2<f64>> {
    let all: Vec<usize> = (0..table.ncols()).collect();
    table_to_array_columns(table, &all)
}

/// Build a dense row-major matrix from the selected columns, in selection
/// order. Every selected column must be numeric.
pub fn table_to_array_columns(table: &Table, column_indices: &[usize]) -> Result<Array2<f64>> {
    if column_indices.is_empty() {
        return Err(TableError::EmptyInput(
            "no columns selected for the dense array".to_string(),
        ));
    }
    let mut dense = Array2::zeros((table.nrows(), column_indices.len()));
    for (out_col, &index) in column_indices.iter().enumerate() {
        let column = table.column(index).ok_or_else(|| {
            TableError::OutOfRange(format!(
                "column index {index} with {} columns",
                table.ncols()
            ))
        })?;
        match &column.data {
            ColumnData::Double(values) => {
                for (row, &v) in values.iter().enumerate() {
                    dense[[row, out_col]] = v;
                }
            }
            ColumnData::Int(values) => {
                for (row, &v) in values.iter().enumerate() {
                    dense[[row, out_col]] = v as f64;
                }
            }
            _ => {
                return Err(TableError::TypeMismatch(format!(
                    "column '{}' is not numeric",
                    column.name
                )));
            }
        }
    }
    Ok(dense)
}

/// Wrap a dense matrix back into a table, one floating-point column per
/// matrix column, named by position.
pub fn array_to_table(array: &Array2<f64>) -> Table {
    let mut table = Table::new();
    for (i, col) in array.columns().into_iter().enumerate() {
        let column = Column::double(i.to_string(), col.to_vec());
        if let Err(err) = table.push_column(column) {
            // Columns of one Array2 always agree in length.
            warn!("array_to_table: {err}");
        }
    }
    table
}

/// Wrap a vector into a single-column table.
pub fn array1_to_table(array: &Array1<f64>) -> Table {
    let mut table = Table::new();
    let column = Column::double("0", array.to_vec());
    if let Err(err) = table.push_column(column) {
        warn!("array1_to_table: {err}");
    }
    table
}
