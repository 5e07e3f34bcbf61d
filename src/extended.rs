//! Metadata-augmented table.
//!
//! An [`ExtendedTable`] layers row and column metadata of several named
//! kinds on top of a primary rectangular data table:
//!
//! ```text
//!                        ---------------------------------------------
//!                        |   CM02   |   CM12   |   CM22   |   CM32   |
//!                        |   CM01   |   CM11   |   CM21   |   CM31   |
//!                        |   CM00   |   CM10   |   CM20   |   CM30   |
//!                        ---------------------------------------------
//!  --------------------  ---------------------------------------------
//!  |  RM00   |  RM01  |  |    D00   |    D01   |    D02   |    D03   |
//!  |  RM10   |  RM11  |  |    D10   |    D11   |    D12   |    D13   |
//!  |  RM20   |  RM21  |  |    D20   |    D21   |    D22   |    D23   |
//!  |  RM30   |  RM31  |  |    D30   |    D31   |    D32   |    D33   |
//!  --------------------  ---------------------------------------------
//! ```
//!
//! Internally both metadata tables are stored with one row per metadata
//! kind and one column per data column (respectively data row), so
//! `column_meta_data` is `kinds x data-columns` and `row_meta_data` is
//! `kinds x data-rows`. One kind per axis may be designated "of interest";
//! it is the primary label for that axis.

use log::warn;

use crate::error::{Result, TableError};
use crate::transform;
use crate::value::{Column, Table, Value};

#[derive(Debug, Clone, Default)]
pub struct ExtendedTable {
    data: Table,
    column_meta_data: Table,
    row_meta_data: Table,
    column_meta_data_labels: Vec<String>,
    row_meta_data_labels: Vec<String>,
    column_meta_data_type_of_interest: Option<usize>,
    row_meta_data_type_of_interest: Option<usize>,
}

impl ExtendedTable {
    pub fn new() -> Self {
        ExtendedTable::default()
    }

    //
    // Data
    //

    pub fn data(&self) -> &Table {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Table {
        &mut self.data
    }

    /// Replace the primary data; `None` clears all columns.
    pub fn set_data(&mut self, data: Option<Table>) {
        match data {
            Some(table) => self.data = table,
            None => self.data.clear(),
        }
    }

    /// Shallow copy of the data with the row-metadata-of-interest column
    /// prepended, for grids that show a row header.
    pub fn data_with_row_header(&self) -> Result<Table> {
        let mut table = self.data.clone();
        if let Some(kind) = self.row_meta_data_type_of_interest {
            let name = self
                .row_meta_data_labels
                .get(kind)
                .cloned()
                .unwrap_or_default();
            let header = Column::strings(name, self.meta_data_row_as_strings(&self.row_meta_data, kind));
            transform::insert_column(&mut table, 0, header)?;
        }
        Ok(table)
    }

    //
    // Column metadata
    //

    pub fn column_meta_data_table(&self) -> &Table {
        &self.column_meta_data
    }

    /// Install the column-metadata table (`kinds x data-columns`) and the
    /// label naming each kind.
    pub fn set_column_meta_data(&mut self, table: Table, labels: Vec<String>) -> Result<()> {
        if table.nrows() != labels.len() {
            return Err(TableError::DimensionMismatch(format!(
                "{} column-metadata kinds but {} labels",
                table.nrows(),
                labels.len()
            )));
        }
        self.column_meta_data = table;
        self.column_meta_data_labels = labels;
        Ok(())
    }

    pub fn number_of_column_meta_data_types(&self) -> usize {
        self.column_meta_data.nrows()
    }

    pub fn has_column_meta_data(&self) -> bool {
        self.number_of_column_meta_data_types() > 0
    }

    pub fn column_meta_data_labels(&self) -> &[String] {
        &self.column_meta_data_labels
    }

    /// Values of one column-metadata kind, one entry per data column.
    pub fn column_meta_data(&self, kind: usize) -> Result<Vec<Value>> {
        self.meta_data_row(&self.column_meta_data, kind)
    }

    pub fn column_meta_data_type_of_interest(&self) -> Option<usize> {
        self.column_meta_data_type_of_interest
    }

    /// Select the column-metadata kind of interest. An out-of-range kind
    /// is rejected with a logged warning and the previous value retained:
    /// the index comes from user-editable configuration and is expected to
    /// be corrected interactively.
    pub fn set_column_meta_data_type_of_interest(&mut self, kind: usize) {
        if kind >= self.number_of_column_meta_data_types() {
            warn!(
                "invalid column-metadata type of interest {} ({} types available), keeping {:?}",
                kind,
                self.number_of_column_meta_data_types(),
                self.column_meta_data_type_of_interest
            );
            return;
        }
        self.column_meta_data_type_of_interest = Some(kind);
    }

    /// The of-interest column-metadata kind as strings, one per data
    /// column; empty when no kind is selected.
    pub fn column_meta_data_of_interest_as_string(&self) -> Vec<String> {
        match self.column_meta_data_type_of_interest {
            Some(kind) => self.meta_data_row_as_strings(&self.column_meta_data, kind),
            None => Vec::new(),
        }
    }

    //
    // Row metadata
    //

    pub fn row_meta_data_table(&self) -> &Table {
        &self.row_meta_data
    }

    /// Install the row-metadata table (`kinds x data-rows`) and the label
    /// naming each kind.
    pub fn set_row_meta_data(&mut self, table: Table, labels: Vec<String>) -> Result<()> {
        if table.nrows() != labels.len() {
            return Err(TableError::DimensionMismatch(format!(
                "{} row-metadata kinds but {} labels",
                table.nrows(),
                labels.len()
            )));
        }
        self.row_meta_data = table;
        self.row_meta_data_labels = labels;
        Ok(())
    }

    pub fn number_of_row_meta_data_types(&self) -> usize {
        self.row_meta_data.nrows()
    }

    pub fn has_row_meta_data(&self) -> bool {
        self.number_of_row_meta_data_types() > 0
    }

    pub fn row_meta_data_labels(&self) -> &[String] {
        &self.row_meta_data_labels
    }

    /// Values of one row-metadata kind, one entry per data row.
    pub fn row_meta_data(&self, kind: usize) -> Result<Vec<Value>> {
        self.meta_data_row(&self.row_meta_data, kind)
    }

    pub fn row_meta_data_type_of_interest(&self) -> Option<usize> {
        self.row_meta_data_type_of_interest
    }

    /// Select the row-metadata kind of interest; fail-soft like
    /// [`Self::set_column_meta_data_type_of_interest`].
    pub fn set_row_meta_data_type_of_interest(&mut self, kind: usize) {
        if kind >= self.number_of_row_meta_data_types() {
            warn!(
                "invalid row-metadata type of interest {} ({} types available), keeping {:?}",
                kind,
                self.number_of_row_meta_data_types(),
                self.row_meta_data_type_of_interest
            );
            return;
        }
        self.row_meta_data_type_of_interest = Some(kind);
    }

    /// The of-interest row-metadata kind as strings, one per data row;
    /// empty when no kind is selected.
    pub fn row_meta_data_of_interest_as_string(&self) -> Vec<String> {
        match self.row_meta_data_type_of_interest {
            Some(kind) => self.meta_data_row_as_strings(&self.row_meta_data, kind),
            None => Vec::new(),
        }
    }

    //
    // Unified grid counts
    //

    /// Rows of the on-screen grid: data rows plus one header row per
    /// column-metadata kind.
    pub fn total_rows(&self) -> usize {
        self.data.nrows() + self.number_of_column_meta_data_types()
    }

    /// Columns of the on-screen grid: data columns plus one header column
    /// per row-metadata kind.
    pub fn total_columns(&self) -> usize {
        self.data.ncols() + self.number_of_row_meta_data_types()
    }

    /// Check the structural invariants tying the three tables together.
    pub fn validate(&self) -> Result<()> {
        if self.column_meta_data.nrows() != self.column_meta_data_labels.len() {
            return Err(TableError::DimensionMismatch(
                "column-metadata kinds and labels disagree".to_string(),
            ));
        }
        if self.row_meta_data.nrows() != self.row_meta_data_labels.len() {
            return Err(TableError::DimensionMismatch(
                "row-metadata kinds and labels disagree".to_string(),
            ));
        }
        if self.has_column_meta_data() && self.column_meta_data.ncols() != self.data.ncols() {
            return Err(TableError::DimensionMismatch(format!(
                "column metadata covers {} columns, data has {}",
                self.column_meta_data.ncols(),
                self.data.ncols()
            )));
        }
        if self.has_row_meta_data() && self.row_meta_data.ncols() != self.data.nrows() {
            return Err(TableError::DimensionMismatch(format!(
                "row metadata covers {} rows, data has {}",
                self.row_meta_data.ncols(),
                self.data.nrows()
            )));
        }
        if let Some(kind) = self.column_meta_data_type_of_interest {
            if kind >= self.number_of_column_meta_data_types() {
                return Err(TableError::OutOfRange(format!(
                    "column-metadata type of interest {kind}"
                )));
            }
        }
        if let Some(kind) = self.row_meta_data_type_of_interest {
            if kind >= self.number_of_row_meta_data_types() {
                return Err(TableError::OutOfRange(format!(
                    "row-metadata type of interest {kind}"
                )));
            }
        }
        Ok(())
    }

    fn meta_data_row(&self, table: &Table, kind: usize) -> Result<Vec<Value>> {
        if kind >= table.nrows() {
            return Err(TableError::OutOfRange(format!(
                "metadata kind {kind} with {} kinds",
                table.nrows()
            )));
        }
        Ok((0..table.ncols())
            .map(|col| table.value(kind, col).unwrap_or(Value::Empty))
            .collect())
    }

    fn meta_data_row_as_strings(&self, table: &Table, kind: usize) -> Vec<String> {
        (0..table.ncols())
            .map(|col| {
                table
                    .value(kind, col)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}
