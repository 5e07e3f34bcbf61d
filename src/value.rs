//! Core table representation.
//!
//! A [`Table`] is an ordered sequence of named columns, each column a
//! homogeneous vector of one scalar kind. The kind of a column is decided
//! once, at construction, through the closed [`ColumnData`] enum; a
//! [`ColumnData::Variant`] column of tagged [`Value`]s is the fallback for
//! genuinely heterogeneous content (e.g. the output of transposing a table
//! whose columns do not share one kind).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// A single dynamically-typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Double(f64),
    Int(i64),
    Str(String),
    Empty,
}

impl Value {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(v) => write!(f, "{v}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Empty => Ok(()),
        }
    }
}

/// The scalar kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Double,
    Int,
    Str,
    Variant,
}

/// Homogeneous column storage, kind fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Double(Vec<f64>),
    Int(Vec<i64>),
    Str(Vec<String>),
    Variant(Vec<Value>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Double(_) => ColumnKind::Double,
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Str(_) => ColumnKind::Str,
            ColumnData::Variant(_) => ColumnKind::Variant,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Double(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Str(v) => v.len(),
            ColumnData::Variant(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row` as a [`Value`], `None` past the end.
    pub fn value(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Double(v) => v.get(row).map(|&x| Value::Double(x)),
            ColumnData::Int(v) => v.get(row).map(|&x| Value::Int(x)),
            ColumnData::Str(v) => v.get(row).map(|x| Value::Str(x.clone())),
            ColumnData::Variant(v) => v.get(row).cloned(),
        }
    }

    /// Swap the cells at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        match self {
            ColumnData::Double(v) => v.swap(a, b),
            ColumnData::Int(v) => v.swap(a, b),
            ColumnData::Str(v) => v.swap(a, b),
            ColumnData::Variant(v) => v.swap(a, b),
        }
    }

    /// Collect a sequence of values into the narrowest storage that holds
    /// them all: a uniform kind when every value agrees, variant otherwise.
    pub fn from_values(values: Vec<Value>) -> ColumnData {
        if values.iter().all(|v| matches!(v, Value::Double(_))) {
            ColumnData::Double(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Double(x) => x,
                        _ => unreachable!(),
                    })
                    .collect(),
            )
        } else if values.iter().all(|v| matches!(v, Value::Int(_))) {
            ColumnData::Int(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Int(x) => x,
                        _ => unreachable!(),
                    })
                    .collect(),
            )
        } else if values.iter().all(|v| matches!(v, Value::Str(_))) {
            ColumnData::Str(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::Str(x) => x,
                        _ => unreachable!(),
                    })
                    .collect(),
            )
        } else {
            ColumnData::Variant(values)
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn double(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column::new(name, ColumnData::Double(values))
    }

    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Column::new(name, ColumnData::Int(values))
    }

    pub fn str(name: impl Into<String>, values: Vec<&str>) -> Self {
        Column::new(
            name,
            ColumnData::Str(values.into_iter().map(String::from).collect()),
        )
    }

    pub fn strings(name: impl Into<String>, values: Vec<String>) -> Self {
        Column::new(name, ColumnData::Str(values))
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A rectangular table: named columns of identical length.
///
/// Column names need not be unique. Transforms over tables live in
/// [`crate::transform`]; this type only guards the rectangularity invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Table {
            columns: Vec::new(),
        }
    }

    /// Build a table from columns, enforcing equal lengths.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Table::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column; its length must match the current row count unless
    /// the table has no columns yet.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.nrows() {
            return Err(TableError::DimensionMismatch(format!(
                "column '{}' has {} rows, table has {}",
                column.name,
                column.len(),
                self.nrows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at (`row`, `col`) as a [`Value`].
    pub fn value(&self, row: usize, col: usize) -> Option<Value> {
        self.columns.get(col).and_then(|c| c.data.value(row))
    }

    /// Remove every column.
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub(crate) fn insert_column_unchecked(&mut self, position: usize, column: Column) {
        self.columns.insert(position, column);
    }

    pub(crate) fn swap_columns(&mut self, a: usize, b: usize) {
        self.columns.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert_eq!(table.ncols(), 0);
        assert_eq!(table.nrows(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_push_column_enforces_length() {
        let mut table = Table::new();
        table
            .push_column(Column::double("a", vec![1.0, 2.0]))
            .unwrap();
        let err = table
            .push_column(Column::double("b", vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, TableError::DimensionMismatch(_)));
        assert_eq!(table.ncols(), 1);
    }

    #[test]
    fn test_value_access() {
        let table = Table::from_columns(vec![
            Column::str("name", vec!["x", "y"]),
            Column::double("v", vec![0.5, 1.5]),
        ])
        .unwrap();
        assert_eq!(table.value(0, 0), Some(Value::Str("x".into())));
        assert_eq!(table.value(1, 1), Some(Value::Double(1.5)));
        assert_eq!(table.value(2, 1), None);
    }

    #[test]
    fn test_from_values_narrows_kind() {
        let uniform = ColumnData::from_values(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(uniform.kind(), ColumnKind::Int);

        let mixed = ColumnData::from_values(vec![Value::Int(1), Value::Str("a".into())]);
        assert_eq!(mixed.kind(), ColumnKind::Variant);
    }
}
