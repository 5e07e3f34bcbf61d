//! Normalization methods applied to an imported data table.
//!
//! Methods are looked up by name in a [`NormalizerRegistry`] that the
//! caller passes into the import step explicitly; there is no process-wide
//! registry. Each method mutates the data table in place and reports
//! success with a boolean, leaving severity to the caller.

use indexmap::IndexMap;
use log::warn;

use crate::value::{ColumnData, Table};

/// A normalization method: mutate the data table in place, return `false`
/// when the table could not be normalized.
pub type NormalizeFn = fn(&mut Table) -> bool;

/// Ordered name -> method mapping, injected into the import step.
#[derive(Debug, Clone, Default)]
pub struct NormalizerRegistry {
    methods: IndexMap<String, NormalizeFn>,
}

impl NormalizerRegistry {
    pub fn new() -> Self {
        NormalizerRegistry::default()
    }

    /// Registry with the built-in methods: `"No"`, `"Log2"`, `"Quantile"`.
    pub fn with_builtins() -> Self {
        let mut registry = NormalizerRegistry::new();
        registry.register("No", apply_none);
        registry.register("Log2", apply_log2);
        registry.register("Quantile", apply_quantile);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, method: NormalizeFn) {
        self.methods.insert(name.into(), method);
    }

    pub fn get(&self, name: &str) -> Option<NormalizeFn> {
        self.methods.get(name).copied()
    }

    /// Registered method names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }
}

/// Identity method.
fn apply_none(_table: &mut Table) -> bool {
    true
}

/// Apply `log2` to every cell of every floating-point column; other
/// columns are skipped.
fn apply_log2(table: &mut Table) -> bool {
    for col in 0..table.ncols() {
        let column = match table.column_mut(col) {
            Some(c) => c,
            None => continue,
        };
        if let ColumnData::Double(values) = &mut column.data {
            for v in values.iter_mut() {
                *v = v.log2();
            }
        }
    }
    true
}

/// Quantile normalization: every floating-point column's values are
/// replaced by the across-column means of the sorted values at the same
/// rank, making the columns share one distribution.
fn apply_quantile(table: &mut Table) -> bool {
    let numeric: Vec<usize> = (0..table.ncols())
        .filter(|&c| {
            matches!(
                table.column(c).map(|col| &col.data),
                Some(ColumnData::Double(_))
            )
        })
        .collect();
    if numeric.is_empty() || table.nrows() == 0 {
        warn!("quantile normalization skipped: no floating-point columns");
        return false;
    }

    let nrows = table.nrows();

    // Rank positions per column, then the mean of each rank across columns.
    let mut rank_means = vec![0.0_f64; nrows];
    let mut orders: Vec<Vec<usize>> = Vec::with_capacity(numeric.len());
    for &c in &numeric {
        let values = match &table.column(c).unwrap().data {
            ColumnData::Double(v) => v,
            _ => unreachable!(),
        };
        let mut order: Vec<usize> = (0..nrows).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        for (rank, &row) in order.iter().enumerate() {
            rank_means[rank] += values[row];
        }
        orders.push(order);
    }
    for mean in rank_means.iter_mut() {
        *mean /= numeric.len() as f64;
    }

    for (order, &c) in orders.iter().zip(&numeric) {
        if let ColumnData::Double(values) = &mut table.column_mut(c).unwrap().data {
            for (rank, &row) in order.iter().enumerate() {
                values[row] = rank_means[rank];
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Column;
    use approx::assert_relative_eq;

    #[test]
    fn test_registry_lookup_and_order() {
        let registry = NormalizerRegistry::with_builtins();
        assert!(registry.get("Log2").is_some());
        assert!(registry.get("log2").is_none());
        assert_eq!(registry.names(), vec!["No", "Log2", "Quantile"]);
    }

    #[test]
    fn test_log2_applies_per_cell() {
        let mut table = Table::from_columns(vec![
            Column::double("a", vec![1.0, 8.0]),
            Column::str("label", vec!["x", "y"]),
        ])
        .unwrap();
        assert!(apply_log2(&mut table));
        match &table.column(0).unwrap().data {
            ColumnData::Double(v) => {
                assert_relative_eq!(v[0], 0.0);
                assert_relative_eq!(v[1], 3.0);
            }
            _ => panic!("expected a floating-point column"),
        }
        // Non-numeric columns pass through untouched.
        assert_eq!(
            table.column(1).unwrap().data,
            ColumnData::Str(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_quantile_equalizes_distributions() {
        let mut table = Table::from_columns(vec![
            Column::double("a", vec![5.0, 2.0, 3.0]),
            Column::double("b", vec![4.0, 1.0, 6.0]),
        ])
        .unwrap();
        assert!(apply_quantile(&mut table));

        // Sorted a = [2,3,5], sorted b = [1,4,6]; rank means = [1.5, 3.5, 5.5].
        match (
            &table.column(0).unwrap().data,
            &table.column(1).unwrap().data,
        ) {
            (ColumnData::Double(a), ColumnData::Double(b)) => {
                assert_relative_eq!(a[0], 5.5);
                assert_relative_eq!(a[1], 1.5);
                assert_relative_eq!(a[2], 3.5);
                assert_relative_eq!(b[0], 3.5);
                assert_relative_eq!(b[1], 1.5);
                assert_relative_eq!(b[2], 5.5);
            }
            _ => panic!("expected floating-point columns"),
        }
    }

    #[test]
    fn test_quantile_without_numeric_columns_reports_failure() {
        let mut table = Table::from_columns(vec![Column::str("label", vec!["x"])]).unwrap();
        assert!(!apply_quantile(&mut table));
    }
}
