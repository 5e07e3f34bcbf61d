//! Statistics-engine result envelope.
//!
//! The external statistics engine receives a dense numeric array (built
//! with [`crate::transform::table_to_array`]) and returns named dense
//! arrays. [`EngineOutput`] holds those arrays and turns them back into
//! labeled, human-readable tables. A named array the caller expected but
//! the engine did not deliver is the one hard failure of this layer,
//! signalled as [`TableError::EngineOutputMissing`]; the enclosing
//! analysis decides how to abort.

use indexmap::IndexMap;
use ndarray::Array2;

use crate::dendrogram::MergeRecord;
use crate::error::{Result, TableError};
use crate::transform;
use crate::value::{Column, Table};

/// Named dense arrays returned by one engine invocation, in delivery
/// order.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    arrays: IndexMap<String, Array2<f64>>,
}

impl EngineOutput {
    pub fn new() -> Self {
        EngineOutput::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, array: Array2<f64>) {
        self.arrays.insert(name.into(), array);
    }

    /// Look up a named array; absence is a hard failure.
    pub fn array(&self, name: &str) -> Result<&Array2<f64>> {
        self.arrays
            .get(name)
            .ok_or_else(|| TableError::EngineOutputMissing(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.arrays.keys().map(String::as_str).collect()
    }

    /// The clustering `height` vector: `n-1` non-decreasing agglomeration
    /// distances, flattened from whatever shape the engine delivered.
    pub fn heights(&self) -> Result<Vec<f64>> {
        Ok(self.array("height")?.iter().copied().collect())
    }

    /// The clustering `merge` matrix, delivered flattened column-major:
    /// the first `n-1` values are the first child references, the second
    /// `n-1` values the second ones.
    pub fn merge_records(&self) -> Result<Vec<MergeRecord>> {
        let flat: Vec<f64> = self.array("merge")?.iter().copied().collect();
        if flat.len() % 2 != 0 {
            return Err(TableError::DimensionMismatch(format!(
                "merge matrix has {} values, expected an (n-1) x 2 layout",
                flat.len()
            )));
        }
        let steps = flat.len() / 2;
        Ok((0..steps)
            .map(|i| MergeRecord {
                left: flat[i] as i32,
                right: flat[i + steps] as i32,
            })
            .collect())
    }

    /// Rebuild a labeled table from a named array: one floating-point
    /// column per array column, `column_names` applied, and a leading
    /// string column `header_name` holding the row labels.
    pub fn labeled_table(
        &self,
        name: &str,
        header_name: &str,
        row_labels: &[String],
        column_names: &[String],
    ) -> Result<Table> {
        let array = self.array(name)?;
        let mut table = transform::array_to_table(array);
        transform::set_column_names(&mut table, column_names);
        transform::insert_column(
            &mut table,
            0,
            Column::strings(header_name, row_labels.to_vec()),
        )?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_missing_array_is_hard_failure() {
        let output = EngineOutput::new();
        assert!(matches!(
            output.array("height"),
            Err(TableError::EngineOutputMissing(_))
        ));
        assert!(matches!(
            output.merge_records(),
            Err(TableError::EngineOutputMissing(_))
        ));
    }

    #[test]
    fn test_merge_records_split_column_major() {
        let mut output = EngineOutput::new();
        // Three merge steps for four leaves: lefts then rights.
        output.insert(
            "merge",
            arr2(&[[-1.0], [-3.0], [1.0], [-2.0], [-4.0], [2.0]]),
        );
        let records = output.merge_records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], MergeRecord { left: -1, right: -2 });
        assert_eq!(records[1], MergeRecord { left: -3, right: -4 });
        assert_eq!(records[2], MergeRecord { left: 1, right: 2 });
    }

    #[test]
    fn test_merge_records_rejects_odd_length() {
        let mut output = EngineOutput::new();
        output.insert("merge", arr2(&[[-1.0], [-2.0], [1.0]]));
        assert!(matches!(
            output.merge_records(),
            Err(TableError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_labeled_table_reconstruction() {
        let mut output = EngineOutput::new();
        output.insert("scores", arr2(&[[0.1, 0.2], [0.3, 0.4]]));
        let table = output
            .labeled_table(
                "scores",
                "Sample",
                &["s1".to_string(), "s2".to_string()],
                &["PC1".to_string(), "PC2".to_string()],
            )
            .unwrap();
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.column(0).unwrap().name, "Sample");
        assert_eq!(table.column(1).unwrap().name, "PC1");
        assert_eq!(table.value(1, 2).unwrap().as_f64(), Some(0.4));
    }

    #[test]
    fn test_labeled_table_row_label_mismatch() {
        let mut output = EngineOutput::new();
        output.insert("scores", arr2(&[[0.1], [0.3]]));
        let err = output
            .labeled_table("scores", "Sample", &["s1".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, TableError::DimensionMismatch(_)));
    }
}
