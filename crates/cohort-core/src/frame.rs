// crates/cohort-core/src/frame.rs
//
// Tabular feature data handed to the drift engine.
//
// A `FeatureFrame` is a column-major table of named columns. Numeric
// columns hold `Option<f64>` cells; categorical columns hold strings. The
// drift engine only ever looks at numeric columns, but categorical columns
// are kept so that a whole customer table can be loaded without a schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CohortError;

static NULL: Value = Value::Null;

/// Cell storage for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cells", rename_all = "snake_case")]
pub enum ColumnValues {
    /// Numeric cells. `None` marks a missing value.
    Numeric(Vec<Option<f64>>),
    /// Free-form categorical cells. `None` marks a missing value.
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of cells (missing included).
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a frame.
    pub name: String,
    /// The column's cells.
    pub values: ColumnValues,
}

/// A column-major table of named feature columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureFrame {
    columns: Vec<Column>,
}

impl FeatureFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Builder helper: append a fully populated numeric column.
    ///
    /// Panics on a duplicate name or a length mismatch; use
    /// [`FeatureFrame::push_column`] for fallible construction.
    pub fn with_numeric(mut self, name: &str, values: Vec<f64>) -> Self {
        let cells = values.into_iter().map(Some).collect();
        self.push_column(Column {
            name: name.to_string(),
            values: ColumnValues::Numeric(cells),
        })
        .unwrap_or_else(|e| panic!("with_numeric({}): {}", name, e));
        self
    }

    /// Builder helper: append a categorical column.
    ///
    /// Panics on a duplicate name or a length mismatch.
    pub fn with_categorical(mut self, name: &str, values: Vec<&str>) -> Self {
        let cells = values.into_iter().map(|v| Some(v.to_string())).collect();
        self.push_column(Column {
            name: name.to_string(),
            values: ColumnValues::Categorical(cells),
        })
        .unwrap_or_else(|e| panic!("with_categorical({}): {}", name, e));
        self
    }

    /// Append a column, checking name uniqueness and row count.
    pub fn push_column(&mut self, column: Column) -> Result<(), CohortError> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(CohortError::InvalidData(format!(
                "duplicate column '{}'",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.values.len() != column.values.len() {
                return Err(CohortError::InvalidData(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.values.len(),
                    first.values.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows (0 for a frame with no columns).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    /// Number of columns of any kind.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// All columns in insertion order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns in insertion order, as `(name, cells)` pairs.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns.iter().filter_map(|c| match &c.values {
            ColumnValues::Numeric(cells) => Some((c.name.as_str(), cells.as_slice())),
            ColumnValues::Categorical(_) => None,
        })
    }

    /// Non-missing values of a numeric column. `None` if the column does
    /// not exist or is categorical.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        match self.column(name).map(|c| &c.values) {
            Some(ColumnValues::Numeric(cells)) => Some(non_missing(cells)),
            _ => None,
        }
    }

    /// Build a frame from rows of raw text cells (CSV-style input).
    ///
    /// A column is numeric when every non-empty cell parses as `f64`;
    /// otherwise it is categorical. Empty cells are missing in both cases.
    pub fn from_text_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Self, CohortError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(CohortError::InvalidData(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }

        let mut frame = FeatureFrame::new();
        for (col_idx, name) in headers.iter().enumerate() {
            let raw: Vec<Option<&str>> = rows
                .iter()
                .map(|row| {
                    let cell = row[col_idx].trim();
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell)
                    }
                })
                .collect();

            let parsed: Option<Vec<Option<f64>>> = raw
                .iter()
                .map(|cell| match cell {
                    None => Some(None),
                    Some(s) => s.parse::<f64>().ok().map(Some),
                })
                .collect();

            let values = match parsed {
                Some(cells) => ColumnValues::Numeric(cells),
                None => ColumnValues::Categorical(
                    raw.iter().map(|c| c.map(str::to_string)).collect(),
                ),
            };
            frame.push_column(Column {
                name: name.trim().to_string(),
                values,
            })?;
        }
        Ok(frame)
    }

    /// Build a frame from a list of flat JSON objects.
    ///
    /// Columns are the union of keys across records. A column is numeric if
    /// every non-null value is a JSON number; strings and booleans make it
    /// categorical. Absent keys and `null` are missing values. Nested arrays
    /// or objects are rejected.
    pub fn from_json_records(records: &[Value]) -> Result<Self, CohortError> {
        let mut names: Vec<String> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                CohortError::InvalidData(format!("record {} is not a JSON object", i))
            })?;
            for key in obj.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }

        let mut frame = FeatureFrame::new();
        for name in names {
            let cells: Vec<&Value> = records
                .iter()
                .map(|r| r.get(&name).unwrap_or(&NULL))
                .collect();

            if let Some(bad) = cells.iter().find(|v| v.is_array() || v.is_object()) {
                return Err(CohortError::InvalidData(format!(
                    "column '{}' holds a nested value: {}",
                    name, bad
                )));
            }

            let all_numeric = cells.iter().all(|v| v.is_null() || v.is_number());
            let values = if all_numeric {
                ColumnValues::Numeric(cells.iter().map(|v| v.as_f64()).collect())
            } else {
                ColumnValues::Categorical(
                    cells
                        .iter()
                        .map(|v| match v {
                            Value::Null => None,
                            Value::String(s) => Some(s.clone()),
                            other => Some(other.to_string()),
                        })
                        .collect(),
                )
            };
            frame.push_column(Column { name, values })?;
        }
        Ok(frame)
    }
}

/// Drop missing and non-finite cells, keeping order.
pub fn non_missing(cells: &[Option<f64>]) -> Vec<f64> {
    cells
        .iter()
        .filter_map(|c| *c)
        .filter(|v| v.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_columns_skip_categorical() {
        let frame = FeatureFrame::new()
            .with_numeric("Age", vec![25.0, 30.0])
            .with_categorical("Profession", vec!["Artist", "Doctor"])
            .with_numeric("Family Size", vec![1.0, 4.0]);

        let names: Vec<&str> = frame.numeric_columns().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Age", "Family Size"]);
        assert_eq!(frame.num_rows(), 2);
        assert_eq!(frame.num_columns(), 3);
    }

    #[test]
    fn push_column_rejects_length_mismatch() {
        let mut frame = FeatureFrame::new().with_numeric("a", vec![1.0, 2.0]);
        let err = frame
            .push_column(Column {
                name: "b".to_string(),
                values: ColumnValues::Numeric(vec![Some(1.0)]),
            })
            .unwrap_err();
        assert!(matches!(err, CohortError::InvalidData(_)));
    }

    #[test]
    fn push_column_rejects_duplicate_name() {
        let mut frame = FeatureFrame::new().with_numeric("a", vec![1.0]);
        let err = frame
            .push_column(Column {
                name: "a".to_string(),
                values: ColumnValues::Numeric(vec![Some(2.0)]),
            })
            .unwrap_err();
        assert!(matches!(err, CohortError::InvalidData(_)));
    }

    #[test]
    fn non_missing_drops_none_and_nan() {
        let cells = vec![Some(1.0), None, Some(f64::NAN), Some(3.0), Some(f64::INFINITY)];
        assert_eq!(non_missing(&cells), vec![1.0, 3.0]);
    }

    #[test]
    fn text_rows_infer_column_kinds() {
        let headers = strings(&["CustomerID", "Annual Income ($)", "Profession"]);
        let rows = vec![
            strings(&["1", "15000", "Healthcare"]),
            strings(&["2", "", "Engineer"]),
            strings(&["3", "35000.5", ""]),
        ];
        let frame = FeatureFrame::from_text_rows(&headers, &rows).unwrap();

        assert_eq!(frame.numeric_values("Annual Income ($)").unwrap(), vec![15000.0, 35000.5]);
        match &frame.column("Profession").unwrap().values {
            ColumnValues::Categorical(cells) => {
                assert_eq!(cells[0].as_deref(), Some("Healthcare"));
                assert_eq!(cells[2], None);
            }
            other => panic!("expected categorical, got {:?}", other),
        }
    }

    #[test]
    fn text_rows_with_unparseable_cell_become_categorical() {
        let headers = strings(&["Age"]);
        let rows = vec![strings(&["25"]), strings(&["unknown"])];
        let frame = FeatureFrame::from_text_rows(&headers, &rows).unwrap();
        assert!(frame.numeric_values("Age").is_none());
        assert_eq!(frame.numeric_columns().count(), 0);
    }

    #[test]
    fn text_rows_reject_ragged_input() {
        let headers = strings(&["a", "b"]);
        let rows = vec![strings(&["1"])];
        assert!(FeatureFrame::from_text_rows(&headers, &rows).is_err());
    }

    #[test]
    fn json_records_union_keys_and_nulls() {
        let records: Vec<Value> = serde_json::from_str(
            r#"[{"Age": 25, "Gender": "Male"}, {"Age": null, "Score": 40}, {"Age": 31.5}]"#,
        )
        .unwrap();
        let frame = FeatureFrame::from_json_records(&records).unwrap();

        assert_eq!(frame.num_rows(), 3);
        assert_eq!(frame.numeric_values("Age").unwrap(), vec![25.0, 31.5]);
        assert_eq!(frame.numeric_values("Score").unwrap(), vec![40.0]);
        assert!(frame.numeric_values("Gender").is_none());
    }

    #[test]
    fn json_records_reject_nested_values() {
        let records: Vec<Value> = serde_json::from_str(r#"[{"a": [1, 2]}]"#).unwrap();
        assert!(FeatureFrame::from_json_records(&records).is_err());
    }
}
