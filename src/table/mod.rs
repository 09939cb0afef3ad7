//! Canonical in-memory table shared by every reader and writer
//!
//! A [`TabularData`] is an ordered list of unique column names plus rows that
//! carry exactly one [`Value`] per column. Absent values are stored as
//! [`Value::Null`], never omitted.

pub mod infer;

use std::collections::HashSet;
use std::fmt;

use serde_json::Number;

use crate::error::{ConversionError, ConversionResult};

/// Scalar cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Value {
    /// Build a numeric value from a float; non-finite floats become null
    pub fn from_f64(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Convert into the equivalent JSON scalar
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Text form used by delimited output: null is the empty string
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from_f64(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Ordered columns and rows of scalar values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularData {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TabularData {
    /// Create an empty table with the given header
    ///
    /// Column names must be unique.
    pub fn new<I, S>(columns: I) -> ConversionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some(duplicate) = find_duplicate(&columns) {
            return Err(ConversionError::configuration(format!(
                "duplicate column name '{}'",
                duplicate
            )));
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table from a header and positional rows
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> ConversionResult<Self> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row given in column order
    pub fn push_row(&mut self, values: Vec<Value>) -> ConversionResult<()> {
        if values.len() != self.columns.len() {
            return Err(ConversionError::SchemaMismatch {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Append a row given as (column, value) pairs; absent columns become null
    ///
    /// Unknown column names are rejected.
    pub fn push_record<K, I>(&mut self, record: I) -> ConversionResult<()>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut values = vec![Value::Null; self.columns.len()];
        for (name, value) in record {
            let index = self.column_index(name.as_ref()).ok_or_else(|| {
                ConversionError::configuration(format!("unknown column '{}'", name.as_ref()))
            })?;
            values[index] = value;
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.rows.iter_mut().flatten()
    }

    /// Drop columns and rows whose values are all null or empty strings
    pub fn prune_empty(&mut self) {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|col| self.rows.iter().any(|row| !row[col].is_blank()))
            .collect();

        if keep.iter().any(|k| !k) {
            let columns = std::mem::take(&mut self.columns);
            self.columns = columns
                .into_iter()
                .zip(&keep)
                .filter_map(|(name, k)| k.then_some(name))
                .collect();

            for row in &mut self.rows {
                let values = std::mem::take(row);
                *row = values
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(value, k)| k.then_some(value))
                    .collect();
            }
        }

        self.rows.retain(|row| row.iter().any(|v| !v.is_blank()));
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// (column, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

pub(crate) fn find_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}
