use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Value – a single cell of the campaign table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl Value {
    /// Guess the type of a raw text cell (CSV field, config entry).
    pub fn infer(s: &str) -> Self {
        if s.is_empty() {
            return Value::Null;
        }
        if !has_leading_zero(s) {
            if let Ok(i) = s.parse::<i64>() {
                return Value::Integer(i);
            }
            if let Ok(f) = s.parse::<f64>() {
                if f.is_finite() {
                    return Value::Float(f);
                }
            }
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::String(s.to_string())
    }

    /// Numeric view of the value, used for the age range and buckets.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Code-like tokens such as `007` must keep their zeros, so they stay text.
fn has_leading_zero(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s).as_bytes();
    digits.len() > 1 && digits[0] == b'0' && digits[1].is_ascii_digit()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An immutable table snapshot with pre-computed per-column unique values.
///
/// Rows store one [`Value`] per column, in `column_names` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Ordered list of column names, as found in the source header.
    pub column_names: Vec<String>,
    /// All records.
    pub rows: Vec<Vec<Value>>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Dataset {
    /// Build a dataset from a header and its rows, indexing unique values.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DataError> {
        let mut seen = BTreeSet::new();
        for name in &column_names {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateColumn(name.clone()));
            }
        }

        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != column_names.len() {
                return Err(DataError::RaggedRow {
                    row: row_no,
                    expected: column_names.len(),
                    found: row.len(),
                });
            }
            for (col, val) in column_names.iter().zip(row) {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(val.clone());
                }
            }
        }

        Ok(Dataset {
            column_names,
            rows,
            unique_values,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::InvalidColumn(name.to_string()))
    }

    /// Iterate over the values of one column.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a Value> + 'a, DataError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Minimum and maximum of the numeric cells of a column, if any.
    pub fn numeric_bounds(&self, name: &str) -> Result<Option<(f64, f64)>, DataError> {
        let bounds = self
            .column_values(name)?
            .filter_map(Value::as_f64)
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Ok(bounds)
    }

    /// New dataset holding the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let rows: Vec<Vec<Value>> = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();

        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = self
            .column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();
        for row in &rows {
            for (col, val) in self.column_names.iter().zip(row) {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(val.clone());
                }
            }
        }

        Dataset {
            column_names: self.column_names.clone(),
            rows,
            unique_values,
        }
    }
}

#[cfg(test)]
impl Dataset {
    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name).ok()?;
        self.rows.get(row).map(|r| &r[idx])
    }
}
