//! Realtime query results and how rows map onto series.

use serde::Deserialize;

use crate::naming::NOT_SET;

/// One fetch's response: ordered rows of string cells.
///
/// The API omits `rows` entirely when there is no data, which decodes as zero rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Classify by row count: exactly one row is a scalar, anything else
    /// (including zero rows) is vector data.
    pub fn shape(&self) -> Shape<'_> {
        match self.rows.as_slice() {
            [only] => Shape::Scalar(only.first().map(String::as_str).unwrap_or("")),
            rows => Shape::Vector(rows),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Shape<'a> {
    /// First cell of the single row.
    Scalar(&'a str),
    Vector(&'a [Vec<String>]),
}

/// A `[category, dimensionValue, value]` row of vector data.
#[derive(Debug, PartialEq)]
pub struct VectorRow<'a> {
    pub category: &'a str,
    pub dimension: &'a str,
    pub value: &'a str,
}

/// Why a vector row produced no update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    NotSet,
    Short,
}

impl RowSkip {
    pub fn as_str(self) -> &'static str {
        match self {
            RowSkip::NotSet => "not_set",
            RowSkip::Short => "short_row",
        }
    }
}

/// Split a vector row into its cells. Extra cells are ignored.
pub fn vector_row(row: &[String]) -> std::result::Result<VectorRow<'_>, RowSkip> {
    let [category, dimension, value, ..] = row else {
        return Err(RowSkip::Short);
    };
    if category.contains(NOT_SET) {
        return Err(RowSkip::NotSet);
    }
    Ok(VectorRow {
        category,
        dimension,
        value,
    })
}

/// Parse a cell as `f64`. Unparsable input yields `0.0`; the flag reports
/// whether that coercion happened.
pub fn parse_value(cell: &str) -> (f64, bool) {
    match cell.parse::<f64>() {
        Ok(v) => (v, false),
        Err(_) => (0.0, true),
    }
}
