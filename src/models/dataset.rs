use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::NA_TOKENS;

/// A single field of a tabular record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Interpret a raw CSV field, mapping the usual NA spellings to `Missing`.
    pub fn from_raw(raw: &str) -> Self {
        if NA_TOKENS.contains(&raw) {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce to a number; anything unparseable (or NaN) becomes `Missing`.
    pub fn to_numeric(&self) -> Cell {
        match self {
            Cell::Number(v) if !v.is_nan() => Cell::Number(*v),
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if !v.is_nan() => Cell::Number(v),
                _ => Cell::Missing,
            },
            _ => Cell::Missing,
        }
    }

    /// Key used for exact-duplicate detection.
    ///
    /// Numbers are keyed by bit pattern so `0.0` and `-0.0` stay distinct,
    /// matching their written forms.
    pub(crate) fn identity(&self) -> CellKey<'_> {
        match self {
            Cell::Missing => CellKey::Missing,
            Cell::Text(s) => CellKey::Text(s),
            Cell::Number(v) => CellKey::Number(v.to_bits()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Missing,
    Text(&'a str),
    Number(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Numeric,
    Temporal,
    Categorical,
}

/// An ordered, in-memory table read from one CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        let kinds = vec![ColumnKind::Text; headers.len()];
        Self {
            name: name.into(),
            headers,
            kinds,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from raw string fields, applying NA detection.
    pub fn from_raw_rows(name: impl Into<String>, headers: &[&str], rows: &[Vec<&str>]) -> Self {
        let mut dataset = Self::new(name, headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            dataset.push_row(row.iter().map(|field| Cell::from_raw(field)).collect());
        }
        dataset
    }

    /// Append a row, padding short rows with `Missing` and truncating long ones.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Missing);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn kind(&self, index: usize) -> ColumnKind {
        self.kinds[index]
    }

    pub fn set_kind(&mut self, index: usize, kind: ColumnKind) {
        self.kinds[index] = kind;
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.rows[row][column]
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Non-missing numeric values of a column.
    pub fn numeric_values(&self, index: usize) -> Vec<f64> {
        self.column(index).filter_map(Cell::as_number).collect()
    }

    pub fn map_column<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
    }

    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: FnMut(&Vec<Cell>) -> bool,
    {
        self.rows.retain(f);
    }

    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Vec<Cell>, &Vec<Cell>) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }
}
