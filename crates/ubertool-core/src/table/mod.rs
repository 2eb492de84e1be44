//! Column-oriented scenario tables.
//!
//! A [`Table`] is the unit exchanged with the boundary layer: named columns over a
//! shared row index. Index labels are kept verbatim so that responses line up with
//! the rows the caller sent.

mod json;

use crate::domain::{ModelError, ModelResult};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(index: Vec<String>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Table with positional labels `"0"..n`.
    pub fn with_row_count(row_count: usize) -> Self {
        Self::new((0..row_count).map(|row| row.to_string()).collect())
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        cells: Vec<CellValue>,
    ) -> ModelResult<()> {
        let name = name.into();
        if cells.len() != self.index.len() {
            return Err(ModelError::input_validation(
                "INPUT.TABLE_FORMAT",
                format!(
                    "column '{}' has {} cells but the table index has {} rows",
                    name,
                    cells.len(),
                    self.index.len()
                ),
            ));
        }
        if self.column(&name).is_some() {
            return Err(ModelError::input_validation(
                "INPUT.TABLE_FORMAT",
                format!("column '{}' is defined more than once", name),
            ));
        }

        self.columns.push(Column { name, cells });
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn cell(&self, column: &str, row: usize) -> Option<&CellValue> {
        self.column(column).and_then(|column| column.cells.get(row))
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.index.is_empty()
    }
}
