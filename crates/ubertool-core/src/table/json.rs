use super::{CellValue, Table};
use crate::domain::{ModelError, ModelResult};
use serde_json::{Map, Number, Value};

const TABLE_FORMAT: &str = "INPUT.TABLE_FORMAT";

impl Table {
    /// Parses the column-oriented layout `{"column": {"0": value, ...}, ...}`.
    ///
    /// A column may also be a plain array, in which case positional labels are used.
    /// All columns must share one label set; labels must be unsigned integers and are
    /// ordered numerically.
    pub fn from_json_value(value: &Value) -> ModelResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ModelError::input_validation(
                TABLE_FORMAT,
                "table must be a JSON object mapping column names to cells",
            )
        })?;

        let mut parsed_columns = Vec::with_capacity(object.len());
        for (name, column) in object {
            parsed_columns.push((name.clone(), parse_column(name, column)?));
        }

        let Some((first_name, first_cells)) = parsed_columns.first() else {
            return Ok(Self::default());
        };
        let index: Vec<String> = first_cells.iter().map(|(label, _)| label.clone()).collect();

        let mut table = Self::new(index);
        for (name, cells) in &parsed_columns {
            let labels_match = cells.len() == table.index.len()
                && cells
                    .iter()
                    .zip(table.index.iter())
                    .all(|((label, _), expected)| label == expected);
            if !labels_match {
                return Err(ModelError::input_validation(
                    TABLE_FORMAT,
                    format!(
                        "column '{}' does not share the row index of column '{}'",
                        name, first_name
                    ),
                ));
            }

            let cells = cells.iter().map(|(_, cell)| cell.clone()).collect();
            table.push_column(name.clone(), cells)?;
        }

        Ok(table)
    }

    pub fn from_json_str(source: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(source).map_err(|source| {
            ModelError::input_validation(
                TABLE_FORMAT,
                format!("table is not valid JSON: {}", source),
            )
        })?;
        Self::from_json_value(&value)
    }

    pub fn to_json_value(&self) -> Value {
        let mut object = Map::with_capacity(self.columns.len());
        for column in &self.columns {
            let mut cells = Map::with_capacity(column.cells.len());
            for (label, cell) in self.index.iter().zip(column.cells.iter()) {
                cells.insert(label.clone(), cell_to_json(cell));
            }
            object.insert(column.name.clone(), Value::Object(cells));
        }
        Value::Object(object)
    }
}

fn parse_column(name: &str, column: &Value) -> ModelResult<Vec<(String, CellValue)>> {
    match column {
        Value::Array(values) => values
            .iter()
            .enumerate()
            .map(|(position, value)| Ok((position.to_string(), parse_cell(name, value)?)))
            .collect(),
        Value::Object(entries) => {
            let mut cells = Vec::with_capacity(entries.len());
            for (label, value) in entries {
                let position = label.trim().parse::<u64>().map_err(|_| {
                    ModelError::input_validation(
                        TABLE_FORMAT,
                        format!(
                            "column '{}' uses index label '{}'; labels must be unsigned integers",
                            name, label
                        ),
                    )
                })?;
                cells.push((position, label.clone(), parse_cell(name, value)?));
            }
            cells.sort_by_key(|(position, _, _)| *position);
            Ok(cells
                .into_iter()
                .map(|(_, label, cell)| (label, cell))
                .collect())
        }
        _ => Err(ModelError::input_validation(
            TABLE_FORMAT,
            format!(
                "column '{}' must be an object keyed by row index or an array",
                name
            ),
        )),
    }
}

fn parse_cell(column: &str, value: &Value) -> ModelResult<CellValue> {
    match value {
        Value::Null => Ok(CellValue::Null),
        Value::Bool(flag) => Ok(CellValue::Bool(*flag)),
        Value::Number(number) => number.as_f64().map(CellValue::Number).ok_or_else(|| {
            ModelError::input_validation(
                TABLE_FORMAT,
                format!(
                    "column '{}' holds number {} outside the f64 range",
                    column, number
                ),
            )
        }),
        Value::String(text) => Ok(CellValue::Text(text.clone())),
        Value::Array(_) | Value::Object(_) => Err(ModelError::input_validation(
            TABLE_FORMAT,
            format!("column '{}' holds a nested value; cells must be scalars", column),
        )),
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Number(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        CellValue::Text(text) => Value::String(text.clone()),
        CellValue::Bool(flag) => Value::Bool(*flag),
        CellValue::Null => Value::Null,
    }
}
