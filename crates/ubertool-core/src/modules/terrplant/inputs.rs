use super::loc::SpeciesClass;
use super::schema::{
    APPLICATION_RATE, DRIFT_FRACTION, EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT,
    EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT, EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT,
    EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT, INCORPORATION_DEPTH,
    NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT, NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT,
    NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT, NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT, RUNOFF_FRACTION,
    SOLUBILITY,
};
use crate::domain::{RowError, RowErrorKind};
use crate::table::{CellValue, Table};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantThresholds {
    pub seedling_emergence: f64,
    pub vegetative_vigor: f64,
}

/// Numeric inputs of one scenario row after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioInputs {
    pub application_rate: f64,
    pub incorporation_depth: f64,
    pub runoff_fraction: f64,
    pub drift_fraction: f64,
    pub solubility: f64,
    pub nonlisted_monocot: PlantThresholds,
    pub listed_monocot: PlantThresholds,
    pub nonlisted_dicot: PlantThresholds,
    pub listed_dicot: PlantThresholds,
}

impl ScenarioInputs {
    pub fn thresholds(&self, species: SpeciesClass) -> PlantThresholds {
        match species {
            SpeciesClass::NonListedMonocot => self.nonlisted_monocot,
            SpeciesClass::ListedMonocot => self.listed_monocot,
            SpeciesClass::NonListedDicot => self.nonlisted_dicot,
            SpeciesClass::ListedDicot => self.listed_dicot,
        }
    }
}

pub type BoundRow = Result<ScenarioInputs, Vec<RowError>>;

/// Binds every row of an already schema-checked table. Rows fail independently.
pub fn bind_rows(table: &Table) -> Vec<BoundRow> {
    table
        .index()
        .iter()
        .enumerate()
        .map(|(row, label)| bind_row(table, row, label))
        .collect()
}

fn bind_row(table: &Table, row: usize, label: &str) -> BoundRow {
    let mut binder = RowBinder {
        table,
        row,
        label,
        errors: Vec::new(),
    };

    let inputs = ScenarioInputs {
        application_rate: binder.non_negative(APPLICATION_RATE),
        incorporation_depth: binder.non_negative(INCORPORATION_DEPTH),
        runoff_fraction: binder.non_negative(RUNOFF_FRACTION),
        drift_fraction: binder.non_negative(DRIFT_FRACTION),
        solubility: binder.non_negative(SOLUBILITY),
        nonlisted_monocot: PlantThresholds {
            seedling_emergence: binder.non_negative(EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT),
            vegetative_vigor: binder.non_negative(EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT),
        },
        listed_monocot: PlantThresholds {
            seedling_emergence: binder.non_negative(NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT),
            vegetative_vigor: binder.non_negative(NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT),
        },
        nonlisted_dicot: PlantThresholds {
            seedling_emergence: binder.non_negative(EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT),
            vegetative_vigor: binder.non_negative(EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT),
        },
        listed_dicot: PlantThresholds {
            seedling_emergence: binder.non_negative(NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT),
            vegetative_vigor: binder.non_negative(NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT),
        },
    };

    if binder.errors.is_empty() {
        Ok(inputs)
    } else {
        Err(binder.errors)
    }
}

struct RowBinder<'a> {
    table: &'a Table,
    row: usize,
    label: &'a str,
    errors: Vec<RowError>,
}

impl RowBinder<'_> {
    /// Records a failure and yields a placeholder; the row is discarded when any
    /// error was recorded.
    fn non_negative(&mut self, field: &'static str) -> f64 {
        let cell = self.table.cell(field, self.row).unwrap_or(&CellValue::Null);
        match coerce_number(cell) {
            Ok(value) if value < 0.0 => {
                self.fail(field, RowErrorKind::NegativeValue { value });
                0.0
            }
            Ok(value) => value,
            Err(kind) => {
                self.fail(field, kind);
                0.0
            }
        }
    }

    fn fail(&mut self, field: &'static str, kind: RowErrorKind) {
        self.errors.push(RowError::new(self.row, self.label, field, kind));
    }
}

/// Numbers pass, numeric strings are parsed, anything else is rejected.
pub fn coerce_number(cell: &CellValue) -> Result<f64, RowErrorKind> {
    let value = match cell {
        CellValue::Number(value) => Some(*value),
        CellValue::Text(text) => text.trim().parse::<f64>().ok(),
        CellValue::Bool(_) | CellValue::Null => None,
    };

    match value {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(RowErrorKind::InvalidValue {
            value: cell.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{bind_rows, coerce_number};
    use crate::domain::{FieldType, RowErrorKind};
    use crate::modules::terrplant::loc::SpeciesClass;
    use crate::modules::terrplant::schema::INPUT_FIELDS;
    use crate::table::{CellValue, Table};

    fn uniform_table(rows: usize) -> Table {
        let mut table = Table::with_row_count(rows);
        for field in &INPUT_FIELDS {
            let cell = match field.field_type {
                FieldType::Float => CellValue::Number(1.5),
                FieldType::Category => CellValue::from("label"),
            };
            table
                .push_column(field.name, vec![cell; rows])
                .expect("column should be accepted");
        }
        table
    }

    fn set_cell(table: Table, column: &str, row: usize, value: CellValue) -> Table {
        let mut rebuilt = Table::new(table.index().to_vec());
        for existing in table.columns() {
            let mut cells = existing.cells.clone();
            if existing.name == column {
                cells[row] = value.clone();
            }
            rebuilt
                .push_column(existing.name.clone(), cells)
                .expect("column should be accepted");
        }
        rebuilt
    }

    #[test]
    fn coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_number(&CellValue::Number(0.25)), Ok(0.25));
        assert_eq!(coerce_number(&CellValue::from(" 4.4 ")), Ok(4.4));
        assert_eq!(coerce_number(&CellValue::from("1e-3")), Ok(0.001));
    }

    #[test]
    fn coercion_rejects_non_numeric_and_non_finite_values() {
        for cell in [
            CellValue::from("abc"),
            CellValue::from("NaN"),
            CellValue::from("inf"),
            CellValue::Number(f64::NAN),
            CellValue::Bool(true),
            CellValue::Null,
        ] {
            assert!(matches!(
                coerce_number(&cell),
                Err(RowErrorKind::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn valid_rows_bind_to_typed_inputs() {
        let rows = bind_rows(&uniform_table(2));
        assert_eq!(rows.len(), 2);
        let inputs = rows[1].as_ref().expect("row should bind");
        assert_eq!(inputs.application_rate, 1.5);
        assert_eq!(
            inputs.thresholds(SpeciesClass::ListedDicot).vegetative_vigor,
            1.5
        );
    }

    #[test]
    fn every_offending_field_of_a_row_is_reported() {
        let table = set_cell(uniform_table(2), "application_rate", 0, CellValue::from("abc"));
        let table = set_cell(table, "runoff_fraction", 0, CellValue::Number(-0.1));

        let rows = bind_rows(&table);
        let errors = rows[0].as_ref().expect_err("row 0 should fail");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "application_rate");
        assert_eq!(errors[0].index_label, "0");
        assert_eq!(
            errors[1].kind,
            RowErrorKind::NegativeValue { value: -0.1 }
        );
        assert!(rows[1].is_ok());
    }

    #[test]
    fn zero_values_bind_and_are_left_to_the_evaluator() {
        let table = set_cell(uniform_table(1), "incorporation_depth", 0, CellValue::Number(0.0));
        let rows = bind_rows(&table);
        assert_eq!(
            rows[0].as_ref().map(|inputs| inputs.incorporation_depth),
            Ok(0.0)
        );
    }
}
