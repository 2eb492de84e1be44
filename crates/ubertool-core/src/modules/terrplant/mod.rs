//! TerrPLANT: screening-level exposure and risk quotients for terrestrial plants
//! exposed to a single pesticide application through runoff and spray drift.
//!
//! Each row of the input table is an independent scenario. A row that cannot be
//! evaluated keeps null derived cells and contributes [`RowError`]s to the run; the
//! other rows are unaffected.

pub mod inputs;
pub mod loc;
pub mod model;
pub mod schema;

use super::{ModelExecutor, ModelRun};
use crate::comparator::Comparator;
use crate::config::ComparisonPolicy;
use crate::domain::{ModelError, ModelRequest, ModelResult, RowError};
use crate::table::{CellValue, Table};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use inputs::bind_rows;
use model::{RowOutputs, evaluate_row};
use schema::{OUTPUT_FIELDS, check_input_columns, verify_schema_descriptors};

#[derive(Debug, Clone, Default)]
pub struct TerrplantModule {
    policy: ComparisonPolicy,
}

impl TerrplantModule {
    pub fn with_policy(policy: ComparisonPolicy) -> Self {
        Self { policy }
    }
}

impl ModelExecutor for TerrplantModule {
    fn execute(&self, request: &ModelRequest) -> ModelResult<ModelRun> {
        static DESCRIPTORS: OnceLock<ModelResult<()>> = OnceLock::new();
        DESCRIPTORS.get_or_init(verify_schema_descriptors).clone()?;

        check_input_columns(&request.inputs)?;
        debug!(
            run_id = %request.run_id,
            rows = request.inputs.row_count(),
            "terrplant input schema accepted"
        );

        let comparator = request
            .expected
            .as_ref()
            .map(|_| Comparator::from_policy(&self.policy))
            .transpose()
            .map_err(ModelError::from)?;

        let bound = bind_rows(&request.inputs);
        debug!(run_id = %request.run_id, "terrplant rows bound");

        let mut row_errors: Vec<RowError> = Vec::new();
        let mut evaluated: Vec<Option<RowOutputs>> = Vec::with_capacity(bound.len());
        for (row, (label, bound_row)) in request.inputs.index().iter().zip(bound).enumerate() {
            let outcome = bound_row.and_then(|scenario| evaluate_row(row, label, &scenario));
            match outcome {
                Ok(outputs) => evaluated.push(Some(outputs)),
                Err(errors) => {
                    for error in &errors {
                        warn!(run_id = %request.run_id, "{}", error);
                    }
                    row_errors.extend(errors);
                    evaluated.push(None);
                }
            }
        }
        debug!(run_id = %request.run_id, "terrplant rows evaluated");

        let outputs = assemble_outputs(request.inputs.index(), &evaluated)?;
        let comparison = match (comparator, request.expected.as_ref()) {
            (Some(comparator), Some(expected)) => {
                Some(comparator.compare_tables(expected, &outputs))
            }
            _ => None,
        };

        let failed = evaluated.iter().filter(|row| row.is_none()).count();
        info!(
            run_id = %request.run_id,
            rows = evaluated.len(),
            failed_rows = failed,
            comparison_passed = comparison.as_ref().map(|report| report.passed),
            "terrplant run finished"
        );

        Ok(ModelRun {
            run_id: request.run_id.clone(),
            model: request.model,
            version_tag: request.version_tag.clone(),
            run_type: request.run_type,
            inputs: request.inputs.clone(),
            outputs,
            expected: request.expected.clone(),
            row_errors,
            comparison,
        })
    }
}

/// Lays the per-row results out as the 33 output columns, in input row order.
fn assemble_outputs(index: &[String], evaluated: &[Option<RowOutputs>]) -> ModelResult<Table> {
    let mut columns: Vec<Vec<CellValue>> = OUTPUT_FIELDS
        .iter()
        .map(|_| Vec::with_capacity(evaluated.len()))
        .collect();

    for row in evaluated {
        match row {
            Some(outputs) => {
                for (column, cell) in columns.iter_mut().zip(outputs.cells()) {
                    column.push(cell);
                }
            }
            None => {
                for column in &mut columns {
                    column.push(CellValue::Null);
                }
            }
        }
    }

    let mut table = Table::new(index.to_vec());
    for (field, cells) in OUTPUT_FIELDS.iter().zip(columns) {
        table.push_column(field.name, cells)?;
    }
    Ok(table)
}
