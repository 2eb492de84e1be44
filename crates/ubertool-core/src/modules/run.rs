use crate::comparator::ComparisonReport;
use crate::domain::{ModelKind, RowError, RunType};
use crate::table::Table;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Owner recorded on every response of the single-user REST layer.
pub const RESPONSE_USER_ID: &str = "admin";

/// Result of one model execution. Derived cells of failed rows are null.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRun {
    pub run_id: String,
    pub model: ModelKind,
    pub version_tag: String,
    pub run_type: RunType,
    pub inputs: Table,
    pub outputs: Table,
    pub expected: Option<Table>,
    pub row_errors: Vec<RowError>,
    pub comparison: Option<ComparisonReport>,
}

impl ModelRun {
    /// Row positions with at least one error, ascending.
    pub fn failed_rows(&self) -> Vec<usize> {
        self.row_errors
            .iter()
            .map(|error| error.row)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn succeeded_rows(&self) -> Vec<usize> {
        let failed: BTreeSet<usize> = self.row_errors.iter().map(|error| error.row).collect();
        (0..self.outputs.row_count())
            .filter(|row| !failed.contains(row))
            .collect()
    }

    /// True when every row evaluated and any requested comparison passed.
    pub fn is_clean(&self) -> bool {
        self.row_errors.is_empty()
            && self
                .comparison
                .as_ref()
                .is_none_or(|comparison| comparison.passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRunResponse {
    pub user_id: String,
    pub inputs: Value,
    pub outputs: Value,
    pub exp_out: Value,
    #[serde(rename = "_id")]
    pub id: String,
    pub run_type: RunType,
    pub model: String,
    pub version: String,
    pub row_errors: Vec<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
}

impl From<&ModelRun> for ModelRunResponse {
    fn from(run: &ModelRun) -> Self {
        Self {
            user_id: RESPONSE_USER_ID.to_string(),
            inputs: run.inputs.to_json_value(),
            outputs: run.outputs.to_json_value(),
            exp_out: run
                .expected
                .as_ref()
                .map_or_else(|| Value::Object(Map::new()), Table::to_json_value),
            id: run.run_id.clone(),
            run_type: run.run_type,
            model: run.model.as_str().to_string(),
            version: run.version_tag.clone(),
            row_errors: run.row_errors.clone(),
            comparison: run.comparison.clone(),
        }
    }
}
