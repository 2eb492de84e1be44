use super::CliError;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use ubertool_core::domain::{ModelError, ModelKind, ModelResult};
use ubertool_core::table::Table;

/// Input table and optional expected outputs read from a request file.
#[derive(Debug)]
pub(super) struct RequestDocument {
    pub(super) inputs: Table,
    pub(super) expected: Option<Table>,
}

pub(super) fn parse_model(token: &str) -> Result<ModelKind, CliError> {
    ModelKind::parse(token).ok_or_else(|| {
        let known = ModelKind::ALL
            .iter()
            .map(|model| model.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        CliError::Compute(ModelError::input_validation(
            "INPUT.CLI_UNKNOWN_MODEL",
            format!("unknown model '{}'; available models: {}", token, known),
        ))
    })
}

pub(super) fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).map_err(|source| {
        CliError::Compute(ModelError::input_validation(
            "INPUT.REQUEST_FORMAT",
            format!("'{}' is not valid JSON: {}", path.display(), source),
        ))
    })
}

pub(super) fn read_request_document(path: &Path) -> Result<RequestDocument, CliError> {
    let value = read_json_file(path)?;
    Ok(request_document_from_value(&value)?)
}

pub(super) fn read_table_file(path: &Path) -> Result<Table, CliError> {
    let value = read_json_file(path)?;
    Ok(Table::from_json_value(&value)?)
}

/// Accepts the REST body layout or a bare column-oriented table.
pub(super) fn request_document_from_value(value: &Value) -> ModelResult<RequestDocument> {
    let Some(inputs) = value.get("inputs") else {
        return Ok(RequestDocument {
            inputs: Table::from_json_value(value)?,
            expected: None,
        });
    };

    let expected = match value.get("exp_out") {
        None | Some(Value::Null) => None,
        Some(Value::Object(entries)) if entries.is_empty() => None,
        Some(expected) => Some(Table::from_json_value(expected)?),
    };

    Ok(RequestDocument {
        inputs: Table::from_json_value(inputs)?,
        expected,
    })
}

pub(super) fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

pub(super) fn write_response(
    response: &impl Serialize,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let Some(path) = output else {
        return print_json(response);
    };

    let rendered = serde_json::to_string_pretty(response).context("failed to render response")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, format!("{}\n", rendered))
        .with_context(|| format!("failed to write response '{}'", path.display()))?;
    Ok(())
}

pub(super) fn default_run_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("run-{}", millis)
}
