use super::CliError;
use super::helpers::*;
use serde_json::json;
use std::path::PathBuf;
use ubertool_core::config::{ComparisonPolicy, load_comparison_policy};
use ubertool_core::domain::{ModelError, ModelKind, ModelRequest};
use ubertool_core::modules::{ModelRunResponse, execute_model_with_policy, schema_for_model};

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Model to run (e.g. terrplant)
    #[arg(value_name = "MODEL")]
    model: String,

    /// Request JSON: {"inputs": {...}, "exp_out": {...}} or a bare input table
    #[arg(long)]
    input: PathBuf,

    /// Expected-output table; overrides any exp_out in the request
    #[arg(long)]
    expected: Option<PathBuf>,

    /// Comparison policy JSON; the built-in policy is used when omitted
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Response JSON path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run identifier echoed as _id; defaults to a timestamp
    #[arg(long)]
    run_id: Option<String>,

    /// Version tag recorded in the response
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    version_tag: String,
}

#[derive(clap::Args)]
pub(super) struct SchemaArgs {
    /// Model whose descriptors are printed
    #[arg(value_name = "MODEL")]
    model: String,
}

pub(super) fn run_model_command(args: RunArgs) -> Result<i32, CliError> {
    let model = parse_model(&args.model)?;
    let document = read_request_document(&args.input)?;
    let expected = match &args.expected {
        Some(path) => Some(read_table_file(path)?),
        None => document.expected,
    };
    let policy = match &args.policy {
        Some(path) => load_comparison_policy(path).map_err(ModelError::from)?,
        None => ComparisonPolicy::default(),
    };

    let run_id = args.run_id.unwrap_or_else(default_run_id);
    let mut request = ModelRequest::new(run_id, model, args.version_tag, document.inputs);
    if let Some(expected) = expected {
        request = request.with_expected(expected);
    }

    let run = execute_model_with_policy(&request, &policy)?;
    write_response(&ModelRunResponse::from(&run), args.output.as_deref())?;

    if run.is_clean() { Ok(0) } else { Ok(1) }
}

pub(super) fn run_schema_command(args: SchemaArgs) -> Result<i32, CliError> {
    let model = parse_model(&args.model)?;
    let (inputs, outputs) = schema_for_model(model);
    let document = json!({
        "model": model.as_str(),
        "inputs": inputs,
        "outputs": outputs,
    });
    print_json(&document)?;
    Ok(0)
}

pub(super) fn run_models_command() -> Result<i32, CliError> {
    for model in ModelKind::ALL {
        println!("{:<12}{}", model.as_str(), model.description());
    }
    Ok(0)
}
