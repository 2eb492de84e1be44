mod commands;
mod helpers;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ubertool_core::domain::ModelError;

const DEFAULT_LOG_FILTER: &str = "warn";

pub fn run_from_env() -> i32 {
    init_logging();
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let model_error = error.as_model_error();
            eprintln!("{}", model_error.diagnostic_line());
            eprintln!("{}", model_error.fatal_exit_line());
            model_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("ubertool".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Logs go to stderr so that stdout carries only the response JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "ubertool",
    version,
    about = "Ecological risk screening models for pesticide exposure"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Run a model on a scenario table and write the response JSON
    Run(commands::RunArgs),
    /// Print the input and output field descriptors of a model
    Schema(commands::SchemaArgs),
    /// List the hosted models
    Models,
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Run(args) => commands::run_model_command(args),
        CliCommand::Schema(args) => commands::run_schema_command(args),
        CliCommand::Models => commands::run_models_command(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ModelError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ModelError> for CliError {
    fn from(error: ModelError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_model_error(&self) -> ModelError {
        match self {
            Self::Usage(message) => ModelError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => ModelError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
