mod adapter;
mod commands;
mod error;
mod manifest;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand};
use command_contract_core::{Command as _, CommandContext, TracingActivity, run_command};
use tracing::info_span;
use tracing_subscriber::EnvFilter;

use crate::commands::ManifestCommand;
use crate::error::{CliError, Result};
use crate::manifest::CommandManifest;
use crate::output::{OutputFormat, format_contract, format_response};

/// Exit code for responses with a failure status.
const EXIT_FAILED_RESPONSE: i32 = 1;

/// Exit code for manifest or argument errors.
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "contract-run")]
#[command(version, about = "Validate and run manifest-declared commands")]
struct Cli {
    /// Sets the level of verbosity (can be used multiple times).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List commands declared in a manifest.
    List(ListArgs),
    /// Show the contract of one command.
    Describe(DescribeArgs),
    /// Validate and execute one command.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Path to the command manifest (YAML).
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Path to the command manifest (YAML).
    #[arg(long)]
    manifest: PathBuf,
    /// Command name.
    command: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Path to the command manifest (YAML).
    #[arg(long)]
    manifest: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Command name.
    command: String,
    /// Arguments passed to the command, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::List(args) => run_list(args),
        Command::Describe(args) => run_describe(args),
        Command::Run(args) => run_run(args).await,
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn load_command(manifest: &CommandManifest, name: &str) -> Result<ManifestCommand> {
    let spec = manifest
        .find(name)
        .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
    ManifestCommand::from_spec(spec)
}

fn run_list(args: ListArgs) -> Result<i32> {
    let manifest = CommandManifest::load(&args.manifest)?;
    for command in &manifest.commands {
        if command.description.is_empty() {
            println!("{}", command.name);
        } else {
            println!("{}\t{}", command.name, command.description);
        }
    }
    Ok(0)
}

fn run_describe(args: DescribeArgs) -> Result<i32> {
    let manifest = CommandManifest::load(&args.manifest)?;
    let command = load_command(&manifest, &args.command)?;
    println!("{}", format_contract(command.contract(), args.format)?);
    Ok(0)
}

async fn run_run(args: RunArgs) -> Result<i32> {
    let manifest = CommandManifest::load(&args.manifest)?;
    let command = load_command(&manifest, &args.command)?;
    let parsed = match adapter::parse_args(command.contract(), &args.args) {
        Ok(parsed) => parsed,
        Err(CliError::Parse(err)) if adapter::is_display_request(&err) => {
            err.print()?;
            return Ok(0);
        }
        Err(err) => return Err(err),
    };

    let span = info_span!("invocation", command = %args.command);
    let context = CommandContext::new().with_activity(Arc::new(TracingActivity::new(span)));
    let response = run_command(&command, context, &parsed).await;

    println!("{}", format_response(&response, args.format)?);
    Ok(if response.is_success() {
        0
    } else {
        EXIT_FAILED_RESPONSE
    })
}
