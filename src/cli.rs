//! CLI argument parsing for `bookflow`.
//!
//! The binary is a thin shell over the library: every command maps onto one
//! library entry point and prints JSON on stdout.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "bookflow",
    version,
    about = "Normalize service configs and drive booking wizards headlessly",
    after_help = "Commands:\n  normalize --service <file|->          Print the canonical service config\n  fetch <id-or-slug>                    Fetch a service over HTTP and normalize it\n  run --service <file> --answers <file> Walk the wizard to payment from scripted answers\n  init                                  Write the default client config\n\nExamples:\n  bookflow normalize --service service.json\n  bookflow run --service service.json --answers answers.json\n  bookflow run --service service.json --answers answers.json --submit",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Raise the default log level to debug (BOOKFLOW_LOG still wins)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Normalize(NormalizeArgs),
    Fetch(FetchArgs),
    Run(RunArgs),
    Init(InitArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Normalize a raw service record into its canonical block list")]
pub struct NormalizeArgs {
    /// Raw service JSON file, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub service: PathBuf,

    /// Fail instead of falling back to an empty block list
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Fetch a service from the catalog API and normalize it")]
pub struct FetchArgs {
    /// Service id or slug
    #[arg(value_name = "ID_OR_SLUG")]
    pub id: String,

    /// Client config file (defaults to the per-user config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Drive a wizard session from scripted answers")]
pub struct RunArgs {
    /// Raw service JSON file, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub service: PathBuf,

    /// Answers JSON (`blocks`, `schedule`, `address`)
    #[arg(long, value_name = "FILE")]
    pub answers: PathBuf,

    /// Send the assembled booking to the booking API
    #[arg(long)]
    pub submit: bool,

    /// Client config file (defaults to the per-user config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Write the default client config")]
pub struct InitArgs {
    /// Destination (defaults to the per-user config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
