use anyhow::{anyhow, Context, Result};
use booking_blocks::client::{HttpBookingApi, HttpServiceCatalog, ServiceCatalog};
use booking_blocks::config::{self, ClientConfig};
use booking_blocks::normalize;
use booking_blocks::session;
use clap::Parser;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Command, FetchArgs, InitArgs, NormalizeArgs, RootArgs, RunArgs};

const LOG_ENV: &str = "BOOKFLOW_LOG";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Normalize(args) => cmd_normalize(args),
        Command::Fetch(args) => cmd_fetch(args),
        Command::Run(args) => cmd_run(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parse JSON {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> Result<()> {
    let raw = read_json(&args.service)?;
    let service = if args.strict {
        normalize::try_normalize(&raw).context("normalize service")?
    } else {
        normalize::normalize(&raw)
    };
    print_json(&service)
}

fn cmd_fetch(args: FetchArgs) -> Result<()> {
    let config = config::resolve_config(args.config.as_deref())?;
    let catalog = HttpServiceCatalog::new(&config);
    let raw = catalog
        .fetch_service(&args.id)
        .with_context(|| format!("fetch service {}", args.id))?;
    print_json(&normalize::normalize(&raw))
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let raw = read_json(&args.service)?;
    let service = normalize::normalize(&raw);
    let answers = session::load_answers(&args.answers)?;
    let mut outcome = session::run(service, &answers, None)?;

    if args.submit {
        let config = config::resolve_config(args.config.as_deref())?;
        let api = HttpBookingApi::new(&config);
        let receipt = outcome.submit(&api).context("submit booking")?;
        eprintln!("booking {} {}", receipt.booking_id, receipt.status);
    }
    print_json(&outcome.report()?)
}

fn cmd_init(args: InitArgs) -> Result<()> {
    let path = match args.config {
        Some(path) => path,
        None => config::default_config_path()
            .ok_or_else(|| anyhow!("no per-user config directory; pass --config"))?,
    };
    if path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    let config = ClientConfig::default();
    config::write_config(&path, &config)?;
    println!("{}", path.display());
    Ok(())
}
