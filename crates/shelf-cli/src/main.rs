use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelf::config::Config;
use shelf_cli::commands::{ConfigCommand, QueryCommand, ReplayCommand};
use shelf_cli::error::CliResult;
use shelf_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf-cli")]
#[command(about = "Shelf CLI - Replay and inspect context shelf sessions")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Replay a session script and show shelf and index status")]
    Replay(ReplayCommand),

    #[clap(about = "Replay a session script and query the retrieval index")]
    Query(QueryCommand),

    #[clap(about = "Show the effective configuration")]
    Config(ConfigCommand),
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    match &cli.command {
        Command::Config(cmd) => cmd.execute(cli.config.as_deref(), format),
        Command::Replay(cmd) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd.execute(&config, format)
        }
        Command::Query(cmd) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd.execute(&config, format)
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shelf=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
