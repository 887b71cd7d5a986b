//! `eco99` binary: one host invocation per process
//!
//! The host runs `eco99 <base_url> <handle> [query]` for every navigation
//! action and reads the resulting host calls, one JSON object per line, on
//! stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use eco99::{Eco99ConfigExt, JsonLinesHost, Plugin};
use eco99config::Config;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eco99", version, about = "eco99fm music channels for media centers")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Plugin URL the host invoked, reused as base of navigation URLs
    base_url: String,

    /// Handle of the host directory or player request
    handle: i32,

    /// Invocation query, e.g. `?mode=playlist&url=...` (empty for the root menu)
    #[arg(default_value = "")]
    query: String,

    /// Configuration directory (defaults to $ECO99_CONFIG, ./.eco99 or ~/.eco99)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Extra arguments some hosts append (e.g. `resume:false`), ignored
    #[arg(trailing_var_arg = true, hide = true)]
    _rest: Vec<String>,
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let plugin = Plugin::from_config(config, cli.base_url.as_str())
        .context("Failed to initialize the plugin")?;

    let stdout = io::stdout();
    let mut host = JsonLinesHost::new(stdout.lock());

    plugin
        .run(&mut host, cli.handle, &cli.query)
        .with_context(|| format!("Invocation {:?} failed", cli.query))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config_dir.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("eco99: failed to load configuration: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.get_log_level());

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
