//! Ersatz CLI - demo driver for the simulated data source.
//!
//! # Flow
//!
//! ```text
//! main() -> init_tracing() -> LoaderConfig::load() -> Loader
//!               |
//!               v
//!   load 0: continuation-style, rendered into the "callback" slot
//!   loads 1..n: awaited, rendered into "awaited-<id>" slots
//!               |
//!               v
//!   stdout sink, one `identifier: text` line per render
//! ```
//!
//! The binary runs a current-thread runtime: the timer callbacks and the
//! consumer-side continuations are cooperatively scheduled units of work on
//! the same logical thread, never in parallel.

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use ersatz_core::{Loader, LoaderConfig, OutputSink, StdoutSink};
use ersatz_types::OutputId;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_PATH: &str = "ersatz.toml";
const DEFAULT_COUNT: u32 = 2;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

struct CliArgs {
    config: PathBuf,
    count: u32,
}

enum ParsedArgs {
    Run(CliArgs),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<ParsedArgs> {
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut count = DEFAULT_COUNT;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(ParsedArgs::Help),
            "--version" | "-V" => return Ok(ParsedArgs::Version),
            "--config" | "-c" => {
                let Some(path) = iter.next() else {
                    bail!("--config requires a path");
                };
                config = PathBuf::from(path);
            }
            "--count" | "-n" => {
                let Some(raw) = iter.next() else {
                    bail!("--count requires a number");
                };
                count = raw
                    .parse()
                    .with_context(|| format!("invalid --count value: {raw}"))?;
                if count == 0 {
                    bail!("--count must be at least 1");
                }
            }
            other => bail!("unknown argument: {other} (try --help)"),
        }
    }

    Ok(ParsedArgs::Run(CliArgs { config, count }))
}

fn print_help() {
    println!("ersatz v{VERSION} - simulated latency-bound data source");
    println!();
    println!("USAGE:");
    println!("    ersatz [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>    Config file (default: {DEFAULT_CONFIG_PATH})");
    println!("    -n, --count <n>        Number of concurrent loads (default: {DEFAULT_COUNT})");
    println!("    -h, --help             Show this help message");
    println!("    -V, --version          Show version");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args)? {
        ParsedArgs::Run(args) => args,
        ParsedArgs::Help => {
            print_help();
            return Ok(());
        }
        ParsedArgs::Version => {
            println!("ersatz v{VERSION}");
            return Ok(());
        }
    };

    let config = LoaderConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    tracing::info!(delay = ?config.delay(), count = args.count, "starting loads");

    let loader = Loader::new(config);
    let sink = Arc::new(StdoutSink);

    // First load goes continuation-style; the rest are awaited in hand.
    let callback_slot = OutputId::new("callback").expect("slot name is non-empty");
    let render = loader.load_into(sink.clone(), callback_slot);

    let mut awaited = Vec::new();
    for _ in 1..args.count {
        awaited.push(loader.load());
    }
    for handle in awaited {
        let slot =
            OutputId::new(format!("awaited-{}", handle.id())).expect("slot name is non-empty");
        let value = handle.await.context("awaiting load")?;
        sink.render(&slot, &value);
    }

    render.await.context("joining continuation render")?;

    Ok(())
}
