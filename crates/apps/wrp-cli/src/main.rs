mod commands;
mod config;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{CliConfig, WireFormat};

#[derive(Parser, Debug)]
#[command(name = "wrp", about = "Inspect, decode and encode WRP messages", version)]
struct Cli {
    /// TOML file with defaults for log level, wire format and output mode.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a wire message and print it.
    Decode {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<WireFormat>,
        #[arg(long)]
        json: bool,
    },
    /// Encode a JSON message description into wire bytes.
    Encode {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<WireFormat>,
    },
    /// Split a locator into its parts.
    Locator { locator: String },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("wrp error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CliConfig::default(),
    };
    let env = env_logger::Env::default().default_filter_or(config.log_level());
    env_logger::Builder::from_env(env).init();

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Decode { input, format, json } => {
            let bytes = read_input(input.as_deref())?;
            let decoded = commands::decode_input(&bytes, config.format(format))?;
            let rendered = commands::render_decoded(&decoded, config.output(json))?;
            wrp_core::destroy(Some(decoded))?;
            stdout.write_all(rendered.as_bytes())?;
        }
        Command::Encode { input, format } => {
            let json = read_input(input.as_deref())?;
            let out = commands::encode_json(&json, config.format(format))?;
            stdout.write_all(&out)?;
        }
        Command::Locator { locator } => {
            stdout.write_all(commands::render_locator(&locator)?.as_bytes())?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
