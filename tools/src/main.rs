use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{PoolConfig, UpdateBufferPool};
use propdelta_tools::{decode_indices, decode_update, format_decode_pretty, parse_hex};
use schema::ClassSchema;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "propdelta",
    version,
    about = "propdelta update message inspection and decoding tools",
    long_about = "propdelta update message inspection and decoding tools.\n\n\
        Update bytes are read MSB-first within each byte. Captures written by an \
        LSB-first bit buffer must be re-packed before decoding."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply one update message to a fresh entity and print the changed properties.
    Decode {
        /// Class schema JSON.
        #[arg(long)]
        schema: PathBuf,
        /// Entity id used in logs and output.
        #[arg(long, default_value_t = 0)]
        entity: u32,
        #[command(flatten)]
        input: UpdateInput,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Print the slot indices an update message touches.
    Indices {
        #[command(flatten)]
        input: UpdateInput,
    },
}

#[derive(Args)]
struct UpdateInput {
    /// Path to the raw update bytes.
    #[arg(conflicts_with = "hex")]
    update_file: Option<PathBuf>,
    /// Update bytes as a hex string (MSB-first bit order).
    #[arg(long)]
    hex: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Decode {
            schema,
            entity,
            input,
            format,
        } => {
            let class = load_schema(&schema).context("load schema")?;
            let bytes = input.read()?;
            let pool = UpdateBufferPool::with_config(PoolConfig::default());
            let report = decode_update(Arc::new(class), entity, &bytes, &pool)?;
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&report));
                }
            }
        }
        Command::Indices { input } => {
            let bytes = input.read()?;
            let report = decode_indices(&bytes)?;
            println!(
                "format: {}  bits: {}",
                if report.wide { "wide" } else { "legacy" },
                report.bits_read
            );
            for index in &report.indices {
                println!("{index}");
            }
        }
    }
    Ok(())
}

impl UpdateInput {
    fn read(&self) -> Result<Vec<u8>> {
        match (&self.update_file, &self.hex) {
            (Some(path), None) => {
                fs::read(path).with_context(|| format!("read update {}", path.display()))
            }
            (None, Some(hex)) => parse_hex(hex),
            _ => bail!("pass either an update file or --hex"),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_schema(path: &Path) -> Result<ClassSchema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    let class: ClassSchema = serde_json::from_str(&contents).context("parse schema json")?;
    class
        .validate()
        .with_context(|| format!("schema validation failed for {}", class.name))?;
    debug!(class = %class.name, properties = class.len(), "loaded class schema");
    Ok(class)
}
