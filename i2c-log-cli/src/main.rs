//! I2C Log Reader CLI Application
//!
//! This is the command-line interface for the I2C capture decoder.
//! It uses the i2c-log-decoder library and adds:
//! - Query definitions from a TOML config file
//! - Ad-hoc single-pattern queries from the command line
//! - Report generation (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use i2c_log_decoder::{Ack, Decoder, TransactionKind};
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat, PatternConfig, QueryConfig, QueryKind};
use report::Report;

/// I2C Log Reader - Decode and search I2C captures
#[derive(Parser, Debug)]
#[command(name = "i2c-log-cli")]
#[command(about = "Decode and search logic analyzer I2C captures", long_about = None)]
#[command(version)]
struct Args {
    /// Path to capture log file(s) (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    log: Vec<PathBuf>,

    /// Path to configuration file (config.toml) with decoder settings and queries
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Match only transactions of this direction (read, write, invalid)
    #[arg(long, value_parser = parse_kind)]
    kind: Option<TransactionKind>,

    /// Match only transactions to this address, as printed in the capture (hex, e.g. 6B or 0x6B)
    #[arg(long, value_parser = parse_hex_byte)]
    address: Option<u8>,

    /// Match only transactions carrying exactly these bytes (hex, comma separated)
    #[arg(long, value_parser = parse_hex_byte, value_delimiter = ',')]
    data: Option<Vec<u8>>,

    /// Match only transactions whose target answered with this (ack, nack)
    #[arg(long, value_parser = parse_ack)]
    ack: Option<Ack>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include invalid transactions in the transaction listing
    #[arg(long)]
    show_invalid: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Ad-hoc pattern from the command line, if any field was given
    fn pattern(&self) -> Option<PatternConfig> {
        let pattern = PatternConfig {
            kind: self.kind,
            address: self.address,
            data: self.data.clone(),
            ack: self.ack,
        };
        (!pattern.is_wildcard()).then_some(pattern)
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("I2C Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", i2c_log_decoder::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(pattern) = args.pattern() {
        config.queries.push(QueryConfig {
            name: "command line".to_string(),
            kind: QueryKind::Message,
            patterns: vec![pattern],
        });
    }

    let mut files = args.log.clone();
    files.extend(config.input.files.iter().cloned());

    if files.is_empty() {
        // No input - show help
        println!("I2C Log Reader - No input specified");
        println!("\nQuick Start:");
        println!("  i2c-log-cli --log capture.csv");
        println!("  i2c-log-cli --log capture.csv --kind write --address 6B");
        println!("\nFor saved queries:");
        println!("  i2c-log-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let format = args.format.unwrap_or(config.output.format);
    let show_invalid = args.show_invalid || config.output.show_invalid;
    let decoder = Decoder::new(config.decoder.clone());

    for path in &files {
        let capture = decoder
            .decode_file(path)
            .with_context(|| format!("Failed to decode capture: {:?}", path))?;

        let report = Report::build(
            &path.display().to_string(),
            &capture,
            &config.queries,
            show_invalid,
        );
        println!("{}", report.render(format)?);
    }

    Ok(())
}

fn parse_hex_byte(s: &str) -> std::result::Result<u8, String> {
    let digits = s
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid hex byte '{}': {}", s, e))
}

fn parse_kind(s: &str) -> std::result::Result<TransactionKind, String> {
    match s.to_lowercase().as_str() {
        "read" | "r" => Ok(TransactionKind::Read),
        "write" | "w" => Ok(TransactionKind::Write),
        "invalid" => Ok(TransactionKind::Invalid),
        _ => Err(format!("unknown transaction kind '{}'", s)),
    }
}

fn parse_ack(s: &str) -> std::result::Result<Ack, String> {
    match s.to_lowercase().as_str() {
        "ack" => Ok(Ack::Ack),
        "nack" => Ok(Ack::Nack),
        _ => Err(format!("unknown acknowledge '{}'", s)),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
