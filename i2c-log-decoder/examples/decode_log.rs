//! Standalone I2C capture decoder tool
//!
//! Decodes a capture export and lists its transactions, or only those written to
//! or read from one device address.
//!
//! Usage:
//!   decode_log <capture.csv> [--address <hex>] [--limit <count>] [--invalid]
//!
//! Example:
//!   RUST_LOG=debug decode_log lsm6ds33_fifo.csv --address 6B --limit 20

use i2c_log_decoder::{Decoder, DecoderConfig, Pattern, Transaction};
use std::env;
use std::path::PathBuf;

fn print_transaction(index: usize, transaction: &Transaction) {
    println!("  #{:<6} {}", index, transaction);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <capture.csv> [--address <hex>] [--limit <count>] [--invalid]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} lsm6ds33_fifo.csv --address 6B --limit 20", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut address: Option<u8> = None;
    let mut limit: Option<usize> = None;
    let mut show_invalid = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--address" => {
                i += 1;
                if i < args.len() {
                    let digits = args[i].trim_start_matches("0x");
                    address = Some(u8::from_str_radix(digits, 16)?);
                }
            }
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--invalid" => show_invalid = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let decoder = Decoder::new(DecoderConfig::new());
    let capture = decoder.decode_file(&log_file)?;
    let stats = capture.stream.stats();

    println!("=== {} ===", log_file.display());
    println!("Header: {}", capture.header.join(" | "));
    println!("Events:       {}", stats.num_events);
    println!("Transactions: {}", stats.num_transactions);
    println!("Invalid:      {}", stats.num_invalid);
    println!();

    let mut pattern = Pattern::any();
    if let Some(addr) = address {
        pattern = pattern.with_address(addr);
    }

    let hits = capture.stream.find_message(&pattern);
    let max = limit.unwrap_or(usize::MAX);
    let mut shown = 0;

    for (index, transaction) in hits {
        if !show_invalid && !transaction.is_valid() {
            continue;
        }
        if shown == max {
            println!("\n... (limit of {} transactions reached)", max);
            break;
        }
        print_transaction(index, transaction);
        shown += 1;
    }

    Ok(())
}
