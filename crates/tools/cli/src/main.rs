//! Ring buffer demo - drives the ring buffer and event log from the command line

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use event_log::{EVENT_RECORD_SIZE, EventLog, Level};
use ringbuf::{DEFAULT_CAPACITY, RingBuffer, RingConfig, RingResult, SizeRule, registry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringbuf-demo")]
#[command(about = "Exercise the fixed-capacity ring buffer and event log")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a 0xAA and a 0xBB record, remove the oldest, dump after each step
    Records {
        #[arg(long, default_value_t = 32)]
        record_size: usize,
        #[arg(long, default_value_t = 2)]
        instance_id: u8,
        /// Accept record sizes that are not a power of two
        #[arg(long)]
        any_size: bool,
    },
    /// Log a burst of events at rotating levels and replay them
    Events {
        #[arg(long, default_value_t = 8)]
        count: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();

    match cli.command {
        Commands::Records {
            record_size,
            instance_id,
            any_size,
        } => run_records(record_size, instance_id, any_size),
        Commands::Events { count } => run_events(count),
    }
}

fn run_records(record_size: usize, instance_id: u8, any_size: bool) -> Result<()> {
    let rule = if any_size {
        SizeRule::Any
    } else {
        SizeRule::PowerOfTwo
    };
    let config = RingConfig::new(record_size, instance_id).with_size_rule(rule);
    let bytes = config
        .bytes_required(DEFAULT_CAPACITY)
        .context("Record size too large for the capacity profile")?;

    info!(
        "Binding {} x {} byte ring buffer (id {})",
        DEFAULT_CAPACITY, record_size, instance_id
    );
    let mut memory = vec![0u8; bytes];
    let mut ring = RingBuffer::<DEFAULT_CAPACITY>::bind_with(
        &mut memory,
        &config,
        registry::global(),
    )
    .context("Failed to bind ring buffer")?;

    check(ring.insert(&vec![0xAA; record_size]), "insert 0xAA record");
    println!("{}", ring.dump()?);

    check(ring.insert(&vec![0xBB; record_size]), "insert 0xBB record");
    println!("{}", ring.dump()?);

    let mut out = vec![0u8; record_size];
    check(ring.remove_oldest(&mut out), "remove oldest record");
    println!("{}", ring.dump()?);
    ring.log_dump()?;

    println!("Data read: {}", hex(&out));

    ring.release()?;

    // The buffer is gone, the memory it borrowed is not
    println!(
        "Backing memory byte at offset {}: {:#04x}",
        record_size, memory[record_size]
    );
    Ok(())
}

fn run_events(count: u16) -> Result<()> {
    let mut memory = [0u8; EVENT_RECORD_SIZE * DEFAULT_CAPACITY];
    let mut log = EventLog::<DEFAULT_CAPACITY>::new(&mut memory, 1)
        .context("Failed to bind event log")?;

    for code in 0..count {
        let level = Level::ALL[usize::from(code) % Level::ALL.len()];
        match log.log(level, code, u32::from(code) * 10, u32::from(code) << 8) {
            Ok(Some(sequence)) => info!("Logged {} event {} as #{}", level, code, sequence),
            Ok(None) => info!("Filtered {} event {}", level, code),
            Err(e) => warn!("Dropped event {}: {}", code, e),
        }
    }

    info!("{} events stored, {} overruns", log.len(), log.overruns());
    log.emit()?;

    if let Some(latest) = log.latest()? {
        println!("Latest: #{} {} code {}", latest.sequence, latest.level, latest.code);
    }
    while let Some(event) = log.drain_oldest()? {
        println!(
            "#{:<4} {:<5} code={:<5} ts={:>6}ms payload={:#010x}",
            event.sequence, event.level, event.code, event.timestamp_ms, event.payload
        );
    }
    Ok(())
}

fn check(result: RingResult<()>, operation: &str) {
    if let Err(e) = result {
        warn!("Something is wrong: {} failed: {}", operation, e);
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formats_space_separated_bytes() {
        assert_eq!(hex(&[0xAA, 0x01, 0xff]), "aa 01 ff");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_cli_parses_records_defaults() {
        let cli = Cli::parse_from(["ringbuf-demo", "records"]);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Records {
                record_size: 32,
                instance_id: 2,
                any_size: false
            }
        ));
    }
}
