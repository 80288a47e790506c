use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flagstore::{codec, BoundedFlags, FlagRecord, FlagStore, Tier, TieredFlags};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "flagctl - Inspect and edit persisted flag store records")]
struct Cli {
    /// Print records as indented JSON
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an empty record
    New {
        /// Backing tier (bounded, unbounded, sparse)
        #[arg(long, default_value = "bounded")]
        tier: Tier,

        /// Capacity in flags (bounded tier only)
        #[arg(long, default_value_t = 64)]
        capacity: usize,
    },
    /// Apply set / clear / toggle operations and print the updated record
    Apply {
        /// Record JSON, or @path to a file containing it
        record: String,

        /// Indices to set (repeatable or comma-separated)
        #[arg(long, value_delimiter = ',')]
        set: Vec<usize>,

        /// Indices to clear
        #[arg(long, value_delimiter = ',')]
        clear: Vec<usize>,

        /// Indices to toggle
        #[arg(long, value_delimiter = ',')]
        toggle: Vec<usize>,

        /// Resize bounded stores to cover indices before setting them
        #[arg(long)]
        grow: bool,
    },
    /// Print the state of individual flags
    Test {
        /// Record JSON, or @path to a file containing it
        record: String,

        /// Indices to test
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Show a summary of a record
    Info {
        /// Record JSON, or @path to a file containing it
        record: String,
    },
    /// Move a record to another tier
    Convert {
        /// Record JSON, or @path to a file containing it
        record: String,

        /// Target tier
        #[arg(long)]
        tier: Tier,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pretty = cli.pretty;

    match cli.command {
        Commands::New { tier, capacity } => {
            let flags = match tier {
                Tier::Bounded => TieredFlags::Bounded(
                    BoundedFlags::try_with_capacity(capacity)
                        .with_context(|| format!("failed to allocate capacity {capacity}"))?,
                ),
                tier => TieredFlags::new(tier, 0),
            };
            print_record(&flags, pretty)?;
        }
        Commands::Apply {
            record,
            set,
            clear,
            toggle,
            grow,
        } => {
            let mut flags = load_flags(&record)?;
            handle_apply(&mut flags, &set, &clear, &toggle, grow)?;
            print_record(&flags, pretty)?;
        }
        Commands::Test { record, indices } => {
            let flags = load_flags(&record)?;
            for index in indices {
                println!("{index}: {}", flags.test(index));
            }
        }
        Commands::Info { record } => {
            let flags = load_flags(&record)?;
            handle_info(&flags);
        }
        Commands::Convert { record, tier } => {
            let flags = load_flags(&record)?;
            tracing::debug!(from = %flags.tier(), to = %tier, "converting record");
            let converted = flags
                .try_convert(tier)
                .with_context(|| format!("failed to convert record to {tier}"))?;
            print_record(&converted, pretty)?;
        }
    }

    Ok(())
}

/// Read a record given inline or as `@path`
fn load_flags(source: &str) -> Result<TieredFlags> {
    let text = match source.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read record file {path}"))?
        }
        None => source.to_string(),
    };

    let flags = FlagRecord::from_json(&text)
        .and_then(FlagRecord::into_flags)
        .context("failed to decode flag record")?;
    Ok(flags)
}

fn handle_apply(
    flags: &mut TieredFlags,
    set: &[usize],
    clear: &[usize],
    toggle: &[usize],
    grow: bool,
) -> Result<()> {
    for &index in set {
        if grow {
            flags
                .try_grow_to_include(index)
                .with_context(|| format!("failed to grow store to flag {index}"))?;
        }
        flags
            .set(index)
            .with_context(|| format!("failed to set flag {index}"))?;
    }

    for &index in clear {
        flags.clear(index);
    }

    for &index in toggle {
        if grow {
            flags
                .try_grow_to_include(index)
                .with_context(|| format!("failed to grow store to flag {index}"))?;
        }
        let state = flags
            .toggle(index)
            .with_context(|| format!("failed to toggle flag {index}"))?;
        tracing::debug!(index, state, "toggled flag");
    }

    Ok(())
}

fn handle_info(flags: &TieredFlags) {
    println!("Tier: {}", flags.tier());
    match flags.capacity() {
        Some(capacity) => println!("Capacity: {capacity}"),
        None => println!("Capacity: unbounded"),
    }
    println!("Set flags: {}", flags.count());
    println!("Indices: [{}]", codec::format_index_list(&flags.ones()));
    if let Some(bounded) = flags.as_bounded() {
        println!("Value: {}", codec::format_hex(&bounded.to_integer()));
    }
}

fn print_record(flags: &TieredFlags, pretty: bool) -> Result<()> {
    let record = FlagRecord::from_flags(flags);
    let json = if pretty {
        record.to_json_pretty()?
    } else {
        record.to_json()?
    };
    println!("{json}");
    Ok(())
}
