use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use evconv_config::CONFIG;
use evconv_output::ipc::{inspect_ipc, write_ipc};
use evconv_tables::{normalize, EventTable};

/// Convert a parquet event table to a flat binary events file.
#[derive(Parser, Debug)]
#[command(name = "parquet-to-ipc", version)]
struct Args {
    /// Input parquet file.
    #[arg(default_value = "events.parquet")]
    input: PathBuf,
    /// Output events file.
    #[arg(default_value = "events.arrow")]
    output: PathBuf,
    /// Collection name the columns are written under.
    #[arg(long)]
    collection: Option<String>,
    /// Cross-check the destination entry count against the input row count.
    #[arg(long)]
    check_rows: bool,
}

fn main() {
    let args: Args = evconv_cli::parse_args();
    evconv_cli::setup_tracing();

    if let Err(e) = run(&args) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let collection = args
        .collection
        .clone()
        .unwrap_or_else(|| CONFIG.collection.clone());
    tracing::debug!(
        "converting {} -> {}",
        args.input.display(),
        args.output.display()
    );

    println!("Reading {}...", args.input.display());
    let table = EventTable::read_parquet(&args.input)?;
    println!("  {} rows, {} columns", table.num_rows(), table.num_columns());

    println!("Coercing column types...");
    let table = normalize(&table)?;

    println!("Writing to {}...", args.output.display());
    write_ipc(&table, &args.output, &collection)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    // Diagnostic echo: reopen the output and report what landed in it.
    let report = inspect_ipc(&args.output, CONFIG.sample_rows)
        .with_context(|| format!("failed to reopen {}", args.output.display()))?;
    println!(
        "Verification: {} entries, {} fields",
        report.entries,
        report.fields.len()
    );
    if let Some(first) = report.fields.first() {
        println!(
            "Sample values ({first}): [{}]",
            report.sample_values.join(", ")
        );
    }

    if args.check_rows && report.entries != table.num_rows() {
        println!(
            "WARNING: Row count mismatch (expected {}, got {})",
            table.num_rows(),
            report.entries
        );
    }

    Ok(())
}
