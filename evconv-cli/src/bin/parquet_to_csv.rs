use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use evconv_config::CONFIG;
use evconv_output::csv::{verify_csv, write_csv};
use evconv_tables::{normalize, EventTable};

/// Convert a parquet event table to comma-separated text.
#[derive(Parser, Debug)]
#[command(name = "parquet-to-csv", version)]
struct Args {
    /// Input parquet file.
    input: PathBuf,
    /// Output CSV file. Defaults to the input path with the extension
    /// replaced by `.csv`.
    output: Option<PathBuf>,
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
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("csv"));

    // Fail fast before touching anything else.
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    tracing::debug!(
        "converting {} -> {}",
        args.input.display(),
        output.display()
    );

    let rule = "=".repeat(60);
    println!("{rule}");
    println!("Parquet to CSV Converter");
    println!("{rule}");
    println!("Input:  {}", args.input.display());
    println!("Output: {}", output.display());
    println!();

    println!("Reading parquet file...");
    let table = EventTable::read_parquet(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let stats = table.stats();
    println!("  Rows:    {}", stats.num_rows);
    println!("  Columns: {}", stats.num_columns);
    println!();

    let preview = CONFIG.column_preview;
    println!("Columns:");
    for (i, name) in table.column_names().iter().take(preview).enumerate() {
        println!("  [{i}] {name}");
    }
    if stats.num_columns > preview {
        println!("  ... and {} more", stats.num_columns - preview);
    }
    println!();

    println!("Converting to CSV...");
    let table = normalize(&table)?;
    write_csv(&table, &output).with_context(|| format!("failed to write {}", output.display()))?;

    // Soft consistency check: a mismatch is reported but never fatal.
    match verify_csv(&output, stats.num_rows) {
        Ok(report) => {
            println!("Output file: {}", output.display());
            println!("File size:   {:.1} MB", report.size_mb());
            println!();
            println!("Rows written: {}", report.rows_written);
            if let Some(mismatch) = report.mismatch() {
                println!(
                    "WARNING: Row count mismatch (expected {}, got {})",
                    mismatch.expected, mismatch.actual
                );
            }
        }
        Err(e) => println!("WARNING: Could not verify output: {e}"),
    }

    println!();
    println!("{rule}");
    println!("Conversion complete!");
    println!("{rule}");
    println!();
    println!("Next step: convert to a binary events file");
    println!(
        "  parquet-to-ipc {} events.arrow",
        args.input.display()
    );
    println!();

    Ok(())
}
