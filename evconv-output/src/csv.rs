use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use arrow::csv::WriterBuilder;

use evconv_tables::{normalize, EventTable};

use crate::{error::OutputError, ConversionStats, ConvertError, RowMismatch};

/// What `verify_csv` found when re-reading a written file.
#[derive(Debug, Clone, Copy)]
pub struct CsvReport {
    pub bytes: u64,
    /// Line count minus the header line.
    pub rows_written: usize,
    pub expected_rows: usize,
}

impl CsvReport {
    pub fn mismatch(&self) -> Option<RowMismatch> {
        (self.rows_written != self.expected_rows).then_some(RowMismatch {
            expected: self.expected_rows,
            actual: self.rows_written,
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Write the table as comma-separated text: header row of column names, one
/// line per row, no index column. Returns bytes written.
pub fn write_csv<P: AsRef<Path>>(table: &EventTable, path: P) -> Result<u64, OutputError> {
    let path = path.as_ref();
    tracing::info!(
        "writing {} rows x {} columns to {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );

    let file = File::create(path).map_err(OutputError::CreateError)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(table.batch()).map_err(OutputError::WriteError)?;
    drop(writer);

    let bytes = std::fs::metadata(path)
        .map_err(OutputError::MetadataError)?
        .len();
    Ok(bytes)
}

/// Re-read the destination and count data lines. The comparison against
/// `expected_rows` is left to the report so the caller can decide how loudly
/// to complain.
pub fn verify_csv<P: AsRef<Path>>(path: P, expected_rows: usize) -> Result<CsvReport, OutputError> {
    let path = path.as_ref();
    let bytes = std::fs::metadata(path)
        .map_err(OutputError::MetadataError)?
        .len();

    let file = File::open(path).map_err(OutputError::ReopenError)?;
    let mut lines: usize = 0;
    for line in BufReader::new(file).lines() {
        line.map_err(OutputError::ReopenError)?;
        lines += 1;
    }

    Ok(CsvReport {
        bytes,
        // Subtract the header line.
        rows_written: lines.saturating_sub(1),
        expected_rows,
    })
}

/// One-shot pipeline: load, coerce, write, verify. Verification trouble of
/// any kind is a warning, never an error.
pub fn convert_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<ConversionStats, ConvertError> {
    let table = EventTable::read_parquet(input)?;
    let table = normalize(&table)?;

    let bytes_written = write_csv(&table, &output)?;

    let (rows_written, row_mismatch) = match verify_csv(&output, table.num_rows()) {
        Ok(report) => (Some(report.rows_written), report.mismatch()),
        Err(e) => {
            tracing::warn!("could not verify output: {e}");
            (None, None)
        }
    };

    Ok(ConversionStats {
        rows_loaded: table.num_rows(),
        columns: table.num_columns(),
        bytes_written,
        rows_written,
        row_mismatch,
    })
}
