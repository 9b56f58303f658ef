use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::Array,
    ipc::{reader::FileReader, writer::FileWriter},
    record_batch::RecordBatch,
    util::display::array_value_to_string,
};
use arrow_schema::Schema;

use evconv_tables::{normalize, EventTable};

use crate::{error::OutputError, ConversionStats, ConvertError, RowMismatch};

/// Schema metadata key the collection name is stored under.
pub const COLLECTION_KEY: &str = "collection";

#[derive(Debug, Clone)]
pub struct IpcOptions {
    /// Collection the columns are written under.
    pub collection: String,
    /// Number of sample values echoed from the first field on inspection.
    pub sample_rows: usize,
    /// Compare destination entry count against the loaded row count.
    pub check_rows: bool,
}

impl Default for IpcOptions {
    fn default() -> Self {
        Self {
            collection: "Events".to_string(),
            sample_rows: 5,
            check_rows: false,
        }
    }
}

/// What `inspect_ipc` found when re-opening a written events file.
#[derive(Debug, Clone)]
pub struct IpcReport {
    pub entries: usize,
    pub fields: Vec<String>,
    pub collection: Option<String>,
    /// First `sample_rows` rendered values of the first field.
    pub sample_values: Vec<String>,
}

/// Write all columns as sibling fields of one named collection. The
/// destination is created or truncated; the handle is closed before this
/// returns so the verifier can reopen the file. Returns bytes written.
pub fn write_ipc<P: AsRef<Path>>(
    table: &EventTable,
    path: P,
    collection: &str,
) -> Result<u64, OutputError> {
    let path = path.as_ref();

    let mut metadata = table.schema().metadata().clone();
    metadata.insert(COLLECTION_KEY.to_string(), collection.to_string());
    let schema = Arc::new(Schema::new_with_metadata(
        table.schema().fields().clone(),
        metadata,
    ));
    let batch = RecordBatch::try_new(schema.clone(), table.batch().columns().to_vec())
        .map_err(OutputError::WriteError)?;

    tracing::info!(
        "writing {} rows x {} fields to {} (collection '{}')",
        batch.num_rows(),
        batch.num_columns(),
        path.display(),
        collection
    );

    let file = File::create(path).map_err(OutputError::CreateError)?;
    let mut writer = FileWriter::try_new(file, schema.as_ref()).map_err(OutputError::WriteError)?;
    writer.write(&batch).map_err(OutputError::WriteError)?;
    writer.finish().map_err(OutputError::WriteError)?;
    drop(writer);

    let bytes = std::fs::metadata(path)
        .map_err(OutputError::MetadataError)?
        .len();
    Ok(bytes)
}

/// Reopen a written events file read-only and report what is in it. This is
/// a diagnostic echo; it makes no pass/fail judgement of its own.
pub fn inspect_ipc<P: AsRef<Path>>(path: P, sample_rows: usize) -> Result<IpcReport, OutputError> {
    let file = File::open(path.as_ref()).map_err(OutputError::ReopenError)?;
    let reader = FileReader::try_new(file, None).map_err(OutputError::ReadBackError)?;

    let schema = reader.schema();
    let fields: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let collection = schema.metadata().get(COLLECTION_KEY).cloned();

    let mut entries = 0;
    let mut sample_values = Vec::new();
    for batch in reader {
        let batch = batch.map_err(OutputError::ReadBackError)?;
        if batch.num_columns() > 0 {
            let column = batch.column(0);
            let take = column.len().min(sample_rows.saturating_sub(sample_values.len()));
            for row in 0..take {
                let value =
                    array_value_to_string(column, row).map_err(OutputError::ReadBackError)?;
                sample_values.push(value);
            }
        }
        entries += batch.num_rows();
    }

    Ok(IpcReport {
        entries,
        fields,
        collection,
        sample_values,
    })
}

/// One-shot pipeline: load, coerce, write, inspect. A row-count mismatch is
/// carried in the stats, never an error.
pub fn convert_to_ipc<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &IpcOptions,
) -> Result<ConversionStats, ConvertError> {
    let table = EventTable::read_parquet(input)?;
    let table = normalize(&table)?;

    let bytes_written = write_ipc(&table, &output, &options.collection)?;
    let report = inspect_ipc(&output, options.sample_rows)?;

    let row_mismatch = if options.check_rows && report.entries != table.num_rows() {
        Some(RowMismatch {
            expected: table.num_rows(),
            actual: report.entries,
        })
    } else {
        None
    };

    Ok(ConversionStats {
        rows_loaded: table.num_rows(),
        columns: table.num_columns(),
        bytes_written,
        rows_written: Some(report.entries),
        row_mismatch,
    })
}
