use std::{fs::File, path::Path};

use arrow::{compute::concat_batches, record_batch::RecordBatch};
use arrow_schema::SchemaRef;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::TableError;

/// Row/column counts of a loaded table, captured for the post-write
/// consistency report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub num_rows: usize,
    pub num_columns: usize,
}

/// An event table held fully in memory: ordered named columns over a shared
/// row count, backed by a single record batch.
#[derive(Debug, Clone)]
pub struct EventTable {
    schema: SchemaRef,
    batch: RecordBatch,
}

impl EventTable {
    /// Read an entire parquet file into memory. All row groups are collected
    /// and concatenated into one batch; an empty file yields an empty batch
    /// with the file schema.
    pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::error!("input file not found: {}", path.display());
            return Err(TableError::InputNotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(TableError::InputOpenError)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;

        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .map_err(TableError::BatchError)?;
        let batch = concat_batches(&schema, &batches).map_err(TableError::BatchError)?;

        tracing::debug!(
            "loaded {} rows x {} columns from {}",
            batch.num_rows(),
            batch.num_columns(),
            path.display()
        );

        Ok(Self { schema, batch })
    }

    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batch,
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            num_rows: self.num_rows(),
            num_columns: self.num_columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Array, Float64Array, Int64Array};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_fixture(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("mass", DataType::Float64, false),
            Field::new("n_jets", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![125.1, 124.8, 126.0])),
                Arc::new(Int64Array::from(vec![2, 3, 2])),
            ],
        )
        .unwrap();

        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn read_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        write_fixture(&path);

        let table = EventTable::read_parquet(&path).unwrap();
        assert_eq!(
            table.stats(),
            TableStats {
                num_rows: 3,
                num_columns: 2
            }
        );
        assert_eq!(table.column_names(), vec!["mass", "n_jets"]);

        let mass = table
            .batch()
            .column(0)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(mass.value(0), 125.1);
    }

    #[test]
    fn missing_input_is_reported() {
        let err = EventTable::read_parquet("does/not/exist.parquet").unwrap_err();
        assert!(matches!(err, TableError::InputNotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn corrupt_input_is_a_parquet_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.parquet");
        std::fs::write(&path, b"this is not a parquet file").unwrap();

        let err = EventTable::read_parquet(&path).unwrap_err();
        assert!(matches!(err, TableError::ParquetReadError(_)));
    }
}
