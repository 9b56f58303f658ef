use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Failed to open input file: {0}")]
    InputOpenError(std::io::Error),
    #[error("Failed to read parquet file: {0}")]
    ParquetReadError(#[from] parquet::errors::ParquetError),
    #[error("Failed to assemble record batch: {0}")]
    BatchError(arrow::error::ArrowError),
    #[error("Failed to coerce column '{0}': {1}")]
    CoercionError(String, arrow::error::ArrowError),
}
