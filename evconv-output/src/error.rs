#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to create output file: {0}")]
    CreateError(std::io::Error),
    #[error("Failed to write output: {0}")]
    WriteError(arrow::error::ArrowError),
    #[error("Failed to reopen output for verification: {0}")]
    ReopenError(std::io::Error),
    #[error("Failed to read back output: {0}")]
    ReadBackError(arrow::error::ArrowError),
    #[error("Failed to stat output file: {0}")]
    MetadataError(std::io::Error),
}
