use evconv_tables::TableError;

pub mod csv;
pub mod error;
pub mod ipc;

pub use error::OutputError;

/// Disagreement between the row count loaded from the source and the row
/// count found in the destination. Reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Outcome of one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionStats {
    pub rows_loaded: usize,
    pub columns: usize,
    pub bytes_written: u64,
    /// Row count found when re-opening the destination, `None` when the
    /// read-back itself failed (soft failure).
    pub rows_written: Option<usize>,
    pub row_mismatch: Option<RowMismatch>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("{0}")]
    Output(#[from] OutputError),
}
