//! Error types for the cartera-tabular decoders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("document contains no sheets")]
  EmptyDocument,

  #[error("document is empty or has no data rows")]
  NoRecords,

  #[error("document has no valid columns")]
  NoColumns,

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("workbook error: {0}")]
  Workbook(#[from] calamine::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
