//! Error type for `cartera-store-fs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Parse(#[from] cartera_tabular::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("file not found: {0}")]
  NotFound(String),

  /// The name contains path components or lacks the store's extension.
  #[error("invalid file name: {0:?}")]
  InvalidFileName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl cartera_core::Classify for Error {
  fn kind(&self) -> cartera_core::FailureKind {
    use cartera_core::FailureKind;
    match self {
      Error::Parse(_) | Error::InvalidFileName(_) => FailureKind::Rejected,
      Error::NotFound(_) => FailureKind::NotFound,
      Error::Io(_) => FailureKind::Storage,
    }
  }
}
