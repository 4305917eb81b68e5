//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `cartera-store-fs`).
//! Higher layers (`cartera-context`, `cartera-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  file::{Format, SavedUpload, StoredFile},
  record::Record,
};

/// How a store error should be reported to whoever triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The caller's input was refused (unparseable upload, bad file name).
  Rejected,
  /// The named file does not exist.
  NotFound,
  /// The backend itself failed.
  Storage,
}

/// Implemented by store error types so callers can tell rejections from
/// backend failures without knowing the backend.
pub trait Classify {
  fn kind(&self) -> FailureKind;
}

/// A single-slot store for one upload [`Format`].
///
/// At most one file is held at a time: [`save`](RecordStore::save) is the
/// only write path and replaces whatever was there before. Reads always
/// re-derive from persisted state; nothing is cached between calls.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// The format this store accepts.
  fn format(&self) -> Format;

  /// Parse `bytes` and, if they parse, replace the stored file with them.
  ///
  /// On a parse failure nothing is deleted or written. `original_name` is
  /// the uploader's file name and is used only for logging.
  fn save<'a>(
    &'a self,
    original_name: &'a str,
    bytes: &'a [u8],
  ) -> impl Future<Output = Result<SavedUpload, Self::Error>> + Send + 'a;

  /// Describe every stored file, most recently modified first.
  fn list_files(
    &self,
  ) -> impl Future<Output = Result<Vec<StoredFile>, Self::Error>> + Send + '_;

  /// Every record of every stored file, concatenated.
  ///
  /// Files that fail to read or parse contribute no records; only a
  /// failure to enumerate the store itself is an error.
  fn all_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Remove the named stored file.
  fn delete<'a>(
    &'a self,
    file_name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
