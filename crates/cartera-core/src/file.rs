//! Upload formats and persisted-file descriptors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supported upload format. Each format owns exactly one storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
  Csv,
  Xlsx,
}

impl Format {
  /// Every format, in store-priority order. Aggregated reads concatenate
  /// stores in this order.
  pub const ALL: [Format; 2] = [Format::Csv, Format::Xlsx];

  /// File extension without the leading dot.
  pub fn extension(self) -> &'static str {
    match self {
      Format::Csv => "csv",
      Format::Xlsx => "xlsx",
    }
  }

  /// Lowercase name, also used as the multipart field name on upload.
  pub fn as_str(self) -> &'static str { self.extension() }

  /// Whether `file_name` carries this format's extension.
  pub fn matches(self, file_name: &str) -> bool {
    file_name
      .strip_suffix(self.extension())
      .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Descriptor of one persisted upload, as reported by a store listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
  pub name:        String,
  /// Last modification time of the file on disk.
  pub upload_date: DateTime<Utc>,
  /// Size in bytes.
  pub size:        u64,
  /// Number of data rows, re-parsed at listing time. `0` if unparseable.
  pub records:     usize,
}

/// The outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedUpload {
  /// Name the upload was stored under (not the uploader's file name).
  pub filename:       String,
  pub rows_processed: usize,
}
