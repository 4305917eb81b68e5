//! Tabular decoders for Cartera uploads.
//!
//! Turns a raw CSV or XLSX buffer into [`Record`]s. Pure synchronous; no
//! filesystem or HTTP dependencies.
//!
//! Only the first sheet (or the single CSV table) is read. Its first row is
//! the header; every following non-blank row becomes one record carrying
//! every header column, with missing cells as `""`.
//!
//! XLSX cells are read by value, not by their display format: a number
//! formatted as `2,500.00` in the sheet comes back as `"2500"`, and dates
//! come back as `YYYY-MM-DD`. Searching an XLSX upload for `"2,500"` therefore
//! finds nothing where the same data uploaded as CSV text would match.
//!
//! # Quick start
//!
//! ```no_run
//! use cartera_core::Format;
//!
//! let csv = b"LLAVE,CLIENTE\nA1,Juan\n";
//! let records = cartera_tabular::parse(Format::Csv, csv).unwrap();
//! assert_eq!(records[0].get("CLIENTE"), Some("Juan"));
//! ```

pub mod error;
mod delimited;
mod table;
mod workbook;

use cartera_core::{Format, Record};
pub use error::{Error, Result};

/// Decode `bytes` as `format`.
pub fn parse(format: Format, bytes: &[u8]) -> Result<Vec<Record>> {
  match format {
    Format::Csv => delimited::parse(bytes),
    Format::Xlsx => workbook::parse(bytes),
  }
}
