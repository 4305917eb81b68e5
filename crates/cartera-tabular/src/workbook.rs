//! XLSX decoder. Reads the first worksheet only.
//!
//! Cells are rendered from their stored values; number formats other than
//! dates are ignored.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use cartera_core::Record;
use chrono::{NaiveDateTime, Timelike as _};

use crate::{
  error::{Error, Result},
  table,
};

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<Record>> {
  let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

  let Some(first) = workbook.sheet_names().first().cloned() else {
    return Err(Error::EmptyDocument);
  };
  let range = workbook.worksheet_range(&first)?;

  let mut rows = range
    .rows()
    .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
  let Some(header) = rows.next() else {
    return Err(Error::NoRecords);
  };

  table::into_records(header, rows)
}

/// Render a cell the way a spreadsheet user would read it.
fn cell_to_string(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    Data::Int(i) => i.to_string(),
    Data::Float(f) => format_float(*f),
    Data::Bool(true) => "TRUE".to_owned(),
    Data::Bool(false) => "FALSE".to_owned(),
    Data::DateTime(dt) => match dt.as_datetime() {
      Some(ndt) => format_datetime(ndt),
      None => format_float(dt.as_f64()),
    },
    Data::Error(e) => e.to_string(),
  }
}

fn format_float(f: f64) -> String {
  // Integral values below 2^53 print without a fractional part.
  if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
    format!("{}", f as i64)
  } else {
    format!("{f}")
  }
}

fn format_datetime(ndt: NaiveDateTime) -> String {
  if ndt.num_seconds_from_midnight() == 0 {
    ndt.format("%Y-%m-%d").to_string()
  } else {
    ndt.format("%Y-%m-%d %H:%M:%S").to_string()
  }
}
