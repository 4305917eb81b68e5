//! CSV decoder.

use cartera_core::Record;

use crate::{
  error::{Error, Result},
  table,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<Record>> {
  let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Err(Error::EmptyDocument);
  }

  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(bytes);
  let mut rows = reader.records();

  let header: Vec<String> = match rows.next() {
    Some(row) => row?.iter().map(str::to_owned).collect(),
    None => return Err(Error::EmptyDocument),
  };

  let data = rows
    .map(|row| row.map(|r| r.iter().map(str::to_owned).collect::<Vec<_>>()))
    .collect::<Result<Vec<_>, csv::Error>>()?;

  table::into_records(header, data)
}
