//! Header + rows → records, shared by both decoders.

use std::collections::HashSet;

use cartera_core::Record;

use crate::error::{Error, Result};

const BLANK_HEADER: &str = "__EMPTY";

/// Build records from a header row and its data rows.
///
/// Blank data rows are skipped. Short rows are padded with `""`; cells past
/// the header width are dropped.
pub(crate) fn into_records<I>(header: Vec<String>, rows: I) -> Result<Vec<Record>>
where
  I: IntoIterator<Item = Vec<String>>,
{
  if header.iter().all(String::is_empty) {
    return Err(Error::NoColumns);
  }
  let columns = column_names(header);

  let records: Vec<Record> = rows
    .into_iter()
    .filter(|row| row.iter().any(|cell| !cell.is_empty()))
    .map(|row| {
      let mut cells = row.into_iter();
      columns
        .iter()
        .map(|c| (c.clone(), cells.next().unwrap_or_default()))
        .collect::<Record>()
    })
    .collect();

  if records.is_empty() {
    return Err(Error::NoRecords);
  }
  Ok(records)
}

/// Name blank header cells `__EMPTY`, `__EMPTY_1`, … and disambiguate
/// repeated names with `_1`, `_2`, … suffixes.
fn column_names(header: Vec<String>) -> Vec<String> {
  let mut used: HashSet<String> = HashSet::with_capacity(header.len());
  header
    .into_iter()
    .map(|raw| {
      let base = if raw.is_empty() { BLANK_HEADER.to_owned() } else { raw };
      let mut name = base.clone();
      let mut n = 0usize;
      while used.contains(&name) {
        n += 1;
        name = format!("{base}_{n}");
      }
      used.insert(name.clone());
      name
    })
    .collect()
}
