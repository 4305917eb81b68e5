//! [`Aggregator`] — one dataset over every record store.
//!
//! Nothing is indexed or cached: every call re-reads all stores. Datasets are
//! expected to stay in the low thousands of rows.

use cartera_core::{BestEffort as _, Format, Record, RecordStore};

/// Column whose exact value narrows a free-text search.
pub const DEFAULT_CATEGORY_FIELD: &str = "Parque Industrial";

/// Merges the records of several stores, in the order the stores were given.
pub struct Aggregator<S> {
  stores:         Vec<S>,
  category_field: String,
}

impl<S: RecordStore> Aggregator<S> {
  /// `stores` must be in store-priority order (see [`Format::ALL`]).
  pub fn new(stores: Vec<S>) -> Self {
    Self {
      stores,
      category_field: DEFAULT_CATEGORY_FIELD.to_owned(),
    }
  }

  pub fn with_category_field(mut self, field: impl Into<String>) -> Self {
    self.category_field = field.into();
    self
  }

  /// The store holding uploads of `format`, if one is configured.
  pub fn store(&self, format: Format) -> Option<&S> {
    self.stores.iter().find(|s| s.format() == format)
  }

  /// Every store's records. A failing store contributes nothing.
  pub async fn all_records(&self) -> Vec<Record> {
    let mut records = Vec::new();
    for store in &self.stores {
      let context = format!("reading {} records", store.format());
      records.extend(store.all_records().await.or_neutral(&context));
    }
    records
  }

  /// Case-insensitive substring search over every value.
  ///
  /// See [`search_records`] for the category narrowing rule.
  pub async fn search(&self, query: &str) -> Vec<Record> {
    search_records(self.all_records().await, query, &self.category_field)
  }

  /// Case-insensitive substring search within one column.
  pub async fn search_by_field(&self, field: &str, value: &str) -> Vec<Record> {
    filter_by_field(self.all_records().await, field, value)
  }
}

fn normalize(query: &str) -> String { query.trim().to_lowercase() }

fn contains(value: &str, needle: &str) -> bool {
  !value.is_empty() && value.to_lowercase().contains(needle)
}

/// Keep records where any non-empty value contains `query`.
///
/// If any match has `category_field` equal to the whole query (ignoring
/// case), only those matches are kept.
pub fn search_records(
  records: Vec<Record>,
  query: &str,
  category_field: &str,
) -> Vec<Record> {
  let needle = normalize(query);

  let mut matches: Vec<Record> = records
    .into_iter()
    .filter(|r| r.values().any(|v| contains(v, &needle)))
    .collect();

  let is_exact = |r: &Record| {
    r.get_non_empty(category_field)
      .is_some_and(|v| v.to_lowercase() == needle)
  };
  if matches.iter().any(is_exact) {
    matches.retain(is_exact);
  }
  matches
}

/// Keep records whose `field` is present, non-empty and contains `value`.
pub fn filter_by_field(records: Vec<Record>, field: &str, value: &str) -> Vec<Record> {
  let needle = normalize(value);
  records
    .into_iter()
    .filter(|r| r.get(field).is_some_and(|v| contains(v, &needle)))
    .collect()
}
