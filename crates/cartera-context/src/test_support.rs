//! In-memory stores for aggregator and enricher tests.

use cartera_core::{
  Classify, FailureKind, Format, Record, RecordStore, SavedUpload, StoredFile,
};

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct Unavailable;

impl Classify for Unavailable {
  fn kind(&self) -> FailureKind { FailureKind::Storage }
}

/// Either a fixed set of records or a store whose every call fails.
#[derive(Clone)]
pub enum TestStore {
  Fixed(Format, Vec<Record>),
  Failing(Format),
}

impl RecordStore for TestStore {
  type Error = Unavailable;

  fn format(&self) -> Format {
    match self {
      TestStore::Fixed(f, _) | TestStore::Failing(f) => *f,
    }
  }

  async fn save(&self, _original_name: &str, _bytes: &[u8]) -> Result<SavedUpload, Unavailable> {
    Err(Unavailable)
  }

  async fn list_files(&self) -> Result<Vec<StoredFile>, Unavailable> {
    Err(Unavailable)
  }

  async fn all_records(&self) -> Result<Vec<Record>, Unavailable> {
    match self {
      TestStore::Fixed(_, records) => Ok(records.clone()),
      TestStore::Failing(_) => Err(Unavailable),
    }
  }

  async fn delete(&self, _file_name: &str) -> Result<(), Unavailable> {
    Err(Unavailable)
  }
}

pub fn record(pairs: &[(&str, &str)]) -> Record {
  pairs.iter().copied().collect()
}

/// The two-store scenario: one CSV client and one XLSX client.
pub fn juan_and_ana() -> Vec<TestStore> {
  vec![
    TestStore::Fixed(
      Format::Csv,
      vec![record(&[("LLAVE", "A1"), ("CLIENTE", "Juan"), ("DEUDA", "1000")])],
    ),
    TestStore::Fixed(
      Format::Xlsx,
      vec![record(&[
        ("LLAVE", "B2"),
        ("CLIENTE", "Ana"),
        ("TOTAL_OPERACION", "2,500.00"),
      ])],
    ),
  ]
}
