//! Record — one row of uploaded client data.
//!
//! Columns are whatever the uploaded file's header row says; nothing is fixed
//! across uploads. Column order is preserved exactly as read.

use std::fmt;

use serde::{
  Deserialize, Deserializer, Serialize, Serializer,
  de::{MapAccess, Visitor},
  ser::SerializeMap,
};

/// Field names the admin UI suggests for uploads.
///
/// Guidance only: uploads lacking any or all of these are still accepted.
pub const RECOMMENDED_FIELDS: &[&str] = &[
  "LLAVE",
  "LOTE",
  "CONDOMINIO",
  "CLUSTER",
  "DESARROLLO",
  "CLIENTE",
  "RFC",
  "IDCIF",
  "USO_CFDI",
  "TELEFONO",
  "CORREO",
  "M2",
  "TOTAL_OPERACION",
  "ENGANCHE",
  "FINANCIAMIENTO",
  "FIRMA_CONTRATO",
  "FIRMA_CONVENIO",
  "FIN_CORRIDA",
  "TOTAL_MENSUALIDADES",
  "PAGADO",
  "DEUDA",
  "ESTATUS_CM",
  "TIPO_LOTE",
  "ESTATUS",
];

/// An ordered mapping from column name to string value.
///
/// Lookups are linear; rows rarely have more than a few dozen columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
  fields: Vec<(String, String)>,
}

impl Record {
  pub fn new() -> Self { Self::default() }

  /// Set `column` to `value`. An existing column keeps its position.
  pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
    let column = column.into();
    let value = value.into();
    match self.fields.iter_mut().find(|(c, _)| *c == column) {
      Some((_, v)) => *v = value,
      None => self.fields.push((column, value)),
    }
  }

  /// The value of `column`, if the column exists (it may be empty).
  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|(c, _)| c == column)
      .map(|(_, v)| v.as_str())
  }

  /// The value of `column` if it exists and is non-empty.
  pub fn get_non_empty(&self, column: &str) -> Option<&str> {
    self.get(column).filter(|v| !v.is_empty())
  }

  pub fn columns(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|(c, _)| c.as_str())
  }

  pub fn values(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|(_, v)| v.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

impl<K, V> FromIterator<(K, V)> for Record
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut record = Record::new();
    for (k, v) in iter {
      record.insert(k, v);
    }
    record
  }
}

// ─── Serde ───────────────────────────────────────────────────────────────────

impl Serialize for Record {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.fields.len()))?;
    for (c, v) in &self.fields {
      map.serialize_entry(c, v)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for Record {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct RecordVisitor;

    impl<'de> Visitor<'de> for RecordVisitor {
      type Value = Record;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of column names to string values")
      }

      fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((c, v)) = access.next_entry::<String, String>()? {
          record.insert(c, v);
        }
        Ok(record)
      }
    }

    deserializer.deserialize_map(RecordVisitor)
  }
}
