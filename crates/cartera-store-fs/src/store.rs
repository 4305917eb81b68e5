//! [`FsStore`] — the filesystem implementation of [`RecordStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
  time::SystemTime,
};

use cartera_core::{
  BestEffort as _,
  file::{Format, SavedUpload, StoredFile},
  record::Record,
  store::RecordStore,
};
use chrono::{DateTime, NaiveDate, Utc};
use tokio::{fs, sync::RwLock};
use tracing::{info, warn};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The storage slot for one [`Format`] inside a data directory.
///
/// Uploads are stored as `clientes_<YYYY-MM-DD>.<ext>` (UTC date); a second
/// upload on the same day overwrites the first. Saves and deletes are
/// serialised against reads through a per-store lock, so a reader never sees
/// the gap between removing the old file and writing the new one.
///
/// Cloning is cheap and clones share the lock. Two stores opened separately
/// on the same directory and format do not.
#[derive(Clone)]
pub struct FsStore {
  dir:    Arc<PathBuf>,
  format: Format,
  lock:   Arc<RwLock<()>>,
}

impl FsStore {
  /// Open the `format` slot in `dir`, creating the directory if needed.
  pub async fn open(dir: impl Into<PathBuf>, format: Format) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).await?;
    Ok(Self {
      dir: Arc::new(dir),
      format,
      lock: Arc::new(RwLock::new(())),
    })
  }

  /// Open one store per format in `dir`, in store-priority order.
  pub async fn open_all(dir: impl Into<PathBuf>) -> Result<Vec<Self>> {
    let dir = dir.into();
    let mut stores = Vec::with_capacity(Format::ALL.len());
    for format in Format::ALL {
      stores.push(Self::open(dir.clone(), format).await?);
    }
    Ok(stores)
  }

  pub fn dir(&self) -> &Path { &self.dir }

  fn stored_name(&self, date: NaiveDate) -> String {
    format!("clientes_{}.{}", date.format("%Y-%m-%d"), self.format.extension())
  }

  /// Names of this format's files in the directory, sorted.
  async fn file_names(&self) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(&*self.dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let Ok(name) = entry.file_name().into_string() else {
        continue;
      };
      if !self.format.matches(&name) {
        continue;
      }
      if entry.file_type().await.is_ok_and(|t| t.is_file()) {
        names.push(name);
      }
    }
    names.sort();
    Ok(names)
  }

  async fn read_records(&self, name: &str) -> Result<Vec<Record>> {
    let bytes = fs::read(self.dir.join(name)).await?;
    Ok(cartera_tabular::parse(self.format, &bytes)?)
  }

  async fn describe(&self, name: String) -> Result<StoredFile> {
    let meta = fs::metadata(self.dir.join(&name)).await?;
    let upload_date =
      DateTime::<Utc>::from(meta.modified().unwrap_or(SystemTime::UNIX_EPOCH));
    let records = self
      .read_records(&name)
      .await
      .map(|r| r.len())
      .or_neutral(&format!("counting records in {name}"));

    Ok(StoredFile {
      name,
      upload_date,
      size: meta.len(),
      records,
    })
  }

  fn check_file_name(&self, name: &str) -> Result<()> {
    let valid = !name.contains(['/', '\\'])
      && name != "."
      && name != ".."
      && self.format.matches(name);
    if valid {
      Ok(())
    } else {
      Err(Error::InvalidFileName(name.to_owned()))
    }
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for FsStore {
  type Error = Error;

  fn format(&self) -> Format { self.format }

  async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<SavedUpload> {
    let records = cartera_tabular::parse(self.format, bytes)?;

    let _guard = self.lock.write().await;

    for stale in self.file_names().await? {
      match fs::remove_file(self.dir.join(&stale)).await {
        Ok(()) => info!(format = %self.format, file = %stale, "removed previous upload"),
        Err(e) => {
          warn!(format = %self.format, file = %stale, error = %e, "failed to remove previous upload")
        }
      }
    }

    let filename = self.stored_name(Utc::now().date_naive());
    fs::write(self.dir.join(&filename), bytes).await?;

    info!(
      format = %self.format,
      original = %original_name,
      stored = %filename,
      rows = records.len(),
      "stored upload"
    );
    Ok(SavedUpload {
      filename,
      rows_processed: records.len(),
    })
  }

  async fn list_files(&self) -> Result<Vec<StoredFile>> {
    let _guard = self.lock.read().await;

    let mut files = Vec::new();
    for name in self.file_names().await? {
      match self.describe(name.clone()).await {
        Ok(file) => files.push(file),
        Err(e) => warn!(format = %self.format, file = %name, error = %e, "skipping unlistable file"),
      }
    }
    files.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    Ok(files)
  }

  async fn all_records(&self) -> Result<Vec<Record>> {
    let _guard = self.lock.read().await;

    let mut records = Vec::new();
    for name in self.file_names().await? {
      let parsed = self
        .read_records(&name)
        .await
        .or_neutral(&format!("reading records from {name}"));
      records.extend(parsed);
    }
    Ok(records)
  }

  async fn delete(&self, file_name: &str) -> Result<()> {
    self.check_file_name(file_name)?;

    let _guard = self.lock.write().await;

    match fs::remove_file(self.dir.join(file_name)).await {
      Ok(()) => {
        info!(format = %self.format, file = %file_name, "deleted upload");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        Err(Error::NotFound(file_name.to_owned()))
      }
      Err(e) => Err(e.into()),
    }
  }
}
