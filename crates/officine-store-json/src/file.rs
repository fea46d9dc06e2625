//! Named JSON documents with atomic replace.

use std::{
  collections::HashMap,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
  fs,
  io::AsyncWriteExt as _,
  sync::{Mutex as AsyncMutex, OwnedMutexGuard},
};
use uuid::Uuid;

use crate::{Error, Result};

/// A directory of JSON documents, one file per name (`<dir>/<name>.json`).
///
/// Reads are lock-free and always observe a complete document, because
/// writes go to a temporary file that is renamed over the target. Callers
/// doing read-modify-write hold [`FileStore::lock`] for the document across
/// the whole cycle.
pub struct FileStore {
  dir:   PathBuf,
  locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self {
      dir:   dir.into(),
      locks: Mutex::new(HashMap::new()),
    }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Read and parse a document.
  ///
  /// A document that does not exist yet (or is an empty file) is the normal
  /// empty state of a fresh data directory, and yields `default`. Any other
  /// failure, including a document that exists but does not parse, is an
  /// error: handing back `default` there would let the next write erase the
  /// stored data.
  pub async fn read<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T> {
    let path = self.path_of(name)?;
    self.ensure_dir().await?;

    let bytes = match fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(default),
      Err(source) => return Err(Error::Io { path, source }),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(default);
    }

    serde_json::from_slice(&bytes).map_err(|source| Error::Malformed { path, source })
  }

  /// Serialise `value` and atomically replace the document with it.
  ///
  /// The new content is written to a uniquely named sibling file and
  /// `fsync`ed before being renamed over the target, so a crash leaves either
  /// the previous or the new version in place.
  pub async fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
    let path  = self.path_of(name)?;
    let bytes = serde_json::to_vec_pretty(value)?;
    self.ensure_dir().await?;

    let tmp = self
      .dir
      .join(format!(".{name}.json.{}.tmp", Uuid::new_v4().simple()));

    if let Err(source) = write_synced(&tmp, &bytes).await {
      fs::remove_file(&tmp).await.ok();
      return Err(Error::Io { path: tmp, source });
    }

    if let Err(source) = fs::rename(&tmp, &path).await {
      fs::remove_file(&tmp).await.ok();
      return Err(Error::Io { path, source });
    }

    sync_dir(&self.dir).await;
    tracing::debug!(document = name, bytes = bytes.len(), "document replaced");
    Ok(())
  }

  /// Acquire the writer lock for a document.
  ///
  /// The lock is held until the returned guard is dropped. Callers taking
  /// more than one lock must acquire them in a fixed order.
  pub async fn lock(&self, name: &str) -> OwnedMutexGuard<()> {
    let mutex = {
      let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
      locks.entry(name.to_owned()).or_default().clone()
    };
    mutex.lock_owned().await
  }

  fn path_of(&self, name: &str) -> Result<PathBuf> {
    let valid = !name.is_empty()
      && name != "."
      && name != ".."
      && !name.contains(['/', '\\']);
    if !valid {
      return Err(Error::InvalidDocumentName(name.to_owned()));
    }
    Ok(self.dir.join(format!("{name}.json")))
  }

  async fn ensure_dir(&self) -> Result<()> {
    fs::create_dir_all(&self.dir)
      .await
      .map_err(|source| Error::Io { path: self.dir.clone(), source })
  }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let mut file = fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(path)
    .await?;
  file.write_all(bytes).await?;
  file.sync_all().await
}

/// Best-effort: persist the rename itself. Not every platform lets a
/// directory be opened for syncing.
async fn sync_dir(dir: &Path) {
  if let Ok(handle) = fs::File::open(dir).await {
    handle.sync_all().await.ok();
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use serde_json::json;

  use super::*;

  fn store() -> (tempfile::TempDir, FileStore) {
    let dir   = tempfile::tempdir().expect("temp dir");
    let files = FileStore::new(dir.path().join("data"));
    (dir, files)
  }

  #[tokio::test]
  async fn missing_document_yields_default_and_creates_dir() {
    let (_tmp, files) = store();
    let value: Vec<String> = files.read("doctors", vec!["seed".into()]).await.unwrap();
    assert_eq!(value, ["seed"]);
    assert!(files.dir().is_dir());
  }

  #[tokio::test]
  async fn write_then_read_returns_the_same_value() {
    let (_tmp, files) = store();
    let value = json!({ "P-1": { "id": "P-1", "visits": [] }, "P-2": null });
    files.write("patients_data", &value).await.unwrap();

    let back: serde_json::Value = files.read("patients_data", json!({})).await.unwrap();
    assert_eq!(back, value);

    let again: serde_json::Value = files.read("patients_data", json!({})).await.unwrap();
    assert_eq!(again, back);
  }

  #[tokio::test]
  async fn write_leaves_no_temp_files_behind() {
    let (_tmp, files) = store();
    files.write("doctors", &vec![1, 2, 3]).await.unwrap();
    files.write("doctors", &vec![4]).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(files.dir())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, ["doctors.json"]);

    let back: Vec<i32> = files.read("doctors", Vec::new()).await.unwrap();
    assert_eq!(back, [4]);
  }

  #[tokio::test]
  async fn empty_file_is_treated_as_missing() {
    let (_tmp, files) = store();
    std::fs::create_dir_all(files.dir()).unwrap();
    std::fs::write(files.dir().join("patients_index.json"), "").unwrap();

    let value: Vec<String> = files.read("patients_index", Vec::new()).await.unwrap();
    assert!(value.is_empty());
  }

  #[tokio::test]
  async fn corrupt_document_is_an_error_not_a_default() {
    let (_tmp, files) = store();
    std::fs::create_dir_all(files.dir()).unwrap();
    std::fs::write(files.dir().join("patients_data.json"), "{ not json").unwrap();

    let result: Result<BTreeMap<String, i32>> =
      files.read("patients_data", BTreeMap::new()).await;
    assert!(matches!(result, Err(Error::Malformed { .. })));
  }

  #[tokio::test]
  async fn names_that_escape_the_directory_are_rejected() {
    let (_tmp, files) = store();
    for name in ["", "..", "../doctors", "a/b", "a\\b"] {
      let result = files.write(name, &json!([])).await;
      assert!(
        matches!(result, Err(Error::InvalidDocumentName(_))),
        "accepted {name:?}"
      );
    }
  }

  #[tokio::test]
  async fn lock_serialises_holders_of_the_same_document() {
    let (_tmp, files) = store();
    let files = Arc::new(files);

    let guard = files.lock("doctors").await;
    let other = Arc::clone(&files);
    let waiter = tokio::spawn(async move {
      let _guard = other.lock("doctors").await;
    });

    // A different document is independent.
    drop(files.lock("patients_data").await);

    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());
    drop(guard);
    waiter.await.unwrap();
  }
}
