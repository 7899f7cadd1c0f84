use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// Holds the whole document in memory and rewrites the file on every update.
/// Writes go to a sibling `.tmp` file which is fsynced and renamed over the
/// original, so readers of the file only ever see a complete document.
/// Updates hold the write lock until the rename completes, which serializes writers.
pub struct JsonFileStore<T> {
    inner: Arc<RwLock<T>>,
    file_path: PathBuf,
}

impl<T> JsonFileStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default + Clone + Send + Sync + 'static,
{
    /// Load the document from `path`, creating it with `T::default()` if missing.
    /// An unreadable or corrupt document is an error; it is never replaced silently.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let doc: T = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => T::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::StorageUnavailable(format!("corrupt document {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = T::default();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::storage(e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(doc)), file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Run `f` against the current document.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let doc = self.inner.read().await;
        f(&doc)
    }

    /// Apply `f` to a draft copy, persist the draft, then publish it.
    /// If `f` or the write fails, neither memory nor the file changes.
    ///
    /// Persist and publish run on their own task holding the write guard, so
    /// dropping the returned future cannot leave the file ahead of memory.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> Result<R, ServiceError>) -> Result<R, ServiceError> {
        let mut doc = Arc::clone(&self.inner).write_owned().await;
        let mut draft = T::clone(&doc);
        let out = f(&mut draft)?;

        let path = self.file_path.clone();
        tokio::spawn(async move {
            write_atomic(&path, &draft).await?;
            *doc = draft;
            Ok::<(), ServiceError>(())
        })
        .await
        .map_err(|e| ServiceError::StorageUnavailable(format!("persist task failed: {e}")))??;
        Ok(out)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_atomic<T: serde::Serialize>(path: &Path, doc: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(doc).map_err(ServiceError::storage)?;
    let tmp = tmp_path(path);
    let written = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            if cleanup.kind() != ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %cleanup, "could not remove temp file");
            }
        }
        return Err(ServiceError::StorageUnavailable(format!("writing {}: {e}", path.display())));
    }
    debug!(path = %path.display(), bytes = data.len(), "document persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("json_file_store_{tag}_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn creates_missing_file_and_persists_updates() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("crud");
        let store = JsonFileStore::<Vec<String>>::new(&tmp).await?;
        assert!(tmp.exists());
        assert_eq!(store.read(|v| v.len()).await, 0);

        store.update(|v| { v.push("a".into()); Ok(()) }).await?;
        store.update(|v| { v.push("b".into()); Ok(()) }).await?;

        let reloaded = JsonFileStore::<Vec<String>>::new(&tmp).await?;
        assert_eq!(reloaded.read(|v| v.clone()).await, vec!["a".to_string(), "b".to_string()]);
        assert!(!tmp_path(&tmp).exists(), "temp file must be renamed away");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("rollback");
        let store = JsonFileStore::<Vec<u32>>::new(&tmp).await?;
        store.update(|v| { v.push(1); Ok(()) }).await?;
        let before = tokio::fs::read(&tmp).await?;

        let res: Result<(), ServiceError> = store
            .update(|v| {
                v.push(2);
                Err(ServiceError::Conflict("nope".into()))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(store.read(|v| v.clone()).await, vec![1]);
        assert_eq!(tokio::fs::read(&tmp).await?, before);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_updates_keep_file_and_memory_in_step() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("cancel");
        let store = JsonFileStore::<Vec<u32>>::new(&tmp).await?;

        // abandon updates at varying points, including mid-write
        for i in 0..32u32 {
            let update = store.update(move |v| { v.push(i); Ok(()) });
            let _ = tokio::time::timeout(std::time::Duration::from_micros(u64::from(i) * 50), update).await;
        }
        store.update(|v| { v.push(1000); Ok(()) }).await?;

        let in_memory = store.read(|v| v.clone()).await;
        let on_disk: Vec<u32> = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk, in_memory);
        assert_eq!(in_memory.last(), Some(&1000));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_is_an_error() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("corrupt");
        tokio::fs::write(&tmp, b"[{\"truncated\": ").await?;
        let res = JsonFileStore::<Vec<serde_json::Value>>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::StorageUnavailable(_))));
        // the damaged file is left for inspection
        assert_eq!(tokio::fs::read(&tmp).await?, b"[{\"truncated\": ".to_vec());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn blank_file_loads_as_default() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("blank");
        tokio::fs::write(&tmp, b"\n").await?;
        let store = JsonFileStore::<Vec<u8>>::new(&tmp).await?;
        assert!(store.read(|v| v.is_empty()).await);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
