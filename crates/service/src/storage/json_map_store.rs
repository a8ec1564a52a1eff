use std::{collections::HashMap, hash::Hash, path::{Path, PathBuf}};
use tokio::{
    fs,
    sync::{RwLock, RwLockMappedWriteGuard, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file. The file is read lazily on first
/// access, so constructing a store never touches the disk. Every write flushes
/// the whole map through a temp file and a rename; a failed flush rolls the
/// in-memory change back.
pub struct JsonMapStore<K, V> {
    inner: RwLock<Option<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { inner: RwLock::new(None), file_path: path.into() }
    }

    /// Create the parent directory and an empty map file if missing. Idempotent.
    pub async fn ensure_file(&self) -> Result<(), ServiceError> {
        common::env::ensure_parent_dir(&self.file_path)
            .await
            .map_err(ServiceError::storage)?;
        if fs::metadata(&self.file_path).await.is_ok() {
            // existing file must still parse
            self.read().await?;
            return Ok(());
        }
        let mut slot = self.inner.write().await;
        let map = slot.get_or_insert_with(HashMap::new);
        Self::flush(&self.file_path, map).await?;
        debug!(path = %self.file_path.display(), "created empty json map file");
        Ok(())
    }

    async fn load(path: &Path) -> Result<HashMap<K, V>, ServiceError> {
        match fs::read(path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Storage(format!("corrupt store file {}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ServiceError::Storage(format!("cannot read {}: {e}", path.display()))),
        }
    }

    async fn flush(path: &Path, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(ServiceError::storage)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, path).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    async fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<K, V>>, ServiceError> {
        loop {
            let guard = match RwLockReadGuard::try_map(self.inner.read().await, |m| m.as_ref()) {
                Ok(map) => return Ok(map),
                Err(guard) => guard,
            };
            drop(guard);
            let mut slot = self.inner.write().await;
            if slot.is_none() {
                *slot = Some(Self::load(&self.file_path).await?);
            }
        }
    }

    async fn write(&self) -> Result<RwLockMappedWriteGuard<'_, HashMap<K, V>>, ServiceError> {
        let mut slot = self.inner.write().await;
        if slot.is_none() {
            *slot = Some(Self::load(&self.file_path).await?);
        }
        RwLockWriteGuard::try_map(slot, |m| m.as_mut())
            .map_err(|_| ServiceError::Storage("json map not loaded".into()))
    }

    /// List all entries as `(key, value)` pairs.
    pub async fn list(&self) -> Result<Vec<(K, V)>, ServiceError> {
        let map = self.read().await?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Result<Option<V>, ServiceError> {
        let map = self.read().await?;
        Ok(map.get(key).cloned())
    }

    pub async fn len(&self) -> Result<usize, ServiceError> {
        Ok(self.read().await?.len())
    }

    /// Insert or replace a value and persist. On flush failure the previous value is restored.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.write().await?;
        let previous = map.insert(key.clone(), value);
        if let Err(e) = Self::flush(&self.file_path, &map).await {
            match previous {
                Some(v) => map.insert(key, v),
                None => map.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }
}
