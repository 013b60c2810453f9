//! World-state adapters the ledger reads and writes through
use super::error::Result;
use sled::Batch;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Key-value state as seen by the ledger.
pub trait StateStore {
    /// `Ok(None)` when the key has never been written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Apply every write or none of them.
    fn put_states(&self, writes: &[(String, Vec<u8>)]) -> Result<()>;
}

pub struct SledStore {
    instance: Arc<sled::Db>,
}

impl SledStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(sled::open(path)?)))
    }

    pub fn flush(&self) -> Result<()> {
        self.instance.flush()?;
        Ok(())
    }
}

impl StateStore for SledStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.instance.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        tracing::debug!(key, bytes = value.len(), "put state");
        self.instance.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn put_states(&self, writes: &[(String, Vec<u8>)]) -> Result<()> {
        let mut batch = Batch::default();
        for (key, value) in writes {
            tracing::debug!(key = key.as_str(), bytes = value.len(), "put state (batched)");
            batch.insert(key.as_bytes(), value.as_slice());
        }
        self.instance.apply_batch(batch)?;
        Ok(())
    }
}

/// In-process store, handy for tests and throwaway ledgers.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the full state, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>> {
        // a poisoned map is still consistent: every write is a single insert
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read().get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn put_states(&self, writes: &[(String, Vec<u8>)]) -> Result<()> {
        let mut state = self.write();
        for (key, value) in writes {
            state.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_put_states_writes_all() {
        let store = MemoryStore::new();
        store
            .put_states(&[("a".into(), b"1".to_vec()), ("b".into(), b"2".to_vec())])
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_state("b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get_state("c").unwrap(), None);
    }

    #[test]
    fn sled_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("state.db")).unwrap();

        store.put_state("abc", b"5").unwrap();
        store
            .put_states(&[("k".into(), b"v".to_vec()), ("abc".into(), b"6".to_vec())])
            .unwrap();

        assert_eq!(store.get_state("abc").unwrap(), Some(b"6".to_vec()));
        assert_eq!(store.get_state("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get_state("missing").unwrap(), None);
    }
}
