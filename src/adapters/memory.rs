use crate::core::runtimevar::{Decoder, Variable};
use crate::domain::model::{RawValue, WatchOptions};
use crate::domain::ports::{VariableOpener, Watcher};
use crate::utils::error::{GuestbookError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-process variable store. Cloning shares the underlying values, so a
/// handle kept by the caller can change what open variables observe.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written.
    fn lock_values(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, name: &str, value: impl Into<Vec<u8>>) {
        self.lock_values().insert(name.to_string(), value.into());
    }

    pub fn remove(&self, name: &str) {
        self.lock_values().remove(name);
    }

    pub fn watcher(&self, name: &str) -> MemoryWatcher {
        MemoryWatcher {
            store: self.clone(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryWatcher {
    store: MemoryStore,
    name: String,
}

#[async_trait]
impl Watcher for MemoryWatcher {
    async fn fetch(&self) -> Result<RawValue> {
        self.store
            .lock_values()
            .get(&self.name)
            .map(|bytes| RawValue::new(bytes.clone()))
            .ok_or_else(|| GuestbookError::VariableNotFoundError {
                name: self.name.clone(),
            })
    }
}

impl VariableOpener for MemoryStore {
    async fn new_variable<T>(
        &self,
        name: &str,
        decoder: Decoder<T>,
        options: WatchOptions,
    ) -> Result<Variable<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        Variable::open(name, self.watcher(name), decoder, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_keeps_working_after_poisoned_lock() {
        let store = MemoryStore::new();
        let shared = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.values.lock().unwrap();
            panic!("writer crashed");
        })
        .join();
        assert!(store.values.is_poisoned());

        store.set("motd", "still here");
        let raw = store.watcher("motd").fetch().await.unwrap();
        assert_eq!(raw.bytes, b"still here");

        store.remove("motd");
        assert!(matches!(
            store.watcher("motd").fetch().await,
            Err(GuestbookError::VariableNotFoundError { .. })
        ));
    }
}
