//! Shared test-only helpers for markpaste_core.

use crate::{error::AppError, store::KvStore, MemoryStore};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Store operation kinds that [`FaultyStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Get,
    Put,
    Delete,
}

/// Wraps a [`MemoryStore`] and fails selected operations on selected keys.
#[derive(Default)]
pub(crate) struct FaultyStore {
    pub(crate) inner: MemoryStore,
    faults: Mutex<HashSet<(Op, String)>>,
}

impl FaultyStore {
    /// Make every `op` on `key` fail until [`FaultyStore::heal`] is called.
    pub(crate) fn fail(&self, op: Op, key: &str) {
        self.faults
            .lock()
            .expect("faults lock")
            .insert((op, key.to_string()));
    }

    /// Remove all injected faults.
    pub(crate) fn heal(&self) {
        self.faults.lock().expect("faults lock").clear();
    }

    /// Make every `op` fail regardless of key.
    pub(crate) fn fail_all(&self, op: Op) {
        self.fail(op, "*");
    }

    fn check(&self, op: Op, key: &str) -> Result<(), AppError> {
        let faults = self.faults.lock().expect("faults lock");
        if faults.contains(&(op, key.to_string())) || faults.contains(&(op, "*".to_string())) {
            return Err(AppError::StorageMessage(format!(
                "injected {:?} failure for '{}'",
                op, key
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for FaultyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.check(Op::Get, key)?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.check(Op::Put, key)?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.check(Op::Delete, key)?;
        self.inner.delete(key).await
    }
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Serializes environment mutation across tests and restores every touched
/// variable when dropped.
pub(crate) struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub(crate) fn lock() -> Self {
        let lock = env_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    fn remember(&mut self, key: &str) {
        if !self.saved.iter().any(|(saved, _)| saved == key) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }
    }

    #[allow(unused_unsafe)]
    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        // SAFETY: env mutation is serialized by the global lock held by self.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    #[allow(unused_unsafe)]
    pub(crate) fn remove(&mut self, key: &str) {
        self.remember(key);
        // SAFETY: env mutation is serialized by the global lock held by self.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for ScopedEnv {
    #[allow(unused_unsafe)]
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: the global lock is still held until `_lock` drops.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}
