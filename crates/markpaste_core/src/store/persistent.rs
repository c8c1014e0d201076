//! On-disk store backed by redb.

use super::KvStore;
use crate::{constants::REDB_FILE_NAME, error::AppError};
use async_trait::async_trait;
use redb::{ReadableDatabase, TableDefinition};
use std::fs;
use std::path::{Path, PathBuf};

/// Paste contents and the recency index record, keyed by string.
const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// [`KvStore`] persisted in a single redb file.
///
/// Every `put`/`delete` is its own committed write transaction, so a single
/// key write is durable once the call returns.
pub struct RedbStore {
    db: redb::Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the database inside the `db_path` directory.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or redb fails to
    /// open the file or initialize the table.
    pub fn open(db_path: &str) -> Result<Self, AppError> {
        let dir = Path::new(db_path);
        fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let path = dir.join(REDB_FILE_NAME);
        let db = redb::Database::create(&path)?;
        let write_txn = db.begin_write()?;
        write_txn.open_table(ENTRIES)?;
        write_txn.commit()?;
        Ok(Self { db, path })
    }

    /// Path of the redb file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ENTRIES)?;
            match value {
                Some(value) => {
                    table.insert(key, value)?;
                }
                None => {
                    table.remove(key)?;
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for RedbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.read(key)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.write(key, Some(value))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.write(key, None)
    }
}
