//! Shared integration-test server bootstrap helpers.

use async_trait::async_trait;
use axum_test::TestServer;
use markpaste_server::{create_app, store::MemoryStore, AppError, AppState, Config, KvStore};
use std::path::Path;
use std::sync::Arc;

pub(crate) const PUBLIC_URL: &str = "http://paste.test";

pub(crate) fn test_config(index_capacity: usize) -> Config {
    Config {
        port: 0,
        db_path: String::from("unused"),
        max_paste_size: 1024,
        index_capacity,
        public_url: Some(PUBLIC_URL.to_string()),
        ephemeral: true,
    }
}

pub(crate) fn test_server_with_store(config: Config, store: Arc<dyn KvStore>) -> TestServer {
    let state = AppState::new(config, store);
    TestServer::new(create_app(state, false)).expect("server")
}

pub(crate) fn setup_test_server(index_capacity: usize) -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let server = test_server_with_store(test_config(index_capacity), store.clone());
    (server, store)
}

pub(crate) fn redb_test_server(db_path: &Path) -> TestServer {
    let config = Config {
        db_path: db_path.to_str().expect("db path").to_string(),
        ephemeral: false,
        ..test_config(100)
    };
    let store = markpaste_server::store::open_store(&config).expect("open store");
    test_server_with_store(config, store)
}

/// Extract the paste id from a `<origin>/view/<id>` URL.
pub(crate) fn id_from_view_url(url: &str) -> String {
    let id = url
        .strip_prefix(&format!("{}/view/", PUBLIC_URL))
        .unwrap_or_else(|| panic!("unexpected view url {}", url));
    id.to_string()
}

/// Store whose every operation fails.
pub(crate) struct UnavailableStore;

#[async_trait]
impl KvStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::StorageMessage("store offline".to_string()))
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::StorageMessage("store offline".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), AppError> {
        Err(AppError::StorageMessage("store offline".to_string()))
    }
}
