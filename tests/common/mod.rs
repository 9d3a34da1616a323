use std::sync::Arc;

use heptapal_store::config::DatabaseConfig;
use heptapal_store::storage::ConnectionManager;

/// Initialized manager over a private in-memory SQLite database.
pub async fn memory_manager() -> Arc<ConnectionManager> {
    let manager = ConnectionManager::new(DatabaseConfig::sqlite_memory()).unwrap();
    manager.initialize().await.unwrap();
    Arc::new(manager)
}
