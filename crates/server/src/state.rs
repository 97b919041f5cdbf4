use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::{CartStore, LineItemStore, SeaOrmStore};

/// Handles shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub carts: Arc<dyn CartStore>,
    pub products: Arc<dyn LineItemStore>,
}

impl ServerState {
    /// Both stores backed by the same connection pool.
    pub fn from_db(db: DatabaseConnection) -> Self {
        let store = SeaOrmStore::new(db);
        Self { carts: Arc::new(store.clone()), products: Arc::new(store) }
    }
}
