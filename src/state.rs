use crate::archive::ArchiveRegistry;
use crate::db::DbPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub archive: Arc<ArchiveRegistry>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            archive: Arc::new(ArchiveRegistry::new()),
        }
    }
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
