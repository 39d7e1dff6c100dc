use std::sync::Arc;

use crate::auth::SessionStore;
use crate::core::Config;
use crate::db::{self, Database};
use crate::orders::OrderService;
use crate::uploads::UploadService;

/// Server state - holds shared references to all services
///
/// Cloned per request by axum; every field is either cheap to clone or
/// behind an `Arc`.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Configuration (immutable) |
/// | db | In-memory persistence store |
/// | sessions | Server-side session store |
/// | uploads | Image upload side-channel |
/// | orders | Order lifecycle service |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Persistence store
    pub db: Database,
    /// Session store (opaque token -> principal reference)
    pub sessions: Arc<SessionStore>,
    /// Upload side-channel
    pub uploads: UploadService,
    /// Order lifecycle service
    pub orders: OrderService,
}

impl ServerState {
    /// Build the full service graph over a fresh store.
    pub fn initialize(config: &Config) -> Self {
        let db = db::open();
        let uploads = UploadService::new(&config.work_dir);
        if let Err(e) = uploads.ensure_dir() {
            tracing::warn!(error = %e, dir = %uploads.dir().display(), "Failed to create upload directory");
        }

        Self {
            config: config.clone(),
            db: db.clone(),
            sessions: Arc::new(SessionStore::new(config.session_ttl_minutes)),
            uploads,
            orders: OrderService::new(db),
        }
    }
}
