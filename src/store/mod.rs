//! Local document store speaking the same REST dialect as the hosted one:
//! `/{collection}.json` for the collection and `/{collection}/{key}.json`
//! for single records.

pub mod db;
mod errors;
mod handlers;

pub use errors::StoreError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::StoreConfig;
use db::Database;

/// Shared state of the store server.
#[derive(Debug, Clone)]
pub struct StoreState {
    pub db: Arc<Mutex<Database>>,
    read_only: Arc<AtomicBool>,
}

impl StoreState {
    pub fn new(db: Database) -> Self {
        StoreState {
            db: Arc::new(Mutex::new(db)),
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reject every write with 403 while set.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.is_read_only() {
            return Err(StoreError::Forbidden("store is read-only".to_string()));
        }
        Ok(())
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> Result<T, String>,
    ) -> Result<T, StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StoreError::Internal(format!("database lock poisoned: {e}")))?;
        f(&db).map_err(StoreError::Internal)
    }
}

/// Build the axum router with all routes.
pub fn create_router(state: StoreState) -> Router {
    Router::new()
        .route("/{collection}", get(handlers::list).post(handlers::create))
        .route(
            "/{collection}/{key}",
            get(handlers::fetch)
                .put(handlers::replace)
                .patch(handlers::patch)
                .delete(handlers::remove),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Open the database and start serving on localhost.
pub async fn serve(config: &StoreConfig) -> Result<(), String> {
    let db = Database::open(&config.db_path)?;
    db.migrate()?;
    let state = StoreState::new(db);
    state.set_read_only(config.read_only);
    let app = create_router(state);
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to bind to {addr}: {e}"))?;
    info!(%addr, db = %config.db_path.display(), read_only = config.read_only, "store listening");
    println!("Taskboard store: http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|e| format!("server error: {e}"))
}
