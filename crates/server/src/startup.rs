use std::{future::Future, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreBackend};
use service::historico::{repo::{DocumentRecordStore, SeaOrmRecordStore}, RecordStore};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the record store named by `storage.backend`.
pub async fn build_store(cfg: &AppConfig) -> Result<Arc<dyn RecordStore>, StartupError> {
    let store: Arc<dyn RecordStore> = match cfg.storage.backend {
        StoreBackend::Postgres => {
            let db = models::db::connect_lazy(&cfg.database).await?;
            Arc::new(SeaOrmRecordStore::new(db))
        }
        StoreBackend::Document => Arc::new(DocumentRecordStore::new(&cfg.storage.document_path)),
    };
    Ok(store)
}

/// Make sure the table or collection exists. Failures are logged only; requests
/// will fail with 500 until the store becomes reachable.
pub async fn prepare_schema(state: &ServerState) {
    let backend = state.historico.backend();
    match state.historico.ensure_schema().await {
        Ok(()) => info!(backend, "historicos store is ready"),
        Err(e) => error!(backend, error = %e, "failed to set up historicos store"),
    }
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Build the app and serve it until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = build_store(&cfg).await?;
    let state = ServerState::new(store);
    prepare_schema(&state).await;

    let app = build_app(state);
    let host = cfg.server.host.clone();
    let port = cfg.server.port;
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|source| StartupError::Bind { addr: format!("{host}:{port}"), source })?;
    let addr = listener
        .local_addr()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    info!(%addr, backend = ?cfg.storage.backend, "server listening on http://localhost:{}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
