use std::sync::Arc;

use service::historico::{HistoricoService, RecordStore};

/// Shared handler state; built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub historico: HistoricoService,
}

impl ServerState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { historico: HistoricoService::new(store) }
    }
}
