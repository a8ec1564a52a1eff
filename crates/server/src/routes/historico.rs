use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service::historico::domain::{HistoricoInput, HistoricoRecord, Stats, MISSING_FIELDS_MESSAGE};
use tracing::{info, warn};

use crate::{errors::JsonApiError, state::ServerState};

pub const CREATED_MESSAGE: &str = "Histórico adicionado!";

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub historico: HistoricoRecord,
}

/// POST /historico
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedResponse>, JsonApiError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "historico payload rejected");
        JsonApiError::new(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE)
    })?;
    let input = HistoricoInput::from_json(body)?;
    let historico = state.historico.create(input).await?;
    Ok(Json(CreatedResponse { message: CREATED_MESSAGE, historico }))
}

/// GET /historico
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<HistoricoRecord>>, JsonApiError> {
    let list = state.historico.list().await?;
    info!(count = list.len(), "list historicos");
    Ok(Json(list))
}

/// GET /estatisticas
pub async fn stats(State(state): State<ServerState>) -> Result<Json<Stats>, JsonApiError> {
    Ok(Json(state.historico.stats().await?))
}
