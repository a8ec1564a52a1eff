pub mod historico;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/historico", get(historico::list).post(historico::create))
        .route("/estatisticas", get(historico::stats))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use service::historico::repository::mock::MockRecordStore;
    use tower::ServiceExt;

    use super::*;

    fn app(store: Arc<MockRecordStore>) -> Router {
        crate::startup::build_app(ServerState::new(store))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/historico")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn create_then_list() {
        let app = app(Arc::new(MockRecordStore::default()));

        let (status, body) = send(&app, post(json!({"lingua": "pt", "data": "2024-01-01"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Histórico adicionado!");
        assert_eq!(body["historico"]["lingua"], "pt");
        assert_eq!(body["historico"]["id"], 1);

        let (status, body) = send(&app, get("/historico")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": 1, "lingua": "pt", "data": "2024-01-01", "rank": null}]));
    }

    #[tokio::test]
    async fn missing_lingua_is_rejected_without_write() {
        let store = Arc::new(MockRecordStore::default());
        let app = app(store.clone());

        let (status, body) = send(&app, post(json!({"data": "2024-01-01"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Informe lingua e data."}));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let store = Arc::new(MockRecordStore::default());
        let app = app(store.clone());
        let req = Request::builder()
            .method("POST")
            .uri("/historico")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"lingua\":"))
            .unwrap();

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Informe lingua e data.");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected_without_write() {
        let store = Arc::new(MockRecordStore::default());
        let app = app(store.clone());

        for body in [json!(["pt", "2024-01-01"]), json!({"lingua": 0, "data": "2024-01-01"})] {
            let (status, res) = send(&app, post(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(res, json!({"error": "Informe lingua e data."}));
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn boolean_rank_is_stored_as_text() {
        let app = app(Arc::new(MockRecordStore::default()));
        let (status, body) = send(&app, post(json!({"lingua": "pt", "data": "2024-01-01", "rank": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["historico"]["rank"], "true");
    }

    #[tokio::test]
    async fn stats_per_language() {
        let app = app(Arc::new(MockRecordStore::default()));
        for lingua in ["pt", "pt", "en"] {
            let (status, _) = send(&app, post(json!({"lingua": lingua, "data": "2024-01-01"}))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&app, get("/estatisticas")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"total": 3, "porLingua": {"pt": 2, "en": 1}}));
    }

    #[tokio::test]
    async fn store_outage_yields_generic_500() {
        let store = Arc::new(MockRecordStore::default());
        let app = app(store.clone());
        store.set_failing(true);

        for req in [post(json!({"lingua": "pt", "data": "d"})), get("/historico"), get("/estatisticas")] {
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "Internal Server Error"}));
        }

        store.set_failing(false);
        let (_, body) = send(&app, get("/historico")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = app(Arc::new(MockRecordStore::default()));
        let req = Request::builder()
            .uri("/historico")
            .header(header::ORIGIN, "https://example.org")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn health_ok() {
        let app = app(Arc::new(MockRecordStore::default()));
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
