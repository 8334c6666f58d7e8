//! HTTP server for regulation queries

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::{QueryResult, SharedQueryEngine};

/// Questions shorter than this (after trimming) are rejected
pub const MIN_QUESTION_CHARS: usize = 3;

const INVALID_QUESTION_MESSAGE: &str = "La pregunta debe tener al menos 3 caracteres";

/// Body of `POST /query`
#[derive(Debug, Deserialize)]
pub struct QueryRequestHttp {
    #[serde(default)]
    pub pregunta: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Service description returned by `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub mensaje: String,
    pub version: String,
    pub entradas_cargadas: usize,
    pub llm_habilitado: bool,
    pub modelo_llm: Option<String>,
    pub endpoints: BTreeMap<String, String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub reglamento_cargado: bool,
    pub total_entradas: usize,
}

/// Trimmed question, or `None` when it is too short to answer
pub fn validate_question(raw: &str) -> Option<&str> {
    let question = raw.trim();
    (question.chars().count() >= MIN_QUESTION_CHARS).then_some(question)
}

async fn query_handler(
    State(engine): State<SharedQueryEngine>,
    Json(req): Json<QueryRequestHttp>,
) -> Result<Json<QueryResult>, (StatusCode, Json<ErrorResponse>)> {
    let Some(question) = validate_question(&req.pregunta) else {
        warn!("Rejected question: '{}'", req.pregunta);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: INVALID_QUESTION_MESSAGE.to_string(),
            }),
        ));
    };

    info!("Received query: '{}'", question);
    Ok(Json(engine.answer(question).await))
}

async fn info_handler(State(engine): State<SharedQueryEngine>) -> Json<InfoResponse> {
    let endpoints = [
        ("POST /query", "Consultar el reglamento (soporta LLM si está configurado)"),
        ("GET /", "Este mensaje"),
        ("GET /health", "Estado del servicio"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Json(InfoResponse {
        mensaje: "🚗 API Chatbot Reglamento de Tránsito Hermosillo".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        entradas_cargadas: engine.corpus().len(),
        llm_habilitado: engine.generator_enabled(),
        modelo_llm: engine.model_name().map(str::to_string),
        endpoints,
    })
}

async fn health_handler(State(engine): State<SharedQueryEngine>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        reglamento_cargado: !engine.corpus().is_empty(),
        total_entradas: engine.corpus().len(),
    })
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create and configure the HTTP router
pub fn create_router(engine: SharedQueryEngine, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: SharedQueryEngine, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting regulation query server on {}", addr);

    let app = create_router(engine, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::NO_MATCHES_ANSWER;
    use crate::{Corpus, QueryEngine, RegulationEntry};
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let corpus = Corpus::from(vec![RegulationEntry::new(
            "Velocidad",
            "Límite urbano",
            "La velocidad máxima en zona urbana es 50 km/h",
        )
        .with_article("Art. 12")]);
        let origins = vec!["http://localhost:5173".to_string()];
        create_router(QueryEngine::new_simple(corpus), &origins)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn query_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_validate_question() {
        assert_eq!(validate_question("  ¿sí?  "), Some("¿sí?"));
        assert_eq!(validate_question("más"), Some("más"));
        assert_eq!(validate_question(" ok "), None);
        assert_eq!(validate_question(""), None);
    }

    #[tokio::test]
    async fn test_query_returns_sources() {
        let resp = test_app()
            .oneshot(query_request(r#"{"pregunta": "cuál es la velocidad máxima"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let result: QueryResult = body_json(resp).await;
        assert_eq!(result.sources.len(), 1);
        assert!(!result.used_generator);
        assert!(result.answer.contains("Art. 12"));
    }

    #[tokio::test]
    async fn test_query_without_matches() {
        let resp = test_app()
            .oneshot(query_request(r#"{"pregunta": "estacionamiento"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let result: QueryResult = body_json(resp).await;
        assert!(result.sources.is_empty());
        assert_eq!(result.answer, NO_MATCHES_ANSWER);
    }

    #[tokio::test]
    async fn test_short_question_is_rejected() {
        let resp = test_app()
            .oneshot(query_request(r#"{"pregunta": " ok "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.error, INVALID_QUESTION_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_question_is_rejected() {
        let resp = test_app().oneshot(query_request("{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_info_and_health() {
        let app = test_app();

        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let info: InfoResponse = body_json(resp).await;
        assert_eq!(info.entradas_cargadas, 1);
        assert!(!info.llm_habilitado);
        assert_eq!(info.modelo_llm, None);
        assert!(info.endpoints.contains_key("POST /query"));

        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let health: HealthResponse = body_json(resp).await;
        assert_eq!(health.status, "healthy");
        assert!(health.reglamento_cargado);
        assert_eq!(health.total_entradas, 1);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }
}
