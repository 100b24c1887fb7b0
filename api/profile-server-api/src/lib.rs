use std::sync::Arc;

use aide::{
    axum::{ApiRouter, routing::get_with},
    openapi::{Info, OpenApi},
};
use axum::{Extension, Json, Router, routing::get};
use log::info;
use profile_server_app::Application;

mod profiles;

pub const HOST_VAR: &str = "PROFILE_HTTP_HOST";
pub const PORT_VAR: &str = "PROFILE_HTTP_PORT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

pub const OPENAPI_PATH: &str = "/openapi.json";

const API_TITLE: &str = "Profile lookup service";
const API_DESCRIPTION: &str = "\
Looks up user profiles stored in MongoDB.

## Endpoints

The service supports a single endpoint:

* **Get Profile**: `/profiles/{profile_id}`
";

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpConfigError {
    #[error("{var} must be a valid u16, got {1:?}", var = PORT_VAR)]
    InvalidPort(#[source] std::num::ParseIntError, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, HttpConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HttpConfigError> {
        let host = lookup(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| HttpConfigError::InvalidPort(e, raw.clone()))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }
}

pub fn router(app: Arc<Application>) -> Router {
    let mut api = OpenApi {
        info: Info {
            title: API_TITLE.to_string(),
            description: Some(API_DESCRIPTION.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    ApiRouter::new()
        .api_route(
            "/profiles/{profile_id}",
            get_with(profiles::get_by_id, profiles::get_by_id_docs),
        )
        .route(OPENAPI_PATH, get(serve_api))
        .finish_api(&mut api)
        .layer(Extension(api))
        .with_state(AppState { app })
}

async fn serve_api(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
    Json(api)
}

pub async fn run(
    app: Arc<Application>,
    config: &HttpConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    info!("API server listening on {}:{}", config.host, config.port);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Internal(String),
}

impl aide::OperationOutput for ServiceError {
    type Inner = ();
}

impl axum::response::IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "detail": msg });
        (status, axum::Json(body)).into_response()
    }
}
