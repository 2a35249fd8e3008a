use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use stockpage_core::{ConfigError, ProxyError, ValidationError};

/// Errors surfaced by the HTTP handlers as `{ "error": ... }` bodies.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error(transparent)]
    InvalidSymbol(#[from] ValidationError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Proxy(error) => {
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Proxy(error) => error.client_message(),
            Self::InvalidSymbol(error) => error.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Startup failures of the `stockpage` binary, mapped to exit codes.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid listen address '{value}'")]
    InvalidAddress { value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServeError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::InvalidAddress { .. } => 2,
            Self::Io(_) => 10,
        }
    }
}
