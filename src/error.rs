//! Error types for the capture agent

use thiserror::Error;

/// Capture agent errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    #[error("WebSocket message error: {0}")]
    WebSocketMessage(String),

    #[error("Failed to parse message: {0}")]
    ParseError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("TLS setup error: {0}")]
    TlsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CaptureError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        CaptureError::WebSocketConnection(err.to_string())
    }
}

impl From<serde_json::Error> for CaptureError {
    fn from(err: serde_json::Error) -> Self {
        CaptureError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::DatasetError(err.to_string())
    }
}

impl From<native_tls::Error> for CaptureError {
    fn from(err: native_tls::Error) -> Self {
        CaptureError::TlsError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
