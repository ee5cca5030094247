/// Error types shared by the API client and the clipboard flows
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_ERROR_CODE: &str = "api_error";
pub const DEFAULT_ERROR_MESSAGE: &str = "Error en la API.";
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Failure returned by the API client.
///
/// Carries the server error code and HTTP status so callers can branch on
/// the failure kind, plus the raw envelope when one was received.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: String,
    pub status: u16,
    pub payload: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: DEFAULT_ERROR_CODE.to_string(),
            status: DEFAULT_ERROR_STATUS,
            payload: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_status(&self, status: u16) -> bool {
        self.status == status
    }
}

/// Why reading or writing the system clipboard failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The browser lacks the clipboard capability the operation needs.
    #[error("unsupported")]
    Unsupported,

    /// The clipboard was readable but held no non-empty image.
    #[error("no_image")]
    NoImage,

    /// The image could not be encoded as a data URL.
    #[error("read_error")]
    ReadError,

    #[error("{0}")]
    Failed(String),
}
