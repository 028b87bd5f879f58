use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum GeminiApiError {
    MissingApiKey,
    InvalidHeader(String),
    Request(reqwest::Error),
    Timeout(String),
    Connect(String),
    Status(StatusCode, String),
    Serde(JsonError),
    EmptyResponse { finish_reason: Option<String> },
    Blocked { reason: String },
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
    status: Option<String>,
}

impl fmt::Display for GeminiApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required (set GEMINI_API_KEY)"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Timeout(message) => write!(f, "request timed out: {message}"),
            Self::Connect(message) => write!(f, "connection failed: {message}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::EmptyResponse { finish_reason } => match finish_reason {
                Some(reason) if !reason.trim().is_empty() => {
                    write!(f, "response contained no text (finish reason: {reason})")
                }
                _ => write!(f, "response contained no text"),
            },
            Self::Blocked { reason } => write!(f, "prompt was blocked: {reason}"),
            Self::Cancelled => write!(f, "request was cancelled"),
        }
    }
}

impl std::error::Error for GeminiApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Serde(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeminiApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error)
        }
    }
}

impl From<JsonError> for GeminiApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extract a human readable message from a non-success response body.
///
/// Google wraps failures as `{"error":{"code":..,"message":..,"status":..}}`.
/// Bodies that do not parse are returned as-is; an empty body falls back to
/// the canonical reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    let fallback = || {
        if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.to_string()
        }
    };

    let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) else {
        return fallback();
    };
    let Some(fields) = payload.error else {
        return fallback();
    };

    let message = fields
        .message
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let code = fields
        .status
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (code, message) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_owned(),
        (Some(code), None) => code.to_owned(),
        (None, None) => fallback(),
    }
}
