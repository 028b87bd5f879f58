//! Transport-only client for the Generative Language `generateContent`
//! endpoint.
//!
//! One prompt in, one complete text out. There is no streaming, no retry and
//! no conversation history: every call is stateless. Credentials arrive
//! through [`GeminiApiConfig`]; reading them from the environment is the
//! caller's business.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::{CancellationSignal, GeminiApiClient};
pub use config::GeminiApiConfig;
pub use error::GeminiApiError;
pub use payload::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
pub use url::{generate_content_url, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
