use std::collections::BTreeMap;

use crate::config::GeminiApiConfig;
use crate::error::GeminiApiError;

pub const HEADER_API_KEY: &str = "x-goog-api-key";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for `generateContent` requests.
///
/// A blank API key is rejected here so that no request leaves the process
/// without credentials.
pub fn build_headers(config: &GeminiApiConfig) -> Result<BTreeMap<String, String>, GeminiApiError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(GeminiApiError::MissingApiKey);
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_API_KEY.to_owned(), api_key.to_owned());
    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );

    let user_agent = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), user_agent);

    Ok(headers)
}

fn default_user_agent() -> String {
    format!("discuss/{}", env!("CARGO_PKG_VERSION"))
}
