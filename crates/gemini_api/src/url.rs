/// Default base URL for Generative Language requests.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when the caller does not pick one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Build the `generateContent` endpoint for `model` under `base_url`.
///
/// Normalization rules:
/// 1) an empty base falls back to [`DEFAULT_GEMINI_BASE_URL`]
/// 2) trailing slashes on the base are dropped
/// 3) a `models/` prefix on the model id is accepted and not doubled
/// 4) an empty model falls back to [`DEFAULT_GEMINI_MODEL`]
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let base = match base_url.trim() {
        "" => DEFAULT_GEMINI_BASE_URL,
        value => value,
    };
    let base = base.trim_end_matches('/');

    let model = model.trim();
    let model = model.strip_prefix("models/").unwrap_or(model);
    let model = if model.is_empty() {
        DEFAULT_GEMINI_MODEL
    } else {
        model
    };

    format!("{base}/models/{model}:generateContent")
}
