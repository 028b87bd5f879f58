use std::time::Duration;

use crate::payload::GenerationConfig;
use crate::url::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Transport configuration for Generative Language requests.
#[derive(Debug, Clone)]
pub struct GeminiApiConfig {
    /// API key passed in the `x-goog-api-key` header.
    pub api_key: String,
    /// Base URL, without the `/models/...` suffix.
    pub base_url: String,
    /// Model identifier, e.g. `gemini-2.0-flash`.
    pub model: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional sampling knobs forwarded as `generationConfig`.
    pub generation: Option<GenerationConfig>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl Default for GeminiApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            user_agent: None,
            generation: None,
            timeout: None,
        }
    }
}

impl GeminiApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
