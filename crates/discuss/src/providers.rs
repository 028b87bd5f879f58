use std::sync::Arc;
use std::time::Duration;

use completion_provider::{CompletionProvider, ProviderInitError};
use completion_provider_gemini::{GeminiProvider, GeminiProviderConfig, GEMINI_PROVIDER_ID};
use completion_provider_mock::{MockProvider, MOCK_PROVIDER_ID};

pub const DEFAULT_PROVIDER_ID: &str = GEMINI_PROVIDER_ID;

#[derive(Debug, thiserror::Error)]
pub enum ProviderSelectionError {
    #[error("Unsupported provider '{0}'. Available providers: gemini, mock")]
    Unsupported(String),
    #[error(transparent)]
    Init(#[from] ProviderInitError),
}

/// Startup options that pick and configure a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    pub provider_id: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

pub fn provider_for_options(
    options: &ProviderOptions,
) -> Result<Arc<dyn CompletionProvider>, ProviderSelectionError> {
    match options.provider_id.trim() {
        MOCK_PROVIDER_ID => Ok(Arc::new(MockProvider::default())),
        GEMINI_PROVIDER_ID => {
            let mut config = GeminiProviderConfig::new(options.api_key.clone().unwrap_or_default());
            if let Some(model) = options.model.as_deref() {
                config = config.with_model(model);
            }
            if let Some(base_url) = options.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
                config = config.with_base_url(base_url);
            }
            if let Some(timeout) = options.timeout {
                config = config.with_timeout(timeout);
            }
            Ok(Arc::new(GeminiProvider::new(config)?))
        }
        unknown => Err(ProviderSelectionError::Unsupported(unknown.to_string())),
    }
}
