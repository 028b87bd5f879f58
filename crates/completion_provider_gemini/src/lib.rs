//! Generative Language implementation of the shared `completion_provider` contract.
//!
//! The adapter drives one blocking `generateContent` call per request and maps its outcome onto
//! the `Started` + terminal event lifecycle the chat application expects.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use completion_provider::{
    CancelSignal, CompletionEvent, CompletionProvider, CompletionRequest, ProviderInitError,
    ProviderProfile,
};
use gemini_api::{GeminiApiClient, GeminiApiConfig, GeminiApiError, DEFAULT_GEMINI_MODEL};

/// Stable provider identifier used by startup selection.
pub const GEMINI_PROVIDER_ID: &str = "gemini";

/// Runtime configuration for the Gemini provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiProviderConfig {
    pub api_key: String,
    pub model_id: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl GeminiProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_id: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let trimmed = model_id.trim();
        if !trimmed.is_empty() {
            self.model_id = trimmed.to_string();
        }
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_api_config(self) -> GeminiApiConfig {
        let mut config = GeminiApiConfig::new(self.api_key).with_model(self.model_id);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait GenerateClient: Send + Sync {
    fn generate_text(&self, prompt: &str, cancel: &CancelSignal) -> Result<String, GeminiApiError>;
}

#[derive(Debug)]
struct DefaultGenerateClient {
    client: GeminiApiClient,
}

impl GenerateClient for DefaultGenerateClient {
    fn generate_text(&self, prompt: &str, cancel: &CancelSignal) -> Result<String, GeminiApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                GeminiApiError::Connect(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.generate_text(prompt, Some(cancel)))
    }
}

/// `CompletionProvider` adapter backed by `gemini_api`.
pub struct GeminiProvider {
    model_id: String,
    client: Arc<dyn GenerateClient>,
}

impl GeminiProvider {
    /// Creates a provider using the real HTTP transport.
    ///
    /// A blank API key is rejected up front so the application can report it before the first
    /// prompt is typed.
    pub fn new(config: GeminiProviderConfig) -> Result<Self, ProviderInitError> {
        if config.api_key.trim().is_empty() {
            return Err(map_init_error(GeminiApiError::MissingApiKey));
        }

        let model_id = config.model_id.clone();
        let client = Arc::new(DefaultGenerateClient {
            client: GeminiApiClient::new(config.into_api_config()).map_err(map_init_error)?,
        });

        Ok(Self { model_id, client })
    }

    #[cfg(test)]
    fn with_client_for_tests(model_id: &str, client: Arc<dyn GenerateClient>) -> Self {
        Self {
            model_id: model_id.to_string(),
            client,
        }
    }
}

impl CompletionProvider for GeminiProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: GEMINI_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn complete(
        &self,
        req: CompletionRequest,
        cancel: CancelSignal,
        emit: &mut dyn FnMut(CompletionEvent),
    ) -> Result<(), String> {
        let request_id = req.request_id;

        emit(CompletionEvent::Started { request_id });

        if cancel.load(Ordering::Acquire) {
            emit(CompletionEvent::Cancelled { request_id });
            return Ok(());
        }

        tracing::debug!(request_id, model = %self.model_id, "sending generateContent request");
        match self.client.generate_text(&req.prompt, &cancel) {
            Ok(text) => emit(CompletionEvent::Completed { request_id, text }),
            Err(GeminiApiError::Cancelled) => emit(CompletionEvent::Cancelled { request_id }),
            Err(error) => {
                tracing::warn!(request_id, %error, "generateContent request failed");
                emit(CompletionEvent::Failed {
                    request_id,
                    error: format!("Gemini request failed: {error}"),
                })
            }
        }

        Ok(())
    }
}

fn map_init_error(error: GeminiApiError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize gemini provider: {error}"))
}
