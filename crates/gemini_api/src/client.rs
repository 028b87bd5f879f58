use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::GeminiApiConfig;
use crate::error::{parse_error_message, GeminiApiError};
use crate::headers::build_headers;
use crate::payload::{GenerateContentRequest, GenerateContentResponse};
use crate::url::generate_content_url;

/// Cancellation flag shared between the caller and an in-flight request.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub struct GeminiApiClient {
    http: Client,
    config: GeminiApiConfig,
}

impl GeminiApiClient {
    pub fn new(config: GeminiApiConfig) -> Result<Self, GeminiApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GeminiApiError::Request)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        generate_content_url(&self.config.base_url, &self.config.model)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, GeminiApiError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config)? {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| GeminiApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value)
                    .map_err(|_| GeminiApiError::InvalidHeader(format!("invalid value for {key}")))?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::RequestBuilder, GeminiApiError> {
        let headers = self.build_headers()?;
        let mut payload = request.clone();
        if payload.generation_config.is_none() {
            payload.generation_config = self.config.generation.clone();
        }
        Ok(self.http.post(self.endpoint()).headers(headers).json(&payload))
    }

    /// Send one `generateContent` call and decode the body.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        if is_cancelled(cancellation) {
            return Err(GeminiApiError::Cancelled);
        }

        let pending = self.build_request(request)?.send();
        let response = await_or_cancel(pending, cancellation).await??;

        let status = response.status();
        let body = await_or_cancel(response.text(), cancellation).await??;
        if !status.is_success() {
            return Err(GeminiApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Send `prompt` as a single user turn and return the reply text.
    pub async fn generate_text(
        &self,
        prompt: &str,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<String, GeminiApiError> {
        let request = GenerateContentRequest::from_prompt(prompt);
        self.generate(&request, cancellation).await?.into_text()
    }
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Acquire))
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, GeminiApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(GeminiApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(GeminiApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}
