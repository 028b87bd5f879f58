//! Provider-agnostic contract for one completion request.
//!
//! The crate defines the request lifecycle shared by the chat application and every backend.
//! Transport details and payload formats belong to the provider crates.

use std::fmt;
use std::sync::{atomic::AtomicBool, Arc};

/// Identifier for one completion request.
pub type RequestId = u64;

/// Shared cancellation flag for a request.
pub type CancelSignal = Arc<AtomicBool>;

/// Error returned while constructing/configuring a provider before any request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderInitError {}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Input for one stateless completion call: the user's full text, no prior turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub request_id: RequestId,
    pub prompt: String,
}

/// Provider-emitted lifecycle event for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    Started { request_id: RequestId },
    Completed { request_id: RequestId, text: String },
    Failed { request_id: RequestId, error: String },
    Cancelled { request_id: RequestId },
}

impl CompletionEvent {
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Started { request_id }
            | Self::Completed { request_id, .. }
            | Self::Failed { request_id, .. }
            | Self::Cancelled { request_id } => *request_id,
        }
    }

    /// Returns true when this event ends the request lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}

/// Immutable metadata describing a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Backend that turns one prompt into one reply.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Executes `req`, emitting `Started` followed by exactly one terminal event.
    ///
    /// Implementations poll `cancel` and emit `Cancelled` once they observe it. An `Err` return
    /// means the provider could not report its own outcome; hosts turn it into `Failed`.
    fn complete(
        &self,
        req: CompletionRequest,
        cancel: CancelSignal,
        emit: &mut dyn FnMut(CompletionEvent),
    ) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::{
        CancelSignal, CompletionEvent, CompletionProvider, CompletionRequest, ProviderInitError,
        ProviderProfile,
    };

    struct EchoProvider;

    impl CompletionProvider for EchoProvider {
        fn profile(&self) -> ProviderProfile {
            ProviderProfile {
                provider_id: "echo".to_string(),
                model_id: "echo-model".to_string(),
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
            if cancel.load(Ordering::SeqCst) {
                emit(CompletionEvent::Cancelled { request_id });
            } else {
                emit(CompletionEvent::Completed {
                    request_id,
                    text: req.prompt,
                });
            }
            Ok(())
        }
    }

    #[test]
    fn event_request_id_returns_event_request_id() {
        let request_id = 42;
        let events = [
            CompletionEvent::Started { request_id },
            CompletionEvent::Completed {
                request_id,
                text: "done".to_string(),
            },
            CompletionEvent::Failed {
                request_id,
                error: "failure".to_string(),
            },
            CompletionEvent::Cancelled { request_id },
        ];

        for event in events {
            assert_eq!(event.request_id(), request_id);
        }
    }

    #[test]
    fn terminal_detection_matches_lifecycle() {
        assert!(!CompletionEvent::Started { request_id: 1 }.is_terminal());
        assert!(CompletionEvent::Completed {
            request_id: 1,
            text: String::new(),
        }
        .is_terminal());
        assert!(CompletionEvent::Failed {
            request_id: 1,
            error: "boom".to_string(),
        }
        .is_terminal());
        assert!(CompletionEvent::Cancelled { request_id: 1 }.is_terminal());
    }

    #[test]
    fn provider_init_error_preserves_message() {
        let error = ProviderInitError::from("missing key");
        assert_eq!(error.message(), "missing key");
        assert_eq!(error.to_string(), "missing key");
    }

    #[test]
    fn trait_objects_report_started_then_one_terminal_event() {
        let provider: Arc<dyn CompletionProvider> = Arc::new(EchoProvider);
        for (cancelled, expected_terminal) in [
            (
                false,
                CompletionEvent::Completed {
                    request_id: 3,
                    text: "hi".to_string(),
                },
            ),
            (true, CompletionEvent::Cancelled { request_id: 3 }),
        ] {
            let mut events = Vec::new();
            provider
                .complete(
                    CompletionRequest {
                        request_id: 3,
                        prompt: "hi".to_string(),
                    },
                    Arc::new(AtomicBool::new(cancelled)),
                    &mut |event| events.push(event),
                )
                .expect("echo provider should not fail");
            assert_eq!(
                events,
                vec![CompletionEvent::Started { request_id: 3 }, expected_terminal]
            );
        }
    }
}
