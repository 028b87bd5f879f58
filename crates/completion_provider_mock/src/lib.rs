//! Deterministic mock implementation of the `completion_provider` contract.
//!
//! No transport involved; used for offline runs and contract-level tests.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use completion_provider::{
    CancelSignal, CompletionEvent, CompletionProvider, CompletionRequest, ProviderProfile,
};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// Model identifier reported by the mock.
pub const MOCK_MODEL_ID: &str = "mock";

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Reply with this exact text.
    Text(String),
    /// Fail with this error message.
    Fail(String),
    /// Reply with a markdown showcase that quotes the prompt.
    Showcase,
}

/// Deterministic mock provider. Scripted replies are consumed in order; once the script runs
/// out the fallback reply is used for every further request.
#[derive(Debug)]
pub struct MockProvider {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    delay: Duration,
}

impl MockProvider {
    #[must_use]
    pub fn new(script: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: MockReply::Showcase,
            delay: Duration::ZERO,
        }
    }

    /// Replies with `text` to every request.
    #[must_use]
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(Vec::new()).with_fallback(MockReply::Text(text.into()))
    }

    /// Fails every request with `error`.
    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self::new(Vec::new()).with_fallback(MockReply::Fail(error.into()))
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: MockReply) -> Self {
        self.fallback = fallback;
        self
    }

    /// Simulated latency before the terminal event; cancellation is honored during it.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn next_reply(&self) -> MockReply {
        lock_unpoisoned(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    // Returns false when cancelled before the delay elapsed.
    fn wait(&self, cancel: &CancelSignal) -> bool {
        let deadline = Instant::now() + self.delay;
        loop {
            if cancel.load(Ordering::SeqCst) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(CANCEL_POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(Vec::new()).with_delay(Duration::from_millis(400))
    }
}

impl CompletionProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: MOCK_MODEL_ID.to_string(),
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

        if !self.wait(&cancel) {
            tracing::debug!(request_id, "mock request cancelled");
            emit(CompletionEvent::Cancelled { request_id });
            return Ok(());
        }

        let event = match self.next_reply() {
            MockReply::Text(text) => CompletionEvent::Completed { request_id, text },
            MockReply::Fail(error) => CompletionEvent::Failed { request_id, error },
            MockReply::Showcase => CompletionEvent::Completed {
                request_id,
                text: showcase(&req.prompt),
            },
        };
        emit(event);
        Ok(())
    }
}

fn showcase(prompt: &str) -> String {
    let quoted: String = prompt
        .lines()
        .map(|line| format!("> {line}\n"))
        .collect();
    format!(
        "You asked:\n\n{quoted}\n\
         ## Mocked answer\n\n\
         A deterministic reply with **bold**, *italic*, ~~strikethrough~~ and `inline code`.\n\n\
         1. Ordered step one\n\
         2. Ordered step two\n   - [x] nested task\n\n\
         ```rust\nfn main() {{\n    println!(\"Hello, Discuss\");\n}}\n```\n\n\
         | Feature | Supported |\n| --- | :-: |\n| Tables | yes |\n| Links | [docs](https://example.com) |\n"
    )
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use super::*;

    fn collect_events(provider: &MockProvider, prompt: &str, cancel: CancelSignal) -> Vec<CompletionEvent> {
        let mut events = Vec::new();
        provider
            .complete(
                CompletionRequest {
                    request_id: 7,
                    prompt: prompt.to_string(),
                },
                cancel,
                &mut |event| events.push(event),
            )
            .expect("mock request should not error");
        events
    }

    fn not_cancelled() -> CancelSignal {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn profile_exposes_explicit_mock_provider_identity() {
        let profile = MockProvider::new(Vec::new()).profile();
        assert_eq!(profile.provider_id, MOCK_PROVIDER_ID);
        assert_eq!(profile.model_id, MOCK_MODEL_ID);
    }

    #[test]
    fn script_is_consumed_in_order_then_falls_back() {
        let provider = MockProvider::new(vec![
            MockReply::Text("world".to_string()),
            MockReply::Fail("quota exceeded".to_string()),
        ])
        .with_fallback(MockReply::Text("again".to_string()));

        assert_eq!(
            collect_events(&provider, "hello", not_cancelled()),
            vec![
                CompletionEvent::Started { request_id: 7 },
                CompletionEvent::Completed {
                    request_id: 7,
                    text: "world".to_string()
                },
            ]
        );
        assert_eq!(
            collect_events(&provider, "hello", not_cancelled()).last(),
            Some(&CompletionEvent::Failed {
                request_id: 7,
                error: "quota exceeded".to_string()
            })
        );
        assert_eq!(
            collect_events(&provider, "hello", not_cancelled()).last(),
            Some(&CompletionEvent::Completed {
                request_id: 7,
                text: "again".to_string()
            })
        );
    }

    #[test]
    fn cancel_before_reply_emits_cancelled() {
        let provider = MockProvider::always("unused").with_delay(Duration::from_secs(5));
        let events = collect_events(&provider, "x", Arc::new(AtomicBool::new(true)));
        assert_eq!(
            events,
            vec![
                CompletionEvent::Started { request_id: 7 },
                CompletionEvent::Cancelled { request_id: 7 },
            ]
        );
    }

    #[test]
    fn showcase_quotes_the_prompt() {
        let provider = MockProvider::new(Vec::new());
        let Some(CompletionEvent::Completed { text, .. }) =
            collect_events(&provider, "line one\nline two", not_cancelled()).pop()
        else {
            panic!("expected completion");
        };
        assert!(text.contains("> line one\n> line two\n"));
        assert!(text.contains("```rust"));
    }
}
