use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use completion_provider::{
    CancelSignal, CompletionEvent, CompletionProvider, CompletionRequest, ProviderProfile,
};
use completion_provider_mock::{MockProvider, MockReply};
use discuss::app::{App, HostOps, RequestState, ERROR_REQUEST_ALREADY_ACTIVE};
use discuss::runtime::{RuntimeController, UiEvent};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

fn next_completion(inbox: &Receiver<UiEvent>) -> CompletionEvent {
    match inbox.recv_timeout(EVENT_TIMEOUT) {
        Ok(UiEvent::Completion(event)) => event,
        Ok(other) => panic!("unexpected event: {other:?}"),
        Err(error) => panic!("no completion event: {error}"),
    }
}

/// Pumps provider events into `app` until a terminal event has been applied.
fn drain_until_terminal(
    controller: &Arc<RuntimeController>,
    app: &mut App,
    inbox: &Receiver<UiEvent>,
) -> Vec<CompletionEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_completion(inbox);
        let terminal = event.is_terminal();
        seen.push(event.clone());
        controller.apply_completion_event(app, event);
        if terminal {
            return seen;
        }
    }
}

#[test]
fn completion_round_trip_through_worker_thread() {
    let (events, inbox) = mpsc::channel();
    let controller = RuntimeController::new(Arc::new(MockProvider::always("world")), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("hello", &mut host);
    assert!(app.is_loading());
    assert!(controller.active_request_id().is_some());

    let seen = drain_until_terminal(&controller, &mut app, &inbox);

    assert!(matches!(seen.first(), Some(CompletionEvent::Started { .. })));
    assert_eq!(seen.len(), 2);
    assert_eq!(app.request, RequestState::Idle);
    assert_eq!(controller.active_request_id(), None);
    assert!(controller.take_render_request());
    assert!(!controller.take_render_request());

    let transcript = app.store.active_session().expect("session").transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].request_text(), "hello");
    assert_eq!(transcript[0].response_text(), "world");
}

#[test]
fn provider_failure_restores_prompt() {
    let (events, inbox) = mpsc::channel();
    let provider = MockProvider::new(vec![MockReply::Fail("quota exceeded".to_string())]);
    let controller = RuntimeController::new(Arc::new(provider), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("hello", &mut host);
    drain_until_terminal(&controller, &mut app, &inbox);

    assert!(matches!(app.request, RequestState::Failed { ref error } if error == "quota exceeded"));
    assert_eq!(app.input, "hello");
    assert!(app
        .store
        .active_session()
        .expect("session")
        .transcript()
        .is_empty());
}

#[test]
fn second_start_while_active_is_rejected() {
    let (events, inbox) = mpsc::channel();
    let provider = MockProvider::always("slow").with_delay(Duration::from_millis(300));
    let controller = RuntimeController::new(Arc::new(provider), events);
    let mut host = Arc::clone(&controller);

    let first = host.start_request("one".to_string()).expect("first start");
    let second = host.start_request("two".to_string());
    assert_eq!(second, Err(ERROR_REQUEST_ALREADY_ACTIVE.to_string()));

    host.cancel_request(first);
    let mut app = App::new();
    let mut terminal = None;
    while terminal.is_none() {
        let event = next_completion(&inbox);
        if event.is_terminal() {
            terminal = Some(event.clone());
        }
        controller.apply_completion_event(&mut app, event);
    }
    assert_eq!(terminal, Some(CompletionEvent::Cancelled { request_id: first }));
    assert_eq!(controller.active_request_id(), None);
}

#[test]
fn cancel_from_app_discards_reply_and_frees_slot() {
    let (events, inbox) = mpsc::channel();
    let provider = MockProvider::always("never shown").with_delay(Duration::from_secs(2));
    let controller = RuntimeController::new(Arc::new(provider), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("long task", &mut host);
    app.on_line("/cancel", &mut host);
    assert!(app.is_cancelling());

    drain_until_terminal(&controller, &mut app, &inbox);

    assert!(!app.is_cancelling());
    assert_eq!(controller.active_request_id(), None);
    assert_eq!(app.input, "long task");
    assert!(app
        .store
        .active_session()
        .expect("session")
        .transcript()
        .is_empty());

    app.on_line("", &mut host);
    assert!(app.is_loading(), "slot is free again after the cancelled worker exits");
    controller.shutdown();
}

struct PanickingProvider;

impl CompletionProvider for PanickingProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "panic".to_string(),
            model_id: "panic".to_string(),
        }
    }

    fn complete(
        &self,
        req: CompletionRequest,
        _cancel: CancelSignal,
        emit: &mut dyn FnMut(CompletionEvent),
    ) -> Result<(), String> {
        emit(CompletionEvent::Started {
            request_id: req.request_id,
        });
        panic!("provider blew up");
    }
}

struct SilentProvider;

impl CompletionProvider for SilentProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "silent".to_string(),
            model_id: "silent".to_string(),
        }
    }

    fn complete(
        &self,
        _req: CompletionRequest,
        _cancel: CancelSignal,
        _emit: &mut dyn FnMut(CompletionEvent),
    ) -> Result<(), String> {
        Ok(())
    }
}

struct ErroringProvider;

impl CompletionProvider for ErroringProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "erroring".to_string(),
            model_id: "erroring".to_string(),
        }
    }

    fn complete(
        &self,
        _req: CompletionRequest,
        _cancel: CancelSignal,
        _emit: &mut dyn FnMut(CompletionEvent),
    ) -> Result<(), String> {
        Err("transport unavailable".to_string())
    }
}

#[test]
fn panicking_provider_still_yields_failed_event() {
    let (events, inbox) = mpsc::channel();
    let controller = RuntimeController::new(Arc::new(PanickingProvider), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("boom", &mut host);
    let seen = drain_until_terminal(&controller, &mut app, &inbox);

    assert!(matches!(
        seen.last(),
        Some(CompletionEvent::Failed { error, .. }) if error.contains("panicked")
    ));
    assert_eq!(app.input, "boom");
    assert_eq!(controller.active_request_id(), None);
}

#[test]
fn silent_provider_gets_synthesized_failure() {
    let (events, inbox) = mpsc::channel();
    let controller = RuntimeController::new(Arc::new(SilentProvider), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("anyone there", &mut host);
    let seen = drain_until_terminal(&controller, &mut app, &inbox);

    assert_eq!(seen.len(), 1);
    assert!(matches!(
        &seen[0],
        CompletionEvent::Failed { error, .. } if error.contains("without a result")
    ));
}

#[test]
fn provider_error_return_becomes_failed_event() {
    let (events, inbox) = mpsc::channel();
    let controller = RuntimeController::new(Arc::new(ErroringProvider), events);
    let mut host = Arc::clone(&controller);
    let mut app = App::new();

    app.on_line("hi", &mut host);
    let seen = drain_until_terminal(&controller, &mut app, &inbox);

    assert_eq!(
        seen,
        vec![CompletionEvent::Failed {
            request_id: 1,
            error: "transport unavailable".to_string(),
        }]
    );
    assert!(matches!(app.request, RequestState::Failed { .. }));
}
