use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use completion_provider::{CancelSignal, CompletionEvent, CompletionProvider, CompletionRequest};

use crate::app::{App, HostOps, RequestId, ERROR_REQUEST_ALREADY_ACTIVE};

/// Everything the main loop reacts to, funneled through one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Line(String),
    InputClosed,
    Completion(CompletionEvent),
}

struct ActiveRequest {
    request_id: RequestId,
    cancel: CancelSignal,
    join_handle: Option<JoinHandle<()>>,
}

/// Runs completions on worker threads and reports their events back to the main loop.
///
/// At most one request is active. Every started request produces exactly one terminal
/// event on the channel, even when the provider panics or returns an error.
pub struct RuntimeController {
    events: Mutex<Sender<UiEvent>>,
    next_request_id: AtomicU64,
    active_request: Mutex<Option<ActiveRequest>>,
    provider: Arc<dyn CompletionProvider>,
    render_requested: AtomicBool,
    stop_requested: AtomicBool,
}

impl RuntimeController {
    pub fn new(provider: Arc<dyn CompletionProvider>, events: Sender<UiEvent>) -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(events),
            next_request_id: AtomicU64::new(1),
            active_request: Mutex::new(None),
            provider,
            render_requested: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
        })
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Applies a provider event to `app` and releases the request slot on terminal events.
    pub fn apply_completion_event(&self, app: &mut App, event: CompletionEvent) {
        let request_id = event.request_id();
        let terminal = event.is_terminal();

        app.on_completion_event(event);

        if terminal {
            self.clear_active_request_if_matching(request_id);
        }
        self.render_requested.store(true, Ordering::Release);
    }

    /// Returns and clears the pending render flag.
    pub fn take_render_request(&self) -> bool {
        self.render_requested.swap(false, Ordering::AcqRel)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    pub fn active_request_id(&self) -> Option<RequestId> {
        self.lock_active_request()
            .as_ref()
            .map(|active| active.request_id)
    }

    /// Cancels the active request, if any, and waits for its worker to exit.
    pub fn shutdown(&self) {
        let active = self.lock_active_request().take();
        let Some(mut active) = active else {
            return;
        };

        active.cancel.store(true, Ordering::Release);
        if let Some(join_handle) = active.join_handle.take() {
            if join_handle.thread().id() != thread::current().id() {
                let _ = join_handle.join();
            }
        }
    }

    fn start_request_internal(self: &Arc<Self>, prompt: String) -> Result<RequestId, String> {
        let mut active_request = self.lock_active_request();
        if active_request.is_some() {
            return Err(ERROR_REQUEST_ALREADY_ACTIVE.to_string());
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let cancel = Arc::new(AtomicBool::new(false));
        let request = CompletionRequest { request_id, prompt };
        let join_handle = self.spawn_worker(request, Arc::clone(&cancel))?;

        *active_request = Some(ActiveRequest {
            request_id,
            cancel,
            join_handle: Some(join_handle),
        });

        Ok(request_id)
    }

    fn spawn_worker(
        self: &Arc<Self>,
        request: CompletionRequest,
        cancel: CancelSignal,
    ) -> Result<JoinHandle<()>, String> {
        let request_id = request.request_id;
        let controller = Arc::clone(self);
        thread::Builder::new()
            .name(format!("discuss-request-{request_id}"))
            .spawn(move || controller.run_worker(request, cancel))
            .map_err(|error| format!("Failed to spawn request worker: {error}"))
    }

    fn run_worker(self: Arc<Self>, request: CompletionRequest, cancel: CancelSignal) {
        let request_id = request.request_id;
        let profile = self.provider.profile();
        tracing::info!(
            request_id,
            provider = %profile.provider_id,
            model = %profile.model_id,
            "completion request started"
        );

        let terminal_emitted = AtomicBool::new(false);
        let controller = Arc::clone(&self);
        let provider = Arc::clone(&self.provider);

        let mut emit = |event: CompletionEvent| {
            if event.is_terminal() {
                terminal_emitted.store(true, Ordering::SeqCst);
            }
            controller.send_event(UiEvent::Completion(event));
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            provider.complete(request, Arc::clone(&cancel), &mut emit)
        }));

        let already_terminal = terminal_emitted.load(Ordering::SeqCst);
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) if !already_terminal => {
                tracing::warn!(request_id, %error, "provider returned an error");
                emit(CompletionEvent::Failed { request_id, error });
            }
            Ok(Err(error)) => {
                tracing::warn!(request_id, %error, "provider error after terminal event");
            }
            Err(_) if !already_terminal => {
                tracing::error!(request_id, "provider panicked");
                emit(CompletionEvent::Failed {
                    request_id,
                    error: "Completion provider panicked".to_string(),
                });
            }
            Err(_) => tracing::error!(request_id, "provider panicked after terminal event"),
        }

        if !terminal_emitted.load(Ordering::SeqCst) {
            emit(CompletionEvent::Failed {
                request_id,
                error: "Completion provider exited without a result".to_string(),
            });
        }
    }

    fn send_event(&self, event: UiEvent) {
        let sender = lock_unpoisoned(&self.events);
        if sender.send(event).is_err() {
            tracing::debug!("event channel closed; dropping completion event");
        }
    }

    fn clear_active_request_if_matching(&self, request_id: RequestId) {
        let mut active_request = self.lock_active_request();
        let matches = active_request.as_ref().map(|active| active.request_id) == Some(request_id);
        if !matches {
            return;
        }

        let Some(mut completed) = active_request.take() else {
            return;
        };

        if let Some(join_handle) = completed.join_handle.take() {
            let is_current_thread = join_handle.thread().id() == thread::current().id();
            if !is_current_thread && join_handle.is_finished() {
                let _ = join_handle.join();
            }
        }
    }

    fn cancel_request_internal(&self, request_id: RequestId) {
        let active_request = self.lock_active_request();
        if let Some(active) = active_request.as_ref() {
            if active.request_id == request_id {
                active.cancel.store(true, Ordering::Release);
            }
        }
    }

    fn lock_active_request(&self) -> MutexGuard<'_, Option<ActiveRequest>> {
        lock_unpoisoned(&self.active_request)
    }
}

impl HostOps for Arc<RuntimeController> {
    fn start_request(&mut self, prompt: String) -> Result<RequestId, String> {
        self.start_request_internal(prompt)
    }

    fn cancel_request(&mut self, request_id: RequestId) {
        self.cancel_request_internal(request_id);
    }

    fn request_render(&mut self) {
        self.render_requested.store(true, Ordering::Release);
    }

    fn request_stop(&mut self) {
        self.stop_requested.store(true, Ordering::Release);
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
