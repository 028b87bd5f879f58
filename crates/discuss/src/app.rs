use completion_provider::CompletionEvent;
use discuss_tui::{EnvConfig, Viewport};
use session_store::{now, Entry, SessionId, SessionStore};

use crate::commands::{parse_slash_command, SlashCommand, HELP_TEXT};

pub use completion_provider::RequestId;

/// Lifecycle of the single in-flight completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending {
        request_id: RequestId,
        prompt: String,
        /// Session that was active at submit time; the reply lands here.
        session_id: SessionId,
    },
    Failed {
        error: String,
    },
}

pub trait HostOps {
    fn start_request(&mut self, prompt: String) -> Result<RequestId, String>;
    fn cancel_request(&mut self, request_id: RequestId);
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

pub const ERROR_REQUEST_ALREADY_ACTIVE: &str = "Request already active";
const NOTICE_BUSY: &str = "A reply is still loading. Use /cancel to stop it.";
const NOTICE_CANCELLING: &str = "Cancelling the previous request, please wait.";
const NOTICE_SELECT_USAGE: &str = "Usage: /select <n>, where n is a number from /sessions";

/// Application state: sessions, composer input, viewport choice and request lifecycle.
#[derive(Debug)]
pub struct App {
    pub store: SessionStore,
    pub input: String,
    pub request: RequestState,
    pub viewport_override: Option<Viewport>,
    pub should_exit: bool,
    notices: Vec<String>,
    show_sidebar: bool,
    retry_prompt: Option<String>,
    cancelling: Option<RequestId>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Starts with one empty session, like opening the page.
    pub fn new() -> Self {
        Self::with_store(SessionStore::new())
    }

    pub fn with_store(mut store: SessionStore) -> Self {
        store.ensure_session();
        Self {
            store,
            input: String::new(),
            request: RequestState::Idle,
            viewport_override: None,
            should_exit: false,
            notices: Vec::new(),
            show_sidebar: false,
            retry_prompt: None,
            cancelling: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Pending { .. })
    }

    /// Session the pending reply belongs to, if any.
    pub fn loading_session(&self) -> Option<SessionId> {
        match &self.request {
            RequestState::Pending { session_id, .. } => Some(*session_id),
            _ => None,
        }
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        match &self.request {
            RequestState::Pending { prompt, .. } => Some(prompt),
            _ => None,
        }
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancelling.is_some()
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn show_sidebar(&self) -> bool {
        self.show_sidebar
    }

    pub fn retry_prompt(&self) -> Option<&str> {
        self.retry_prompt.as_deref()
    }

    /// Viewport for a terminal `columns` wide; `/narrow` and `/wide` win over the environment.
    pub fn viewport(&self, columns: usize, config: &EnvConfig) -> Viewport {
        self.viewport_override
            .unwrap_or_else(|| config.viewport_for(columns))
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    pub fn on_input_replace(&mut self, text: String) {
        self.input = text;
    }

    /// Handles one line typed at the prompt.
    ///
    /// Commands other than `/new` leave the input buffer alone, so a restored prompt survives
    /// `/help` and friends. An empty line submits whatever the buffer holds.
    pub fn on_line(&mut self, line: &str, host: &mut dyn HostOps) {
        self.notices.clear();
        self.show_sidebar = false;

        let line = line.trim();
        if line.is_empty() {
            self.on_submit(host);
            return;
        }

        if let Some(command) = parse_slash_command(line) {
            self.on_command(command, host);
            return;
        }

        self.on_input_replace(line.to_string());
        self.on_submit(host);
    }

    pub fn on_submit(&mut self, host: &mut dyn HostOps) {
        let submitted = std::mem::take(&mut self.input);
        let prompt = submitted.trim().to_string();

        if prompt.is_empty() {
            host.request_render();
            return;
        }

        if let Some(command) = parse_slash_command(&prompt) {
            self.on_command(command, host);
            return;
        }

        self.submit_prompt(prompt, host);
        host.request_render();
    }

    fn on_command(&mut self, command: SlashCommand, host: &mut dyn HostOps) {
        match command {
            SlashCommand::New => {
                // A fresh chat starts with an empty composer.
                self.input.clear();
                self.retry_prompt = None;
                let id = self.store.create_session();
                tracing::info!(session_id = %id, "new chat");
            }
            SlashCommand::Sessions => self.show_sidebar = true,
            SlashCommand::Select(Some(index)) => {
                if let Err(error) = self.store.select_index(index) {
                    self.push_notice(error.to_string());
                }
            }
            SlashCommand::Select(None) => self.push_notice(NOTICE_SELECT_USAGE),
            SlashCommand::Narrow => self.viewport_override = Some(Viewport::Narrow),
            SlashCommand::Wide => self.viewport_override = Some(Viewport::Wide),
            SlashCommand::Retry => self.on_retry(host),
            SlashCommand::Cancel => {
                self.on_cancel(host);
                return;
            }
            SlashCommand::Help => self.push_notice(HELP_TEXT),
            SlashCommand::Quit => {
                self.on_quit(host);
                return;
            }
            SlashCommand::Unknown(command) => {
                self.push_notice(format!("Unknown command: {command}"));
            }
        }

        host.request_render();
    }

    fn on_retry(&mut self, host: &mut dyn HostOps) {
        let Some(prompt) = self.retry_prompt.clone() else {
            self.push_notice("Nothing to retry");
            return;
        };

        if self.input == prompt {
            self.input.clear();
        }
        self.submit_prompt(prompt, host);
    }

    fn submit_prompt(&mut self, prompt: String, host: &mut dyn HostOps) {
        if self.is_loading() {
            self.input = prompt;
            self.push_notice(NOTICE_BUSY);
            return;
        }

        if self.cancelling.is_some() {
            self.input = prompt;
            self.push_notice(NOTICE_CANCELLING);
            return;
        }

        let session_id = self.store.ensure_session();
        match host.start_request(prompt.clone()) {
            Ok(request_id) => {
                tracing::debug!(request_id, session_id = %session_id, "request started");
                self.retry_prompt = None;
                self.request = RequestState::Pending {
                    request_id,
                    prompt,
                    session_id,
                };
            }
            Err(error) if error == ERROR_REQUEST_ALREADY_ACTIVE => {
                self.input = prompt;
                self.push_notice(NOTICE_BUSY);
            }
            Err(error) => {
                tracing::warn!(%error, "failed to start request");
                self.fail_with(prompt, format!("Failed to start request: {error}"));
            }
        }
    }

    pub fn on_cancel(&mut self, host: &mut dyn HostOps) {
        let pending = match &self.request {
            RequestState::Pending {
                request_id, prompt, ..
            } => Some((*request_id, prompt.clone())),
            _ => None,
        };

        match pending {
            Some((request_id, prompt)) => {
                tracing::info!(request_id, "request cancelled");
                self.cancelling = Some(request_id);
                self.request = RequestState::Idle;
                self.restore_prompt(prompt);
                self.push_notice("Request cancelled");
                host.cancel_request(request_id);
            }
            None => self.push_notice("No request in flight"),
        }

        host.request_render();
    }

    pub fn on_quit(&mut self, host: &mut dyn HostOps) {
        if let RequestState::Pending { request_id, .. } = self.request {
            host.cancel_request(request_id);
        }
        self.should_exit = true;
        host.request_stop();
        host.request_render();
    }

    /// Applies one provider event. Events for anything but the pending request are dropped.
    pub fn on_completion_event(&mut self, event: CompletionEvent) {
        let request_id = event.request_id();

        if event.is_terminal() && self.cancelling == Some(request_id) {
            tracing::debug!(request_id, "discarding outcome of cancelled request");
            self.cancelling = None;
            return;
        }

        if !self.is_pending_request(request_id) {
            tracing::debug!(request_id, "ignoring event for stale request");
            return;
        }

        match event {
            CompletionEvent::Started { .. } => {}
            CompletionEvent::Completed { text, .. } => self.on_completed(text),
            CompletionEvent::Failed { error, .. } => {
                tracing::warn!(request_id, %error, "completion failed");
                if let Some(prompt) = self.take_pending_prompt() {
                    self.fail_with(prompt, format!("Request failed: {error}"));
                }
                self.request = RequestState::Failed { error };
            }
            CompletionEvent::Cancelled { .. } => {
                if let Some(prompt) = self.take_pending_prompt() {
                    self.restore_prompt(prompt);
                }
                self.request = RequestState::Idle;
                self.push_notice("Request cancelled");
            }
        }
    }

    fn on_completed(&mut self, text: String) {
        let RequestState::Pending {
            prompt, session_id, ..
        } = std::mem::replace(&mut self.request, RequestState::Idle)
        else {
            return;
        };

        let entry = Entry::new(prompt, text, now());
        if let Err(error) = self.store.append_entry(session_id, entry) {
            tracing::warn!(%error, "reply could not be stored");
            self.push_notice(error.to_string());
        }
    }

    fn take_pending_prompt(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.request, RequestState::Idle) {
            RequestState::Pending { prompt, .. } => Some(prompt),
            _ => None,
        }
    }

    fn fail_with(&mut self, prompt: String, notice: String) {
        self.request = RequestState::Failed {
            error: notice.clone(),
        };
        self.restore_prompt(prompt);
        self.push_notice(notice);
    }

    /// Puts `prompt` back in the composer unless the user already typed something else.
    fn restore_prompt(&mut self, prompt: String) {
        if self.input.trim().is_empty() {
            self.input = prompt.clone();
        }
        self.retry_prompt = Some(prompt);
    }

    fn is_pending_request(&self, request_id: RequestId) -> bool {
        matches!(self.request, RequestState::Pending { request_id: active, .. } if active == request_id)
    }
}
