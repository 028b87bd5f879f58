use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::schema::{now, Entry, Session, SessionId, SessionSummary, NEW_CHAT_TITLE};

/// Ordered in-memory sessions plus the active-session pointer.
///
/// Once any session exists the active pointer always names one of them. Sessions are never
/// removed and transcripts only grow.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active: Option<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&mut self) -> SessionId {
        self.create_session_at(now())
    }

    /// Creates an empty session stamped `created_at` and makes it active. If the clock has not
    /// moved past the newest id the new id is bumped so ids stay strictly increasing.
    pub fn create_session_at(&mut self, created_at: OffsetDateTime) -> SessionId {
        let mut id = SessionId::from_time(created_at);
        if let Some(last) = self.sessions.last().map(Session::id) {
            if id <= last {
                id = last.next();
            }
        }
        self.sessions.push(Session::new(id, created_at));
        self.active = Some(id);
        tracing::debug!(session_id = %id, "session created");
        id
    }

    /// Returns the active session id, creating the first session when the store is empty.
    pub fn ensure_session(&mut self) -> SessionId {
        match self.active {
            Some(id) => id,
            None => self.create_session(),
        }
    }

    pub fn select_session(&mut self, id: SessionId) -> Result<(), SessionStoreError> {
        if self.session(id).is_none() {
            return Err(SessionStoreError::UnknownSession { id });
        }
        self.active = Some(id);
        tracing::debug!(session_id = %id, "session selected");
        Ok(())
    }

    /// Selects by 1-based position in creation order, as listed in the sidebar.
    pub fn select_index(&mut self, index: usize) -> Result<SessionId, SessionStoreError> {
        let id = index
            .checked_sub(1)
            .and_then(|idx| self.sessions.get(idx))
            .map(Session::id)
            .ok_or(SessionStoreError::IndexOutOfRange {
                index,
                len: self.sessions.len(),
            })?;
        self.select_session(id)?;
        Ok(id)
    }

    /// Appends `entry` to the session `session_id` and returns the new transcript length.
    /// Unknown ids leave every transcript untouched.
    pub fn append_entry(
        &mut self,
        session_id: SessionId,
        entry: Entry,
    ) -> Result<usize, SessionStoreError> {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id() == session_id) else {
            tracing::warn!(session_id = %session_id, "dropping entry for unknown session");
            return Err(SessionStoreError::UnknownSession { id: session_id });
        };
        Ok(session.push(entry))
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|session| SessionSummary {
                id: session.id(),
                title: session.title(),
                created_label: session.created_label(),
                entry_count: session.transcript().len(),
                active: Some(session.id()) == self.active,
            })
            .collect()
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.and_then(|id| self.session(id))
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id() == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Window or tab title for the active session.
    pub fn tab_title(&self) -> String {
        self.active_session()
            .map(Session::title)
            .unwrap_or_else(|| NEW_CHAT_TITLE.to_string())
    }
}
