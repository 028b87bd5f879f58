use std::fmt;

use time::macros::format_description;
use time::OffsetDateTime;

/// Sidebar label for a session without entries.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Titles longer than this many characters are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 50;

const TITLE_ELLIPSIS: &str = "...";

/// Current wall clock time in the local offset, falling back to UTC when the offset cannot be
/// determined (for example in multi-threaded processes on some platforms).
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Creation timestamp in Unix milliseconds. Strictly increasing within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(i64);

impl SessionId {
    pub(crate) fn from_time(at: OffsetDateTime) -> Self {
        Self((at.unix_timestamp_nanos() / 1_000_000) as i64)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One request/response pair. Fields are private so an appended entry cannot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    request_text: String,
    response_text: String,
    created_at: OffsetDateTime,
}

impl Entry {
    pub fn new(
        request_text: impl Into<String>,
        response_text: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            request_text: request_text.into(),
            response_text: response_text.into(),
            created_at,
        }
    }

    pub fn request_text(&self) -> &str {
        &self.request_text
    }

    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// `HH:MM` in the entry's own offset.
    pub fn time_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.created_at.hour(),
            self.created_at.minute()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    created_at: OffsetDateTime,
    transcript: Vec<Entry>,
}

impl Session {
    pub(crate) fn new(id: SessionId, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            created_at,
            transcript: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: Entry) -> usize {
        self.transcript.push(entry);
        self.transcript.len()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn transcript(&self) -> &[Entry] {
        &self.transcript
    }

    /// First request text with whitespace runs collapsed, cut to [`TITLE_MAX_CHARS`] characters
    /// plus `...`, or [`NEW_CHAT_TITLE`] while the transcript is empty.
    pub fn title(&self) -> String {
        let Some(first) = self.transcript.first() else {
            return NEW_CHAT_TITLE.to_string();
        };
        let collapsed = first
            .request_text()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if collapsed.chars().count() > TITLE_MAX_CHARS {
            let cut: String = collapsed.chars().take(TITLE_MAX_CHARS).collect();
            format!("{cut}{TITLE_ELLIPSIS}")
        } else {
            collapsed
        }
    }

    /// Creation date such as `October 06, 2026`.
    pub fn created_label(&self) -> String {
        let format = format_description!("[month repr:long] [day padding:zero], [year]");
        self.created_at
            .format(&format)
            .unwrap_or_else(|_| self.created_at.date().to_string())
    }
}

/// One sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub created_label: String,
    pub entry_count: usize,
    pub active: bool,
}
