mod error;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use schema::{now, Entry, Session, SessionId, SessionSummary, NEW_CHAT_TITLE, TITLE_MAX_CHARS};
pub use store::SessionStore;
