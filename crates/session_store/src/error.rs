use thiserror::Error;

use crate::schema::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    #[error("unknown session id {id}")]
    UnknownSession { id: SessionId },

    #[error("session number {index} is out of range (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },
}
