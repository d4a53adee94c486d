//! Boundary to the external memory backend.
//!
//! # Responsibility
//! - Define the request/response contract this frontend consumes.
//! - Carry the opaque error shape the transport hands back.
//!
//! # Invariants
//! - The backend owns persistence and search indexing; nothing here does.
//! - *Not-found* is recognized by matching the backend's file-missing error
//!   text. Fragile on purpose: it is the fallback path that treats a dangling
//!   link target as a brand-new note shell.

pub mod in_memory;

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::memory::{MemoryDetail, MemorySearchResult, MemorySummary};
use crate::model::wire::SaveMemoryPayload;

/// Payload-less push notification emitted when any memory changes,
/// including changes made by external agents through the tool interface.
pub const MEMORIES_CHANGED_EVENT: &str = "wikimem://memories-changed";

/// Monotonic tag attached to every issued backend call.
///
/// A continuation is applied only when its seq still equals the latest
/// issued for that slot; superseded responses are dropped on arrival.
pub type RequestSeq = u64;

pub type BackendResult<T> = Result<T, BackendError>;

/// Opaque backend failure.
///
/// The transport surfaces errors as plain strings, so this type keeps the
/// message and classifies it lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this failure means the requested memory does not exist.
    pub fn is_not_found(&self) -> bool {
        self.message
            .to_lowercase()
            .contains("no such file or directory")
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for BackendError {}

/// Request/response operations the backend exposes to this frontend.
///
/// All calls are asynchronous at the transport level with no ordering
/// guarantee between independently issued calls; hosts pump results back
/// into the controllers together with the [`RequestSeq`] they were issued
/// under.
pub trait MemoryBackend {
    /// Lists all memories as summaries.
    fn list_memories(&self) -> BackendResult<Vec<MemorySummary>>;
    /// Loads one memory; fails when the id does not exist.
    fn load_memory(&self, id: &str) -> BackendResult<MemoryDetail>;
    /// Creates or overwrites a memory and echoes the authoritative copy,
    /// with the id assigned when the payload carried none.
    fn save_memory(&mut self, payload: SaveMemoryPayload) -> BackendResult<MemoryDetail>;
    /// Deletes a memory; deleting an unknown id is not an error.
    fn delete_memory(&mut self, id: &str) -> BackendResult<()>;
    /// Ranked full-text search with snippets. Blank queries return nothing.
    fn search_memories(&self, query: &str) -> BackendResult<Vec<MemorySearchResult>>;
}
