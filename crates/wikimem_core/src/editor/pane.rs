//! One open note's draft lifecycle: load, edit, autosave, close.
//!
//! # Responsibility
//! - Drive `Loading -> Ready <-> Saving -> Closed` for a single pane.
//! - Debounce content changes into save calls and reconcile the backend echo.
//!
//! # Invariants
//! - Save responses are applied latest-wins; a superseded echo is dropped.
//! - A pane without a persisted id never saves trivial (blank) content, and
//!   closing it before the first save performs no backend call at all.
//! - A pending autosave timer is cleared at teardown, after a synchronous
//!   flush of the latest content for persisted notes.

use log::{debug, info};

use crate::backend::{BackendResult, RequestSeq};
use crate::model::memory::{
    derive_title_from_markdown, unix_now_secs, MemoryDetail, MemoryId, MemorySummary,
    DEFAULT_TITLE,
};
use crate::model::wire::SaveMemoryPayload;

/// Quiet period between the last keystroke and the autosave call.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLifecycle {
    Loading,
    Ready,
    Saving,
    Closed,
}

/// Backend call the host should issue for this pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneCommand {
    Load { seq: RequestSeq, id: MemoryId },
    Save { seq: RequestSeq, payload: SaveMemoryPayload },
    Delete { seq: RequestSeq, id: MemoryId },
}

/// Change the host must reflect in the surrounding workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneEvent {
    /// Derived title changed; pane label updates live, independent of saves.
    TitleChanged(String),
    /// The backend confirmed a save; the echoed copy is authoritative.
    Persisted(MemoryDetail),
}

/// Controller for one open note pane.
#[derive(Debug)]
pub struct EditorPaneController {
    pane_id: String,
    memory_id: Option<MemoryId>,
    lifecycle: PaneLifecycle,
    draft: String,
    last_saved_body: String,
    derived_title: String,
    error: Option<String>,
    autosave_deadline: Option<u64>,
    next_seq: RequestSeq,
    pending_load: Option<RequestSeq>,
    /// Latest issued save and the body snapshot it carried.
    pending_save: Option<(RequestSeq, String)>,
}

impl EditorPaneController {
    /// Opens a pane over an existing memory id.
    ///
    /// When `initial` already holds the matching detail (e.g. the pane that
    /// created the note), the pane is ready immediately; otherwise a load is
    /// issued.
    pub fn open_existing(
        pane_id: impl Into<String>,
        memory_id: impl Into<MemoryId>,
        initial: Option<MemoryDetail>,
    ) -> (Self, Option<PaneCommand>) {
        let memory_id = memory_id.into();
        let mut pane = Self::blank(pane_id.into());

        if let Some(detail) = initial.filter(|detail| detail.id == memory_id) {
            pane.adopt_detail(&detail);
            pane.draft = detail.body;
            pane.lifecycle = PaneLifecycle::Ready;
            return (pane, None);
        }

        pane.memory_id = Some(memory_id.clone());
        pane.derived_title = memory_id.clone();
        pane.lifecycle = PaneLifecycle::Loading;
        pane.next_seq += 1;
        let seq = pane.next_seq;
        pane.pending_load = Some(seq);
        (
            pane,
            Some(PaneCommand::Load {
                seq,
                id: memory_id,
            }),
        )
    }

    /// Opens a placeholder pane with no backend identity yet.
    pub fn open_placeholder(pane_id: impl Into<String>) -> Self {
        let mut pane = Self::blank(pane_id.into());
        pane.lifecycle = PaneLifecycle::Ready;
        pane
    }

    fn blank(pane_id: String) -> Self {
        Self {
            pane_id,
            memory_id: None,
            lifecycle: PaneLifecycle::Loading,
            draft: String::new(),
            last_saved_body: String::new(),
            derived_title: DEFAULT_TITLE.to_string(),
            error: None,
            autosave_deadline: None,
            next_seq: 0,
            pending_load: None,
            pending_save: None,
        }
    }

    fn adopt_detail(&mut self, detail: &MemoryDetail) {
        self.memory_id = Some(detail.id.clone());
        self.last_saved_body = detail.body.clone();
        self.derived_title = detail.title.clone();
    }

    /// Applies a finished load call.
    pub fn handle_load_result(
        &mut self,
        seq: RequestSeq,
        result: BackendResult<MemoryDetail>,
    ) -> Vec<PaneEvent> {
        if self.pending_load != Some(seq) {
            debug!("event=load_stale_drop module=editor pane={} seq={seq}", self.pane_id);
            return Vec::new();
        }
        self.pending_load = None;
        if self.lifecycle == PaneLifecycle::Loading {
            self.lifecycle = PaneLifecycle::Ready;
        }

        match result {
            Ok(detail) => {
                self.adopt_detail(&detail);
                self.draft = detail.body;
                self.error = None;
                vec![PaneEvent::TitleChanged(self.derived_title.clone())]
            }
            Err(err) if err.is_not_found() => {
                // Dangling link target: seed a new note shell titled by the
                // id, without surfacing an error.
                let id = self.memory_id.clone().unwrap_or_default();
                info!("event=load_not_found_seed module=editor pane={} id={id}", self.pane_id);
                self.draft = format!("# {id}\n\n");
                self.last_saved_body = String::new();
                self.derived_title = derive_title_from_markdown(&self.draft);
                self.error = None;
                vec![PaneEvent::TitleChanged(self.derived_title.clone())]
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                Vec::new()
            }
        }
    }

    /// Records an edited draft and restarts the autosave window.
    pub fn content_changed(&mut self, markdown: &str, now_ms: u64) -> Vec<PaneEvent> {
        if matches!(self.lifecycle, PaneLifecycle::Closed | PaneLifecycle::Loading) {
            return Vec::new();
        }

        self.draft = markdown.to_string();
        self.autosave_deadline = Some(now_ms + AUTOSAVE_DEBOUNCE_MS);

        let title = derive_title_from_markdown(&self.draft);
        if title != self.derived_title {
            self.derived_title = title.clone();
            return vec![PaneEvent::TitleChanged(title)];
        }
        Vec::new()
    }

    /// Fires the autosave timer when its deadline has passed.
    pub fn tick(&mut self, now_ms: u64) -> Option<PaneCommand> {
        match self.autosave_deadline {
            Some(deadline) if deadline <= now_ms => {
                self.autosave_deadline = None;
                self.issue_save()
            }
            _ => None,
        }
    }

    /// Immediate save, bypassing the debounce window.
    pub fn save_now(&mut self) -> Option<PaneCommand> {
        self.autosave_deadline = None;
        self.issue_save()
    }

    fn issue_save(&mut self) -> Option<PaneCommand> {
        if !self.is_dirty() || !self.can_persist() {
            return None;
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending_save = Some((seq, self.draft.clone()));
        if self.lifecycle == PaneLifecycle::Ready {
            self.lifecycle = PaneLifecycle::Saving;
        }
        debug!(
            "event=save_issue module=editor pane={} seq={seq} has_id={}",
            self.pane_id,
            self.memory_id.is_some()
        );
        Some(PaneCommand::Save {
            seq,
            payload: SaveMemoryPayload {
                id: self.memory_id.clone(),
                title: self.derived_title.clone(),
                body: self.draft.clone(),
            },
        })
    }

    /// Applies a finished save call. Superseded echoes are dropped.
    pub fn handle_save_result(
        &mut self,
        seq: RequestSeq,
        result: BackendResult<MemoryDetail>,
    ) -> Vec<PaneEvent> {
        let Some((latest, sent_body)) = self.pending_save.clone() else {
            return Vec::new();
        };
        if latest != seq {
            debug!("event=save_stale_drop module=editor pane={} seq={seq}", self.pane_id);
            return Vec::new();
        }
        self.pending_save = None;
        if self.lifecycle == PaneLifecycle::Saving {
            self.lifecycle = PaneLifecycle::Ready;
        }

        match result {
            Ok(detail) => {
                let mut events = Vec::new();
                self.error = None;
                // First successful save promotes the placeholder: the
                // assigned id is canonical from here on.
                self.memory_id = Some(detail.id.clone());
                self.last_saved_body = detail.body.clone();
                if self.draft == sent_body {
                    // No newer keystrokes: adopt the echo wholesale.
                    self.draft = detail.body.clone();
                    if self.derived_title != detail.title {
                        self.derived_title = detail.title.clone();
                        events.push(PaneEvent::TitleChanged(detail.title.clone()));
                    }
                }
                events.push(PaneEvent::Persisted(detail));
                events
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                Vec::new()
            }
        }
    }

    /// Requests deletion of the pane's note.
    ///
    /// A placeholder with no id just closes; nothing was ever created.
    pub fn request_delete(&mut self) -> Option<PaneCommand> {
        self.autosave_deadline = None;
        match self.memory_id.clone() {
            Some(id) => {
                self.next_seq += 1;
                Some(PaneCommand::Delete {
                    seq: self.next_seq,
                    id,
                })
            }
            None => {
                self.lifecycle = PaneLifecycle::Closed;
                None
            }
        }
    }

    /// Applies a finished delete call. Returns whether the pane closed.
    pub fn handle_delete_result(&mut self, result: BackendResult<()>) -> bool {
        match result {
            Ok(()) => {
                self.lifecycle = PaneLifecycle::Closed;
                true
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                false
            }
        }
    }

    /// Tears the pane down, flushing unsaved content for persisted notes.
    pub fn close(&mut self) -> Option<PaneCommand> {
        if self.lifecycle == PaneLifecycle::Closed {
            return None;
        }
        self.lifecycle = PaneLifecycle::Closed;
        self.autosave_deadline = None;
        // Never-saved placeholders must not create an orphan record.
        if self.memory_id.is_none() {
            return None;
        }
        if self.is_dirty() {
            return self.issue_save();
        }
        None
    }

    /// Resolves an id against this pane, so a note can display its own
    /// live title before the first save completes.
    pub fn resolve_self(&self, id: &str) -> Option<MemorySummary> {
        let trimmed = id.trim();
        if trimmed.is_empty() || self.memory_id.as_deref() != Some(trimmed) {
            return None;
        }
        Some(MemorySummary {
            id: trimmed.to_string(),
            title: self.derived_title.clone(),
            updated_at: unix_now_secs(),
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.last_saved_body
    }

    /// Placeholder panes skip persisting until content is non-trivial.
    fn can_persist(&self) -> bool {
        self.memory_id.is_some() || !self.draft.trim().is_empty()
    }

    /// Whether a manual save would do anything right now.
    pub fn can_save(&self) -> bool {
        self.is_dirty() && self.can_persist()
    }

    pub fn pane_id(&self) -> &str {
        &self.pane_id
    }

    pub fn memory_id(&self) -> Option<&str> {
        self.memory_id.as_deref()
    }

    pub fn lifecycle(&self) -> PaneLifecycle {
        self.lifecycle
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn title(&self) -> &str {
        &self.derived_title
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismisses the inline error banner.
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
