//! Workspace pane orchestration.
//!
//! # Responsibility
//! - Own the ordered list of open note panes plus the fixed overview pane.
//! - Coordinate opening, placeholder promotion, and closing.
//!
//! # Invariants
//! - Dedup key is the memory id: opening an already-open note replaces that
//!   pane's config in place, position preserved.
//! - Promotion (placeholder -> real id) keeps the pane's position and closes
//!   any other pane already showing that id.
//! - Closing a placeholder before its first save deletes nothing.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::debug;
use uuid::Uuid;

use crate::model::memory::{MemoryDetail, MemoryId, MemorySummary, DEFAULT_TITLE};

/// Id of the fixed list/search pane shown in the card variant.
pub const OVERVIEW_PANE_ID: &str = "memories-overview";

/// How the workspace is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceVariant {
    /// Overview pane first, note panes after it.
    #[default]
    Card,
    /// Full-screen single-note embedding; the overview pane is suppressed.
    Full,
}

/// Workspace-owned config for one note pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneConfig {
    pub pane_id: String,
    /// `None` until the first save promotes the placeholder.
    pub memory_id: Option<MemoryId>,
    pub title: String,
    /// Preloaded detail handed to the pane controller on mount.
    pub initial_detail: Option<MemoryDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    PaneNotFound(String),
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaneNotFound(pane_id) => write!(f, "pane not found: {pane_id}"),
        }
    }
}

impl Error for WorkspaceError {}

fn memory_pane_id(id: &str) -> String {
    format!("memory-{id}")
}

/// Owner of the ordered pane collection.
#[derive(Debug, Default)]
pub struct WorkspaceOrchestrator {
    panes: Vec<PaneConfig>,
    variant: WorkspaceVariant,
    creating: bool,
}

impl WorkspaceOrchestrator {
    pub fn new(variant: WorkspaceVariant) -> Self {
        Self {
            panes: Vec::new(),
            variant,
            creating: false,
        }
    }

    pub fn variant(&self) -> WorkspaceVariant {
        self.variant
    }

    pub fn overview_visible(&self) -> bool {
        self.variant == WorkspaceVariant::Card
    }

    /// Note panes in display order (overview pane excluded).
    pub fn panes(&self) -> &[PaneConfig] {
        &self.panes
    }

    /// All pane ids in display order, overview first when visible.
    pub fn pane_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.panes.len() + 1);
        if self.overview_visible() {
            ids.push(OVERVIEW_PANE_ID.to_string());
        }
        ids.extend(self.panes.iter().map(|pane| pane.pane_id.clone()));
        ids
    }

    pub fn has_open(&self, memory_id: &str) -> bool {
        self.panes
            .iter()
            .any(|pane| pane.memory_id.as_deref() == Some(memory_id))
    }

    /// Opens a note, deduplicated by memory id.
    ///
    /// An already-open note has its config replaced in place; a new one is
    /// appended at the end.
    pub fn open_memory(
        &mut self,
        summary: &MemorySummary,
        detail: Option<MemoryDetail>,
    ) -> &PaneConfig {
        if let Some(position) = self
            .panes
            .iter()
            .position(|pane| pane.memory_id.as_deref() == Some(summary.id.as_str()))
        {
            let pane = &mut self.panes[position];
            pane.title = summary.title.clone();
            pane.initial_detail = detail;
            return &self.panes[position];
        }

        self.panes.push(PaneConfig {
            pane_id: memory_pane_id(&summary.id),
            memory_id: Some(summary.id.clone()),
            title: summary.title.clone(),
            initial_detail: detail,
        });
        self.panes.last().expect("pane was just pushed")
    }

    /// Opens a placeholder pane with a synthetic local id.
    pub fn open_placeholder(&mut self) -> &PaneConfig {
        self.panes.push(PaneConfig {
            pane_id: format!("memory-new-{}", Uuid::new_v4()),
            memory_id: None,
            title: DEFAULT_TITLE.to_string(),
            initial_detail: None,
        });
        self.panes.last().expect("pane was just pushed")
    }

    /// Marks an eager-create request in flight. Returns `false` when one is
    /// already running, so double-clicks create exactly one note.
    pub fn begin_create(&mut self) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        true
    }

    pub fn finish_create(&mut self) {
        self.creating = false;
    }

    pub fn update_title(&mut self, pane_id: &str, title: &str) {
        if let Some(pane) = self.panes.iter_mut().find(|pane| pane.pane_id == pane_id) {
            pane.title = title.to_string();
        }
    }

    /// Promotes a placeholder to its backend-assigned identity.
    ///
    /// The pane keeps its position; any other pane already representing the
    /// assigned id is closed so exactly one pane shows it.
    pub fn promote_pane(
        &mut self,
        pane_id: &str,
        detail: &MemoryDetail,
    ) -> Result<(), WorkspaceError> {
        if !self.panes.iter().any(|pane| pane.pane_id == pane_id) {
            return Err(WorkspaceError::PaneNotFound(pane_id.to_string()));
        }

        let promoted_pane_id = memory_pane_id(&detail.id);
        self.panes.retain(|pane| {
            pane.pane_id == pane_id
                || (pane.pane_id != promoted_pane_id
                    && pane.memory_id.as_deref() != Some(detail.id.as_str()))
        });

        let pane = self
            .panes
            .iter_mut()
            .find(|pane| pane.pane_id == pane_id)
            .ok_or_else(|| WorkspaceError::PaneNotFound(pane_id.to_string()))?;
        debug!(
            "event=pane_promote module=workspace pane={pane_id} id={}",
            detail.id
        );
        pane.pane_id = promoted_pane_id;
        pane.memory_id = Some(detail.id.clone());
        pane.title = detail.title.clone();
        pane.initial_detail = Some(detail.clone());
        Ok(())
    }

    /// Refreshes the pane showing `detail.id` after a confirmed save.
    pub fn apply_persisted(&mut self, detail: &MemoryDetail) {
        if let Some(pane) = self
            .panes
            .iter_mut()
            .find(|pane| pane.memory_id.as_deref() == Some(detail.id.as_str()))
        {
            pane.title = detail.title.clone();
            pane.initial_detail = Some(detail.clone());
        }
    }

    /// Removes a pane. Returns whether anything was removed.
    pub fn close_pane(&mut self, pane_id: &str) -> bool {
        let before = self.panes.len();
        self.panes.retain(|pane| pane.pane_id != pane_id);
        self.panes.len() != before
    }

    /// Closes the pane behind an externally deleted note.
    ///
    /// Returns the closed pane's id so the host can drop its controller.
    pub fn memory_deleted(&mut self, memory_id: &str) -> Option<String> {
        let position = self
            .panes
            .iter()
            .position(|pane| pane.memory_id.as_deref() == Some(memory_id))?;
        let pane = self.panes.remove(position);
        debug!("event=pane_close_deleted module=workspace id={memory_id}");
        Some(pane.pane_id)
    }
}
