//! In-process reference backend.
//!
//! # Responsibility
//! - Mirror the real backend's observable contract for tests and the CLI
//!   probe: id assignment, body seeding, title extraction, substring search
//!   with snippets, recency ordering, and the not-found error text.
//!
//! # Invariants
//! - Iteration order is deterministic (`BTreeMap` keyed by id).
//! - `updated_at` comes from the controllable clock, never wall time.

use std::collections::BTreeMap;

use crate::backend::{BackendError, BackendResult, MemoryBackend};
use crate::model::memory::{
    derive_title_from_markdown, MemoryDetail, MemorySearchResult, MemorySummary, DEFAULT_TITLE,
};
use crate::model::wire::SaveMemoryPayload;

const SNIPPET_MAX_CHARS: usize = 80;

#[derive(Debug, Clone)]
struct StoredMemory {
    body: String,
    updated_at: i64,
}

/// Deterministic stand-in for the external memory store.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    memories: BTreeMap<String, StoredMemory>,
    next_id: u64,
    clock_secs: i64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock used to stamp subsequent writes.
    pub fn set_clock(&mut self, secs: i64) {
        self.clock_secs = secs;
    }

    pub fn advance_clock(&mut self, secs: i64) {
        self.clock_secs += secs;
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.memories.contains_key(id)
    }

    fn assign_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("m-{}", self.next_id);
            if !self.memories.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn summary_of(&self, id: &str, stored: &StoredMemory) -> MemorySummary {
        MemorySummary {
            id: id.to_string(),
            title: derive_title_from_markdown(&stored.body),
            updated_at: stored.updated_at,
        }
    }
}

impl MemoryBackend for InMemoryBackend {
    fn list_memories(&self) -> BackendResult<Vec<MemorySummary>> {
        let mut summaries: Vec<MemorySummary> = self
            .memories
            .iter()
            .map(|(id, stored)| self.summary_of(id, stored))
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(summaries)
    }

    fn load_memory(&self, id: &str) -> BackendResult<MemoryDetail> {
        let stored = self
            .memories
            .get(id)
            .ok_or_else(|| BackendError::new(format!("no such file or directory: {id}.md")))?;
        Ok(MemoryDetail {
            id: id.to_string(),
            title: derive_title_from_markdown(&stored.body),
            updated_at: stored.updated_at,
            body: stored.body.clone(),
        })
    }

    fn save_memory(&mut self, payload: SaveMemoryPayload) -> BackendResult<MemoryDetail> {
        let SaveMemoryPayload { id, title, body } = payload;
        let resolved_title = match title.trim() {
            "" => DEFAULT_TITLE.to_string(),
            trimmed => trimmed.to_string(),
        };
        let body = if body.trim().is_empty() {
            format!("# {resolved_title}\n\n")
        } else {
            body
        };

        let id = id.unwrap_or_else(|| self.assign_id());
        let updated_at = self.clock_secs;
        self.memories.insert(
            id.clone(),
            StoredMemory {
                body: body.clone(),
                updated_at,
            },
        );

        Ok(MemoryDetail {
            title: derive_title_from_markdown(&body),
            id,
            updated_at,
            body,
        })
    }

    fn delete_memory(&mut self, id: &str) -> BackendResult<()> {
        self.memories.remove(id);
        Ok(())
    }

    fn search_memories(&self, query: &str) -> BackendResult<Vec<MemorySearchResult>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();
        for (id, stored) in &self.memories {
            let title = derive_title_from_markdown(&stored.body);
            let title_match = title.to_lowercase().contains(&needle);
            let body_match = !title_match && stored.body.to_lowercase().contains(&needle);
            if !(title_match || body_match) {
                continue;
            }

            let snippet = if title_match {
                ellipsize(&title)
            } else {
                snippet_around(&stored.body, &needle)
            };
            hits.push(MemorySearchResult {
                id: id.clone(),
                title,
                updated_at: stored.updated_at,
                snippet,
            });
        }

        hits.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(hits)
    }
}

fn ellipsize(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
    if text.chars().count() > SNIPPET_MAX_CHARS {
        out.push('…');
    }
    out
}

/// First body line containing the needle, trimmed and capped.
fn snippet_around(body: &str, needle: &str) -> String {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && line.to_lowercase().contains(needle))
        .map(ellipsize)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::InMemoryBackend;
    use crate::backend::MemoryBackend;
    use crate::model::wire::SaveMemoryPayload;

    fn save(backend: &mut InMemoryBackend, id: Option<&str>, title: &str, body: &str) -> String {
        backend
            .save_memory(SaveMemoryPayload {
                id: id.map(str::to_string),
                title: title.to_string(),
                body: body.to_string(),
            })
            .expect("save should succeed")
            .id
    }

    #[test]
    fn save_without_id_assigns_one_and_seeds_blank_bodies() {
        let mut backend = InMemoryBackend::new();
        backend.set_clock(100);
        let id = save(&mut backend, None, "", "");
        let detail = backend.load_memory(&id).expect("saved memory should load");
        assert_eq!(detail.body, "# Untitled memory\n\n");
        assert_eq!(detail.title, "Untitled memory");
    }

    #[test]
    fn load_missing_reports_file_missing_text() {
        let backend = InMemoryBackend::new();
        let err = backend.load_memory("ghost").expect_err("must be missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn search_matches_title_or_body_most_recent_first() {
        let mut backend = InMemoryBackend::new();
        backend.set_clock(100);
        save(&mut backend, None, "", "# Rust notes\n\nborrow checker");
        backend.set_clock(200);
        save(&mut backend, None, "", "# Meeting\n\ntalked about rust traits");

        let hits = backend
            .search_memories("rust")
            .expect("search should succeed");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Meeting");
        assert_eq!(hits[0].snippet, "talked about rust traits");
        assert_eq!(hits[1].snippet, "Rust notes");

        assert!(backend
            .search_memories("   ")
            .expect("blank search should succeed")
            .is_empty());
    }
}
