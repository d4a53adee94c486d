//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `wikimem_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use wikimem_core::{InMemoryBackend, MemoryBackend, SaveMemoryPayload};

fn main() {
    // Keep a tiny probe to validate core wiring independently from the
    // UI shell and the real backend process.
    println!("wikimem_core version={}", wikimem_core::core_version());

    let mut backend = InMemoryBackend::new();
    backend.set_clock(0);
    let saved = backend.save_memory(SaveMemoryPayload {
        id: None,
        title: String::new(),
        body: "# Smoke note\n\nlinks to [[m-0]]".to_string(),
    });
    match saved {
        Ok(detail) => println!("wikimem_core smoke save id={} title={}", detail.id, detail.title),
        Err(err) => println!("wikimem_core smoke save failed: {err}"),
    }
}
