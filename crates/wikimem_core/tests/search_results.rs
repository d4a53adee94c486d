use wikimem_core::{
    BackendError, InMemoryBackend, MemoryBackend, MemorySearchResult, MemorySummary,
    ResultsCommand, ResultsController, SaveMemoryPayload, RECENT_LIST_LIMIT, SEARCH_DEBOUNCE_MS,
};

fn hit(id: &str, title: &str, updated_at: i64) -> MemorySearchResult {
    MemorySearchResult {
        id: id.to_string(),
        title: title.to_string(),
        updated_at,
        snippet: String::new(),
    }
}

fn summary(id: &str, title: &str, updated_at: i64) -> MemorySummary {
    MemorySummary {
        id: id.to_string(),
        title: title.to_string(),
        updated_at,
    }
}

fn search_command(command: Option<ResultsCommand>) -> (u64, String) {
    match command {
        Some(ResultsCommand::Search { seq, query }) => (seq, query),
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn rapid_keystrokes_collapse_into_one_search_for_the_final_query() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("a", 0);
    controller.set_query("ab", 100);
    controller.set_query("abc", 200);

    assert!(controller.tick(200 + SEARCH_DEBOUNCE_MS - 1).is_none());
    let (_, query) = search_command(controller.tick(200 + SEARCH_DEBOUNCE_MS));
    assert_eq!(query, "abc");

    // The timer is spent; no second search without another keystroke.
    assert!(controller.tick(10_000).is_none());
}

#[test]
fn stale_search_response_is_dropped_on_arrival() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("a", 0);
    let (first_seq, _) = search_command(controller.tick(SEARCH_DEBOUNCE_MS));

    controller.set_query("abc", 1_000);
    let (second_seq, _) = search_command(controller.tick(1_000 + SEARCH_DEBOUNCE_MS));

    // The newer response lands first; the older one must not clobber it.
    controller.handle_search_result(second_seq, Ok(vec![hit("m-2", "abc note", 200)]));
    controller.handle_search_result(first_seq, Ok(vec![hit("m-1", "a note", 100)]));

    assert_eq!(controller.search_results().len(), 1);
    assert_eq!(controller.search_results()[0].id, "m-2");
    assert!(!controller.search_loading());
}

#[test]
fn blank_query_leaves_search_mode_without_a_backend_call() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("abc", 0);
    let (seq, _) = search_command(controller.tick(SEARCH_DEBOUNCE_MS));
    controller.handle_search_result(seq, Ok(vec![hit("m-1", "abc note", 100)]));
    assert!(controller.in_search_mode());

    controller.set_query("   ", 1_000);
    assert!(controller.tick(1_000 + SEARCH_DEBOUNCE_MS).is_none());
    assert!(!controller.in_search_mode());
    assert!(controller.search_results().is_empty());

    // A response for the abandoned search changes nothing.
    controller.handle_search_result(seq, Ok(vec![hit("m-9", "late", 1)]));
    assert!(controller.search_results().is_empty());
}

#[test]
fn unchanged_query_does_not_research_when_the_timer_fires() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("abc", 0);
    search_command(controller.tick(SEARCH_DEBOUNCE_MS));

    // Retyping the identical text restarts the timer but issues nothing new.
    controller.set_query("abc", 1_000);
    assert!(controller.tick(1_000 + SEARCH_DEBOUNCE_MS).is_none());
}

#[test]
fn search_failure_surfaces_and_recovers_on_the_next_response() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("abc", 0);
    let (seq, _) = search_command(controller.tick(SEARCH_DEBOUNCE_MS));
    controller.handle_search_result(seq, Err(BackendError::new("backend unreachable")));
    assert_eq!(controller.search_error(), Some("backend unreachable"));

    let commands = controller.notes_changed();
    let (retry_seq, _) = search_command(commands.into_iter().nth(1));
    controller.handle_search_result(retry_seq, Ok(vec![hit("m-1", "abc note", 100)]));
    assert!(controller.search_error().is_none());
    assert_eq!(controller.search_results().len(), 1);
}

#[test]
fn recent_listing_is_sorted_and_capped_for_display() {
    let mut controller = ResultsController::new();
    let ResultsCommand::FetchRecent { seq } = controller.start() else {
        panic!("expected recent fetch");
    };

    let unsorted: Vec<MemorySummary> = (0..14)
        .map(|n| summary(&format!("m-{n:02}"), &format!("note {n}"), i64::from(n % 7)))
        .collect();
    controller.handle_recent_result(seq, Ok(unsorted));

    let recent = controller.recent_memories();
    assert_eq!(recent.len(), RECENT_LIST_LIMIT);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));
}

#[test]
fn superseded_recent_refresh_is_dropped() {
    let mut controller = ResultsController::new();
    let ResultsCommand::FetchRecent { seq: first } = controller.start() else {
        panic!("expected recent fetch");
    };
    let ResultsCommand::FetchRecent { seq: second } = controller.refresh_recent() else {
        panic!("expected recent fetch");
    };

    controller.handle_recent_result(first, Ok(vec![summary("m-1", "old snapshot", 1)]));
    assert!(controller.recent_memories().is_empty(), "stale list dropped");

    controller.handle_recent_result(second, Ok(vec![summary("m-2", "fresh snapshot", 2)]));
    assert_eq!(controller.recent_memories()[0].id, "m-2");
}

#[test]
fn notes_changed_refreshes_recent_and_reissues_the_active_search() {
    let mut controller = ResultsController::new();
    controller.start();

    controller.set_query("rust", 0);
    let (old_seq, _) = search_command(controller.tick(SEARCH_DEBOUNCE_MS));

    let commands = controller.notes_changed();
    assert!(matches!(commands[0], ResultsCommand::FetchRecent { .. }));
    let (new_seq, query) = search_command(commands.into_iter().nth(1));
    assert_eq!(query, "rust");
    assert_ne!(new_seq, old_seq);

    // The pre-push search response is now superseded.
    controller.handle_search_result(old_seq, Ok(vec![hit("m-1", "stale", 1)]));
    assert!(controller.search_results().is_empty());
}

#[test]
fn notes_changed_without_an_active_search_only_refreshes_recent() {
    let mut controller = ResultsController::new();
    controller.start();
    let commands = controller.notes_changed();
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], ResultsCommand::FetchRecent { .. }));
}

// Drives the controller against the reference backend the way a host would:
// execute each emitted command, feed the result back under its seq.
#[test]
fn deleted_note_disappears_from_recent_on_the_next_refresh() {
    let mut backend = InMemoryBackend::new();
    backend.set_clock(100);
    let kept = backend
        .save_memory(SaveMemoryPayload {
            id: None,
            title: String::new(),
            body: "# Keep me\n".to_string(),
        })
        .expect("save should succeed");
    backend.set_clock(200);
    let doomed = backend
        .save_memory(SaveMemoryPayload {
            id: None,
            title: String::new(),
            body: "# Delete me\n".to_string(),
        })
        .expect("save should succeed");

    let mut controller = ResultsController::new();
    let ResultsCommand::FetchRecent { seq } = controller.start() else {
        panic!("expected recent fetch");
    };
    controller.handle_recent_result(seq, backend.list_memories());
    assert_eq!(controller.recent_memories().len(), 2);

    backend
        .delete_memory(&doomed.id)
        .expect("delete should succeed");
    let commands = controller.notes_changed();
    for command in commands {
        match command {
            ResultsCommand::FetchRecent { seq } => {
                controller.handle_recent_result(seq, backend.list_memories());
            }
            ResultsCommand::Search { seq, query } => {
                controller.handle_search_result(seq, backend.search_memories(&query));
            }
        }
    }

    let recent = controller.recent_memories();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, kept.id);
}
