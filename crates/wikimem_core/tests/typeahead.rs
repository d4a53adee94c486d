use wikimem_core::{
    find_link_match, LinkSuggestController, MemorySearchResult, SuggestCommand,
    SUGGESTION_LIST_LIMIT,
};

fn hit(id: &str, title: &str) -> MemorySearchResult {
    MemorySearchResult {
        id: id.to_string(),
        title: title.to_string(),
        updated_at: 1_700_000_000,
        snippet: format!("...{title}..."),
    }
}

#[test]
fn typing_fragment_issues_one_search_and_selection_inserts_link() {
    let mut controller = LinkSuggestController::new();

    let text = "Team meeting with [[Ali";
    let matched = find_link_match(text).expect("trigger should match");
    assert_eq!(matched.matching_string, "Ali");

    let command = controller
        .query_changed(Some(&matched.matching_string))
        .expect("first query should issue a search");
    assert_eq!(command.query, "Ali");

    controller.handle_search_result(command.seq, Ok(vec![hit("note-42", "Ali 1:1")]));
    assert_eq!(controller.options().len(), 1);

    let selection = controller
        .select(0, text, &matched)
        .expect("first option should be selectable");
    assert_eq!(selection.text, "Team meeting with [[note-42]]");
    assert_eq!(selection.caret, selection.text.len());
    assert_eq!(selection.memory.id, "note-42");
}

#[test]
fn cached_query_issues_no_second_call() {
    let mut controller = LinkSuggestController::new();

    let first = controller
        .query_changed(Some("ali"))
        .expect("cache miss should issue a search");
    controller.handle_search_result(first.seq, Ok(vec![hit("m-1", "Ali 1:1")]));

    // Backspacing away and retyping the same fragment hits the cache.
    controller.query_changed(None);
    assert!(controller.query_changed(Some("ali")).is_none());
    assert_eq!(controller.options().len(), 1);
    assert_eq!(controller.current_query(), Some("ali"));
}

#[test]
fn in_flight_sentinel_blocks_duplicate_calls() {
    let mut controller = LinkSuggestController::new();

    let command = controller
        .query_changed(Some("ali"))
        .expect("cache miss should issue a search");

    // Same fragment again before the response arrives: no duplicate call.
    assert!(controller.query_changed(Some("ali")).is_none());
    assert!(controller.options().is_empty());

    controller.handle_search_result(command.seq, Ok(vec![hit("m-1", "Ali 1:1")]));
    assert_eq!(controller.options().len(), 1);
}

#[test]
fn failed_search_caches_empty_result_set() {
    let mut controller = LinkSuggestController::new();

    let command = controller
        .query_changed(Some("ali"))
        .expect("cache miss should issue a search");
    controller.handle_search_result(
        command.seq,
        Err(wikimem_core::BackendError::new("backend unreachable")),
    );
    assert!(controller.options().is_empty());

    // The failure is cached; retyping does not retry.
    controller.query_changed(None);
    assert!(controller.query_changed(Some("ali")).is_none());
    assert!(controller.options().is_empty());
}

#[test]
fn stale_response_fills_cache_but_not_visible_list() {
    let mut controller = LinkSuggestController::new();

    let first = controller
        .query_changed(Some("a"))
        .expect("first query should issue a search");
    let second = controller
        .query_changed(Some("ab"))
        .expect("second query should issue a search");

    // The response for the superseded fragment lands after the user moved on.
    controller.handle_search_result(first.seq, Ok(vec![hit("m-1", "apple")]));
    assert!(
        controller.options().is_empty(),
        "stale response must not populate the visible list"
    );

    controller.handle_search_result(second.seq, Ok(vec![hit("m-2", "abbey")]));
    assert_eq!(controller.options().len(), 1);
    assert_eq!(controller.options()[0].id, "m-2");

    // The stale response still warmed the cache for its own query.
    assert!(controller.query_changed(Some("a")).is_none());
    assert_eq!(controller.options()[0].id, "m-1");
}

#[test]
fn options_are_capped_at_the_display_limit() {
    let mut controller = LinkSuggestController::new();

    let command = controller
        .query_changed(Some("m"))
        .expect("cache miss should issue a search");
    let many: Vec<MemorySearchResult> = (0..8)
        .map(|n| hit(&format!("m-{n}"), &format!("memory {n}")))
        .collect();
    controller.handle_search_result(command.seq, Ok(many));
    assert_eq!(controller.options().len(), SUGGESTION_LIST_LIMIT);
}

#[test]
fn blank_fragment_clears_state_without_searching() {
    let mut controller = LinkSuggestController::new();
    assert!(controller.query_changed(Some("   ")).is_none());
    assert!(controller.current_query().is_none());
    assert!(controller.options().is_empty());
}

#[test]
fn reset_forgets_cache_and_outstanding_calls() {
    let mut controller = LinkSuggestController::new();

    let SuggestCommand { seq, .. } = controller
        .query_changed(Some("ali"))
        .expect("cache miss should issue a search");
    controller.reset();

    // The pre-reset response is ignored and the query searches again.
    controller.handle_search_result(seq, Ok(vec![hit("m-1", "Ali 1:1")]));
    assert!(controller.options().is_empty());
    assert!(controller.query_changed(Some("ali")).is_some());
}
