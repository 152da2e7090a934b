use super::{AppState, View};
use crate::corpus::{Corpus, MemoryCorpus};
use crate::fixtures::corpus;
use crate::loader::load_title;
use crate::session::Session;
use crate::title::TitleId;

fn app_for(corpus: &MemoryCorpus) -> AppState {
    AppState::new(corpus.titles().unwrap(), Session::default(), 100)
}

/// Opens the title under the cursor and lets its load land immediately.
fn open(app: &mut AppState, corpus: &MemoryCorpus) {
    if let Some(ticket) = app.select_title() {
        let result = load_title(corpus, &ticket.title);
        app.apply_load(&ticket, result);
    }
}

#[test]
fn test_select_title_loads_outline() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    assert_eq!(app.titles[0].name, "Title 1");

    let ticket = app.select_title().unwrap();
    assert_eq!(app.current_view, View::Outline);
    assert!(app.is_loading());
    assert!(app.outline().is_none());

    app.apply_load(&ticket, load_title(&corpus, &ticket.title));
    assert!(!app.is_loading());
    assert_eq!(app.outline().unwrap().section_count(), 4);
    // The list picks up the name from the document once it has loaded
    assert_eq!(app.titles[0].name, "TITLE 1.—GENERAL PROVISIONS");
}

#[test]
fn test_stale_load_does_not_replace_newer_title() {
    let corpus = corpus();
    let mut app = app_for(&corpus);

    let first = app.select_title().unwrap();
    app.close_title();
    app.next_title();
    let second = app.select_title().unwrap();

    app.apply_load(&first, load_title(&corpus, &first.title));
    assert!(app.outline().is_none());
    assert!(app.is_loading());

    app.apply_load(&second, load_title(&corpus, &second.title));
    assert_eq!(app.outline().unwrap().title.id, TitleId::new("2"));
}

#[test]
fn test_reopening_cached_title_needs_no_load() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);
    app.close_title();
    app.next_title();
    open(&mut app, &corpus);
    app.close_title();
    app.prev_title();

    assert!(app.select_title().is_none());
    assert_eq!(app.outline().unwrap().title.id, TitleId::new("1"));
}

#[test]
fn test_failed_load_reports_error() {
    let corpus = corpus();
    let mut app = app_for(&corpus);

    let ticket = app.select_title().unwrap();
    app.apply_load(&ticket, load_title(&corpus, &TitleId::new("99")));

    assert!(app.load_error().is_some());
    assert!(app
        .message
        .as_deref()
        .unwrap()
        .starts_with("Failed to load Title 1"));

    app.run_search("territory");
    assert!(app.hits.is_empty());
    assert!(app
        .message
        .as_deref()
        .unwrap()
        .starts_with("Cannot search, title failed to load"));
}

#[test]
fn test_empty_title_has_message() {
    let corpus = MemoryCorpus::new().with_title(TitleId::new("3"), "<USCode/>");
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);

    assert!(app.outline().unwrap().is_empty());
    assert_eq!(app.message.as_deref(), Some("Title 3 has no sections"));

    app.enter_detail_view();
    assert_eq!(app.current_view, View::Outline);
    assert_eq!(app.navigate_to_first(), None);
    assert_eq!(app.navigate_to_last(), None);
}

#[test]
fn test_section_navigation() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);

    assert_eq!(app.find_prev_section(), None);
    assert_eq!(app.find_next_section(), Some(1));
    assert_eq!(app.navigate_to_last(), Some(3));

    app.go_to_section(app.navigate_to_last());
    assert_eq!(app.find_next_section(), None);

    app.scroll_down();
    app.go_to_section(None);
    assert_eq!(app.current_section_index, 3);
    assert_eq!(app.detail_scroll, 1);
}

#[test]
fn test_chapter_navigation() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);

    assert_eq!(app.navigate_to_next_chapter(), Some(2));
    assert_eq!(app.navigate_to_prev_chapter(), None);

    app.go_to_section(Some(3));
    // First back to the start of the current chapter, then to the previous one
    assert_eq!(app.navigate_to_prev_chapter(), Some(2));
    app.go_to_section(Some(2));
    assert_eq!(app.navigate_to_prev_chapter(), Some(0));
    assert_eq!(app.navigate_to_next_chapter(), None);
}

#[test]
fn test_search_jumps_to_first_match() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);

    app.start_search();
    assert_eq!(app.current_view, View::Search);
    app.search_buffer.push_str("territory");
    app.submit_search();

    assert_eq!(app.current_view, View::Outline);
    assert_eq!(app.query, "territory");
    assert_eq!(app.current_section_index, 1);
    assert_eq!(
        app.message.as_deref(),
        Some("3 matches in 2 sections for \"territory\"")
    );
    assert_eq!(app.hit_for(2).unwrap().spans.len(), 2);
    assert!(app.hit_for(0).is_none());

    let result = app.current_result().unwrap();
    assert_eq!(result.section.citation, "102");
}

#[test]
fn test_hit_navigation_wraps() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);
    app.run_search("territory");

    assert_eq!(app.find_next_hit(), Some(2));
    app.go_to_section(app.find_next_hit());
    assert_eq!(app.find_next_hit(), Some(1));
    assert_eq!(app.find_prev_hit(), Some(1));

    app.go_to_section(Some(1));
    assert_eq!(app.find_prev_hit(), Some(2));
}

#[test]
fn test_search_without_matches() {
    let corpus = corpus();
    let mut app = app_for(&corpus);

    app.run_search("territory");
    assert_eq!(app.message.as_deref(), Some("No title loaded"));

    open(&mut app, &corpus);
    app.run_search("admiralty");
    assert!(app.hits.is_empty());
    assert!(app.query.is_empty());
    assert_eq!(app.message.as_deref(), Some("No matches for \"admiralty\""));
    assert_eq!(app.find_next_hit(), None);
}

#[test]
fn test_cancel_search_keeps_active_query() {
    let corpus = corpus();
    let mut app = app_for(&corpus);
    open(&mut app, &corpus);
    app.enter_detail_view();
    app.run_search("united states");

    app.start_search();
    assert_eq!(app.search_buffer, "united states");
    app.search_buffer.clear();
    app.cancel_search();

    assert_eq!(app.current_view, View::Detail);
    assert_eq!(app.query, "united states");
    assert_eq!(app.hits.len(), 2);
}
