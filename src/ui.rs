//! The UI renders the application state into something visible and browsable.
//!
//! The draw function dispatches based on the current view. The outline view shows chapters
//! and their sections as a tree using box-drawing characters, and the detail view shows a
//! section's text with search matches highlighted.

use crate::app_state::{AppState, View};
use crate::search::{SearchResult, TextLocation};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::ops::Range;

const HIGHLIGHT: Style = Style::new().fg(Color::Black).bg(Color::Yellow);

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let main_view = match app.current_view {
        View::Search => app.previous_view,
        view => view,
    };
    match main_view {
        View::TitleList | View::Search => draw_title_list(f, app, chunks[0]),
        View::Outline => draw_outline(f, app, chunks[0]),
        View::Detail => draw_detail(f, app, chunks[0]),
    }

    draw_status(f, app, chunks[1]);
}

/// Generate box-drawing prefix for a section under its chapter
fn get_tree_prefix(is_last: bool) -> &'static str {
    if is_last {
        "└── "
    } else {
        "├── "
    }
}

fn draw_title_list(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .titles
        .iter()
        .map(|title| ListItem::new(Line::from(title.name.clone())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Titles ({})", app.titles.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.titles.is_empty() {
        state.select(Some(app.current_title_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_outline(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(outline) = app.outline() else {
        draw_placeholder(f, app, area);
        return;
    };

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;

    for entry in outline.iter() {
        let is_first = entry
            .chapter
            .sections
            .first()
            .is_some_and(|first| std::ptr::eq(first, entry.section));
        if is_first {
            let style = if entry.chapter.implicit {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            };
            items.push(ListItem::new(Line::from(Span::styled(
                entry.chapter.label.clone(),
                style,
            ))));
        }

        let is_last = entry
            .chapter
            .sections
            .last()
            .is_some_and(|last| std::ptr::eq(last, entry.section));
        let mut spans = vec![
            Span::raw(get_tree_prefix(is_last)),
            Span::raw(entry.section.label()),
        ];
        if let Some(hit) = app.hit_for(entry.index) {
            spans.push(Span::styled(
                format!("  ● {}", hit.spans.len()),
                Style::default().fg(Color::Yellow),
            ));
        }

        if entry.index == app.current_section_index {
            selected_row = Some(items.len());
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    let title = if app.query.is_empty() {
        format!("{} ({} sections)", outline.title.name, outline.section_count())
    } else {
        format!(
            "{} ({} of {} sections match \"{}\")",
            outline.title.name,
            app.hits.len(),
            outline.section_count(),
            app.query
        )
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(selected_row);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(outline) = app.outline() else {
        draw_placeholder(f, app, area);
        return;
    };
    let Some(entry) = outline.entry(app.current_section_index) else {
        draw_placeholder(f, app, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Section text
        ])
        .split(area);

    let breadcrumb = format!(
        "{} > {} > § {}",
        outline.title.name, entry.chapter.label, entry.section.citation
    );
    let breadcrumb_widget =
        Paragraph::new(breadcrumb).block(Block::default().borders(Borders::ALL).title("Navigation"));
    f.render_widget(breadcrumb_widget, chunks[0]);

    let result = app.current_result();
    let section = entry.section;

    let mut heading = vec![Span::styled(
        format!("{}. ", section.citation),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    heading.extend(highlighted_spans(
        &section.heading,
        &highlights(result.as_ref(), TextLocation::Heading),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let mut lines = vec![Line::from(heading)];
    lines.push(Line::default());
    if section.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no text)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (index, paragraph) in section.paragraphs.iter().enumerate() {
        lines.push(Line::from(highlighted_spans(
            paragraph,
            &highlights(result.as_ref(), TextLocation::Paragraph(index)),
            Style::default(),
        )));
        lines.push(Line::default());
    }

    let width = u16::try_from(app.wrap_width)
        .unwrap_or(u16::MAX)
        .min(chunks[1].width);
    let text_area = Rect { width, ..chunks[1] };

    let title = format!(
        "Section {} of {} (max line: {} chars)",
        entry.index + 1,
        outline.section_count(),
        app.get_max_line_width()
    );
    let text = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(text, text_area);
}

fn highlights(result: Option<&SearchResult<'_>>, location: TextLocation) -> Vec<Range<usize>> {
    result.map_or_else(Vec::new, |result| result.highlights(location))
}

/// Split text into spans, styling the given byte ranges as matches.
fn highlighted_spans(text: &str, ranges: &[Range<usize>], base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        if range.start > cursor {
            spans.push(Span::styled(text[cursor..range.start].to_string(), base));
        }
        spans.push(Span::styled(
            text[range.clone()].to_string(),
            base.patch(HIGHLIGHT),
        ));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), base));
    }

    spans
}

fn draw_placeholder(f: &mut Frame, app: &AppState, area: Rect) {
    let (text, style) = if let Some(err) = app.load_error() {
        (format!("Failed to load: {err}"), Style::default().fg(Color::Red))
    } else if app.is_loading() {
        ("Loading…".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        ("No title loaded".to_string(), Style::default())
    };

    let widget = Paragraph::new(Span::styled(text, style))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    if app.current_view == View::Search {
        let prompt = format!("/{}", app.search_buffer);
        let widget =
            Paragraph::new(prompt).block(Block::default().borders(Borders::ALL).title("Search"));
        f.render_widget(widget, area);
        return;
    }

    let (text, style) = if let Some(ref msg) = app.message {
        let style = if app.load_error().is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        (msg.clone(), style)
    } else {
        let help = match app.current_view {
            View::TitleList | View::Search => "↑/↓: Navigate | Enter: Open | q: Quit",
            View::Outline => {
                "↑/↓: Navigate | PgUp/PgDn: Chapter | Enter: Read | /: Search | n/N: Next/Prev Match | Esc: Clear | q: Titles"
            }
            View::Detail => {
                "↑/↓: Scroll | ←/→: Prev/Next Section | /: Search | n/N: Next/Prev Match | Esc/q: Back"
            }
        };
        (help.to_string(), Style::default())
    };

    let widget = Paragraph::new(Span::styled(text, style)).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}
