//! TUI rendering logic for the listing screens.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};

use cinedex_api::tmdb::ListingItem;

use super::state::{
    AppState, CategoryScreen, FetchState, InputMode, ListingPane, Overlay, ScreenId, SearchScreen,
};

/// Placeholder shown wherever an item has no poster.
const NO_IMAGE: &str = "No Image";

/// Draws the UI. Returns the list area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut AppState) -> u16 {
    // The detail overlay replaces the whole screen while open.
    let open_item = match &state.active_pane_ref().overlay {
        Overlay::Open(item) => Some(item.clone()),
        Overlay::Closed => None,
    };
    if let Some(item) = open_item {
        draw_detail(frame, frame.area(), &item, state);
        return 0;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Length(3), // selector
            Constraint::Min(5),    // listing
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], state.active);

    match state.active {
        ScreenId::Movies => draw_category_bar(frame, chunks[1], &state.movies),
        ScreenId::TvShows => draw_category_bar(frame, chunks[1], &state.tv),
        ScreenId::Search => draw_search_bar(frame, chunks[1], &state.search),
    }

    let list_area = chunks[2];
    match state.active {
        ScreenId::Movies => draw_listing(frame, list_area, &mut state.movies.pane, ""),
        ScreenId::TvShows => draw_listing(frame, list_area, &mut state.tv.pane, ""),
        ScreenId::Search => draw_listing(
            frame,
            list_area,
            &mut state.search.pane,
            "Press / to type a query, then Enter to search",
        ),
    }

    draw_footer(frame, chunks[3], state);

    list_area.height
}

/// Draws the screen tabs.
fn draw_tabs(frame: &mut Frame, area: Rect, active: ScreenId) {
    let titles: Vec<Line> = ScreenId::ALL.iter().map(|s| Line::from(s.title())).collect();
    let selected = ScreenId::ALL.iter().position(|s| *s == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" cinedex "));
    frame.render_widget(tabs, area);
}

/// Draws the category selector for the Movies/TV screens.
fn draw_category_bar(frame: &mut Frame, area: Rect, screen: &CategoryScreen) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, label) in screen.category_labels().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if i == screen.category_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Category \u{2190}\u{2192} "),
    );
    frame.render_widget(bar, area);
}

/// Draws the search input, kind selector, and inline validation error.
#[allow(clippy::indexing_slicing)]
fn draw_search_bar(frame: &mut Frame, area: Rect, screen: &SearchScreen) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ])
        .split(area);

    let query_style = if screen.input_mode == InputMode::Query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let query = Paragraph::new(screen.query.clone())
        .style(query_style)
        .block(Block::default().borders(Borders::ALL).title(" Query: / "));
    frame.render_widget(query, chunks[0]);

    let kind = Paragraph::new(screen.kind().label()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Kind \u{2190}\u{2192} "),
    );
    frame.render_widget(kind, chunks[1]);

    let error_text = screen.input_error.unwrap_or_default();
    let error = Paragraph::new(error_text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(error, chunks[2]);
}

/// Draws the listing area for the current fetch state.
fn draw_listing(frame: &mut Frame, area: Rect, pane: &mut ListingPane, idle_hint: &str) {
    let block = Block::default().borders(Borders::ALL).title(" Listings ");

    match &pane.fetch {
        FetchState::Idle => {
            let hint = Paragraph::new(idle_hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(hint, area);
        }
        FetchState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            frame.render_widget(loading, area);
        }
        FetchState::Failure(message) => {
            let error = Paragraph::new(message.clone())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        FetchState::Success(items) if items.is_empty() => {
            let empty = Paragraph::new("No results")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
        }
        FetchState::Success(items) => {
            let header = Row::new(vec!["Title", "Popularity", "Date", "Poster"])
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .bottom_margin(1);

            let rows: Vec<Row> = items
                .iter()
                .map(|item| {
                    Row::new(vec![
                        item.display_title.clone(),
                        item.popularity.to_string(),
                        item.primary_date.clone().unwrap_or_else(|| String::from("-")),
                        item.poster_path
                            .clone()
                            .unwrap_or_else(|| String::from(NO_IMAGE)),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Min(24),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Min(16),
            ];

            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );

            frame.render_stateful_widget(table, area, &mut pane.table_state);
        }
    }
}

/// Draws the full-screen detail overlay for one item.
#[allow(clippy::indexing_slicing)]
fn draw_detail(frame: &mut Frame, area: Rect, item: &ListingItem, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // poster
            Constraint::Min(5),    // overview
            Constraint::Length(4), // meta
            Constraint::Length(3), // footer
        ])
        .split(area);

    let title = Paragraph::new(item.display_title.clone())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(title, chunks[0]);

    let poster_text = item
        .poster_path
        .as_deref()
        .map_or_else(|| String::from(NO_IMAGE), |p| state.poster_url(p));
    let poster = Paragraph::new(poster_text)
        .block(Block::default().borders(Borders::ALL).title(" Poster "));
    frame.render_widget(poster, chunks[1]);

    let overview = Paragraph::new(item.overview.clone())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Overview "));
    frame.render_widget(overview, chunks[2]);

    let date = item.primary_date.clone().unwrap_or_else(|| String::from("-"));
    let meta = Paragraph::new(vec![
        Line::from(format!("Popularity: {}", item.popularity)),
        Line::from(format!("Release Date: {date}")),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(meta, chunks[3]);

    let footer = Paragraph::new("Esc: back to list  o: open poster  q: quit")
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[4]);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let help_text = match state.active {
        ScreenId::Search if state.search.input_mode == InputMode::Query => {
            Line::from("Type query | Esc: cancel | Enter: search")
        }
        ScreenId::Search => Line::from(
            "Tab/1-3: screen  /: query  \u{2190}\u{2192}: kind  \u{2191}\u{2193}/j/k: move  Enter: details  q: quit",
        ),
        ScreenId::Movies | ScreenId::TvShows => Line::from(
            "Tab/1-3: screen  \u{2190}\u{2192}: category  \u{2191}\u{2193}/j/k: move  Enter: details  q: quit",
        ),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
