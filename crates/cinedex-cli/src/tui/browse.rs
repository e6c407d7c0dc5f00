//! Browse TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use cinedex_api::tmdb::{LocalListingApi, TmdbClient};

use super::state::{AppState, FetchOutcome, FetchRequest, InputMode, Overlay, ScreenId};
use super::ui;

/// What a key press asks the event loop to do beyond mutating state.
enum Action {
    /// Leave the TUI.
    Quit,
    /// Issue one fetch.
    Fetch(FetchRequest),
}

/// Runs the browse TUI until the user quits.
///
/// Fetches run as tasks on `handle`; their outcomes are drained from an
/// mpsc channel on every loop turn, so input stays live while Loading.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_browse(client: Arc<TmdbClient>, handle: &Handle) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut state = AppState::new(client.image_base());

    // The Movies screen starts active and loads immediately.
    if let Some(request) = state.activate(ScreenId::Movies) {
        spawn_fetch(&client, &tx, handle, request);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &client, handle, &tx, &mut rx);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    client: &Arc<TmdbClient>,
    handle: &Handle,
    tx: &UnboundedSender<FetchOutcome>,
    rx: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    let mut list_height: u16 = 0;

    loop {
        terminal
            .draw(|frame| {
                list_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        // Completed fetches, in arrival order. No stale-guard: whichever
        // outcome lands last overwrites the screen's state.
        while let Ok(outcome) = rx.try_recv() {
            state.apply_outcome(outcome);
        }

        let page_size = usize::from(list_height.saturating_sub(4));

        if event::poll(Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let editing = state.active == ScreenId::Search
                && state.search.input_mode == InputMode::Query
                && !state.active_pane_ref().overlay_open();

            if editing {
                if let Some(request) = handle_query_input(state, key.code) {
                    spawn_fetch(client, tx, handle, request);
                }
            } else {
                match handle_normal_input(state, key.code, key.modifiers, page_size) {
                    Some(Action::Quit) => return Ok(()),
                    Some(Action::Fetch(request)) => spawn_fetch(client, tx, handle, request),
                    None => {}
                }
            }
        }
    }
}

/// Handles key input while typing a search query. Returns a fetch to issue.
fn handle_query_input(state: &mut AppState, key: KeyCode) -> Option<FetchRequest> {
    match key {
        KeyCode::Esc => {
            state.search.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // Empty query: validation message only, stay in input mode.
            let request = state.search.submit();
            if request.is_some() {
                state.search.input_mode = InputMode::Normal;
                return request;
            }
        }
        KeyCode::Backspace => {
            state.search.query_pop();
        }
        KeyCode::Char(c) => {
            state.search.query_push(c);
        }
        _ => {}
    }
    None
}

/// Handles key input in normal mode.
fn handle_normal_input(
    state: &mut AppState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> Option<Action> {
    match key {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Action::Quit);
        }
        KeyCode::Esc => state.active_pane().close_detail(),
        KeyCode::Enter => state.active_pane().open_detail(),
        KeyCode::Tab => {
            let id = state.active.next();
            return activate(state, id);
        }
        KeyCode::BackTab => {
            let id = state.active.prev();
            return activate(state, id);
        }
        KeyCode::Char('1') => return activate(state, ScreenId::Movies),
        KeyCode::Char('2') => return activate(state, ScreenId::TvShows),
        KeyCode::Char('3') => return activate(state, ScreenId::Search),
        KeyCode::Up | KeyCode::Char('k') => state.active_pane().move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.active_pane().move_down(),
        KeyCode::PageUp => state.active_pane().page_up(page_size),
        KeyCode::PageDown => state.active_pane().page_down(page_size),
        KeyCode::Left => return select_prev(state),
        KeyCode::Right => return select_next(state),
        KeyCode::Char('/') if state.active == ScreenId::Search => {
            state.search.input_mode = InputMode::Query;
        }
        KeyCode::Char('o') => open_poster(state),
        _ => {}
    }
    None
}

/// Switches screens; a category screen fetches on its first activation.
fn activate(state: &mut AppState, id: ScreenId) -> Option<Action> {
    state.activate(id).map(Action::Fetch)
}

/// Left key: previous category (fetches) or previous search kind (no fetch).
fn select_prev(state: &mut AppState) -> Option<Action> {
    match state.active {
        ScreenId::Movies => Some(Action::Fetch(state.movies.prev_category())),
        ScreenId::TvShows => Some(Action::Fetch(state.tv.prev_category())),
        ScreenId::Search => {
            state.search.prev_kind();
            None
        }
    }
}

/// Right key: next category (fetches) or next search kind (no fetch).
fn select_next(state: &mut AppState) -> Option<Action> {
    match state.active {
        ScreenId::Movies => Some(Action::Fetch(state.movies.next_category())),
        ScreenId::TvShows => Some(Action::Fetch(state.tv.next_category())),
        ScreenId::Search => {
            state.search.next_kind();
            None
        }
    }
}

/// Opens the poster image for the overlay item (or the row under the
/// cursor) in the system browser. Items without a poster are a no-op.
fn open_poster(state: &AppState) {
    let pane = state.active_pane_ref();
    let item = match &pane.overlay {
        Overlay::Open(item) => Some(item),
        Overlay::Closed => pane.current(),
    };
    let Some(path) = item.and_then(|i| i.poster_path.as_deref()) else {
        return;
    };
    let _ = open::that(state.poster_url(path));
}

/// Spawns one fetch task for a request and wires its outcome back into
/// the channel. Errors collapse into the screen's generic message here;
/// the cause goes to the log only.
fn spawn_fetch(
    client: &Arc<TmdbClient>,
    tx: &UnboundedSender<FetchOutcome>,
    handle: &Handle,
    request: FetchRequest,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    handle.spawn(async move {
        let (screen, result) = match request {
            FetchRequest::Movies(category) => {
                (ScreenId::Movies, client.movie_listings(category).await)
            }
            FetchRequest::Tv(category) => (ScreenId::TvShows, client.tv_listings(category).await),
            FetchRequest::Search(kind, query) => {
                (ScreenId::Search, client.search(kind, &query).await)
            }
        };

        let result = match result {
            Ok(page) => Ok(page.into_items()),
            Err(error) => {
                tracing::warn!(cause = %format!("{error:#}"), "listing fetch failed");
                Err(String::from(screen.fetch_error()))
            }
        };

        // The receiver is gone once the TUI exits; a late outcome is dropped.
        let _ = tx.send(FetchOutcome { screen, result });
    });
}
