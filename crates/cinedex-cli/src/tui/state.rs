//! Listing screen state management.
//!
//! One [`ListingPane`] holds the fetch/list/detail state every screen
//! shares; [`CategoryScreen`] and [`SearchScreen`] wrap it with their
//! selector. The three screens in [`AppState`] are fully independent.

use ratatui::widgets::TableState;

use cinedex_api::tmdb::{ListingItem, MovieCategory, SearchKind, TvCategory};

/// Validation message for an empty search submit.
pub const EMPTY_QUERY_MESSAGE: &str = "Movie/TV show name is required";

/// Identifies one of the three listing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenId {
    /// Movie listings by category.
    Movies,
    /// TV listings by category.
    TvShows,
    /// Free-text search.
    Search,
}

impl ScreenId {
    /// All screens in tab order.
    pub const ALL: [Self; 3] = [Self::Movies, Self::TvShows, Self::Search];

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::TvShows => "TV Shows",
            Self::Search => "Search",
        }
    }

    /// Generic user-facing message shown when a fetch for this screen fails.
    #[must_use]
    pub const fn fetch_error(self) -> &'static str {
        match self {
            Self::Movies => "Failed to fetch movies. Please try again.",
            Self::TvShows => "Failed to fetch TV shows. Please try again.",
            Self::Search => "Failed to fetch search results. Please try again.",
        }
    }

    /// Next screen in tab order (wraps).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Movies => Self::TvShows,
            Self::TvShows => Self::Search,
            Self::Search => Self::Movies,
        }
    }

    /// Previous screen in tab order (wraps).
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Movies => Self::Search,
            Self::TvShows => Self::Movies,
            Self::Search => Self::TvShows,
        }
    }
}

/// Lifecycle of one data-retrieval attempt. Exactly one state holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    /// No fetch has been triggered yet.
    #[default]
    Idle,
    /// A request is in flight; the previous list is hidden.
    Loading,
    /// Items in upstream response order.
    Success(Vec<ListingItem>),
    /// Generic user-facing failure message; prior items are discarded.
    Failure(String),
}

/// Detail overlay for one selected item.
///
/// Owns a clone of the item so the list may refresh while it is open.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    /// No overlay shown.
    #[default]
    Closed,
    /// Full-screen detail for this item.
    Open(ListingItem),
}

/// A fetch the event loop must issue. Emitting one of these is the only
/// way a request leaves a screen: one trigger, one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// `movie/{category}`.
    Movies(MovieCategory),
    /// `tv/{category}`.
    Tv(TvCategory),
    /// `search/{kind}?query={text}`.
    Search(SearchKind, String),
}

/// Completion message sent back from a spawned fetch task.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Screen whose state this outcome updates.
    pub screen: ScreenId,
    /// Normalized items, or the generic failure message for the screen.
    pub result: Result<Vec<ListingItem>, String>,
}

/// Input mode for the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Query text input mode.
    Query,
}

/// The fetch/list/detail state shared by every listing screen.
#[derive(Debug, Default)]
pub struct ListingPane {
    /// Current fetch lifecycle state.
    pub fetch: FetchState,
    /// Detail overlay state.
    pub overlay: Overlay,
    /// Table state for the listing (handles selection and scroll).
    pub table_state: TableState,
}

impl ListingPane {
    /// Marks a fetch as in flight. The previous list is hidden until the
    /// outcome arrives.
    pub fn begin_fetch(&mut self) {
        self.fetch = FetchState::Loading;
    }

    /// Applies a fetch outcome, overwriting whatever state held before.
    ///
    /// Deliberately unconditional: when two fetches overlap, whichever
    /// outcome is applied last wins, stale or not.
    pub fn apply_outcome(&mut self, result: Result<Vec<ListingItem>, String>) {
        match result {
            Ok(items) => {
                if items.is_empty() {
                    self.table_state.select(None);
                } else {
                    self.table_state.select(Some(0));
                }
                self.fetch = FetchState::Success(items);
            }
            Err(message) => {
                self.table_state.select(None);
                self.fetch = FetchState::Failure(message);
            }
        }
    }

    /// Items currently listed (empty unless `Success`).
    #[must_use]
    pub fn items(&self) -> &[ListingItem] {
        match &self.fetch {
            FetchState::Success(items) => items,
            _ => &[],
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the item under the cursor (if any).
    #[must_use]
    pub fn current(&self) -> Option<&ListingItem> {
        self.items().get(self.cursor())
    }

    /// Whether the detail overlay is open.
    #[must_use]
    pub const fn overlay_open(&self) -> bool {
        matches!(self.overlay, Overlay::Open(_))
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
        self.refresh_overlay();
    }

    /// Moves cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.items().len() {
            self.table_state.select(Some(current + 1));
        }
        self.refresh_overlay();
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_sub(page_size)));
        self.refresh_overlay();
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self, page_size: usize) {
        let max = self.items().len().saturating_sub(1);
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_add(page_size).min(max)));
        self.refresh_overlay();
    }

    /// Opens the detail overlay for the item under the cursor.
    ///
    /// Local state only; never triggers a fetch. With no item selected
    /// the overlay stays closed.
    pub fn open_detail(&mut self) {
        if let Some(item) = self.current().cloned() {
            self.overlay = Overlay::Open(item);
        }
    }

    /// Closes the detail overlay and returns to the list.
    pub fn close_detail(&mut self) {
        self.overlay = Overlay::Closed;
    }

    /// While the overlay is open, cursor moves replace the shown item
    /// in place (re-entrant select, no intermediate close).
    fn refresh_overlay(&mut self) {
        if self.overlay_open()
            && let Some(item) = self.current().cloned()
        {
            self.overlay = Overlay::Open(item);
        }
    }
}

/// Which catalog a category screen lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// Movie categories.
    Movies,
    /// TV categories.
    Tv,
}

/// A listing screen driven by a category selector (Movies, TV Shows).
#[derive(Debug)]
pub struct CategoryScreen {
    /// Catalog this screen lists.
    pub catalog: Catalog,
    /// Index into the catalog's category list.
    pub category_cursor: usize,
    /// Fetch/list/detail state.
    pub pane: ListingPane,
}

impl CategoryScreen {
    /// Creates a screen with its default category (Popular) selected and
    /// nothing fetched.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let category_cursor = match catalog {
            Catalog::Movies => 0,
            Catalog::Tv => 2,
        };
        Self {
            catalog,
            category_cursor,
            pane: ListingPane::default(),
        }
    }

    /// Category labels in display order.
    #[must_use]
    pub fn category_labels(&self) -> Vec<&'static str> {
        match self.catalog {
            Catalog::Movies => MovieCategory::ALL.iter().map(|c| c.label()).collect(),
            Catalog::Tv => TvCategory::ALL.iter().map(|c| c.label()).collect(),
        }
    }

    /// The request for the currently selected category.
    #[must_use]
    pub fn request(&self) -> FetchRequest {
        match self.catalog {
            Catalog::Movies => FetchRequest::Movies(
                MovieCategory::ALL
                    .get(self.category_cursor)
                    .copied()
                    .unwrap_or(MovieCategory::Popular),
            ),
            Catalog::Tv => FetchRequest::Tv(
                TvCategory::ALL
                    .get(self.category_cursor)
                    .copied()
                    .unwrap_or(TvCategory::Popular),
            ),
        }
    }

    /// Number of categories for this catalog.
    fn category_count(&self) -> usize {
        match self.catalog {
            Catalog::Movies => MovieCategory::ALL.len(),
            Catalog::Tv => TvCategory::ALL.len(),
        }
    }

    /// Selects the next category (wraps) and starts a fetch for it.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn next_category(&mut self) -> FetchRequest {
        self.category_cursor = (self.category_cursor + 1) % self.category_count();
        self.pane.begin_fetch();
        self.request()
    }

    /// Selects the previous category (wraps) and starts a fetch for it.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn prev_category(&mut self) -> FetchRequest {
        let count = self.category_count();
        self.category_cursor = (self.category_cursor + count - 1) % count;
        self.pane.begin_fetch();
        self.request()
    }

    /// Starts the first fetch when the screen is activated and nothing
    /// has been fetched yet. Later activations are no-ops.
    pub fn activation_fetch(&mut self) -> Option<FetchRequest> {
        if self.pane.fetch == FetchState::Idle {
            self.pane.begin_fetch();
            Some(self.request())
        } else {
            None
        }
    }
}

/// The free-text search screen.
#[derive(Debug)]
pub struct SearchScreen {
    /// Query text.
    pub query: String,
    /// Index into [`SearchKind::ALL`].
    pub kind_cursor: usize,
    /// Inline validation message (empty query submit).
    pub input_error: Option<&'static str>,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Fetch/list/detail state.
    pub pane: ListingPane,
}

impl SearchScreen {
    /// Creates an empty search screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: String::new(),
            kind_cursor: 0,
            input_error: None,
            input_mode: InputMode::Normal,
            pane: ListingPane::default(),
        }
    }

    /// Currently selected search kind.
    #[must_use]
    pub fn kind(&self) -> SearchKind {
        SearchKind::ALL
            .get(self.kind_cursor)
            .copied()
            .unwrap_or(SearchKind::Movie)
    }

    /// Selects the next search kind (wraps). Does not fetch.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn next_kind(&mut self) {
        self.kind_cursor = (self.kind_cursor + 1) % SearchKind::ALL.len();
    }

    /// Selects the previous search kind (wraps). Does not fetch.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn prev_kind(&mut self) {
        let count = SearchKind::ALL.len();
        self.kind_cursor = (self.kind_cursor + count - 1) % count;
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, ch: char) {
        self.query.push(ch);
    }

    /// Removes the last character from the query.
    pub fn query_pop(&mut self) {
        self.query.pop();
    }

    /// Submits the current query.
    ///
    /// An empty query surfaces the validation message and leaves the
    /// fetch state and previous results untouched; otherwise one fetch
    /// starts and its request is returned.
    pub fn submit(&mut self) -> Option<FetchRequest> {
        if self.query.is_empty() {
            self.input_error = Some(EMPTY_QUERY_MESSAGE);
            return None;
        }
        self.input_error = None;
        self.pane.begin_fetch();
        Some(FetchRequest::Search(self.kind(), self.query.clone()))
    }
}

impl Default for SearchScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level TUI state: the active tab and three independent screens.
#[derive(Debug)]
pub struct AppState {
    /// Currently active screen.
    pub active: ScreenId,
    /// Movie listings screen.
    pub movies: CategoryScreen,
    /// TV listings screen.
    pub tv: CategoryScreen,
    /// Search screen.
    pub search: SearchScreen,
    /// Poster image base URL prefix.
    image_base: String,
}

impl AppState {
    /// Creates the initial state with the Movies screen active.
    #[must_use]
    pub fn new(image_base: impl Into<String>) -> Self {
        Self {
            active: ScreenId::Movies,
            movies: CategoryScreen::new(Catalog::Movies),
            tv: CategoryScreen::new(Catalog::Tv),
            search: SearchScreen::new(),
            image_base: image_base.into(),
        }
    }

    /// Builds the full poster URL for an item's poster path.
    ///
    /// Never called for items without one; those render the placeholder.
    #[must_use]
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{poster_path}", self.image_base)
    }

    /// Mutable pane of the active screen.
    pub fn active_pane(&mut self) -> &mut ListingPane {
        match self.active {
            ScreenId::Movies => &mut self.movies.pane,
            ScreenId::TvShows => &mut self.tv.pane,
            ScreenId::Search => &mut self.search.pane,
        }
    }

    /// Pane of the active screen (shared reference).
    #[must_use]
    pub const fn active_pane_ref(&self) -> &ListingPane {
        match self.active {
            ScreenId::Movies => &self.movies.pane,
            ScreenId::TvShows => &self.tv.pane,
            ScreenId::Search => &self.search.pane,
        }
    }

    /// Switches the active screen, starting the screen's first fetch
    /// if it has never loaded (category screens only; search waits for
    /// an explicit submit).
    pub fn activate(&mut self, id: ScreenId) -> Option<FetchRequest> {
        self.active = id;
        match id {
            ScreenId::Movies => self.movies.activation_fetch(),
            ScreenId::TvShows => self.tv.activation_fetch(),
            ScreenId::Search => None,
        }
    }

    /// Routes a fetch outcome to the screen it belongs to, active or not.
    ///
    /// An outcome for a non-active screen updates state nobody is
    /// currently looking at; an unconditional overwrite either way.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let pane = match outcome.screen {
            ScreenId::Movies => &mut self.movies.pane,
            ScreenId::TvShows => &mut self.tv.pane,
            ScreenId::Search => &mut self.search.pane,
        };
        pane.apply_outcome(outcome.result);
    }
}
