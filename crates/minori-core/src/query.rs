//! Query controller: the state machine behind the result grid.
//!
//! One controller instance owns the whole grid state: mode, page, term,
//! sort, filters, and the current results. Every transition reduces to a
//! [`PageRequest`] stamped with a sequence number; [`QueryController::apply`]
//! discards responses whose sequence is older than the last issued, so a
//! slow page-1 response can never clobber an already-applied page 2.

use minori_api::request::{CuratedKind, FilterSet, PageRequest, SortKey};
use minori_api::types::{AnimeSummary, PageEnvelope};
use minori_api::CatalogService;

use crate::format;
use crate::mutations::CONNECTION_ERROR;

/// Which collection the grid is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Curated(CuratedKind),
    RandomFiltered,
    Random,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Curated(CuratedKind::Popular)
    }
}

/// Per-page capabilities. The same controller drives the catalog page and
/// the watch-list page; only the capability flags differ.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub supports_pagination: bool,
    pub supports_filters: bool,
}

impl PageConfig {
    /// The main catalog page: paginated, filterable.
    pub fn catalog() -> Self {
        Self {
            supports_pagination: true,
            supports_filters: true,
        }
    }

    /// The watch-list page shows the whole list at once.
    pub fn watch_list() -> Self {
        Self {
            supports_pagination: false,
            supports_filters: false,
        }
    }
}

/// The inputs a request is derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub mode: Mode,
    pub page: u32,
    pub term: String,
    pub sort: SortKey,
    pub filters: FilterSet,
    pub nsfw_allowed: bool,
}

/// Pager widget state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub has_next_page: bool,
    pub visible: bool,
}

impl PaginationState {
    pub fn prev_enabled(&self) -> bool {
        self.current_page > 1
    }

    /// Next is gated on the server's `has_next_page`, never guessed from
    /// result count.
    pub fn next_enabled(&self) -> bool {
        self.has_next_page
    }

    pub fn label(&self) -> String {
        format::page_label(self.current_page)
    }
}

/// A request the controller wants sent, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Issued {
    pub seq: u64,
    pub request: PageRequest,
}

#[derive(Debug)]
pub struct QueryController {
    config: PageConfig,
    state: QueryState,
    results: Vec<AnimeSummary>,
    pagination: PaginationState,
    total_matches: Option<u64>,
    loading: bool,
    error: Option<String>,
    empty: bool,
    latest_seq: u64,
}

impl QueryController {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            state: QueryState {
                page: 1,
                ..Default::default()
            },
            results: Vec::new(),
            pagination: PaginationState::default(),
            total_matches: None,
            loading: false,
            error: None,
            empty: false,
            latest_seq: 0,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// A (debounced) search input edit. An empty trimmed term clears the
    /// grid and issues nothing.
    pub fn search_input(&mut self, raw: &str) -> Option<Issued> {
        let term = raw.trim();
        if term.is_empty() {
            self.clear_results();
            return None;
        }
        self.state.mode = Mode::Search;
        self.state.term = term.to_string();
        self.state.page = 1;
        Some(self.issue())
    }

    /// A curated-tag select. Resets to page 1 and clears the search term.
    pub fn select_curated(&mut self, kind: CuratedKind) -> Issued {
        self.state.mode = Mode::Curated(kind);
        self.state.term.clear();
        self.state.page = 1;
        self.issue()
    }

    /// A sort-key change. Re-issues the search at page 1, but only in
    /// search mode with a non-empty term; otherwise the key is just stored.
    pub fn set_sort(&mut self, key: SortKey) -> Option<Issued> {
        self.state.sort = key;
        if self.state.mode == Mode::Search && !self.state.term.is_empty() {
            self.state.page = 1;
            return Some(self.issue());
        }
        None
    }

    /// Legacy client-side fallback: re-sort the already-fetched list
    /// descending by the key's field, without touching the server. Dates
    /// compare as strings; absent values sort last.
    pub fn sort_loaded_results(&mut self, key: SortKey) {
        match key {
            SortKey::Score => self
                .results
                .sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0))),
            SortKey::Popularity => self
                .results
                .sort_by_key(|a| std::cmp::Reverse(a.popularity.unwrap_or(0))),
            SortKey::Episodes => self
                .results
                .sort_by_key(|a| std::cmp::Reverse(a.episodes.unwrap_or(0))),
            SortKey::StartDate => self
                .results
                .sort_by(|a, b| b.start_date.cmp(&a.start_date)),
        }
    }

    pub fn next_page(&mut self) -> Option<Issued> {
        if !self.pagination.visible || !self.pagination.next_enabled() {
            return None;
        }
        self.state.page += 1;
        Some(self.issue())
    }

    /// Clamped at page 1.
    pub fn prev_page(&mut self) -> Option<Issued> {
        if !self.pagination.visible || self.state.page <= 1 {
            return None;
        }
        self.state.page -= 1;
        Some(self.issue())
    }

    /// Apply the filter panel. Filters and search are mutually exclusive:
    /// the pending term is discarded, not merged.
    pub fn apply_filters(&mut self, filters: FilterSet) -> Option<Issued> {
        if !self.config.supports_filters {
            tracing::warn!("filters applied on a page without a filter panel, ignoring");
            return None;
        }
        self.state.mode = Mode::RandomFiltered;
        self.state.term.clear();
        self.state.page = 1;
        self.state.filters = filters;
        Some(self.issue())
    }

    /// An unfiltered random draw.
    pub fn draw_random(&mut self) -> Issued {
        self.state.mode = Mode::Random;
        self.state.term.clear();
        self.state.page = 1;
        self.issue()
    }

    pub fn set_nsfw_allowed(&mut self, allowed: bool) {
        self.state.nsfw_allowed = allowed;
    }

    // ── Request derivation ───────────────────────────────────────────────

    fn issue(&mut self) -> Issued {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        let request = self.derive_request();
        tracing::debug!(seq = self.latest_seq, ?request, "issuing page request");
        Issued {
            seq: self.latest_seq,
            request,
        }
    }

    fn derive_request(&self) -> PageRequest {
        let sfw = !self.state.nsfw_allowed;
        match self.state.mode {
            Mode::Search => PageRequest::Search {
                term: self.state.term.clone(),
                page: self.state.page,
                // The backend default is score; only a non-default key goes
                // over the wire.
                sort: (self.state.sort != SortKey::default()).then_some(self.state.sort),
                sfw,
            },
            Mode::Curated(kind) => PageRequest::Curated {
                kind,
                page: self.state.page,
                sfw,
            },
            Mode::RandomFiltered => PageRequest::RandomFiltered {
                filters: self.state.filters.clone(),
                sfw,
            },
            Mode::Random => PageRequest::Random { sfw },
        }
    }

    // ── Response handling ────────────────────────────────────────────────

    /// Apply a response. Responses from superseded requests are discarded
    /// before any state is touched.
    pub fn apply<E: std::error::Error>(&mut self, seq: u64, result: Result<PageEnvelope, E>) {
        if seq < self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale response");
            return;
        }
        self.loading = false;

        let envelope = match result {
            Err(e) => {
                tracing::warn!(error = %e, "page fetch failed");
                self.error = Some(CONNECTION_ERROR.to_string());
                return;
            }
            Ok(env) => env,
        };

        if let Some(message) = envelope.error {
            // Application-level refusal: surfaced verbatim, prior results
            // stay on screen.
            self.error = Some(message);
            return;
        }

        if self.state.mode == Mode::RandomFiltered {
            self.total_matches = Some(envelope.total.unwrap_or(0));
        } else {
            self.total_matches = None;
        }

        if envelope.data.is_empty() {
            self.results.clear();
            self.empty = true;
            self.pagination.visible = false;
            return;
        }

        self.results = envelope.data;
        self.empty = false;
        self.pagination = PaginationState {
            current_page: self.state.page,
            has_next_page: envelope
                .pagination
                .map(|p| p.has_next_page)
                .unwrap_or(false),
            visible: self.config.supports_pagination
                && matches!(self.state.mode, Mode::Search | Mode::Curated(_)),
        };
    }

    /// Issue-and-apply convenience for callers that await inline.
    pub async fn run<S: CatalogService>(&mut self, service: &S, issued: Issued) {
        let result = service.fetch_page(&issued.request).await;
        self.apply(issued.seq, result);
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.empty = false;
        self.error = None;
        self.loading = false;
        self.total_matches = None;
        self.pagination.visible = false;
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn results(&self) -> &[AnimeSummary] {
        &self.results
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the grid is showing the explicit no-results state.
    pub fn is_empty_state(&self) -> bool {
        self.empty
    }

    /// The total-count line under the filter panel, present only after a
    /// filtered draw.
    pub fn total_line(&self) -> Option<String> {
        self.total_matches.map(format::found_count)
    }
}
