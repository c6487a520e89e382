//! Interface controller: search state, pagination, status filtering, theme,
//! and fetch orchestration.

use crate::client::SearchApi;
use crate::config::Config;
use crate::error::ClientError;
use crate::model::{
    EventRecord, EventStatus, PageState, SearchParams, SearchResponse, SearchSummary, StatusFilter,
};
use crate::notify::Notifier;
use crate::theme::{Theme, ThemeStore};
use crate::ui::search_bar::{FormField, SearchForm};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const SPINNER_FRAMES: [&str; 6] = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];

/// What the controller is doing with respect to the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No search issued yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The current page has records.
    Results,
    /// The current page came back empty.
    Empty,
}

/// Which part of the interface receives plain key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Start,
    End,
    Results,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Query => Focus::Start,
            Focus::Start => Focus::End,
            Focus::End => Focus::Results,
            Focus::Results => Focus::Query,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Query => Focus::Results,
            Focus::Start => Focus::Query,
            Focus::End => Focus::Start,
            Focus::Results => Focus::End,
        }
    }

    pub fn form_field(self) -> Option<FormField> {
        match self {
            Focus::Query => Some(FormField::Query),
            Focus::Start => Some(FormField::Start),
            Focus::End => Some(FormField::End),
            Focus::Results => None,
        }
    }
}

/// A status-filter toggle waiting out its settle delay.
#[derive(Debug)]
struct PendingToggle {
    status: EventStatus,
    applies_at: Instant,
}

/// Completed fetch, tagged with the generation that issued it.
#[derive(Debug)]
struct FetchOutcome {
    generation: u64,
    result: Result<SearchResponse, ClientError>,
}

pub struct App {
    api: Arc<dyn SearchApi>,
    phase: Phase,
    records: Vec<EventRecord>,
    pagination: PageState,
    filter: StatusFilter,
    pending_toggles: VecDeque<PendingToggle>,
    filter_delay: Duration,
    last_search: Option<SearchParams>,
    last_summary: Option<SearchSummary>,
    /// Monotonic fetch counter. Only the outcome carrying the current
    /// value may touch state; everything older is dropped.
    generation: u64,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    notifier: Notifier,
    form: SearchForm,
    focus: Focus,
    theme: Theme,
    theme_store: ThemeStore,
    selected: usize,
    tick_count: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, api: Arc<dyn SearchApi>, theme_store: ThemeStore) -> Self {
        let dark = theme_store.load();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let pagination = PageState {
            page_size: config.api.page_size,
            ..PageState::default()
        };

        Self {
            api,
            phase: Phase::Idle,
            records: Vec::new(),
            pagination,
            filter: StatusFilter::default(),
            pending_toggles: VecDeque::new(),
            filter_delay: config.filter_delay(),
            last_search: None,
            last_summary: None,
            generation: 0,
            outcome_tx,
            outcome_rx,
            notifier: Notifier::new(config.toast_ttl()),
            form: SearchForm::default(),
            focus: Focus::Query,
            theme: Theme::from_dark_flag(dark),
            theme_store,
            selected: 0,
            tick_count: 0,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn pagination(&self) -> &PageState {
        &self.pagination
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn summary(&self) -> Option<&SearchSummary> {
        self.last_summary.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.tick_count % SPINNER_FRAMES.len()]
    }

    /// True while any status-filter toggle is waiting out its delay.
    pub fn is_filtering(&self) -> bool {
        !self.pending_toggles.is_empty()
    }

    /// Records that pass the status filter. Empty while a toggle is
    /// settling, regardless of what was fetched.
    pub fn visible_records(&self) -> Vec<&EventRecord> {
        if self.is_filtering() {
            return Vec::new();
        }
        if self.filter.accept && self.filter.reject {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| self.filter.allows(record.status))
            .collect()
    }

    /// Index of the highlighted row, clamped to the visible set.
    pub fn selected(&self) -> usize {
        let len = self.visible_records().len();
        if len == 0 {
            0
        } else {
            self.selected.min(len - 1)
        }
    }

    pub fn selected_record(&self) -> Option<&EventRecord> {
        let visible = self.visible_records();
        if visible.is_empty() {
            None
        } else {
            visible.get(self.selected()).copied()
        }
    }

    /// New search from the form. Resets to the first page and refetches.
    pub fn submit_search(&mut self, params: SearchParams) {
        self.last_search = Some(params);
        self.pagination.page = 1;
        self.start_fetch();
    }

    /// Page navigation. Ignored outside [1, total_pages] and before any
    /// search has been issued.
    pub fn change_page(&mut self, page: u32) {
        if self.last_search.is_none() {
            return;
        }
        if self.pagination.set_page(page) {
            self.start_fetch();
        }
    }

    pub fn next_page(&mut self) {
        self.change_page(self.pagination.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.change_page(self.pagination.page.saturating_sub(1));
    }

    /// Queues a status-filter toggle behind the settle delay and raises
    /// its loading toast.
    pub fn toggle_filter(&mut self, status: EventStatus, now: Instant) {
        self.pending_toggles.push_back(PendingToggle {
            status,
            applies_at: now + self.filter_delay,
        });
        self.notifier
            .loading(format!("Filtering by {}...", status.as_str().to_ascii_lowercase()));
    }

    pub fn toggle_dark_mode(&mut self) {
        let dark = !self.theme.dark;
        self.theme = Theme::from_dark_flag(dark);
        if let Err(err) = self.theme_store.save(dark) {
            warn!(error = %err, "failed to persist dark-mode state");
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Drains completed fetches. Responses from superseded generations are
    /// dropped without touching state. Returns true when state changed.
    pub fn pump_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if outcome.generation != self.generation {
                debug!(
                    generation = outcome.generation,
                    current = self.generation,
                    "dropping superseded response"
                );
                continue;
            }
            self.apply_outcome(outcome.result);
            changed = true;
        }
        changed
    }

    /// Advances timers: applies settled filter toggles and prunes toasts.
    pub fn tick(&mut self, now: Instant) {
        while self
            .pending_toggles
            .front()
            .is_some_and(|toggle| toggle.applies_at <= now)
        {
            if let Some(toggle) = self.pending_toggles.pop_front() {
                self.filter.toggle(toggle.status);
                self.notifier.dismiss_loading();
                self.notifier.success(format!(
                    "Filtered to {} events",
                    toggle.status.as_str().to_ascii_lowercase()
                ));
            }
        }
        self.notifier.prune(now);
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.quit(),
                KeyCode::Char('a') => self.toggle_filter(EventStatus::Accept, now),
                KeyCode::Char('r') => self.toggle_filter(EventStatus::Reject, now),
                KeyCode::Char('d') => self.toggle_dark_mode(),
                KeyCode::Char('u') => {
                    if let Some(field) = self.focus.form_field() {
                        self.form.clear_field(field);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Enter => self.submit_from_form(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::PageDown => self.next_page(),
            KeyCode::PageUp => self.previous_page(),
            _ => match self.focus.form_field() {
                Some(field) => self.handle_form_key(field, key),
                None => self.handle_results_key(key),
            },
        }
    }

    fn handle_form_key(&mut self, field: FormField, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Backspace => self.form.pop_char(field),
            KeyCode::Char(c) => self.form.input_char(field, c),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Left => self.previous_page(),
            KeyCode::Right => self.next_page(),
            _ => {}
        }
    }

    fn submit_from_form(&mut self) {
        if let Some(params) = self.form.submit(&mut self.notifier) {
            self.submit_search(params);
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_records().len();
        if len > 0 {
            self.selected = (self.selected() + 1) % len;
        }
    }

    fn select_previous(&mut self) {
        let len = self.visible_records().len();
        if len > 0 {
            let current = self.selected();
            self.selected = if current == 0 { len - 1 } else { current - 1 };
        }
    }

    fn start_fetch(&mut self) {
        let Some(params) = self.last_search.clone() else {
            return;
        };
        self.generation += 1;
        let generation = self.generation;
        self.phase = Phase::Loading;

        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        let page = self.pagination.page;
        let page_size = self.pagination.page_size;
        tokio::spawn(async move {
            let result = api.search(&params, page, page_size).await;
            // The receiver only goes away on shutdown.
            let _ = tx.send(FetchOutcome { generation, result });
        });
    }

    fn apply_outcome(&mut self, result: Result<SearchResponse, ClientError>) {
        match result {
            Ok(response) => {
                self.pagination.apply_summary(&response.summary);
                self.records = response.results;
                self.last_summary = Some(response.summary);
                self.selected = 0;
                if self.records.is_empty() {
                    self.phase = Phase::Empty;
                    self.notifier.info("No events matched your search.");
                } else {
                    self.phase = Phase::Results;
                    self.notifier.success(format!(
                        "Found {} result(s) (out of {})",
                        self.records.len(),
                        self.pagination.total_matches
                    ));
                }
            }
            Err(err) => {
                warn!(error = %err, "search request failed");
                self.notifier.error(format!("Error fetching data: {}", err));
                // Whatever was on screen stays on screen.
                self.phase = if self.records.is_empty() {
                    Phase::Empty
                } else {
                    Phase::Results
                };
            }
        }
    }
}
