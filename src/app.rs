use ratatui::{layout::Rect, widgets::ListState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::mail::{
    FETCH_FAILED, FetchOutcome, FetchRequest, Message, body_text, export_message,
};
use crate::poller::{Debounce, Poller, SETTINGS_DEBOUNCE};
use crate::settings::{Settings, SettingsField, parse_interval};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Inbox,
    Settings,
}

pub struct App {
    pub config: Arc<Config>,
    pub settings: Settings,
    pub tab: Tab,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,

    // Authoritative list, replaced wholesale on every successful fetch
    pub emails: Vec<Message>,
    pub error: Option<String>,
    in_flight: Option<u64>,
    next_token: u64,

    // Filter
    pub filter: String,
    pub searching: bool,
    pub filtered_indices: Vec<usize>,
    pub list_state: ListState,

    // Detail modal
    pub selected: Option<Message>,
    pub detail_body: String,
    pub detail_scroll: u16,

    // Settings form
    pub settings_field: SettingsField,
    pub interval_input: String,

    // Mouse tracking
    pub list_area: Rect,
    pub detail_area: Rect,

    poller: Poller,
    settings_debounce: Debounce,
    spinner: usize,
}

impl App {
    pub fn new(config: Arc<Config>) -> Self {
        let settings = Settings::from_config(&config);
        let interval_input = settings.refresh_interval_secs.to_string();

        Self {
            config,
            settings,
            tab: Tab::Inbox,
            should_quit: false,
            status_message: None,
            status_is_error: false,
            emails: Vec::new(),
            error: None,
            in_flight: None,
            next_token: 1,
            filter: String::new(),
            searching: false,
            filtered_indices: Vec::new(),
            list_state: ListState::default(),
            selected: None,
            detail_body: String::new(),
            detail_scroll: 0,
            settings_field: SettingsField::Namespace,
            interval_input,
            list_area: Rect::default(),
            detail_area: Rect::default(),
            poller: Poller::new(),
            settings_debounce: Debounce::new(SETTINGS_DEBOUNCE),
            spinner: 0,
        }
    }

    /// Arm the poll timer and request the initial fetch
    pub fn start(&mut self, now: Instant) -> Option<FetchRequest> {
        self.poller.reconcile(&self.settings, now);
        self.begin_fetch()
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
        self.status_is_error = false;
    }

    pub fn set_error_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER[self.spinner % SPINNER.len()]
    }

    // ---- Fetching ----

    /// Start a fetch unless one is already outstanding
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        if let Some(token) = self.in_flight {
            log::debug!("fetch #{} still in flight, skipping", token);
            return None;
        }

        let token = self.next_token;
        self.next_token += 1;
        self.in_flight = Some(token);
        self.error = None;

        Some(FetchRequest {
            token,
            query: self.settings.query(&self.config.api.base_url),
        })
    }

    /// Apply a finished fetch. Outcomes of superseded requests are dropped.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        if self.in_flight != Some(outcome.token) {
            log::debug!("dropping outcome of superseded fetch #{}", outcome.token);
            return;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(emails) => {
                log::info!("fetch #{}: {} message(s)", outcome.token, emails.len());
                self.emails = emails;
                self.error = None;
                self.apply_filter();
            }
            Err(e) => {
                log::warn!("fetch #{} failed: {}", outcome.token, e);
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    /// The request never left (e.g. the worker thread could not start)
    pub fn abort_fetch(&mut self, token: u64, reason: &str) {
        if self.in_flight == Some(token) {
            log::warn!("fetch #{} aborted: {}", token, reason);
            self.in_flight = None;
            self.error = Some(FETCH_FAILED.to_string());
        }
    }

    /// Advance timers; returns a fetch to issue if the poll timer or a
    /// settings edit asks for one
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        if self.is_loading() {
            self.spinner = self.spinner.wrapping_add(1);
        }

        let debounced = self.settings_debounce.ready(now);
        let timer = self.poller.due(now);
        if debounced || timer {
            return self.begin_fetch();
        }
        None
    }

    // ---- Filtering ----

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.apply_filter();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.apply_filter();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.apply_filter();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.apply_filter();
    }

    /// Recompute filtered_indices from the authoritative list
    pub fn apply_filter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.filtered_indices = self
            .emails
            .iter()
            .enumerate()
            .filter(|(_, m)| m.matches(&needle))
            .map(|(i, _)| i)
            .collect();

        // Preserve cursor if possible, otherwise reset
        match self.list_state.selected() {
            Some(i) if i < self.filtered_indices.len() => {}
            _ if !self.filtered_indices.is_empty() => self.list_state.select(Some(0)),
            _ => self.list_state.select(None),
        }
    }

    pub fn filtered(&self) -> Vec<&Message> {
        self.filtered_indices
            .iter()
            .filter_map(|&i| self.emails.get(i))
            .collect()
    }

    pub fn cursor_message(&self) -> Option<&Message> {
        self.list_state
            .selected()
            .and_then(|i| self.filtered_indices.get(i))
            .and_then(|&idx| self.emails.get(idx))
    }

    pub fn next(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let max = self.filtered_indices.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(max),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    // ---- Selection ----

    /// Open a message in the detail view. Re-selecting the open message is a no-op.
    pub fn select(&mut self, message: Message) {
        if self.selected.as_ref() == Some(&message) {
            return;
        }
        let cols = self.detail_area.width.saturating_sub(2).max(80);
        self.detail_body = body_text(&message, cols);
        self.detail_scroll = 0;
        self.selected = Some(message);
    }

    /// Open the message under the list cursor
    pub fn select_current(&mut self) {
        if let Some(message) = self.cursor_message().cloned() {
            self.select(message);
        }
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
        self.detail_body.clear();
        self.detail_scroll = 0;
    }

    pub fn detail_scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(3);
    }

    pub fn detail_scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(3);
    }

    /// Save the open message as JSON into the export directory
    pub fn export_selected(&mut self) -> Option<PathBuf> {
        let message = self.selected.as_ref()?;
        match export_message(message, &self.config.export.resolved_dir()) {
            Ok(path) => {
                self.set_status(&format!("Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                log::warn!("export failed: {:#}", e);
                self.set_error_status(&format!("Export failed: {}", e));
                None
            }
        }
    }

    // ---- Settings ----

    /// Replace the live settings. Re-arms the poll timer and schedules a
    /// refresh; a fetch still running against the old inbox or key is
    /// superseded.
    pub fn commit_settings(&mut self, settings: Settings, now: Instant) {
        if settings == self.settings {
            return;
        }
        let source_changed = !self.settings.same_source(&settings);
        self.settings = settings;
        self.poller.reconcile(&self.settings, now);
        self.settings_debounce.schedule(now);

        if source_changed {
            if let Some(token) = self.in_flight.take() {
                log::debug!("fetch #{} superseded by settings change", token);
            }
        }
    }

    pub fn focus_field(&mut self, field: SettingsField) {
        if self.settings_field == SettingsField::Interval && field != SettingsField::Interval {
            self.interval_input = self.settings.refresh_interval_secs.to_string();
        }
        self.settings_field = field;
    }

    pub fn next_field(&mut self) {
        self.focus_field(self.settings_field.next());
    }

    pub fn prev_field(&mut self) {
        self.focus_field(self.settings_field.prev());
    }

    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        let mut settings = self.settings.clone();
        settings.auto_refresh = !settings.auto_refresh;
        self.commit_settings(settings, now);
    }

    /// Apply an edit to the focused text field
    pub fn edit_setting(&mut self, edit: impl FnOnce(&mut String), now: Instant) {
        let mut settings = self.settings.clone();
        match self.settings_field {
            SettingsField::Namespace => edit(&mut settings.namespace),
            SettingsField::ApiKey => edit(&mut settings.api_key),
            SettingsField::Interval => {
                edit(&mut self.interval_input);
                settings.refresh_interval_secs = parse_interval(&self.interval_input);
            }
            SettingsField::AutoRefresh => return,
        }
        self.commit_settings(settings, now);
    }

    // ---- Mouse ----

    pub fn set_list_area(&mut self, area: Rect) {
        self.list_area = area;
    }

    pub fn set_detail_area(&mut self, area: Rect) {
        self.detail_area = area;
    }

    /// Handle click at (x, y). Clicking a row opens it; clicking outside the
    /// open detail view closes it.
    pub fn handle_click(&mut self, x: u16, y: u16) {
        if self.selected.is_some() {
            if !contains(self.detail_area, x, y) {
                self.dismiss();
            }
            return;
        }
        // Rows are hidden behind the error message
        if self.error.is_some() {
            return;
        }
        if self.tab != Tab::Inbox || !contains(self.list_area, x, y) {
            return;
        }
        // Row under the cursor, accounting for border and scroll offset
        let visual_row = y.saturating_sub(self.list_area.y + 1) as usize;
        let actual_row = visual_row + self.list_state.offset();
        if y > self.list_area.y && actual_row < self.filtered_indices.len() {
            self.list_state.select(Some(actual_row));
            self.select_current();
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
