use crate::config::SourceMode;
use crate::feed::visible;
use crate::models::{Entry, KindFilter};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Everything the reader shows. Only the methods below mutate it; the
/// renderer borrows it immutably once per frame.
#[derive(Debug, Default)]
pub struct ViewState {
    entries: Vec<Entry>,
    phase: Phase,
    generation: u64,
    mode: SourceMode,
    query: String,
    filter: KindFilter,
    cursor: usize,
    opened: Option<Entry>,
    detail_scroll: u16,
    spinner_frame: usize,
}

impl ViewState {
    pub fn new(mode: SourceMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // Accessors

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn opened(&self) -> Option<&Entry> {
        self.opened.as_ref()
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn visible_entries(&self) -> Vec<&Entry> {
        visible(&self.entries, &self.query, self.filter)
    }

    pub fn cursor_entry(&self) -> Option<&Entry> {
        self.visible_entries().get(self.cursor).copied()
    }

    // Fetch lifecycle

    /// Enters `Loading` and returns the generation the new fetch must report back with.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    /// Commits a fetch outcome. Results from a superseded fetch are ignored
    /// and `false` is returned. A failure discards the previous entries.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: std::result::Result<Vec<Entry>, String>,
    ) -> bool {
        if generation != self.generation || self.phase != Phase::Loading {
            return false;
        }

        match result {
            Ok(entries) => {
                self.entries = entries;
                self.phase = Phase::Loaded;
                self.clamp_cursor();
            }
            Err(message) => {
                self.entries.clear();
                self.opened = None;
                self.cursor = 0;
                self.phase = Phase::Failed(message);
            }
        }
        true
    }

    // Search and filter

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor = 0;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.cursor = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.cursor = 0;
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// The kind filter only exists when both collections are shown.
    pub fn set_filter(&mut self, filter: KindFilter) {
        if self.mode == SourceMode::Single {
            return;
        }
        self.filter = filter;
        self.cursor = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.cycle());
    }

    // Navigation

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.visible_entries().len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.visible_entries().len().saturating_sub(1);
    }

    // Detail

    /// Opens the entry under the cursor, replacing any open entry.
    pub fn open_selected(&mut self) {
        if let Some(entry) = self.cursor_entry().cloned() {
            self.opened = Some(entry);
            self.detail_scroll = 0;
        }
    }

    pub fn close_detail(&mut self) {
        self.opened = None;
        self.detail_scroll = 0;
    }

    pub fn scroll_detail_down(&mut self, lines: u16) {
        if self.opened.is_some() {
            self.detail_scroll = self.detail_scroll.saturating_add(lines);
        }
    }

    pub fn scroll_detail_up(&mut self, lines: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn tick_spinner(&mut self) {
        if self.phase == Phase::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_entries().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntrySource;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, day: u32, source: EntrySource, title: &str) -> Entry {
        Entry {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).single(),
            title: title.to_string(),
            content: String::new(),
            tags: Vec::new(),
            source,
        }
    }

    fn feed() -> Vec<Entry> {
        vec![
            entry("3", 3, EntrySource::Novel, "Rain"),
            entry("2", 2, EntrySource::Summary, "Sunny day"),
            entry("1", 1, EntrySource::Summary, "Rainbow"),
        ]
    }

    fn loaded() -> ViewState {
        let mut state = ViewState::new(SourceMode::Dual);
        let generation = state.begin_fetch();
        assert!(state.complete_fetch(generation, Ok(feed())));
        state
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = ViewState::new(SourceMode::Dual);
        assert_eq!(state.phase(), &Phase::Idle);
        assert!(state.entries().is_empty());
        assert!(state.cursor_entry().is_none());
    }

    #[test]
    fn successful_fetch_loads_entries() {
        let state = loaded();
        assert_eq!(state.phase(), &Phase::Loaded);
        assert_eq!(state.entries().len(), 3);
        assert_eq!(state.cursor_entry().map(|e| e.id.as_str()), Some("3"));
    }

    #[test]
    fn failed_fetch_discards_previous_entries() {
        let mut state = loaded();
        state.open_selected();

        let generation = state.begin_fetch();
        assert!(state.complete_fetch(generation, Err("network down".to_string())));

        assert_eq!(state.phase(), &Phase::Failed("network down".to_string()));
        assert!(state.entries().is_empty());
        assert!(state.opened().is_none());
    }

    #[test]
    fn retry_after_failure_reloads() {
        let mut state = ViewState::new(SourceMode::Dual);
        let first = state.begin_fetch();
        state.complete_fetch(first, Err("boom".to_string()));

        let retry = state.begin_fetch();
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.complete_fetch(retry, Ok(feed())));
        assert_eq!(state.phase(), &Phase::Loaded);
    }

    #[test]
    fn stale_fetch_results_are_ignored() {
        let mut state = ViewState::new(SourceMode::Dual);
        let older = state.begin_fetch();
        let newer = state.begin_fetch();

        assert!(state.complete_fetch(newer, Ok(feed())));
        assert!(!state.complete_fetch(older, Err("late failure".to_string())));

        assert_eq!(state.phase(), &Phase::Loaded);
        assert_eq!(state.entries().len(), 3);
    }

    #[test]
    fn query_narrows_visible_entries_and_resets_cursor() {
        let mut state = loaded();
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor(), 2);

        for c in "RAIN".chars() {
            state.push_query_char(c);
        }

        assert_eq!(state.cursor(), 0);
        let ids: Vec<&str> = state.visible_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);

        state.pop_query_char();
        assert_eq!(state.query(), "RAI");
        state.clear_query();
        assert_eq!(state.visible_entries().len(), 3);
    }

    #[test]
    fn filter_applies_with_query() {
        let mut state = loaded();
        state.set_query("rain");
        state.set_filter(KindFilter::Summary);

        let ids: Vec<&str> = state.visible_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        state.cycle_filter();
        assert_eq!(state.filter(), KindFilter::Novel);
    }

    #[test]
    fn single_source_mode_has_no_kind_filter() {
        let mut state = ViewState::new(SourceMode::Single);
        state.set_filter(KindFilter::Novel);
        state.cycle_filter();
        assert_eq!(state.filter(), KindFilter::All);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut state = loaded();
        state.move_up();
        assert_eq!(state.cursor(), 0);

        state.move_to_bottom();
        assert_eq!(state.cursor(), 2);
        state.move_down();
        assert_eq!(state.cursor(), 2);

        state.move_to_top();
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn selecting_replaces_and_closing_clears() {
        let mut state = loaded();
        state.open_selected();
        assert_eq!(state.opened().map(|e| e.id.as_str()), Some("3"));

        state.scroll_detail_down(5);
        state.move_down();
        state.open_selected();
        assert_eq!(state.opened().map(|e| e.id.as_str()), Some("2"));
        assert_eq!(state.detail_scroll(), 0);

        state.close_detail();
        assert!(state.opened().is_none());
    }

    #[test]
    fn reload_clamps_cursor_to_new_feed() {
        let mut state = loaded();
        state.move_to_bottom();

        let generation = state.begin_fetch();
        state.complete_fetch(generation, Ok(vec![entry("9", 9, EntrySource::Summary, "Only")]));

        assert_eq!(state.cursor(), 0);
        assert_eq!(state.cursor_entry().map(|e| e.id.as_str()), Some("9"));
    }
}
