use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::feed::Aggregator;
use crate::models::Entry;
use crate::store::RecordStore;
use crate::tui::AppAction;

mod state;

pub use state::{Phase, ViewState};

const DETAIL_SCROLL_STEP: u16 = 10;

// Message for a finished fetch
pub struct FetchResult {
    pub generation: u64,
    pub result: std::result::Result<Vec<Entry>, String>,
}

pub struct App<S> {
    pub state: ViewState,

    // UI State
    pub search_active: bool,
    pub show_help: bool,

    // Async state
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,

    // Services
    aggregator: std::result::Result<Arc<Aggregator<S>>, String>,
}

impl<S> App<S>
where
    S: RecordStore + 'static,
{
    /// `aggregator` is the configuration error message when no store could be built;
    /// it surfaces as a failed fetch rather than stopping the reader.
    pub fn new(config: &Config, aggregator: std::result::Result<Aggregator<S>, String>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(4);

        Self {
            state: ViewState::new(config.mode),
            search_active: false,
            show_help: false,
            fetch_rx,
            fetch_tx,
            aggregator: aggregator.map(Arc::new),
        }
    }

    /// Starts a fresh aggregation in the background. Any fetch already in
    /// flight keeps running, but its result will no longer be committed.
    pub fn start_fetch(&mut self) {
        let generation = self.state.begin_fetch();

        let aggregator = match &self.aggregator {
            Ok(aggregator) => Arc::clone(aggregator),
            Err(message) => {
                tracing::warn!("Cannot fetch entries: {}", message);
                self.state.complete_fetch(generation, Err(message.clone()));
                return;
            }
        };

        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            // The failing query has already been logged by the aggregator.
            let result = aggregator.fetch_all().await.map_err(|e| e.user_message());
            let _ = tx.send(FetchResult { generation, result }).await;
        });
    }

    /// Poll for finished fetches (non-blocking)
    pub fn poll_fetch_result(&mut self) {
        while let Ok(FetchResult { generation, result }) = self.fetch_rx.try_recv() {
            if !self.state.complete_fetch(generation, result) {
                tracing::debug!("Dropped result of superseded fetch #{}", generation);
            }
        }
    }

    pub fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => self.state.move_up(),
            AppAction::MoveDown => self.state.move_down(),
            AppAction::MoveToTop => self.state.move_to_top(),
            AppAction::MoveToBottom => self.state.move_to_bottom(),

            AppAction::OpenEntry => self.state.open_selected(),
            AppAction::CloseEntry => self.state.close_detail(),
            AppAction::ScrollDetailDown => self.state.scroll_detail_down(DETAIL_SCROLL_STEP),
            AppAction::ScrollDetailUp => self.state.scroll_detail_up(DETAIL_SCROLL_STEP),

            AppAction::Reload => self.start_fetch(),

            AppAction::CycleFilter => self.state.cycle_filter(),
            AppAction::SetFilter(filter) => self.state.set_filter(filter),

            AppAction::StartSearch => self.search_active = true,
            AppAction::ClearSearch => self.state.clear_query(),
            AppAction::SearchChar(c) => self.state.push_query_char(c),
            AppAction::SearchBackspace => self.state.pop_query_char(),
            AppAction::SearchConfirm => self.search_active = false,
            AppAction::SearchCancel => {
                self.search_active = false;
                self.state.clear_query();
            }

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }

        false
    }
}
