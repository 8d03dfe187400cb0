use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Phase, ViewState};
use crate::config::SourceMode;
use crate::models::{Entry, EntrySource};

// Tags shown per row in the list; the detail pane shows all of them.
const LIST_TAG_LIMIT: usize = 2;

pub fn draw<S>(frame: &mut Frame, app: &App<S>) {
    let state = &app.state;

    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: entry list
            Constraint::Ratio(2, 3), // Right pane: entry detail
        ])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Entry list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Entry title
            Constraint::Min(0),    // Entry content
            Constraint::Length(1), // Tags
        ])
        .split(main_chunks[1]);

    render_header(frame, state, left_chunks[0]);
    render_search(frame, state, app.search_active, left_chunks[1]);
    render_body(frame, state, left_chunks[2]);
    render_left_status(frame, state, app.search_active, left_chunks[3]);

    render_entry_title(frame, state, right_chunks[0]);
    render_entry_content(frame, state, right_chunks[1]);
    render_entry_tags(frame, state, right_chunks[2]);

    if app.show_help {
        render_help(frame, state.mode());
    }
}

fn render_header(frame: &mut Frame, state: &ViewState, area: Rect) {
    let title = match state.mode() {
        SourceMode::Dual => format!(" Diary Reader [{}] ", state.filter().label()),
        SourceMode::Single => " Diary Reader ".to_string(),
    };

    let novels = state
        .entries()
        .iter()
        .filter(|e| e.source == EntrySource::Novel)
        .count();
    let stats = match state.mode() {
        SourceMode::Dual => format!(
            " {} Diaries | {} Novels | {} Shown",
            state.entries().len() - novels,
            novels,
            state.visible_entries().len()
        ),
        SourceMode::Single => format!(
            " {} Entries | {} Shown",
            state.entries().len(),
            state.visible_entries().len()
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_search(frame: &mut Frame, state: &ViewState, active: bool, area: Rect) {
    let border = if active { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let text = if active {
        format!("> {}_", state.query())
    } else if state.query().is_empty() {
        "Press / to search...".to_string()
    } else {
        format!("> {}", state.query())
    };

    let style = if active || !state.query().is_empty() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_body(frame: &mut Frame, state: &ViewState, area: Rect) {
    match state.phase() {
        Phase::Idle => render_message(frame, area, "", Color::DarkGray),
        Phase::Loading => {
            let text = format!("{} Loading entries...", state.spinner());
            render_message(frame, area, &text, Color::Cyan);
        }
        Phase::Failed(message) => {
            let text = format!("❌ {message}\n\nPress r to retry.");
            render_message(frame, area, &text, Color::Red);
        }
        Phase::Loaded => {
            if state.visible_entries().is_empty() {
                let text = if state.query().is_empty() {
                    "📝 No entries yet.".to_string()
                } else {
                    format!("🔍 No entries match \"{}\".", state.query())
                };
                render_message(frame, area, &text, Color::DarkGray);
            } else {
                render_entry_list(frame, state, area);
            }
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_entry_list(frame: &mut Frame, state: &ViewState, area: Rect) {
    let opened_id = state.opened().map(|e| e.id.as_str());

    let items: Vec<ListItem> = state
        .visible_entries()
        .into_iter()
        .map(|entry| {
            let title_style = if Some(entry.id.as_str()) == opened_id {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            let mut lines = vec![Line::from(vec![
                Span::styled(entry.display_date(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                badge(entry),
                Span::raw(" "),
                Span::styled(entry.title.clone(), title_style),
            ])];

            let tags = entry.display_tags(Some(LIST_TAG_LIMIT));
            if !tags.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", tags.join(" ")),
                    Style::default().fg(Color::Blue),
                )));
            }

            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor()));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn badge(entry: &Entry) -> Span<'static> {
    let color = match entry.source {
        EntrySource::Summary => Color::Green,
        EntrySource::Novel => Color::Magenta,
    };
    Span::styled(
        format!("[{}]", entry.source.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_left_status(frame: &mut Frame, state: &ViewState, search_active: bool, area: Rect) {
    let status = if search_active {
        "Enter:done  Esc:clear"
    } else if state.phase() == &Phase::Loading {
        "Fetching entries..."
    } else if state.mode() == SourceMode::Dual {
        "j/k:nav  /:search  f:filter  r:reload  ?:help  q:quit"
    } else {
        "j/k:nav  /:search  r:reload  ?:help  q:quit"
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_entry_title(frame: &mut Frame, state: &ViewState, area: Rect) {
    let block = Block::default()
        .title(" Entry ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let line = match state.opened() {
        Some(entry) => Line::from(vec![
            Span::styled(entry.display_date(), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            badge(entry),
            Span::raw(" "),
            Span::styled(
                entry.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from("No entry selected"),
    };

    let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_entry_content(frame: &mut Frame, state: &ViewState, area: Rect) {
    let content = state
        .opened()
        .map(|e| e.content.clone())
        .unwrap_or_else(|| "Press Enter to read the selected entry...".to_string());

    let block = Block::default()
        .title(" Content ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll(), 0));

    frame.render_widget(paragraph, area);
}

fn render_entry_tags(frame: &mut Frame, state: &ViewState, area: Rect) {
    let text = match state.opened() {
        Some(entry) => {
            let tags = entry.display_tags(None).join(" ");
            if tags.is_empty() {
                "x:close  PgUp/PgDn:scroll".to_string()
            } else {
                format!("{tags} | x:close  PgUp/PgDn:scroll")
            }
        }
        None => String::new(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::Blue));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, mode: SourceMode) {
    let area = centered_rect(50, 80, frame.area());

    let mut help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   < / >    Jump to top / bottom",
        "   Enter    Open entry",
        "   x / Esc  Close entry",
        "   PgDn     Scroll entry",
        "",
        " Search:",
        "   /        Search titles, content and tags",
        "   c        Clear search",
    ];

    if mode == SourceMode::Dual {
        help_text.extend([
            "",
            " Filter:",
            "   f        Cycle All / Summaries / Novels",
            "   1 2 3    All / Summaries / Novels",
        ]);
    }

    help_text.extend([
        "",
        " General:",
        "   r        Reload / retry",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ]);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Result;
    use crate::feed::Aggregator;
    use crate::models::RawRecord;
    use crate::store::{Query, RecordStore};
    use ratatui::{backend::TestBackend, Terminal};

    struct EmptyStore;

    impl RecordStore for EmptyStore {
        async fn query(&self, _collection: &str, _query: &Query) -> Result<Vec<RawRecord>> {
            Ok(Vec::new())
        }
    }

    fn rendered(app: &App<EmptyStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn shows_configuration_error_with_retry_hint() {
        let config = Config::default();
        let mut app: App<EmptyStore> = App::new(&config, Err("store not configured".to_string()));
        app.start_fetch();

        let screen = rendered(&app);

        assert!(screen.contains("store not configured"));
        assert!(screen.contains("Press r to retry."));
    }

    #[tokio::test]
    async fn renders_help_overlay() {
        let config = Config::default();
        let mut app = App::new(&config, Ok(Aggregator::new(EmptyStore, &config)));
        app.show_help = true;

        let screen = rendered(&app);

        assert!(screen.contains("Help"));
        assert!(screen.contains("Cycle All / Summaries / Novels"));
    }
}
