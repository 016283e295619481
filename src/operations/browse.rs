use crate::db::query::TransactionQuery;
use crate::db::repository::TransactionStore;
use crate::error::AppError;
use crate::models::transaction::Transaction;
use crate::operations::fetch::PendingFetch;
use crate::operations::format::{signed_amount, truncate};
use crate::operations::modal::ModalToggle;
use crate::operations::print::card_fields;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::cmp::max;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

// Border, title row, gap, four label rows, border.
const CARD_HEIGHT: u16 = 8;
const ADD_BUTTON_WIDTH: u16 = 9;
const TICK: Duration = Duration::from_millis(100);

pub struct BrowseState {
    query: TransactionQuery,
    transactions: Vec<Transaction>,
    fetch: Option<PendingFetch>,
    fetch_error: Option<String>,
    modal: ModalToggle,
    scroll: usize,

    // Cached per-draw
    last_page_size: usize,
}

impl BrowseState {
    /// Starts the one and only read for this view.
    pub fn activate(runtime: &Handle, store: Arc<dyn TransactionStore>) -> Self {
        let query = TransactionQuery::recent();
        let fetch = PendingFetch::spawn(runtime, store, query.clone());

        Self {
            query,
            transactions: Vec::new(),
            fetch: Some(fetch),
            fetch_error: None,
            modal: ModalToggle::default(),
            scroll: 0,
            last_page_size: 1,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn modal(&self) -> ModalToggle {
        self.modal
    }

    /// Takes the fetch result if it has arrived. A failed read leaves the
    /// list empty.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(fetch) = self.fetch.as_mut() else {
            return false;
        };
        let Some(result) = fetch.poll() else {
            return false;
        };
        self.fetch = None;

        match result {
            Ok(rows) => {
                self.transactions = self.query.apply(rows);
                info!(count = self.transactions.len(), "transactions loaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to load transactions");
                self.fetch_error = Some(e.to_string());
            }
        }
        true
    }

    fn scroll_by(&mut self, delta: isize) {
        let max_scroll = self.transactions.len().saturating_sub(1) as isize;
        let next = (self.scroll as isize + delta).clamp(0, max(0, max_scroll));
        self.scroll = next as usize;
    }

    fn page_up(&mut self) {
        let page = max(1, self.last_page_size) as isize;
        self.scroll_by(-page);
    }

    fn page_down(&mut self) {
        let page = max(1, self.last_page_size) as isize;
        self.scroll_by(page);
    }

    fn press_add(&mut self) {
        self.modal.open();
    }
}

pub fn run_browse(runtime: &Handle, store: Arc<dyn TransactionStore>) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = (|| -> Result<(), AppError> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        let mut state = BrowseState::activate(runtime, store);

        loop {
            state.poll_fetch();
            terminal.draw(|frame| draw(frame, &mut state))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(&mut state, key) {
                        break;
                    }
                }
            }
        }

        info!("closing transaction view");
        Ok(())
    })();

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

/// Returns `true` when the view should close.
pub fn handle_key(state: &mut BrowseState, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // The dialog captures input while it is up.
    if state.modal.is_visible() {
        match key.code {
            KeyCode::Esc => state.modal.request_close(),
            KeyCode::Enter | KeyCode::Char('h') => state.modal.hide(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('a') => state.press_add(),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_by(-1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_by(1),
        KeyCode::PageUp => state.page_up(),
        KeyCode::PageDown => state.page_down(),
        KeyCode::Home => state.scroll = 0,
        KeyCode::End => state.scroll = state.transactions.len().saturating_sub(1),
        _ => {}
    }

    false
}

pub fn draw(frame: &mut Frame, state: &mut BrowseState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(3),
        ])
        .split(area);

    render_heading(frame, layout[0], state);
    render_cards(frame, layout[1], state);
    render_footer(frame, layout[2], state);

    if state.modal().is_visible() {
        render_modal(frame, area);
    }
}

fn render_heading(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let mut spans = vec![Span::styled(
        "Your Transactions",
        Style::default().fg(Color::White).bold(),
    )];
    if !state.transactions().is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} most recent", state.transactions().len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(block).alignment(Alignment::Left),
        area,
    );
}

fn render_cards(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let visible = max(1, (area.height / CARD_HEIGHT) as usize);
    state.last_page_size = visible;

    if state.transactions.is_empty() {
        let message = if state.is_loading() {
            "Loading transactions…"
        } else {
            "No transactions to show"
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let cards = state.transactions.iter().skip(state.scroll).take(visible);
    for (slot, tx) in cards.enumerate() {
        let y = area.y + slot as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        render_card(frame, Rect::new(area.x, y, area.width, height), tx);
    }
}

fn render_card(frame: &mut Frame, area: Rect, tx: &Transaction) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let amount = signed_amount(tx);
    let amount_color = if tx.transaction_type.is_expense() {
        Color::LightRed
    } else {
        Color::LightGreen
    };
    let title = truncate(&tx.title, width.saturating_sub(amount.width() + 1));

    let mut lines = vec![
        spread_line(
            Span::styled(title, Style::default().fg(Color::White).bold()),
            Span::styled(amount, Style::default().fg(amount_color)),
            width,
        ),
        Line::from(""),
    ];
    for (label, value) in card_fields(tx) {
        lines.push(spread_line(
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::Gray)),
            width,
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Left span flush left, right span flush right, measured in columns.
fn spread_line<'a>(left: Span<'a>, right: Span<'a>, width: usize) -> Line<'a> {
    let used = left.width() + right.width();
    let gap = Span::raw(" ".repeat(width.saturating_sub(used)));
    Line::from(vec![left, gap, right])
}

fn render_footer(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(ADD_BUTTON_WIDTH)])
        .split(area);

    let hint = if state.modal.is_visible() {
        "Enter/h hide  Esc close"
    } else {
        "↑/↓ scroll  PgUp/PgDn page  a add  q/Esc exit"
    };

    let mut spans = Vec::new();
    if state.fetch_error().is_some() {
        spans.push(Span::styled(
            "Could not load transactions",
            Style::default().fg(Color::Red),
        ));
        spans.push(Span::raw("  |  "));
    } else if state.is_loading() {
        spans.push(Span::styled("Loading…", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw("  |  "));
    }
    spans.push(Span::raw(hint));

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        columns[0],
    );

    render_add_button(frame, columns[1]);
}

fn render_add_button(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new("Add")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bg(Color::Green).bold()),
        area,
    );
}

fn render_modal(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Hello World!", Style::default().bold())),
        Line::from(""),
        Line::from(Span::styled(
            "[ Hide Modal ]",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/h hide  Esc close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title("Add");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Rgb(40, 40, 40)))
            .wrap(Wrap { trim: false }),
        popup_area,
    );
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
