use anyhow::{Context, Result};
use auction_live::engine::{
    countdown::{CountdownDisplay, CountdownSet, Severity},
    money::format_usd,
    poller::SharedAuctionView,
    types::BidRecord,
    validate::validate_bid_amount,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::Decimal;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    None,
    BidInput,
    Filter,
}

struct ConsoleState {
    countdowns: CountdownSet,
    countdown_lines: Vec<(String, CountdownDisplay)>,
    last_countdown_tick: Option<Instant>,
    min_bid: Option<Decimal>,
    bid_input: String,
    filter: String,
    focus: Focus,
    show_help: bool,
    table_state: TableState,
}

#[derive(Clone)]
struct BidSectionSnapshot {
    history: Vec<BidRecord>,
    current_bid: Option<Decimal>,
    highlighted: bool,
}

pub(crate) async fn run_tui(
    page_path: &str,
    countdowns: CountdownSet,
    view: SharedAuctionView,
    min_bid: Option<Decimal>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("terminal init")?;

    let mut state = ConsoleState {
        countdowns,
        countdown_lines: Vec::new(),
        last_countdown_tick: None,
        min_bid,
        bid_input: String::new(),
        filter: String::new(),
        focus: Focus::None,
        show_help: false,
        table_state: TableState::default(),
    };

    let tick_rate = Duration::from_millis(200);
    loop {
        // Countdown widgets re-render once per second, first tick immediately.
        let tick_due = state
            .last_countdown_tick
            .is_none_or(|t| t.elapsed() >= Duration::from_secs(1));
        if tick_due {
            state.countdown_lines = state.countdowns.tick_all(chrono::Utc::now());
            state.last_countdown_tick = Some(Instant::now());
        }

        let snap = {
            let guard = view.read().await;
            BidSectionSnapshot {
                history: guard.bid_history().to_vec(),
                current_bid: guard.current_bid(),
                highlighted: guard.highlighted(chrono::Utc::now()),
            }
        };

        terminal.draw(|f| draw(f, page_path, &snap, &mut state))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(key.code, key.modifiers, &mut state) {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    teardown_tui(terminal)?;
    Ok(())
}

/// Returns true when the console should quit.
fn handle_key(code: KeyCode, mods: KeyModifiers, state: &mut ConsoleState) -> bool {
    // Ctrl+/ jumps to the bidder filter from anywhere, the search shortcut.
    if code == KeyCode::Char('/') && mods.contains(KeyModifiers::CONTROL) {
        state.show_help = false;
        state.focus = Focus::Filter;
        return false;
    }

    // Esc dismisses the open overlay before anything else, like the modals.
    if state.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            state.show_help = false;
        }
        return false;
    }

    match state.focus {
        Focus::BidInput => match code {
            KeyCode::Esc | KeyCode::Enter => state.focus = Focus::None,
            KeyCode::Backspace => {
                state.bid_input.pop();
            }
            KeyCode::Char(c) => state.bid_input.push(c),
            _ => {}
        },
        Focus::Filter => match code {
            KeyCode::Esc => {
                state.filter.clear();
                state.focus = Focus::None;
            }
            KeyCode::Enter => state.focus = Focus::None,
            KeyCode::Backspace => {
                state.filter.pop();
            }
            KeyCode::Char(c) => state.filter.push(c),
            _ => {}
        },
        Focus::None => match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('?') | KeyCode::Char('h') => state.show_help = true,
            KeyCode::Char('b') => state.focus = Focus::BidInput,
            KeyCode::Char('/') => state.focus = Focus::Filter,
            KeyCode::Down => {
                state
                    .table_state
                    .select(Some(state.table_state.selected().unwrap_or(0).saturating_add(1)));
            }
            KeyCode::Up => {
                state
                    .table_state
                    .select(Some(state.table_state.selected().unwrap_or(0).saturating_sub(1)));
            }
            _ => {}
        },
    }
    false
}

fn severity_style(d: &CountdownDisplay) -> Style {
    let style = match d.severity {
        Severity::Normal => Style::default(),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Critical => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Severity::Ended => Style::default().fg(Color::Red),
    };
    if d.urgent {
        style.add_modifier(Modifier::SLOW_BLINK)
    } else {
        style
    }
}

fn draw(f: &mut Frame, page_path: &str, snap: &BidSectionSnapshot, state: &mut ConsoleState) {
    let countdown_height = state.countdown_lines.len().max(1) as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(countdown_height),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_countdowns(f, chunks[0], page_path, state);
    draw_current_bid(f, chunks[1], snap);
    draw_bid_form(f, chunks[2], snap, state);
    draw_bid_history(f, chunks[3], snap, state);
    draw_footer(f, chunks[4]);

    if state.show_help {
        draw_help_overlay(f);
    }
}

fn draw_countdowns(f: &mut Frame, area: Rect, page_path: &str, state: &ConsoleState) {
    let lines: Vec<Line> = if state.countdown_lines.is_empty() {
        vec![Line::from(Span::styled(
            "no countdown on this page",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .countdown_lines
            .iter()
            .map(|(label, d)| {
                Line::from(vec![
                    Span::raw(format!("{label}: ")),
                    Span::styled(d.text.clone(), severity_style(d)),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(format!("Auction {page_path}"))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_current_bid(f: &mut Frame, area: Rect, snap: &BidSectionSnapshot) {
    let text = snap
        .current_bid
        .map(format_usd)
        .unwrap_or_else(|| "-".to_string());
    let mut style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    if snap.highlighted {
        // Transient new-bid flash, cleared automatically after two seconds.
        style = style.add_modifier(Modifier::REVERSED);
    }
    let block = Block::default().title("Current Bid").borders(Borders::ALL);
    f.render_widget(
        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_bid_form(f: &mut Frame, area: Rect, snap: &BidSectionSnapshot, state: &ConsoleState) {
    // The page validates against the minimum-bid attribute; here that is the
    // displayed current bid, falling back to the configured minimum.
    let min = snap.current_bid.or(state.min_bid);
    let validity = validate_bid_amount(&state.bid_input, min);
    let enabled = validity.submit_enabled();

    let (status, border) = if state.bid_input.is_empty() {
        ("enter an amount", Color::DarkGray)
    } else if enabled {
        ("submit enabled", Color::Green)
    } else {
        ("submit disabled", Color::Red)
    };

    let cursor = if state.focus == Focus::BidInput { "_" } else { "" };
    let line = Line::from(vec![
        Span::raw(format!("{}{cursor}", state.bid_input)),
        Span::styled(
            format!("  ({status})"),
            Style::default().fg(border).add_modifier(Modifier::DIM),
        ),
    ]);

    let title = match min {
        Some(m) => format!("Your Bid (more than {})", format_usd(m)),
        None => "Your Bid".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_bid_history(f: &mut Frame, area: Rect, snap: &BidSectionSnapshot, state: &mut ConsoleState) {
    let filter = state.filter.to_lowercase();
    let rows: Vec<Row> = snap
        .history
        .iter()
        .filter(|b| filter.is_empty() || b.bidder_name.to_lowercase().contains(&filter))
        .map(|b| {
            Row::new(vec![
                Cell::from(b.bidder_name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(b.timestamp.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format_usd(b.amount)).style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let title = if state.filter.is_empty() && state.focus != Focus::Filter {
        "Bid History".to_string()
    } else {
        let cursor = if state.focus == Focus::Filter { "_" } else { "" };
        format!("Bid History (filter: {}{cursor})", state.filter)
    };

    let header = Row::new(vec![Cell::from("Bidder"), Cell::from("Time"), Cell::from("Amount")])
        .style(Style::default().add_modifier(Modifier::UNDERLINED));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut state.table_state);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints = "q quit · b bid · / filter (Ctrl+/) · ? help · Esc close";
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(50, 40, f.area());
    let lines = vec![
        Line::from("b        edit bid amount"),
        Line::from("/        filter bid history by bidder"),
        Line::from("Ctrl+/   jump to filter from anywhere"),
        Line::from("Up/Down  move through bid history"),
        Line::from("Esc      close this / clear focus"),
        Line::from("q        quit"),
    ];
    let block = Block::default().title("Help (Esc to close)").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

fn teardown_tui(mut terminal: Terminal<ratatui::backend::CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alt screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}
