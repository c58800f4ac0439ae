//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io::{stdout, Stdout};

use crate::db::{BmiRecord, WorkoutSession};
use crate::exercises::exercise_name;
use crate::rules::{BmiStatus, PrRecord};
use crate::tracker::Tracker;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const RECENT_SESSIONS: usize = 10;

/// Snapshot of everything the dashboard shows
struct Snapshot {
    latest_bmi: Option<BmiRecord>,
    records: Vec<PrRecord>,
    sessions: Vec<WorkoutSession>,
}

impl Snapshot {
    fn load(tracker: &Tracker, user_id: &str) -> Result<Self> {
        let mut sessions = tracker.session_history(user_id)?;
        sessions.truncate(RECENT_SESSIONS);
        Ok(Self {
            latest_bmi: tracker.latest_bmi(user_id)?,
            records: tracker.personal_records(user_id)?,
            sessions,
        })
    }
}

/// App state for TUI
pub struct App {
    tracker: Tracker,
    user_id: String,
    snapshot: Snapshot,
    should_quit: bool,
}

fn status_color(status: BmiStatus) -> Color {
    match status {
        BmiStatus::Ok => Color::Green,
        BmiStatus::Caution => Color::Yellow,
        BmiStatus::NotOk => Color::Red,
    }
}

impl App {
    pub fn new(tracker: Tracker, user_id: &str) -> Result<Self> {
        let snapshot = Snapshot::load(&tracker, user_id)?;
        Ok(Self {
            tracker,
            user_id: user_id.to_string(),
            snapshot,
            should_quit: false,
        })
    }

    /// Run the TUI application. The terminal is restored even when drawing
    /// or a refresh fails.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        restoring(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(format!("gymdesk - {}", self.user_id))
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        frame.render_widget(self.bmi_panel(), chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[2]);
        frame.render_widget(self.records_table(), body[0]);
        frame.render_widget(self.sessions_table(), body[1]);

        // Footer
        let footer = Paragraph::new("q: quit | r: refresh")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn bmi_panel(&self) -> Paragraph<'_> {
        let block = Block::default().borders(Borders::ALL).title("Latest BMI");
        let Some(bmi) = &self.snapshot.latest_bmi else {
            return Paragraph::new("No BMI records yet").block(block);
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{:.2}", bmi.bmi_value), Style::default().bold()),
                Span::raw("  "),
                Span::styled(
                    format!("{} [{}]", bmi.category, bmi.status),
                    Style::default().fg(status_color(bmi.status)),
                ),
                Span::raw(format!("  {}", bmi.created_at.format("%Y-%m-%d"))),
            ]),
            Line::from(bmi.notes.clone().unwrap_or_default()),
        ];
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block)
    }

    fn records_table(&self) -> Table<'_> {
        let rows: Vec<Row> = self.snapshot.records.iter().map(|r| {
            Row::new(vec![
                Cell::from(exercise_name(&r.exercise_id).to_string()),
                Cell::from(format!("{}kg x {}", r.weight_kg, r.reps)),
                Cell::from(r.recorded_at.format("%Y-%m-%d").to_string()),
            ])
        }).collect();

        Table::new(
            rows,
            [Constraint::Min(16), Constraint::Length(14), Constraint::Length(11)],
        )
        .header(Row::new(vec!["Exercise", "Best", "Date"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Personal Records"))
    }

    fn sessions_table(&self) -> Table<'_> {
        let rows: Vec<Row> = self.snapshot.sessions.iter().map(|s| {
            let prs = s.set_logs.iter().filter(|l| l.is_personal_record).count();
            Row::new(vec![
                Cell::from(s.start_time.format("%Y-%m-%d %H:%M").to_string()),
                Cell::from(s.status.as_str()),
                Cell::from(s.set_logs.len().to_string()),
                Cell::from(s.total_volume.map(|v| format!("{v:.0}")).unwrap_or_else(|| "-".to_string())),
                Cell::from(if prs > 0 { prs.to_string() } else { String::new() }),
            ])
        }).collect();

        Table::new(
            rows,
            [
                Constraint::Length(17),
                Constraint::Length(12),
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Length(4),
            ],
        )
        .header(Row::new(vec!["Started", "Status", "Sets", "Volume", "PRs"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Recent Sessions"))
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('r') => {
                            self.snapshot = Snapshot::load(&self.tracker, &self.user_id)?;
                        }
                        _ => {}
                    }
                }
        Ok(())
    }
}

/// Run `body`, then `restore` whatever `body` returned; `body`'s error wins
fn restoring<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let result = body();
    restore()?;
    result
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
