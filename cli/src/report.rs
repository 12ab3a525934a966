use std::{io, time::Duration};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Paragraph, Gauge},
};
use homeroom_core::{AttendanceLedger, LedgerStore, RosterStore};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    ok: Color,
    flagged: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    ok: Color::Green,
    flagged: Color::Red,
};

pub struct ReportRow {
    pub name: String,
    pub percent: u8,
    pub present: usize,
    pub poor_count: usize,
    pub detention: bool,
}

pub struct ReportApp {
    pub rows: Vec<ReportRow>,
    pub window_days: usize,
}

impl ReportApp {
    pub fn new<S: LedgerStore>(roster: &RosterStore, ledger: &AttendanceLedger<'_, S>) -> Self {
        let rows = ledger
            .entries()
            .into_iter()
            .filter_map(|(name, entry)| {
                let student = roster.get(name)?;
                Some(ReportRow {
                    name: name.to_string(),
                    percent: entry.attendance_percent(),
                    present: entry.present_count(),
                    poor_count: roster.poor_count(student),
                    detention: roster.detention_status(student),
                })
            })
            .collect();
        Self {
            rows,
            window_days: ledger.window_days(),
        }
    }

    pub fn class_percent(&self) -> u8 {
        let total = self.rows.len() * self.window_days;
        if total == 0 {
            return 0;
        }
        let present: usize = self.rows.iter().map(|r| r.present).sum();
        ((200 * present + total) / (2 * total)) as u8
    }
}

pub fn run(app: &ReportApp) -> Result<()> {
    if app.rows.is_empty() {
        println!("No students on the roster.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &ReportApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(10),   // Chart + Sidebar
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let title = Paragraph::new(Span::styled(
        format!("HOMEROOM ATTENDANCE · last {} days", app.window_days),
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, main_layout[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(main_layout[1]);

    draw_chart(frame, app, content_chunks[0]);
    draw_info_panel(frame, app, content_chunks[2]);

    let help = Line::from(vec![
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

fn draw_chart(frame: &mut Frame, app: &ReportApp, area: Rect) {
    let bar_items: Vec<Bar> = app.rows.iter().map(|row| {
        // First name keeps labels inside the bar width
        let label = row.name.split_whitespace().next().unwrap_or_default().to_string();
        Bar::default()
            .label(label)
            .value(row.percent as u64)
            .style(Style::default().fg(if row.detention { THEME.flagged } else { THEME.ok }))
            .text_value(format!("{}%", row.percent))
    }).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Attendance % (red = detention) "),
        )
        .bar_width(8)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bar_items))
        .max(100);

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, app: &ReportApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Detention list
            Constraint::Length(3), // Class gauge
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled("Detention", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    let flagged: Vec<&ReportRow> = app.rows.iter().filter(|r| r.detention).collect();
    if flagged.is_empty() {
        lines.push(Line::from(Span::styled("None", Style::default().fg(THEME.muted))));
    }
    for row in flagged {
        lines.push(Line::from(vec![
            Span::styled(row.name.clone(), Style::default().fg(THEME.flagged).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {} poor", row.poor_count), Style::default().fg(THEME.muted)),
        ]));
    }

    let info = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Flags "),
    );
    frame.render_widget(info, chunks[0]);

    let percent = app.class_percent();
    let gauge = Gauge::default()
        .block(Block::default().title(" Class ").borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(THEME.muted)))
        .gauge_style(Style::default().fg(if percent < 90 { THEME.flagged } else { THEME.ok }))
        .percent(percent as u16)
        .label(format!("{}%", percent));
    frame.render_widget(gauge, chunks[1]);
}
