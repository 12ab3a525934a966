use homeroom_core::LedgerStore;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

pub fn draw<S: LedgerStore>(f: &mut Frame, app: &mut App<'_, S>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer / note input
        ])
        .split(size);

    let header = Paragraph::new("HOMEROOM · ATTENDANCE")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .split(main_chunks[1]);

    draw_grid(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_footer(f, app, main_chunks[2]);
}

fn draw_grid<S: LedgerStore>(f: &mut Frame, app: &mut App<'_, S>, area: Rect) {
    let selected = app.state.selected();
    let window = app.ledger.window_days();

    let rows: Vec<Row> = app.ledger.entries().into_iter().enumerate().map(|(i, (name, entry))| {
        let cells: Vec<Span> = entry.records.iter().enumerate().map(|(day, present)| {
            let mut style = if *present {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if selected == Some(i) && day == app.day {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            Span::styled(if *present { "P" } else { "A" }, style)
        }).collect();

        let flagged = app.roster.get(name).map(|s| s.detention_triggered()).unwrap_or(false);
        let name_style = if flagged {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        Row::new(vec![
            Cell::from(Span::styled(name.to_string(), name_style)),
            Cell::from(Line::from(cells)),
            Cell::from(format!("{}/{}", entry.present_count(), entry.records.len())),
            Cell::from(format!("{}%", entry.attendance_percent())),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),           // Student
            Constraint::Length(window as u16), // Days
            Constraint::Length(7),            // Present
            Constraint::Length(5),            // Percent
        ]
    )
    .header(Row::new(vec!["Student", "Days (oldest → today)", "Present", "%"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Attendance ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::Black))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view<S: LedgerStore>(f: &mut Frame, app: &App<'_, S>, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(name) = app.selected_name() else {
        f.render_widget(block, area);
        return;
    };
    let (Ok(entry), Some(student)) = (app.ledger.entry(name), app.roster.get(name)) else {
        f.render_widget(block, area);
        return;
    };

    let date = app
        .dates
        .get(app.day)
        .map(|d| d.format("%Y-%m-%d (%a)").to_string())
        .unwrap_or_default();
    let present = entry.records.get(app.day).copied().unwrap_or(false);

    let detail_text = vec![
        Line::from(vec![
            Span::styled("Student: ", Style::default().fg(Color::Blue)),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Group: ", Style::default().fg(Color::Blue)),
            Span::raw(student.group.as_str()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Day: ", Style::default().fg(Color::Blue)),
            Span::raw(date),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Blue)),
            if present {
                Span::styled("Present", Style::default().fg(Color::Green))
            } else {
                Span::styled("Absent", Style::default().fg(Color::Red))
            },
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Behaviour: ", Style::default().fg(Color::Blue)),
            Span::raw(student.behaviour_description()),
        ]),
        Line::from(vec![
            Span::styled("Detention: ", Style::default().fg(Color::Blue)),
            if student.detention_triggered() {
                Span::styled(format!("YES ({} poor)", student.poor_count()), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("No")
            },
        ]),
        Line::from(""),
        Line::from(Span::styled("Note:", Style::default().fg(Color::Blue))),
        Line::from(entry.note.as_str()),
    ];

    let detail_block = Paragraph::new(detail_text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_footer<S: LedgerStore>(f: &mut Frame, app: &App<'_, S>, area: Rect) {
    match app.input_mode {
        InputMode::EditingNote => {
            let input = Paragraph::new(app.input.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title(" Note (Enter: save, Esc: cancel) ").borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(input, area);

            let before_cursor = &app.input[..app.byte_index(app.cursor_position)];
            f.set_cursor_position((
                area.x + 1 + before_cursor.width() as u16,
                area.y + 1,
            ));
        }
        InputMode::Normal => {
            let help = "j/k: student | h/l: day | t: today | space: toggle | a/A: all present/absent | p/x: roll-call | n: note | s: save | r: reset | q: quit";
            let text = match &app.status {
                Some(status) => vec![
                    Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Cyan))),
                    Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
                ],
                None => vec![Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))],
            };
            let footer = Paragraph::new(text).alignment(Alignment::Center);
            f.render_widget(footer, area);
        }
    }
}
