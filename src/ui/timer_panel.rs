use crate::app::{format_clock, App};
use crate::model::BREAK_MINUTES;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the countdown, session type, and work-length controls
pub fn render_timer_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_work = app.store().is_work_session();
    let is_running = app.store().is_running();
    let work_minutes = app.store().work_minutes();

    let (session_label, session_color) = if is_work {
        ("WORK SESSION", Color::LightRed)
    } else {
        ("BREAK", Color::LightGreen)
    };

    let block = Block::default()
        .title(Span::styled(
            " tomodoro ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Session label
            Constraint::Length(2), // Clock
            Constraint::Length(1), // State + length controls
            Constraint::Min(0),
        ])
        .split(inner);

    let session = Paragraph::new(Span::styled(
        session_label,
        Style::default()
            .fg(session_color)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(session, rows[0]);

    let clock = Paragraph::new(Span::styled(
        format_clock(app.displayed_seconds),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(clock, rows[1]);

    let state_span = if is_running {
        Span::styled("▶ running", Style::default().fg(Color::Green))
    } else {
        Span::styled("⏸ paused", Style::default().fg(Color::Yellow))
    };
    let detail = Line::from(vec![
        state_span,
        Span::raw("   "),
        Span::styled(
            format!("[-] {work_minutes} min work [+]"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{BREAK_MINUTES} min break"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let detail = Paragraph::new(detail).alignment(Alignment::Center);
    frame.render_widget(detail, rows[2]);
}
