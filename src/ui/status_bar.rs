use crate::app::App;
use crate::model::FocusArea;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

/// Render the status bar: a transient message if set, otherwise key hints
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(ref msg) = app.ui_state.status_message {
        let status = Paragraph::new(Span::styled(
            format!(" {} ", msg),
            Style::default().fg(Color::White).bg(Color::Blue),
        ));
        frame.render_widget(status, area);
        return;
    }

    let hints = match app.ui_state.focus {
        FocusArea::TaskInput => " Enter: add task  Esc: back to list",
        FocusArea::TaskList => {
            " s start  p pause  r reset  +/- work length  i add  space toggle  d delete  q quit"
        }
    };
    let status = Paragraph::new(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(status, area);
}
