mod status_bar;
mod timer_panel;
mod todo_list;

use crate::app::App;
use crate::model::FocusArea;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub use status_bar::render_status_bar;
pub use timer_panel::render_timer_panel;
pub use todo_list::render_todo_list;

/// Main view function - renders the entire UI
pub fn view(frame: &mut Frame, app: &App) {
    // Guard against extremely small terminals to prevent panics
    if frame.area().width < 24 || frame.area().height < 14 {
        let msg = Paragraph::new("Terminal too small").style(Style::default().fg(Color::Red));
        frame.render_widget(msg, frame.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Timer panel
            Constraint::Min(4),    // To-do list
            Constraint::Length(3), // Task input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_timer_panel(frame, chunks[0], app);
    render_todo_list(frame, chunks[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
}

/// Render the single-line task input area
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.ui_state.focus == FocusArea::TaskInput;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Add a task ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    let input = Paragraph::new(app.ui_state.input.as_str()).block(block);
    frame.render_widget(input, area);

    if is_focused {
        // Place the cursor after the typed text.
        let cursor_x =
            inner.x + app.ui_state.input.chars().count().min(inner.width as usize - 1) as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}
