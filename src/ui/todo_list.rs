use crate::app::App;
use crate::model::FocusArea;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the to-do list with checkboxes and the current selection
pub fn render_todo_list(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.ui_state.focus == FocusArea::TaskList;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if is_focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" To-Do ({}) ", app.tasks.len()),
            title_style,
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " Nothing yet - press 'i' to add a task",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let is_selected = is_focused && app.ui_state.selected_task == Some(index);

            let checkbox = if task.completed {
                Span::styled("✔ ", Style::default().fg(Color::Green))
            } else {
                Span::raw("☐ ")
            };
            let mut text_style = if task.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            if is_selected {
                text_style = text_style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }

            ListItem::new(Line::from(vec![
                Span::raw(" "),
                checkbox,
                Span::styled(task.text.clone(), text_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    let mut list_state = ListState::default();
    list_state.select(app.ui_state.selected_task);
    frame.render_stateful_widget(list, area, &mut list_state);
}
