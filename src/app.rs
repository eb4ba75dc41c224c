use crate::controller::Command;
use crate::message::Message;
use crate::model::{FocusArea, TodoItem, UiState};
use crate::store::{Store, StoreKey, StoreValue};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Presentation-layer state and update logic (TEA pattern).
///
/// The app is a view over the shared store: the timer display follows
/// `timer` change events, and the to-do list is the one field the UI owns
/// and writes back wholesale after each edit.
pub struct App {
    store: Store,
    commands: UnboundedSender<Command>,
    /// Seconds currently shown on the clock, kept in sync by store events.
    pub displayed_seconds: u64,
    /// Working copy of the to-do list (the UI is its only writer).
    pub tasks: Vec<TodoItem>,
    pub ui_state: UiState,
    pub should_quit: bool,
}

impl App {
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn new(store: Store, commands: UnboundedSender<Command>) -> Self {
        let displayed_seconds = store.timer();
        let tasks = store.tasks();
        Self {
            store,
            commands,
            displayed_seconds,
            tasks,
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    /// Update application state based on a message (TEA pattern).
    pub fn update(&mut self, msg: Message) -> Vec<Message> {
        match msg {
            Message::SendCommand(command) => {
                // Fire-and-forget: a closed channel only means the
                // controller is gone, and there is nothing to do about it.
                if self.commands.send(command).is_err() {
                    debug!(?command, "controller channel closed, command dropped");
                }
            }

            Message::StoreChanged(event) => {
                if event.key == StoreKey::Timer {
                    if let StoreValue::Seconds(seconds) = event.new {
                        self.displayed_seconds = seconds;
                    }
                }
            }

            Message::SubmitTask => {
                let text = self.ui_state.input.trim().to_string();
                if !text.is_empty() {
                    self.tasks.push(TodoItem::new(text));
                    self.store.set_tasks(self.tasks.clone());
                    self.ui_state.clear_input();
                    self.ui_state.selected_task = Some(self.tasks.len() - 1);
                }
            }

            Message::ToggleTask(index) => {
                if let Some(task) = self.tasks.get_mut(index) {
                    task.completed = !task.completed;
                    self.store.set_tasks(self.tasks.clone());
                }
            }

            Message::DeleteTask(index) => {
                if index < self.tasks.len() {
                    self.tasks.remove(index);
                    self.store.set_tasks(self.tasks.clone());
                    self.clamp_selection();
                }
            }

            Message::NavigateUp => {
                self.ui_state.selected_task = match self.ui_state.selected_task {
                    Some(0) | None => self.ui_state.selected_task,
                    Some(index) => Some(index - 1),
                };
            }

            Message::NavigateDown => {
                if !self.tasks.is_empty() {
                    let last = self.tasks.len() - 1;
                    self.ui_state.selected_task = Some(match self.ui_state.selected_task {
                        None => 0,
                        Some(index) => (index + 1).min(last),
                    });
                }
            }

            Message::FocusChanged(focus) => {
                self.ui_state.focus = focus;
            }

            Message::SetStatusMessage(message) => {
                self.ui_state.status_message = message;
            }

            Message::Quit => {
                self.should_quit = true;
            }
        }

        Vec::new()
    }

    /// Keep the selection inside the list after a deletion.
    fn clamp_selection(&mut self) {
        self.ui_state.selected_task = if self.tasks.is_empty() {
            None
        } else {
            self.ui_state
                .selected_task
                .map(|index| index.min(self.tasks.len() - 1))
        };
    }
}

/// Seconds rendered as zero-padded `MM:SS`, minutes by floor division.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChangeEvent;
    use tempfile::tempdir;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn app() -> (App, Store, UnboundedReceiver<Command>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let (tx, rx) = unbounded_channel();
        (App::new(store.clone(), tx), store, rx, dir)
    }

    #[test]
    fn add_toggle_delete_round_trip() {
        let (mut app, store, _rx, _dir) = app();

        app.ui_state.input = "Write spec".to_string();
        app.update(Message::SubmitTask);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].text, "Write spec");
        assert!(!app.tasks[0].completed);
        assert!(app.ui_state.input.is_empty());
        assert_eq!(store.tasks().len(), 1);

        app.update(Message::ToggleTask(0));
        assert!(app.tasks[0].completed);
        assert!(store.tasks()[0].completed);

        app.update(Message::DeleteTask(0));
        assert!(app.tasks.is_empty());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn toggling_twice_is_idempotent() {
        let (mut app, _store, _rx, _dir) = app();
        app.ui_state.input = "task".to_string();
        app.update(Message::SubmitTask);

        app.update(Message::ToggleTask(0));
        app.update(Message::ToggleTask(0));
        assert!(!app.tasks[0].completed);
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let (mut app, store, _rx, _dir) = app();
        app.ui_state.input = "   ".to_string();
        app.update(Message::SubmitTask);
        assert!(app.tasks.is_empty());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn submitted_text_is_trimmed() {
        let (mut app, _store, _rx, _dir) = app();
        app.ui_state.input = "  trim me  ".to_string();
        app.update(Message::SubmitTask);
        assert_eq!(app.tasks[0].text, "trim me");
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let (mut app, store, _rx, _dir) = app();
        app.update(Message::ToggleTask(3));
        app.update(Message::DeleteTask(3));
        assert!(app.tasks.is_empty());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn commands_are_forwarded_without_waiting() {
        let (mut app, _store, mut rx, _dir) = app();
        app.update(Message::SendCommand(Command::Start));
        app.update(Message::SendCommand(Command::Pause));
        assert_eq!(rx.try_recv().unwrap(), Command::Start);
        assert_eq!(rx.try_recv().unwrap(), Command::Pause);
    }

    #[test]
    fn dropped_controller_does_not_panic_the_ui() {
        let (mut app, _store, rx, _dir) = app();
        drop(rx);
        app.update(Message::SendCommand(Command::Start));
    }

    #[test]
    fn timer_events_update_the_clock() {
        let (mut app, store, _rx, _dir) = app();
        assert_eq!(app.displayed_seconds, 1500);

        let sub = store.subscribe(&[StoreKey::Timer]);
        store.set_timer(1499);
        let event: ChangeEvent = sub.poll().unwrap();
        app.update(Message::StoreChanged(event));
        assert_eq!(app.displayed_seconds, 1499);
    }

    #[test]
    fn deleting_last_task_clears_selection() {
        let (mut app, _store, _rx, _dir) = app();
        app.ui_state.input = "only".to_string();
        app.update(Message::SubmitTask);
        assert_eq!(app.ui_state.selected_task, Some(0));

        app.update(Message::DeleteTask(0));
        assert_eq!(app.ui_state.selected_task, None);
    }

    #[test]
    fn navigation_stays_within_the_list() {
        let (mut app, _store, _rx, _dir) = app();
        for text in ["a", "b", "c"] {
            app.ui_state.input = text.to_string();
            app.update(Message::SubmitTask);
        }
        app.ui_state.selected_task = None;

        app.update(Message::NavigateDown);
        assert_eq!(app.ui_state.selected_task, Some(0));
        app.update(Message::NavigateDown);
        app.update(Message::NavigateDown);
        app.update(Message::NavigateDown);
        assert_eq!(app.ui_state.selected_task, Some(2));

        app.update(Message::NavigateUp);
        app.update(Message::NavigateUp);
        app.update(Message::NavigateUp);
        assert_eq!(app.ui_state.selected_task, Some(0));
    }

    #[test]
    fn format_clock_pads_and_floors() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3599), "59:59");
    }
}
