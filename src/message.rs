use crate::controller::Command;
use crate::model::FocusArea;
use crate::store::ChangeEvent;

/// Messages that can be dispatched to update the presentation layer (TEA pattern)
#[derive(Debug, Clone)]
pub enum Message {
    /// Forward a timer command to the controller (fire-and-forget, no reply)
    SendCommand(Command),
    /// A shared-store change observed through the subscription
    StoreChanged(ChangeEvent),

    // To-do list operations (local, written back wholesale through the store)
    /// Append the current input as a new task, if non-empty after trimming
    SubmitTask,
    /// Flip `completed` on the task at the given index
    ToggleTask(usize),
    /// Remove the task at the given index
    DeleteTask(usize),

    // Selection and focus
    NavigateUp,
    NavigateDown,
    FocusChanged(FocusArea),
    SetStatusMessage(Option<String>),

    Quit,
}
