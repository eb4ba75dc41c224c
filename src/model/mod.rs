use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Work session length used when nothing is stored yet.
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Break sessions have a fixed length; only the work length is configurable.
pub const BREAK_MINUTES: u32 = 5;

/// Bounds for the user-configured work session length.
pub const MIN_WORK_MINUTES: u32 = 5;
pub const MAX_WORK_MINUTES: u32 = 60;

/// The single shared record persisted by the store.
///
/// Timer fields are written only by the timer controller; `tasks` only by
/// the presentation layer. Every field defaults independently so records
/// written by older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerRecord {
    /// Seconds remaining in the current session.
    pub timer: u64,
    /// Whether the countdown is actively ticking.
    pub is_running: bool,
    /// True while in a work period, false during a break.
    pub is_work_session: bool,
    /// User-configured work session length in minutes.
    pub work_minutes: u32,
    /// The attached to-do list, in user order.
    pub tasks: Vec<TodoItem>,
}

impl Default for TimerRecord {
    fn default() -> Self {
        Self {
            timer: DEFAULT_WORK_MINUTES as u64 * 60,
            is_running: false,
            is_work_session: true,
            work_minutes: DEFAULT_WORK_MINUTES,
            tasks: Vec::new(),
        }
    }
}

impl TimerRecord {
    /// Repair a freshly loaded record.
    ///
    /// Clamps `work_minutes` into its valid range, refills an empty countdown
    /// from the work length, and forces the paused state: no tick is
    /// scheduled across restarts, so a stored `is_running = true` would show
    /// a countdown that never moves.
    pub fn normalize(&mut self) {
        self.work_minutes = self.work_minutes.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES);
        if self.timer == 0 {
            self.timer = self.work_minutes as u64 * 60;
        }
        self.is_running = false;
    }
}

/// One entry in the to-do list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    pub completed: bool,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Which part of the UI currently receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    TaskList,
    TaskInput,
}

/// Transient presentation state, never persisted.
#[derive(Debug)]
pub struct UiState {
    pub focus: FocusArea,
    pub input: String,
    pub selected_task: Option<usize>,
    pub status_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: FocusArea::TaskList,
            input: String::new(),
            selected_task: None,
            status_message: None,
        }
    }
}

impl UiState {
    pub fn clear_input(&mut self) {
        self.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_matches_fresh_install() {
        let record = TimerRecord::default();
        assert_eq!(record.timer, 1500);
        assert!(!record.is_running);
        assert!(record.is_work_session);
        assert_eq!(record.work_minutes, 25);
        assert!(record.tasks.is_empty());
    }

    #[test]
    fn normalize_clamps_work_minutes() {
        let mut record = TimerRecord {
            work_minutes: 120,
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.work_minutes, 60);

        record.work_minutes = 1;
        record.normalize();
        assert_eq!(record.work_minutes, 5);
    }

    #[test]
    fn normalize_refills_exhausted_timer() {
        let mut record = TimerRecord {
            timer: 0,
            work_minutes: 30,
            ..Default::default()
        };
        record.normalize();
        assert_eq!(record.timer, 30 * 60);
    }

    #[test]
    fn normalize_forces_paused() {
        let mut record = TimerRecord {
            is_running: true,
            ..Default::default()
        };
        record.normalize();
        assert!(!record.is_running);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: TimerRecord = serde_json::from_str(r#"{"work_minutes": 40}"#).unwrap();
        assert_eq!(record.work_minutes, 40);
        assert_eq!(record.timer, 1500);
        assert!(record.is_work_session);
        assert!(record.tasks.is_empty());
    }

    #[test]
    fn task_without_timestamp_still_loads() {
        let item: TodoItem =
            serde_json::from_str(r#"{"text": "Write spec", "completed": false}"#).unwrap();
        assert_eq!(item.text, "Write spec");
        assert_eq!(item.created_at, DateTime::UNIX_EPOCH);
    }
}
