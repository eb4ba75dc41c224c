mod desktop;
mod sound;

use crate::config::AppConfig;
use crate::controller::SessionChange;
use crate::model::BREAK_MINUTES;

/// Announce a session boundary to the user. Both channels are best-effort:
/// failures are logged and never reach the controller.
pub fn session_change(change: &SessionChange, config: &AppConfig) {
    let (title, body) = boundary_message(change);
    if config.notifications_enabled {
        desktop::show(title, body);
    }
    if config.sound_enabled {
        sound::play_chime();
    }
}

/// Title and body announcing the session being entered.
fn boundary_message(change: &SessionChange) -> (&'static str, String) {
    if change.is_work_session {
        (
            "Time to focus!",
            format!(
                "Break's over! Your {}-minute focus session starts now.",
                change.work_minutes
            ),
        )
    } else {
        (
            "Time for a break!",
            format!("Great work! Your {BREAK_MINUTES}-minute break starts now."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_break_announces_break() {
        let (title, body) = boundary_message(&SessionChange {
            is_work_session: false,
            work_minutes: 25,
        });
        assert_eq!(title, "Time for a break!");
        assert_eq!(body, "Great work! Your 5-minute break starts now.");
    }

    #[test]
    fn entering_work_announces_configured_length() {
        let (title, body) = boundary_message(&SessionChange {
            is_work_session: true,
            work_minutes: 40,
        });
        assert_eq!(title, "Time to focus!");
        assert_eq!(body, "Break's over! Your 40-minute focus session starts now.");
    }
}
