use notify_rust::Notification;
use tracing::warn;

/// Show a desktop notification without blocking the controller.
pub fn show(title: &str, body: String) {
    let title = title.to_string();
    std::thread::spawn(move || {
        if let Err(e) = Notification::new()
            .appname("tomodoro")
            .summary(&title)
            .body(&body)
            .show()
        {
            warn!("desktop notification failed: {e}");
        }
    });
}
