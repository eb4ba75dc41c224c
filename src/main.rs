mod app;
mod config;
mod controller;
mod message;
mod model;
mod notify;
mod store;
mod ui;

use app::App;
use config::AppConfig;
use controller::Command;
use message::Message;
use model::FocusArea;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::time::Duration;
use store::{Store, StoreKey, Subscription};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();
    info!("tomodoro starting");

    let config = AppConfig::load();
    let store = Store::open_default();

    // The timer controller runs on its own tokio task; the UI talks to it
    // over a fire-and-forget command channel and never awaits a reply.
    let runtime = tokio::runtime::Runtime::new()?;
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
    runtime.spawn(controller::run(store.clone(), config, command_rx));

    // Subscribe before the first render so no timer change is missed.
    let timer_events = store.subscribe(&[StoreKey::Timer]);
    let mut app = App::new(store, command_tx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, timer_events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    timer_events: Subscription,
) -> anyhow::Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        // Render
        terminal.draw(|frame| ui::view(frame, app))?;

        // Apply store changes pushed by the controller since the last pass
        while let Some(change) = timer_events.poll() {
            let follow_ups = app.update(Message::StoreChanged(change));
            for msg in follow_ups {
                app.update(msg);
            }
        }

        // Handle key events with a timeout so timer updates keep flowing
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle Press events, ignore Release and Repeat
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let messages = if app.ui_state.focus == FocusArea::TaskInput {
                    handle_input_key(key, app)
                } else {
                    handle_key_event(key, app)
                };
                for msg in messages {
                    let follow_ups = app.update(msg);
                    for follow_up in follow_ups {
                        app.update(follow_up);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Dropping the subscription deregisters it from the store.
    Ok(())
}

/// Key bindings while the task list has focus
fn handle_key_event(key: event::KeyEvent, app: &App) -> Vec<Message> {
    // Clear a transient status message on any key press
    if app.ui_state.status_message.is_some() {
        return vec![Message::SetStatusMessage(None)];
    }

    match key.code {
        KeyCode::Char('q') => vec![Message::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Message::Quit],

        // Timer commands, forwarded as-is
        KeyCode::Char('s') => vec![Message::SendCommand(Command::Start)],
        KeyCode::Char('p') => vec![Message::SendCommand(Command::Pause)],
        KeyCode::Char('r') => vec![Message::SendCommand(Command::Reset)],
        KeyCode::Char('+') | KeyCode::Char('=') => adjust_command(app, Command::IncreaseTime),
        KeyCode::Char('-') | KeyCode::Char('_') => adjust_command(app, Command::DecreaseTime),

        // Enter input mode
        KeyCode::Char('i') => vec![Message::FocusChanged(FocusArea::TaskInput)],

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => vec![Message::NavigateDown],
        KeyCode::Char('k') | KeyCode::Up => vec![Message::NavigateUp],

        // To-do operations on the selected task
        KeyCode::Char(' ') | KeyCode::Enter => app
            .ui_state
            .selected_task
            .map(Message::ToggleTask)
            .into_iter()
            .collect(),
        KeyCode::Char('d') => app
            .ui_state
            .selected_task
            .map(Message::DeleteTask)
            .into_iter()
            .collect(),

        _ => vec![],
    }
}

/// Forward a work-length adjustment; the controller ignores it while
/// running, so hint at why nothing will change.
fn adjust_command(app: &App, command: Command) -> Vec<Message> {
    let mut messages = vec![Message::SendCommand(command)];
    if app.store().is_running() {
        messages.push(Message::SetStatusMessage(Some(
            "Pause the timer to change the work length".to_string(),
        )));
    }
    messages
}

/// Key handling while the input line has focus
fn handle_input_key(key: event::KeyEvent, app: &mut App) -> Vec<Message> {
    match key.code {
        KeyCode::Enter => vec![Message::SubmitTask],
        KeyCode::Esc | KeyCode::Tab => vec![Message::FocusChanged(FocusArea::TaskList)],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Message::Quit],
        KeyCode::Backspace => {
            app.ui_state.input.pop();
            vec![]
        }
        KeyCode::Char(c) => {
            app.ui_state.input.push(c);
            vec![]
        }
        _ => vec![],
    }
}

/// Log to a file in the data dir; the terminal itself is in raw mode.
fn init_logging() {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tomodoro");
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("tomodoro.log"))
    else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();
}
