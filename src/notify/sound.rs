use rodio::{Decoder, OutputStream, Sink};
use std::thread;
use tracing::warn;

/// Play the session-boundary chime. Runs on its own thread so audio setup
/// never blocks the controller.
pub fn play_chime() {
    thread::spawn(|| {
        if let Err(e) = play_chime_internal() {
            warn!("audio notification failed: {e}");
        }
    });
}

fn play_chime_internal() -> anyhow::Result<()> {
    let (_stream, stream_handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&stream_handle)?;

    // A custom chime can be dropped into the data dir; otherwise fall back
    // to the terminal bell.
    let chime_path = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tomodoro")
        .join("sounds")
        .join("chime.mp3");

    if chime_path.exists() {
        let file = std::fs::File::open(&chime_path)?;
        let source = Decoder::new(std::io::BufReader::new(file))?;
        sink.append(source);
        sink.sleep_until_end();
    } else {
        print!("\x07"); // ASCII BEL
    }

    Ok(())
}
