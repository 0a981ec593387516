mod audio;
mod audio_api;
mod feed;
mod loops;
mod machine;
mod samples;
mod sequencer;
mod shared;
mod tui;

use std::path::PathBuf;

use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use loops::persistence;
use machine::DrumMachine;
use shared::InputEvent;
use tui::mode::TuiState;

fn main() {
    // logs go to stderr, which coexists with the raw-mode UI on stdout
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let audio = audio::start_audio()?;

    let project_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let drum_loop = persistence::load_loop(&project_dir).unwrap_or_default();
    let mut machine = DrumMachine::new(&project_dir, drum_loop)?;

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut tui_state = TuiState::default();

    loop {
        // pick up samples for any newly-named tracks
        for cmd in machine.sync_samples(audio.sample_rate()) {
            audio.send(cmd);
        }

        let ds = machine.display_state(audio.now_secs());
        tui_state.clamp_to(
            ds.tracks.len(),
            ds.tracks.first().map(|t| t.pattern.len()).unwrap_or(0),
        );

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &tui_state);
        })?;

        let events = tui::input::poll_input(
            tick_rate,
            &mut tui_state,
            ds.tracks.len(),
            ds.tracks.first().map(|t| t.pattern.len()).unwrap_or(0),
        )?;
        for event in events {
            if event == InputEvent::Quit {
                // save the working loop before quitting
                let _ = persistence::save_loop(&project_dir, &machine.drum_loop);
                drop(term);
                return Ok(());
            }
            for cmd in machine.handle_input(event, audio.now_secs()) {
                audio.send(cmd);
            }
        }

        // one scheduling pass against the audio clock
        for cmd in machine.tick(audio.now_secs()) {
            audio.send(cmd);
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
