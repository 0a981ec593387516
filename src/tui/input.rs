use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::shared::InputEvent;

use super::mode::TuiState;

// poll for input, move the grid cursor locally, and resolve everything
// else into semantic input events for the machine to handle
pub fn poll_input(
    timeout: Duration,
    ts: &mut TuiState,
    tracks: usize,
    steps: usize,
) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code, ts, tracks, steps));
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode, ts: &mut TuiState, tracks: usize, steps: usize) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
        KeyCode::Char(' ') => vec![InputEvent::PlayPress],

        // cursor movement wraps around the grid
        KeyCode::Left | KeyCode::Char('h') => {
            ts.cursor_step = (ts.cursor_step + steps.saturating_sub(1)) % steps.max(1);
            vec![]
        }
        KeyCode::Right | KeyCode::Char('l') => {
            ts.cursor_step = (ts.cursor_step + 1) % steps.max(1);
            vec![]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ts.cursor_track = (ts.cursor_track + tracks.saturating_sub(1)) % tracks.max(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            ts.cursor_track = (ts.cursor_track + 1) % tracks.max(1);
            vec![]
        }

        KeyCode::Enter | KeyCode::Char('x') => vec![InputEvent::ToggleStep {
            track: ts.cursor_track,
            step: ts.cursor_step,
        }],
        KeyCode::Char('m') => vec![InputEvent::ToggleMute { track: ts.cursor_track }],

        KeyCode::Char('-') => vec![InputEvent::AdjustBpm(-4.0)],
        KeyCode::Char('=') | KeyCode::Char('+') => vec![InputEvent::AdjustBpm(4.0)],

        KeyCode::Char('s') => vec![InputEvent::SaveLoop],

        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_carries_the_cursor_position() {
        let mut ts = TuiState::default();
        handle_key(KeyCode::Down, &mut ts, 4, 32);
        handle_key(KeyCode::Right, &mut ts, 4, 32);
        handle_key(KeyCode::Right, &mut ts, 4, 32);
        let events = handle_key(KeyCode::Enter, &mut ts, 4, 32);
        assert_eq!(events, vec![InputEvent::ToggleStep { track: 1, step: 2 }]);
    }

    #[test]
    fn cursor_wraps_at_grid_edges() {
        let mut ts = TuiState::default();
        handle_key(KeyCode::Left, &mut ts, 4, 32);
        assert_eq!(ts.cursor_step, 31);
        handle_key(KeyCode::Up, &mut ts, 4, 32);
        assert_eq!(ts.cursor_track, 3);
    }

    #[test]
    fn transport_and_save_keys_resolve() {
        let mut ts = TuiState::default();
        assert_eq!(
            handle_key(KeyCode::Char(' '), &mut ts, 4, 32),
            vec![InputEvent::PlayPress]
        );
        assert_eq!(
            handle_key(KeyCode::Char('s'), &mut ts, 4, 32),
            vec![InputEvent::SaveLoop]
        );
        assert_eq!(
            handle_key(KeyCode::Char('-'), &mut ts, 4, 32),
            vec![InputEvent::AdjustBpm(-4.0)]
        );
    }
}
