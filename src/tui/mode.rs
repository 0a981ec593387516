// State local to the tui: the grid cursor the arrow keys move. The
// machine never sees it; only resolved ToggleStep/ToggleMute events
// carry coordinates out.
#[derive(Clone, Copy, Debug, Default)]
pub struct TuiState {
    pub cursor_track: usize,
    pub cursor_step: usize,
}

impl TuiState {
    pub fn clamp_to(&mut self, tracks: usize, steps: usize) {
        if tracks > 0 {
            self.cursor_track = self.cursor_track.min(tracks - 1);
        }
        if steps > 0 {
            self.cursor_step = self.cursor_step.min(steps - 1);
        }
    }
}
