// Constants and the types that cross layer boundaries: semantic input
// events resolved by the TUI, and the display snapshot it renders.

pub const STEPS_PER_PATTERN: usize = 32;
pub const DEFAULT_TRACKS: [&str; 4] = ["Kick", "Snare", "Clap", "Hat"];

pub const DEFAULT_BPM: f32 = 128.0;
pub const BPM_MIN: f32 = 1.0;
pub const BPM_MAX: f32 = 10_000.0;

// How far into the audio timeline the scheduler pre-schedules triggers.
// Big enough to absorb UI-frame jitter, small enough that edits while
// playing land quickly.
pub const LOOK_AHEAD_SECS: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // grid editing (coordinates resolved by the TUI cursor)
    ToggleStep { track: usize, step: usize },
    ToggleMute { track: usize },

    // tempo nudge in whole BPM
    AdjustBpm(f32),

    // transport (space)
    PlayPress,

    // push the current loop to the feed (s)
    SaveLoop,

    // quit button (esc / q)
    Quit,
}

/// Everything the TUI needs per frame; it never reaches into the
/// machine or the scheduler directly.
#[derive(Clone, Debug)]
pub struct DisplayState {
    pub bpm: f32,
    pub playing: bool,
    pub playing_step: Option<usize>,
    pub tracks: Vec<TrackView>,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct TrackView {
    pub name: String,
    pub muted: bool,
    pub pattern: Vec<bool>,
}
