// The drum loop itself: a bpm plus an ordered set of tracks, each a
// fixed-length row of on/off steps. Playback state (cursor, playing
// flag) deliberately lives in the scheduler, not here, so this struct
// is exactly what gets written to disk and to the feed.

use serde::{Deserialize, Serialize};

use crate::shared::{BPM_MAX, BPM_MIN, DEFAULT_BPM, DEFAULT_TRACKS, STEPS_PER_PATTERN};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub sample_path: String,
    pub pattern: Vec<bool>,
    pub muted: bool,
}

impl Track {
    pub fn new(name: &str, sample_path: &str, steps: usize) -> Self {
        Self {
            name: name.to_string(),
            sample_path: sample_path.to_string(),
            pattern: vec![false; steps],
            muted: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrumLoop {
    pub bpm: f32,
    pub tracks: Vec<Track>,
}

impl Default for DrumLoop {
    fn default() -> Self {
        let tracks = DEFAULT_TRACKS
            .iter()
            .map(|name| {
                let path = format!("samples/{}.wav", name.to_lowercase());
                Track::new(name, &path, STEPS_PER_PATTERN)
            })
            .collect();
        Self { bpm: DEFAULT_BPM, tracks }
    }
}

impl DrumLoop {
    /// All tracks share one pattern length; step lookups take this
    /// modulo so playback wraps indefinitely.
    pub fn pattern_len(&self) -> usize {
        self.tracks.first().map(|t| t.pattern.len()).unwrap_or(0)
    }

    /// Flip exactly one step. Out-of-range indices are ignored rather
    /// than panicking; the TUI cursor can't produce them but the feed
    /// path replays arbitrary saved data.
    pub fn toggle_step(&mut self, track: usize, step: usize) {
        if let Some(t) = self.tracks.get_mut(track) {
            if let Some(s) = t.pattern.get_mut(step) {
                *s = !*s;
            }
        }
    }

    pub fn toggle_mute(&mut self, track: usize) {
        if let Some(t) = self.tracks.get_mut(track) {
            t.muted = !t.muted;
        }
    }

    /// Tempo edits pass through here. Anything non-finite or outside
    /// [BPM_MIN, BPM_MAX] falls back to the default instead of erroring.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = clamp_bpm(bpm);
    }
}

pub fn clamp_bpm(bpm: f32) -> f32 {
    if bpm.is_finite() && (BPM_MIN..=BPM_MAX).contains(&bpm) {
        bpm
    } else {
        DEFAULT_BPM
    }
}
