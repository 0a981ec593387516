// The look-ahead step scheduler. Two cursors: a monotonically
// increasing next-note time on the audio clock, and an integer step
// index. Every poll it pre-schedules all steps falling inside the
// look-ahead window, so timing stays correct even when the polling
// cadence wobbles — the while-loop catches up by scheduling every step
// whose time has come, not just one.

use crate::audio_api::{AudioCommand, TriggerParams};
use crate::loops::DrumLoop;
use crate::samples::SampleStore;
use crate::shared::LOOK_AHEAD_SECS;

/// Seconds per step: a sixteenth note at the given tempo. Recomputed
/// from the live bpm on every advance, so tempo edits take effect on
/// the next scheduling pass without touching already-stamped triggers.
pub fn step_secs(bpm: f32) -> f64 {
    60.0 / bpm as f64 / 4.0
}

pub struct StepScheduler {
    playing: bool,
    next_note_time: f64,
    step_index: u64,
    look_ahead: f64,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self::with_look_ahead(LOOK_AHEAD_SECS)
    }

    pub fn with_look_ahead(look_ahead: f64) -> Self {
        Self {
            playing: false,
            next_note_time: 0.0,
            step_index: 0,
            look_ahead,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Which column the grid should light up: the latest step whose
    /// timestamp has passed at `now`. The scheduling cursor itself runs
    /// a look-ahead window early, so it would read ahead of the audio.
    pub fn current_step(&self, now: f64, bpm: f32, pattern_len: usize) -> usize {
        if pattern_len == 0 {
            return 0;
        }
        let lead = ((self.next_note_time - now) / step_secs(bpm)).ceil().max(0.0) as u64;
        self.step_index.saturating_sub(lead) as usize % pattern_len
    }

    /// Stopped → Playing, from step 0 at `now`. Refuses to arm until at
    /// least one sample is loaded.
    pub fn start(&mut self, now: f64, store: &SampleStore) -> bool {
        if self.playing || !store.any_loaded() {
            return false;
        }
        self.playing = true;
        self.step_index = 0;
        self.next_note_time = now;
        true
    }

    /// Playing → Stopped. The caller sends CancelScheduled so triggers
    /// already inside the look-ahead window never sound.
    pub fn stop(&mut self) {
        self.playing = false;
        self.step_index = 0;
    }

    /// One scheduling pass against a fresh loop snapshot. Edits made
    /// since the last pass are simply visible in the snapshot; there is
    /// no other synchronization between the UI and the scheduler.
    pub fn poll(&mut self, now: f64, dl: &DrumLoop, store: &SampleStore) -> Vec<AudioCommand> {
        if !self.playing {
            return Vec::new();
        }
        let mut cmds = Vec::new();

        // Catch-up clamp: if polling stalled more than a window behind,
        // drop the stale steps instead of bursting them out late. Late
        // drum hits sound worse than missing ones.
        if now - self.next_note_time > self.look_ahead {
            let step = step_secs(dl.bpm);
            let skipped = ((now - self.next_note_time) / step).ceil() as u64;
            self.step_index += skipped;
            self.next_note_time += skipped as f64 * step;
        }

        while self.next_note_time < now + self.look_ahead {
            for track in &dl.tracks {
                if track.muted || track.pattern.is_empty() {
                    continue;
                }
                // per-pattern length, so shorter or longer rows still loop
                let idx = self.step_index as usize % track.pattern.len();
                if !track.pattern[idx] {
                    continue;
                }
                let Some(sample) = store.resolve(&track.name) else {
                    continue; // unloaded sample: skipped, never an error
                };
                cmds.push(AudioCommand::Trigger(TriggerParams {
                    sample,
                    gain: 1.0,
                    at: self.next_note_time,
                }));
            }
            self.next_note_time += step_secs(dl.bpm);
            self.step_index += 1;
        }
        cmds
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new()
    }
}
