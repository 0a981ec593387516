// The session layer: owns the loop, the scheduler, and the sample
// store. The TUI hands it semantic input events and renders whatever
// display_state() says; the audio engine receives whatever commands
// fall out. Neither side knows about the other.

use std::path::Path;

use crate::audio_api::AudioCommand;
use crate::feed::LoopStore;
use crate::loops::DrumLoop;
use crate::samples::SampleStore;
use crate::sequencer::StepScheduler;
use crate::shared::{DisplayState, InputEvent, TrackView};

pub struct DrumMachine {
    pub drum_loop: DrumLoop,
    scheduler: StepScheduler,
    store: SampleStore,
    feed: LoopStore,
    username: String,
    status: String,
    saved_count: u32,
}

impl DrumMachine {
    pub fn new(project_dir: &Path, drum_loop: DrumLoop) -> anyhow::Result<Self> {
        let feed = LoopStore::open(&project_dir.join(".loopbox"))?;
        let username = std::env::var("USER").unwrap_or_else(|_| "anonymous".to_string());
        Ok(Self {
            drum_loop,
            scheduler: StepScheduler::new(),
            store: SampleStore::new(project_dir),
            feed,
            username,
            status: String::new(),
            saved_count: 0,
        })
    }

    /// Load any samples the current loop references that aren't bound
    /// yet. Called every frame; a no-op once everything is attempted.
    pub fn sync_samples(&mut self, target_rate: u32) -> Vec<AudioCommand> {
        self.store.sync(&self.drum_loop, target_rate)
    }

    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> Vec<AudioCommand> {
        match event {
            InputEvent::ToggleStep { track, step } => {
                self.drum_loop.toggle_step(track, step);
                Vec::new()
            }
            InputEvent::ToggleMute { track } => {
                self.drum_loop.toggle_mute(track);
                Vec::new()
            }
            InputEvent::AdjustBpm(delta) => {
                let bpm = self.drum_loop.bpm + delta;
                self.drum_loop.set_bpm(bpm);
                Vec::new()
            }
            InputEvent::PlayPress => {
                if self.scheduler.is_playing() {
                    self.scheduler.stop();
                    // also silence triggers already inside the window
                    vec![AudioCommand::CancelScheduled]
                } else {
                    if !self.scheduler.start(now, &self.store) {
                        self.status = "no samples loaded".to_string();
                    }
                    Vec::new()
                }
            }
            InputEvent::SaveLoop => {
                self.saved_count += 1;
                let title = format!("loop #{}", self.saved_count);
                match self.feed.save_loop(&self.username, &title, &self.drum_loop) {
                    Ok(record) => self.status = format!("saved {}", record.id),
                    Err(e) => {
                        log::error!("save failed: {e}");
                        self.status = "save failed".to_string();
                    }
                }
                Vec::new()
            }
            InputEvent::Quit => Vec::new(),
        }
    }

    /// One scheduling pass; called from the frame loop with the audio
    /// clock's current time.
    pub fn tick(&mut self, now: f64) -> Vec<AudioCommand> {
        self.scheduler.poll(now, &self.drum_loop, &self.store)
    }

    pub fn display_state(&self, now: f64) -> DisplayState {
        let playing = self.scheduler.is_playing();
        DisplayState {
            bpm: self.drum_loop.bpm,
            playing,
            playing_step: playing.then(|| {
                self.scheduler
                    .current_step(now, self.drum_loop.bpm, self.drum_loop.pattern_len())
            }),
            tracks: self
                .drum_loop
                .tracks
                .iter()
                .map(|t| TrackView {
                    name: t.name.clone(),
                    muted: t.muted,
                    pattern: t.pattern.clone(),
                })
                .collect(),
            status: self.status.clone(),
        }
    }
}
