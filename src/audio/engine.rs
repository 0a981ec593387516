use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::audio_api::{AudioCommand, TriggerParams};

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;
use super::voice::Voice;

const MAX_VOICES: usize = 16; // hard cap so we won't grow in the audio callback
const MAX_PENDING: usize = 64;

#[derive(Clone, Copy, Debug)]
struct PendingTrigger {
    sample: SampleId,
    gain: f32,
    at_frame: u64,
}

/// Runs inside the cpal callback. Owns the registered sample buffers,
/// the triggers waiting for their timestamp, and a fixed voice pool.
/// Publishes its frame counter so the scheduler polls against the
/// audio clock rather than wall time.
pub struct Engine {
    sample_rate: f64,
    samples: HashMap<SampleId, SampleBuffer>,
    pending: Vec<PendingTrigger>,
    voices: Vec<Voice>,
    frames_rendered: u64,
    clock: Arc<AtomicU64>,
}

impl Engine {
    pub fn new(sample_rate: u32, clock: Arc<AtomicU64>) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            samples: HashMap::new(),
            pending: Vec::with_capacity(MAX_PENDING),
            voices: Vec::with_capacity(MAX_VOICES),
            frames_rendered: 0,
            clock,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { id, buffer } => {
                self.samples.insert(id, buffer);
            }
            AudioCommand::Trigger(t) => self.queue_trigger(t),
            AudioCommand::CancelScheduled => self.cancel_scheduled(),
        }
    }

    fn queue_trigger(&mut self, t: TriggerParams) {
        if self.pending.len() >= MAX_PENDING {
            return; // at capacity: the trigger is shed, not rescheduled
        }
        let at_frame = (t.at.max(0.0) * self.sample_rate) as u64;
        self.pending.push(PendingTrigger {
            sample: t.sample,
            gain: t.gain,
            at_frame,
        });
    }

    // Stop contract: nothing sounds after this, including triggers
    // already sitting inside the look-ahead window.
    fn cancel_scheduled(&mut self) {
        self.pending.clear();
        self.voices.clear();
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        for frame in out.iter_mut() {
            *frame = StereoFrame::default();
        }

        let block_start = self.frames_rendered;
        let block_end = block_start + out.len() as u64;

        // promote pending triggers whose time falls inside this block;
        // anything already late starts at the block edge
        let mut i = 0;
        while i < self.pending.len() {
            let p = self.pending[i];
            if p.at_frame < block_end {
                self.pending.swap_remove(i);
                if self.voices.len() < MAX_VOICES && self.samples.contains_key(&p.sample) {
                    let delay = p.at_frame.saturating_sub(block_start) as usize;
                    self.voices.push(Voice::new(p.sample, p.gain, delay));
                }
            } else {
                i += 1;
            }
        }

        for voice in &mut self.voices {
            if let Some(buffer) = self.samples.get(&voice.sample) {
                voice.render_into(buffer, out);
            } else {
                voice.active = false;
            }
        }
        self.voices.retain(|v| v.active);

        self.frames_rendered = block_end;
        self.clock.store(block_end, Ordering::Relaxed);
    }
}
