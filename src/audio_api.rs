pub use crate::audio::{SampleBuffer, SampleId};

#[derive(Clone, Debug)]
pub struct TriggerParams {
    pub sample: SampleId,
    pub gain: f32,
    /// When to sound, in seconds on the engine's own clock. The
    /// scheduler stamps this ahead of time; the engine converts it to a
    /// frame offset inside whichever render block it lands in.
    pub at: f64,
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (blocks the audio thread), so the
    // sample store decodes buffers up front and registers them here;
    // triggers then refer to samples by id only.
    RegisterSample { id: SampleId, buffer: SampleBuffer },

    Trigger(TriggerParams),

    // Sent on stop: drops every not-yet-sounded pending trigger and
    // silences playing voices, so nothing fires after stop returns.
    CancelScheduled,
}
