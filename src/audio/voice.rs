use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;

/// One sounding instance of a sample. `delay` counts frames until the
/// onset so a trigger scheduled mid-block starts exactly where the
/// scheduler stamped it, not at the block edge.
#[derive(Clone, Copy, Debug)]
pub struct Voice {
    pub sample: SampleId,
    pub active: bool,
    gain: f32,
    pos: usize,
    delay: usize,
}

impl Voice {
    pub fn new(sample: SampleId, gain: f32, delay: usize) -> Self {
        Self {
            sample,
            active: true,
            gain,
            pos: 0,
            delay,
        }
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let mut i = 0;
        while i < out.len() && self.delay > 0 {
            self.delay -= 1;
            i += 1;
        }
        for frame in &mut out[i..] {
            let Some(&s) = buffer.data.get(self.pos) else {
                self.active = false;
                break;
            };
            frame.left += s * self.gain;
            frame.right += s * self.gain;
            self.pos += 1;
        }
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sample_id::next_sample_id;

    #[test]
    fn delay_offsets_onset_within_block() {
        let buffer = SampleBuffer { data: vec![1.0; 4] };
        let mut voice = Voice::new(next_sample_id(), 0.5, 3);
        let mut out = [StereoFrame::default(); 8];
        voice.render_into(&buffer, &mut out);

        assert_eq!(out[2].left, 0.0);
        assert_eq!(out[3].left, 0.5);
        assert_eq!(out[6].left, 0.5);
        assert_eq!(out[7].left, 0.0);
        assert!(!voice.active);
    }

    #[test]
    fn voice_spans_blocks_and_ends_at_buffer_end() {
        let buffer = SampleBuffer { data: vec![1.0; 6] };
        let mut voice = Voice::new(next_sample_id(), 1.0, 0);
        let mut a = [StereoFrame::default(); 4];
        let mut b = [StereoFrame::default(); 4];
        voice.render_into(&buffer, &mut a);
        assert!(voice.active);
        voice.render_into(&buffer, &mut b);
        assert!(!voice.active);
        assert_eq!(b[1].right, 1.0);
        assert_eq!(b[2].right, 0.0);
    }
}
