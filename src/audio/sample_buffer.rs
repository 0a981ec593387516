use std::path::Path;

/// A decoded drum sample, mono at the engine's rate. One-shots get
/// mixed down on load; stereo placement happens at render time.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<f32>,
}

impl SampleBuffer {
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            anyhow::bail!("wav has zero channels: {}", path.display());
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
            }
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        // mono mixdown: average across channels per frame
        let mut data: Vec<f32> = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        if spec.sample_rate != target_rate {
            data = resample_linear(&data, spec.sample_rate, target_rate);
        }

        if data.is_empty() {
            anyhow::bail!("wav decoded to zero frames: {}", path.display());
        }

        Ok(Self { data })
    }

    pub fn len_frames(&self) -> usize {
        self.data.len()
    }
}

// Plain linear resampler; drum one-shots are short enough that quality
// past this doesn't matter for the sequencer.
fn resample_linear(data: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || data.is_empty() {
        return data.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (data.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos.floor() as usize;
        let frac = (src_pos - idx as f64) as f32;
        if idx + 1 >= data.len() {
            out.push(*data.last().unwrap());
        } else {
            out.push(data[idx] * (1.0 - frac) + data[idx + 1] * frac);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_wav(path: &Path, frames: usize, rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            let s = ((i as f32 * 0.1).sin() * i16::MAX as f32 * 0.5) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn temp_wav(tag: &str, frames: usize, rate: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "loopbox-wav-{tag}-{}.wav",
            std::process::id()
        ));
        write_test_wav(&path, frames, rate);
        path
    }

    #[test]
    fn decodes_int_wav_at_native_rate() {
        let path = temp_wav("native", 441, 44100);
        let buf = SampleBuffer::load_wav(&path, 44100).unwrap();
        assert_eq!(buf.len_frames(), 441);
        assert!(buf.data.iter().all(|s| s.abs() <= 1.0));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn resamples_to_target_rate() {
        let path = temp_wav("resample", 22050, 22050);
        let buf = SampleBuffer::load_wav(&path, 44100).unwrap();
        // half-rate source doubles in length, within rounding
        assert!((buf.len_frames() as i64 - 44100).abs() <= 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/loopbox/kick.wav");
        assert!(SampleBuffer::load_wav(path, 44100).is_err());
    }
}
