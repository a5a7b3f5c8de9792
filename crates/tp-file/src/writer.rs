//! WAV export
//!
//! IEEE-float 32-bit stereo at the buffer's sample rate. Samples are
//! written as-is; keeping them inside [-1, 1] is the limiter's job.

use std::path::Path;

use tp_core::AudioBuffer;

use crate::error::FileResult;

/// Write a stereo buffer as a 32-bit float WAV file
pub fn write_wav_float<P: AsRef<Path>>(path: P, buffer: &AudioBuffer) -> FileResult<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for i in 0..buffer.len() {
        writer.write_sample(buffer.left()[i])?;
        writer.write_sample(buffer.right()[i])?;
    }
    writer.finalize()?;

    log::info!(
        "wrote {}: {} frames at {} Hz",
        path.display(),
        buffer.len(),
        buffer.sample_rate()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_audio;

    fn ramp_buffer(frames: usize, rate: u32) -> AudioBuffer {
        let left: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        AudioBuffer::from_channels(left, right, rate).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wav");

        let buffer = ramp_buffer(4800, 48000);
        write_wav_float(&path, &buffer).unwrap();

        let back = load_audio(&path).unwrap();
        assert_eq!(back.sample_rate(), 48000);
        assert_eq!(back.len(), buffer.len());
        assert_eq!(back.left(), buffer.left());
        assert_eq!(back.right(), buffer.right());
    }

    #[test]
    fn test_out_of_range_samples_survive_unclamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");

        let buffer =
            AudioBuffer::from_channels(vec![1.5f32, -1.5], vec![0.0, 0.0], 44100).unwrap();
        write_wav_float(&path, &buffer).unwrap();

        let back = load_audio(&path).unwrap();
        assert_eq!(back.left(), &[1.5, -1.5]);
    }
}
