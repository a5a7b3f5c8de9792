//! Audio file loading
//!
//! WAV goes through hound; MP3 (and anything else symphonia can probe)
//! goes through the symphonia decode loop. Decoded material is shaped for
//! the engine: mono is duplicated into both channels, more than two
//! channels is rejected, and off-rate sources are linearly resampled to
//! the nearest supported rate (44.1 kHz below 46 kHz, 48 kHz otherwise).

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tp_core::AudioBuffer;

use crate::error::{FileError, FileResult};

/// Decoded audio before engine shaping
struct RawAudio {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

/// Supported rate a source rate maps to
pub fn target_rate(source_rate: u32) -> u32 {
    if source_rate < 46000 { 44100 } else { 48000 }
}

/// Linear-interpolation resample, edge indices clamped
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = (pos - i0 as f64) as f32;
            samples[i0] * (1.0 - frac) + samples[i1] * frac
        })
        .collect()
}

/// Load an audio file as an engine-ready stereo buffer
pub fn load_audio<P: AsRef<Path>>(path: P) -> FileResult<AudioBuffer> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("wave"));

    let raw = if is_wav {
        read_wav(path)?
    } else {
        read_with_symphonia(path)?
    };

    let buffer = shape_for_engine(raw)?;
    log::info!(
        "loaded {}: {} frames at {} Hz",
        path.display(),
        buffer.len(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

/// Duplicate mono, reject >2 channels, resample to a supported rate
fn shape_for_engine(raw: RawAudio) -> FileResult<AudioBuffer> {
    let (left, right) = match raw.channels.len() {
        1 => {
            let mono = raw.channels.into_iter().next().unwrap_or_default();
            (mono.clone(), mono)
        }
        2 => {
            let mut it = raw.channels.into_iter();
            (it.next().unwrap_or_default(), it.next().unwrap_or_default())
        }
        n => return Err(FileError::UnsupportedChannelLayout(n)),
    };

    let target = target_rate(raw.sample_rate);
    let (left, right) = if raw.sample_rate == target {
        (left, right)
    } else {
        log::info!("resampling {} Hz -> {} Hz", raw.sample_rate, target);
        (
            resample_linear(&left, raw.sample_rate, target),
            resample_linear(&right, raw.sample_rate, target),
        )
    };

    Ok(AudioBuffer::from_channels(left, right, target)?)
}

/// Read WAV via hound
fn read_wav(path: &Path) -> FileResult<RawAudio> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let num_channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / max_value)
                .collect()
        }
    };

    // Deinterleave
    let num_frames = samples.len() / num_channels.max(1);
    let mut channels = vec![Vec::with_capacity(num_frames); num_channels];
    for (i, &sample) in samples.iter().enumerate() {
        channels[i % num_channels].push(sample);
    }

    Ok(RawAudio {
        channels,
        sample_rate: spec.sample_rate,
    })
}

/// Read MP3 (or any probed format) via symphonia
fn read_with_symphonia(path: &Path) -> FileResult<RawAudio> {
    let file =
        File::open(path).map_err(|_| FileError::NotFound(path.display().to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FileError::Decode(e.to_string()))?;

    let mut format_reader = probed.format;
    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| FileError::NoAudioTrack(path.display().to_string()))?;

    let track_id = track.id;
    let num_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::Decode(e.to_string()))?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); num_channels];
    loop {
        match format_reader.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }
                match decoder.decode(&packet) {
                    Ok(decoded) => copy_decoded(&decoded, &mut channels)?,
                    // Recoverable corruption: skip the packet
                    Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                    Err(e) => return Err(FileError::Decode(e.to_string())),
                }
            }
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(FileError::Decode(e.to_string())),
        }
    }

    Ok(RawAudio {
        channels,
        sample_rate,
    })
}

/// Append one decoded packet's samples to the channel vectors
fn copy_decoded(buffer: &AudioBufferRef, output: &mut [Vec<f32>]) -> FileResult<()> {
    match buffer {
        AudioBufferRef::F32(buf) => {
            for (ch, out) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out.extend(buf.chan(ch).iter().copied());
                }
            }
        }
        AudioBufferRef::F64(buf) => {
            for (ch, out) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out.extend(buf.chan(ch).iter().map(|&s| s as f32));
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            for (ch, out) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out.extend(buf.chan(ch).iter().map(|&s| s as f32 / 32768.0));
                }
            }
        }
        AudioBufferRef::S24(buf) => {
            for (ch, out) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out.extend(buf.chan(ch).iter().map(|s| s.0 as f32 / 8388608.0));
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            for (ch, out) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out.extend(buf.chan(ch).iter().map(|&s| s as f32 / 2147483648.0));
                }
            }
        }
        other => {
            return Err(FileError::Decode(format!(
                "unsupported sample format with {} channels",
                other.spec().channels.count()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rate_policy() {
        assert_eq!(target_rate(44100), 44100);
        assert_eq!(target_rate(48000), 48000);
        assert_eq!(target_rate(22050), 44100);
        assert_eq!(target_rate(32000), 44100);
        assert_eq!(target_rate(45999), 44100);
        assert_eq!(target_rate(46000), 48000);
        assert_eq!(target_rate(96000), 48000);
    }

    #[test]
    fn test_resample_identity_at_same_rate() {
        let samples = vec![0.1f32, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 48000, 48000), samples);
    }

    #[test]
    fn test_resample_doubles_length() {
        let samples = vec![0.0f32, 1.0];
        let out = resample_linear(&samples, 24000, 48000);
        assert_eq!(out.len(), 4);
        // Interpolated midpoint between the two source samples
        assert!((out[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resample_preserves_endpoints() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = resample_linear(&samples, 32000, 44100);
        assert_eq!(out[0], samples[0]);
        let expected_len = (100.0f64 * 44100.0 / 32000.0).round() as usize;
        assert_eq!(out.len(), expected_len);
    }

    #[test]
    fn test_mono_is_duplicated() {
        let raw = RawAudio {
            channels: vec![vec![0.1, 0.2, 0.3]],
            sample_rate: 48000,
        };
        let buffer = shape_for_engine(raw).unwrap();
        assert_eq!(buffer.left(), buffer.right());
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_multichannel_is_rejected() {
        let raw = RawAudio {
            channels: vec![vec![0.0; 4]; 6],
            sample_rate: 48000,
        };
        match shape_for_engine(raw) {
            Err(FileError::UnsupportedChannelLayout(6)) => {}
            other => panic!("expected channel layout error, got {other:?}"),
        }
    }

    #[test]
    fn test_off_rate_source_is_resampled() {
        let raw = RawAudio {
            channels: vec![vec![0.5; 22050], vec![0.5; 22050]],
            sample_rate: 22050,
        };
        let buffer = shape_for_engine(raw).unwrap();
        assert_eq!(buffer.sample_rate(), 44100);
        assert_eq!(buffer.len(), 44100);
    }
}
