//! The mastering chain: ordered stage dispatch with progress reporting
//!
//! Stage order is fixed: high-pass, equalizer, rebalance, multiband
//! compressor, saturation, stereo imager, limiter, loudness normalizer,
//! and a limiter safety pass after normalization. The input buffer is
//! cloned on entry and never mutated; every stage works in place on the
//! clone. All stage state is constructed fresh per invocation.

use tp_core::AudioBuffer;

use crate::dynamics::MultibandCompressor;
use crate::eq::{EqualizerStage, HighPassStage, RebalanceStage};
use crate::limiter::BrickwallLimiter;
use crate::loudness::LoudnessNormalizer;
use crate::saturation::SaturationStage;
use crate::settings::MasteringSettings;
use crate::stereo::StereoImager;

/// Deterministic multi-stage mastering processor
pub struct MasteringChain {
    settings: MasteringSettings,
}

impl MasteringChain {
    /// Create a chain for the given settings
    pub fn new(settings: MasteringSettings) -> Self {
        Self { settings }
    }

    /// Current settings
    pub fn settings(&self) -> &MasteringSettings {
        &self.settings
    }

    /// Process a buffer, returning a freshly owned result
    pub fn process(&self, input: &AudioBuffer) -> AudioBuffer {
        self.process_with_progress(input, |_, _| {})
    }

    /// Process with a progress observer
    ///
    /// The observer receives `(percent, message)` with percent in
    /// [0, 100], non-decreasing within one call, at least once per
    /// enabled stage, and a final update at 100. It is infallible and
    /// invoked synchronously between stages.
    pub fn process_with_progress<F>(&self, input: &AudioBuffer, mut progress: F) -> AudioBuffer
    where
        F: FnMut(f64, &str),
    {
        let sample_rate = input.sample_rate();
        let fs = sample_rate as f64;
        let s = &self.settings;

        let mut output = input.clone();
        {
            let (left, right) = output.channels_mut();

            if s.high_pass.enabled {
                log::debug!("chain: high-pass at {:.1} Hz", s.high_pass.cutoff_hz);
                HighPassStage::new(&s.high_pass, fs).process(left, right);
                progress(12.0, "Applied high-pass filter");
            }

            if s.equalizer.enabled {
                log::debug!("chain: three-band equalizer");
                EqualizerStage::new(&s.equalizer, fs).process(left, right);
                progress(24.0, "Applied equalizer");
            }

            if s.rebalance.enabled {
                let mut stage = RebalanceStage::new(&s.rebalance, fs);
                if stage.is_active() {
                    log::debug!("chain: pseudo-stem rebalance");
                }
                stage.process(left, right);
                progress(34.0, "Applied stem rebalance");
            }

            if s.multiband.enabled {
                let mut multiband = MultibandCompressor::new(&s.multiband, fs);
                multiband.process(left, right);
                log::debug!(
                    "chain: multiband gain reduction low {:.2} / mid {:.2} / high {:.2} dB",
                    multiband.low_gain_reduction_db(),
                    multiband.mid_gain_reduction_db(),
                    multiband.high_gain_reduction_db()
                );
                progress(52.0, "Applied multiband compression");
            }

            if s.saturation.enabled {
                SaturationStage::new(&s.saturation).process(left, right);
                progress(60.0, "Applied saturation");
            }

            if s.stereo.enabled {
                StereoImager::new(&s.stereo).process(left, right);
                progress(66.0, "Applied stereo imaging");
            }

            if s.limiter.enabled {
                BrickwallLimiter::new(&s.limiter, fs).process(left, right);
                progress(80.0, "Applied limiter");
            }

            if s.loudness.enabled {
                let gain_db =
                    LoudnessNormalizer::new(&s.loudness).process(left, right, sample_rate);
                log::debug!("chain: loudness normalization applied {gain_db:.2} dB");
                progress(92.0, "Normalized loudness");

                // The normalizer applies one global gain measured before
                // normalization; a positive gain can lift peaks back over
                // the ceiling, so the limiter runs again whenever both
                // stages are enabled.
                if s.limiter.enabled {
                    BrickwallLimiter::new(&s.limiter, fs).process(left, right);
                    progress(97.0, "Applied safety limiter pass");
                }
            }
        }

        progress(100.0, "Mastering complete");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine_buffer(freq: f64, amp: f64, frames: usize, rate: u32) -> AudioBuffer {
        let samples: Vec<f32> = (0..frames)
            .map(|i| ((2.0 * PI * freq * i as f64 / rate as f64).sin() * amp) as f32)
            .collect();
        AudioBuffer::from_channels(samples.clone(), samples, rate).unwrap()
    }

    #[test]
    fn test_output_shape_matches_input() {
        let chain = MasteringChain::new(MasteringSettings::default());
        let input = sine_buffer(440.0, 0.5, 96000, 48000);
        let output = chain.process(&input);
        assert_eq!(output.len(), input.len());
        assert_eq!(output.sample_rate(), input.sample_rate());
    }

    #[test]
    fn test_input_is_never_mutated() {
        let chain = MasteringChain::new(MasteringSettings::default());
        let input = sine_buffer(440.0, 0.9, 96000, 48000);
        let snapshot = input.clone();
        let _ = chain.process(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_all_disabled_is_bit_exact_passthrough() {
        let chain = MasteringChain::new(MasteringSettings::bypassed());
        let input = sine_buffer(440.0, 0.9, 48000, 44100);
        let output = chain.process(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_progress_is_monotonic_and_completes() {
        let chain = MasteringChain::new(MasteringSettings::default());
        let input = sine_buffer(440.0, 0.5, 96000, 48000);

        let mut updates: Vec<f64> = Vec::new();
        let _ = chain.process_with_progress(&input, |pct, msg| {
            assert!(!msg.is_empty());
            updates.push(pct);
        });

        // One update per enabled stage (8) + safety pass + completion
        assert!(updates.len() >= 9);
        assert!(updates.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(*updates.last().unwrap(), 100.0);
        assert!(updates[updates.len() - 2] >= 80.0);
    }

    #[test]
    fn test_disabled_stages_emit_no_stage_updates() {
        let chain = MasteringChain::new(MasteringSettings::bypassed());
        let input = sine_buffer(440.0, 0.5, 4800, 48000);

        let mut updates = Vec::new();
        let _ = chain.process_with_progress(&input, |pct, _| updates.push(pct));

        // Only the terminal update remains
        assert_eq!(updates, vec![100.0]);
    }
}
