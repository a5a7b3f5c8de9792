//! Filter-based chain stages: high-pass cleanup, three-band EQ,
//! pseudo-stem rebalance
//!
//! Every stage owns one filter set per channel and streams samples in
//! place. Parameters are clamped here, at the stage edge, so arbitrary
//! settings values can never produce an unstable design.

use tp_dsp::{Biquad, MonoProcessor};

use crate::settings::{EqualizerSettings, HighPassSettings, RebalanceSettings};

const SHELF_Q_RANGE: (f64, f64) = (0.3, 3.0);
const BELL_Q_RANGE: (f64, f64) = (0.3, 6.0);

fn run_cascade(filters: &mut [Biquad], samples: &mut [f32]) {
    for s in samples.iter_mut() {
        let mut value = *s as f64;
        for filter in filters.iter_mut() {
            value = filter.process(value);
        }
        *s = value as f32;
    }
}

/// Second-order high-pass cleanup, one biquad per channel
pub struct HighPassStage {
    left: Biquad,
    right: Biquad,
}

impl HighPassStage {
    /// Build from settings; cutoff clamped to [20, 120] Hz
    pub fn new(settings: &HighPassSettings, sample_rate: f64) -> Self {
        let cutoff = settings.cutoff_hz.clamp(20.0, 120.0);
        Self {
            left: Biquad::high_pass(sample_rate, cutoff, 0.707),
            right: Biquad::high_pass(sample_rate, cutoff, 0.707),
        }
    }

    /// Filter both channels in place
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        run_cascade(std::slice::from_mut(&mut self.left), left);
        run_cascade(std::slice::from_mut(&mut self.right), right);
    }
}

/// Low-shelf, mid-bell, high-shelf cascade per channel
pub struct EqualizerStage {
    left: [Biquad; 3],
    right: [Biquad; 3],
}

impl EqualizerStage {
    /// Build from settings; shelf Q clamped to [0.3, 3], bell Q to [0.3, 6]
    pub fn new(settings: &EqualizerSettings, sample_rate: f64) -> Self {
        let build = || {
            [
                Biquad::low_shelf(
                    sample_rate,
                    settings.low_shelf_freq_hz,
                    settings.low_shelf_gain_db,
                    settings.low_shelf_q.clamp(SHELF_Q_RANGE.0, SHELF_Q_RANGE.1),
                ),
                Biquad::peaking(
                    sample_rate,
                    settings.mid_freq_hz,
                    settings.mid_gain_db,
                    settings.mid_q.clamp(BELL_Q_RANGE.0, BELL_Q_RANGE.1),
                ),
                Biquad::high_shelf(
                    sample_rate,
                    settings.high_shelf_freq_hz,
                    settings.high_shelf_gain_db,
                    settings.high_shelf_q.clamp(SHELF_Q_RANGE.0, SHELF_Q_RANGE.1),
                ),
            ]
        };

        Self {
            left: build(),
            right: build(),
        }
    }

    /// Run the cascade over both channels in place
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        run_cascade(&mut self.left, left);
        run_cascade(&mut self.right, right);
    }
}

/// Fixed peaking-filter pairs emulating per-stem gain
///
/// Each stem gain drives two bells at fixed centers with fixed fractional
/// weights; the secondary bell carries less of the gain than the primary.
struct StemBells {
    freqs: [f64; 2],
    weights: [f64; 2],
    qs: [f64; 2],
}

const VOCAL_BELLS: StemBells = StemBells {
    freqs: [2800.0, 1200.0],
    weights: [0.70, 0.35],
    qs: [1.0, 0.9],
};

const DRUM_BELLS: StemBells = StemBells {
    freqs: [95.0, 4200.0],
    weights: [0.70, 0.35],
    qs: [1.1, 1.4],
};

const INSTRUMENT_BELLS: StemBells = StemBells {
    freqs: [650.0, 5200.0],
    weights: [0.60, 0.30],
    qs: [0.9, 1.2],
};

/// Pseudo-stem rebalance: six peaking filters per channel
pub struct RebalanceStage {
    left: Vec<Biquad>,
    right: Vec<Biquad>,
    active: bool,
}

impl RebalanceStage {
    /// Build from settings; stem gains clamped to [-6, +6] dB
    pub fn new(settings: &RebalanceSettings, sample_rate: f64) -> Self {
        let vocal = settings.vocal_gain_db.clamp(-6.0, 6.0);
        let drum = settings.drum_gain_db.clamp(-6.0, 6.0);
        let instrument = settings.instrument_gain_db.clamp(-6.0, 6.0);

        let active = vocal.abs() >= 0.01 || drum.abs() >= 0.01 || instrument.abs() >= 0.01;

        let build = || {
            let mut filters = Vec::with_capacity(6);
            for (gain, bells) in [
                (vocal, &VOCAL_BELLS),
                (drum, &DRUM_BELLS),
                (instrument, &INSTRUMENT_BELLS),
            ] {
                for i in 0..2 {
                    filters.push(Biquad::peaking(
                        sample_rate,
                        bells.freqs[i],
                        gain * bells.weights[i],
                        bells.qs[i],
                    ));
                }
            }
            filters
        };

        Self {
            left: build(),
            right: build(),
            active,
        }
    }

    /// True when any stem gain is large enough to matter
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run all six bells over both channels; no-op below the gain floor
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.active {
            return;
        }
        run_cascade(&mut self.left, left);
        run_cascade(&mut self.right, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, frames: usize, rate: f64) -> Vec<f32> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin() as f32 * 0.5)
            .collect()
    }

    fn rms(samples: &[f32]) -> f64 {
        (samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_high_pass_attenuates_sub_bass() {
        let settings = HighPassSettings {
            enabled: true,
            cutoff_hz: 120.0,
        };
        let mut stage = HighPassStage::new(&settings, 48000.0);

        let mut l = sine(20.0, 48000, 48000.0);
        let mut r = l.clone();
        let before = rms(&l);
        stage.process(&mut l, &mut r);

        assert!(rms(&l) < before * 0.2, "20 Hz not attenuated");
    }

    #[test]
    fn test_high_pass_cutoff_is_clamped() {
        // 500 Hz requested, clamped to 120; a 300 Hz tone must survive
        let settings = HighPassSettings {
            enabled: true,
            cutoff_hz: 500.0,
        };
        let mut stage = HighPassStage::new(&settings, 48000.0);

        let mut l = sine(300.0, 48000, 48000.0);
        let mut r = l.clone();
        let before = rms(&l);
        stage.process(&mut l, &mut r);

        assert!(rms(&l) > before * 0.6);
    }

    #[test]
    fn test_flat_eq_is_transparent() {
        let mut stage = EqualizerStage::new(&EqualizerSettings::default(), 48000.0);
        let mut l = sine(440.0, 4800, 48000.0);
        let mut r = l.clone();
        let original = l.clone();
        stage.process(&mut l, &mut r);

        for (a, b) in l.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_low_shelf_boost_raises_bass_level() {
        let settings = EqualizerSettings {
            low_shelf_gain_db: 4.0,
            ..Default::default()
        };
        let mut stage = EqualizerStage::new(&settings, 48000.0);
        let mut l = sine(60.0, 48000, 48000.0);
        let mut r = l.clone();
        let before = rms(&l);
        stage.process(&mut l, &mut r);

        let gain_db = 20.0 * (rms(&l) / before).log10();
        assert!(gain_db > 3.0, "shelf boost only {gain_db:.2} dB");
    }

    #[test]
    fn test_rebalance_noop_below_threshold() {
        let settings = RebalanceSettings {
            enabled: true,
            vocal_gain_db: 0.005,
            drum_gain_db: -0.002,
            instrument_gain_db: 0.0,
        };
        let mut stage = RebalanceStage::new(&settings, 48000.0);
        assert!(!stage.is_active());

        let mut l = sine(440.0, 4800, 48000.0);
        let mut r = l.clone();
        let original = l.clone();
        stage.process(&mut l, &mut r);
        assert_eq!(l, original);
    }

    #[test]
    fn test_rebalance_vocal_boost_lifts_presence() {
        let settings = RebalanceSettings {
            enabled: true,
            vocal_gain_db: 6.0,
            drum_gain_db: 0.0,
            instrument_gain_db: 0.0,
        };
        let mut stage = RebalanceStage::new(&settings, 48000.0);
        assert!(stage.is_active());

        let mut l = sine(2800.0, 48000, 48000.0);
        let mut r = l.clone();
        let before = rms(&l);
        stage.process(&mut l, &mut r);

        // Primary vocal bell carries 0.70 of the 6 dB
        let gain_db = 20.0 * (rms(&l) / before).log10();
        assert!(gain_db > 3.0, "vocal bell applied {gain_db:.2} dB");
    }

    #[test]
    fn test_rebalance_gain_is_clamped() {
        let settings = RebalanceSettings {
            enabled: true,
            vocal_gain_db: 40.0,
            drum_gain_db: 0.0,
            instrument_gain_db: 0.0,
        };
        let mut stage = RebalanceStage::new(&settings, 48000.0);
        let mut l = sine(2800.0, 48000, 48000.0);
        let mut r = l.clone();
        let before = rms(&l);
        stage.process(&mut l, &mut r);

        // Clamped to +6 dB, weighted 0.70: well under 6 dB of lift
        let gain_db = 20.0 * (rms(&l) / before).log10();
        assert!(gain_db < 6.0, "clamp failed, applied {gain_db:.2} dB");
    }
}
