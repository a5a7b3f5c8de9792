//! Per-band compression and the three-way multiband compressor
//!
//! The band compressor is a classic envelope follower plus smoothed gain
//! computer, all math in dB domain with epsilon floors. The multiband
//! stage splits with one-pole crossovers (low / mid-by-subtraction / high)
//! and recombines by summation, so unity ratios reconstruct the input.

use tp_dsp::{MonoProcessor, OnePole};

use crate::settings::{BandSettings, MultibandSettings};

const LOW_CUT_RANGE: (f64, f64) = (80.0, 400.0);
const HIGH_CUT_RANGE: (f64, f64) = (1500.0, 8000.0);

/// Single-band compressor with envelope follower and gain smoother
///
/// Envelope starts at 0 and gain at 1; instances are built fresh for every
/// chain invocation, never reused across buffers.
pub struct BandCompressor {
    threshold_db: f64,
    ratio: f64,
    attack: f64,
    release: f64,
    envelope: f64,
    gain: f64,
}

impl BandCompressor {
    /// Build from band settings at the given sample rate
    pub fn new(settings: &BandSettings, sample_rate: f64) -> Self {
        Self {
            threshold_db: settings.threshold_db,
            ratio: settings.ratio,
            attack: (-1.0 / (settings.attack_ms.max(0.1) * 1e-3 * sample_rate)).exp(),
            release: (-1.0 / (settings.release_ms.max(1.0) * 1e-3 * sample_rate)).exp(),
            envelope: 0.0,
            gain: 1.0,
        }
    }

    /// Compress one sample
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let rectified = input.abs();
        self.envelope = if rectified > self.envelope {
            self.attack * self.envelope + (1.0 - self.attack) * rectified
        } else {
            self.release * self.envelope + (1.0 - self.release) * rectified
        };

        let in_db = 20.0 * self.envelope.max(1e-9).log10();
        let out_db = if in_db <= self.threshold_db {
            in_db
        } else {
            self.threshold_db + (in_db - self.threshold_db) / self.ratio.max(1.0)
        };

        let target = 10.0_f64.powf((out_db - in_db) / 20.0);
        self.gain = if target < self.gain {
            self.attack * self.gain + (1.0 - self.attack) * target
        } else {
            self.release * self.gain + (1.0 - self.release) * target
        };

        input * self.gain
    }

    /// Current gain reduction in dB (positive when reducing)
    pub fn gain_reduction_db(&self) -> f64 {
        -20.0 * self.gain.max(1e-9).log10()
    }
}

/// One-pole crossover pair for one channel
struct BandSplitter {
    low_lp: OnePole,
    high_lp: OnePole,
}

impl BandSplitter {
    fn new(low_cut_hz: f64, high_cut_hz: f64, sample_rate: f64) -> Self {
        Self {
            low_lp: OnePole::new(sample_rate, low_cut_hz),
            high_lp: OnePole::new(sample_rate, high_cut_hz),
        }
    }

    /// Split one sample into (low, mid, high); bands sum back to the input
    #[inline]
    fn split(&mut self, input: f64) -> (f64, f64, f64) {
        let low = self.low_lp.process(input);
        let high = input - self.high_lp.process(input);
        let mid = input - low - high;
        (low, mid, high)
    }
}

/// Three-band compressor: split, compress per band, sum
pub struct MultibandCompressor {
    split_left: BandSplitter,
    split_right: BandSplitter,
    // One compressor per band; both channels run through the same
    // instance, so envelope and gain track the interleaved L/R stream.
    low: BandCompressor,
    mid: BandCompressor,
    high: BandCompressor,
}

impl MultibandCompressor {
    /// Build from settings; crossovers clamped to their legal ranges
    pub fn new(settings: &MultibandSettings, sample_rate: f64) -> Self {
        let low_cut = settings.low_cut_hz.clamp(LOW_CUT_RANGE.0, LOW_CUT_RANGE.1);
        let high_cut = settings.high_cut_hz.clamp(HIGH_CUT_RANGE.0, HIGH_CUT_RANGE.1);

        Self {
            split_left: BandSplitter::new(low_cut, high_cut, sample_rate),
            split_right: BandSplitter::new(low_cut, high_cut, sample_rate),
            low: BandCompressor::new(&settings.low, sample_rate),
            mid: BandCompressor::new(&settings.mid, sample_rate),
            high: BandCompressor::new(&settings.high, sample_rate),
        }
    }

    #[inline]
    fn compress_bands(&mut self, low: f64, mid: f64, high: f64) -> f64 {
        self.low.process(low) + self.mid.process(mid) + self.high.process(high)
    }

    /// Process both channels in place, left sample before right
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        for i in 0..left.len().min(right.len()) {
            let (ll, lm, lh) = self.split_left.split(left[i] as f64);
            left[i] = self.compress_bands(ll, lm, lh) as f32;

            let (rl, rm, rh) = self.split_right.split(right[i] as f64);
            right[i] = self.compress_bands(rl, rm, rh) as f32;
        }
    }

    /// Low band gain reduction after processing (dB)
    pub fn low_gain_reduction_db(&self) -> f64 {
        self.low.gain_reduction_db()
    }

    /// Mid band gain reduction after processing (dB)
    pub fn mid_gain_reduction_db(&self) -> f64 {
        self.mid.gain_reduction_db()
    }

    /// High band gain reduction after processing (dB)
    pub fn high_gain_reduction_db(&self) -> f64 {
        self.high.gain_reduction_db()
    }
}
