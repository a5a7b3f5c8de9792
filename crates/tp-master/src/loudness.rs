//! K-weighted integrated loudness and loudness normalization
//!
//! Broadcast-style integrated loudness: K pre-filter, 400 ms blocks with
//! 100 ms hop, absolute gate at -70 LUFS, relative gate 10 LU below the
//! absolutely-gated mean. Measurement always runs on a 48 kHz timeline;
//! 44.1 kHz material is linearly resampled after K-weighting.

use tp_dsp::{Biquad, BiquadCoeffs, MonoProcessor};

use crate::settings::LoudnessSettings;

/// K pre-filter stage 1: high shelf (+4 dB above ~1.5 kHz), 48 kHz design
const K_SHELF: BiquadCoeffs = BiquadCoeffs {
    b0: 1.53512485958697,
    b1: -2.69169618940638,
    b2: 1.19839281085285,
    a1: -1.69065929318241,
    a2: 0.73248077421585,
};

/// K pre-filter stage 2: high-pass (removes < 60 Hz), 48 kHz design
const K_HIGH_PASS: BiquadCoeffs = BiquadCoeffs {
    b0: 1.0,
    b1: -2.0,
    b2: 1.0,
    a1: -1.99004745483398,
    a2: 0.99007225036621,
};

/// Gating timeline is fixed at 48 kHz
const GATE_RATE: f64 = 48000.0;
/// 400 ms gating block
const BLOCK_LEN: usize = 19200;
/// 100 ms hop
const BLOCK_HOP: usize = 4800;
/// Absolute gate threshold
const ABSOLUTE_GATE_LUFS: f64 = -70.0;

/// Cascaded K-weighting filter pair for one channel
struct KWeighting {
    shelf: Biquad,
    high_pass: Biquad,
}

impl KWeighting {
    fn new() -> Self {
        Self {
            shelf: Biquad::new(K_SHELF),
            high_pass: Biquad::new(K_HIGH_PASS),
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        self.high_pass.process(self.shelf.process(input))
    }
}

/// Apply the K pre-filter to a channel
fn k_weight(samples: &[f32]) -> Vec<f64> {
    let mut filter = KWeighting::new();
    samples.iter().map(|&s| filter.process(s as f64)).collect()
}

/// Linear resample onto the 48 kHz gating timeline, edge indices clamped
fn resample_to_gate_rate(samples: &[f64], sample_rate: u32) -> Vec<f64> {
    if sample_rate as f64 == GATE_RATE || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = sample_rate as f64 / GATE_RATE;
    let out_len = (samples.len() as f64 / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = pos - i0 as f64;
            samples[i0] * (1.0 - frac) + samples[i1] * frac
        })
        .collect()
}

fn power_to_lufs(power: f64) -> f64 {
    -0.691 + 10.0 * power.max(1e-12).log10()
}

/// Integrated loudness of a stereo signal in LUFS
///
/// Signals too short for a single 400 ms block gate out entirely and
/// return the -70 LUFS floor.
pub fn integrated_lufs(left: &[f32], right: &[f32], sample_rate: u32) -> f64 {
    let kl = resample_to_gate_rate(&k_weight(left), sample_rate);
    let kr = resample_to_gate_rate(&k_weight(right), sample_rate);
    let len = kl.len().min(kr.len());

    // Mean square per 400 ms block, 100 ms hop
    let mut block_powers = Vec::new();
    let mut start = 0;
    while start + BLOCK_LEN <= len {
        let mut sum = 0.0;
        for i in start..start + BLOCK_LEN {
            sum += (kl[i] * kl[i] + kr[i] * kr[i]) / 2.0;
        }
        block_powers.push(sum / BLOCK_LEN as f64);
        start += BLOCK_HOP;
    }

    // Absolute gate
    let gated: Vec<f64> = block_powers
        .into_iter()
        .filter(|&p| power_to_lufs(p) > ABSOLUTE_GATE_LUFS)
        .collect();
    if gated.is_empty() {
        return ABSOLUTE_GATE_LUFS;
    }

    let abs_mean = gated.iter().sum::<f64>() / gated.len() as f64;
    let abs_integrated = power_to_lufs(abs_mean);

    // Relative gate 10 LU below the absolutely-gated loudness
    let relative_threshold = abs_integrated - 10.0;
    let relatively_gated: Vec<f64> = gated
        .into_iter()
        .filter(|&p| power_to_lufs(p) > relative_threshold)
        .collect();
    if relatively_gated.is_empty() {
        return abs_integrated;
    }

    let mean = relatively_gated.iter().sum::<f64>() / relatively_gated.len() as f64;
    power_to_lufs(mean)
}

/// Global gain toward a target integrated loudness
///
/// Applies one uniform linear gain derived from the pre-normalization
/// measurement. Quiet material with loud transients can therefore exceed
/// the limiter ceiling afterwards; the chain always re-runs the limiter
/// when both stages are enabled.
pub struct LoudnessNormalizer {
    target_lufs: f64,
}

impl LoudnessNormalizer {
    /// Build from settings
    pub fn new(settings: &LoudnessSettings) -> Self {
        Self {
            target_lufs: settings.target_lufs,
        }
    }

    /// Normalize in place; returns the applied gain in dB
    pub fn process(&self, left: &mut [f32], right: &mut [f32], sample_rate: u32) -> f64 {
        let current = integrated_lufs(left, right, sample_rate);
        let gain_db = self.target_lufs - current;
        let gain = 10.0_f64.powf(gain_db / 20.0);

        for s in left.iter_mut() {
            *s = (*s as f64 * gain) as f32;
        }
        for s in right.iter_mut() {
            *s = (*s as f64 * gain) as f32;
        }

        gain_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, amp: f64, frames: usize, rate: f64) -> Vec<f32> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin() as f32 * amp as f32)
            .collect()
    }

    #[test]
    fn test_silence_gates_to_floor() {
        let silence = vec![0.0f32; 96000];
        assert_eq!(integrated_lufs(&silence, &silence, 48000), -70.0);
    }

    #[test]
    fn test_short_buffer_gates_to_floor() {
        let short = vec![0.5f32; 1000];
        assert_eq!(integrated_lufs(&short, &short, 48000), -70.0);
    }

    #[test]
    fn test_sine_loudness_is_plausible() {
        // 1 kHz sits in the flat region of the K curve; a full-scale
        // stereo sine lands a few LU below 0
        let s = sine(1000.0, 1.0, 96000, 48000.0);
        let lufs = integrated_lufs(&s, &s, 48000);
        assert!(lufs > -6.0 && lufs < 0.0, "LUFS was {lufs}");
    }

    #[test]
    fn test_gain_shifts_loudness_linearly() {
        let loud = sine(1000.0, 0.5, 96000, 48000.0);
        let quiet: Vec<f32> = loud.iter().map(|s| s * 0.1).collect();

        let diff = integrated_lufs(&loud, &loud, 48000) - integrated_lufs(&quiet, &quiet, 48000);
        assert!((diff - 20.0).abs() < 0.1, "20 dB gain moved LUFS by {diff}");
    }

    #[test]
    fn test_44100_measurement_close_to_48000() {
        let a = sine(1000.0, 0.5, 96000, 48000.0);
        let b = sine(1000.0, 0.5, 88200, 44100.0);
        let la = integrated_lufs(&a, &a, 48000);
        let lb = integrated_lufs(&b, &b, 44100);
        assert!((la - lb).abs() < 1.0, "48k {la} vs 44.1k {lb}");
    }

    #[test]
    fn test_normalizer_reaches_target() {
        let mut l = sine(440.0, 0.05, 96000, 48000.0);
        let mut r = l.clone();
        let normalizer = LoudnessNormalizer::new(&LoudnessSettings {
            enabled: true,
            target_lufs: -14.0,
        });

        let gain_db = normalizer.process(&mut l, &mut r, 48000);
        assert!(gain_db > 0.0);

        let after = integrated_lufs(&l, &r, 48000);
        assert!((after - -14.0).abs() < 0.5, "normalized to {after}");
    }
}
