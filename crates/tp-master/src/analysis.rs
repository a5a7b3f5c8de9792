//! Audio analysis for mastering decisions
//!
//! Produces the metric set the auto-preset engine consumes:
//! - Integrated loudness (K-weighted, gated)
//! - True peak estimate (4x linear interpolation)
//! - RMS level and crest factor
//! - 128-band normalized magnitude spectrum

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use serde::Serialize;
use serde_big_array::BigArray;
use tp_core::AudioBuffer;

use crate::loudness;

/// Number of downsampled spectrum bands
pub const SPECTRUM_BANDS: usize = 128;
/// FFT length for the spectrum snapshot
const FFT_SIZE: usize = 2048;

/// Objective metrics of one stereo buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetrics {
    /// Gated integrated loudness (LUFS)
    pub integrated_lufs: f64,
    /// Inter-sample-aware peak estimate (dBTP)
    pub true_peak_dbtp: f64,
    /// Full-buffer RMS (dBFS)
    pub rms_dbfs: f64,
    /// Peak-to-RMS ratio (dB)
    pub crest_factor_db: f64,
    /// Max-normalized magnitude spectrum, each value in [0, 1]
    #[serde(with = "BigArray")]
    pub spectrum: [f64; SPECTRUM_BANDS],
}

impl AnalysisMetrics {
    /// Sentinel metrics for buffers too short to analyze
    pub fn degenerate() -> Self {
        Self {
            integrated_lufs: -70.0,
            true_peak_dbtp: -90.0,
            rms_dbfs: -90.0,
            crest_factor_db: 0.0,
            spectrum: [0.0; SPECTRUM_BANDS],
        }
    }
}

/// Maximum absolute value after 4x linear interpolation between samples
///
/// Scans both channels; approximates the reconstructed inter-sample peak.
pub fn true_peak_linear(left: &[f32], right: &[f32]) -> f64 {
    let mut peak = 0.0f64;
    for channel in [left, right] {
        for pair in channel.windows(2) {
            let a = pair[0] as f64;
            let b = pair[1] as f64;
            peak = peak.max(a.abs());
            for step in 1..4 {
                let t = step as f64 / 4.0;
                peak = peak.max((a + (b - a) * t).abs());
            }
        }
        if let Some(&last) = channel.last() {
            peak = peak.max((last as f64).abs());
        }
    }
    peak
}

/// Stereo buffer analyzer
pub struct AudioAnalyzer {
    fft: Arc<dyn RealToComplex<f64>>,
    window: Vec<f64>,
}

impl AudioAnalyzer {
    /// Create an analyzer (plans the spectrum FFT once)
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Hann window
        let window: Vec<f64> = (0..FFT_SIZE)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / FFT_SIZE as f64;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        Self { fft, window }
    }

    /// Compute the full metric set for a buffer
    pub fn analyze(&self, buffer: &AudioBuffer) -> AnalysisMetrics {
        if buffer.len() < 2 {
            return AnalysisMetrics::degenerate();
        }

        let left = buffer.left();
        let right = buffer.right();
        let frames = buffer.len();

        let mut power_sum = 0.0f64;
        let mut peak = 0.0f64;
        for i in 0..frames {
            let l = left[i] as f64;
            let r = right[i] as f64;
            power_sum += (l * l + r * r) / 2.0;
            peak = peak.max(l.abs()).max(r.abs());
        }

        let rms = (power_sum / frames as f64).sqrt();
        let rms_dbfs = 20.0 * rms.max(1e-9).log10();

        let true_peak = true_peak_linear(left, right);
        let true_peak_dbtp = 20.0 * true_peak.max(1e-9).log10();

        let crest_factor_db = if rms > 1e-9 && peak > 0.0 {
            20.0 * (peak / rms).log10()
        } else {
            0.0
        };

        AnalysisMetrics {
            integrated_lufs: loudness::integrated_lufs(left, right, buffer.sample_rate()),
            true_peak_dbtp,
            rms_dbfs,
            crest_factor_db,
            spectrum: self.spectrum(buffer),
        }
    }

    /// 128-band normalized spectrum of a center-aligned mono window
    fn spectrum(&self, buffer: &AudioBuffer) -> [f64; SPECTRUM_BANDS] {
        let mono = buffer.to_mono();
        let mut input = vec![0.0f64; FFT_SIZE];

        // Center-align; shorter buffers are zero-padded around the middle
        if mono.len() >= FFT_SIZE {
            let start = (mono.len() - FFT_SIZE) / 2;
            for (i, slot) in input.iter_mut().enumerate() {
                *slot = mono[start + i] as f64;
            }
        } else {
            let offset = (FFT_SIZE - mono.len()) / 2;
            for (i, &s) in mono.iter().enumerate() {
                input[offset + i] = s as f64;
            }
        }

        for (slot, w) in input.iter_mut().zip(self.window.iter()) {
            *slot *= w;
        }

        let mut complex = self.fft.make_output_vec();
        self.fft.process(&mut input, &mut complex).ok();

        // First half of the bins, nearest-index downsample to 128 bands
        let mut bands = [0.0f64; SPECTRUM_BANDS];
        for (i, band) in bands.iter_mut().enumerate() {
            let bin = i * (FFT_SIZE / 2) / SPECTRUM_BANDS;
            *band = complex[bin].norm();
        }

        let max = bands.iter().cloned().fold(0.0f64, f64::max);
        if max > 0.0 {
            for band in bands.iter_mut() {
                *band /= max;
            }
        }

        bands
    }
}

impl Default for AudioAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
