//! Auto-preset derivation: metrics in, chain parameters out
//!
//! Reads the analysis metrics, reduces the spectrum to three band-energy
//! ratios, turns those plus loudness/dynamics/peak readings into unit
//! factors, and maps the factors onto every chain parameter. The mapping
//! is pure arithmetic: identical metrics and strength always produce a
//! bit-identical snapshot.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisMetrics;
use crate::settings::MasteringSettings;

/// Legal range for the user-facing strength control
pub const STRENGTH_RANGE: (f64, f64) = (0.5, 2.0);

/// Loudness targets the engine snaps to
const TARGET_CHOICES: [f64; 4] = [-16.0, -14.0, -12.0, -9.0];

/// Flattened record of every parameter the auto engine derives
///
/// Applied to a settings tree in one operation so the UI can redraw from
/// `MasteringSettings` afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPresetSnapshot {
    pub high_pass_cutoff_hz: f64,

    pub low_shelf_freq_hz: f64,
    pub low_shelf_gain_db: f64,
    pub mid_freq_hz: f64,
    pub mid_gain_db: f64,
    pub mid_q: f64,
    pub high_shelf_freq_hz: f64,
    pub high_shelf_gain_db: f64,
    pub shelf_q: f64,

    pub low_threshold_db: f64,
    pub low_ratio: f64,
    pub low_attack_ms: f64,
    pub low_release_ms: f64,
    pub mid_threshold_db: f64,
    pub mid_ratio: f64,
    pub mid_attack_ms: f64,
    pub mid_release_ms: f64,
    pub high_threshold_db: f64,
    pub high_ratio: f64,
    pub high_attack_ms: f64,
    pub high_release_ms: f64,

    pub saturation_drive: f64,
    pub stereo_width: f64,
    pub limiter_ceiling_db_tp: f64,
    pub limiter_lookahead_ms: f64,
    pub target_lufs: f64,
}

impl AutoPresetSnapshot {
    /// Copy every derived value into the settings tree and enable all
    /// stages
    pub fn apply_to(&self, settings: &mut MasteringSettings) {
        settings.high_pass.cutoff_hz = self.high_pass_cutoff_hz;

        settings.equalizer.low_shelf_freq_hz = self.low_shelf_freq_hz;
        settings.equalizer.low_shelf_gain_db = self.low_shelf_gain_db;
        settings.equalizer.low_shelf_q = self.shelf_q;
        settings.equalizer.mid_freq_hz = self.mid_freq_hz;
        settings.equalizer.mid_gain_db = self.mid_gain_db;
        settings.equalizer.mid_q = self.mid_q;
        settings.equalizer.high_shelf_freq_hz = self.high_shelf_freq_hz;
        settings.equalizer.high_shelf_gain_db = self.high_shelf_gain_db;
        settings.equalizer.high_shelf_q = self.shelf_q;

        settings.multiband.low.threshold_db = self.low_threshold_db;
        settings.multiband.low.ratio = self.low_ratio;
        settings.multiband.low.attack_ms = self.low_attack_ms;
        settings.multiband.low.release_ms = self.low_release_ms;
        settings.multiband.mid.threshold_db = self.mid_threshold_db;
        settings.multiband.mid.ratio = self.mid_ratio;
        settings.multiband.mid.attack_ms = self.mid_attack_ms;
        settings.multiband.mid.release_ms = self.mid_release_ms;
        settings.multiband.high.threshold_db = self.high_threshold_db;
        settings.multiband.high.ratio = self.high_ratio;
        settings.multiband.high.attack_ms = self.high_attack_ms;
        settings.multiband.high.release_ms = self.high_release_ms;

        settings.saturation.drive = self.saturation_drive;
        settings.stereo.width = self.stereo_width;
        settings.limiter.ceiling_db_tp = self.limiter_ceiling_db_tp;
        settings.limiter.lookahead_ms = self.limiter_lookahead_ms;
        settings.loudness.target_lufs = self.target_lufs;

        settings.set_all_enabled(true);
    }
}

/// Clamp to the unit interval
#[inline]
fn unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Maps analysis metrics to mastering parameters
pub struct AutoPresetEngine;

impl AutoPresetEngine {
    /// Derive a snapshot from metrics at the given strength
    ///
    /// Strength is clamped to [0.5, 2.0]; every output value is clamped
    /// to its documented range regardless of how extreme the metrics are.
    pub fn derive(metrics: &AnalysisMetrics, strength: f64) -> AutoPresetSnapshot {
        let s = strength.clamp(STRENGTH_RANGE.0, STRENGTH_RANGE.1);
        let spectrum = &metrics.spectrum;

        // Band energies over fixed spectrum regions: 0-20%, 20-70%, rest
        let n = spectrum.len();
        let low_end = n / 5;
        let mid_end = n * 7 / 10;
        let low_energy = mean(&spectrum[..low_end]);
        let mid_energy = mean(&spectrum[low_end..mid_end]);
        let high_energy = mean(&spectrum[mid_end..]);

        let low_to_mid = low_energy / mid_energy.max(1e-9);
        let high_to_mid = high_energy / mid_energy.max(1e-9);
        let band_avg = (low_energy + mid_energy + high_energy) / 3.0;
        let mid_to_avg = mid_energy / band_avg.max(1e-9);

        // Unit factors
        let dynamics = unit((metrics.crest_factor_db - 8.0) / 8.0);
        let loudness_lift = unit((-12.0 - metrics.integrated_lufs) / 12.0);
        let compression_intensity =
            unit(0.35 * dynamics + 0.40 * loudness_lift) * (0.8 + 0.35 * (s - 1.0));
        let bass_heavy = unit((low_to_mid - 1.10) / 0.70);
        let bass_light = unit((0.92 - low_to_mid) / 0.50);
        let bright = unit((high_to_mid - 1.08) / 0.55);
        let dark = unit((0.90 - high_to_mid) / 0.45);
        let mid_hole = unit((0.95 - mid_to_avg) / 0.35);
        let peak_risk = unit((metrics.true_peak_dbtp + 0.5) / 0.8);

        let ci = compression_intensity;

        // Corrective EQ scales with the spectral ratios
        let high_pass_cutoff_hz =
            (24.0 + bass_light * 9.0 * s + peak_risk * 4.0 * s - bass_heavy * 6.0)
                .clamp(20.0, 40.0);
        let low_shelf_freq_hz = (105.0 + bass_heavy * 45.0 - bass_light * 18.0).clamp(80.0, 180.0);
        let mid_freq_hz = (1400.0 + mid_hole * 700.0 - bass_heavy * 250.0).clamp(700.0, 2800.0);
        let high_shelf_freq_hz = (8200.0 + dark * 1800.0 - bright * 900.0).clamp(6500.0, 12000.0);

        let low_shelf_gain_db = ((bass_light * 1.4 - bass_heavy * 1.0) * s).clamp(-2.8, 2.8);
        let mid_gain_db = (mid_hole * 1.2 * s).clamp(-1.2, 2.2);
        let high_shelf_gain_db = ((dark * 1.3 - bright * 0.9) * s).clamp(-2.4, 2.6);

        let shelf_q = (0.70 + 0.25 * ci).clamp(0.55, 1.20);
        let mid_q = (1.1 + 0.9 * mid_hole).clamp(1.0, 2.2);

        // Compression: one base threshold, bands offset around it
        let threshold_base = (metrics.rms_dbfs + 8.5 - ci * 2.3 * s).clamp(-30.0, -12.0);
        let attack_base = 10.0 + 10.0 * dynamics;
        let release_base = 130.0 + 110.0 * dynamics;

        AutoPresetSnapshot {
            high_pass_cutoff_hz,

            low_shelf_freq_hz,
            low_shelf_gain_db,
            mid_freq_hz,
            mid_gain_db,
            mid_q,
            high_shelf_freq_hz,
            high_shelf_gain_db,
            shelf_q,

            low_threshold_db: threshold_base - 1.5,
            low_ratio: (1.4 + 1.6 * ci * s).clamp(1.2, 3.2),
            low_attack_ms: attack_base + 6.0,
            low_release_ms: release_base + 35.0,
            mid_threshold_db: threshold_base,
            mid_ratio: (1.4 + 1.4 * ci * s).clamp(1.2, 3.0),
            mid_attack_ms: attack_base,
            mid_release_ms: release_base,
            high_threshold_db: threshold_base + 1.5,
            high_ratio: (1.3 + 1.3 * ci * s).clamp(1.1, 2.8),
            high_attack_ms: attack_base - 4.0,
            high_release_ms: release_base - 20.0,

            saturation_drive: (0.10 + 0.16 * loudness_lift * s + 0.05 * ci).clamp(0.0, 0.35),
            stereo_width: (1.04 + 0.05 * dynamics - 0.08 * bass_heavy).clamp(0.90, 1.14),
            limiter_ceiling_db_tp: (-0.9 - 0.7 * peak_risk).clamp(-1.8, -0.8),
            limiter_lookahead_ms: (2.0 + 5.0 * dynamics).clamp(1.2, 8.0),
            target_lufs: nearest_target(metrics.integrated_lufs),
        }
    }
}

/// Snap the measured loudness to the nearest delivery target
fn nearest_target(integrated_lufs: f64) -> f64 {
    let mut best = TARGET_CHOICES[0];
    for &candidate in &TARGET_CHOICES[1..] {
        if (integrated_lufs - candidate).abs() < (integrated_lufs - best).abs() {
            best = candidate;
        }
    }
    best
}
