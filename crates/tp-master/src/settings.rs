//! Mastering chain configuration
//!
//! One sub-record per stage, each with an `enabled` flag and numeric
//! parameters carrying explicit units in their names. Values are not
//! validated here; every stage clamps its own parameters on construction.

use serde::{Deserialize, Serialize};

/// High-pass cleanup stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighPassSettings {
    pub enabled: bool,
    /// Cutoff frequency, clamped to [20, 120] Hz by the stage
    pub cutoff_hz: f64,
}

impl Default for HighPassSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_hz: 30.0,
        }
    }
}

/// Three-band equalizer settings (low shelf, mid bell, high shelf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerSettings {
    pub enabled: bool,
    pub low_shelf_freq_hz: f64,
    pub low_shelf_gain_db: f64,
    /// Shelf Q, clamped to [0.3, 3.0]
    pub low_shelf_q: f64,
    pub mid_freq_hz: f64,
    pub mid_gain_db: f64,
    /// Bell Q, clamped to [0.3, 6.0]
    pub mid_q: f64,
    pub high_shelf_freq_hz: f64,
    pub high_shelf_gain_db: f64,
    pub high_shelf_q: f64,
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            low_shelf_freq_hz: 120.0,
            low_shelf_gain_db: 0.0,
            low_shelf_q: 0.8,
            mid_freq_hz: 1500.0,
            mid_gain_db: 0.0,
            mid_q: 1.2,
            high_shelf_freq_hz: 8000.0,
            high_shelf_gain_db: 0.0,
            high_shelf_q: 0.8,
        }
    }
}

/// Pseudo-stem rebalance settings
///
/// Gains are clamped to [-6, +6] dB by the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSettings {
    pub enabled: bool,
    pub vocal_gain_db: f64,
    pub drum_gain_db: f64,
    pub instrument_gain_db: f64,
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            vocal_gain_db: 0.0,
            drum_gain_db: 0.0,
            instrument_gain_db: 0.0,
        }
    }
}

/// Per-band compressor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSettings {
    pub threshold_db: f64,
    pub ratio: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
}

impl BandSettings {
    fn new(threshold_db: f64, ratio: f64, attack_ms: f64, release_ms: f64) -> Self {
        Self {
            threshold_db,
            ratio,
            attack_ms,
            release_ms,
        }
    }
}

/// Three-band compressor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultibandSettings {
    pub enabled: bool,
    /// Low/mid crossover, clamped to [80, 400] Hz
    pub low_cut_hz: f64,
    /// Mid/high crossover, clamped to [1500, 8000] Hz
    pub high_cut_hz: f64,
    pub low: BandSettings,
    pub mid: BandSettings,
    pub high: BandSettings,
}

impl Default for MultibandSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            low_cut_hz: 150.0,
            high_cut_hz: 4000.0,
            low: BandSettings::new(-22.0, 1.8, 18.0, 180.0),
            mid: BandSettings::new(-20.0, 2.0, 12.0, 150.0),
            high: BandSettings::new(-18.0, 1.6, 8.0, 120.0),
        }
    }
}

/// Soft-clip saturation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationSettings {
    pub enabled: bool,
    /// Normalized drive amount, clamped to [0, 1] by the stage
    pub drive: f64,
}

impl Default for SaturationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            drive: 0.15,
        }
    }
}

/// Mid/side stereo imager settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereoSettings {
    pub enabled: bool,
    /// Side scaling, clamped to [0.7, 1.3] by the stage
    pub width: f64,
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 1.0,
        }
    }
}

/// Lookahead brick-wall limiter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimiterSettings {
    pub enabled: bool,
    pub ceiling_db_tp: f64,
    /// Lookahead, clamped to [0.5, 10] ms
    pub lookahead_ms: f64,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ceiling_db_tp: -1.0,
            lookahead_ms: 5.0,
        }
    }
}

/// Integrated-loudness normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessSettings {
    pub enabled: bool,
    pub target_lufs: f64,
}

impl Default for LoudnessSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            target_lufs: -14.0,
        }
    }
}

/// Complete mastering chain configuration tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasteringSettings {
    pub high_pass: HighPassSettings,
    pub equalizer: EqualizerSettings,
    pub rebalance: RebalanceSettings,
    pub multiband: MultibandSettings,
    pub saturation: SaturationSettings,
    pub stereo: StereoSettings,
    pub limiter: LimiterSettings,
    pub loudness: LoudnessSettings,
}

impl MasteringSettings {
    /// Settings with every stage disabled
    pub fn bypassed() -> Self {
        let mut settings = Self::default();
        settings.set_all_enabled(false);
        settings
    }

    /// Flip every stage's `enabled` flag at once
    pub fn set_all_enabled(&mut self, enabled: bool) {
        self.high_pass.enabled = enabled;
        self.equalizer.enabled = enabled;
        self.rebalance.enabled = enabled;
        self.multiband.enabled = enabled;
        self.saturation.enabled = enabled;
        self.stereo.enabled = enabled;
        self.limiter.enabled = enabled;
        self.loudness.enabled = enabled;
    }
}
