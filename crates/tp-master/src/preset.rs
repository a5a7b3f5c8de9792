//! Built-in genre presets
//!
//! Every preset except `Auto` is a fixed set of parameter overrides on
//! top of the current settings. `Auto` is resolved by the caller through
//! the analysis-driven engine; it is identified by a case-insensitive
//! name match.

use serde::{Deserialize, Serialize};

use crate::settings::MasteringSettings;

/// Built-in mastering presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenrePreset {
    /// Metrics-driven; parameters come from the auto-preset engine
    Auto,
    Pop,
    HipHop,
    Edm,
    Rock,
    Acoustic,
}

impl GenrePreset {
    /// All built-in presets in menu order
    pub fn all() -> [GenrePreset; 6] {
        [
            Self::Auto,
            Self::Pop,
            Self::HipHop,
            Self::Edm,
            Self::Rock,
            Self::Acoustic,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Pop => "Pop",
            Self::HipHop => "Hip-Hop",
            Self::Edm => "EDM",
            Self::Rock => "Rock",
            Self::Acoustic => "Acoustic",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auto => "Derives every parameter from the track analysis",
            Self::Pop => "Bright top end, controlled dynamics, streaming loudness",
            Self::HipHop => "Weighted low end, tight mids, loud delivery",
            Self::Edm => "Wide image, saturated, club-level loudness",
            Self::Rock => "Midrange presence with moderate compression",
            Self::Acoustic => "Minimal correction, wide dynamics preserved",
        }
    }

    /// Look up a preset by name, case-insensitively
    pub fn by_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// True for the metrics-driven preset
    pub fn is_auto(&self) -> bool {
        self.name().eq_ignore_ascii_case("auto")
    }

    /// Apply this preset's fixed overrides to the settings tree
    ///
    /// `Auto` leaves the tree untouched; its values come from
    /// [`crate::AutoPresetEngine`] instead.
    pub fn apply(&self, settings: &mut MasteringSettings) {
        match self {
            Self::Auto => {}
            Self::Pop => {
                settings.high_pass.cutoff_hz = 28.0;
                settings.equalizer.low_shelf_gain_db = 1.0;
                settings.equalizer.high_shelf_gain_db = 1.5;
                settings.multiband.low.ratio = 2.2;
                settings.multiband.mid.ratio = 2.4;
                settings.multiband.high.ratio = 2.0;
                settings.saturation.drive = 0.15;
                settings.stereo.width = 1.06;
                settings.loudness.target_lufs = -12.0;
                settings.set_all_enabled(true);
            }
            Self::HipHop => {
                settings.high_pass.cutoff_hz = 24.0;
                settings.equalizer.low_shelf_freq_hz = 100.0;
                settings.equalizer.low_shelf_gain_db = 1.8;
                settings.equalizer.high_shelf_gain_db = 0.8;
                settings.rebalance.drum_gain_db = 1.0;
                settings.multiband.low.ratio = 2.6;
                settings.multiband.mid.ratio = 2.2;
                settings.multiband.high.ratio = 1.8;
                settings.saturation.drive = 0.18;
                settings.stereo.width = 0.98;
                settings.loudness.target_lufs = -9.0;
                settings.set_all_enabled(true);
            }
            Self::Edm => {
                settings.high_pass.cutoff_hz = 30.0;
                settings.equalizer.low_shelf_gain_db = 1.5;
                settings.equalizer.high_shelf_gain_db = 1.8;
                settings.multiband.low.ratio = 2.8;
                settings.multiband.mid.ratio = 2.4;
                settings.multiband.high.ratio = 2.2;
                settings.saturation.drive = 0.22;
                settings.stereo.width = 1.12;
                settings.limiter.ceiling_db_tp = -0.9;
                settings.loudness.target_lufs = -9.0;
                settings.set_all_enabled(true);
            }
            Self::Rock => {
                settings.high_pass.cutoff_hz = 32.0;
                settings.equalizer.mid_gain_db = 0.8;
                settings.equalizer.mid_freq_hz = 1800.0;
                settings.equalizer.high_shelf_gain_db = 0.6;
                settings.multiband.low.ratio = 2.2;
                settings.multiband.mid.ratio = 2.0;
                settings.multiband.high.ratio = 1.8;
                settings.saturation.drive = 0.20;
                settings.stereo.width = 1.04;
                settings.loudness.target_lufs = -12.0;
                settings.set_all_enabled(true);
            }
            Self::Acoustic => {
                settings.high_pass.cutoff_hz = 22.0;
                settings.equalizer.low_shelf_gain_db = 0.4;
                settings.equalizer.high_shelf_gain_db = 0.6;
                settings.multiband.low.ratio = 1.4;
                settings.multiband.mid.ratio = 1.4;
                settings.multiband.high.ratio = 1.3;
                settings.saturation.drive = 0.06;
                settings.stereo.width = 1.0;
                settings.loudness.target_lufs = -16.0;
                settings.set_all_enabled(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(GenrePreset::by_name("auto"), Some(GenrePreset::Auto));
        assert_eq!(GenrePreset::by_name("AUTO"), Some(GenrePreset::Auto));
        assert_eq!(GenrePreset::by_name("hip-hop"), Some(GenrePreset::HipHop));
        assert_eq!(GenrePreset::by_name("EDM"), Some(GenrePreset::Edm));
        assert_eq!(GenrePreset::by_name("polka"), None);
    }

    #[test]
    fn test_only_auto_is_auto() {
        for preset in GenrePreset::all() {
            assert_eq!(preset.is_auto(), preset == GenrePreset::Auto);
        }
    }

    #[test]
    fn test_auto_apply_leaves_settings_unchanged() {
        let mut settings = MasteringSettings::default();
        let before = settings.clone();
        GenrePreset::Auto.apply(&mut settings);
        assert_eq!(settings, before);
    }

    #[test]
    fn test_fixed_presets_are_deterministic() {
        for preset in GenrePreset::all() {
            let mut a = MasteringSettings::default();
            let mut b = MasteringSettings::default();
            preset.apply(&mut a);
            preset.apply(&mut b);
            assert_eq!(a, b, "{} diverged", preset.name());
        }
    }

    #[test]
    fn test_genre_targets_differ() {
        let mut acoustic = MasteringSettings::default();
        let mut edm = MasteringSettings::default();
        GenrePreset::Acoustic.apply(&mut acoustic);
        GenrePreset::Edm.apply(&mut edm);

        assert!(acoustic.loudness.target_lufs < edm.loudness.target_lufs);
        assert!(acoustic.multiband.mid.ratio < edm.multiband.mid.ratio);
        assert!(acoustic.saturation.drive < edm.saturation.drive);
    }
}
