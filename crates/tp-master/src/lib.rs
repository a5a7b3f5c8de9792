//! tp-master: TonePress mastering engine
//!
//! Offline analysis and mastering for stereo program material:
//!
//! ## Features
//! - **Analysis**: K-weighted integrated loudness, true-peak estimate,
//!   RMS, crest factor, 128-band spectrum
//! - **Mastering chain**: high-pass, three-band EQ, pseudo-stem
//!   rebalance, three-band compression, soft-clip saturation, stereo
//!   imaging, lookahead brick-wall limiting, loudness normalization
//! - **Auto preset**: derives every chain parameter from the analysis
//! - **Genre presets**: fixed parameter sets for common material
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tp_master::{AudioAnalyzer, AutoPresetEngine, MasteringChain, MasteringSettings};
//!
//! let analyzer = AudioAnalyzer::new();
//! let metrics = analyzer.analyze(&buffer);
//!
//! let mut settings = MasteringSettings::default();
//! AutoPresetEngine::derive(&metrics, 1.0).apply_to(&mut settings);
//!
//! let mastered = MasteringChain::new(settings).process(&buffer);
//! ```

pub mod analysis;
pub mod autopreset;
pub mod chain;
pub mod dynamics;
pub mod eq;
pub mod limiter;
pub mod loudness;
pub mod preset;
pub mod saturation;
pub mod settings;
pub mod stereo;

pub use analysis::{AnalysisMetrics, AudioAnalyzer, SPECTRUM_BANDS};
pub use autopreset::{AutoPresetEngine, AutoPresetSnapshot, STRENGTH_RANGE};
pub use chain::MasteringChain;
pub use preset::GenrePreset;
pub use settings::MasteringSettings;
