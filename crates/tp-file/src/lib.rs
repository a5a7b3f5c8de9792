//! tp-file: Audio file I/O for TonePress
//!
//! - WAV import (via hound) and MP3 import (via symphonia)
//! - Engine shaping: mono duplication, stereo-only policy, linear
//!   resampling onto a supported rate
//! - IEEE-float WAV export
//! - Mastering settings files (JSON)

mod error;
mod loader;
mod settings_file;
mod writer;

pub use error::*;
pub use loader::*;
pub use settings_file::*;
pub use writer::*;
