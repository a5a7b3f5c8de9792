//! Soft-clip saturation
//!
//! Normalized tanh waveshaper: `y = tanh(x * d) / tanh(d)` with
//! `d = 1 + drive * 6`, so full scale always maps to full scale.
//! Stateless; channels are independent.

use crate::settings::SaturationSettings;

/// tanh soft-clip stage
pub struct SaturationStage {
    drive: f64,
    norm: f64,
    active: bool,
}

impl SaturationStage {
    /// Build from settings; drive clamped to [0, 1]
    pub fn new(settings: &SaturationSettings) -> Self {
        let amount = settings.drive.clamp(0.0, 1.0);
        let drive = 1.0 + amount * 6.0;
        Self {
            drive,
            norm: drive.tanh(),
            // Near-zero drive is bit-exact pass-through
            active: amount > 1e-3,
        }
    }

    /// Shape both channels in place
    pub fn process(&self, left: &mut [f32], right: &mut [f32]) {
        if !self.active {
            return;
        }
        for channel in [left, right] {
            for s in channel.iter_mut() {
                *s = ((*s as f64 * self.drive).tanh() / self.norm) as f32;
            }
        }
    }
}
