//! Mid/side stereo imager
//!
//! Width scales the side signal only: `mid = (L+R)/2`,
//! `side = (L-R)/2 * width`, then decode back to L/R. Width 1.0 is a
//! bit-exact pass-through.

use crate::settings::StereoSettings;

/// Stereo width stage
pub struct StereoImager {
    width: f64,
    active: bool,
}

impl StereoImager {
    /// Build from settings; width clamped to [0.7, 1.3]
    pub fn new(settings: &StereoSettings) -> Self {
        let width = settings.width.clamp(0.7, 1.3);
        Self {
            width,
            active: (width - 1.0).abs() > 1e-6,
        }
    }

    /// Rescale the side channel in place
    pub fn process(&self, left: &mut [f32], right: &mut [f32]) {
        if !self.active {
            return;
        }
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mid = (*l as f64 + *r as f64) * 0.5;
            let side = (*l as f64 - *r as f64) * 0.5 * self.width;
            *l = (mid + side) as f32;
            *r = (mid - side) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(width: f64) -> StereoSettings {
        StereoSettings {
            enabled: true,
            width,
        }
    }

    #[test]
    fn test_unity_width_is_identity() {
        let stage = StereoImager::new(&settings(1.0));
        let mut l = vec![0.5f32, -0.25];
        let mut r = vec![0.1f32, 0.7];
        let (ol, or) = (l.clone(), r.clone());
        stage.process(&mut l, &mut r);
        assert_eq!(l, ol);
        assert_eq!(r, or);
    }

    #[test]
    fn test_narrow_scales_side_exactly() {
        let stage = StereoImager::new(&settings(0.7));
        let mut l = vec![0.8f32];
        let mut r = vec![0.2f32];
        stage.process(&mut l, &mut r);

        // Original side was 0.3; narrowed side must be exactly 0.7x
        let side = (l[0] - r[0]) as f64 * 0.5;
        assert!((side - 0.3 * 0.7).abs() < 1e-7);
        // Mid is untouched
        let mid = (l[0] + r[0]) as f64 * 0.5;
        assert!((mid - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_wide_scales_side_exactly() {
        let stage = StereoImager::new(&settings(1.3));
        let mut l = vec![0.8f32];
        let mut r = vec![0.2f32];
        stage.process(&mut l, &mut r);

        let side = (l[0] - r[0]) as f64 * 0.5;
        assert!((side - 0.3 * 1.3).abs() < 1e-7);
    }

    #[test]
    fn test_width_is_clamped() {
        let stage = StereoImager::new(&settings(9.0));
        let mut l = vec![1.0f32];
        let mut r = vec![-1.0f32];
        stage.process(&mut l, &mut r);
        // Clamped to 1.3: side 1.0 -> 1.3
        assert!((l[0] - 1.3).abs() < 1e-6);
        assert!((r[0] + 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_mono_signal_unaffected() {
        let stage = StereoImager::new(&settings(1.3));
        let mut l = vec![0.4f32; 16];
        let mut r = vec![0.4f32; 16];
        stage.process(&mut l, &mut r);
        for (a, b) in l.iter().zip(r.iter()) {
            assert!((a - 0.4).abs() < 1e-7);
            assert!((b - 0.4).abs() < 1e-7);
        }
    }
}
