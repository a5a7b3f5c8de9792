//! Lookahead brick-wall limiter with true-peak safety
//!
//! Per-sample forward scan over the lookahead window, instant attack,
//! smoothed release, then a single constant trim if the 4x-interpolated
//! true peak still exceeds the ceiling. The scan is O(N * lookahead);
//! lookahead is bounded at 10 ms so the cost stays linear in practice.

use crate::analysis::true_peak_linear;
use crate::settings::LimiterSettings;

/// Brick-wall limiter stage
pub struct BrickwallLimiter {
    ceiling: f64,
    lookahead: usize,
    release: f64,
}

impl BrickwallLimiter {
    /// Build from settings; lookahead clamped to [0.5, 10] ms
    pub fn new(settings: &LimiterSettings, sample_rate: f64) -> Self {
        let lookahead_ms = settings.lookahead_ms.clamp(0.5, 10.0);
        Self {
            ceiling: 10.0_f64.powf(settings.ceiling_db_tp / 20.0),
            lookahead: ((lookahead_ms * 1e-3 * sample_rate).round() as usize).max(1),
            release: (-1.0 / (0.05 * sample_rate)).exp(),
        }
    }

    /// Linear ceiling value
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Limit both channels in place
    pub fn process(&self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        if frames == 0 {
            return;
        }

        let mut gain = 1.0f64;
        for i in 0..frames {
            // Peak over the lookahead window starting at this sample
            let end = (i + self.lookahead).min(frames - 1);
            let mut peak = 0.0f64;
            for j in i..=end {
                peak = peak.max((left[j] as f64).abs()).max((right[j] as f64).abs());
            }

            let desired = if peak > self.ceiling {
                self.ceiling / peak
            } else {
                1.0
            };

            // Instant attack, smoothed release
            gain = if desired < gain {
                desired
            } else {
                self.release * gain + (1.0 - self.release) * desired
            };

            left[i] = (left[i] as f64 * gain) as f32;
            right[i] = (right[i] as f64 * gain) as f32;
        }

        // True-peak safety: one constant trim across the whole buffer
        let true_peak = true_peak_linear(left, right);
        if true_peak > self.ceiling {
            let trim = self.ceiling / true_peak;
            for s in left.iter_mut().chain(right.iter_mut()) {
                *s = (*s as f64 * trim) as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn limiter(ceiling_db_tp: f64) -> BrickwallLimiter {
        BrickwallLimiter::new(
            &LimiterSettings {
                enabled: true,
                ceiling_db_tp,
                lookahead_ms: 5.0,
            },
            48000.0,
        )
    }

    fn sine(freq: f64, amp: f64, frames: usize, rate: f64) -> Vec<f32> {
        (0..frames)
            .map(|i| ((2.0 * PI * freq * i as f64 / rate).sin() * amp) as f32)
            .collect()
    }

    #[test]
    fn test_quiet_signal_passes() {
        let lim = limiter(-1.0);
        let mut l = sine(440.0, 0.25, 4800, 48000.0);
        let mut r = l.clone();
        let orig = l.clone();
        lim.process(&mut l, &mut r);

        // Well under the ceiling: gain stays at unity
        for (a, b) in l.iter().zip(orig.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_true_peak_held_under_ceiling() {
        let lim = limiter(-1.0);
        let mut l = sine(997.0, 1.0, 96000, 48000.0);
        let mut r = l.clone();
        lim.process(&mut l, &mut r);

        let tp = true_peak_linear(&l, &r);
        assert!(
            tp <= lim.ceiling() + 1e-4,
            "true peak {tp} above ceiling {}",
            lim.ceiling()
        );
    }

    #[test]
    fn test_transient_caught_by_lookahead() {
        let lim = limiter(-6.0);
        let mut l = vec![0.0f32; 4800];
        l[2400] = 1.0;
        let mut r = vec![0.0f32; 4800];
        lim.process(&mut l, &mut r);

        let ceiling = lim.ceiling();
        assert!(
            (l[2400] as f64) <= ceiling + 1e-6,
            "transient {} over ceiling {ceiling}",
            l[2400]
        );
    }

    #[test]
    fn test_lookahead_is_clamped() {
        let lim = BrickwallLimiter::new(
            &LimiterSettings {
                enabled: true,
                ceiling_db_tp: -1.0,
                lookahead_ms: 500.0,
            },
            48000.0,
        );
        // 10 ms max at 48 kHz
        assert_eq!(lim.lookahead, 480);
    }

    #[test]
    fn test_gain_recovers_after_peak() {
        let lim = limiter(-6.0);
        let mut l = vec![0.1f32; 48000];
        for s in l.iter_mut().take(4800) {
            *s = 0.95;
        }
        let mut r = l.clone();
        lim.process(&mut l, &mut r);

        // Late quiet section is back near unity gain
        let tail = l[47000] as f64;
        assert!((tail - 0.1).abs() < 0.005, "gain did not recover: {tail}");
    }
}
