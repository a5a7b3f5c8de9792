//! Stereo audio buffer
//!
//! Deinterleaved stereo sample container. Samples are stored as `f32`;
//! all processing math elsewhere runs in `f64`. Values outside [-1, 1]
//! are permitted mid-chain; the limiter restores compliance before export.

use crate::error::{CoreError, CoreResult};
use crate::is_supported_sample_rate;

/// Deinterleaved stereo sample container
///
/// Both channels always hold the same number of frames, and the sample
/// rate is always one of the supported rates. Construction enforces both
/// invariants; afterwards the buffer is only mutated through
/// [`AudioBuffer::channels_mut`], which cannot change either.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Build a buffer from two channel vectors
    ///
    /// A longer channel is truncated to the shorter one. Sample rates
    /// other than 44.1/48 kHz are rejected.
    pub fn from_channels(
        mut left: Vec<f32>,
        mut right: Vec<f32>,
        sample_rate: u32,
    ) -> CoreResult<Self> {
        if !is_supported_sample_rate(sample_rate) {
            return Err(CoreError::UnsupportedSampleRate(sample_rate));
        }

        let frames = left.len().min(right.len());
        left.truncate(frames);
        right.truncate(frames);

        Ok(Self {
            left,
            right,
            sample_rate,
        })
    }

    /// Create a silent buffer of `frames` frames
    pub fn silent(frames: usize, sample_rate: u32) -> CoreResult<Self> {
        Self::from_channels(vec![0.0; frames], vec![0.0; frames], sample_rate)
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when the buffer holds no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Left channel samples
    #[inline]
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples
    #[inline]
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Mutable access to both channels
    ///
    /// Returns slices, so channel length and sample rate stay fixed.
    #[inline]
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.left, &mut self.right)
    }

    /// Mono mix `(L + R) / 2` per frame
    pub fn to_mono(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect()
    }
}
