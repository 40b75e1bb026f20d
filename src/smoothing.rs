//! Exponential smoothing of joint angles.
//!
//! Unlike a stateful filter, the previous value is passed in by the caller
//! on every call so the estimator stays a pure function of its inputs.

use crate::{constants::DEFAULT_SMOOTHING_FACTOR, Error, Result};

/// Linear interpolation from `start` toward `end` by `t`
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    t.mul_add(end - start, start)
}

/// Exponential smoothing expressed as a per-frame lerp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSmoothing {
    factor: f64,
}

impl ExponentialSmoothing {
    /// Create a smoother moving `factor` of the remaining distance each frame
    ///
    /// # Errors
    ///
    /// Returns an error if factor is not in the range (0, 1]
    pub fn new(factor: f64) -> Result<Self> {
        if factor > 0.0 && factor <= 1.0 {
            Ok(Self { factor })
        } else {
            Err(Error::InvalidInput(format!("Smoothing factor must be in (0, 1], got {factor}")))
        }
    }

    /// Move `previous` toward `target`
    #[must_use]
    pub fn smooth(&self, previous: f64, target: f64) -> f64 {
        lerp(previous, target, self.factor)
    }

    /// Frames needed for the remaining error to drop below `tolerance` of the initial step
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded by the checks below
    pub fn frames_to_settle(&self, tolerance: f64) -> u32 {
        if self.factor >= 1.0 || tolerance >= 1.0 {
            return 1;
        }
        if tolerance <= 0.0 {
            return u32::MAX;
        }
        let frames = (tolerance.ln() / (1.0 - self.factor).ln()).ceil();
        frames.min(f64::from(u32::MAX)) as u32
    }
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}
