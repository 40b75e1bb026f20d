//! Face landmark types as produced by the upstream detector.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single normalized face landmark.
///
/// `x` and `y` are in `[0, 1]` image space, `z` is a relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal image coordinate
    pub x: f64,
    /// Vertical image coordinate, growing downward
    pub y: f64,
    /// Relative depth, smaller is closer to the camera
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Remap `x` and `y` from `[0, 1]` to `[-1, 1]`; `z` passes through.
    #[must_use]
    pub fn to_signed(self) -> Self {
        Self {
            x: to_signed_unit(self.x),
            y: to_signed_unit(self.y),
            z: self.z,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Whether `x` and `y` lie in normalized image space
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Map a `[0, 1]` coordinate onto `[-1, 1]` centered on the image midpoint
#[must_use]
pub fn to_signed_unit(value: f64) -> f64 {
    value.mul_add(2.0, -1.0)
}

/// Landmarks of one detected face for one detection cycle, indexed by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    landmarks: Vec<Landmark>,
}

impl LandmarkFrame {
    /// Wrap landmarks without checking them
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Wrap landmarks after checking every coordinate is finite
    ///
    /// # Errors
    ///
    /// Returns `Error::NonFiniteLandmark` for the first NaN or infinite landmark
    pub fn validated(landmarks: Vec<Landmark>) -> Result<Self> {
        if let Some(index) = landmarks.iter().position(|l| !l.is_finite()) {
            return Err(Error::NonFiniteLandmark { index });
        }
        Ok(Self { landmarks })
    }

    /// Wrap landmarks arriving from a detector, rejecting anything the
    /// estimator should never see
    ///
    /// # Errors
    ///
    /// Returns `Error::NonFiniteLandmark` for a NaN or infinite coordinate,
    /// `Error::OutOfBoundsLandmark` for `x`/`y` outside `[0, 1]` and
    /// `Error::MissingLandmark` when fewer than `min_len` landmarks are present
    pub fn checked(landmarks: Vec<Landmark>, min_len: usize) -> Result<Self> {
        let frame = Self::validated(landmarks)?;

        if let Some((index, l)) = frame.landmarks.iter().enumerate().find(|(_, l)| !l.is_normalized()) {
            return Err(Error::OutOfBoundsLandmark { index, x: l.x, y: l.y });
        }
        if frame.len() < min_len {
            return Err(Error::MissingLandmark {
                index: min_len - 1,
                len: frame.len(),
            });
        }
        Ok(frame)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Look up a landmark the estimator depends on
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingLandmark` when the frame is too short and
    /// `Error::NonFiniteLandmark` when the landmark holds NaN or infinity
    pub fn required(&self, index: usize) -> Result<Landmark> {
        let landmark = self.landmarks.get(index).copied().ok_or(Error::MissingLandmark {
            index,
            len: self.landmarks.len(),
        })?;

        if landmark.is_finite() {
            Ok(landmark)
        } else {
            Err(Error::NonFiniteLandmark { index })
        }
    }
}

impl From<Vec<Landmark>> for LandmarkFrame {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
