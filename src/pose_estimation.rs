//! Head pitch/yaw estimation from 2-D face landmarks.
//!
//! Pitch comes from how far the nose tip sits from the midpoint between
//! forehead and chin, relative to the face height. Yaw comes from the angle
//! of the ear-to-ear vector in the horizontal (x/z) plane. Both are clamped
//! and then smoothed against the previous frame's output, which the caller
//! threads through every call.

use crate::{
    config::{Config, HorizontalRotationConfig, LandmarkIndices, VerticalRotationConfig},
    constants::FACE_HEIGHT_EPSILON,
    landmarks::LandmarkFrame,
    smoothing::ExponentialSmoothing,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Remaining fraction of a step considered settled, for logging
const SETTLE_TOLERANCE: f64 = 0.01;

/// Rotation of the tracked joint in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseAngles {
    /// Rotation about the x axis (nodding)
    pub pitch: f64,
    /// Rotation about the y axis (turning)
    pub yaw: f64,
}

/// Previous frame output carried into the next estimate
pub type SmoothingState = PoseAngles;

impl PoseAngles {
    /// Zero rotation on both axes
    pub const NEUTRAL: Self = Self { pitch: 0.0, yaw: 0.0 };

    #[must_use]
    pub const fn new(pitch: f64, yaw: f64) -> Self {
        Self { pitch, yaw }
    }

    /// (pitch, yaw) in degrees
    #[must_use]
    pub fn to_degrees(self) -> (f64, f64) {
        (self.pitch.to_degrees(), self.yaw.to_degrees())
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite()
    }
}

/// Whether the last estimate came from landmarks or from the neutral fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// Angles were computed from a landmark frame
    Tracking,
    /// No usable landmarks; joint reset to neutral
    Neutral,
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tracking => write!(f, "tracking"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Result of one estimation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseEstimate {
    /// Angles to apply to the joint
    pub angles: PoseAngles,
    /// Where the angles came from
    pub state: TrackingState,
}

/// Stateless head pose estimator
#[derive(Debug, Clone)]
pub struct HeadPoseEstimator {
    indices: LandmarkIndices,
    vertical: VerticalRotationConfig,
    horizontal: HorizontalRotationConfig,
    pitch_smoothing: ExponentialSmoothing,
    yaw_smoothing: ExponentialSmoothing,
}

impl Default for HeadPoseEstimator {
    fn default() -> Self {
        let config = Config::default();
        Self {
            indices: config.landmarks,
            vertical: config.vertical,
            horizontal: config.horizontal,
            pitch_smoothing: ExponentialSmoothing::default(),
            yaw_smoothing: ExponentialSmoothing::default(),
        }
    }
}

impl HeadPoseEstimator {
    /// Create an estimator from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let pitch_smoothing = ExponentialSmoothing::new(config.vertical.smoothing)?;
        let yaw_smoothing = ExponentialSmoothing::new(config.horizontal.smoothing)?;

        log::info!(
            "Initializing HeadPoseEstimator: pitch ±{:.1}° x{} ({} frames to settle), yaw ±{:.1}° ({} frames to settle)",
            config.vertical.range.to_degrees(),
            config.vertical.amplification,
            pitch_smoothing.frames_to_settle(SETTLE_TOLERANCE),
            config.horizontal.range.to_degrees(),
            yaw_smoothing.frames_to_settle(SETTLE_TOLERANCE),
        );

        Ok(Self {
            indices: config.landmarks,
            vertical: config.vertical,
            horizontal: config.horizontal,
            pitch_smoothing,
            yaw_smoothing,
        })
    }

    /// Landmark positions this estimator reads from each frame
    #[must_use]
    pub fn indices(&self) -> &LandmarkIndices {
        &self.indices
    }

    /// Estimate new joint angles, falling back to neutral on a missing or bad frame
    #[must_use]
    pub fn estimate(&self, frame: Option<&LandmarkFrame>, previous: SmoothingState) -> PoseAngles {
        self.step(frame, previous).angles
    }

    /// Like [`estimate`](Self::estimate), also reporting which path produced the angles
    #[must_use]
    pub fn step(&self, frame: Option<&LandmarkFrame>, previous: SmoothingState) -> PoseEstimate {
        let Some(frame) = frame else {
            return PoseEstimate {
                angles: PoseAngles::NEUTRAL,
                state: TrackingState::Neutral,
            };
        };

        match self.estimate_frame(frame, previous) {
            Ok(angles) => PoseEstimate {
                angles,
                state: TrackingState::Tracking,
            },
            Err(e) => {
                log::warn!("Rejected landmark frame, resetting to neutral: {e}");
                PoseEstimate {
                    angles: PoseAngles::NEUTRAL,
                    state: TrackingState::Neutral,
                }
            }
        }
    }

    /// Estimate new joint angles, surfacing invalid input as an error
    ///
    /// A missing frame is not an error and yields the neutral pose.
    ///
    /// # Errors
    ///
    /// Returns an error if a required landmark is missing or non-finite
    pub fn try_estimate(&self, frame: Option<&LandmarkFrame>, previous: SmoothingState) -> Result<PoseAngles> {
        frame.map_or(Ok(PoseAngles::NEUTRAL), |frame| self.estimate_frame(frame, previous))
    }

    fn estimate_frame(&self, frame: &LandmarkFrame, previous: SmoothingState) -> Result<PoseAngles> {
        Ok(PoseAngles {
            pitch: self.vertical_rotation(frame, previous.pitch)?,
            yaw: self.horizontal_rotation(frame, previous.yaw)?,
        })
    }

    /// Smoothed pitch for this frame
    ///
    /// # Errors
    ///
    /// Returns an error if the nose, forehead or chin landmark is unusable
    pub fn vertical_rotation(&self, frame: &LandmarkFrame, previous_pitch: f64) -> Result<f64> {
        let target = self.target_pitch(frame)?;
        Ok(settle(&self.pitch_smoothing, previous_pitch, target, self.vertical.range))
    }

    /// Smoothed yaw for this frame
    ///
    /// # Errors
    ///
    /// Returns an error if either ear landmark is unusable
    pub fn horizontal_rotation(&self, frame: &LandmarkFrame, previous_yaw: f64) -> Result<f64> {
        let target = self.target_yaw(frame)?;
        Ok(settle(&self.yaw_smoothing, previous_yaw, target, self.horizontal.range))
    }

    /// Clamped pitch this frame would converge to if held, before smoothing
    ///
    /// # Errors
    ///
    /// Returns an error if the nose, forehead or chin landmark is unusable
    pub fn target_pitch(&self, frame: &LandmarkFrame) -> Result<f64> {
        let nose = frame.required(self.indices.nose_tip)?.to_signed();
        let forehead = frame.required(self.indices.forehead)?.to_signed();
        let chin = frame.required(self.indices.chin)?.to_signed();

        let face_center_y = (forehead.y + chin.y) / 2.0;
        let vertical_deviation = nose.y - face_center_y;
        let face_height = chin.y - forehead.y;

        let ratio = guarded_ratio(vertical_deviation, face_height);
        let angle = (ratio.asin() * self.vertical.amplification).clamp(-self.vertical.range, self.vertical.range);

        // Image y grows downward, the joint's x rotation does not
        finite_angle(-angle, "pitch")
    }

    /// Clamped yaw this frame would converge to if held, before smoothing
    ///
    /// # Errors
    ///
    /// Returns an error if either ear landmark is unusable
    pub fn target_yaw(&self, frame: &LandmarkFrame) -> Result<f64> {
        let left = frame.required(self.indices.left_ear)?.to_signed();
        let right = frame.required(self.indices.right_ear)?.to_signed();

        let dx = right.x - left.x;
        let dz = right.z - left.z;

        let angle = (-dz.atan2(dx)).clamp(-self.horizontal.range, self.horizontal.range);
        finite_angle(angle, "yaw")
    }
}

/// `numerator / denominator` clamped to `[-1, 1]`, finite even for a zero denominator
fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator.abs() < FACE_HEIGHT_EPSILON {
        FACE_HEIGHT_EPSILON.copysign(denominator)
    } else {
        denominator
    };
    (numerator / denominator).clamp(-1.0, 1.0)
}

fn finite_angle(angle: f64, axis: &str) -> Result<f64> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(Error::InvalidInput(format!("Landmarks produced a non-finite {axis} angle")))
    }
}

/// Smooth toward `target`, keeping both the carried state and the output inside `range`
fn settle(smoothing: &ExponentialSmoothing, previous: f64, target: f64, range: f64) -> f64 {
    let previous = if previous.is_finite() {
        previous.clamp(-range, range)
    } else {
        0.0
    };
    smoothing.smooth(previous, target).clamp(-range, range)
}
