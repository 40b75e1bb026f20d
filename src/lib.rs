//! Head pitch/yaw estimation for puppeting an avatar's neck joint.
//!
//! This library turns the normalized face landmarks emitted by a face mesh
//! detector (such as MediaPipe's face landmarker) into two smoothed rotation
//! angles suitable for driving a single joint:
//! - pitch from the nose tip's offset against the forehead/chin midpoint
//! - yaw from the depth difference between the two ears
//!
//! The estimator holds no state of its own. The caller threads the previous
//! frame's angles through each call, and a frame without a face resets the
//! joint to the neutral pose.
//!
//! # Examples
//!
//! ## Single frame
//!
//! ```
//! use head_pose_puppet::{Landmark, LandmarkFrame, HeadPoseEstimator, PoseAngles};
//!
//! let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 478];
//! points[1] = Landmark::new(0.5, 0.7, 0.0); // nose tip
//! points[10] = Landmark::new(0.5, 0.3, 0.0); // forehead
//! points[152] = Landmark::new(0.5, 0.9, 0.0); // chin
//! points[127] = Landmark::new(0.2, 0.5, 0.1); // left ear
//! points[356] = Landmark::new(0.8, 0.5, -0.1); // right ear
//! let frame = LandmarkFrame::new(points);
//!
//! let estimator = HeadPoseEstimator::default();
//! let mut angles = PoseAngles::NEUTRAL;
//! for _ in 0..3 {
//!     angles = estimator.estimate(Some(&frame), angles);
//! }
//! assert!(angles.pitch < 0.0);
//! assert!(angles.yaw > 0.0);
//!
//! // No face this frame
//! assert_eq!(estimator.estimate(None, angles), PoseAngles::NEUTRAL);
//! ```
//!
//! ## Tracking session
//!
//! ```no_run
//! use head_pose_puppet::{
//!     config::Config,
//!     replay::ReplaySource,
//!     session::{DetectionLoop, TrackingSession},
//!     HeadPoseEstimator, PoseAngles,
//! };
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("head_pose.yaml")?;
//! let mut session = TrackingSession::new(HeadPoseEstimator::new(&config)?);
//! let detection = DetectionLoop::spawn(
//!     ReplaySource::open("recording.jsonl")?,
//!     session.slot().clone(),
//!     Duration::from_millis(33),
//! )?;
//!
//! session.start();
//! while !detection.is_finished() {
//!     session.tick(&mut |angles: PoseAngles| {
//!         // neck.rotation.x = angles.pitch; neck.rotation.y = angles.yaw;
//!         let _ = angles;
//!     });
//!     std::thread::sleep(Duration::from_millis(16));
//! }
//! session.stop();
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

/// Landmark and landmark frame types
pub mod landmarks;

/// Exponential smoothing helpers
pub mod smoothing;

/// Pitch/yaw estimation from landmarks
pub mod pose_estimation;

/// Atomic hand-off of the latest detection result
pub mod frame_slot;

/// Perception/animation seams and the tracking session
pub mod session;

/// JSON-lines landmark recordings
pub mod replay;

pub use error::{Error, Result};
pub use landmarks::{Landmark, LandmarkFrame};
pub use pose_estimation::{HeadPoseEstimator, PoseAngles, PoseEstimate, SmoothingState, TrackingState};
