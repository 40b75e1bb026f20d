//! Constants used throughout the library

use std::f64::consts::PI;

/// MediaPipe face mesh index of the nose tip
pub const NOSE_TIP_INDEX: usize = 1;

/// MediaPipe face mesh index of the upper forehead
pub const FOREHEAD_INDEX: usize = 10;

/// MediaPipe face mesh index of the chin
pub const CHIN_INDEX: usize = 152;

/// MediaPipe face mesh index near the left ear
pub const LEFT_EAR_INDEX: usize = 127;

/// MediaPipe face mesh index near the right ear
pub const RIGHT_EAR_INDEX: usize = 356;

/// Landmarks emitted per face by the MediaPipe face landmarker (mesh + iris)
pub const FACE_LANDMARKER_POINTS: usize = 478;

/// Pitch amplification applied to the raw nose deviation angle
pub const DEFAULT_PITCH_AMPLIFICATION: f64 = 1.2;

/// Pitch clamp range, ±45°
pub const DEFAULT_PITCH_RANGE: f64 = PI / 4.0;

/// Yaw clamp range, ±60°
pub const DEFAULT_YAW_RANGE: f64 = PI / 3.0;

/// Fraction of the way toward the new estimate moved per frame
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.15;

/// Upper bound for any configured angular range
pub const MAX_ANGLE_RANGE: f64 = PI / 2.0;

/// Face heights below this magnitude are treated as degenerate
pub const FACE_HEIGHT_EPSILON: f64 = 1e-6;

/// Default pause between detection cycles of a background source
pub const DEFAULT_DETECTION_INTERVAL_MS: u64 = 33;

/// Minimum pause after a failed detection cycle
pub const DETECTION_ERROR_BACKOFF_MS: u64 = 10;
