//! Configuration management for the head pose estimator

use crate::{
    constants::{
        CHIN_INDEX, DEFAULT_PITCH_AMPLIFICATION, DEFAULT_PITCH_RANGE, DEFAULT_SMOOTHING_FACTOR, DEFAULT_YAW_RANGE,
        FOREHEAD_INDEX, LEFT_EAR_INDEX, MAX_ANGLE_RANGE, NOSE_TIP_INDEX, RIGHT_EAR_INDEX,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Landmark topology of the upstream detector
    pub landmarks: LandmarkIndices,

    /// Pitch (vertical rotation) tuning
    pub vertical: VerticalRotationConfig,

    /// Yaw (horizontal rotation) tuning
    pub horizontal: HorizontalRotationConfig,
}

/// Positional indices of the landmarks the estimator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkIndices {
    /// Nose tip
    pub nose_tip: usize,

    /// Upper forehead
    pub forehead: usize,

    /// Chin
    pub chin: usize,

    /// Left ear
    pub left_ear: usize,

    /// Right ear
    pub right_ear: usize,
}

/// Pitch tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalRotationConfig {
    /// Multiplier applied to the raw nose deviation angle
    pub amplification: f64,

    /// Symmetric clamp range in radians
    pub range: f64,

    /// Exponential smoothing factor (0, 1]
    pub smoothing: f64,
}

/// Yaw tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalRotationConfig {
    /// Symmetric clamp range in radians
    pub range: f64,

    /// Exponential smoothing factor (0, 1]
    pub smoothing: f64,
}

impl Default for LandmarkIndices {
    fn default() -> Self {
        Self {
            nose_tip: NOSE_TIP_INDEX,
            forehead: FOREHEAD_INDEX,
            chin: CHIN_INDEX,
            left_ear: LEFT_EAR_INDEX,
            right_ear: RIGHT_EAR_INDEX,
        }
    }
}

impl LandmarkIndices {
    /// Smallest frame length that contains every configured landmark
    #[must_use]
    pub fn required_len(&self) -> usize {
        [self.nose_tip, self.forehead, self.chin, self.left_ear, self.right_ear]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for VerticalRotationConfig {
    fn default() -> Self {
        Self {
            amplification: DEFAULT_PITCH_AMPLIFICATION,
            range: DEFAULT_PITCH_RANGE,
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl Default for HorizontalRotationConfig {
    fn default() -> Self {
        Self {
            range: DEFAULT_YAW_RANGE,
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid YAML for this schema
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first out-of-range parameter
    pub fn validate(&self) -> Result<()> {
        validate_range("vertical.range", self.vertical.range)?;
        validate_range("horizontal.range", self.horizontal.range)?;
        validate_smoothing("vertical.smoothing", self.vertical.smoothing)?;
        validate_smoothing("horizontal.smoothing", self.horizontal.smoothing)?;

        if !self.vertical.amplification.is_finite() || self.vertical.amplification <= 0.0 {
            return Err(Error::ConfigError(format!(
                "vertical.amplification must be a positive finite number, got {}",
                self.vertical.amplification
            )));
        }

        Ok(())
    }
}

fn validate_range(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= MAX_ANGLE_RANGE {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "{name} must be in (0, π/2] radians, got {value}"
        )))
    }
}

fn validate_smoothing(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be in (0, 1], got {value}")))
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Pose Puppet Configuration
# Angles are in radians.

# MediaPipe face mesh indices
landmarks:
  nose_tip: 1
  forehead: 10
  chin: 152
  left_ear: 127
  right_ear: 356

# Pitch (nodding)
vertical:
  amplification: 1.2
  range: 0.7853981633974483
  smoothing: 0.15

# Yaw (turning)
horizontal:
  range: 1.0471975511965976
  smoothing: 0.15
"#;
