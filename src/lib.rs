//! Ponce - reactive navigation for a laser-equipped mobile robot
//!
//! This library turns a stream of laser scans and target detections into
//! velocity commands. It calibrates scan geometry from the first scan, follows
//! walls when obstacles are close, drives along the most open heading when
//! they are far, and steers toward a detected target when one is in view.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Node configuration loaded from YAML
pub mod config;
/// Scan geometry, sensor state and mode selection
pub mod core;
pub mod navigation;
pub mod ros_interface;

// Re-export commonly used items for easier access
pub use config::NodeConfig;
pub use crate::core::{
    CalibratedGeometry, Mode, ModeSelector, RangeFrame, ScanMessage, SensorCalibrator,
    SensorInbox, TargetObservation, TargetOverride,
};
pub use navigation::{
    Navigator, ObstacleVectorField, OpenFieldController, VelocityCommand, WallFollowController,
};
pub use ros_interface::{CommandSink, LoopRate, Rate};

/// Navigation controller error types
#[derive(Debug)]
pub enum NavError {
    /// Configuration could not be read or parsed
    Config(String),
    /// A scan was unusable for calibration
    Calibration(String),
    /// A scan did not match the calibrated geometry
    Scan(String),
    /// Transport (ROS) failure
    Transport(String),
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NavError::Config(msg) => write!(f, "Configuration error: {}", msg),
            NavError::Calibration(msg) => write!(f, "Calibration error: {}", msg),
            NavError::Scan(msg) => write!(f, "Scan error: {}", msg),
            NavError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for NavError {}

impl From<std::io::Error> for NavError {
    fn from(e: std::io::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for NavError {
    fn from(e: serde_yaml::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

#[cfg(feature = "ros")]
impl From<r2r::Error> for NavError {
    fn from(e: r2r::Error) -> Self {
        NavError::Transport(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, NavError>;
