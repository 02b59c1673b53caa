// src/config.rs
// Node configuration: topic names, loop timing and the startup maneuver.
// Control-law thresholds are constants in their own modules and are not configurable.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Runtime configuration for the navigation node.
///
/// Every field has a default, so a YAML file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// ROS node name
    pub node_name: String,
    /// Laser scan topic
    pub scan_topic: String,
    /// Target detector topic (3D bounding boxes)
    pub detection_topic: String,
    /// Velocity command topic
    pub cmd_vel_topic: String,
    /// QoS history depth for every topic
    pub qos_depth: usize,
    /// Control loop frequency in Hz
    pub control_rate_hz: f64,
    /// Number of cycles spent in the startup maneuver
    pub startup_cycles: u32,
    /// Linear speed commanded during the startup maneuver
    pub startup_linear_x: f32,
    /// Age after which a target observation is ignored, in seconds
    pub target_staleness_secs: f64,
    /// Wait before the control loop starts, in milliseconds
    pub settle_delay_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            node_name: "ponce_controller".to_string(),
            scan_topic: "/ponce/scan".to_string(),
            detection_topic: "/ponce/healthfinder".to_string(),
            cmd_vel_topic: "/ponce/cmd_vel".to_string(),
            qos_depth: 10,
            control_rate_hz: 10.0,
            startup_cycles: 10,
            startup_linear_x: -0.5,
            target_staleness_secs: 1.0,
            settle_delay_ms: 2000,
        }
    }
}

impl NodeConfig {
    /// Loads a configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: NodeConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: NodeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.control_rate_hz.is_finite() && self.control_rate_hz > 0.0) {
            return Err(crate::NavError::Config(format!(
                "control_rate_hz must be positive, got {}",
                self.control_rate_hz
            )));
        }
        if !(self.target_staleness_secs.is_finite() && self.target_staleness_secs >= 0.0) {
            return Err(crate::NavError::Config(format!(
                "target_staleness_secs must be non-negative, got {}",
                self.target_staleness_secs
            )));
        }
        Ok(())
    }

    /// Time between two control cycles
    pub fn control_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.control_rate_hz)
    }

    /// Maximum age of a target observation that may still steer the robot
    pub fn target_staleness(&self) -> Duration {
        Duration::from_secs_f64(self.target_staleness_secs)
    }

    /// Delay between node startup and the first control cycle
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
