//! Navigation control laws for Ponce
//!
//! This module turns the current scan frame into velocity commands: a
//! wall-following law for close obstacles, an open-field law steered by the
//! obstacle vector field, and the per-cycle driver that picks between them.

/// Wall-following and open-field control laws
pub mod controller;
/// Obstacle vector field
pub mod field;
/// Per-cycle driver and control loop
pub mod navigator;

pub use controller::{OpenFieldController, WallFollowController, WallSamples};
pub use field::ObstacleVectorField;
pub use navigator::Navigator;

/// Limits a command axis to the unit range.
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

/// Velocity command for the robot base
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    /// Forward velocity, nominally in [-1, 1]
    pub linear_x: f32,
    /// Yaw rate, nominally in [-1, 1]
    pub angular_z: f32,
}

impl VelocityCommand {
    /// Command with the given forward speed and yaw rate.
    pub const fn new(linear_x: f32, angular_z: f32) -> Self {
        VelocityCommand {
            linear_x,
            angular_z,
        }
    }

    /// Both axes saturated to [-1, 1], as required before emission.
    pub fn clamped(self) -> Self {
        VelocityCommand {
            linear_x: clamp_unit(self.linear_x),
            angular_z: clamp_unit(self.angular_z),
        }
    }
}
