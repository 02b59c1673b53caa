// src/navigation/controller.rs
// Control laws that turn a scan frame into a velocity command.
// - WallFollowController: keeps a wall on the right at 0.35-0.45 m.
// - OpenFieldController: drives toward the open heading, faster when the way ahead is clear.

use super::field::ObstacleVectorField;
use super::{VelocityCommand, clamp_unit};
use crate::core::{CalibratedGeometry, RangeFrame};
use log::debug;

/// Closer than this to the wall (or anything ahead) is too close.
pub const WALL_TOO_CLOSE: f32 = 0.35;
/// Farther than this from the wall is too far.
pub const WALL_TOO_FAR: f32 = 0.45;
/// Initial forward bias of the wall-following law.
pub const FORWARD_BIAS: f32 = 0.8;
/// Turn bias magnitude when too close or too far.
pub const TURN_BIAS: f32 = 1.0;
/// Turn correction keeping the robot parallel to the wall.
pub const ALIGN_BIAS: f32 = 0.4;

/// The four ranges the wall-following law looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSamples {
    /// Range straight at the wall
    pub middle: f32,
    /// Wall-side range ahead of the robot
    pub front: f32,
    /// Wall-side range behind the robot
    pub rear: f32,
    /// Closest range in the forward guard window
    pub guard: f32,
}

impl WallSamples {
    /// Reads the samples at the calibrated indices.
    pub fn read(frame: &RangeFrame, geometry: &CalibratedGeometry) -> Self {
        let guard = frame
            .min_range_over(geometry.guard_span())
            .min(frame.range(geometry.guard_index));

        WallSamples {
            middle: frame.range(geometry.middle_index),
            front: frame.range(geometry.front_index),
            rear: frame.range(geometry.rear_index),
            guard,
        }
    }

    fn closest(&self) -> f32 {
        self.guard.min(self.middle).min(self.front).min(self.rear)
    }
}

/// Right-hand wall follower.
pub struct WallFollowController;

impl WallFollowController {
    /// Runs the law against the current frame.
    pub fn step(frame: &RangeFrame, geometry: &CalibratedGeometry) -> VelocityCommand {
        Self::law(&WallSamples::read(frame, geometry))
    }

    /// The wall-following law on already-read samples.
    ///
    /// The turn bias drives `angular_z` and the forward bias drives `linear_x`.
    pub fn law(samples: &WallSamples) -> VelocityCommand {
        let mut turn_bias = 0.0_f32;
        let mut forward_bias = FORWARD_BIAS;

        let closest = samples.closest();
        if closest < WALL_TOO_CLOSE {
            // too close: turn away and slow down
            turn_bias = TURN_BIAS;
            forward_bias /= 3.0;
        } else if closest > WALL_TOO_FAR {
            // too far: turn toward the wall and slow down
            turn_bias = -TURN_BIAS;
            forward_bias /= 2.0;
        }

        if samples.rear > samples.front {
            turn_bias += ALIGN_BIAS;
        } else {
            turn_bias -= ALIGN_BIAS;
        }

        // something ahead: back off
        if samples.guard.min(samples.front) < WALL_TOO_CLOSE {
            forward_bias = -forward_bias;
        }

        debug!(
            "Wall follow: {:?} -> turn={:.3}, forward={:.3}",
            samples, turn_bias, forward_bias
        );

        VelocityCommand::new(clamp_unit(forward_bias), clamp_unit(turn_bias))
    }
}

/// Open-space driver steered by the obstacle vector field.
pub struct OpenFieldController;

impl OpenFieldController {
    /// `angular_z` is the field heading, `linear_x` the normalized front range.
    ///
    /// The heading is not clamped here; it saturates at emission.
    pub fn step(frame: &RangeFrame) -> VelocityCommand {
        let heading = ObstacleVectorField::heading(frame);
        let speed = frame.front_range() / frame.range_max();

        debug!("Open field: heading={:.3}, speed={:.3}", heading, speed);

        VelocityCommand::new(speed, heading)
    }
}
