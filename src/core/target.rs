// core/target.rs

// Target detector input and the steering override it drives. When a fresh
// detection shows the target off-center, the angular command is replaced by a
// proportional turn toward it; the linear command is left alone.

use crate::navigation::VelocityCommand;
use log::info;
use std::time::{Duration, Instant};

/// Turn gain applied to the target's lateral offset, `angular_z = -center_y / 10`.
pub const TARGET_TURN_DIVISOR: f32 = 10.0;

/// Latest bounding box reported by the target detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetObservation {
    /// Lateral (y) center of the box in the robot frame
    pub center_y: f32,
    /// Lateral (y) extent of the box
    pub size_y: f32,
    /// When the detection was received
    pub received_at: Instant,
}

impl TargetObservation {
    /// Observation received at `received_at`.
    pub fn new(center_y: f32, size_y: f32, received_at: Instant) -> Self {
        TargetObservation {
            center_y,
            size_y,
            received_at,
        }
    }

    /// True while the box center lies within its own extent of the origin.
    pub fn is_uncentered(&self) -> bool {
        self.center_y < self.size_y
    }

    /// Age at `now`; zero if `now` precedes receipt.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.received_at)
    }
}

/// Rewrites the angular command toward a fresh, uncentered target.
#[derive(Debug, Clone, Copy)]
pub struct TargetOverride {
    staleness: Duration,
}

impl TargetOverride {
    /// `staleness` is the age at which an observation stops steering.
    pub fn new(staleness: Duration) -> Self {
        TargetOverride { staleness }
    }

    /// Age at which observations are ignored
    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Applies the override to `command`.
    ///
    /// A missing observation behaves like the empty one and passes the command through.
    pub fn apply(
        &self,
        command: VelocityCommand,
        observation: Option<&TargetObservation>,
        now: Instant,
    ) -> VelocityCommand {
        let Some(observation) = observation else {
            return command;
        };

        if observation.is_uncentered() && observation.age(now) < self.staleness {
            info!(
                "Steering toward target: center_y={:.3}, size_y={:.3}",
                observation.center_y, observation.size_y
            );
            VelocityCommand {
                angular_z: observation.center_y / TARGET_TURN_DIVISOR * -1.0,
                ..command
            }
        } else {
            command
        }
    }
}
