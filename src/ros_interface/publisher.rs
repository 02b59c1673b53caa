// src/ros_interface/publisher.rs
// Publishes velocity commands to the robot base as geometry_msgs/Twist.

use super::CommandSink;
use crate::Result;
use crate::navigation::VelocityCommand;
use r2r::geometry_msgs::msg::{Twist, Vector3};
use r2r::{QosProfile, WrappedTypesupport};

/// Generic ROS2 publisher wrapper
pub struct Publisher<T>
where
    T: WrappedTypesupport,
{
    inner: r2r::Publisher<T>,
}

impl<T> Publisher<T>
where
    T: WrappedTypesupport + 'static,
{
    /// Create a new publisher on the given topic with specified QoS
    pub fn new(node: &mut r2r::Node, topic: &str, qos: QosProfile) -> Result<Self> {
        let publisher = node.create_publisher::<T>(topic, qos)?;
        Ok(Publisher { inner: publisher })
    }

    /// Publish a message to the topic
    pub fn send(&self, message: &T) -> Result<()> {
        self.inner.publish(message)?;
        Ok(())
    }
}

/// Converts a command to a Twist; only `linear.x` and `angular.z` are set.
pub fn twist_from_command(command: &VelocityCommand) -> Twist {
    Twist {
        linear: Vector3 {
            x: command.linear_x as f64,
            y: 0.0,
            z: 0.0,
        },
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: command.angular_z as f64,
        },
    }
}

impl CommandSink for Publisher<Twist> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<()> {
        self.send(&twist_from_command(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twist_carries_only_the_planar_axes() {
        let twist = twist_from_command(&VelocityCommand::new(0.5, -0.25));
        assert_eq!(twist.linear.x, 0.5);
        assert_eq!(twist.angular.z, -0.25);
        assert_eq!(twist.linear.y, 0.0);
        assert_eq!(twist.angular.x, 0.0);
    }
}
