//! Transport boundary for Ponce
//!
//! The control loop talks to the outside world through two small traits:
//! [`CommandSink`] receives velocity commands and [`Rate`] paces the loop.
//! With the `ros` feature enabled, this module also provides the ROS 2
//! binding: laser scan and target detection subscriptions that feed a
//! [`SensorInbox`](crate::core::SensorInbox), and a `Twist` publisher.

#[cfg(feature = "ros")]
mod publisher;
#[cfg(feature = "ros")]
mod subscriber;

#[cfg(feature = "ros")]
pub use publisher::*;
#[cfg(feature = "ros")]
pub use subscriber::*;

use crate::Result;
use crate::navigation::VelocityCommand;
use std::time::{Duration, Instant};

/// Destination for the velocity commands produced each cycle.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink {
    /// Emits one command.
    fn publish(&mut self, command: &VelocityCommand) -> Result<()>;
}

/// Paces the control loop.
pub trait Rate {
    /// Blocks until the next cycle is due.
    fn sleep(&mut self);
}

/// Fixed-frequency rate: sleeps until the next multiple of the period.
///
/// A cycle that overruns its slot starts the next one immediately and the
/// schedule restarts from there.
#[derive(Debug, Clone)]
pub struct LoopRate {
    period: Duration,
    next: Instant,
}

impl LoopRate {
    /// Rate with its first deadline one `period` from now.
    pub fn new(period: Duration) -> Self {
        LoopRate {
            period,
            next: Instant::now() + period,
        }
    }

    /// Target cycle period
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Rate for LoopRate {
    fn sleep(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            log::debug!("Control cycle overran by {:?}", now - self.next);
            self.next = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_rate_waits_about_one_period() {
        let mut rate = LoopRate::new(Duration::from_millis(20));
        let start = Instant::now();
        rate.sleep();
        rate.sleep();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(35), "{:?}", elapsed);
    }
}
