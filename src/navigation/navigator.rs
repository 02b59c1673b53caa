// src/navigation/navigator.rs
// Per-cycle driver: snapshots the sensor inbox, asks the mode selector which
// law to run, applies the target override, clamps, and hands the command to
// the transport. Runs at a fixed rate until the shutdown flag clears.

use super::{OpenFieldController, VelocityCommand, WallFollowController};
use crate::config::NodeConfig;
use crate::core::{Mode, ModeSelector, SensorInbox, TargetOverride};
use crate::ros_interface::{CommandSink, Rate};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Control loop state: the startup counter and the fixed override settings.
pub struct Navigator {
    inbox: Arc<SensorInbox>,
    selector: ModeSelector,
    target_override: TargetOverride,
    startup_command: VelocityCommand,
}

impl Navigator {
    /// Creates a navigator reading from `inbox`.
    pub fn new(config: &NodeConfig, inbox: Arc<SensorInbox>) -> Self {
        Navigator {
            inbox,
            selector: ModeSelector::new(config.startup_cycles),
            target_override: TargetOverride::new(config.target_staleness()),
            startup_command: VelocityCommand::new(config.startup_linear_x, 0.0),
        }
    }

    /// Runs one control cycle at time `now`.
    ///
    /// Returns the clamped command to emit, or `None` when this cycle emits
    /// nothing (dead zone, or no calibrated scan yet).
    pub fn cycle(&mut self, now: Instant) -> Option<VelocityCommand> {
        if self.selector.in_startup() {
            self.selector.select(None);
            return Some(self.startup_command.clamped());
        }

        let geometry = self.inbox.geometry();
        let frame = self.inbox.frame();
        let (Some(geometry), Some(frame)) = (geometry, frame) else {
            debug!("No calibrated scan yet, skipping cycle");
            self.selector.select(None);
            return None;
        };

        // ranges[0] always takes part, even on a one-sample scan
        let min_range = frame.min_range_over(0..(frame.len() / 2).max(1));

        let raw = match self.selector.select(Some(min_range))? {
            Mode::Startup => self.startup_command,
            Mode::WallFollow => WallFollowController::step(&frame, &geometry),
            Mode::OpenField => OpenFieldController::step(&frame),
        };

        let detection = self.inbox.detection();
        let command = self
            .target_override
            .apply(raw, detection.as_ref(), now)
            .clamped();

        debug!(
            "Cycle command: linear_x={:.3}, angular_z={:.3}",
            command.linear_x, command.angular_z
        );
        Some(command)
    }

    /// Runs cycles until `running` is cleared.
    ///
    /// The flag is checked once per iteration, before the cycle; a publish
    /// failure is logged and the loop carries on.
    pub fn run<S, R>(&mut self, sink: &mut S, rate: &mut R, running: &AtomicBool) -> u64
    where
        S: CommandSink + ?Sized,
        R: Rate + ?Sized,
    {
        info!("Control loop started");
        let mut cycles = 0;

        while running.load(Ordering::SeqCst) {
            if let Some(command) = self.cycle(Instant::now()) {
                if let Err(e) = sink.publish(&command) {
                    error!("Failed to publish command: {}", e);
                }
            }
            cycles += 1;
            rate.sleep();
        }

        info!("Control loop stopped after {} cycles", cycles);
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavError;
    use crate::core::{ScanMessage, TargetObservation};
    use crate::ros_interface::MockCommandSink;
    use mockall::predicate::*;
    use std::f32::consts::PI;

    fn config(startup_cycles: u32) -> NodeConfig {
        NodeConfig {
            startup_cycles,
            ..NodeConfig::default()
        }
    }

    fn full_circle(range: f32) -> ScanMessage {
        ScanMessage {
            angle_min: -PI,
            angle_increment: PI / 180.0,
            range_max: 10.0,
            ranges: vec![range; 360],
        }
    }

    /// Clears `running` after `cycles` sleeps.
    struct StopAfter<'a> {
        cycles: u32,
        running: &'a AtomicBool,
    }

    impl Rate for StopAfter<'_> {
        fn sleep(&mut self) {
            self.cycles -= 1;
            if self.cycles == 0 {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn startup_emits_reverse_without_a_scan() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(3), inbox);
        let now = Instant::now();
        for _ in 0..3 {
            assert_eq!(navigator.cycle(now), Some(VelocityCommand::new(-0.5, 0.0)));
        }
        assert_eq!(navigator.cycle(now), None);
    }

    #[test]
    fn startup_is_not_overridden_by_target() {
        let inbox = Arc::new(SensorInbox::new());
        let now = Instant::now();
        inbox.on_detection(TargetObservation::new(1.0, 5.0, now));
        let mut navigator = Navigator::new(&config(1), inbox);
        assert_eq!(navigator.cycle(now), Some(VelocityCommand::new(-0.5, 0.0)));
    }

    #[test]
    fn dispatch_follows_the_front_half_minimum() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(0), inbox.clone());
        let now = Instant::now();

        inbox.on_scan(full_circle(0.5)).unwrap();
        let wall = navigator.cycle(now).unwrap();
        // too far from a 0.5 m wall: turn toward it at half speed
        assert!((wall.linear_x - 0.4).abs() < 1e-6);
        assert_eq!(wall.angular_z, -1.0);

        inbox.on_scan(full_circle(1.5)).unwrap();
        assert_eq!(navigator.cycle(now), None);

        inbox.on_scan(full_circle(2.5)).unwrap();
        let open = navigator.cycle(now).unwrap();
        assert!((open.linear_x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn only_the_front_half_decides() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(0), inbox.clone());
        let mut scan = full_circle(3.0);
        // second half of the scan is ignored by the selector
        scan.ranges[300] = 0.2;
        inbox.on_scan(scan).unwrap();

        let command = navigator.cycle(Instant::now()).unwrap();
        assert!((command.linear_x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn target_override_applies_after_either_law() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(0), inbox.clone());
        let now = Instant::now();
        inbox.on_detection(TargetObservation::new(1.0, 5.0, now));

        inbox.on_scan(full_circle(0.5)).unwrap();
        assert_eq!(navigator.cycle(now).unwrap().angular_z, -0.1);

        inbox.on_scan(full_circle(2.5)).unwrap();
        assert_eq!(navigator.cycle(now).unwrap().angular_z, -0.1);
    }

    #[test]
    fn run_publishes_until_stopped() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(2), inbox);
        let running = AtomicBool::new(true);

        let mut sink = MockCommandSink::new();
        sink.expect_publish()
            .with(eq(VelocityCommand::new(-0.5, 0.0)))
            .times(2)
            .returning(|_| Ok(()));

        let mut rate = StopAfter {
            cycles: 5,
            running: &running,
        };
        assert_eq!(navigator.run(&mut sink, &mut rate, &running), 5);
    }

    #[test]
    fn publish_failure_does_not_stop_the_loop() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(3), inbox);
        let running = AtomicBool::new(true);

        let mut sink = MockCommandSink::new();
        sink.expect_publish()
            .times(3)
            .returning(|_| Err(NavError::Transport("publisher gone".to_string())));

        let mut rate = StopAfter {
            cycles: 3,
            running: &running,
        };
        assert_eq!(navigator.run(&mut sink, &mut rate, &running), 3);
    }

    #[test]
    fn cleared_flag_runs_no_cycle() {
        let inbox = Arc::new(SensorInbox::new());
        let mut navigator = Navigator::new(&config(2), inbox);
        let running = AtomicBool::new(false);

        let mut sink = MockCommandSink::new();
        sink.expect_publish().never();
        let mut rate = StopAfter {
            cycles: 1,
            running: &running,
        };
        assert_eq!(navigator.run(&mut sink, &mut rate, &running), 0);
    }
}
