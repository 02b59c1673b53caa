// src/ros_interface/subscriber.rs
// Subscribes to the laser scan and target detector topics and feeds every
// message into the shared SensorInbox. Also owns the node spin thread.

use super::Publisher;
use crate::config::NodeConfig;
use crate::core::{ScanMessage, SensorInbox, TargetObservation};
use crate::{NavError, Result};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use futures::{StreamExt, future};
use log::{error, info, warn};
use r2r::geometry_msgs::msg::Twist;
use r2r::sensor_msgs::msg::LaserScan;
use r2r::vision_msgs::msg::BoundingBox3D;
use r2r::{Context, Node, QosProfile};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const SPIN_TIMEOUT: Duration = Duration::from_millis(10);

/// Converts a LaserScan into the controller's scan message.
pub fn scan_from_ros(msg: &LaserScan) -> ScanMessage {
    ScanMessage {
        angle_min: msg.angle_min,
        angle_increment: msg.angle_increment,
        range_max: msg.range_max,
        ranges: msg.ranges.clone(),
    }
}

/// Converts a detector bounding box into a target observation received at `received_at`.
pub fn detection_from_ros(msg: &BoundingBox3D, received_at: Instant) -> TargetObservation {
    TargetObservation::new(
        msg.center.position.y as f32,
        msg.size.y as f32,
        received_at,
    )
}

/// ROS 2 node hosting the controller's subscriptions and publisher.
pub struct RosInterface {
    node: Arc<Mutex<Node>>,
    qos: QosProfile,
    spin_thread: Option<JoinHandle<()>>,
}

impl RosInterface {
    /// Creates the ROS context and node.
    pub fn new(config: &NodeConfig) -> Result<Self> {
        let context = Context::create()?;
        let node = Node::create(context, &config.node_name, "")?;
        let qos = QosProfile::default().keep_last(config.qos_depth);

        info!("ROS node '{}' created", config.node_name);
        Ok(RosInterface {
            node: Arc::new(Mutex::new(node)),
            qos,
            spin_thread: None,
        })
    }

    fn lock_node(&self) -> MutexGuard<'_, Node> {
        self.node.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the velocity command publisher.
    pub fn command_publisher(&self, topic: &str) -> Result<Publisher<Twist>> {
        let mut node = self.lock_node();
        let publisher = Publisher::new(&mut node, topic, self.qos.clone())?;
        info!("Publishing to {}", topic);
        Ok(publisher)
    }

    /// Subscribes to the scan and detection topics and starts spinning the node.
    ///
    /// The spin thread runs until `running` is cleared.
    pub fn start(
        &mut self,
        config: &NodeConfig,
        inbox: Arc<SensorInbox>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let (scans, detections) = {
            let mut node = self.lock_node();
            let scans = node.subscribe::<LaserScan>(&config.scan_topic, self.qos.clone())?;
            let detections =
                node.subscribe::<BoundingBox3D>(&config.detection_topic, self.qos.clone())?;
            (scans, detections)
        };
        info!(
            "Subscribed to {} and {}",
            config.scan_topic, config.detection_topic
        );

        let node = self.node.clone();
        let handle = std::thread::Builder::new()
            .name("ros_spin".to_string())
            .spawn(move || {
                let mut pool = LocalPool::new();
                let spawner = pool.spawner();

                let scan_inbox = inbox.clone();
                let scan_task = scans.for_each(move |msg| {
                    if let Err(e) = scan_inbox.on_scan(scan_from_ros(&msg)) {
                        warn!("Scan refused: {}", e);
                    }
                    future::ready(())
                });
                let detection_task = detections.for_each(move |msg| {
                    inbox.on_detection(detection_from_ros(&msg, Instant::now()));
                    future::ready(())
                });

                if let Err(e) = spawner
                    .spawn_local(scan_task)
                    .and_then(|_| spawner.spawn_local(detection_task))
                {
                    error!("Failed to start subscription tasks: {}", e);
                    return;
                }

                while running.load(Ordering::SeqCst) {
                    node.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .spin_once(SPIN_TIMEOUT);
                    pool.run_until_stalled();
                }
                info!("ROS spin thread stopped");
            })
            .map_err(|e| NavError::Transport(format!("failed to spawn spin thread: {}", e)))?;

        self.spin_thread = Some(handle);
        Ok(())
    }

    /// Waits for the spin thread to finish. Clear the running flag first.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.spin_thread.take() {
            if handle.join().is_err() {
                error!("ROS spin thread panicked");
            }
        }
        info!("ROS interface shutdown complete");
    }
}
