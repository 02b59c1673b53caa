// src/main.rs
// Entry point for the Ponce controller node: wires the ROS 2 transport to the
// navigation loop and runs it until Ctrl-C.

use log::info;
use ponce_nav::{LoopRate, Navigator, NodeConfig, SensorInbox, ros_interface::RosInterface};
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Loads the configuration, starts the node and runs the control loop.
/// Usage: `ponce_nav_node [config.yaml]`
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting Ponce navigation controller...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            NodeConfig::load(&path)?
        }
        None => NodeConfig::default(),
    };

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    let inbox = Arc::new(SensorInbox::new());
    let mut ros = RosInterface::new(&config)?;
    let mut cmd_vel = ros.command_publisher(&config.cmd_vel_topic)?;
    ros.start(&config, inbox.clone(), running.clone())?;

    // Give the subscriptions time to receive their first messages
    std::thread::sleep(config.settle_delay());

    let mut navigator = Navigator::new(&config, inbox);
    let mut rate = LoopRate::new(config.control_period());
    navigator.run(&mut cmd_vel, &mut rate, &running);

    ros.shutdown();
    info!("Ponce controller stopped");
    Ok(())
}
