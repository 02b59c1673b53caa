// core/mod.rs

// Sensor-side state of the controller: the current scan frame, the geometry
// calibrated from the first scan, the latest target observation, and the mode
// selector that decides which control law runs each cycle.

/// Geometry fixed by the first scan
pub mod calibration;
/// Latest-value slots written by the transport
pub mod inbox;
/// Scan messages and range frames
pub mod scan;
/// Startup prologue and mode dispatch
pub mod state;
/// Target observations and the steering override
pub mod target;

pub use calibration::{CalibratedGeometry, SensorCalibrator};
pub use inbox::{Latest, SensorInbox};
pub use scan::{RangeFrame, ScanMessage};
pub use state::{Mode, ModeSelector};
pub use target::{TargetObservation, TargetOverride};
