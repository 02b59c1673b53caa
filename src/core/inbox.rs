// core/inbox.rs

// Landing zone for transport callbacks. Scans and detections arrive on their own
// schedule; each is kept as a single latest value that the control loop
// snapshots once per cycle. Geometry is written once, by the first usable scan.

use super::calibration::{CalibratedGeometry, SensorCalibrator};
use super::scan::{RangeFrame, ScanMessage};
use super::target::TargetObservation;
use crate::Result;
use log::{debug, info};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Single-slot cell holding the most recent value.
///
/// Writers replace the whole value; readers get a shared handle to a complete one.
#[derive(Debug)]
pub struct Latest<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Latest<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Latest {
            slot: Mutex::new(None),
        }
    }

    /// Replaces the stored value.
    pub fn replace(&self, value: T) {
        let value = Arc::new(value);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Returns the stored value, if any has been written.
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sensor state shared between transport callbacks and the control loop.
#[derive(Debug, Default)]
pub struct SensorInbox {
    geometry: OnceLock<CalibratedGeometry>,
    frame: Latest<RangeFrame>,
    detection: Latest<TargetObservation>,
}

impl SensorInbox {
    /// Creates an inbox with nothing received yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles an inbound scan.
    ///
    /// The first valid scan calibrates the geometry. Later scans only replace
    /// the readings and must carry the calibrated sample count. A refused scan
    /// leaves the previous frame in place.
    pub fn on_scan(&self, scan: ScanMessage) -> Result<()> {
        let geometry = match self.geometry.get() {
            Some(geometry) => *geometry,
            None => self.calibrate(&scan)?,
        };

        let frame = geometry.frame_for(&scan.ranges)?;
        self.frame.replace(frame);
        Ok(())
    }

    fn calibrate(&self, scan: &ScanMessage) -> Result<CalibratedGeometry> {
        scan.validate()?;
        let frame = RangeFrame::from_scan(scan);
        let mut calibrated_here = false;
        let geometry = *self.geometry.get_or_init(|| {
            calibrated_here = true;
            SensorCalibrator::calibrate(&frame)
        });
        if calibrated_here {
            info!("Sensor calibrated from first scan");
        }
        Ok(geometry)
    }

    /// Handles an inbound target detection.
    pub fn on_detection(&self, observation: TargetObservation) {
        debug!(
            "Target detection: center_y={:.3}, size_y={:.3}",
            observation.center_y, observation.size_y
        );
        self.detection.replace(observation);
    }

    /// Calibrated geometry, once the first valid scan has arrived
    pub fn geometry(&self) -> Option<CalibratedGeometry> {
        self.geometry.get().copied()
    }

    /// Latest scan frame
    pub fn frame(&self) -> Option<Arc<RangeFrame>> {
        self.frame.snapshot()
    }

    /// Latest target observation
    pub fn detection(&self) -> Option<TargetObservation> {
        self.detection.snapshot().map(|observation| *observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavError;
    use std::f32::consts::PI;
    use std::time::Instant;

    fn scan(angle_min: f32, n: usize, range: f32) -> ScanMessage {
        ScanMessage {
            angle_min,
            angle_increment: PI / 180.0,
            range_max: 10.0,
            ranges: vec![range; n],
        }
    }

    #[test]
    fn nothing_is_visible_before_the_first_scan() {
        let inbox = SensorInbox::new();
        assert!(inbox.geometry().is_none());
        assert!(inbox.frame().is_none());
        assert!(inbox.detection().is_none());
    }

    #[test]
    fn calibration_happens_once() {
        let inbox = SensorInbox::new();
        inbox.on_scan(scan(-PI, 360, 1.0)).unwrap();
        let first = inbox.geometry().unwrap();

        // Different metadata, same sample count: geometry must not move
        inbox.on_scan(scan(-PI / 2.0, 360, 3.0)).unwrap();
        assert_eq!(inbox.geometry().unwrap(), first);

        let frame = inbox.frame().unwrap();
        assert_eq!(frame.angle_min(), -PI);
        assert_eq!(frame.front_range(), 3.0);
    }

    #[test]
    fn malformed_first_scan_is_refused_and_later_scan_calibrates() {
        let inbox = SensorInbox::new();
        let mut bad = scan(-PI, 360, 1.0);
        bad.angle_increment = 0.0;
        assert!(matches!(inbox.on_scan(bad), Err(NavError::Calibration(_))));
        assert!(inbox.geometry().is_none());

        inbox.on_scan(scan(-PI, 360, 1.0)).unwrap();
        assert!(inbox.geometry().is_some());
    }

    #[test]
    fn wrong_length_scan_keeps_previous_frame() {
        let inbox = SensorInbox::new();
        inbox.on_scan(scan(-PI, 360, 1.0)).unwrap();
        assert!(matches!(
            inbox.on_scan(scan(-PI, 180, 5.0)),
            Err(NavError::Scan(_))
        ));
        assert_eq!(inbox.frame().unwrap().front_range(), 1.0);
    }

    #[test]
    fn detections_are_replaced_wholesale() {
        let inbox = SensorInbox::new();
        let now = Instant::now();
        inbox.on_detection(TargetObservation::new(1.0, 5.0, now));
        inbox.on_detection(TargetObservation::new(2.0, 0.5, now));
        let latest = inbox.detection().unwrap();
        assert_eq!(latest.center_y, 2.0);
        assert_eq!(latest.size_y, 0.5);
    }

    #[test]
    fn snapshots_survive_replacement() {
        let cell = Latest::new();
        cell.replace(vec![1.0_f32; 4]);
        let held = cell.snapshot().unwrap();
        cell.replace(vec![2.0_f32; 4]);
        assert_eq!(*held, vec![1.0; 4]);
        assert_eq!(*cell.snapshot().unwrap(), vec![2.0; 4]);
    }
}
