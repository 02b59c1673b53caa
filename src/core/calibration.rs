// core/calibration.rs

// Derives the fixed scan geometry from the first laser scan: where the wall-side
// beams (middle, front, rear) sit in the range array, which sample points
// straight ahead, and how wide the forward guard window is.

use super::scan::RangeFrame;
use crate::{NavError, Result};
use log::info;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::ops::Range;

/// Beam angle that points at the followed wall (robot's right side).
pub const MIDDLE_ANGLE: f32 = -FRAC_PI_2;

/// Half-width of the forward guard window.
pub const GUARD_HALF_ANGLE: f32 = FRAC_PI_4;

/// Geometry fixed by the first scan and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedGeometry {
    /// Angle of the first sample of the calibrating scan
    pub angle_min: f32,
    /// Angle between samples of the calibrating scan
    pub angle_increment: f32,
    /// Maximum range of the calibrating scan
    pub range_max: f32,
    /// Number of samples every later scan must carry
    pub sample_count: usize,
    /// Mounting compensation, `|angle_min + 90°|`
    pub angle_offset: f32,
    /// Wall-side beam ahead of the middle beam
    pub front_angle: f32,
    /// Wall-side beam behind the middle beam
    pub rear_angle: f32,
    /// Sample pointing straight at the wall
    pub middle_index: usize,
    /// Sample at `front_angle`
    pub front_index: usize,
    /// Sample at `rear_angle`
    pub rear_index: usize,
    /// Sample at the angular center of the scan
    pub guard_index: usize,
    /// Guard window half-width in samples
    pub window: usize,
}

impl CalibratedGeometry {
    /// Samples scanned for the guard minimum: `[guard - window, guard + window)`,
    /// clipped to the scan.
    pub fn guard_span(&self) -> Range<usize> {
        let start = self.guard_index.saturating_sub(self.window);
        let end = self.guard_index.saturating_add(self.window).min(self.sample_count);
        start..end
    }

    /// Wraps a later scan's readings in a frame using the calibrated metadata.
    pub fn frame_for(&self, ranges: &[f32]) -> Result<RangeFrame> {
        if ranges.len() != self.sample_count {
            return Err(NavError::Scan(format!(
                "expected {} samples, got {}",
                self.sample_count,
                ranges.len()
            )));
        }
        Ok(RangeFrame::new(
            self.angle_min,
            self.angle_increment,
            self.range_max,
            ranges,
        ))
    }
}

/// Computes [`CalibratedGeometry`] from a frame built on validated metadata.
pub struct SensorCalibrator;

impl SensorCalibrator {
    /// Calibrates against `frame`.
    ///
    /// Indices that fall outside the scan wrap around on a full-circle scanner
    /// and are clamped to the first or last sample otherwise. A negative
    /// `angle_increment` yields an empty guard window.
    pub fn calibrate(frame: &RangeFrame) -> CalibratedGeometry {
        let angle_offset = (frame.angle_min() + FRAC_PI_2).abs();
        let front_angle = MIDDLE_ANGLE + angle_offset;
        let rear_angle = MIDDLE_ANGLE - angle_offset;

        let middle_index = frame.resolve_index(frame.index_at(MIDDLE_ANGLE));
        let front_index = frame.resolve_index(frame.index_at(front_angle));
        let rear_index = frame.resolve_index(frame.index_at(rear_angle));
        let guard_index = frame.len() / 2;
        // Saturating cast: a negative quotient becomes 0.
        let window = (GUARD_HALF_ANGLE / frame.angle_increment()) as usize;

        let geometry = CalibratedGeometry {
            angle_min: frame.angle_min(),
            angle_increment: frame.angle_increment(),
            range_max: frame.range_max(),
            sample_count: frame.len(),
            angle_offset,
            front_angle,
            rear_angle,
            middle_index,
            front_index,
            rear_index,
            guard_index,
            window,
        };

        info!(
            "Calibrated scan geometry: {} samples, middle={}, front={}, rear={}, guard={}, window={}",
            geometry.sample_count,
            middle_index,
            front_index,
            rear_index,
            guard_index,
            window
        );

        geometry
    }
}
