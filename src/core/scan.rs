// core/scan.rs

// Laser scan input and the range frame the control laws read from. The frame
// owns the affine map between sample indices and beam angles.

use crate::{NavError, Result};
use std::f32::consts::TAU;
use std::ops::Range;

/// Range-scan message as delivered by the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMessage {
    /// Angle of the first sample (radians)
    pub angle_min: f32,
    /// Angle between consecutive samples (radians)
    pub angle_increment: f32,
    /// Maximum valid range (meters)
    pub range_max: f32,
    /// One range per beam, first beam at `angle_min`
    pub ranges: Vec<f32>,
}

impl ScanMessage {
    /// Checks that the angular metadata can anchor a calibration.
    pub fn validate(&self) -> Result<()> {
        if self.ranges.is_empty() {
            return Err(NavError::Calibration("scan has no samples".to_string()));
        }
        if !self.angle_min.is_finite() {
            return Err(NavError::Calibration(format!(
                "angle_min is not finite: {}",
                self.angle_min
            )));
        }
        if !self.angle_increment.is_finite() || self.angle_increment == 0.0 {
            return Err(NavError::Calibration(format!(
                "angle_increment must be finite and non-zero, got {}",
                self.angle_increment
            )));
        }
        if !self.range_max.is_finite() || self.range_max <= 0.0 {
            return Err(NavError::Calibration(format!(
                "range_max must be finite and positive, got {}",
                self.range_max
            )));
        }
        Ok(())
    }
}

/// Snapshot of one scan with the calibrated angular metadata.
///
/// Readings that are not finite, not positive, or exceed `range_max` are
/// stored as `range_max`, so saturated beams and missing returns read as open
/// space.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFrame {
    angle_min: f32,
    angle_increment: f32,
    range_max: f32,
    ranges: Vec<f32>,
}

impl RangeFrame {
    /// Builds a frame from explicit metadata and raw readings.
    pub fn new(angle_min: f32, angle_increment: f32, range_max: f32, ranges: &[f32]) -> Self {
        let ranges = ranges
            .iter()
            .map(|&r| {
                if r.is_finite() && r > 0.0 && r <= range_max {
                    r
                } else {
                    range_max
                }
            })
            .collect();

        RangeFrame {
            angle_min,
            angle_increment,
            range_max,
            ranges,
        }
    }

    /// Builds a frame carrying the scan's own metadata.
    pub fn from_scan(scan: &ScanMessage) -> Self {
        Self::new(
            scan.angle_min,
            scan.angle_increment,
            scan.range_max,
            &scan.ranges,
        )
    }

    /// Angle of the first sample
    pub fn angle_min(&self) -> f32 {
        self.angle_min
    }

    /// Angle between consecutive samples
    pub fn angle_increment(&self) -> f32 {
        self.angle_increment
    }

    /// Largest valid reading; also stands in for invalid ones
    pub fn range_max(&self) -> f32 {
        self.range_max
    }

    /// Sanitised readings
    pub fn ranges(&self) -> &[f32] {
        &self.ranges
    }

    /// Number of samples in the frame
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True when the frame has no samples
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Range at `index`. Panics if `index` is out of bounds.
    pub fn range(&self, index: usize) -> f32 {
        self.ranges[index]
    }

    /// Beam angle of the sample at `index`.
    pub fn angle_at(&self, index: usize) -> f32 {
        index as f32 * self.angle_increment + self.angle_min
    }

    /// Sample index for `angle`, truncated toward zero.
    ///
    /// The result may lie outside the frame; use [`RangeFrame::clamp_index`]
    /// before indexing.
    pub fn index_at(&self, angle: f32) -> i64 {
        ((angle - self.angle_min) / self.angle_increment) as i64
    }

    /// Clamps a possibly out-of-range index to the first or last sample.
    pub fn clamp_index(&self, index: i64) -> usize {
        index.clamp(0, self.ranges.len().saturating_sub(1) as i64) as usize
    }

    /// True when the samples cover a whole turn, to within half a sample.
    pub fn covers_full_circle(&self) -> bool {
        let step = self.angle_increment.abs();
        self.ranges.len() as f32 * step + step / 2.0 >= TAU
    }

    /// Maps a possibly out-of-range index onto a sample.
    ///
    /// On a full-circle scan the index wraps around, so an angle before
    /// `angle_min` lands on the matching beam at the end of the array. Partial
    /// scans clamp to their first or last sample.
    pub fn resolve_index(&self, index: i64) -> usize {
        if self.covers_full_circle() && !self.ranges.is_empty() {
            index.rem_euclid(self.ranges.len() as i64) as usize
        } else {
            self.clamp_index(index)
        }
    }

    /// Range straight ahead, at the angular center of the scan.
    pub fn front_range(&self) -> f32 {
        self.ranges[self.ranges.len() / 2]
    }

    /// Smallest range over `span`, clipped to the frame.
    ///
    /// An empty span reads as open space and yields `range_max`.
    pub fn min_range_over(&self, span: Range<usize>) -> f32 {
        let end = span.end.min(self.ranges.len());
        let start = span.start.min(end);
        self.ranges[start..end]
            .iter()
            .copied()
            .reduce(f32::min)
            .unwrap_or(self.range_max)
    }
}
