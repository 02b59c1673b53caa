// src/navigation/field.rs
// Obstacle vector field: the mean of every beam's direction scaled by its
// normalized range. Long beams dominate, so the mean points toward open space.

use crate::core::RangeFrame;
use nalgebra::Vector2;

/// Summary vector of the obstacle layout in one scan.
pub struct ObstacleVectorField;

impl ObstacleVectorField {
    /// Mean of `(r cos θ, r sin θ) / range_max` over all samples.
    ///
    /// Not renormalized. An empty frame yields the zero vector.
    pub fn compute(frame: &RangeFrame) -> Vector2<f32> {
        if frame.is_empty() {
            return Vector2::zeros();
        }

        let range_max = frame.range_max();
        let sum = frame
            .ranges()
            .iter()
            .enumerate()
            .fold(Vector2::zeros(), |acc: Vector2<f32>, (i, &range)| {
                let theta = frame.angle_at(i);
                acc + Vector2::new(theta.cos(), theta.sin()) * (range / range_max)
            });

        sum / frame.len() as f32
    }

    /// Heading of the field vector, `atan2(y, x)`.
    pub fn heading(frame: &RangeFrame) -> f32 {
        let field = Self::compute(frame);
        field.y.atan2(field.x)
    }
}
