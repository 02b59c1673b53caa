// core/state.rs

// Chooses the control law for each cycle. A fixed startup maneuver runs first;
// after it, the choice depends only on the closest obstacle in the front half
// of the scan, with a dead band between the two laws where nothing is sent.

use log::info;

/// Below this range the robot follows the wall.
pub const WALL_FOLLOW_BELOW: f32 = 1.0;

/// Above this range the robot drives along the open heading.
pub const OPEN_FIELD_ABOVE: f32 = 2.0;

/// Control mode for one cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Fixed reverse maneuver
    Startup,
    /// Obstacle close: hug the wall
    WallFollow,
    /// Path clear: follow the obstacle vector field
    OpenField,
}

impl Mode {
    /// Mode for a given front-half minimum range; `None` inside the dead zone.
    pub fn for_min_range(min_range: f32) -> Option<Mode> {
        if min_range < WALL_FOLLOW_BELOW {
            Some(Mode::WallFollow)
        } else if min_range > OPEN_FIELD_ABOVE {
            Some(Mode::OpenField)
        } else {
            None
        }
    }
}

/// Startup counter plus per-cycle mode choice.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    startup_remaining: u32,
    last: Option<Mode>,
}

impl ModeSelector {
    /// Starts with `startup_cycles` cycles of [`Mode::Startup`].
    pub fn new(startup_cycles: u32) -> Self {
        ModeSelector {
            startup_remaining: startup_cycles,
            last: None,
        }
    }

    /// True until the startup maneuver has run its cycles.
    pub fn in_startup(&self) -> bool {
        self.startup_remaining > 0
    }

    /// Picks the mode for the current cycle.
    ///
    /// `min_range` is only read once startup is over; `None` (no scan yet) and
    /// the dead zone both yield no mode.
    pub fn select(&mut self, min_range: Option<f32>) -> Option<Mode> {
        let mode = if self.startup_remaining > 0 {
            self.startup_remaining -= 1;
            Some(Mode::Startup)
        } else {
            min_range.and_then(Mode::for_min_range)
        };

        if mode != self.last {
            match mode {
                Some(mode) => info!("Mode: {:?} (min_range={:?})", mode, min_range),
                None => info!("Mode: none, holding (min_range={:?})", min_range),
            }
            self.last = mode;
        }

        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.5, Some(Mode::WallFollow))]
    #[case(0.999, Some(Mode::WallFollow))]
    #[case(1.0, None)]
    #[case(1.5, None)]
    #[case(2.0, None)]
    #[case(2.5, Some(Mode::OpenField))]
    fn mode_for_range(#[case] min_range: f32, #[case] expected: Option<Mode>) {
        assert_eq!(Mode::for_min_range(min_range), expected);
    }

    #[test]
    fn startup_runs_exactly_the_configured_cycles() {
        let mut selector = ModeSelector::new(10);
        for _ in 0..10 {
            assert_eq!(selector.select(Some(0.2)), Some(Mode::Startup));
        }
        assert!(!selector.in_startup());
        assert_eq!(selector.select(Some(0.2)), Some(Mode::WallFollow));
    }

    #[test]
    fn startup_ignores_missing_scans() {
        let mut selector = ModeSelector::new(2);
        assert_eq!(selector.select(None), Some(Mode::Startup));
        assert_eq!(selector.select(None), Some(Mode::Startup));
        assert_eq!(selector.select(None), None);
    }

    #[test]
    fn choice_after_startup_has_no_memory() {
        let mut selector = ModeSelector::new(0);
        assert_eq!(selector.select(Some(2.5)), Some(Mode::OpenField));
        assert_eq!(selector.select(Some(1.5)), None);
        assert_eq!(selector.select(Some(0.5)), Some(Mode::WallFollow));
        assert_eq!(selector.select(Some(2.5)), Some(Mode::OpenField));
    }
}
