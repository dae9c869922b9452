//! Motion interpolation
//!
//! A [`Trajectory`] samples the straight line from a start point to an end
//! point at a fixed rate. Absolute positions are rounded to whole pixels and
//! each delta is the difference between consecutive rounded positions, so the
//! deltas always add up to exactly `end - start`. The controlled application
//! accumulates those deltas for camera rotation, so any drift would show.

use std::time::Duration;

use crate::core::Point;
use crate::input::Delta;

/// Sampling rate for pointer motion
pub const MOTION_RATE_HZ: f64 = 60.0;

/// One sampled point of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub absolute_x: i32,
    pub absolute_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub elapsed_fraction: f64,
}

impl Waypoint {
    pub fn position(&self) -> Point {
        Point::new(self.absolute_x, self.absolute_y)
    }

    pub fn delta(&self) -> Delta {
        Delta::new(self.delta_x, self.delta_y)
    }
}

/// Number of samples for a duration at `rate_hz`, never less than one
pub(crate) fn sample_count(duration: Duration, rate_hz: f64) -> u32 {
    let samples = (duration.as_secs_f64() * rate_hz).round();
    if samples < 1.0 {
        1
    } else if samples > f64::from(u32::MAX) {
        u32::MAX
    } else {
        samples as u32
    }
}

/// Lazy, finite sequence of waypoints from `start` to `end`
#[derive(Debug, Clone)]
pub struct Trajectory {
    start: Point,
    end: Point,
    steps: u32,
    next_step: u32,
    previous: Point,
    interval: Duration,
}

impl Trajectory {
    pub fn new(start: Point, end: Point, duration: Duration) -> Self {
        let steps = sample_count(duration, MOTION_RATE_HZ);
        Self {
            start,
            end,
            steps,
            next_step: 1,
            previous: start,
            interval: duration / steps,
        }
    }

    /// Total number of waypoints this trajectory yields
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Pause the caller should take after each waypoint
    pub fn step_interval(&self) -> Duration {
        self.interval
    }

    fn lerp(from: i32, to: i32, progress: f64) -> i32 {
        let span = i64::from(to) - i64::from(from);
        let offset = (span as f64 * progress).round() as i64;
        (i64::from(from) + offset) as i32
    }
}

impl Iterator for Trajectory {
    type Item = Waypoint;

    fn next(&mut self) -> Option<Waypoint> {
        if self.next_step > self.steps {
            return None;
        }

        let step = self.next_step;
        self.next_step += 1;

        let absolute = if step == self.steps {
            self.end
        } else {
            let progress = f64::from(step) / f64::from(self.steps);
            Point::new(
                Self::lerp(self.start.x, self.end.x, progress),
                Self::lerp(self.start.y, self.end.y, progress),
            )
        };

        let waypoint = Waypoint {
            absolute_x: absolute.x,
            absolute_y: absolute.y,
            delta_x: absolute.x - self.previous.x,
            delta_y: absolute.y - self.previous.y,
            elapsed_fraction: f64::from(step) / f64::from(self.steps),
        };
        self.previous = absolute;

        Some(waypoint)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.next_step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Trajectory {}
