//! Eased pointer motion.
//!
//! A move from the current pointer position to a target is sampled at 60
//! frames per second of the configured duration and shaped with an
//! ease-out-cubic curve, so the pointer decelerates into the target.
//!
//! [`Motion`] is the frame-by-frame iterator; it can be cancelled between
//! frames.  [`EasedCursorController::move_to`] drives a motion to the end,
//! handing control to a [`FramePacer`] between frames so the host event
//! loop keeps running.

use crate::command::Point;
use crate::config::Config;
use crate::traits::PointerDevice;
use log::debug;
use std::time::Duration;

/// Sample rate of an eased move.
pub const FRAMES_PER_SECOND: f64 = 60.0;

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Called between the frames of a move.
///
/// Implementations wait out the frame interval and service whatever event
/// loop the host runs.
pub trait FramePacer {
    fn frame(&mut self, interval: Duration);
}

/// Pacer for hosts without an event loop: just sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepPacer;

impl FramePacer for SleepPacer {
    fn frame(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// The eased samples of one pointer move.
///
/// Yields `steps + 1` points at `t = i / steps`, the first one being the
/// start and the last one exactly the target.
#[derive(Debug, Clone)]
pub struct Motion {
    start: Point,
    target: Point,
    steps: u32,
    next: u32,
    interval: Duration,
    cancelled: bool,
}

impl Motion {
    /// Plan a move from `start` to `target` over `duration`.
    pub fn new(start: Point, target: Point, duration: Duration) -> Self {
        let steps = ((duration.as_secs_f64() * FRAMES_PER_SECOND).floor() as u32).max(1);
        Self {
            start,
            target,
            steps,
            next: 0,
            interval: duration / steps,
            cancelled: false,
        }
    }

    /// Number of frame intervals in the move.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Time between two samples.
    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    /// Stop the move after the sample already produced.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.next > self.steps
    }

    fn sample(&self, i: u32) -> Point {
        let e = ease_out_cubic(i as f64 / self.steps as f64);
        let lerp = |a: i32, b: i32| (a as f64 + (b - a) as f64 * e).round() as i32;
        Point::new(
            lerp(self.start.x, self.target.x),
            lerp(self.start.y, self.target.y),
        )
    }
}

impl Iterator for Motion {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.is_finished() {
            return None;
        }
        let point = self.sample(self.next);
        self.next += 1;
        Some(point)
    }
}

/// Moves the system pointer, either instantly or along an eased path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedCursorController {
    smooth: bool,
    duration: Duration,
}

impl EasedCursorController {
    pub fn new(smooth: bool, duration: Duration) -> Self {
        Self { smooth, duration }
    }

    /// Build from the `smooth_movement` / `movement_duration` settings.
    pub fn from_config(config: &Config) -> Self {
        let duration =
            Duration::try_from_secs_f64(config.movement_duration).unwrap_or(Duration::ZERO);
        Self::new(config.smooth_movement, duration)
    }

    /// Whether moves jump straight to the target.
    pub fn is_instant(&self) -> bool {
        !self.smooth || self.duration.is_zero()
    }

    /// Move the pointer to `target`.
    ///
    /// Blocks until the last frame has been applied.  The start position is
    /// read once, before the first frame.
    pub fn move_to<P: PointerDevice>(
        &self,
        pointer: &P,
        target: Point,
        pacer: &mut dyn FramePacer,
    ) -> Result<(), P::Error> {
        if self.is_instant() {
            return pointer.move_to(target);
        }

        let start = pointer.position()?;
        let mut motion = Motion::new(start, target, self.duration);
        debug!(
            "eased move {} -> {} in {} frames",
            start,
            target,
            motion.steps()
        );
        let interval = motion.frame_interval();
        while let Some(point) = motion.next() {
            pointer.move_to(point)?;
            if !motion.is_finished() {
                pacer.frame(interval);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingPacer, RecordingPointer};

    #[test]
    fn ease_out_cubic_endpoints_and_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_cubic(i as f64 / 100.0);
            assert!(v >= prev, "ease-out must be monotonic");
            prev = v;
        }
    }

    #[test]
    fn motion_samples_sixty_per_second() {
        let m = Motion::new(Point::new(0, 0), Point::new(100, 0), Duration::from_millis(200));
        assert_eq!(m.steps(), 12);
        let points: Vec<Point> = m.collect();
        assert_eq!(points.len(), 13);
        assert_eq!(points[0], Point::new(0, 0));
        assert_eq!(*points.last().unwrap(), Point::new(100, 0));
    }

    #[test]
    fn very_short_motion_has_one_step() {
        let m = Motion::new(Point::new(0, 0), Point::new(10, 10), Duration::from_millis(5));
        assert_eq!(m.steps(), 1);
        let points: Vec<Point> = m.collect();
        assert_eq!(points, vec![Point::new(0, 0), Point::new(10, 10)]);
    }

    #[test]
    fn motion_decelerates() {
        let points: Vec<Point> =
            Motion::new(Point::new(0, 0), Point::new(600, 0), Duration::from_secs(1)).collect();
        let first_step = points[1].x - points[0].x;
        let last_step = points[points.len() - 1].x - points[points.len() - 2].x;
        assert!(first_step > last_step);
    }

    #[test]
    fn cancelled_motion_stops() {
        let mut m = Motion::new(Point::new(0, 0), Point::new(100, 0), Duration::from_secs(1));
        assert!(m.next().is_some());
        assert!(m.next().is_some());
        m.cancel();
        assert!(m.is_finished());
        assert_eq!(m.next(), None);
    }

    #[test]
    fn instant_when_smoothing_disabled() {
        let pointer = RecordingPointer::at(Point::new(5, 5));
        let mut pacer = CountingPacer::default();
        let ctl = EasedCursorController::new(false, Duration::from_millis(200));
        ctl.move_to(&pointer, Point::new(300, 400), &mut pacer).unwrap();
        assert_eq!(pointer.moves(), vec![Point::new(300, 400)]);
        assert_eq!(pacer.frames(), 0);
    }

    #[test]
    fn instant_when_duration_is_zero() {
        let pointer = RecordingPointer::at(Point::new(5, 5));
        let mut pacer = CountingPacer::default();
        let ctl = EasedCursorController::new(true, Duration::ZERO);
        assert!(ctl.is_instant());
        ctl.move_to(&pointer, Point::new(1, 2), &mut pacer).unwrap();
        assert_eq!(pointer.moves(), vec![Point::new(1, 2)]);
    }

    #[test]
    fn eased_move_uses_the_initial_position_throughout() {
        let start = Point::new(100, 100);
        let target = Point::new(400, 250);
        let pointer = RecordingPointer::at(start);
        let mut pacer = CountingPacer::default();
        let ctl = EasedCursorController::new(true, Duration::from_millis(100));
        ctl.move_to(&pointer, target, &mut pacer).unwrap();

        let expected: Vec<Point> = Motion::new(start, target, Duration::from_millis(100)).collect();
        assert_eq!(pointer.moves(), expected);
        assert_eq!(pacer.frames(), expected.len() - 1);
        assert_eq!(pointer.position().unwrap(), target);
    }

    #[test]
    fn from_config_reads_movement_settings() {
        let mut config = Config::default();
        config.smooth_movement = true;
        config.movement_duration = 0.5;
        let ctl = EasedCursorController::from_config(&config);
        assert_eq!(ctl, EasedCursorController::new(true, Duration::from_millis(500)));

        config.smooth_movement = false;
        assert!(EasedCursorController::from_config(&config).is_instant());
    }
}
