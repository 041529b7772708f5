use crate::error::{DragError, RingError};
use crate::geometry::Point;
use std::f64::consts::TAU;
use std::time::Instant;
use strum::{Display as StrumDisplay, EnumString};

/// Angular steps whose cosine stays within this distance of 1 are treated as
/// stillness and never flip the inferred spin direction.
const STILLNESS_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    #[strum(serialize = "clockwise", serialize = "cw")]
    Clockwise,
    #[strum(serialize = "counterclockwise", serialize = "ccw")]
    CounterClockwise,
    Manual,
}

/// Positions `item_count` items evenly on a circle and rotates them.
///
/// Rotation is driven either by wall-clock time ([`advance`](Self::advance))
/// while spinning, or by a drag on one item ([`update_angle`](Self::update_angle))
/// while in [`Mode::Manual`]. The engine is single-writer: a host that ticks
/// and handles gestures from different threads must serialize the calls.
#[derive(Debug, Clone)]
pub struct RingEngine {
    radius: f64,
    item_count: usize,
    angular_speed: f64,
    unit_angle: f64,
    angle: f64,
    mode: Mode,
    is_clockwise: bool,
    snapshot: Vec<Point>,
    last_tick: Option<Instant>,
}

impl RingEngine {
    pub fn new(
        radius: f64,
        item_count: usize,
        angular_speed: f64,
        initial_angle: f64,
    ) -> Result<Self, RingError> {
        check_geometry(radius, item_count, angular_speed)?;
        if !initial_angle.is_finite() {
            return Err(RingError::InvalidAngle(initial_angle));
        }

        Ok(Self {
            radius,
            item_count,
            angular_speed: angular_speed.abs(),
            unit_angle: TAU / item_count as f64,
            angle: initial_angle,
            mode: Mode::Clockwise,
            is_clockwise: true,
            snapshot: Vec::new(),
            last_tick: None,
        })
    }

    /// Swaps in new geometry while the ring keeps turning: angle, mode,
    /// inferred direction and tick baseline carry over. A manual ring is
    /// re-frozen at the new geometry so drags keep working.
    pub fn reshape(
        &mut self,
        radius: f64,
        item_count: usize,
        angular_speed: f64,
    ) -> Result<(), RingError> {
        check_geometry(radius, item_count, angular_speed)?;

        self.radius = radius;
        self.item_count = item_count;
        self.angular_speed = angular_speed.abs();
        self.unit_angle = TAU / item_count as f64;
        if self.mode == Mode::Manual {
            self.take_snapshot();
        } else {
            self.snapshot.clear();
        }
        Ok(())
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn unit_angle(&self) -> f64 {
        self.unit_angle
    }

    /// Current rotation offset. Unbounded; never wrapped into `[0, TAU)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Last inferred spin direction, used by [`resume_automatic`](Self::resume_automatic).
    pub fn is_clockwise(&self) -> bool {
        self.is_clockwise
    }

    /// Item positions frozen when manual mode was last entered. Empty until then.
    pub fn snapshot(&self) -> &[Point] {
        &self.snapshot
    }

    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    /// Offset of item `index` from the ring center at the current angle.
    /// Indices past `item_count` wrap around the ring.
    pub fn position_of(&self, index: usize) -> Point {
        Point::polar(self.radius, self.unit_angle * index as f64 + self.angle)
    }

    pub fn positions(&self) -> Vec<Point> {
        (0..self.item_count).map(|i| self.position_of(i)).collect()
    }

    /// Integrates rotation over the time elapsed since the previous call.
    /// The first call only records `now` as the baseline.
    pub fn advance(&mut self, now: Instant) {
        if let Some(previous) = self.last_tick {
            // an earlier `now` integrates nothing
            let elapsed = now.saturating_duration_since(previous).as_secs_f64();
            let delta = elapsed * self.angular_speed;
            match self.mode {
                Mode::Clockwise => self.angle += delta,
                Mode::CounterClockwise => self.angle -= delta,
                Mode::Manual => {}
            }
        }
        self.last_tick = Some(now);
    }

    /// Stops automatic rotation and freezes the current item positions.
    /// Does nothing when already manual.
    pub fn enter_manual(&mut self) {
        if self.mode == Mode::Manual {
            return;
        }
        self.mode = Mode::Manual;
        self.take_snapshot();
    }

    /// Restarts automatic rotation in the last inferred direction.
    pub fn resume_automatic(&mut self) {
        self.mode = if self.is_clockwise {
            Mode::Clockwise
        } else {
            Mode::CounterClockwise
        };
        log::debug!("Resuming {} rotation at angle {:.4}", self.mode, self.angle);
    }

    pub fn set_mode(&mut self, target: Mode) {
        if self.mode == target {
            return;
        }
        self.mode = target;
        if target == Mode::Manual {
            self.take_snapshot();
        }
    }

    /// Rotates the ring so that item `index` points towards its snapshot
    /// position moved by `translation`, the cumulative drag since the gesture
    /// began. Targets off the circle are projected onto it along their direction.
    ///
    /// The sign of the angular step updates [`is_clockwise`](Self::is_clockwise),
    /// unless the step is small enough to count as stillness.
    pub fn update_angle(&mut self, translation: Point, index: usize) -> Result<(), DragError> {
        if self.mode != Mode::Manual {
            return Err(DragError::NotManual(self.mode));
        }
        if self.snapshot.len() != self.item_count {
            return Err(DragError::NoSnapshot);
        }
        let origin = self
            .snapshot
            .get(index)
            .copied()
            .ok_or(DragError::IndexOutOfRange {
                index,
                count: self.item_count,
            })?;

        let target = origin + translation;
        let new_angle = target.direction() - self.unit_angle * index as f64;

        let step = new_angle - self.angle;
        if step.cos() < 1.0 - STILLNESS_EPSILON {
            self.is_clockwise = step.sin() > 0.0;
        }
        self.angle = new_angle;
        Ok(())
    }

    fn take_snapshot(&mut self) {
        log::debug!("Freezing ring at angle {:.4}", self.angle);
        self.snapshot = self.positions();
    }
}

fn check_geometry(radius: f64, item_count: usize, angular_speed: f64) -> Result<(), RingError> {
    if item_count == 0 {
        return Err(RingError::Empty);
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(RingError::InvalidRadius(radius));
    }
    if !angular_speed.is_finite() {
        return Err(RingError::InvalidSpeed(angular_speed));
    }
    Ok(())
}
