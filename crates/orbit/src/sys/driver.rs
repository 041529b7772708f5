use crate::config::{self, RingConfig};
use crate::events::AppEvent;
use async_channel::Receiver;
use carousel::geometry::normalize_angle;
use carousel::{Mode, Point, RingEngine, RingError};
use parking_lot::RwLock;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

pub type SharedFrame = Arc<RwLock<Frame>>;

/// What the ring looked like at the last rendered tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub positions: Vec<Point>,
    pub angle: f64,
    pub mode: Mode,
}

impl Frame {
    pub fn capture(engine: &RingEngine) -> Self {
        Self {
            positions: engine.positions(),
            angle: engine.angle(),
            mode: engine.mode(),
        }
    }

    /// Reply to a `query` command. Terminated by an empty line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.positions.iter().enumerate() {
            let _ = writeln!(out, "{} {:.3} {:.3}", i, p.x, p.y);
        }
        let _ = writeln!(
            out,
            "angle {:.6} mode {}",
            normalize_angle(self.angle),
            self.mode
        );
        out.push('\n');
        out
    }
}

/// Sole owner of the engine. Ticks and gesture events are applied one at a
/// time from the same task.
pub struct Driver {
    engine: RingEngine,
    frame: SharedFrame,
}

impl Driver {
    pub fn new(engine: RingEngine, frame: SharedFrame) -> Self {
        Self { engine, frame }
    }

    pub fn engine(&self) -> &RingEngine {
        &self.engine
    }

    /// Publishes the current positions, then advances the rotation, so every
    /// frame shows the ring as it was before this tick's step.
    pub fn tick(&mut self, now: Instant) {
        let frame = Frame::capture(&self.engine);
        log::trace!("frame angle={:.4} mode={}", frame.angle, frame.mode);
        *self.frame.write() = frame;
        self.engine.advance(now);
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Gesture(gesture) => {
                if let Err(e) = self.engine.apply(&gesture) {
                    log::warn!("Ignoring gesture on item {}: {}", gesture.index(), e);
                }
            }
            AppEvent::SetMode(mode) => {
                log::debug!("Switching mode to {}", mode);
                self.engine.set_mode(mode);
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => match self.reload(&new_config.ring) {
                    Ok(()) => log::info!("Configuration reloaded"),
                    Err(e) => log::error!("Failed to apply reloaded config: {}", e),
                },
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    /// Applies new geometry. The rotation state survives, so an unchanged
    /// save is invisible and a drag in progress keeps going.
    pub fn reload(&mut self, ring: &RingConfig) -> Result<(), RingError> {
        self.engine
            .reshape(ring.radius, ring.item_count, ring.angular_speed)
    }

    pub async fn run(mut self, rx: Receiver<AppEvent>, frame_interval: Duration) {
        let mut interval = tokio::time::interval(frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the interval's first tick is not ready until the timer has turned
        self.tick(Instant::now());

        loop {
            tokio::select! {
                biased;
                instant = interval.tick() => self.tick(instant.into_std()),
                event = rx.recv() => match event {
                    Ok(event) => self.handle(event),
                    Err(_) => break,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel::{DragPhase, Gesture, PressPhase};

    fn driver(engine: RingEngine) -> (Driver, SharedFrame) {
        let frame = Arc::new(RwLock::new(Frame::default()));
        (Driver::new(engine, frame.clone()), frame)
    }

    #[test]
    fn test_frame_shows_pre_advance_positions() {
        let engine = RingEngine::new(50.0, 6, 0.1, 0.0).unwrap();
        let (mut driver, frame) = driver(engine);
        let t0 = Instant::now();

        driver.tick(t0);
        driver.tick(t0 + Duration::from_secs(1));
        // published before the one second step was applied
        assert_eq!(frame.read().angle, 0.0);
        assert_eq!(frame.read().positions[0], Point::new(50.0, 0.0));
        assert!((driver.engine().angle() - 0.1).abs() < 1e-12);

        driver.tick(t0 + Duration::from_secs(2));
        assert!((frame.read().angle - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_gesture_is_ignored() {
        let engine = RingEngine::new(50.0, 3, 0.1, 0.4).unwrap();
        let (mut driver, _) = driver(engine);
        driver.handle(AppEvent::Gesture(Gesture::Drag {
            index: 0,
            phase: DragPhase::Changed,
            translation: Point::new(3.0, 4.0),
        }));
        assert_eq!(driver.engine().angle(), 0.4);
        assert_eq!(driver.engine().mode(), Mode::Clockwise);
    }

    #[test]
    fn test_set_mode_event() {
        let engine = RingEngine::new(50.0, 3, 0.1, 0.0).unwrap();
        let (mut driver, _) = driver(engine);
        driver.handle(AppEvent::SetMode(Mode::Manual));
        assert_eq!(driver.engine().mode(), Mode::Manual);
        assert_eq!(driver.engine().snapshot().len(), 3);
    }

    #[test]
    fn test_reload_keeps_angle() {
        let engine = RingEngine::new(50.0, 3, 0.1, 1.25).unwrap();
        let (mut driver, _) = driver(engine);
        let ring = RingConfig {
            radius: 80.0,
            item_count: 5,
            ..RingConfig::default()
        };
        driver.reload(&ring).unwrap();
        assert_eq!(driver.engine().item_count(), 5);
        assert_eq!(driver.engine().radius(), 80.0);
        assert_eq!(driver.engine().angle(), 1.25);

        let broken = RingConfig {
            item_count: 0,
            ..RingConfig::default()
        };
        assert_eq!(driver.reload(&broken), Err(RingError::Empty));
        assert_eq!(driver.engine().item_count(), 5);
    }

    #[test]
    fn test_reload_keeps_spin_direction() {
        let engine = RingEngine::new(150.0, 6, 0.1, 0.0).unwrap();
        let (mut driver, _) = driver(engine);
        let drag = |phase, translation| {
            AppEvent::Gesture(Gesture::Drag {
                index: 0,
                phase,
                translation,
            })
        };
        driver.handle(drag(DragPhase::Began, Point::default()));
        let snap = driver.engine().snapshot()[0];
        driver.handle(drag(DragPhase::Changed, Point::polar(150.0, -0.3) - snap));
        driver.handle(drag(DragPhase::Ended, Point::default()));
        assert_eq!(driver.engine().mode(), Mode::CounterClockwise);

        driver.reload(&RingConfig::default()).unwrap();
        assert_eq!(driver.engine().mode(), Mode::CounterClockwise);
        assert!(!driver.engine().is_clockwise());
    }

    #[test]
    fn test_reload_mid_drag_keeps_dragging() {
        let engine = RingEngine::new(150.0, 6, 0.1, 0.0).unwrap();
        let (mut driver, _) = driver(engine);
        driver.handle(AppEvent::Gesture(Gesture::Press {
            index: 2,
            phase: PressPhase::Began,
        }));
        driver.reload(&RingConfig::default()).unwrap();
        assert_eq!(driver.engine().mode(), Mode::Manual);

        let snap = driver.engine().snapshot()[0];
        driver.handle(AppEvent::Gesture(Gesture::Drag {
            index: 0,
            phase: DragPhase::Changed,
            translation: Point::polar(150.0, 0.5) - snap,
        }));
        assert_eq!(driver.engine().mode(), Mode::Manual);
        assert!((driver.engine().angle() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_frame_render() {
        let engine = RingEngine::new(10.0, 2, 0.1, 0.0).unwrap();
        let rendered = Frame::capture(&engine).render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "0 10.000 0.000");
        assert_eq!(lines[1], "1 -10.000 0.000");
        assert_eq!(lines[2], "angle 0.000000 mode clockwise");
        assert_eq!(lines[3], "");
    }

    #[tokio::test]
    async fn test_run_stops_when_channel_closes() {
        let engine = RingEngine::new(10.0, 2, 0.1, 0.0).unwrap();
        let (driver, frame) = driver(engine);
        let (tx, rx) = async_channel::bounded(4);
        tx.send(AppEvent::SetMode(Mode::Manual)).await.unwrap();
        drop(tx);

        driver.run(rx, Duration::from_millis(5)).await;
        assert_eq!(frame.read().positions.len(), 2);
    }
}
