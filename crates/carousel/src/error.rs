use crate::engine::Mode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RingError {
    #[error("a ring needs at least one item")]
    Empty,
    #[error("invalid radius {0}: must be finite and non-negative")]
    InvalidRadius(f64),
    #[error("invalid angular speed {0}: must be finite")]
    InvalidSpeed(f64),
    #[error("invalid initial angle {0}: must be finite")]
    InvalidAngle(f64),
}

/// Caller-contract breaches of [`RingEngine::update_angle`](crate::RingEngine::update_angle).
/// The engine state is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    #[error("angle can only be dragged in manual mode (current mode: {0})")]
    NotManual(Mode),
    #[error("no position snapshot has been taken")]
    NoSnapshot,
    #[error("item index {index} out of range for a ring of {count}")]
    IndexOutOfRange { index: usize, count: usize },
}
