//! Layout and rotation state for a ring of items spaced evenly on a circle.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;

pub use engine::{Mode, RingEngine};
pub use error::{DragError, RingError};
pub use geometry::Point;
pub use gesture::{DragPhase, Gesture, PressPhase};
