use crate::engine::RingEngine;
use crate::error::DragError;
use crate::geometry::Point;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum DragPhase {
    #[strum(serialize = "began", serialize = "begin")]
    Began,
    #[strum(serialize = "changed", serialize = "change", serialize = "move")]
    Changed,
    #[strum(serialize = "ended", serialize = "end")]
    Ended,
    #[strum(serialize = "cancelled", serialize = "cancel")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PressPhase {
    #[strum(serialize = "began", serialize = "begin")]
    Began,
    #[strum(serialize = "changed", serialize = "change")]
    Changed,
    #[strum(serialize = "ended", serialize = "end")]
    Ended,
    #[strum(serialize = "cancelled", serialize = "cancel")]
    Cancelled,
}

/// A pointer event addressed to one item of the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// `translation` is cumulative since the drag began.
    Drag {
        index: usize,
        phase: DragPhase,
        translation: Point,
    },
    Press {
        index: usize,
        phase: PressPhase,
    },
}

impl Gesture {
    pub fn index(&self) -> usize {
        match self {
            Self::Drag { index, .. } | Self::Press { index, .. } => *index,
        }
    }
}

impl RingEngine {
    /// Drives the mode machine from a gesture: a drag or press stops the spin,
    /// drag changes move the ring, and ending either resumes spinning.
    pub fn apply(&mut self, gesture: &Gesture) -> Result<(), DragError> {
        match *gesture {
            Gesture::Drag {
                index,
                phase,
                translation,
            } => match phase {
                DragPhase::Began => self.enter_manual(),
                DragPhase::Changed => self.update_angle(translation, index)?,
                DragPhase::Ended | DragPhase::Cancelled => self.resume_automatic(),
            },
            Gesture::Press { phase, .. } => match phase {
                PressPhase::Began => self.enter_manual(),
                PressPhase::Changed => {}
                PressPhase::Ended | PressPhase::Cancelled => self.resume_automatic(),
            },
        }
        Ok(())
    }
}
