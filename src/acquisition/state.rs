use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionState {
    /// A live attempt is about to be made.
    Pending,
    /// The live response was accepted.
    Live,
    /// The live source failed; the fixture is (or is about to be) in use.
    Fallback,
    /// Neither the live source nor the fixture produced a dataset.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionEvent {
    LiveResolved,
    LiveFailed,
    FixtureFailed,
    Retry,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no transition from {from} on {event:?}")]
pub struct TransitionError {
    pub from: AcquisitionState,
    pub event: AcquisitionEvent,
}

/// Every legal `(from, event) -> to` move. Anything absent is rejected.
pub const TRANSITIONS: &[(AcquisitionState, AcquisitionEvent, AcquisitionState)] = &[
    (
        AcquisitionState::Pending,
        AcquisitionEvent::LiveResolved,
        AcquisitionState::Live,
    ),
    (
        AcquisitionState::Pending,
        AcquisitionEvent::LiveFailed,
        AcquisitionState::Fallback,
    ),
    (
        AcquisitionState::Fallback,
        AcquisitionEvent::FixtureFailed,
        AcquisitionState::Exhausted,
    ),
    (
        AcquisitionState::Live,
        AcquisitionEvent::Retry,
        AcquisitionState::Pending,
    ),
    (
        AcquisitionState::Fallback,
        AcquisitionEvent::Retry,
        AcquisitionState::Pending,
    ),
    (
        AcquisitionState::Exhausted,
        AcquisitionEvent::Retry,
        AcquisitionState::Pending,
    ),
];

impl AcquisitionState {
    pub fn next(self, event: AcquisitionEvent) -> Result<Self, TransitionError> {
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self && *on == event)
            .map(|(_, _, to)| *to)
            .ok_or(TransitionError { from: self, event })
    }

    /// True once a pass has settled, successfully or not.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for AcquisitionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Live => "live",
            Self::Fallback => "fallback",
            Self::Exhausted => "exhausted",
        };
        write!(f, "{label}")
    }
}
