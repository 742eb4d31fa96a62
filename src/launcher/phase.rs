//! Launcher state machine

use std::fmt;

use crate::util::config::PhaseSelection;

/// Launcher phases.
///
/// ```text
/// Init → BlockingPhase → CaptureOne → SpinningPhase → CaptureTwo → Holding | Done
/// ```
///
/// A phase left out by [`PhaseSelection`] is skipped together with its
/// capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    BlockingPhase,
    CaptureOne,
    SpinningPhase,
    CaptureTwo,
    /// Parked for the rest of the process's life.
    Holding,
    /// Returned to the caller.
    Done,
}

impl Phase {
    /// The phase after `self`, or `None` from a terminal phase.
    pub fn next(
        self,
        selection: PhaseSelection,
        exit_after_capture: bool,
    ) -> Option<Phase> {
        let end = if exit_after_capture {
            Phase::Done
        } else {
            Phase::Holding
        };
        match self {
            Phase::Init if selection.runs_blocking() => Some(Phase::BlockingPhase),
            Phase::Init => Some(Phase::SpinningPhase),
            Phase::BlockingPhase => Some(Phase::CaptureOne),
            Phase::CaptureOne if selection.runs_spinning() => Some(Phase::SpinningPhase),
            Phase::CaptureOne => Some(end),
            Phase::SpinningPhase => Some(Phase::CaptureTwo),
            Phase::CaptureTwo => Some(end),
            Phase::Holding | Phase::Done => None,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Holding | Phase::Done)
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self, Phase::CaptureOne | Phase::CaptureTwo)
    }
}

impl fmt::Display for Phase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::BlockingPhase => "blocking",
            Phase::CaptureOne => "capture-1",
            Phase::SpinningPhase => "spinning",
            Phase::CaptureTwo => "capture-2",
            Phase::Holding => "holding",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}
