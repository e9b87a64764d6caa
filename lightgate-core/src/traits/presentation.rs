//! Presentation sink trait for the display/log collaborator

use crate::run::{Mode, RunState, SplitTime};

/// Errors a presentation sink may report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Output is busy with a previous frame; try again next tick
    Busy,
}

/// What the timer wants shown for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View<'a> {
    /// Waiting for a start
    Ready,
    /// Waiting for a start, gate alignment aid active
    Setup { beam_clear: bool },
    /// Run in progress
    Measuring { elapsed_ms: u32 },
    /// Run finished; splits in crossing order
    Times {
        splits: &'a [SplitTime],
        overflowed: u16,
    },
}

impl<'a> View<'a> {
    /// State the view was produced in
    pub fn state(&self) -> RunState {
        match self {
            View::Ready | View::Setup { .. } => RunState::Ready,
            View::Measuring { .. } => RunState::Running,
            View::Times { .. } => RunState::ShowingResults,
        }
    }

    /// Swap the idle screen for the alignment screen in setup mode
    pub fn in_mode(self, mode: Mode, beam_clear: bool) -> Self {
        match (self, mode) {
            (View::Ready, Mode::Setup) => View::Setup { beam_clear },
            (view, _) => view,
        }
    }
}

/// Output driven once per controller tick
///
/// Implementations must never block: if the output cannot take the
/// frame right now they return an error and the frame is skipped.
pub trait PresentationSink {
    fn present(&mut self, view: &View<'_>) -> Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_mode_replaces_ready_only() {
        assert_eq!(
            View::Ready.in_mode(Mode::Setup, true),
            View::Setup { beam_clear: true }
        );
        assert_eq!(View::Ready.in_mode(Mode::Race, true), View::Ready);

        let measuring = View::Measuring { elapsed_ms: 10 };
        assert_eq!(measuring.in_mode(Mode::Setup, false), measuring);
    }

    #[test]
    fn test_view_state_tag() {
        assert_eq!(View::Setup { beam_clear: false }.state(), RunState::Ready);
        assert_eq!(View::Measuring { elapsed_ms: 0 }.state(), RunState::Running);
        let times = View::Times {
            splits: &[],
            overflowed: 0,
        };
        assert_eq!(times.state(), RunState::ShowingResults);
    }
}
