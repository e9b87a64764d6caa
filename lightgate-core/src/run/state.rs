//! Run states and operating mode

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timer run state
///
/// The machine cycles Ready → Running → ShowingResults → Ready
/// indefinitely; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    /// Idle, waiting for a start signal or the arm switch
    #[default]
    Ready,
    /// Run in progress; gate crossings are recorded
    Running,
    /// Run stopped; recorded splits are on screen
    ShowingResults,
}

impl RunState {
    /// Whether gate edges are captured in this state
    pub fn accepts_edges(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Screen title for this state
    pub fn title(&self) -> &'static str {
        match self {
            RunState::Ready => "READY",
            RunState::Running => "MEASURING",
            RunState::ShowingResults => "TIMES",
        }
    }
}

/// Operating mode selected by the mode switch
///
/// The mode only changes what the idle screen and status LED show;
/// it has no effect on timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Gate alignment aid: LED mirrors the beam
    Setup,
    /// Normal timing
    #[default]
    Race,
}

impl Mode {
    /// Map the mode switch level (high = setup)
    pub fn from_level(high: bool) -> Self {
        if high {
            Mode::Setup
        } else {
            Mode::Race
        }
    }
}
