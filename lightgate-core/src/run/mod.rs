//! Run state machine
//!
//! Owns the run lifecycle: arming, gate capture, pulse validation and
//! the split log. Every transition is deterministic in its inputs.

pub mod events;
pub mod machine;
pub mod pulse;
pub mod splits;
pub mod state;

pub use events::{EdgeDisposition, EdgeEvent, EdgeKind, Transition, Trigger};
pub use machine::{PulseOutcome, RunMachine, TickOutcome};
pub use pulse::{classify, PendingEdge, PulseVerdict};
pub use splits::{SplitTime, SplitTimes, SplitsFull, SPLIT_CAPACITY};
pub use state::{Mode, RunState};
