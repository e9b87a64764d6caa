//! Run state machine definition
//!
//! All timing behavior is a function of the current state, the inputs
//! sampled on a tick and the edges captured since the previous tick.

use lightgate_protocol::StartMessage;

use super::events::{EdgeDisposition, EdgeEvent, Transition, Trigger};
use super::pulse::{classify, span_ms, PendingEdge, PulseVerdict};
use super::splits::{SplitTime, SplitTimes, SPLIT_CAPACITY};
use super::state::RunState;
use crate::config::TimingConfig;
use crate::traits::View;

/// Result of evaluating one complete edge pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseOutcome {
    /// Valid crossing appended to the split log
    Recorded {
        ordinal: usize,
        split: SplitTime,
        width_ms: u32,
    },
    /// Valid crossing, but the split log was already full
    Overflow { split: SplitTime },
    /// Pulse not wider than the trigger threshold
    TooShort { width_ms: u32 },
    /// Falling edge stamped before the rising edge
    OutOfOrder { rising_ms: u32, falling_ms: u32 },
}

/// Result of one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Not running; nothing evaluated
    Idle,
    /// Running with no complete pulse pending
    Elapsed { ms: u32 },
    /// A pending pulse was resolved
    Pulse(PulseOutcome),
}

/// The timer's run state machine
///
/// A single value owns the state, the start timestamp, the pending edge
/// pair and the split log. Timestamps are milliseconds since boot on a
/// wrapping 32-bit clock; spans are computed modulo 2^32, so a run may
/// cross the wrap as long as it lasts under 24 days.
#[derive(Debug, Clone)]
pub struct RunMachine<const N: usize = SPLIT_CAPACITY> {
    config: TimingConfig,
    state: RunState,
    start_ms: Option<u32>,
    /// Time of the last reset-driven transition, for the reset holdoff
    last_transition_ms: Option<u32>,
    pending: PendingEdge,
    splits: SplitTimes<N>,
}

impl<const N: usize> RunMachine<N> {
    /// Create a machine in Ready
    pub fn new(config: TimingConfig) -> Self {
        Self {
            config,
            state: RunState::Ready,
            start_ms: None,
            last_transition_ms: None,
            pending: PendingEdge::new(),
            splits: SplitTimes::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Start of the current run; `Some` exactly in Running and ShowingResults
    pub fn start_ms(&self) -> Option<u32> {
        self.start_ms
    }

    pub fn splits(&self) -> &SplitTimes<N> {
        &self.splits
    }

    pub fn pending(&self) -> &PendingEdge {
        &self.pending
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Time since the run started
    pub fn elapsed_ms(&self, now_ms: u32) -> Option<u32> {
        self.start_ms.map(|start| span_ms(start, now_ms).unwrap_or(0))
    }

    /// Handle a message from the remote start link
    ///
    /// Only the configured marker, and only while Ready, starts a run.
    /// Everything else is ignored.
    pub fn remote_start(&mut self, msg: StartMessage, now_ms: u32) -> Option<Transition> {
        if self.state != RunState::Ready || !msg.is_start(self.config.start_marker) {
            return None;
        }
        Some(self.begin_run(Trigger::RemoteStart, now_ms))
    }

    /// Handle the reset/arm input level sampled this tick
    pub fn reset_input(&mut self, asserted: bool, now_ms: u32) -> Option<Transition> {
        if !asserted {
            return None;
        }

        match self.state {
            RunState::Ready => {
                if self.in_reset_holdoff(now_ms) {
                    return None;
                }
                Some(self.begin_run(Trigger::ResetInput, now_ms))
            }
            RunState::Running => {
                let elapsed = self.elapsed_ms(now_ms)?;
                if elapsed <= self.config.stop_dwell_ms {
                    return None;
                }
                // An unfinished pulse is dropped with the run
                self.pending.clear();
                Some(self.enter(RunState::ShowingResults, Trigger::ResetInput, now_ms))
            }
            RunState::ShowingResults => {
                if self.in_reset_holdoff(now_ms) {
                    return None;
                }
                self.start_ms = None;
                Some(self.enter(RunState::Ready, Trigger::ResetInput, now_ms))
            }
        }
    }

    /// Store a gate edge in the pending pair
    ///
    /// Edges are only captured while Running. Edges stamped before the
    /// run started belong to the previous session and are dropped.
    pub fn record_edge(&mut self, edge: EdgeEvent) -> EdgeDisposition {
        if !self.state.accepts_edges() {
            return EdgeDisposition::Ignored;
        }
        match self.start_ms {
            Some(start) if span_ms(start, edge.at_ms).is_some() => {
                self.pending.record(edge);
                EdgeDisposition::Recorded
            }
            _ => EdgeDisposition::Stale,
        }
    }

    /// One evaluation pass
    ///
    /// While Running, a complete edge pair is resolved and cleared;
    /// otherwise the elapsed time is reported.
    pub fn tick(&mut self, now_ms: u32) -> TickOutcome {
        if self.state != RunState::Running {
            return TickOutcome::Idle;
        }

        match self.pending.take_pair() {
            Some((rising_ms, falling_ms)) => TickOutcome::Pulse(self.resolve(rising_ms, falling_ms)),
            None => TickOutcome::Elapsed {
                ms: self.elapsed_ms(now_ms).unwrap_or(0),
            },
        }
    }

    /// What the presentation sink should show
    pub fn view(&self, now_ms: u32) -> View<'_> {
        match self.state {
            RunState::Ready => View::Ready,
            RunState::Running => View::Measuring {
                elapsed_ms: self.elapsed_ms(now_ms).unwrap_or(0),
            },
            RunState::ShowingResults => View::Times {
                splits: self.splits.as_slice(),
                overflowed: self.splits.overflowed(),
            },
        }
    }

    fn resolve(&mut self, rising_ms: u32, falling_ms: u32) -> PulseOutcome {
        match classify(rising_ms, falling_ms, self.config.min_trigger_ms) {
            PulseVerdict::Valid { width_ms } => {
                let start = self.start_ms.unwrap_or(rising_ms);
                let split = SplitTime::from_millis(span_ms(start, rising_ms).unwrap_or(0));
                match self.splits.push(split) {
                    Ok(ordinal) => PulseOutcome::Recorded {
                        ordinal,
                        split,
                        width_ms,
                    },
                    Err(_) => PulseOutcome::Overflow { split },
                }
            }
            PulseVerdict::TooShort { width_ms } => PulseOutcome::TooShort { width_ms },
            PulseVerdict::OutOfOrder => PulseOutcome::OutOfOrder {
                rising_ms,
                falling_ms,
            },
        }
    }

    /// Ready → Running entry actions
    fn begin_run(&mut self, trigger: Trigger, now_ms: u32) -> Transition {
        self.start_ms = Some(now_ms);
        self.splits.clear();
        self.pending.clear();
        self.enter(RunState::Running, trigger, now_ms)
    }

    fn enter(&mut self, to: RunState, trigger: Trigger, now_ms: u32) -> Transition {
        let from = self.state;
        self.state = to;
        if trigger == Trigger::ResetInput {
            self.last_transition_ms = Some(now_ms);
        }
        Transition {
            from,
            to,
            trigger,
            at_ms: now_ms,
        }
    }

    fn in_reset_holdoff(&self, now_ms: u32) -> bool {
        self.last_transition_ms
            .is_some_and(|at| span_ms(at, now_ms).unwrap_or(0) < self.config.reset_holdoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::EdgeKind;
    use proptest::prelude::*;

    fn machine() -> RunMachine {
        RunMachine::new(TimingConfig::default())
    }

    /// Machine that was started by the reset input at `start_ms`
    fn running_since(start_ms: u32) -> RunMachine {
        let mut m = machine();
        m.reset_input(true, start_ms).unwrap();
        m
    }

    fn start() -> StartMessage {
        StartMessage::new(b'S')
    }

    fn crossing(m: &mut RunMachine, rising_ms: u32, falling_ms: u32) -> TickOutcome {
        m.record_edge(EdgeEvent::rising(rising_ms));
        m.record_edge(EdgeEvent::falling(falling_ms));
        m.tick(falling_ms)
    }

    #[test]
    fn test_boot_then_reset_starts_run() {
        let mut m = machine();
        assert_eq!(m.state(), RunState::Ready);
        assert_eq!(m.start_ms(), None);

        let t = m.reset_input(true, 1000).unwrap();
        assert_eq!(t.from, RunState::Ready);
        assert_eq!(t.to, RunState::Running);
        assert_eq!(t.trigger, Trigger::ResetInput);
        assert_eq!(m.start_ms(), Some(1000));
        assert!(m.splits().is_empty());
    }

    #[test]
    fn test_valid_crossing_records_rising_time() {
        let mut m = running_since(1000);
        let outcome = crossing(&mut m, 1500, 1520);

        assert_eq!(
            outcome,
            TickOutcome::Pulse(PulseOutcome::Recorded {
                ordinal: 1,
                split: SplitTime::from_millis(500),
                width_ms: 20,
            })
        );
        assert_eq!(m.splits().as_slice(), &[SplitTime::from_millis(500)]);
        assert!((m.splits().as_slice()[0].as_secs_f32() - 0.5).abs() < 1e-6);
        assert!(m.pending().is_empty());
    }

    #[test]
    fn test_short_pulse_discarded() {
        let mut m = running_since(1000);
        let outcome = crossing(&mut m, 2000, 2005);

        assert_eq!(
            outcome,
            TickOutcome::Pulse(PulseOutcome::TooShort { width_ms: 5 })
        );
        assert!(m.splits().is_empty());
        assert!(m.pending().is_empty());
    }

    #[test]
    fn test_out_of_order_pulse_discarded() {
        let mut m = running_since(1000);
        m.record_edge(EdgeEvent::rising(2000));
        m.record_edge(EdgeEvent::falling(1900));

        assert_eq!(
            m.tick(2000),
            TickOutcome::Pulse(PulseOutcome::OutOfOrder {
                rising_ms: 2000,
                falling_ms: 1900,
            })
        );
        assert!(m.splits().is_empty());
        assert!(m.pending().is_empty());
    }

    /// One edge per wake, as the controller delivers them
    fn crossing_per_edge(m: &mut RunMachine, rising_ms: u32, falling_ms: u32) -> TickOutcome {
        m.record_edge(EdgeEvent::rising(rising_ms));
        assert!(matches!(m.tick(rising_ms), TickOutcome::Elapsed { .. }));
        m.record_edge(EdgeEvent::falling(falling_ms));
        m.tick(falling_ms)
    }

    #[test]
    fn test_lone_falling_edge_does_not_block_later_crossings() {
        let mut m = running_since(1000);
        m.record_edge(EdgeEvent::falling(1100));
        assert_eq!(m.tick(1100), TickOutcome::Elapsed { ms: 100 });

        for rising in [2000, 4000, 6000] {
            let outcome = crossing_per_edge(&mut m, rising, rising + 100);
            assert!(matches!(
                outcome,
                TickOutcome::Pulse(PulseOutcome::Recorded { .. })
            ));
        }

        assert_eq!(
            m.splits().as_slice(),
            &[
                SplitTime::from_millis(1000),
                SplitTime::from_millis(3000),
                SplitTime::from_millis(5000),
            ]
        );
    }

    #[test]
    fn test_run_started_while_beam_blocked() {
        let mut m = running_since(1000);
        // Runner already in the gate: only the falling edge is seen
        m.record_edge(EdgeEvent::falling(1300));
        m.tick(1300);

        crossing_per_edge(&mut m, 2500, 2560);
        assert_eq!(m.splits().as_slice(), &[SplitTime::from_millis(1500)]);
    }

    #[test]
    fn test_run_across_clock_wrap() {
        let start = u32::MAX - 499;
        let mut m = running_since(start);

        assert_eq!(m.record_edge(EdgeEvent::rising(start - 1)), EdgeDisposition::Stale);
        assert_eq!(m.elapsed_ms(500), Some(1000));

        crossing_per_edge(&mut m, 1500, 1550);
        assert_eq!(m.splits().as_slice(), &[SplitTime::from_millis(2000)]);

        let t = m.reset_input(true, 2000).unwrap();
        assert_eq!(t.to, RunState::ShowingResults);
    }

    #[test]
    fn test_stop_requires_dwell() {
        let mut m = running_since(1000);

        assert_eq!(m.reset_input(true, 1300), None);
        assert_eq!(m.state(), RunState::Running);

        let t = m.reset_input(true, 1600).unwrap();
        assert_eq!(t.to, RunState::ShowingResults);
        assert_eq!(m.state(), RunState::ShowingResults);
        assert_eq!(m.start_ms(), Some(1000));
    }

    #[test]
    fn test_stop_dwell_is_exclusive() {
        let mut m = running_since(1000);
        assert_eq!(m.reset_input(true, 1500), None);
        assert!(m.reset_input(true, 1501).is_some());
    }

    #[test]
    fn test_remote_start_only_from_ready() {
        let mut m = machine();
        let t = m.remote_start(start(), 2000).unwrap();
        assert_eq!(t.trigger, Trigger::RemoteStart);
        assert_eq!(m.state(), RunState::Running);
        assert_eq!(m.start_ms(), Some(2000));
        assert!(m.splits().is_empty());

        // Same message while running is ignored
        assert_eq!(m.remote_start(start(), 2500), None);
        assert_eq!(m.start_ms(), Some(2000));
    }

    #[test]
    fn test_remote_start_clears_previous_run() {
        let mut m = running_since(0);
        crossing(&mut m, 1000, 1100);
        m.reset_input(true, 2000).unwrap();
        m.reset_input(true, 3000).unwrap();
        assert_eq!(m.state(), RunState::Ready);
        assert_eq!(m.splits().len(), 1);

        m.remote_start(start(), 4000).unwrap();
        assert!(m.splits().is_empty());
        assert_eq!(m.start_ms(), Some(4000));
    }

    #[test]
    fn test_unknown_marker_ignored() {
        let mut m = machine();
        assert_eq!(m.remote_start(StartMessage::new(b'X'), 100), None);
        assert_eq!(m.state(), RunState::Ready);
    }

    #[test]
    fn test_configured_marker() {
        let config = TimingConfig {
            start_marker: b'G',
            ..TimingConfig::default()
        };
        let mut m: RunMachine = RunMachine::new(config);
        assert_eq!(m.remote_start(start(), 100), None);
        assert!(m.remote_start(StartMessage::new(b'G'), 100).is_some());
    }

    #[test]
    fn test_remote_start_ignored_while_showing_results() {
        let mut m = running_since(0);
        m.reset_input(true, 1000).unwrap();
        assert_eq!(m.remote_start(start(), 1100), None);
        assert_eq!(m.state(), RunState::ShowingResults);
    }

    #[test]
    fn test_results_back_to_ready_after_holdoff() {
        let mut m = running_since(0);
        m.reset_input(true, 1000).unwrap();

        // Still held from the stop press
        assert_eq!(m.reset_input(true, 1200), None);
        assert_eq!(m.state(), RunState::ShowingResults);

        let t = m.reset_input(true, 1500).unwrap();
        assert_eq!(t.from, RunState::ShowingResults);
        assert_eq!(t.to, RunState::Ready);
        assert_eq!(m.start_ms(), None);
    }

    #[test]
    fn test_ready_holdoff_after_results() {
        let mut m = running_since(0);
        m.reset_input(true, 1000).unwrap();
        m.reset_input(true, 1500).unwrap();

        assert_eq!(m.reset_input(true, 1700), None);
        assert_eq!(m.state(), RunState::Ready);
        assert!(m.reset_input(true, 2000).is_some());
        assert_eq!(m.state(), RunState::Running);
    }

    #[test]
    fn test_remote_start_not_held_off() {
        let mut m = running_since(0);
        m.reset_input(true, 1000).unwrap();
        m.reset_input(true, 1500).unwrap();
        assert!(m.remote_start(start(), 1510).is_some());
    }

    #[test]
    fn test_released_reset_does_nothing() {
        let mut m = machine();
        assert_eq!(m.reset_input(false, 100), None);
        assert_eq!(m.state(), RunState::Ready);
    }

    #[test]
    fn test_edges_ignored_outside_running() {
        let mut m = machine();
        assert_eq!(m.record_edge(EdgeEvent::rising(10)), EdgeDisposition::Ignored);
        assert!(m.pending().is_empty());

        let mut m = running_since(0);
        m.reset_input(true, 1000).unwrap();
        assert_eq!(m.record_edge(EdgeEvent::rising(1100)), EdgeDisposition::Ignored);
        assert_eq!(m.tick(1200), TickOutcome::Idle);
    }

    #[test]
    fn test_stale_edge_dropped() {
        let mut m = running_since(1000);
        assert_eq!(m.record_edge(EdgeEvent::rising(999)), EdgeDisposition::Stale);
        assert_eq!(m.record_edge(EdgeEvent::rising(1000)), EdgeDisposition::Recorded);
    }

    #[test]
    fn test_half_pulse_reports_elapsed() {
        let mut m = running_since(1000);
        m.record_edge(EdgeEvent::rising(1200));
        assert_eq!(m.tick(1250), TickOutcome::Elapsed { ms: 250 });
        assert_eq!(m.pending().rising_ms(), Some(1200));
    }

    #[test]
    fn test_pending_cleared_on_stop() {
        let mut m = running_since(0);
        m.record_edge(EdgeEvent::rising(900));
        m.reset_input(true, 1000).unwrap();
        assert!(m.pending().is_empty());
    }

    #[test]
    fn test_overflow_keeps_first_splits() {
        let mut m: RunMachine<2> = RunMachine::new(TimingConfig::default());
        m.reset_input(true, 0).unwrap();

        for i in 1..=3u32 {
            m.record_edge(EdgeEvent::rising(i * 1000));
            m.record_edge(EdgeEvent::falling(i * 1000 + 50));
            let outcome = m.tick(i * 1000 + 50);
            if i == 3 {
                assert_eq!(
                    outcome,
                    TickOutcome::Pulse(PulseOutcome::Overflow {
                        split: SplitTime::from_millis(3000)
                    })
                );
            }
        }

        assert_eq!(m.splits().len(), 2);
        assert_eq!(m.splits().overflowed(), 1);
        assert_eq!(m.splits().as_slice()[1], SplitTime::from_millis(2000));
    }

    #[test]
    fn test_views_follow_state() {
        let mut m = machine();
        assert_eq!(m.view(0), View::Ready);

        m.reset_input(true, 1000).unwrap();
        assert_eq!(m.view(1750), View::Measuring { elapsed_ms: 750 });

        crossing(&mut m, 1500, 1520);
        m.reset_input(true, 2000).unwrap();
        assert_eq!(
            m.view(2100),
            View::Times {
                splits: &[SplitTime::from_millis(500)],
                overflowed: 0,
            }
        );
    }

    #[derive(Debug, Clone)]
    enum Step {
        Edge(EdgeKind, u32),
        Tick,
        Remote,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (any::<bool>(), 0u32..200).prop_map(|(rising, dt)| {
                let kind = if rising { EdgeKind::Rising } else { EdgeKind::Falling };
                Step::Edge(kind, dt)
            }),
            Just(Step::Tick),
            Just(Step::Remote),
        ]
    }

    proptest! {
        #[test]
        fn prop_split_iff_wide_ordered_pulse(
            start in 0u32..100_000,
            rising_off in 0u32..100_000,
            falling_off in 0u32..200_000,
        ) {
            let mut m = running_since(start);
            let rising = start + rising_off;
            let falling = start + falling_off;

            crossing(&mut m, rising, falling);

            let valid = falling >= rising && falling - rising > MIN_TRIGGER;
            prop_assert_eq!(m.splits().len(), usize::from(valid));
            if valid {
                prop_assert_eq!(m.splits().as_slice()[0].as_millis(), rising - start);
            }
            prop_assert!(m.pending().is_empty());
        }

        #[test]
        fn prop_split_independent_of_falling(
            rising_off in 0u32..10_000,
            width_a in 16u32..5_000,
            width_b in 16u32..5_000,
        ) {
            let mut a = running_since(1000);
            let mut b = running_since(1000);
            crossing(&mut a, 1000 + rising_off, 1000 + rising_off + width_a);
            crossing(&mut b, 1000 + rising_off, 1000 + rising_off + width_b);
            prop_assert_eq!(a.splits().as_slice(), b.splits().as_slice());
        }

        #[test]
        fn prop_splits_monotonic_within_run(steps in proptest::collection::vec(step(), 0..64)) {
            let mut m = running_since(0);
            let mut now = 0u32;
            let mut last_len = 0;

            for step in steps {
                match step {
                    Step::Edge(kind, dt) => {
                        now += dt;
                        m.record_edge(EdgeEvent { kind, at_ms: now });
                    }
                    Step::Tick => {
                        m.tick(now);
                    }
                    Step::Remote => {
                        prop_assert_eq!(m.remote_start(start(), now), None);
                    }
                }
                prop_assert!(m.splits().len() >= last_len);
                prop_assert!(m.splits().len() <= SPLIT_CAPACITY);
                prop_assert_eq!(m.start_ms(), Some(0));
                last_len = m.splits().len();
            }
        }

        #[test]
        fn prop_every_start_empties_log(crossings in 1u32..20) {
            let mut m = running_since(0);
            for i in 0..crossings {
                crossing(&mut m, 1000 + i * 100, 1000 + i * 100 + 50);
            }
            let stop = 1000 + crossings * 100 + 1000;
            m.reset_input(true, stop).unwrap();
            m.reset_input(true, stop + 1000).unwrap();
            m.reset_input(true, stop + 2000).unwrap();

            prop_assert_eq!(m.state(), RunState::Running);
            prop_assert!(m.splits().is_empty());
            prop_assert_eq!(m.splits().overflowed(), 0);
        }
    }

    const MIN_TRIGGER: u32 = crate::config::MIN_TRIGGER_MS;
}
