//! Main controller task
//!
//! Owns the run state machine. Wakes on a gate edge, a remote start or the
//! periodic tick; every wake samples the switches, evaluates the pending
//! pulse and refreshes the screen.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::gpio::{Input, Level, Output};
use embassy_time::{Duration, Ticker};

use lightgate_core::config::TimingConfig;
use lightgate_core::run::{
    EdgeDisposition, EdgeEvent, Mode, PulseOutcome, RunMachine, RunState, TickOutcome, Transition,
};
use lightgate_core::traits::PresentationSink;

use crate::channels::{BEAM_CLEAR, EDGES_DROPPED, EDGE_CHANNEL, REMOTE_START};
use crate::clock;
use crate::display::ScreenPublisher;

/// Operator inputs and the status LED
pub struct Panel {
    /// Reset/arm switch, high = asserted
    pub reset: Input<'static>,
    /// Mode switch, high = setup
    pub mode: Input<'static>,
    pub led: Output<'static>,
}

#[embassy_executor::task]
pub async fn controller_task(timing: TimingConfig, mut panel: Panel) {
    info!("Controller task started (tick {} ms)", timing.tick_ms);

    let mut machine: RunMachine = RunMachine::new(timing);
    let mut publisher = ScreenPublisher::new();
    let mut ticker = Ticker::every(Duration::from_millis(timing.tick_ms as u64));
    let mut beam_clear = true;
    let mut mode = Mode::from_level(panel.mode.is_high());

    info!("Mode: {:?}", mode);

    loop {
        match select3(EDGE_CHANNEL.receive(), REMOTE_START.wait(), ticker.next()).await {
            Either3::First(edge) => handle_edge(&mut machine, edge),
            Either3::Second(msg) => {
                if let Some(transition) = machine.remote_start(msg, clock::now_ms()) {
                    log_transition(&transition);
                }
            }
            Either3::Third(()) => {}
        }

        let now_ms = clock::now_ms();

        if let TickOutcome::Pulse(outcome) = machine.tick(now_ms) {
            log_pulse(&outcome);
        }

        if let Some(transition) = machine.reset_input(panel.reset.is_high(), now_ms) {
            log_transition(&transition);
            if transition.to == RunState::ShowingResults {
                log_times(&machine);
            }
        }

        let dropped = EDGES_DROPPED.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!("Edge channel full, dropped {} edges", dropped);
        }

        if let Some(clear) = BEAM_CLEAR.try_take() {
            beam_clear = clear;
        }

        let sampled = Mode::from_level(panel.mode.is_high());
        if sampled != mode {
            info!("Mode: {:?}", sampled);
            mode = sampled;
        }

        let led = match mode {
            Mode::Setup if beam_clear => Level::High,
            _ => Level::Low,
        };
        panel.led.set_level(led);

        let view = machine.view(now_ms).in_mode(mode, beam_clear);
        if let Err(e) = publisher.present(&view) {
            trace!("Screen update skipped: {:?}", e);
        }
    }
}

fn handle_edge(machine: &mut RunMachine, edge: EdgeEvent) {
    match machine.record_edge(edge) {
        EdgeDisposition::Recorded => trace!("Edge recorded: {:?}", edge),
        EdgeDisposition::Ignored => {}
        EdgeDisposition::Stale => debug!("Stale edge dropped: {:?}", edge),
    }
}

fn log_transition(transition: &Transition) {
    info!(
        "{:?} -> {:?} via {:?} at {} ms",
        transition.from, transition.to, transition.trigger, transition.at_ms
    );
}

fn log_pulse(outcome: &PulseOutcome) {
    match outcome {
        PulseOutcome::Recorded {
            ordinal,
            split,
            width_ms,
        } => info!(
            "Split {}: {}.{:03} s (pulse {} ms)",
            ordinal,
            split.whole_secs(),
            split.subsec_millis(),
            width_ms
        ),
        PulseOutcome::Overflow { split } => warn!(
            "Split log full, dropped {}.{:03} s",
            split.whole_secs(),
            split.subsec_millis()
        ),
        PulseOutcome::TooShort { width_ms } => debug!("Pulse too short: {} ms", width_ms),
        PulseOutcome::OutOfOrder {
            rising_ms,
            falling_ms,
        } => warn!(
            "Out-of-order pulse: rising {} ms, falling {} ms",
            rising_ms, falling_ms
        ),
    }
}

fn log_times(machine: &RunMachine) {
    let splits = machine.splits();
    info!("TIMES ({} recorded, {} lost)", splits.len(), splits.overflowed());
    for (ordinal, split) in splits.ordinals() {
        info!("{}. {}.{:03}", ordinal, split.whole_secs(), split.subsec_millis());
    }
}
