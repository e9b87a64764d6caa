//! Light gate edge capture task
//!
//! Waits for any level change on the gate input and stamps it
//! immediately. Classification and validation happen in the controller.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Input;

use lightgate_core::config::GateConfig;
use lightgate_core::run::{EdgeEvent, EdgeKind};

use crate::channels::{BEAM_CLEAR, EDGES_DROPPED, EDGE_CHANNEL};
use crate::clock;

#[embassy_executor::task]
pub async fn gate_task(mut pin: Input<'static>, config: GateConfig) {
    info!("Gate task started (inverted={})", config.inverted);

    BEAM_CLEAR.signal(config.beam_clear(pin.is_high()));

    loop {
        pin.wait_for_any_edge().await;
        let at_ms = clock::now_ms();
        let level = pin.is_high();

        let event = EdgeEvent {
            kind: EdgeKind::from_level(level, config.inverted),
            at_ms,
        };
        trace!("Gate edge: {:?}", event);

        BEAM_CLEAR.signal(config.beam_clear(level));

        if EDGE_CHANNEL.try_send(event).is_err() {
            EDGES_DROPPED.fetch_add(1, Ordering::Relaxed);
        }
    }
}
