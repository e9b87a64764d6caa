//! Remote start UART receive task
//!
//! Receives frames from the start-line radio modem and forwards decoded
//! start messages to the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use lightgate_protocol::{FrameParser, StartMessage};

use crate::channels::REMOTE_START;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

#[embassy_executor::task]
pub async fn remote_rx_task(mut rx: BufferedUartRx) {
    info!("Remote RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match StartMessage::from_frame(&frame) {
                            Ok(msg) => {
                                debug!("Remote message: {:?}", msg);
                                REMOTE_START.signal(msg);
                            }
                            Err(e) => {
                                warn!("Failed to decode remote message: {:?}", e);
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                if parser.in_frame() {
                    debug!("Discarding partial frame");
                }
                parser.reset();
            }
        }
    }
}
