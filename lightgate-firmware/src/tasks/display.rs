//! Display flush task
//!
//! Copies the shared screen buffer and pushes it to the SSD1306. The lock
//! is released before the I2C transfer starts.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;

use lightgate_display::Ssd1306;

use crate::channels::{SCREEN_BUFFER, SCREEN_UPDATE};

pub type Display = Ssd1306<I2c<'static, I2C0, Async>>;

#[embassy_executor::task]
pub async fn display_task(mut display: Display) {
    info!("Display task started");

    loop {
        SCREEN_UPDATE.wait().await;

        let screen = SCREEN_BUFFER.lock().await.clone();

        screen
            .draw(display.frame_mut())
            .unwrap_or_else(|never| match never {});

        match display.flush().await {
            Ok(()) => trace!("Screen flushed: {:?}", screen),
            Err(e) => warn!("Display flush failed: {:?}", e),
        }
    }
}
