//! Lightgate - Photogate Race Timer Firmware
//!
//! Main firmware binary for RP2040 boards. A light gate on GPIO16 stamps
//! every beam break, a radio modem on UART1 delivers start commands from
//! the start line and an SSD1306 OLED shows the run and its split times.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lightgate_core::config::{parse_config, DeviceConfig};
use lightgate_display::Ssd1306;

use crate::tasks::controller::Panel;

/// Embedded configuration (compiled into firmware)
/// Edit lightgate.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../lightgate.toml");

mod channels;
mod clock;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lightgate firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Operator panel
    // Pin assignments: reset GPIO15, mode GPIO14, status LED GPIO25
    let panel = Panel {
        reset: Input::new(p.PIN_15, Pull::Down),
        mode: Input::new(p.PIN_14, Pull::Down),
        led: Output::new(p.PIN_25, Level::Low),
    };

    // Light gate receiver output
    let gate = Input::new(p.PIN_16, Pull::None);

    // SSD1306 on I2C0 (SDA GPIO4, SCL GPIO5)
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let mut display = Ssd1306::new(i2c, config.display.i2c_address);
    if let Err(e) = display.init().await {
        defmt::panic!(
            "Display init failed at 0x{:02x}: {:?}",
            config.display.i2c_address,
            e
        );
    }
    info!("Display initialized");

    // Remote start modem on UART1 (TX GPIO8, RX GPIO9); receive only
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.remote.baudrate;

    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    // Spawn tasks
    spawner.spawn(tasks::display_task(display)).unwrap();
    spawner.spawn(tasks::gate_task(gate, config.gate)).unwrap();
    if config.remote.enabled {
        spawner.spawn(tasks::remote_rx_task(rx)).unwrap();
        info!("Remote start enabled at {} baud", config.remote.baudrate);
    } else {
        info!("Remote start disabled");
    }
    spawner
        .spawn(tasks::controller_task(config.timing, panel))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration
///
/// build.rs already rejected an invalid lightgate.toml, so the fallback
/// only triggers if the two validators disagree.
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: trigger > {} ms, dwell {} ms, holdoff {} ms, marker '{}'",
                config.timing.min_trigger_ms,
                config.timing.stop_dwell_ms,
                config.timing.reset_holdoff_ms,
                config.timing.start_marker as char
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            DeviceConfig::default()
        }
    }
}
