//! HMI ECU firmware entry point.
//!
//! The operator keypad and display are served over the ESP-IDF std
//! console (USB-serial), the peer link over UART1.

use anyhow::Result;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use doorlock::adapters::board::InteractionBoard;
use doorlock::adapters::console::ConsoleOperator;
use doorlock::adapters::link::UartLink;
use doorlock::adapters::log_sink::LogEventSink;
use doorlock::adapters::nvs::NvsStore;
use doorlock::adapters::time::SystemClock;
use doorlock::app::ports::ConfigPort;
use doorlock::config::LockConfig;
use doorlock::interaction::InteractionNode;
use doorlock::pins;

const _: () = {
    assert!(pins::LINK_TX_GPIO == 17);
    assert!(pins::LINK_RX_GPIO == 18);
};

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Doorlock HMI ECU v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "pins: link tx={} rx={}",
        pins::LINK_TX_GPIO,
        pins::LINK_RX_GPIO
    );

    let config = match NvsStore::new() {
        Ok(nvs) => nvs.load().unwrap_or_else(|e| {
            warn!("Config load failed ({}), using defaults", e);
            LockConfig::default()
        }),
        Err(e) => {
            warn!("NVS init failed ({}), using default config", e);
            LockConfig::default()
        }
    };

    let peripherals = Peripherals::take()?;
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.baud_rate)),
    )?;

    let board = InteractionBoard::new(
        UartLink::new(uart),
        ConsoleOperator::stdio(config.confirm_key),
        SystemClock::new(config.tick_period()),
    );
    let mut node = InteractionNode::new(board, LogEventSink::new(), config);
    node.start();

    let Err(e) = node.run();
    Err(e.into())
}
