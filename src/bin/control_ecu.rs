//! Control ECU firmware entry point.
//!
//! ```text
//!  UART1 ◀──▶ ControlNode ──▶ MotorDriver (IN1/IN2 + LEDC)
//!                 │      └──▶ BuzzerDriver
//!                 ├── PirSensor
//!                 └── EepromCredentialStore ── I2cEeprom (24C16)
//! ```

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use doorlock::adapters::board::{ControlBoard, DoorActuators};
use doorlock::adapters::credential_store::EepromCredentialStore;
use doorlock::adapters::link::UartLink;
use doorlock::adapters::log_sink::LogEventSink;
use doorlock::adapters::nvs::NvsStore;
use doorlock::adapters::time::DelayClock;
use doorlock::app::ports::ConfigPort;
use doorlock::config::LockConfig;
use doorlock::control::ControlNode;
use doorlock::drivers::buzzer::BuzzerDriver;
use doorlock::drivers::eeprom::I2cEeprom;
use doorlock::drivers::motor::MotorDriver;
use doorlock::drivers::pir::PirSensor;
use doorlock::pins;

const _: () = {
    assert!(pins::LINK_TX_GPIO == 17);
    assert!(pins::LINK_RX_GPIO == 18);
    assert!(pins::MOTOR_IN1_GPIO == 4);
    assert!(pins::MOTOR_IN2_GPIO == 5);
    assert!(pins::MOTOR_PWM_GPIO == 6);
    assert!(pins::BUZZER_GPIO == 7);
    assert!(pins::PIR_GPIO == 15);
    assert!(pins::I2C_SDA_GPIO == 8);
    assert!(pins::I2C_SCL_GPIO == 9);
};

fn pwm_resolution() -> Result<Resolution> {
    match pins::PWM_RESOLUTION_BITS {
        8 => Ok(Resolution::Bits8),
        10 => Ok(Resolution::Bits10),
        12 => Ok(Resolution::Bits12),
        bits => Err(anyhow!("unsupported LEDC resolution: {bits} bits")),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Doorlock control ECU v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "pins: link tx={} rx={} | motor in1={} in2={} pwm={} | buzzer={} pir={} | i2c sda={} scl={}",
        pins::LINK_TX_GPIO,
        pins::LINK_RX_GPIO,
        pins::MOTOR_IN1_GPIO,
        pins::MOTOR_IN2_GPIO,
        pins::MOTOR_PWM_GPIO,
        pins::BUZZER_GPIO,
        pins::PIR_GPIO,
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
    );

    // ── 2. Config from NVS (or defaults) ──────────────────────
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

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins_io = peripherals.pins;

    let uart = UartDriver::new(
        peripherals.uart1,
        pins_io.gpio17,
        pins_io.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.baud_rate)),
    )?;

    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::MOTOR_PWM_FREQ_HZ))
            .resolution(pwm_resolution()?),
    )?;
    let motor = MotorDriver::new(
        PinDriver::output(pins_io.gpio4)?,
        PinDriver::output(pins_io.gpio5)?,
        LedcDriver::new(peripherals.ledc.channel0, &timer, pins_io.gpio6)?,
    );
    let buzzer = BuzzerDriver::new(PinDriver::output(pins_io.gpio7)?);
    let pir = PirSensor::new(PinDriver::input(pins_io.gpio15)?);

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pins_io.gpio8,
        pins_io.gpio9,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let store = EepromCredentialStore::new(
        I2cEeprom::new(i2c, Delay::new_default()),
        config.credential_address,
    );

    // ── 4. Run ────────────────────────────────────────────────
    let board = ControlBoard::new(
        UartLink::new(uart),
        store,
        DoorActuators::new(motor, buzzer),
        pir,
        DelayClock::new(Delay::new_default(), config.tick_period_ms),
    );
    let mut node = ControlNode::new(board, LogEventSink::new(), config);
    node.start();

    let Err(e) = node.run();
    Err(e.into())
}
