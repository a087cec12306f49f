//! GPIO / peripheral pin assignments for both door lock boards.
//!
//! Single source of truth for the wiring.  The device binaries take the
//! matching typed pins from `Peripherals`; a `const` block in each binary
//! fails the build if a number here drifts from the pin it claims.

// ---------------------------------------------------------------------------
// Inter-ECU link (UART1, 8N1, both boards)
// ---------------------------------------------------------------------------

pub const LINK_TX_GPIO: i32 = 17;
pub const LINK_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Control ECU: lock motor (L293D H-bridge)
// ---------------------------------------------------------------------------

/// H-bridge IN1: HIGH with IN2 LOW = unlock.
pub const MOTOR_IN1_GPIO: i32 = 4;
/// H-bridge IN2: HIGH with IN1 LOW = lock.
pub const MOTOR_IN2_GPIO: i32 = 5;
/// H-bridge EN1, LEDC channel 0.
pub const MOTOR_PWM_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Control ECU: alarm and occupancy
// ---------------------------------------------------------------------------

/// Active buzzer, HIGH = sounding.
pub const BUZZER_GPIO: i32 = 7;
/// PIR output, HIGH while motion is detected.
pub const PIR_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Control ECU: credential EEPROM (24C16 on I²C0)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Standard-mode bus; the 24C16 tops out at 400 kHz.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the lock motor (25 kHz, inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;

/// Every GPIO the control board claims.
pub const CONTROL_GPIOS: [i32; 9] = [
    LINK_TX_GPIO,
    LINK_RX_GPIO,
    MOTOR_IN1_GPIO,
    MOTOR_IN2_GPIO,
    MOTOR_PWM_GPIO,
    BUZZER_GPIO,
    PIR_GPIO,
    I2C_SDA_GPIO,
    I2C_SCL_GPIO,
];
