//! System configuration parameters
//!
//! All tunable parameters for the door lock.  Defaults: 1 s tick, 15 s
//! motor runs, 60 s lockout, three attempts.  Values can be overridden via
//! NVS or, on the host simulator, a JSON file.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration shared by both nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    // --- Authentication ---
    /// Consecutive verification failures that trigger a lockout.
    pub max_attempts: u8,

    // --- Timing ---
    /// Length of one tick in milliseconds.
    pub tick_period_ms: u32,
    /// Ticks the motor runs to unlock the door.
    pub unlock_ticks: u16,
    /// Ticks the motor runs to lock the door.
    pub lock_ticks: u16,
    /// Ticks the buzzer sounds (and the HMI stays locked) after a lockout.
    pub lockout_ticks: u16,
    /// Pause between two occupancy polls (milliseconds, 0 = back-to-back).
    pub occupancy_poll_ms: u32,

    // --- Actuator ---
    /// Motor speed while locking / unlocking (0-100%).
    pub motor_speed_percent: u8,

    // --- Storage ---
    /// First EEPROM address of the 5-byte credential slot.
    pub credential_address: u16,

    // --- Link ---
    /// UART baud rate between the two ECUs.
    pub baud_rate: u32,

    // --- Operator UI (HMI only) ---
    /// Key code that confirms a password entry.
    pub confirm_key: u8,
    /// How long status screens stay up (milliseconds).
    pub message_ms: u32,
    /// Pause after each credential key press (milliseconds).
    pub key_settle_ms: u32,
    /// Pause between reads while waiting for the confirmation key.
    pub confirm_poll_ms: u32,
    /// Pause between the command byte and the credential frame.
    pub command_settle_ms: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            // Authentication
            max_attempts: 3,

            // Timing
            tick_period_ms: 1000, // 1 tick = 1 s
            unlock_ticks: 15,
            lock_ticks: 15,
            lockout_ticks: 60,
            occupancy_poll_ms: 100,

            // Actuator
            motor_speed_percent: 100,

            // Storage
            credential_address: 0x0311,

            // Link
            baud_rate: 9600,

            // Operator UI
            confirm_key: 13,
            message_ms: 1000,
            key_settle_ms: 300,
            confirm_poll_ms: 500,
            command_settle_ms: 100,
        }
    }
}

impl LockConfig {
    /// Wall-clock length of one tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_period_ms))
    }

    /// Wall-clock length of `ticks` ticks.
    pub fn ticks(&self, ticks: u16) -> Duration {
        self.tick_period() * u32::from(ticks)
    }
}

/// Range-check every field.  Invalid values are rejected, never clamped.
pub fn validate_config(cfg: &LockConfig) -> Result<(), ConfigError> {
    if !(1..=10).contains(&cfg.max_attempts) {
        return Err(ConfigError::ValidationFailed("max_attempts must be 1–10"));
    }
    if !(1..=10_000).contains(&cfg.tick_period_ms) {
        return Err(ConfigError::ValidationFailed(
            "tick_period_ms must be 1–10000",
        ));
    }
    if cfg.unlock_ticks == 0 || cfg.lock_ticks == 0 {
        return Err(ConfigError::ValidationFailed(
            "unlock_ticks and lock_ticks must be non-zero",
        ));
    }
    if cfg.lockout_ticks == 0 {
        return Err(ConfigError::ValidationFailed("lockout_ticks must be non-zero"));
    }
    if cfg.occupancy_poll_ms > 5000 {
        return Err(ConfigError::ValidationFailed(
            "occupancy_poll_ms must be 0–5000",
        ));
    }
    if !(1..=100).contains(&cfg.motor_speed_percent) {
        return Err(ConfigError::ValidationFailed(
            "motor_speed_percent must be 1–100",
        ));
    }
    if cfg.credential_address > 0x07FF - 4 {
        return Err(ConfigError::ValidationFailed(
            "credential_address must leave 5 bytes inside a 2 KiB EEPROM",
        ));
    }
    if !(1200..=115_200).contains(&cfg.baud_rate) {
        return Err(ConfigError::ValidationFailed("baud_rate must be 1200–115200"));
    }
    if cfg.confirm_key == b'+' || cfg.confirm_key == b'-' {
        return Err(ConfigError::ValidationFailed(
            "confirm_key must not collide with a menu key",
        ));
    }
    Ok(())
}
