//! Port traits: the hexagonal boundary between the node state machines
//! and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlNode / InteractionNode (domain)
//! ```
//!
//! Driven adapters (links, storage, motor, buzzer, PIR, keypad, LCD,
//! clock, event sinks) implement these traits.  The node state machines
//! consume them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Blocking contract
//!
//! [`Transport`] and [`OperatorPort::get_pressed_key`] block until they
//! have something to return.  There is no timeout anywhere: a peer stuck
//! in a 60-tick lockout simply stalls the other node's next receive.
//! Adapters MUST NOT add timeouts that change this.

use crate::app::events::DoorEvent;
use crate::config::LockConfig;
use crate::error::{LinkError, OperatorError};
use crate::protocol::Credential;

// ───────────────────────────────────────────────────────────────
// Transport port (inter-ECU serial link)
// ───────────────────────────────────────────────────────────────

/// Reliable, ordered, blocking byte channel to the peer node.
pub trait Transport {
    /// Block until the byte is accepted by the transmit path.
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError>;

    /// Block until a byte arrives.
    fn receive_byte(&mut self) -> Result<u8, LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Credential store port (control node only)
// ───────────────────────────────────────────────────────────────

/// The single persistent credential slot.
///
/// `persist_credential` is the only mutation path; there is no delete.
/// Callers only persist a fully confirmed credential, so a rejected
/// provisioning attempt never reaches the store.
pub trait CredentialStore {
    fn persist_credential(&mut self, credential: &Credential) -> Result<(), StorageError>;

    fn load_credential(&mut self) -> Result<Credential, StorageError>;
}

/// Byte-addressed non-volatile memory (external I2C EEPROM, etc.).
pub trait EepromPort {
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError>;

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → motor + buzzer)
// ───────────────────────────────────────────────────────────────

/// Lock motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorDirection {
    /// Clockwise: retract the bolt.
    Unlock,
    /// Anticlockwise: throw the bolt.
    Lock,
    Stop,
}

/// Write-side port: the control node commands actuators through this.
pub trait ActuatorPort {
    /// Drive the lock motor at `speed` percent (0–100) in `direction`.
    fn rotate_motor(&mut self, direction: MotorDirection, speed: u8);

    /// Switch the alarm buzzer.
    fn set_buzzer(&mut self, on: bool);

    /// Motor stopped, buzzer off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Occupancy sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Polled binary motion signal.
pub trait OccupancySensor {
    fn is_occupied(&mut self) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Operator port (HMI only: keypad + character display)
// ───────────────────────────────────────────────────────────────

/// Keypad input and a two-row character display.
pub trait OperatorPort {
    /// Block until a key is pressed and return its code.
    fn get_pressed_key(&mut self) -> Result<u8, OperatorError>;

    /// Write `text` at the start of `row` (0 or 1).
    fn display(&mut self, row: u8, text: &str);

    /// Write one character at the cursor (password masking).
    fn put_char(&mut self, ch: char);

    fn clear_screen(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port (fixed-duration waits)
// ───────────────────────────────────────────────────────────────

/// Replacement for the reference design's busy-wait on a 1 Hz tick
/// counter.  Implementations sleep; they never return early.
pub trait ClockPort {
    /// Wait `ticks` whole ticks.
    fn wait_ticks(&mut self, ticks: u16);

    /// Short UI / pacing delay in milliseconds.
    fn pause_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The nodes emit structured [`DoorEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &DoorEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`LockConfig`].
///
/// # Security
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`LockConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<LockConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &LockConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for config blobs and the credential.
///
/// # Security
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic; no partial writes on power loss.
///   The ESP-IDF NVS API guarantees this natively; in-memory simulation
///   achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Port bundles
// ───────────────────────────────────────────────────────────────

/// Everything the control node drives.  One value satisfies every port so
/// state handlers can hold a single `&mut` to the hardware.
pub trait ControlHardware:
    Transport + CredentialStore + ActuatorPort + OccupancySensor + ClockPort
{
}

impl<T> ControlHardware for T where
    T: Transport + CredentialStore + ActuatorPort + OccupancySensor + ClockPort
{
}

/// Everything the interaction node drives.
pub trait InteractionHardware: Transport + OperatorPort + ClockPort {}

impl<T> InteractionHardware for T where T: Transport + OperatorPort + ClockPort {}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`], [`EepromPort`] and [`CredentialStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Stored value has the wrong shape.
    Corrupted,
    /// Address outside the device.
    OutOfRange,
    /// Generic I/O error (bus NAK, flash failure).
    IoError,
}

/// Errors from [`OccupancySensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::OutOfRange => write!(f, "address out of range"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}
